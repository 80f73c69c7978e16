//! Q-table for one-step temporal difference learning

use std::collections::HashMap;

use crate::{
    Error, Result,
    mdp::Outcome,
    tictactoe::{BoardState, Move, StateSpace},
};

/// Q-values for every legal `(state, action)` pair of the state space
///
/// Each non-terminal state keeps its actions in legal-action order, so
/// greedy ties resolve to the earliest legal action. Terminal states have no
/// entries.
#[derive(Debug, Clone, Default)]
pub struct QTable {
    /// Learning rate α
    learning_rate: f64,
    /// Discount factor γ
    discount_factor: f64,
    q_values: HashMap<BoardState, Vec<(Move, f64)>>,
}

impl QTable {
    pub fn new(learning_rate: f64, discount_factor: f64) -> Self {
        Self {
            learning_rate,
            discount_factor,
            q_values: HashMap::new(),
        }
    }

    /// Zero every legal action of every non-terminal state in `space`
    pub fn initialize(&mut self, space: &StateSpace) {
        self.q_values = space
            .non_terminal()
            .map(|state| {
                let actions = state.legal_actions().into_iter().map(|a| (a, 0.0)).collect();
                (*state, actions)
            })
            .collect();
    }

    /// The actions of `state` with their Q-values
    pub fn actions(&self, state: &BoardState) -> Result<&[(Move, f64)]> {
        self.q_values
            .get(state)
            .map(Vec::as_slice)
            .ok_or_else(|| Error::MissingQValues {
                state: state.encode(),
            })
    }

    pub fn get(&self, state: &BoardState, action: Move) -> Result<f64> {
        self.actions(state)?
            .iter()
            .find(|(a, _)| *a == action)
            .map(|&(_, q)| q)
            .ok_or_else(|| illegal(state, action))
    }

    pub fn set(&mut self, state: &BoardState, action: Move, value: f64) -> Result<()> {
        let actions = self
            .q_values
            .get_mut(state)
            .ok_or_else(|| Error::MissingQValues {
                state: state.encode(),
            })?;
        let slot = actions
            .iter_mut()
            .find(|(a, _)| *a == action)
            .ok_or_else(|| illegal(state, action))?;
        slot.1 = value;
        Ok(())
    }

    /// The best action of `state` and its Q-value, earliest action on ties
    ///
    /// # Errors
    ///
    /// [`Error::TerminalState`] for a finished game, [`Error::MissingQValues`]
    /// for a state that was never initialized.
    pub fn max_q(&self, state: &BoardState) -> Result<(Move, f64)> {
        if state.is_terminal() {
            return Err(Error::TerminalState {
                state: state.encode(),
            });
        }
        let mut best: Option<(Move, f64)> = None;
        for &(action, q) in self.actions(state)? {
            if best.is_none_or(|(_, best_q)| q > best_q) {
                best = Some((action, q));
            }
        }
        best.ok_or_else(|| Error::MissingQValues {
            state: state.encode(),
        })
    }

    /// Q-learning update: off-policy TD control
    ///
    /// Q(s,a) ← (1 - α) Q(s,a) + α [r + γ max_a' Q(s',a')]
    ///
    /// The bootstrap term is 0 when `s'` is terminal. Returns the new Q(s,a).
    pub fn q_learning_update(&mut self, outcome: &Outcome) -> Result<f64> {
        let current = self.get(&outcome.source, outcome.action)?;
        let next_value = if outcome.next.is_terminal() {
            0.0
        } else {
            self.max_q(&outcome.next)?.1
        };
        let target = outcome.reward + self.discount_factor * next_value;
        let updated = (1.0 - self.learning_rate) * current + self.learning_rate * target;
        self.set(&outcome.source, outcome.action, updated)?;
        Ok(updated)
    }

    /// Number of states with Q-values
    pub fn len(&self) -> usize {
        self.q_values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.q_values.is_empty()
    }

    /// Total number of `(state, action)` entries
    pub fn size(&self) -> usize {
        self.q_values.values().map(Vec::len).sum()
    }

    pub fn states(&self) -> impl Iterator<Item = &BoardState> {
        self.q_values.keys()
    }

    pub fn learning_rate(&self) -> f64 {
        self.learning_rate
    }

    pub fn discount_factor(&self) -> f64 {
        self.discount_factor
    }
}

fn illegal(state: &BoardState, action: Move) -> Error {
    Error::IllegalAction {
        position: action.position,
        state: state.encode(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tictactoe::Player;

    fn table() -> QTable {
        let mut table = QTable::new(0.5, 0.9);
        table.initialize(&StateSpace::enumerate(Player::X));
        table
    }

    #[test]
    fn test_initialized_to_zero_for_legal_actions() {
        let table = table();
        let empty = BoardState::new();
        assert_eq!(table.actions(&empty).unwrap().len(), 9);
        assert_eq!(table.get(&empty, Move::new(4, Player::X)).unwrap(), 0.0);
        assert_eq!(table.len(), 2423);
    }

    #[test]
    fn test_terminal_and_unknown_states() {
        let table = table();
        let terminal = BoardState::from_string("XXXOO....").unwrap();
        assert!(matches!(
            table.max_q(&terminal),
            Err(Error::TerminalState { .. })
        ));
        assert!(matches!(
            table.actions(&terminal),
            Err(Error::MissingQValues { .. })
        ));
        // O to move is never an agent state when the agent plays X
        let opponent_turn = BoardState::new().play(0).unwrap();
        assert!(matches!(
            table.get(&opponent_turn, Move::new(1, Player::O)),
            Err(Error::MissingQValues { .. })
        ));
    }

    #[test]
    fn test_occupied_cell_is_illegal() {
        let mut table = table();
        let state = BoardState::from_string("X...O...._X").unwrap();
        let occupied = Move::new(0, Player::X);
        assert!(matches!(
            table.get(&state, occupied),
            Err(Error::IllegalAction { position: 0, .. })
        ));
        assert!(table.set(&state, occupied, 1.0).is_err());
    }

    #[test]
    fn test_max_q_prefers_earliest_on_ties() {
        let mut table = table();
        let empty = BoardState::new();
        assert_eq!(table.max_q(&empty).unwrap(), (Move::new(0, Player::X), 0.0));
        table.set(&empty, Move::new(4, Player::X), 0.3).unwrap();
        table.set(&empty, Move::new(8, Player::X), 0.3).unwrap();
        assert_eq!(table.max_q(&empty).unwrap(), (Move::new(4, Player::X), 0.3));
    }

    #[test]
    fn test_update_with_terminal_next_ignores_bootstrap() {
        let mut table = table();
        let source = BoardState::from_string("XX.OO...._X").unwrap();
        let action = Move::new(2, Player::X);
        let outcome = Outcome {
            source,
            action,
            reward: 1.0,
            next: source.apply(action).unwrap(),
        };
        assert_eq!(table.q_learning_update(&outcome).unwrap(), 0.5);
        assert_eq!(table.q_learning_update(&outcome).unwrap(), 0.75);
    }

    #[test]
    fn test_update_bootstraps_from_next_state() {
        let mut table = table();
        let source = BoardState::new();
        let action = Move::new(0, Player::X);
        let next = source.play(0).unwrap().play(4).unwrap();
        table.set(&next, Move::new(8, Player::X), 2.0).unwrap();
        table.set(&source, action, 1.0).unwrap();

        let outcome = Outcome {
            source,
            action,
            reward: 0.0,
            next,
        };
        // 0.5 * 1.0 + 0.5 * (0.0 + 0.9 * 2.0)
        let updated = table.q_learning_update(&outcome).unwrap();
        assert!((updated - 1.4).abs() < 1e-12);
    }
}
