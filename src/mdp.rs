//! Tic-Tac-Toe as a Markov Decision Process
//!
//! The agent's move and the opponent's reply form a single MDP step: applying
//! an action yields a probability-weighted set of `(reward, next state)`
//! outcomes, one per opponent reply. States are always positions with the
//! agent to move, or terminal positions.
//!
//! ```
//! use ttt_mdp::{config::MdpConfig, mdp::TicTacToeMdp, tictactoe::{BoardState, Move, Player}};
//!
//! let mdp = TicTacToeMdp::new(MdpConfig::new(Player::X));
//! let outcomes = mdp.transitions(&BoardState::new(), Move::new(4, Player::X)).unwrap();
//! assert_eq!(outcomes.len(), 8);
//! let total: f64 = outcomes.iter().map(|t| t.probability).sum();
//! assert!((total - 1.0).abs() < 1e-9);
//! ```

use serde::{Deserialize, Serialize};

use crate::{
    Error, Result,
    config::{MdpConfig, RewardConfig},
    opponent::{Opponent, UniformOpponent},
    policy::ValueFunction,
    tictactoe::{BoardState, Move, Player},
};

/// Tolerance for the per-action probability mass
pub const PROBABILITY_TOLERANCE: f64 = 1e-9;

/// `(s, a, r, s')` after the agent's move and, if the game continued, the
/// opponent's reply
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Outcome {
    pub source: BoardState,
    pub action: Move,
    pub reward: f64,
    pub next: BoardState,
}

/// One weighted outcome of a `(state, action)` pair
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TransitionProb {
    pub probability: f64,
    pub outcome: Outcome,
}

/// Transition model with the opponent folded into the dynamics
#[derive(Debug, Clone)]
pub struct TicTacToeMdp<O = UniformOpponent> {
    config: MdpConfig,
    opponent: O,
}

impl TicTacToeMdp<UniformOpponent> {
    /// MDP against a uniformly random opponent
    pub fn new(config: MdpConfig) -> Self {
        Self::with_opponent(config, UniformOpponent)
    }
}

impl<O: Opponent> TicTacToeMdp<O> {
    pub fn with_opponent(config: MdpConfig, opponent: O) -> Self {
        Self { config, opponent }
    }

    pub fn config(&self) -> &MdpConfig {
        &self.config
    }

    pub fn agent(&self) -> Player {
        self.config.agent
    }

    pub fn discount(&self) -> f64 {
        self.config.discount
    }

    pub fn rewards(&self) -> &RewardConfig {
        &self.config.rewards
    }

    pub fn opponent(&self) -> &O {
        &self.opponent
    }

    /// All outcomes of taking `action` in `state`.
    ///
    /// A move that ends the game yields a single outcome with probability 1
    /// and that result's terminal reward. Otherwise there is one outcome per
    /// opponent reply, weighted by the opponent's reply distribution, with
    /// the living reward plus any terminal bonus the reply triggers.
    ///
    /// # Errors
    ///
    /// - [`Error::TerminalState`] if `state` is terminal
    /// - [`Error::IllegalAction`] if `action` is not legal in `state`
    /// - [`Error::InvariantViolation`] if `state` is not the agent's turn or
    ///   the reply probabilities do not sum to 1
    pub fn transitions(&self, state: &BoardState, action: Move) -> Result<Vec<TransitionProb>> {
        if state.is_terminal() {
            return Err(Error::TerminalState {
                state: state.encode(),
            });
        }
        let agent = self.agent();
        if state.to_move != agent {
            return Err(Error::invariant(format!(
                "state '{}' is not {agent}'s turn",
                state.encode()
            )));
        }

        let after = state.apply(action)?;
        let status = after.evaluate_outcome(agent);
        if status.is_terminal() {
            return Ok(vec![TransitionProb {
                probability: 1.0,
                outcome: Outcome {
                    source: *state,
                    action,
                    reward: self.rewards().terminal_reward(status),
                    next: after,
                },
            }]);
        }

        let replies = self.opponent.reply_distribution(&after)?;
        let mut transitions = Vec::with_capacity(replies.len());
        let mut total = 0.0;
        for (reply, probability) in replies {
            let next = after.apply(reply)?;
            total += probability;
            transitions.push(TransitionProb {
                probability,
                outcome: Outcome {
                    source: *state,
                    action,
                    reward: self.rewards().reply_reward(next.evaluate_outcome(agent)),
                    next,
                },
            });
        }

        if (total - 1.0).abs() > PROBABILITY_TOLERANCE {
            return Err(Error::invariant(format!(
                "opponent '{}' reply probabilities sum to {total} after '{}'",
                self.opponent.name(),
                after.encode()
            )));
        }

        Ok(transitions)
    }

    /// One-step lookahead `Σ p · (r + γ · V(s'))` for a fixed action
    pub fn expected_return(
        &self,
        state: &BoardState,
        action: Move,
        values: &ValueFunction,
    ) -> Result<f64> {
        let discount = self.discount();
        let mut total = 0.0;
        for t in self.transitions(state, action)? {
            let next_value = values.value(&t.outcome.next)?;
            total += t.probability * (t.outcome.reward + discount * next_value);
        }
        Ok(total)
    }

    /// The action with the highest one-step lookahead and its return.
    /// Ties go to the earliest action in legal-action order.
    ///
    /// # Errors
    ///
    /// [`Error::InvariantViolation`] if a non-terminal state has no legal
    /// actions, plus anything [`Self::transitions`] reports.
    pub fn greedy_action(&self, state: &BoardState, values: &ValueFunction) -> Result<(Move, f64)> {
        if state.is_terminal() {
            return Err(Error::TerminalState {
                state: state.encode(),
            });
        }

        let mut best: Option<(Move, f64)> = None;
        for action in state.legal_actions() {
            let value = self.expected_return(state, action, values)?;
            if best.is_none_or(|(_, best_value)| value > best_value) {
                best = Some((action, value));
            }
        }

        best.ok_or_else(|| {
            Error::invariant(format!(
                "non-terminal state '{}' has no legal actions",
                state.encode()
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::RewardConfig,
        opponent::FirstLegalOpponent,
        tictactoe::StateSpace,
    };

    fn rewards() -> RewardConfig {
        RewardConfig::new(10.0, -10.0, 3.0, -1.0)
    }

    fn mdp() -> TicTacToeMdp {
        TicTacToeMdp::new(MdpConfig::new(Player::X).with_rewards(rewards()))
    }

    #[test]
    fn test_winning_move_is_single_certain_outcome() {
        // XX.
        // OO.
        // ...
        let state = BoardState::from_string("XX.OO...._X").unwrap();
        let transitions = mdp().transitions(&state, Move::new(2, Player::X)).unwrap();
        assert_eq!(transitions.len(), 1);
        assert_eq!(transitions[0].probability, 1.0);
        assert_eq!(transitions[0].outcome.reward, 10.0);
        assert!(transitions[0].outcome.next.is_terminal());
        assert_eq!(transitions[0].outcome.next.to_move, Player::O);
    }

    #[test]
    fn test_drawing_move_gets_draw_reward() {
        // XOX
        // XOO
        // OX.
        let state = BoardState::from_string("XOXXOOOX._X").unwrap();
        let transitions = mdp().transitions(&state, Move::new(8, Player::X)).unwrap();
        assert_eq!(transitions.len(), 1);
        assert_eq!(transitions[0].outcome.reward, 3.0);
    }

    #[test]
    fn test_replies_are_uniform_with_loss_bonus() {
        // X..
        // OO.
        // X..   X to move; playing 8 leaves O a win at 5
        let state = BoardState::from_string("X..OO.X.._X").unwrap();
        let transitions = mdp().transitions(&state, Move::new(8, Player::X)).unwrap();
        assert_eq!(transitions.len(), 4);
        for t in &transitions {
            assert!((t.probability - 0.25).abs() < 1e-12);
            assert_eq!(t.outcome.source, state);
            assert_eq!(t.outcome.action, Move::new(8, Player::X));
            let expected = if t.outcome.next.get(5) == crate::tictactoe::Cell::O {
                -11.0
            } else {
                -1.0
            };
            assert_eq!(t.outcome.reward, expected);
        }
    }

    #[test]
    fn test_reply_filling_board_is_a_draw() {
        // Only reachable when the agent plays O: X fills the last cell.
        // XOX
        // OOX
        // X..
        let mdp = TicTacToeMdp::new(MdpConfig::new(Player::O).with_rewards(rewards()));
        let state = BoardState::from_string("XOXOOXX.._O").unwrap();
        let transitions = mdp.transitions(&state, Move::new(8, Player::O)).unwrap();
        assert_eq!(transitions.len(), 1);
        assert!(transitions[0].outcome.next.is_draw());
        assert_eq!(transitions[0].outcome.reward, -1.0 + 3.0);
    }

    #[test]
    fn test_probability_mass_is_conserved_everywhere() {
        let mdp = mdp();
        let space = StateSpace::enumerate(Player::X);
        for state in space.non_terminal() {
            for action in state.legal_actions() {
                let total: f64 = mdp
                    .transitions(state, action)
                    .unwrap()
                    .iter()
                    .map(|t| t.probability)
                    .sum();
                assert!((total - 1.0).abs() <= PROBABILITY_TOLERANCE);
            }
        }
    }

    #[test]
    fn test_rejects_terminal_and_illegal_inputs() {
        let mdp = mdp();
        let terminal = BoardState::from_string("XXXOO....").unwrap();
        assert!(matches!(
            mdp.transitions(&terminal, Move::new(5, Player::O)),
            Err(Error::TerminalState { .. })
        ));

        let state = BoardState::new().play(4).unwrap().play(0).unwrap();
        assert!(matches!(
            mdp.transitions(&state, Move::new(4, Player::X)),
            Err(Error::IllegalAction { position: 4, .. })
        ));
    }

    #[test]
    fn test_rejects_opponent_turn_states() {
        let state = BoardState::new().play(4).unwrap();
        assert!(matches!(
            mdp().transitions(&state, Move::new(0, Player::O)),
            Err(Error::InvariantViolation { .. })
        ));
    }

    #[test]
    fn test_deterministic_opponent_has_one_outcome() {
        let mdp = TicTacToeMdp::with_opponent(MdpConfig::new(Player::X), FirstLegalOpponent);
        let transitions = mdp
            .transitions(&BoardState::new(), Move::new(0, Player::X))
            .unwrap();
        assert_eq!(transitions.len(), 1);
        assert_eq!(transitions[0].outcome.next.get(1), crate::tictactoe::Cell::O);
    }

    #[test]
    fn test_greedy_action_prefers_immediate_win() {
        let mdp = mdp();
        let space = StateSpace::enumerate(Player::X);
        let values = ValueFunction::zeros(&space);
        let state = BoardState::from_string("XX.OO...._X").unwrap();
        let (best, value) = mdp.greedy_action(&state, &values).unwrap();
        assert_eq!(best, Move::new(2, Player::X));
        assert_eq!(value, 10.0);
    }

    #[test]
    fn test_greedy_ties_go_to_first_action() {
        // With every reward 0 all actions tie at 0.
        let mdp = TicTacToeMdp::new(
            MdpConfig::new(Player::X).with_rewards(RewardConfig::new(0.0, 0.0, 0.0, 0.0)),
        );
        let space = StateSpace::enumerate(Player::X);
        let values = ValueFunction::zeros(&space);
        let (best, _) = mdp.greedy_action(&BoardState::new(), &values).unwrap();
        assert_eq!(best, Move::new(0, Player::X));
    }

    #[test]
    fn test_expected_return_uses_successor_values() {
        let mdp = TicTacToeMdp::with_opponent(
            MdpConfig::new(Player::X).with_rewards(RewardConfig::new(1.0, -1.0, 0.0, 0.0)),
            FirstLegalOpponent,
        );
        let space = StateSpace::enumerate(Player::X);
        let mut values = ValueFunction::zeros(&space);
        let root = BoardState::new();
        let next = root.play(4).unwrap().play(0).unwrap();
        values.set(next, 2.0);
        let value = mdp
            .expected_return(&root, Move::new(4, Player::X), &values)
            .unwrap();
        assert!((value - 0.9 * 2.0).abs() < 1e-12);
    }
}
