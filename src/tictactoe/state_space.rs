//! Enumeration of the states an agent can face

use std::collections::{HashMap, HashSet, VecDeque};

use super::board::{BoardState, Player};

/// Every state reachable from the empty board (X opening) in which `agent` is
/// to move, plus every reachable terminal state.
///
/// The order is the breadth-first discovery order, so sweeps over the space
/// are deterministic.
#[derive(Debug, Clone)]
pub struct StateSpace {
    agent: Player,
    states: Vec<BoardState>,
    index: HashMap<BoardState, usize>,
}

impl StateSpace {
    /// Enumerate the state space for an agent playing `agent`
    pub fn enumerate(agent: Player) -> Self {
        let mut states = Vec::new();
        let mut visited = HashSet::new();
        let mut queue = VecDeque::new();

        let root = BoardState::new();
        visited.insert(root);
        queue.push_back(root);

        while let Some(state) = queue.pop_front() {
            let terminal = state.is_terminal();
            if terminal || state.to_move == agent {
                states.push(state);
            }
            if terminal {
                continue;
            }

            for mv in state.legal_actions() {
                let Ok(next) = state.apply(mv) else {
                    continue;
                };
                if visited.insert(next) {
                    queue.push_back(next);
                }
            }
        }

        let index = states
            .iter()
            .enumerate()
            .map(|(i, &state)| (state, i))
            .collect();

        Self {
            agent,
            states,
            index,
        }
    }

    /// The mark the learning agent plays
    pub fn agent(&self) -> Player {
        self.agent
    }

    /// All states in enumeration order
    pub fn states(&self) -> &[BoardState] {
        &self.states
    }

    /// Non-terminal states (the agent is to move) in enumeration order
    pub fn non_terminal(&self) -> impl Iterator<Item = &BoardState> {
        self.states.iter().filter(|state| !state.is_terminal())
    }

    /// States in which the agent makes its first decision of a game
    pub fn initial_states(&self) -> Vec<BoardState> {
        let first_ply = match self.agent {
            Player::X => 0,
            Player::O => 1,
        };
        self.non_terminal()
            .filter(|state| state.occupied_count() == first_ply)
            .copied()
            .collect()
    }

    pub fn contains(&self, state: &BoardState) -> bool {
        self.index.contains_key(state)
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_x_state_space_size() {
        let space = StateSpace::enumerate(Player::X);
        assert_eq!(space.len(), 3381);
        assert_eq!(space.non_terminal().count(), 2423);
    }

    #[test]
    fn test_states_are_agent_turn_or_terminal() {
        for agent in [Player::X, Player::O] {
            let space = StateSpace::enumerate(agent);
            assert!(
                space
                    .states()
                    .iter()
                    .all(|s| s.is_terminal() || s.to_move == agent)
            );
        }
    }

    #[test]
    fn test_states_are_unique() {
        let space = StateSpace::enumerate(Player::X);
        let unique: HashSet<_> = space.states().iter().collect();
        assert_eq!(unique.len(), space.len());
    }

    #[test]
    fn test_initial_states() {
        let x_space = StateSpace::enumerate(Player::X);
        assert_eq!(x_space.initial_states(), vec![BoardState::new()]);
        assert_eq!(x_space.states()[0], BoardState::new());

        let o_space = StateSpace::enumerate(Player::O);
        assert_eq!(o_space.initial_states().len(), 9);
        assert!(!o_space.contains(&BoardState::new()));
    }

    #[test]
    fn test_successors_of_agent_moves_are_enumerated() {
        // Every state reached after the agent's move and the opponent's reply
        // must be present, or value lookups would fail.
        let space = StateSpace::enumerate(Player::X);
        for state in space.non_terminal() {
            for mv in state.legal_actions() {
                let after = state.apply(mv).unwrap();
                if after.is_terminal() {
                    assert!(space.contains(&after));
                    continue;
                }
                for reply in after.legal_actions() {
                    assert!(space.contains(&after.apply(reply).unwrap()));
                }
            }
        }
    }
}
