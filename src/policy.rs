//! Policies and value functions

use std::collections::HashMap;

use crate::{
    Error, Result,
    tictactoe::{BoardState, Move, StateSpace},
};

/// Mapping from non-terminal state to the action to take there
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Policy {
    actions: HashMap<BoardState, Move>,
}

impl Policy {
    pub fn new() -> Self {
        Self::default()
    }

    /// The action chosen for `state`, if the policy covers it
    pub fn action_for(&self, state: &BoardState) -> Option<Move> {
        self.actions.get(state).copied()
    }

    pub(crate) fn insert(&mut self, state: BoardState, action: Move) {
        self.actions.insert(state, action);
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&BoardState, &Move)> {
        self.actions.iter()
    }
}

impl FromIterator<(BoardState, Move)> for Policy {
    fn from_iter<I: IntoIterator<Item = (BoardState, Move)>>(iter: I) -> Self {
        Self {
            actions: iter.into_iter().collect(),
        }
    }
}

/// Mapping from state to estimated discounted return
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValueFunction {
    values: HashMap<BoardState, f64>,
}

impl ValueFunction {
    /// Every state in `space` at 0.0
    pub fn zeros(space: &StateSpace) -> Self {
        Self {
            values: space.states().iter().map(|&s| (s, 0.0)).collect(),
        }
    }

    pub fn get(&self, state: &BoardState) -> Option<f64> {
        self.values.get(state).copied()
    }

    /// Value of a state that must be in the table
    ///
    /// # Errors
    ///
    /// A missing state means the state space is not closed under the
    /// transition model, reported as [`Error::InvariantViolation`].
    pub fn value(&self, state: &BoardState) -> Result<f64> {
        self.get(state).ok_or_else(|| {
            Error::invariant(format!(
                "state '{}' is missing from the value function",
                state.encode()
            ))
        })
    }

    pub fn set(&mut self, state: BoardState, value: f64) {
        self.values.insert(state, value);
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&BoardState, &f64)> {
        self.values.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tictactoe::Player;

    #[test]
    fn test_zeros_covers_state_space() {
        let space = StateSpace::enumerate(Player::X);
        let values = ValueFunction::zeros(&space);
        assert_eq!(values.len(), space.len());
        assert!(values.iter().all(|(_, &v)| v == 0.0));
    }

    #[test]
    fn test_missing_value_is_invariant_violation() {
        let values = ValueFunction::default();
        assert!(matches!(
            values.value(&BoardState::new()),
            Err(Error::InvariantViolation { .. })
        ));
    }

    #[test]
    fn test_policy_lookup() {
        let state = BoardState::new();
        let policy: Policy = [(state, Move::new(4, Player::X))].into_iter().collect();
        assert_eq!(policy.action_for(&state), Some(Move::new(4, Player::X)));
        assert_eq!(policy.action_for(&state.play(4).unwrap()), None);
        assert_eq!(policy.len(), 1);
    }
}
