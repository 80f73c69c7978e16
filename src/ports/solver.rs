//! Solver port - the common face of the three learning agents
//!
//! Drivers train and query agents through this trait, which lets the
//! comparison tooling treat Policy Iteration, Value Iteration and Q-Learning
//! uniformly.

use crate::{
    Result,
    policy::Policy,
    tictactoe::{BoardState, StateSpace},
};

/// A learning agent that produces a [`Policy`]
///
/// # Examples
///
/// ```no_run
/// use ttt_mdp::{ports::Solver, tictactoe::BoardState};
///
/// fn opening<S: Solver>(mut solver: S) -> ttt_mdp::Result<Option<usize>> {
///     solver.train()?;
///     Ok(solver
///         .policy()
///         .and_then(|p| p.action_for(&BoardState::new()))
///         .map(|mv| mv.position))
/// }
/// ```
pub trait Solver {
    /// Human-readable algorithm name
    fn name(&self) -> &str;

    /// Run the algorithm to completion and publish the resulting policy.
    ///
    /// # Errors
    ///
    /// Propagates state-space invariant violations; agents never paper over
    /// an inconsistent model.
    fn train(&mut self) -> Result<()>;

    /// The trained policy, or `None` before [`Solver::train`] has succeeded
    fn policy(&self) -> Option<&Policy>;

    /// The agent's current estimate of a state's value.
    ///
    /// For the dynamic programming agents this is `V(s)`; for Q-Learning it is
    /// `max_a Q(s, a)` (0 for terminal states).
    fn state_value(&self, state: &BoardState) -> Option<f64>;

    /// The states the agent plans or learns over
    fn state_space(&self) -> &StateSpace;
}
