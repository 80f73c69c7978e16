//! Policy Iteration
//!
//! Alternates full policy evaluation with one-step greedy improvement until
//! no state's action changes. Evaluation sweeps update values in place, in
//! state-space order.

use rand::{rngs::StdRng, seq::IndexedRandom};
use serde::{Deserialize, Serialize};

use crate::{
    Error, Result,
    config::{MdpConfig, PolicyIterationConfig},
    mdp::TicTacToeMdp,
    opponent::{Opponent, UniformOpponent},
    policy::{Policy, ValueFunction},
    ports::Solver,
    tictactoe::{BoardState, StateSpace},
    utils::build_rng,
};

/// What a training run did
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyIterationStats {
    /// Evaluate/improve cycles
    pub cycles: usize,
    /// Evaluation sweeps summed over all cycles
    pub evaluation_sweeps: usize,
    /// Policy entries changed summed over all cycles
    pub policy_changes: usize,
}

#[derive(Debug, Clone)]
pub struct PolicyIterationAgent<O = UniformOpponent> {
    mdp: TicTacToeMdp<O>,
    space: StateSpace,
    config: PolicyIterationConfig,
    policy_values: ValueFunction,
    current_policy: Policy,
    rng: StdRng,
    stats: PolicyIterationStats,
    policy: Option<Policy>,
}

impl PolicyIterationAgent<UniformOpponent> {
    /// Agent against a uniformly random opponent
    pub fn new(mdp: MdpConfig, config: PolicyIterationConfig) -> Result<Self> {
        Self::with_mdp(TicTacToeMdp::new(mdp), config)
    }
}

impl<O: Opponent> PolicyIterationAgent<O> {
    /// Build the agent: enumerate the state space, zero the values and draw a
    /// random initial policy.
    pub fn with_mdp(mdp: TicTacToeMdp<O>, config: PolicyIterationConfig) -> Result<Self> {
        mdp.config().validate()?;
        config.validate()?;

        let space = StateSpace::enumerate(mdp.agent());
        let mut agent = Self {
            policy_values: ValueFunction::zeros(&space),
            current_policy: Policy::new(),
            rng: build_rng(config.seed),
            stats: PolicyIterationStats::default(),
            policy: None,
            mdp,
            space,
            config,
        };
        agent.init_values();
        agent.init_random_policy()?;
        Ok(agent)
    }

    /// Set every state's value to 0
    pub fn init_values(&mut self) {
        self.policy_values = ValueFunction::zeros(&self.space);
    }

    /// Pick a uniformly random legal action for every non-terminal state
    pub fn init_random_policy(&mut self) -> Result<()> {
        let mut policy = Policy::new();
        for state in self.space.non_terminal() {
            let action = state
                .legal_actions()
                .choose(&mut self.rng)
                .copied()
                .ok_or_else(|| no_actions(state))?;
            policy.insert(*state, action);
        }
        self.current_policy = policy;
        Ok(())
    }

    /// Evaluate the current policy until the sweep's change measure (see
    /// [`crate::config::StoppingRule`]) is strictly below `delta`.
    ///
    /// Terminal states are pinned to 0. Returns the number of sweeps.
    pub fn evaluate_policy(&mut self, delta: f64) -> Result<usize> {
        let rule = self.config.stopping_rule;
        let mut sweeps = 0;

        loop {
            sweeps += 1;
            let mut max_change = f64::NEG_INFINITY;

            for state in self.space.states() {
                if state.is_terminal() {
                    self.policy_values.set(*state, 0.0);
                    continue;
                }

                let action = self.current_policy.action_for(state).ok_or_else(|| {
                    Error::MissingPolicyAction {
                        state: state.encode(),
                    }
                })?;
                let value = self.mdp.expected_return(state, action, &self.policy_values)?;
                let change = value - self.policy_values.value(state)?;
                max_change = max_change.max(rule.measure(change));
                self.policy_values.set(*state, value);
            }

            log::debug!("evaluation sweep {sweeps}: max change {max_change:.3e}");
            if max_change < delta {
                return Ok(sweeps);
            }
        }
    }

    /// Greedy one-step improvement against the evaluated values.
    ///
    /// A state switches to its best action only when that action's return is
    /// strictly greater than the state's current value. Returns `true` iff at
    /// least one state's action changed.
    pub fn improve_policy(&mut self) -> Result<bool> {
        let mut changes = 0;

        for state in self.space.non_terminal() {
            let (best, best_value) = self.mdp.greedy_action(state, &self.policy_values)?;
            if best_value > self.policy_values.value(state)?
                && self.current_policy.action_for(state) != Some(best)
            {
                self.current_policy.insert(*state, best);
                changes += 1;
            }
        }

        self.stats.policy_changes += changes;
        log::debug!("policy improvement changed {changes} states");
        Ok(changes > 0)
    }

    /// Evaluate and improve until the policy is stable, then publish it
    pub fn train(&mut self) -> Result<()> {
        loop {
            let sweeps = self.evaluate_policy(self.config.delta)?;
            self.stats.cycles += 1;
            self.stats.evaluation_sweeps += sweeps;
            if !self.improve_policy()? {
                break;
            }
        }

        log::info!(
            "policy iteration converged after {} cycles ({} evaluation sweeps, {} states)",
            self.stats.cycles,
            self.stats.evaluation_sweeps,
            self.space.len()
        );
        self.policy = Some(self.current_policy.clone());
        Ok(())
    }

    pub fn policy(&self) -> Option<&Policy> {
        self.policy.as_ref()
    }

    /// The policy being improved (available before training finishes)
    pub fn current_policy(&self) -> &Policy {
        &self.current_policy
    }

    pub fn values(&self) -> &ValueFunction {
        &self.policy_values
    }

    pub fn stats(&self) -> PolicyIterationStats {
        self.stats
    }

    pub fn state_space(&self) -> &StateSpace {
        &self.space
    }

    pub fn mdp(&self) -> &TicTacToeMdp<O> {
        &self.mdp
    }

    #[cfg(test)]
    pub(crate) fn set_value(&mut self, state: BoardState, value: f64) {
        self.policy_values.set(state, value);
    }
}

fn no_actions(state: &BoardState) -> Error {
    Error::invariant(format!(
        "non-terminal state '{}' has no legal actions",
        state.encode()
    ))
}

impl<O: Opponent> Solver for PolicyIterationAgent<O> {
    fn name(&self) -> &str {
        "Policy Iteration"
    }

    fn train(&mut self) -> Result<()> {
        PolicyIterationAgent::train(self)
    }

    fn policy(&self) -> Option<&Policy> {
        PolicyIterationAgent::policy(self)
    }

    fn state_value(&self, state: &BoardState) -> Option<f64> {
        self.policy_values.get(state)
    }

    fn state_space(&self) -> &StateSpace {
        &self.space
    }
}
