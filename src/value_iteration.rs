//! Value Iteration
//!
//! Runs a fixed number of Bellman optimality sweeps, then reads the greedy
//! policy off the resulting values. Sweeps update in place.

use crate::{
    Result,
    config::{MdpConfig, ValueIterationConfig},
    mdp::TicTacToeMdp,
    opponent::{Opponent, UniformOpponent},
    policy::{Policy, ValueFunction},
    ports::Solver,
    tictactoe::{BoardState, StateSpace},
};

#[derive(Debug, Clone)]
pub struct ValueIterationAgent<O = UniformOpponent> {
    mdp: TicTacToeMdp<O>,
    space: StateSpace,
    config: ValueIterationConfig,
    values: ValueFunction,
    /// Largest absolute change of each sweep run so far
    residuals: Vec<f64>,
    policy: Option<Policy>,
}

impl ValueIterationAgent<UniformOpponent> {
    pub fn new(mdp: MdpConfig, config: ValueIterationConfig) -> Result<Self> {
        Self::with_mdp(TicTacToeMdp::new(mdp), config)
    }
}

impl<O: Opponent> ValueIterationAgent<O> {
    pub fn with_mdp(mdp: TicTacToeMdp<O>, config: ValueIterationConfig) -> Result<Self> {
        mdp.config().validate()?;
        config.validate()?;

        let space = StateSpace::enumerate(mdp.agent());
        Ok(Self {
            values: ValueFunction::zeros(&space),
            residuals: Vec::with_capacity(config.sweeps),
            policy: None,
            mdp,
            space,
            config,
        })
    }

    /// Set every state's value to 0 and forget recorded residuals
    pub fn init_values(&mut self) {
        self.values = ValueFunction::zeros(&self.space);
        self.residuals.clear();
    }

    /// Run `sweeps` Bellman optimality sweeps over the non-terminal states.
    /// Terminal states keep their value.
    pub fn iterate(&mut self) -> Result<()> {
        for sweep in 1..=self.config.sweeps {
            let mut residual = 0.0_f64;
            for state in self.space.non_terminal() {
                let (_, best) = self.mdp.greedy_action(state, &self.values)?;
                residual = residual.max((best - self.values.value(state)?).abs());
                self.values.set(*state, best);
            }
            log::debug!("value iteration sweep {sweep}: residual {residual:.3e}");
            self.residuals.push(residual);
        }
        Ok(())
    }

    /// Greedy policy with respect to the current values.
    ///
    /// Does not modify the values, so calling it twice gives the same policy.
    pub fn extract_policy(&self) -> Result<Policy> {
        self.space
            .non_terminal()
            .map(|state| {
                self.mdp
                    .greedy_action(state, &self.values)
                    .map(|(action, _)| (*state, action))
            })
            .collect()
    }

    /// Iterate, then publish the extracted policy
    pub fn train(&mut self) -> Result<()> {
        self.iterate()?;
        let policy = self.extract_policy()?;
        log::info!(
            "value iteration finished {} sweeps over {} states (last residual {:.3e})",
            self.config.sweeps,
            self.space.len(),
            self.residuals.last().copied().unwrap_or_default()
        );
        self.policy = Some(policy);
        Ok(())
    }

    pub fn policy(&self) -> Option<&Policy> {
        self.policy.as_ref()
    }

    pub fn values(&self) -> &ValueFunction {
        &self.values
    }

    pub fn residuals(&self) -> &[f64] {
        &self.residuals
    }

    pub fn state_space(&self) -> &StateSpace {
        &self.space
    }

    pub fn mdp(&self) -> &TicTacToeMdp<O> {
        &self.mdp
    }
}

impl<O: Opponent> Solver for ValueIterationAgent<O> {
    fn name(&self) -> &str {
        "Value Iteration"
    }

    fn train(&mut self) -> Result<()> {
        ValueIterationAgent::train(self)
    }

    fn policy(&self) -> Option<&Policy> {
        ValueIterationAgent::policy(self)
    }

    fn state_value(&self, state: &BoardState) -> Option<f64> {
        self.values.get(state)
    }

    fn state_space(&self) -> &StateSpace {
        &self.space
    }
}
