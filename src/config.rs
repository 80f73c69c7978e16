//! Configuration types for the MDP and the three solvers.
//!
//! Every struct has sensible defaults and builder-style `with_*` setters, and
//! can be (de)serialized so a whole run can be described in one JSON file.
//!
//! ```
//! use ttt_mdp::config::{MdpConfig, QLearningConfig, RewardConfig};
//! use ttt_mdp::tictactoe::Player;
//!
//! let mdp = MdpConfig::new(Player::X)
//!     .with_discount(0.9)
//!     .with_rewards(RewardConfig::new(1.0, -1.0, 0.0, 0.0));
//! let q = QLearningConfig::default().with_episodes(5_000).with_seed(7);
//! assert!(mdp.validate().is_ok());
//! assert!(q.validate().is_ok());
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{
    Error, Result,
    tictactoe::{GameStatus, Player},
};

/// Reward constants of the MDP, from the agent's point of view
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RewardConfig {
    pub winning: f64,
    pub losing: f64,
    pub draw: f64,
    pub living: f64,
}

impl RewardConfig {
    pub fn new(winning: f64, losing: f64, draw: f64, living: f64) -> Self {
        Self {
            winning,
            losing,
            draw,
            living,
        }
    }

    /// Reward for a transition that ends in `status`
    pub fn terminal_reward(&self, status: GameStatus) -> f64 {
        match status {
            GameStatus::Win => self.winning,
            GameStatus::Loss => self.losing,
            GameStatus::Draw => self.draw,
            GameStatus::Ongoing => self.living,
        }
    }

    /// Reward for a transition that includes the opponent's reply: the living
    /// reward plus the terminal bonus if the reply ended the game.
    pub fn reply_reward(&self, status: GameStatus) -> f64 {
        let bonus = match status {
            GameStatus::Ongoing => 0.0,
            terminal => self.terminal_reward(terminal),
        };
        self.living + bonus
    }

    pub fn validate(&self) -> Result<()> {
        let all = [self.winning, self.losing, self.draw, self.living];
        if all.iter().all(|r| r.is_finite()) {
            Ok(())
        } else {
            Err(Error::config(format!("rewards must be finite, got {self:?}")))
        }
    }
}

impl Default for RewardConfig {
    fn default() -> Self {
        Self::new(1.0, -1.0, 0.0, 0.0)
    }
}

/// Parameters shared by every solver: who the agent is, rewards and discount
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MdpConfig {
    /// The mark the learning agent plays (X always opens)
    pub agent: Player,
    /// Discount factor γ
    pub discount: f64,
    pub rewards: RewardConfig,
}

impl MdpConfig {
    pub fn new(agent: Player) -> Self {
        Self {
            agent,
            ..Self::default()
        }
    }

    pub fn with_discount(mut self, discount: f64) -> Self {
        self.discount = discount;
        self
    }

    pub fn with_rewards(mut self, rewards: RewardConfig) -> Self {
        self.rewards = rewards;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !(0.0..1.0).contains(&self.discount) {
            return Err(Error::config(format!(
                "discount must be in [0, 1), got {}",
                self.discount
            )));
        }
        self.rewards.validate()
    }
}

impl Default for MdpConfig {
    fn default() -> Self {
        Self {
            agent: Player::X,
            discount: 0.9,
            rewards: RewardConfig::default(),
        }
    }
}

/// When policy evaluation considers a sweep converged
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StoppingRule {
    /// Stop once the largest signed change in a sweep is below delta.
    /// Decreases never keep the evaluation running.
    #[default]
    MaxPositiveChange,
    /// Stop once the largest absolute change in a sweep is below delta
    MaxAbsoluteChange,
}

impl StoppingRule {
    /// The quantity compared against delta for one state's update
    pub fn measure(self, change: f64) -> f64 {
        match self {
            StoppingRule::MaxPositiveChange => change,
            StoppingRule::MaxAbsoluteChange => change.abs(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicyIterationConfig {
    /// Convergence threshold for policy evaluation
    pub delta: f64,
    pub stopping_rule: StoppingRule,
    /// Seed for the random initial policy
    pub seed: Option<u64>,
}

impl PolicyIterationConfig {
    pub fn with_delta(mut self, delta: f64) -> Self {
        self.delta = delta;
        self
    }

    pub fn with_stopping_rule(mut self, rule: StoppingRule) -> Self {
        self.stopping_rule = rule;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.delta > 0.0 && self.delta.is_finite() {
            Ok(())
        } else {
            Err(Error::config(format!(
                "delta must be positive and finite, got {}",
                self.delta
            )))
        }
    }
}

impl Default for PolicyIterationConfig {
    fn default() -> Self {
        Self {
            delta: 1e-6,
            stopping_rule: StoppingRule::default(),
            seed: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValueIterationConfig {
    /// Number of Bellman optimality sweeps (k)
    pub sweeps: usize,
}

impl ValueIterationConfig {
    pub fn with_sweeps(mut self, sweeps: usize) -> Self {
        self.sweeps = sweeps;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.sweeps == 0 {
            return Err(Error::config("value iteration needs at least one sweep"));
        }
        Ok(())
    }
}

impl Default for ValueIterationConfig {
    fn default() -> Self {
        Self { sweeps: 10 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QLearningConfig {
    /// Learning rate α
    pub alpha: f64,
    /// Exploration probability ε
    pub epsilon: f64,
    /// Number of training episodes (games)
    pub episodes: usize,
    /// Seed for exploration and for the environment's opponent
    pub seed: Option<u64>,
}

impl QLearningConfig {
    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    pub fn with_episodes(mut self, episodes: usize) -> Self {
        self.episodes = episodes;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.alpha > 0.0 && self.alpha <= 1.0) {
            return Err(Error::config(format!(
                "alpha must be in (0, 1], got {}",
                self.alpha
            )));
        }
        if !(0.0..=1.0).contains(&self.epsilon) {
            return Err(Error::config(format!(
                "epsilon must be in [0, 1], got {}",
                self.epsilon
            )));
        }
        Ok(())
    }
}

impl Default for QLearningConfig {
    fn default() -> Self {
        Self {
            alpha: 0.2,
            epsilon: 0.2,
            episodes: 30_000,
            seed: None,
        }
    }
}

/// Everything needed to run any of the solvers
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    pub mdp: MdpConfig,
    pub policy_iteration: PolicyIterationConfig,
    pub value_iteration: ValueIterationConfig,
    pub q_learning: QLearningConfig,
}

impl SolverConfig {
    /// Load a configuration from a JSON file; missing fields take defaults
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path).map_err(|source| Error::Io {
            operation: format!("open config file {}", path.display()),
            source,
        })?;
        let config: SolverConfig = serde_json::from_reader(file)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.mdp.validate()?;
        self.policy_iteration.validate()?;
        self.value_iteration.validate()?;
        self.q_learning.validate()
    }
}
