//! Solver parameters shared by every command
//!
//! Values come from an optional JSON file first, then individual flags
//! override them.

use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use clap::Args;

use crate::{
    config::{RewardConfig, SolverConfig, StoppingRule},
    tictactoe::Player,
};

#[derive(Args, Debug, Clone, Default)]
pub struct SolverArgs {
    /// JSON file with a full or partial solver configuration
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Which mark the agent plays (`x` or `o`)
    #[arg(long)]
    pub agent: Option<Player>,

    /// Discount factor γ in [0, 1)
    #[arg(long)]
    pub discount: Option<f64>,

    /// Rewards, e.g. `win=1,loss=-1,draw=0,living=0` (unlisted keys keep their value)
    #[arg(long)]
    pub rewards: Option<String>,

    /// Policy evaluation threshold
    #[arg(long)]
    pub delta: Option<f64>,

    /// Policy evaluation stopping rule (`positive` or `absolute`)
    #[arg(long)]
    pub stopping_rule: Option<String>,

    /// Value iteration sweeps
    #[arg(long)]
    pub sweeps: Option<usize>,

    /// Q-learning rate α
    #[arg(long)]
    pub alpha: Option<f64>,

    /// Q-learning exploration probability ε
    #[arg(long)]
    pub epsilon: Option<f64>,

    /// Q-learning training episodes
    #[arg(long)]
    pub episodes: Option<usize>,

    /// Random seed for reproducibility
    #[arg(long)]
    pub seed: Option<u64>,
}

impl SolverArgs {
    /// Merge file and flags into a validated configuration
    pub fn resolve(&self) -> Result<SolverConfig> {
        let mut config = match &self.config {
            Some(path) => SolverConfig::load(path)
                .with_context(|| format!("loading {}", path.display()))?,
            None => SolverConfig::default(),
        };

        if let Some(agent) = self.agent {
            config.mdp.agent = agent;
        }
        if let Some(discount) = self.discount {
            config.mdp.discount = discount;
        }
        if let Some(rewards) = &self.rewards {
            config.mdp.rewards = parse_rewards(rewards, config.mdp.rewards)?;
        }
        if let Some(delta) = self.delta {
            config.policy_iteration.delta = delta;
        }
        if let Some(rule) = &self.stopping_rule {
            config.policy_iteration.stopping_rule = parse_stopping_rule(rule)?;
        }
        if let Some(sweeps) = self.sweeps {
            config.value_iteration.sweeps = sweeps;
        }
        if let Some(alpha) = self.alpha {
            config.q_learning.alpha = alpha;
        }
        if let Some(epsilon) = self.epsilon {
            config.q_learning.epsilon = epsilon;
        }
        if let Some(episodes) = self.episodes {
            config.q_learning.episodes = episodes;
        }
        if let Some(seed) = self.seed {
            config.policy_iteration.seed = Some(seed);
            config.q_learning.seed = Some(seed);
        }

        config.validate()?;
        Ok(config)
    }
}

/// Parse `key=value` reward overrides on top of `base`
fn parse_rewards(s: &str, base: RewardConfig) -> Result<RewardConfig> {
    let mut rewards = base;
    for part in s.split(',') {
        let trimmed = part.trim();
        if trimmed.is_empty() {
            continue;
        }
        let (key, value) = trimmed
            .split_once('=')
            .ok_or_else(|| anyhow!("Invalid reward entry '{trimmed}'. Expected key=value"))?;
        let value: f64 = value
            .trim()
            .parse()
            .map_err(|_| anyhow!("Invalid numeric reward '{value}' in '{trimmed}'"))?;
        match key.trim().to_ascii_lowercase().as_str() {
            "win" => rewards.winning = value,
            "loss" => rewards.losing = value,
            "draw" => rewards.draw = value,
            "living" => rewards.living = value,
            other => {
                return Err(anyhow!(
                    "Unknown reward key '{other}'. Expected win, loss, draw, or living"
                ));
            }
        }
    }
    Ok(rewards)
}

fn parse_stopping_rule(s: &str) -> Result<StoppingRule> {
    match s.to_ascii_lowercase().as_str() {
        "positive" | "max-positive-change" => Ok(StoppingRule::MaxPositiveChange),
        "absolute" | "abs" | "max-absolute-change" => Ok(StoppingRule::MaxAbsoluteChange),
        other => Err(anyhow!(
            "Invalid stopping rule '{other}' (expected 'positive' or 'absolute')"
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reward_overrides_keep_unlisted_keys() {
        let rewards = parse_rewards("win=10, living=-0.5", RewardConfig::default()).unwrap();
        assert_eq!(rewards, RewardConfig::new(10.0, -1.0, 0.0, -0.5));
        assert!(parse_rewards("tie=1", RewardConfig::default()).is_err());
        assert!(parse_rewards("win", RewardConfig::default()).is_err());
    }

    #[test]
    fn test_flags_override_defaults() {
        let args = SolverArgs {
            agent: Some(Player::O),
            stopping_rule: Some("absolute".into()),
            seed: Some(9),
            ..SolverArgs::default()
        };
        let config = args.resolve().unwrap();
        assert_eq!(config.mdp.agent, Player::O);
        assert_eq!(
            config.policy_iteration.stopping_rule,
            StoppingRule::MaxAbsoluteChange
        );
        assert_eq!(config.q_learning.seed, Some(9));
    }

    #[test]
    fn test_config_file_then_flags() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("solver.json");
        std::fs::write(&path, r#"{ "mdp": { "discount": 0.5 }, "value_iteration": { "sweeps": 3 } }"#)
            .unwrap();
        let args = SolverArgs {
            config: Some(path),
            sweeps: Some(4),
            ..SolverArgs::default()
        };
        let config = args.resolve().unwrap();
        assert_eq!(config.mdp.discount, 0.5);
        assert_eq!(config.value_iteration.sweeps, 4);
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let args = SolverArgs {
            discount: Some(1.5),
            ..SolverArgs::default()
        };
        assert!(args.resolve().is_err());
    }
}
