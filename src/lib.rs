//! Tic-Tac-Toe as a Markov Decision Process
//!
//! This crate provides:
//! - A Tic-Tac-Toe board with legality, win and draw detection
//! - An MDP transition model with the opponent folded into the dynamics
//! - Policy Iteration and Value Iteration over the full state space
//! - Tabular Q-Learning against a simulated opponent
//! - A play-out harness for comparing the resulting policies

pub mod cli;
pub mod config;
pub mod error;
pub mod evaluation;
pub mod mdp;
pub mod opponent;
pub mod policy;
pub mod policy_iteration;
pub mod ports;
pub mod q_learning;
pub mod tictactoe;
pub mod utils;
pub mod value_iteration;

pub use config::{
    MdpConfig, PolicyIterationConfig, QLearningConfig, RewardConfig, SolverConfig, StoppingRule,
    ValueIterationConfig,
};
pub use error::{Error, Result};
pub use evaluation::{MatchSummary, play_out};
pub use mdp::{Outcome, TicTacToeMdp, TransitionProb};
pub use opponent::{FirstLegalOpponent, Opponent, OpponentKind, UniformOpponent};
pub use policy::{Policy, ValueFunction};
pub use policy_iteration::{PolicyIterationAgent, PolicyIterationStats};
pub use q_learning::{QLearningAgent, QLearningStats};
pub use value_iteration::ValueIterationAgent;
