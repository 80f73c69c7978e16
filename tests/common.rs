//! Common test utilities for the ttt-mdp test suite.
//!
//! Builders for trained agents and a few assertions shared across the
//! integration tests.

#![allow(dead_code)]

use ttt_mdp::{
    MdpConfig, PolicyIterationAgent, PolicyIterationConfig, QLearningAgent, QLearningConfig,
    StoppingRule, ValueIterationAgent, ValueIterationConfig,
    tictactoe::{BoardState, Move, Player},
};

/// Optimal value of the empty board for X against a uniform opponent with
/// γ = 0.9 and rewards 1/-1/0/0
pub const OPTIMAL_EMPTY_BOARD_VALUE: f64 = 0.7927;

pub const CORNERS: [usize; 4] = [0, 2, 6, 8];

pub fn is_corner(position: usize) -> bool {
    CORNERS.contains(&position)
}

/// Policy Iteration trained to tight convergence under `rule`
pub fn trained_policy_iteration(rule: StoppingRule, seed: u64) -> PolicyIterationAgent {
    let config = PolicyIterationConfig::default()
        .with_delta(1e-9)
        .with_stopping_rule(rule)
        .with_seed(seed);
    let mut agent = PolicyIterationAgent::new(MdpConfig::default(), config).unwrap();
    agent.train().unwrap();
    agent
}

/// Value Iteration with the default ten sweeps
pub fn trained_value_iteration() -> ValueIterationAgent {
    let mut agent =
        ValueIterationAgent::new(MdpConfig::default(), ValueIterationConfig::default()).unwrap();
    agent.train().unwrap();
    agent
}

/// Q-Learning with the default α, ε and episode budget
pub fn trained_q_learning(seed: u64) -> QLearningAgent {
    let config = QLearningConfig::default().with_seed(seed);
    let mut agent = QLearningAgent::new(MdpConfig::default(), config).unwrap();
    agent.train().unwrap();
    agent
}

pub fn x_move(position: usize) -> Move {
    Move::new(position, Player::X)
}

pub fn board(s: &str) -> BoardState {
    BoardState::from_string(s).unwrap()
}

pub fn assert_close(actual: f64, expected: f64, tolerance: f64) {
    assert!(
        (actual - expected).abs() <= tolerance,
        "expected {expected} ± {tolerance}, got {actual}"
    );
}
