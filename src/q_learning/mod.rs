//! Model-free Q-learning
//!
//! Unlike the dynamic programming agents, Q-learning never reads the
//! transition model. It plays episodes in a simulated [`Environment`] that
//! samples opponent replies, and updates a tabular Q-function from each
//! observed `(s, a, r, s')`.
//!
//! ## Usage Example
//!
//! ```no_run
//! use ttt_mdp::config::{MdpConfig, QLearningConfig};
//! use ttt_mdp::q_learning::QLearningAgent;
//! use ttt_mdp::tictactoe::BoardState;
//!
//! let config = QLearningConfig::default()
//!     .with_alpha(0.2)
//!     .with_epsilon(0.2)
//!     .with_episodes(30_000)
//!     .with_seed(42);
//! let mut agent = QLearningAgent::new(MdpConfig::default(), config)?;
//! agent.train()?;
//! let opening = agent.policy().and_then(|p| p.action_for(&BoardState::new()));
//! println!("opening move: {opening:?}");
//! # Ok::<(), ttt_mdp::Error>(())
//! ```

pub mod agent;
pub mod environment;
pub mod q_table;

pub use agent::{QLearningAgent, QLearningStats};
pub use environment::Environment;
pub use q_table::QTable;
