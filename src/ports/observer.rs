//! Observer port - abstraction for watching episodic training
//!
//! Training loops report progress through this trait so that progress bars,
//! metrics or logging can be attached without coupling the agents to them.

use crate::{Result, tictactoe::GameStatus};

/// Observer for episodic training and play-out runs
///
/// The methods are called in the following order:
/// 1. `on_training_start(total_episodes)` - once at the beginning
/// 2. `on_episode_end(episode, status)` - after every episode
/// 3. `on_training_end()` - once at the end
///
/// # Examples
///
/// ```
/// use ttt_mdp::{ports::TrainingObserver, tictactoe::GameStatus};
///
/// #[derive(Default)]
/// struct WinCounter {
///     wins: usize,
/// }
///
/// impl TrainingObserver for WinCounter {
///     fn on_episode_end(&mut self, _episode: usize, status: GameStatus) -> ttt_mdp::Result<()> {
///         if status == GameStatus::Win {
///             self.wins += 1;
///         }
///         Ok(())
///     }
/// }
/// ```
pub trait TrainingObserver {
    /// Called before the first episode.
    ///
    /// # Default Implementation
    ///
    /// Does nothing.
    fn on_training_start(&mut self, _total_episodes: usize) -> Result<()> {
        Ok(())
    }

    /// Called after each episode with the final status from the agent's
    /// perspective.
    ///
    /// # Default Implementation
    ///
    /// Does nothing.
    fn on_episode_end(&mut self, _episode: usize, _status: GameStatus) -> Result<()> {
        Ok(())
    }

    /// Called after the last episode.
    ///
    /// # Default Implementation
    ///
    /// Does nothing.
    fn on_training_end(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Observer that ignores every event
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl TrainingObserver for NoopObserver {}
