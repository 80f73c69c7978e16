//! Evaluate a trained policy by playing it out against an opponent

use std::{fs::File, path::Path};

use serde::{Deserialize, Serialize};

use crate::{
    Error, Result,
    config::MdpConfig,
    mdp::TicTacToeMdp,
    opponent::Opponent,
    policy::Policy,
    ports::{NoopObserver, TrainingObserver},
    q_learning::Environment,
    tictactoe::GameStatus,
    utils::rate,
};

/// Result of a play-out run, from the agent's perspective
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchSummary {
    pub games: usize,
    pub wins: usize,
    pub draws: usize,
    pub losses: usize,
    pub win_rate: f64,
    pub draw_rate: f64,
    pub loss_rate: f64,
}

impl MatchSummary {
    pub fn new(games: usize, wins: usize, draws: usize, losses: usize) -> Self {
        Self {
            games,
            wins,
            draws,
            losses,
            win_rate: rate(wins, games),
            draw_rate: rate(draws, games),
            loss_rate: rate(losses, games),
        }
    }

    /// Save the summary as pretty-printed JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|source| Error::Io {
            operation: format!("create {}", path.display()),
            source,
        })?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| Error::Io {
            operation: format!("open {}", path.display()),
            source,
        })?;
        Ok(serde_json::from_reader(file)?)
    }
}

/// Play `games` games following `policy` greedily against `opponent`.
///
/// # Errors
///
/// [`Error::MissingPolicyAction`] if the game reaches a state the policy does
/// not cover.
pub fn play_out<O: Opponent>(
    policy: &Policy,
    mdp: &MdpConfig,
    opponent: O,
    games: usize,
    seed: Option<u64>,
) -> Result<MatchSummary> {
    play_out_with_observer(policy, mdp, opponent, games, seed, &mut NoopObserver)
}

/// [`play_out`], reporting every finished game to `observer`
pub fn play_out_with_observer<O: Opponent>(
    policy: &Policy,
    mdp: &MdpConfig,
    opponent: O,
    games: usize,
    seed: Option<u64>,
    observer: &mut dyn TrainingObserver,
) -> Result<MatchSummary> {
    let mut env = Environment::new(TicTacToeMdp::with_opponent(*mdp, opponent), seed)?;
    let (mut wins, mut draws, mut losses) = (0, 0, 0);
    observer.on_training_start(games)?;

    for game in 1..=games {
        let mut state = env.reset()?;
        while !state.is_terminal() {
            let action = policy
                .action_for(&state)
                .ok_or_else(|| Error::MissingPolicyAction {
                    state: state.encode(),
                })?;
            state = env.step(action)?.next;
        }

        let status = state.evaluate_outcome(mdp.agent);
        match status {
            GameStatus::Win => wins += 1,
            GameStatus::Draw => draws += 1,
            GameStatus::Loss => losses += 1,
            GameStatus::Ongoing => {}
        }
        observer.on_episode_end(game, status)?;
    }

    observer.on_training_end()?;
    let summary = MatchSummary::new(games, wins, draws, losses);
    log::info!(
        "played {games} games: {:.1}% wins, {:.1}% draws, {:.1}% losses",
        summary.win_rate * 100.0,
        summary.draw_rate * 100.0,
        summary.loss_rate * 100.0
    );
    Ok(summary)
}
