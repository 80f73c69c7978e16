//! Train command - train one agent and play its policy out

use std::path::PathBuf;

use anyhow::{Result, anyhow};
use clap::Parser;

use crate::{
    cli::{
        commands::{Algorithm, chosen_position, opening_state, train_solver},
        config::SolverArgs,
        output::{ProgressObserver, format_number, format_percent, print_kv, print_section},
    },
    evaluation::{MatchSummary, play_out_with_observer},
    opponent::OpponentKind,
    ports::{NoopObserver, TrainingObserver},
    utils::derive_seed,
};

/// Seed stream for evaluation games, kept apart from training streams
pub(crate) const EVALUATION_STREAM: u64 = 3;

#[derive(Parser, Debug)]
#[command(about = "Train an agent", allow_negative_numbers = true)]
pub struct TrainArgs {
    /// Learning algorithm
    #[arg(value_enum)]
    pub algorithm: Algorithm,

    #[command(flatten)]
    pub solver: SolverArgs,

    /// Opponent to train and evaluate against (`uniform` or `first-legal`)
    #[arg(long, short = 'o', default_value_t = OpponentKind::Uniform)]
    pub opponent: OpponentKind,

    /// Number of evaluation games after training (0 skips evaluation)
    #[arg(long, short = 'g', default_value_t = 1000)]
    pub games: usize,

    /// Write the evaluation summary to this JSON file
    #[arg(long)]
    pub export: Option<PathBuf>,

    /// Hide progress bars
    #[arg(long, default_value_t = false)]
    pub no_progress: bool,
}

pub fn execute(args: TrainArgs) -> Result<()> {
    let config = args.solver.resolve()?;
    let progress = !args.no_progress;

    let solver = train_solver(args.algorithm, &config, args.opponent, progress)?;
    let policy = solver
        .policy()
        .ok_or_else(|| anyhow!("{} produced no policy", solver.name()))?;

    print_section(&format!("{} ({} vs {})", solver.name(), config.mdp.agent, args.opponent));
    let opening = opening_state(config.mdp.agent)?;
    print_kv("States", &format_number(solver.state_space().len()));
    print_kv("Policy entries", &format_number(policy.len()));
    match chosen_position(solver.as_ref(), &opening) {
        Some(position) => print_kv("Opening move", &position.to_string()),
        None => print_kv("Opening move", "none"),
    }
    if let Some(value) = solver.state_value(&opening) {
        print_kv("Opening value", &format!("{value:.4}"));
    }

    if args.games == 0 {
        return Ok(());
    }

    let mut progress_observer = ProgressObserver::new("games");
    let mut noop = NoopObserver;
    let observer: &mut dyn TrainingObserver = if progress {
        &mut progress_observer
    } else {
        &mut noop
    };
    let summary = play_out_with_observer(
        policy,
        &config.mdp,
        args.opponent.into_boxed_opponent(),
        args.games,
        derive_seed(config.q_learning.seed, EVALUATION_STREAM),
        observer,
    )?;
    print_summary(&summary);

    if let Some(path) = &args.export {
        summary.save(path)?;
        println!("\nSummary written to: {}", path.display());
    }
    Ok(())
}

pub(crate) fn print_summary(summary: &MatchSummary) {
    print_kv("Games", &format_number(summary.games));
    print_kv("Win rate", &format_percent(summary.win_rate));
    print_kv("Draw rate", &format_percent(summary.draw_rate));
    print_kv("Loss rate", &format_percent(summary.loss_rate));
}
