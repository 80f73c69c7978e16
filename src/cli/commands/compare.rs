//! Compare command - train all three agents on the same MDP side by side

use std::{fs::File, path::PathBuf};

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use serde::Serialize;

use crate::{
    cli::{
        commands::{Algorithm, chosen_position, opening_state, train::EVALUATION_STREAM, train_solver},
        config::SolverArgs,
        output::{format_percent, print_section},
    },
    evaluation::{MatchSummary, play_out},
    opponent::OpponentKind,
    utils::derive_seed,
};

#[derive(Parser, Debug)]
#[command(about = "Compare Policy Iteration, Value Iteration and Q-Learning", allow_negative_numbers = true)]
pub struct CompareArgs {
    #[command(flatten)]
    pub solver: SolverArgs,

    /// Opponent to train and evaluate against
    #[arg(long, short = 'o', default_value_t = OpponentKind::Uniform)]
    pub opponent: OpponentKind,

    /// Evaluation games per agent
    #[arg(long, short = 'g', default_value_t = 1000)]
    pub games: usize,

    /// Write the comparison rows to this JSON file
    #[arg(long)]
    pub export: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct ComparisonRow {
    algorithm: String,
    opening_move: Option<usize>,
    opening_value: Option<f64>,
    summary: MatchSummary,
}

pub fn execute(args: CompareArgs) -> Result<()> {
    let config = args.solver.resolve()?;
    let opening = opening_state(config.mdp.agent)?;
    let seed = derive_seed(config.q_learning.seed, EVALUATION_STREAM);

    let mut rows = Vec::with_capacity(Algorithm::ALL.len());
    for algorithm in Algorithm::ALL {
        let solver = train_solver(algorithm, &config, args.opponent, false)?;
        let policy = solver
            .policy()
            .ok_or_else(|| anyhow!("{} produced no policy", solver.name()))?;
        let summary = play_out(
            policy,
            &config.mdp,
            args.opponent.into_boxed_opponent(),
            args.games,
            seed,
        )?;
        rows.push(ComparisonRow {
            algorithm: solver.name().to_string(),
            opening_move: chosen_position(solver.as_ref(), &opening),
            opening_value: solver.state_value(&opening),
            summary,
        });
    }

    print_section(&format!(
        "Agent {} vs {} opponent, {} games each",
        config.mdp.agent, args.opponent, args.games
    ));
    println!(
        "  {:18} {:>8} {:>8} {:>8} {:>8} {:>8}",
        "Algorithm", "Opening", "Value", "Win", "Draw", "Loss"
    );
    for row in &rows {
        println!(
            "  {:18} {:>8} {:>8} {:>8} {:>8} {:>8}",
            row.algorithm,
            row.opening_move.map_or_else(|| "-".to_string(), |p| p.to_string()),
            row.opening_value.map_or_else(|| "-".to_string(), |v| format!("{v:.4}")),
            format_percent(row.summary.win_rate),
            format_percent(row.summary.draw_rate),
            format_percent(row.summary.loss_rate),
        );
    }

    if let Some(path) = &args.export {
        let file =
            File::create(path).with_context(|| format!("creating {}", path.display()))?;
        serde_json::to_writer_pretty(file, &rows)?;
        println!("\nResults exported to: {}", path.display());
    }
    Ok(())
}
