//! ttt-mdp CLI - solve Tic-Tac-Toe as an MDP
//!
//! Trains Policy Iteration, Value Iteration or Q-Learning agents and plays
//! their policies out against an opponent. Set `RUST_LOG` or pass `-v` for
//! solver logs.

use anyhow::Result;
use clap::{Parser, Subcommand};
use ttt_mdp::cli::commands::{compare, train};

#[derive(Parser)]
#[command(name = "ttt-mdp")]
#[command(version, about = "Tic-Tac-Toe MDP solvers", long_about = None)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Train one agent and evaluate its policy
    Train(Box<train::TrainArgs>),

    /// Train all three agents and compare them side by side
    Compare(Box<compare::CompareArgs>),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    match cli.command {
        Commands::Train(args) => train::execute(*args),
        Commands::Compare(args) => compare::execute(*args),
    }
}
