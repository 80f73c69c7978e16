//! Subcommands of the `ttt-mdp` binary

pub mod compare;
pub mod train;

use anyhow::Result;
use clap::ValueEnum;

use crate::{
    cli::output::ProgressObserver,
    config::SolverConfig,
    mdp::TicTacToeMdp,
    opponent::OpponentKind,
    policy_iteration::PolicyIterationAgent,
    ports::Solver,
    q_learning::QLearningAgent,
    tictactoe::{BoardState, Player},
    value_iteration::ValueIterationAgent,
};

/// Learning algorithm selectable on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Algorithm {
    PolicyIteration,
    ValueIteration,
    QLearning,
}

impl Algorithm {
    pub const ALL: [Algorithm; 3] = [
        Algorithm::PolicyIteration,
        Algorithm::ValueIteration,
        Algorithm::QLearning,
    ];
}

type BoxedSolver = Box<dyn Solver>;

/// Build and train one agent against `opponent`
pub fn train_solver(
    algorithm: Algorithm,
    config: &SolverConfig,
    opponent: OpponentKind,
    progress: bool,
) -> Result<BoxedSolver> {
    let mdp = TicTacToeMdp::with_opponent(config.mdp, opponent.into_boxed_opponent());
    let solver: BoxedSolver = match algorithm {
        Algorithm::PolicyIteration => {
            let mut agent = PolicyIterationAgent::with_mdp(mdp, config.policy_iteration)?;
            agent.train()?;
            Box::new(agent)
        }
        Algorithm::ValueIteration => {
            let mut agent = ValueIterationAgent::with_mdp(mdp, config.value_iteration)?;
            agent.train()?;
            Box::new(agent)
        }
        Algorithm::QLearning => {
            let mut agent = QLearningAgent::with_mdp(mdp, config.q_learning)?;
            if progress {
                agent.train_with_observer(&mut ProgressObserver::new("episodes"))?;
            } else {
                agent.train()?;
            }
            Box::new(agent)
        }
    };
    Ok(solver)
}

/// The first decision the agent faces: the empty board as X, or the reply to
/// a centre opening as O.
pub fn opening_state(agent: Player) -> Result<BoardState> {
    Ok(match agent {
        Player::X => BoardState::new(),
        Player::O => BoardState::new().play(4)?,
    })
}

/// Position the trained policy picks in `state`, if any
pub fn chosen_position(solver: &dyn Solver, state: &BoardState) -> Option<usize> {
    solver
        .policy()
        .and_then(|policy| policy.action_for(state))
        .map(|mv| mv.position)
}

