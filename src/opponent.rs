//! Opponent models
//!
//! The opponent is folded into the environment: the MDP asks for the full
//! reply distribution, the simulated environment samples one reply from it.
//! Randomness always comes from a generator supplied by the caller, so tests
//! can substitute seeded or deterministic sources without touching agent code.

use std::fmt;
use std::str::FromStr;

use rand::{Rng, RngCore, seq::IndexedRandom};
use serde::{Deserialize, Serialize};

use crate::{
    Error, Result,
    tictactoe::{BoardState, Move},
};

/// Behaviour of the player the agent is trained against
pub trait Opponent {
    fn name(&self) -> &str;

    /// Probability of each reply in `state`, in legal-action order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TerminalState`] if the game is already over.
    fn reply_distribution(&self, state: &BoardState) -> Result<Vec<(Move, f64)>>;

    /// Sample one reply from [`Opponent::reply_distribution`]
    fn choose_reply(&self, state: &BoardState, rng: &mut dyn RngCore) -> Result<Move> {
        let distribution = self.reply_distribution(state)?;
        let ticket: f64 = rng.random();
        let mut cumulative = 0.0;
        for &(mv, probability) in &distribution {
            cumulative += probability;
            if ticket < cumulative {
                return Ok(mv);
            }
        }
        distribution
            .last()
            .map(|&(mv, _)| mv)
            .ok_or_else(|| terminal(state))
    }
}

impl<O: Opponent + ?Sized> Opponent for Box<O> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn reply_distribution(&self, state: &BoardState) -> Result<Vec<(Move, f64)>> {
        (**self).reply_distribution(state)
    }

    fn choose_reply(&self, state: &BoardState, rng: &mut dyn RngCore) -> Result<Move> {
        (**self).choose_reply(state, rng)
    }
}

fn terminal(state: &BoardState) -> Error {
    Error::TerminalState {
        state: state.encode(),
    }
}

/// Opponent that plays uniformly at random among its legal replies
#[derive(Debug, Clone, Copy, Default)]
pub struct UniformOpponent;

impl Opponent for UniformOpponent {
    fn name(&self) -> &str {
        "uniform"
    }

    fn reply_distribution(&self, state: &BoardState) -> Result<Vec<(Move, f64)>> {
        let replies = state.legal_actions();
        if replies.is_empty() {
            return Err(terminal(state));
        }
        let probability = 1.0 / replies.len() as f64;
        Ok(replies.into_iter().map(|mv| (mv, probability)).collect())
    }

    fn choose_reply(&self, state: &BoardState, rng: &mut dyn RngCore) -> Result<Move> {
        state
            .legal_actions()
            .choose(rng)
            .copied()
            .ok_or_else(|| terminal(state))
    }
}

/// Deterministic opponent that always takes its first legal reply
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstLegalOpponent;

impl Opponent for FirstLegalOpponent {
    fn name(&self) -> &str {
        "first-legal"
    }

    fn reply_distribution(&self, state: &BoardState) -> Result<Vec<(Move, f64)>> {
        state
            .legal_actions()
            .first()
            .map(|&mv| vec![(mv, 1.0)])
            .ok_or_else(|| terminal(state))
    }
}

/// Selectable opponent kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OpponentKind {
    #[default]
    Uniform,
    FirstLegal,
}

impl OpponentKind {
    /// Creates a boxed opponent trait object from the kind
    pub fn into_boxed_opponent(self) -> Box<dyn Opponent> {
        match self {
            OpponentKind::Uniform => Box::new(UniformOpponent),
            OpponentKind::FirstLegal => Box::new(FirstLegalOpponent),
        }
    }
}

impl fmt::Display for OpponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            OpponentKind::Uniform => "uniform",
            OpponentKind::FirstLegal => "first-legal",
        })
    }
}

impl FromStr for OpponentKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "uniform" | "random" => Ok(OpponentKind::Uniform),
            "first-legal" | "first" => Ok(OpponentKind::FirstLegal),
            other => Err(Error::config(format!(
                "unknown opponent '{other}' (expected 'uniform' or 'first-legal')"
            ))),
        }
    }
}
