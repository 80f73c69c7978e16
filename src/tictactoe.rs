//! Tic-Tac-Toe game model

pub mod board;
pub mod game;
pub mod lines;
pub mod state_space;

pub use board::{BoardState, Cell, Player};
pub use game::{GameStatus, Move};
pub use lines::{LineAnalyzer, WINNING_LINES};
pub use state_space::StateSpace;
