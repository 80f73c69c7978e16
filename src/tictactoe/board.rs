//! Board state representation and basic operations

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use super::{
    game::{GameStatus, Move},
    lines::LineAnalyzer,
};
use crate::Error;

/// A cell on the Tic-Tac-Toe board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cell {
    Empty,
    X,
    O,
}

impl Cell {
    pub fn to_char(self) -> char {
        match self {
            Cell::Empty => '.',
            Cell::X => 'X',
            Cell::O => 'O',
        }
    }

    pub fn from_char(c: char) -> Option<Cell> {
        match c {
            '.' | ' ' => Some(Cell::Empty),
            'X' | 'x' => Some(Cell::X),
            'O' | 'o' | '0' => Some(Cell::O),
            _ => None,
        }
    }
}

/// A player in the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Player {
    X,
    O,
}

impl Player {
    /// Get the opponent player
    pub fn opponent(self) -> Player {
        match self {
            Player::X => Player::O,
            Player::O => Player::X,
        }
    }

    /// Convert player to cell
    pub fn to_cell(self) -> Cell {
        match self {
            Player::X => Cell::X,
            Player::O => Cell::O,
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_cell().to_char())
    }
}

impl FromStr for Player {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "x" | "X" => Ok(Player::X),
            "o" | "O" => Ok(Player::O),
            other => Err(Error::config(format!(
                "unknown player '{other}' (expected 'x' or 'o')"
            ))),
        }
    }
}

/// Board contents plus the player to move.
///
/// Equality and hashing are structural, so two boards with identical cells and
/// turn are the same table key no matter how they were reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BoardState {
    pub cells: [Cell; 9],
    pub to_move: Player,
}

impl BoardState {
    /// Create a new empty board with X to move
    pub fn new() -> Self {
        Self::new_with_player(Player::X)
    }

    /// Create a new empty board with a specified player to move first
    pub fn new_with_player(first_player: Player) -> Self {
        BoardState {
            cells: [Cell::Empty; 9],
            to_move: first_player,
        }
    }

    /// Parse a board from 9 cell characters (whitespace ignored).
    ///
    /// An optional `_X`/`_O` suffix sets the player to move; without it the
    /// turn is inferred from the piece counts assuming X opened.
    ///
    /// # Errors
    ///
    /// Returns error if fewer than 9 cells are given, a character is not a
    /// cell, or the piece counts differ by more than one.
    pub fn from_string(s: &str) -> Result<Self, Error> {
        let cleaned: String = s.chars().filter(|c| !c.is_whitespace()).collect();
        let (board_part, suffix) = match cleaned.split_once('_') {
            Some((board, suffix)) => (board, Some(suffix)),
            None => (cleaned.as_str(), None),
        };

        let chars: Vec<char> = board_part.chars().collect();
        if chars.len() < 9 {
            return Err(Error::InvalidBoardLength {
                expected: 9,
                got: chars.len(),
                context: s.to_string(),
            });
        }

        let mut cells = [Cell::Empty; 9];
        for (i, &c) in chars.iter().take(9).enumerate() {
            cells[i] = Cell::from_char(c).ok_or_else(|| Error::InvalidCellCharacter {
                character: c,
                position: i,
                context: s.to_string(),
            })?;
        }

        let x_count = cells.iter().filter(|&&c| c == Cell::X).count();
        let o_count = cells.iter().filter(|&&c| c == Cell::O).count();
        if x_count.abs_diff(o_count) > 1 {
            return Err(Error::InvalidPieceCounts { x_count, o_count });
        }

        let to_move = match suffix {
            Some(player) => player.parse()?,
            None if x_count == o_count => Player::X,
            None if x_count == o_count + 1 => Player::O,
            None => return Err(Error::InvalidPieceCounts { x_count, o_count }),
        };

        Ok(BoardState { cells, to_move })
    }

    /// Get cell at position (0-8)
    pub fn get(&self, pos: usize) -> Cell {
        self.cells[pos]
    }

    /// Check if a position is empty
    pub fn is_empty(&self, pos: usize) -> bool {
        self.cells[pos] == Cell::Empty
    }

    /// Get all empty positions
    pub fn empty_positions(&self) -> Vec<usize> {
        self.cells
            .iter()
            .enumerate()
            .filter(|&(_, &cell)| cell == Cell::Empty)
            .map(|(i, _)| i)
            .collect()
    }

    /// Count the number of occupied cells on the board
    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|&&c| c != Cell::Empty).count()
    }

    /// Legal actions in ascending cell order; empty iff the state is terminal
    pub fn legal_actions(&self) -> Vec<Move> {
        if self.is_terminal() {
            return Vec::new();
        }
        self.empty_positions()
            .into_iter()
            .map(|position| Move::new(position, self.to_move))
            .collect()
    }

    /// Whether `mv` is one of this state's legal actions
    pub fn is_legal(&self, mv: Move) -> bool {
        mv.position < 9
            && mv.player == self.to_move
            && self.is_empty(mv.position)
            && !self.is_terminal()
    }

    /// Apply a legal action and return the resulting state
    ///
    /// # Errors
    ///
    /// Returns [`Error::IllegalAction`] if `mv` is not legal here.
    #[must_use = "apply returns a new board state; the original is unchanged"]
    pub fn apply(&self, mv: Move) -> Result<BoardState, Error> {
        if !self.is_legal(mv) {
            return Err(Error::IllegalAction {
                position: mv.position,
                state: self.encode(),
            });
        }

        let mut next = *self;
        next.cells[mv.position] = mv.player.to_cell();
        next.to_move = self.to_move.opponent();
        Ok(next)
    }

    /// Place the mark of the player to move at `pos`
    #[must_use = "play returns a new board state; the original is unchanged"]
    pub fn play(&self, pos: usize) -> Result<BoardState, Error> {
        self.apply(Move::new(pos, self.to_move))
    }

    /// Check if a player has won
    pub fn has_won(&self, player: Player) -> bool {
        LineAnalyzer::has_won(&self.cells, player)
    }

    /// Get the winner if there is one
    pub fn winner(&self) -> Option<Player> {
        if self.has_won(Player::X) {
            Some(Player::X)
        } else if self.has_won(Player::O) {
            Some(Player::O)
        } else {
            None
        }
    }

    /// Check if the position is a draw (all cells filled, no winner)
    pub fn is_draw(&self) -> bool {
        !self.cells.contains(&Cell::Empty) && self.winner().is_none()
    }

    /// Check if the game is over (win or draw)
    pub fn is_terminal(&self) -> bool {
        self.winner().is_some() || !self.cells.contains(&Cell::Empty)
    }

    /// Classify the state from `perspective`'s point of view
    pub fn evaluate_outcome(&self, perspective: Player) -> GameStatus {
        match self.winner() {
            Some(winner) if winner == perspective => GameStatus::Win,
            Some(_) => GameStatus::Loss,
            None if self.is_draw() => GameStatus::Draw,
            None => GameStatus::Ongoing,
        }
    }

    /// Compact string key, e.g. `X...O...._X`
    pub fn encode(&self) -> String {
        format!(
            "{}_{}",
            self.cells.iter().map(|&c| c.to_char()).collect::<String>(),
            self.to_move
        )
    }
}

impl Default for BoardState {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for BoardState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, &cell) in self.cells.iter().enumerate() {
            write!(f, "{}", cell.to_char())?;
            if (i + 1).is_multiple_of(3) && i < 8 {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}
