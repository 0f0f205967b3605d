//! Tic-tac-toe rules engine and minimax opponent.
//!
//! # Board Layout
//!
//! ```text
//! Cell indices (row-major order):
//!   (0,0)=0  (0,1)=1  (0,2)=2
//!   (1,0)=3  (1,1)=4  (1,2)=5
//!   (2,0)=6  (2,1)=7  (2,2)=8
//! ```
//!
//! External input addresses cells by the 0-based index above. The [`Game`]
//! wraps a [`Board`] with a move counter; whose turn it is follows from the
//! counter's parity. The [`ai`] module searches the complete game tree on
//! copies of a game and never touches the caller's instance.

pub mod ai;

#[cfg(feature = "wasm")]
pub mod wasm;

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use ai::{Ai, MoveEvaluation, Search};

/// Occupant of a cell, or the player to move.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum Player {
    /// Empty cell marker.
    #[default]
    None = 0,
    /// First mover.
    One = 1,
    /// Second mover.
    Two = 2,
}

impl Player {
    /// Get the opponent player. `None` has no opponent and maps to itself.
    #[inline]
    pub fn opponent(self) -> Player {
        match self {
            Player::One => Player::Two,
            Player::Two => Player::One,
            Player::None => Player::None,
        }
    }

    /// Display glyph: `X`, `O`, or a space for an empty cell.
    #[inline]
    pub fn glyph(self) -> char {
        match self {
            Player::One => 'X',
            Player::Two => 'O',
            Player::None => ' ',
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.glyph())
    }
}

/// Rejected coordinates or index.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Error)]
pub enum InvalidPosition {
    #[error("invalid position: ({row}, {col})")]
    Coordinates { row: i32, col: i32 },
    #[error("invalid index: {0}")]
    Index(i32),
}

/// Address of a cell on the board.
///
/// The fields are public so a caller can hold any pair of coordinates;
/// [`Position::is_valid`] tells whether it actually lands on the board, and
/// the board ignores positions that don't.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
pub struct Position {
    pub row: u8,
    pub col: u8,
}

impl Position {
    /// Create a position from row and column, each in `[0, 2]`.
    pub fn at(row: i32, col: i32) -> Result<Position, InvalidPosition> {
        if !(0..3).contains(&row) || !(0..3).contains(&col) {
            return Err(InvalidPosition::Coordinates { row, col });
        }
        Ok(Position {
            row: row as u8,
            col: col as u8,
        })
    }

    /// Create a position from a row-major index in `[0, 8]`.
    pub fn from_index(index: i32) -> Result<Position, InvalidPosition> {
        if !(0..9).contains(&index) {
            return Err(InvalidPosition::Index(index));
        }
        Ok(Position {
            row: (index / 3) as u8,
            col: (index % 3) as u8,
        })
    }

    /// Row-major index (0-8).
    #[inline]
    pub fn index(self) -> usize {
        self.row as usize * 3 + self.col as usize
    }

    /// Check if both coordinates are on the board.
    #[inline]
    pub fn is_valid(self) -> bool {
        self.row < 3 && self.col < 3
    }

    /// Iterate over all 9 positions in row-major order.
    pub fn all() -> impl Iterator<Item = Position> {
        (0..9u8).map(|i| Position { row: i / 3, col: i % 3 })
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

// ============================================================================
// BOARD
// ============================================================================

/// Result of evaluating a board.
///
/// `winner` is `Player::None` while the game is in progress and on a draw;
/// `ended` tells the two apart.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
pub struct GameState {
    pub winner: Player,
    pub ended: bool,
}

impl GameState {
    pub const IN_PROGRESS: GameState = GameState {
        winner: Player::None,
        ended: false,
    };

    pub const DRAW: GameState = GameState {
        winner: Player::None,
        ended: true,
    };

    #[inline]
    pub fn is_draw(self) -> bool {
        self.ended && self.winner == Player::None
    }
}

/// 3x3 grid of cell occupants, indexed `[row][col]`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default, Serialize, Deserialize)]
pub struct Board([[Player; 3]; 3]);

impl Board {
    /// The 8 winning lines, in the order they are checked:
    /// row 0, col 0, row 1, col 1, row 2, col 2, main diagonal, anti-diagonal.
    const WIN_LINES: [[(u8, u8); 3]; 8] = [
        [(0, 0), (0, 1), (0, 2)], // Row 0
        [(0, 0), (1, 0), (2, 0)], // Col 0
        [(1, 0), (1, 1), (1, 2)], // Row 1
        [(0, 1), (1, 1), (2, 1)], // Col 1
        [(2, 0), (2, 1), (2, 2)], // Row 2
        [(0, 2), (1, 2), (2, 2)], // Col 2
        [(0, 0), (1, 1), (2, 2)], // Main diagonal
        [(0, 2), (1, 1), (2, 0)], // Anti-diagonal
    ];

    /// Create an empty board.
    #[inline]
    pub fn new() -> Board {
        Board::default()
    }

    /// Build a board from 9 row-major cells.
    pub fn from_cells(cells: [Player; 9]) -> Board {
        let mut board = Board::new();
        for (i, player) in cells.into_iter().enumerate() {
            board.0[i / 3][i % 3] = player;
        }
        board
    }

    /// The 9 cells in row-major order.
    pub fn cells(&self) -> [Player; 9] {
        let mut cells = [Player::None; 9];
        for pos in Position::all() {
            cells[pos.index()] = self.at(pos);
        }
        cells
    }

    /// Get the occupant at a position. Invalid positions read as empty.
    #[inline]
    pub fn at(&self, pos: Position) -> Player {
        if !pos.is_valid() {
            return Player::None;
        }
        self.0[pos.row as usize][pos.col as usize]
    }

    /// Place a piece for `player` at `pos`.
    /// Returns false, leaving the board untouched, if the position is invalid
    /// or the cell is already occupied.
    pub fn place(&mut self, player: Player, pos: Position) -> bool {
        if !pos.is_valid() || self.at(pos) != Player::None {
            return false;
        }
        self.0[pos.row as usize][pos.col as usize] = player;
        true
    }

    /// Empty cells in row-major order.
    pub fn empty_cells(&self) -> impl Iterator<Item = Position> + '_ {
        Position::all().filter(move |&pos| self.at(pos) == Player::None)
    }

    /// Number of occupied cells.
    pub fn occupied(&self) -> usize {
        Position::all()
            .filter(|&pos| self.at(pos) != Player::None)
            .count()
    }

    /// Get the first completed line, if any.
    pub fn winning_line(&self) -> Option<[Position; 3]> {
        Self::WIN_LINES.iter().find_map(|line| {
            let [a, b, c] = line.map(|(row, col)| Position { row, col });
            let owner = self.at(a);
            if owner != Player::None && owner == self.at(b) && owner == self.at(c) {
                Some([a, b, c])
            } else {
                None
            }
        })
    }

    /// Evaluate the board.
    ///
    /// A completed line ends the game with its owner as the winner. Otherwise
    /// the game goes on while any cell is empty, and is a draw once none is.
    pub fn evaluate(&self) -> GameState {
        if let Some(line) = self.winning_line() {
            return GameState {
                winner: self.at(line[0]),
                ended: true,
            };
        }
        if self.empty_cells().next().is_some() {
            GameState::IN_PROGRESS
        } else {
            GameState::DRAW
        }
    }

    /// Convenience wrapper around [`Board::evaluate`].
    #[inline]
    pub fn has_ended(&self) -> bool {
        self.evaluate().ended
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (r, row) in self.0.iter().enumerate() {
            if r > 0 {
                writeln!(f)?;
            }
            write!(f, "{} {} {}", row[0], row[1], row[2])?;
        }
        Ok(())
    }
}

// ============================================================================
// GAME
// ============================================================================

/// A board plus the number of moves applied so far.
///
/// `turns` always equals the number of occupied cells, so the player to move
/// is a function of its parity. Copying a `Game` yields a fully independent
/// game; the search relies on this to explore branches.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default, Serialize)]
pub struct Game {
    board: Board,
    turns: u32,
}

impl Game {
    /// Create a new game with an empty board and the first mover to play.
    pub fn new() -> Game {
        Game::default()
    }

    #[inline]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[inline]
    pub fn turns(&self) -> u32 {
        self.turns
    }

    /// The player to move.
    #[inline]
    pub fn turn(&self) -> Player {
        if self.turns % 2 == 0 {
            Player::One
        } else {
            Player::Two
        }
    }

    /// Place a piece for the player to move.
    ///
    /// Fails on invalid or occupied positions. This does not check whether
    /// the game is already over: a won board with empty cells still accepts
    /// moves, so callers must consult [`Game::state`] first.
    pub fn make_move(&mut self, pos: Position) -> bool {
        if self.board.place(self.turn(), pos) {
            self.turns += 1;
            true
        } else {
            false
        }
    }

    /// Apply a move given as a 0-based row-major index.
    pub fn make_move_at_index(&mut self, index: i32) -> Result<bool, InvalidPosition> {
        let pos = Position::from_index(index)?;
        Ok(self.make_move(pos))
    }

    /// Current winner and whether the game has ended.
    #[inline]
    pub fn state(&self) -> GameState {
        self.board.evaluate()
    }
}

impl fmt::Display for Game {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "turn {}:\n{}", self.turns, self.board)
    }
}
