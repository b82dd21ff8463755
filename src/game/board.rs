use std::fmt;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Board width and height
pub const BOARD_SIZE: usize = 15;
/// Row and column of the centre cell
pub const CENTER: usize = 7;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Hash, Eq, PartialEq, PartialOrd, Ord)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub const CENTER: Position = Position {
        row: CENTER,
        col: CENTER,
    };

    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    pub fn in_bounds(&self) -> bool {
        self.row < BOARD_SIZE && self.col < BOARD_SIZE
    }

    /// Move one cell along `axis`, forward or backward. `None` when stepping off the board.
    pub fn step(&self, axis: Axis, forward: bool) -> Option<Position> {
        let (row, col) = match (axis, forward) {
            (Axis::Horizontal, true) => (Some(self.row), self.col.checked_add(1)),
            (Axis::Horizontal, false) => (Some(self.row), self.col.checked_sub(1)),
            (Axis::Vertical, true) => (self.row.checked_add(1), Some(self.col)),
            (Axis::Vertical, false) => (self.row.checked_sub(1), Some(self.col)),
        };
        let next = Position::new(row?, col?);
        next.in_bounds().then_some(next)
    }

    /// Orthogonal neighbours that lie on the board
    pub fn neighbors(&self) -> impl Iterator<Item = Position> + '_ {
        [Axis::Horizontal, Axis::Vertical]
            .into_iter()
            .flat_map(move |axis| [self.step(axis, false), self.step(axis, true)])
            .flatten()
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Direction a word runs in
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    Horizontal,
    Vertical,
}

impl Axis {
    pub fn perpendicular(self) -> Axis {
        match self {
            Axis::Horizontal => Axis::Vertical,
            Axis::Vertical => Axis::Horizontal,
        }
    }
}

/// Premium square. Names on the wire are the Bulgarian board labels.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Eq, PartialEq)]
pub enum Multiplier {
    #[serde(rename = "ДБ")]
    DoubleLetter,
    #[serde(rename = "ТБ")]
    TripleLetter,
    #[serde(rename = "ДД")]
    DoubleWord,
    #[serde(rename = "ТД")]
    TripleWord,
}

impl Multiplier {
    pub fn letter_factor(self) -> u32 {
        match self {
            Multiplier::DoubleLetter => 2,
            Multiplier::TripleLetter => 3,
            _ => 1,
        }
    }

    pub fn word_factor(self) -> u32 {
        match self {
            Multiplier::DoubleWord => 2,
            Multiplier::TripleWord => 3,
            _ => 1,
        }
    }
}

const TRIPLE_WORD: &[(usize, usize)] = &[
    (0, 0), (0, 7), (0, 14),
    (7, 0), (7, 14),
    (14, 0), (14, 7), (14, 14),
];

// The centre star counts as a double word square
const DOUBLE_WORD: &[(usize, usize)] = &[
    (1, 1), (2, 2), (3, 3), (4, 4),
    (1, 13), (2, 12), (3, 11), (4, 10),
    (13, 1), (12, 2), (11, 3), (10, 4),
    (13, 13), (12, 12), (11, 11), (10, 10),
    (7, 7),
];

const TRIPLE_LETTER: &[(usize, usize)] = &[
    (1, 5), (1, 9),
    (5, 1), (5, 5), (5, 9), (5, 13),
    (9, 1), (9, 5), (9, 9), (9, 13),
    (13, 5), (13, 9),
];

const DOUBLE_LETTER: &[(usize, usize)] = &[
    (0, 3), (0, 11),
    (2, 6), (2, 8),
    (3, 0), (3, 7), (3, 14),
    (6, 2), (6, 6), (6, 8), (6, 12),
    (7, 3), (7, 11),
    (8, 2), (8, 6), (8, 8), (8, 12),
    (11, 0), (11, 7), (11, 14),
    (12, 6), (12, 8),
    (14, 3), (14, 11),
];

/// Fixed premium layout shared by every board
pub static BOARD_LAYOUT: Lazy<[[Option<Multiplier>; BOARD_SIZE]; BOARD_SIZE]> = Lazy::new(|| {
    let mut layout = [[None; BOARD_SIZE]; BOARD_SIZE];
    for (cells, multiplier) in [
        (TRIPLE_WORD, Multiplier::TripleWord),
        (DOUBLE_WORD, Multiplier::DoubleWord),
        (TRIPLE_LETTER, Multiplier::TripleLetter),
        (DOUBLE_LETTER, Multiplier::DoubleLetter),
    ] {
        for &(row, col) in cells {
            layout[row][col] = Some(multiplier);
        }
    }
    layout
});

/// A single physical tile. `id` is unique per tile, not per letter.
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq, Hash)]
pub struct Tile {
    pub id: String,
    pub letter: char,
    pub points: u32,
}

impl Tile {
    pub fn new(id: impl Into<String>, letter: char, points: u32) -> Self {
        Self {
            id: id.into(),
            letter,
            points,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Cell {
    pub row: usize,
    pub col: usize,
    pub multiplier: Option<Multiplier>,
    pub tile: Option<Tile>,
    /// Placed this turn and not yet committed
    pub is_new: bool,
}

impl Cell {
    pub fn is_occupied(&self) -> bool {
        self.tile.is_some()
    }

    pub fn is_committed(&self) -> bool {
        self.tile.is_some() && !self.is_new
    }

    pub fn position(&self) -> Position {
        Position::new(self.row, self.col)
    }
}

#[derive(Debug, Clone, Error, Eq, PartialEq)]
pub enum BoardError {
    #[error("position {0} is outside the board")]
    OutOfBounds(Position),
    #[error("cell {0} is already occupied")]
    Occupied(Position),
    #[error("cell {0} holds no tile placed this turn")]
    NotNew(Position),
    #[error("committed tile at {0} was changed")]
    CommittedTileChanged(Position),
    #[error("board must be {size}x{size}", size = BOARD_SIZE)]
    BadDimensions,
    #[error("cell at index {0} reports a different position")]
    MisplacedCell(Position),
}

/// The 15x15 playing surface.
///
/// A board is a plain value: evaluating a move only borrows it, and each
/// commit bumps `version` so callers can tell board generations apart.
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
#[serde(try_from = "BoardRepr")]
pub struct Board {
    version: u64,
    cells: Vec<Vec<Cell>>,
}

#[derive(Deserialize)]
struct BoardRepr {
    #[serde(default)]
    version: u64,
    cells: Vec<Vec<Cell>>,
}

impl TryFrom<BoardRepr> for Board {
    type Error = BoardError;

    fn try_from(repr: BoardRepr) -> Result<Self, Self::Error> {
        if repr.cells.len() != BOARD_SIZE || repr.cells.iter().any(|r| r.len() != BOARD_SIZE) {
            return Err(BoardError::BadDimensions);
        }
        for (row, cells) in repr.cells.iter().enumerate() {
            for (col, cell) in cells.iter().enumerate() {
                if cell.row != row || cell.col != col {
                    return Err(BoardError::MisplacedCell(Position::new(row, col)));
                }
            }
        }
        Ok(Board {
            version: repr.version,
            cells: repr.cells,
        })
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    /// Empty board with the standard premium layout
    pub fn new() -> Self {
        let cells = (0..BOARD_SIZE)
            .map(|row| {
                (0..BOARD_SIZE)
                    .map(|col| Cell {
                        row,
                        col,
                        multiplier: BOARD_LAYOUT[row][col],
                        tile: None,
                        is_new: false,
                    })
                    .collect()
            })
            .collect();

        Self { version: 0, cells }
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    /// Panics on an out-of-bounds position; callers hand in board coordinates only.
    pub fn cell(&self, pos: Position) -> &Cell {
        &self.cells[pos.row][pos.col]
    }

    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter().flatten()
    }

    pub fn is_occupied(&self, pos: Position) -> bool {
        self.cell(pos).is_occupied()
    }

    /// True once any move has been committed
    pub fn has_committed_tiles(&self) -> bool {
        self.cells().any(Cell::is_committed)
    }

    /// Positions of uncommitted tiles in row-major order
    pub fn new_tile_positions(&self) -> Vec<Position> {
        self.cells()
            .filter(|cell| cell.is_new && cell.is_occupied())
            .map(Cell::position)
            .collect()
    }

    /// Check that a tile could be dropped at `pos`
    pub fn check_vacant(&self, pos: Position) -> Result<(), BoardError> {
        if !pos.in_bounds() {
            return Err(BoardError::OutOfBounds(pos));
        }
        if self.is_occupied(pos) {
            return Err(BoardError::Occupied(pos));
        }
        Ok(())
    }

    /// Put a tile on the board as part of the current, uncommitted move
    pub fn place_tile(&mut self, pos: Position, tile: Tile) -> Result<(), BoardError> {
        self.check_vacant(pos)?;
        let cell = &mut self.cells[pos.row][pos.col];
        cell.tile = Some(tile);
        cell.is_new = true;
        Ok(())
    }

    /// Pick an uncommitted tile back up
    pub fn lift_tile(&mut self, pos: Position) -> Result<Tile, BoardError> {
        if !pos.in_bounds() {
            return Err(BoardError::OutOfBounds(pos));
        }
        let cell = &mut self.cells[pos.row][pos.col];
        if !cell.is_new {
            return Err(BoardError::NotNew(pos));
        }
        let tile = cell.tile.take().ok_or(BoardError::NotNew(pos))?;
        cell.is_new = false;
        Ok(tile)
    }

    /// Remove every uncommitted tile, returning them in row-major order
    pub fn recall(&mut self) -> Vec<Tile> {
        let mut recalled = Vec::new();
        for cell in self.cells.iter_mut().flatten() {
            if cell.is_new {
                cell.is_new = false;
                if let Some(tile) = cell.tile.take() {
                    recalled.push(tile);
                }
            }
        }
        recalled
    }

    /// Make the current move permanent. Returns how many tiles were committed.
    pub fn commit(&mut self) -> usize {
        let mut committed = 0;
        for cell in self.cells.iter_mut().flatten() {
            if cell.is_new {
                cell.is_new = false;
                committed += 1;
            }
        }
        if committed > 0 {
            self.version += 1;
        }
        committed
    }

    /// Rebuild the move that turns `self` (a committed board) into `next`.
    ///
    /// The result is `self` plus every tile that only `next` holds, marked as
    /// newly placed, ready for evaluation. Committed tiles may not move or change.
    pub fn placements_toward(&self, next: &Board) -> Result<Board, BoardError> {
        let mut candidate = self.clone();
        for (ours, theirs) in self.cells().zip(next.cells()) {
            let pos = ours.position();
            match (&ours.tile, &theirs.tile) {
                (Some(a), Some(b)) if a == b => {}
                (Some(_), _) => return Err(BoardError::CommittedTileChanged(pos)),
                (None, Some(tile)) => candidate.place_tile(pos, tile.clone())?,
                (None, None) => {}
            }
        }
        Ok(candidate)
    }
}
