use thiserror::Error;

use crate::game::board::{Axis, Board, Position};

/// Geometric reasons a placement is illegal. Messages are shown to the player.
#[derive(Debug, Clone, Copy, Error, Eq, PartialEq)]
pub enum PlacementError {
    #[error("Не сте поставили плочки")]
    NoTiles,
    #[error("Плочките трябва да са на един ред или колона")]
    NotInLine,
    #[error("Има празнини между плочките")]
    Gap,
    #[error("Думата трябва да е свързана със съществуваща")]
    NotConnected,
    #[error("Първият ход трябва да минава през центъра")]
    MissedCenter,
}

pub struct PlacementValidator;

impl PlacementValidator {
    /// Check the geometry of the tiles placed this turn and return the axis
    /// the move runs along.
    ///
    /// Rules are applied in order and the first failure wins:
    /// - at least one tile
    /// - all tiles in one row or one column (a lone tile counts as horizontal)
    /// - no empty cell between the first and last tile
    /// - touches a committed tile, or covers the centre on the first move
    pub fn check(board: &Board, placed: &[Position]) -> Result<Axis, PlacementError> {
        let first = placed.first().ok_or(PlacementError::NoTiles)?;

        let axis = if placed.iter().all(|p| p.row == first.row) {
            Axis::Horizontal
        } else if placed.iter().all(|p| p.col == first.col) {
            Axis::Vertical
        } else {
            return Err(PlacementError::NotInLine);
        };

        if !Self::is_contiguous(board, placed, axis) {
            return Err(PlacementError::Gap);
        }

        if board.has_committed_tiles() {
            let connected = placed.iter().any(|pos| {
                pos.neighbors()
                    .any(|neighbor| board.cell(neighbor).is_committed())
            });
            if !connected {
                return Err(PlacementError::NotConnected);
            }
        } else if !placed.contains(&Position::CENTER) {
            return Err(PlacementError::MissedCenter);
        }

        Ok(axis)
    }

    /// Every cell between the outermost placed tiles must hold a tile,
    /// either new or committed.
    fn is_contiguous(board: &Board, placed: &[Position], axis: Axis) -> bool {
        let along = |pos: &Position| match axis {
            Axis::Horizontal => pos.col,
            Axis::Vertical => pos.row,
        };
        let (Some(min), Some(max)) = (placed.iter().map(along).min(), placed.iter().map(along).max())
        else {
            return false;
        };
        let fixed = placed[0];

        (min..=max).all(|i| {
            let pos = match axis {
                Axis::Horizontal => Position::new(fixed.row, i),
                Axis::Vertical => Position::new(i, fixed.col),
            };
            board.is_occupied(pos)
        })
    }
}
