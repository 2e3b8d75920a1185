//! Errors raised by the grid world.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridError {
    /// `spawn_food` was asked to place food on a board the snake fills.
    #[error("no free cell left for food on a {columns}x{rows} grid")]
    NoFreeCell { columns: i32, rows: i32 },

    #[error(
        "invalid grid {width}x{height} with cell size {cell_size}: \
         dimensions must be positive multiples of the cell size"
    )]
    InvalidGeometry { width: i32, height: i32, cell_size: i32 },

    #[error("invalid speed curve: {0}")]
    InvalidSpeedCurve(&'static str),
}
