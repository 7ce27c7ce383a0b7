//! Error types for the maze environment and agents

use thiserror::Error;

use crate::topology::Action;

/// Main error type for the crate
///
/// Every variant is recoverable: a failed [`step`](crate::env::Environment::step) leaves the
/// environment exactly as it was, so the caller may retry with a legal action.
#[derive(Error, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum Error {
    #[error("move not allowed: {action:?} is not legal from cell {cell}")]
    IllegalAction { cell: usize, action: Action },

    #[error("episode already over: goal reached at cell {cell}")]
    EpisodeOver { cell: usize },

    #[error("no cell at coordinates ({x}, {y})")]
    UnknownCoordinate { x: i32, y: i32 },

    #[error("cell index {cell} out of range for a maze of {n_cells} cells")]
    CellOutOfRange { cell: usize, n_cells: usize },

    #[error("two cells share coordinates ({x}, {y})")]
    DuplicateCell { x: i32, y: i32 },

    #[error("coordinates ({x}, {y}) lie outside the grid [0, {bound}]")]
    OutOfBounds { x: i32, y: i32, bound: i32 },

    #[error("({x}, {y}) is not the midpoint between two adjacent cells")]
    InvalidMidpoint { x: f64, y: f64 },

    #[error("maze size must be at least 1, got {size}")]
    InvalidSize { size: usize },

    #[error("invalid value for `{name}`: {value} (must be in the interval [{min}, {max}])")]
    InvalidParameter {
        name: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("invalid decay schedule: {0}")]
    InvalidDecay(&'static str),

    #[error("no legal action available from state {state}")]
    NoLegalAction { state: String },
}

/// Result alias used throughout the crate
pub type Result<T, E = Error> = std::result::Result<T, E>;
