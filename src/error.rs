//! Error types for maze compilation, validation and persistence

use thiserror::Error;

use crate::grid::GridPos;

/// Everything that can go wrong between a camera frame and an accepted maze.
///
/// None of these abort the caller: a rejected frame is simply dropped and the
/// next one is tried.
#[derive(Error, Debug)]
pub enum MazeError {
    #[error("Malformed grid: {0}")]
    MalformedGrid(String),

    #[error("Found {found} entrances, requires at least {required}")]
    TooFewEntrances { found: usize, required: usize },

    #[error("No path between entrances {from} and {to}")]
    Disconnected { from: GridPos, to: GridPos },

    #[error("Path step {from} -> {to} has no real coordinates")]
    UnmappedPathStep { from: GridPos, to: GridPos },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),
}

impl MazeError {
    /// True for failures that mean "this frame showed a bad maze, keep scanning"
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            MazeError::MalformedGrid(_)
                | MazeError::TooFewEntrances { .. }
                | MazeError::Disconnected { .. }
                | MazeError::UnmappedPathStep { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, MazeError>;
