//! Acceptance checks for a compiled maze.
//!
//! A failed check is not fatal: the caller drops the candidate and waits for
//! a better camera frame.

use tracing::{debug, info};

use crate::config::ValidationConfig;
use crate::error::{MazeError, Result};
use crate::maze::Maze;

/// Accept or reject a maze.
///
/// Requires `min_entrances` entrances, a route between the first two, and
/// real coordinates for every node on that route.
pub fn validate(maze: &Maze, config: &ValidationConfig) -> Result<()> {
    let entrances = maze.entrances();
    let required = config.min_entrances.max(2);

    if entrances.len() < required {
        info!(found = entrances.len(), required, "maze rejected: not enough entrances");
        return Err(MazeError::TooFewEntrances {
            found: entrances.len(),
            required,
        });
    }

    let (from, to) = (entrances[0], entrances[1]);
    let route = match maze.find_path(from, to) {
        Some(route) if route.nodes.len() >= 2 => route,
        _ => {
            info!(%from, %to, "maze rejected: entrances not connected");
            return Err(MazeError::Disconnected { from, to });
        }
    };

    for pair in route.nodes.windows(2) {
        let mapped = maze.real_position(pair[0]).is_some() && maze.real_position(pair[1]).is_some();
        if !mapped {
            info!(from = %pair[0], to = %pair[1], "maze rejected: path leaves the lattice");
            return Err(MazeError::UnmappedPathStep {
                from: pair[0],
                to: pair[1],
            });
        }
    }

    debug!(distance = route.distance, hops = route.hops(), "maze accepted");
    Ok(())
}
