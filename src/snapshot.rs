use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::compiler::CompiledMaze;
use crate::error::{MazeError, Result};
use crate::graph::{MazeGraph, Node};
use crate::grid::GridPos;
use crate::lattice::PlacedItem;

/// Largest grid a snapshot may describe
const MAX_SNAPSHOT_CELLS: usize = 1 << 24;

/// Debug snapshot of a compiled maze, for replaying pathfinding scenarios
/// without the vision pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MazeSnapshot {
    /// Grid dimensions
    pub rows: usize,
    pub cols: usize,
    pub entrances: Vec<GridPos>,
    pub items: Vec<PlacedItem>,
    /// Every node with its flags, neighbors and edges
    pub nodes: Vec<Node>,
}

impl MazeSnapshot {
    pub fn from_compiled(maze: &CompiledMaze) -> Self {
        MazeSnapshot {
            rows: maze.graph.rows(),
            cols: maze.graph.cols(),
            entrances: maze.entrances.clone(),
            items: maze.items.clone(),
            nodes: maze.graph.nodes().cloned().collect(),
        }
    }

    /// Rebuild the compiled maze. Fails on bad dimensions, a node outside the
    /// grid, a corridor carrying edges, a zero-weight edge or an edge pointing
    /// at a missing node.
    pub fn to_compiled(&self) -> Result<CompiledMaze> {
        self.check_dimensions()?;

        let mut graph = MazeGraph::empty(self.rows, self.cols);
        for node in &self.nodes {
            if node.pos.row >= self.rows || node.pos.col >= self.cols {
                return Err(MazeError::MalformedGrid(format!(
                    "Snapshot node {} outside {}x{} grid",
                    node.pos, self.rows, self.cols
                )));
            }
            if node.corridor && !node.edges.is_empty() {
                return Err(MazeError::MalformedGrid(format!(
                    "Snapshot corridor {} carries edges",
                    node.pos
                )));
            }
            if let Some(edge) = node.edges.iter().find(|e| e.distance == 0) {
                return Err(MazeError::MalformedGrid(format!(
                    "Snapshot edge {} -> {} has zero weight",
                    node.pos, edge.to
                )));
            }
            graph.insert(node.clone());
        }

        for node in graph.nodes() {
            if let Some(edge) = node.edges.iter().find(|e| !graph.contains(e.to)) {
                return Err(MazeError::MalformedGrid(format!(
                    "Snapshot edge {} -> {} points at a missing node",
                    node.pos, edge.to
                )));
            }
        }

        Ok(CompiledMaze {
            graph,
            entrances: self.entrances.clone(),
            items: self.items.clone(),
        })
    }

    fn check_dimensions(&self) -> Result<()> {
        let (rows, cols) = (self.rows, self.cols);
        if rows == 0 || cols == 0 || rows % 2 == 0 || cols % 2 == 0 {
            return Err(MazeError::MalformedGrid(format!(
                "Snapshot grid must have odd non-zero dimensions, got {}x{}",
                rows, cols
            )));
        }
        match rows.checked_mul(cols) {
            Some(cells) if cells <= MAX_SNAPSHOT_CELLS => Ok(()),
            _ => Err(MazeError::MalformedGrid(format!(
                "Snapshot grid {}x{} is too large",
                rows, cols
            ))),
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Save to file
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        fs::write(path, self.to_json()?)?;
        Ok(())
    }

    /// Load from file
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }
}
