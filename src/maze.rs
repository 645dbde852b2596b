use std::sync::Arc;

use crate::compiler::CompiledMaze;
use crate::config::SearchConfig;
use crate::graph::MazeGraph;
use crate::grid::GridPos;
use crate::lattice::{FrameSize, LatticeMap, PlacedItem, RealPos};
use crate::pathfinding::{find_path_with, Route};

/// An accepted maze as seen by the gameplay layer: the shared compiled graph
/// plus the lattice that maps it onto the current camera frame
#[derive(Debug, Clone)]
pub struct Maze {
    compiled: Arc<CompiledMaze>,
    lattice: LatticeMap,
    search: SearchConfig,
}

impl Maze {
    pub fn new(compiled: Arc<CompiledMaze>, lattice: LatticeMap) -> Self {
        Maze {
            compiled,
            lattice,
            search: SearchConfig::default(),
        }
    }

    pub fn with_search(mut self, search: SearchConfig) -> Self {
        self.search = search;
        self
    }

    pub fn compiled(&self) -> &Arc<CompiledMaze> {
        &self.compiled
    }

    pub fn graph(&self) -> &MazeGraph {
        &self.compiled.graph
    }

    pub fn entrances(&self) -> &[GridPos] {
        &self.compiled.entrances
    }

    pub fn items(&self) -> &[PlacedItem] {
        &self.compiled.items
    }

    pub fn lattice(&self) -> &LatticeMap {
        &self.lattice
    }

    /// Grid to real coordinates, None if outside the lattice
    pub fn real_position(&self, pos: GridPos) -> Option<RealPos> {
        self.lattice.cell_to_real(pos)
    }

    /// Shortest route between two graph nodes, None if unreachable
    pub fn find_path(&self, start: GridPos, goal: GridPos) -> Option<Route> {
        find_path_with(&self.compiled.graph, start, goal, &self.search).route
    }

    /// Real-coordinate polyline for a route, None if any node is unmapped
    pub fn route_to_real(&self, route: &Route) -> Option<Vec<RealPos>> {
        route
            .nodes
            .iter()
            .map(|&pos| self.real_position(pos))
            .collect()
    }

    /// Follow the physical maze after it moved or was resized in the frame
    pub fn rescale(&mut self, from: FrameSize, to: FrameSize) {
        self.lattice = self.lattice.rescaled(from, to);
    }
}
