//! Grid-to-graph compiler.
//!
//! Every non-wall cell becomes a node. Straight two-neighbor cells are marked
//! as corridors and collapsed: each non-corridor node gets one edge per open
//! neighbor, pointing at the next non-corridor node down that corridor and
//! weighted by the number of steps taken.

use tracing::{debug, warn};

use crate::graph::{Edge, MazeGraph, Node};
use crate::grid::{Cell, GridPos, OccupancyGrid};
use crate::lattice::PlacedItem;

/// The compiled artifact: immutable once built and cached
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledMaze {
    pub graph: MazeGraph,
    pub entrances: Vec<GridPos>,
    pub items: Vec<PlacedItem>,
}

impl CompiledMaze {
    /// Number of entrances
    pub fn entrance_count(&self) -> usize {
        self.entrances.len()
    }
}

/// Compile an occupancy grid into a corridor-collapsed graph
pub fn compile(grid: &OccupancyGrid, items: Vec<PlacedItem>) -> CompiledMaze {
    let entrances = find_entrances(grid);

    if entrances.is_empty() {
        debug!(rows = grid.rows(), cols = grid.cols(), "no entrances, empty graph");
        return CompiledMaze {
            graph: MazeGraph::empty(grid.rows(), grid.cols()),
            entrances,
            items,
        };
    }

    let mut graph = materialize_nodes(grid);
    for &entrance in &entrances {
        if let Some(node) = graph.node_mut(entrance) {
            node.entrance = true;
            node.corridor = false;
        }
    }

    collapse_corridors(&mut graph);

    debug!(
        nodes = graph.len(),
        junctions = graph.junctions().count(),
        edges = graph.edge_count(),
        entrances = entrances.len(),
        "compiled maze graph"
    );

    CompiledMaze {
        graph,
        entrances,
        items,
    }
}

/// Open cells on the four border lines, in top, bottom, left, right scan order
pub fn find_entrances(grid: &OccupancyGrid) -> Vec<GridPos> {
    let last_row = grid.rows() - 1;
    let last_col = grid.cols() - 1;

    let top = (0..grid.cols()).map(|col| GridPos::new(0, col));
    let bottom = (0..grid.cols()).map(|col| GridPos::new(last_row, col));
    let left = (0..grid.rows()).map(|row| GridPos::new(row, 0));
    let right = (0..grid.rows()).map(|row| GridPos::new(row, last_col));

    let mut entrances: Vec<GridPos> = Vec::new();
    for pos in top.chain(bottom).chain(left).chain(right) {
        // A corner cell shows up in two scans
        if grid.get(pos) == Some(Cell::Open) && !entrances.contains(&pos) {
            entrances.push(pos);
        }
    }
    entrances
}

/// Create one node per non-wall cell with its neighbors and corridor flag
fn materialize_nodes(grid: &OccupancyGrid) -> MazeGraph {
    let mut graph = MazeGraph::empty(grid.rows(), grid.cols());

    for (pos, cell) in grid.iter() {
        if cell.is_wall() {
            continue;
        }

        let mut node = Node::new(cell, pos);
        node.nearby = grid.open_neighbors(pos);
        // Items are never corridors
        node.corridor = cell == Cell::Open && is_straight(pos, &node.nearby);
        graph.insert(node);
    }

    graph
}

/// Exactly two neighbors, both vertical or both horizontal
fn is_straight(pos: GridPos, nearby: &[GridPos]) -> bool {
    if nearby.len() != 2 {
        return false;
    }
    let verticals = nearby.iter().filter(|p| p.col == pos.col).count();
    verticals == 2 || verticals == 0
}

fn collapse_corridors(graph: &mut MazeGraph) {
    let origins: Vec<(GridPos, Vec<GridPos>)> = graph
        .junctions()
        .map(|n| (n.pos, n.nearby.clone()))
        .collect();

    // A straight corridor cannot be longer than the grid's larger side
    let max_steps = graph.rows().max(graph.cols());

    for (origin, nearby) in origins {
        let mut edges = Vec::with_capacity(nearby.len());
        for first in nearby {
            match walk_corridor(graph, origin, first, max_steps) {
                Some(edge) => edges.push(edge),
                None => warn!(%origin, %first, "corridor walk did not reach a junction"),
            }
        }
        if let Some(node) = graph.node_mut(origin) {
            node.edges = edges;
        }
    }
}

/// Follow a corridor from `origin` through `first` until a non-corridor node
fn walk_corridor(graph: &MazeGraph, origin: GridPos, first: GridPos, max_steps: usize) -> Option<Edge> {
    let mut previous = origin;
    let mut current = graph.node(first)?;
    let mut distance = 1u32;

    while current.corridor {
        if distance as usize > max_steps {
            return None;
        }
        let next = current.nearby.iter().copied().find(|&p| p != previous)?;
        previous = current.pos;
        current = graph.node(next)?;
        distance += 1;
    }

    Some(Edge {
        to: current.pos,
        distance,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_straight_detection() {
        let pos = GridPos::new(2, 2);
        assert!(is_straight(pos, &[GridPos::new(1, 2), GridPos::new(3, 2)]));
        assert!(is_straight(pos, &[GridPos::new(2, 1), GridPos::new(2, 3)]));
        assert!(!is_straight(pos, &[GridPos::new(1, 2), GridPos::new(2, 3)]));
        assert!(!is_straight(pos, &[GridPos::new(1, 2)]));
    }

    #[test]
    fn test_corner_cell_listed_once() {
        let grid: OccupancyGrid = "..#\n#.#\n###".parse().unwrap();
        let entrances = find_entrances(&grid);
        assert_eq!(entrances, vec![GridPos::new(0, 0), GridPos::new(0, 1)]);
    }
}
