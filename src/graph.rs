use serde::{Deserialize, Serialize};

use crate::grid::{Cell, GridPos};

/// Weighted edge between two non-corridor nodes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Edge {
    pub to: GridPos,
    /// Manhattan steps along the collapsed corridor, always >= 1
    pub distance: u32,
}

/// One graph node per non-wall grid cell
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    pub value: Cell,
    pub pos: GridPos,
    /// Exactly two open neighbors on the same axis. Items and entrances never are.
    pub corridor: bool,
    /// On the grid border
    pub entrance: bool,
    /// Adjacent non-wall cells (up, down, left, right order)
    pub nearby: Vec<GridPos>,
    /// Outgoing edges, only populated for non-corridor nodes
    pub edges: Vec<Edge>,
}

impl Node {
    pub fn new(value: Cell, pos: GridPos) -> Self {
        Node {
            value,
            pos,
            corridor: false,
            entrance: false,
            nearby: Vec::new(),
            edges: Vec::new(),
        }
    }

    pub fn is_item(&self) -> bool {
        self.value.is_item()
    }
}

/// Sparse node graph addressable by grid position
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MazeGraph {
    rows: usize,
    cols: usize,
    nodes: Vec<Option<Node>>,
}

impl MazeGraph {
    /// Graph of the given shape with no nodes
    pub fn empty(rows: usize, cols: usize) -> Self {
        MazeGraph {
            rows,
            cols,
            nodes: vec![None; rows * cols],
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    fn index(&self, pos: GridPos) -> Option<usize> {
        if pos.row < self.rows && pos.col < self.cols {
            Some(pos.row * self.cols + pos.col)
        } else {
            None
        }
    }

    /// Insert or replace the node at its position. Out-of-shape nodes are ignored.
    pub fn insert(&mut self, node: Node) {
        if let Some(id) = self.index(node.pos) {
            self.nodes[id] = Some(node);
        }
    }

    pub fn node(&self, pos: GridPos) -> Option<&Node> {
        self.index(pos).and_then(|id| self.nodes[id].as_ref())
    }

    pub(crate) fn node_mut(&mut self, pos: GridPos) -> Option<&mut Node> {
        match self.index(pos) {
            Some(id) => self.nodes[id].as_mut(),
            None => None,
        }
    }

    pub fn contains(&self, pos: GridPos) -> bool {
        self.node(pos).is_some()
    }

    /// All nodes, row-major
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter().flatten()
    }

    /// Non-corridor nodes: junctions, dead-ends, entrances and items
    pub fn junctions(&self) -> impl Iterator<Item = &Node> {
        self.nodes().filter(|n| !n.corridor)
    }

    pub fn len(&self) -> usize {
        self.nodes().count()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes().next().is_none()
    }

    /// Outgoing edges of a node, empty if the node is absent
    pub fn edges_of(&self, pos: GridPos) -> &[Edge] {
        self.node(pos).map(|n| n.edges.as_slice()).unwrap_or(&[])
    }

    pub fn edge_count(&self) -> usize {
        self.nodes().map(|n| n.edges.len()).sum()
    }

    /// Lightest direct edge between two nodes
    pub fn edge_weight(&self, from: GridPos, to: GridPos) -> Option<u32> {
        self.edges_of(from)
            .iter()
            .filter(|e| e.to == to)
            .map(|e| e.distance)
            .min()
    }
}
