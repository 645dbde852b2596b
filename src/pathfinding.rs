use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, HashSet};
use tracing::{debug, trace, warn};

use crate::config::SearchConfig;
use crate::graph::MazeGraph;
use crate::grid::GridPos;

/// How neighbors are relaxed during the search
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchMode {
    /// Standard A*: a node is expanded at most once
    #[default]
    ClosedSet,
    /// Never relax a neighbor whose best predecessor is the node being expanded.
    /// Only optimal on tree-shaped mazes.
    NoBacktrack,
}

/// A path through the compressed graph
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route {
    /// Start to goal, junction nodes only
    pub nodes: Vec<GridPos>,
    /// Sum of edge weights along the route
    pub distance: u32,
}

impl Route {
    pub fn start(&self) -> Option<GridPos> {
        self.nodes.first().copied()
    }

    pub fn goal(&self) -> Option<GridPos> {
        self.nodes.last().copied()
    }

    /// Number of edges travelled
    pub fn hops(&self) -> usize {
        self.nodes.len().saturating_sub(1)
    }

    /// Re-derive the route weight from the graph's edges.
    /// None if two consecutive nodes are not connected.
    pub fn weight_in(&self, graph: &MazeGraph) -> Option<u32> {
        self.nodes
            .windows(2)
            .map(|pair| graph.edge_weight(pair[0], pair[1]))
            .sum()
    }
}

/// Counters for one search call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SearchStats {
    /// Nodes whose edges were examined
    pub expanded: usize,
    /// Queue insertions
    pub pushed: usize,
    /// The expansion cap was hit before the queue ran dry
    pub truncated: bool,
}

#[derive(Debug, Clone)]
pub struct SearchOutcome {
    pub route: Option<Route>,
    pub stats: SearchStats,
}

/// Per-search bookkeeping, never stored on the graph
#[derive(Debug, Clone, Copy)]
struct SearchEntry {
    distance: u32,
    predecessor: Option<GridPos>,
}

/// Queue entry for the A* frontier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct QueueEntry {
    /// cumulative distance + heuristic
    priority: u32,
    cost: u32,
    pos: GridPos,
}

impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for QueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering for min-heap (BinaryHeap is max-heap by default)
        other
            .priority
            .cmp(&self.priority)
            // Tie-breaker: position, for deterministic ordering
            .then_with(|| other.pos.cmp(&self.pos))
            .then_with(|| other.cost.cmp(&self.cost))
    }
}

/// Shortest path between two graph nodes with the default search settings.
/// Returns None when there is no path or an endpoint is not a graph node.
pub fn find_path(graph: &MazeGraph, start: GridPos, goal: GridPos) -> Option<Route> {
    find_path_with(graph, start, goal, &SearchConfig::default()).route
}

/// Shortest path search with explicit settings, reporting search counters
pub fn find_path_with(
    graph: &MazeGraph,
    start: GridPos,
    goal: GridPos,
    config: &SearchConfig,
) -> SearchOutcome {
    let mut stats = SearchStats::default();

    if !graph.contains(start) || !graph.contains(goal) {
        debug!(%start, %goal, "endpoint not in graph, no path");
        return SearchOutcome { route: None, stats };
    }

    if start == goal {
        return SearchOutcome {
            route: Some(Route {
                nodes: vec![start],
                distance: 0,
            }),
            stats,
        };
    }

    let cap = config
        .max_expansions
        .unwrap_or_else(|| default_expansion_cap(graph));

    let mut state: HashMap<GridPos, SearchEntry> = HashMap::new();
    let mut closed: HashSet<GridPos> = HashSet::new();
    let mut queue: BinaryHeap<QueueEntry> = BinaryHeap::new();

    state.insert(
        start,
        SearchEntry {
            distance: 0,
            predecessor: None,
        },
    );
    queue.push(QueueEntry {
        priority: start.manhattan(&goal),
        cost: 0,
        pos: start,
    });
    stats.pushed += 1;

    let mut reached = false;

    while let Some(entry) = queue.pop() {
        if entry.pos == goal {
            reached = true;
            break;
        }

        let current = match state.get(&entry.pos) {
            Some(e) => e.distance,
            None => continue,
        };

        if config.mode == SearchMode::ClosedSet {
            // Skip stale queue entries and already expanded nodes
            if entry.cost > current || !closed.insert(entry.pos) {
                continue;
            }
        }

        if stats.expanded >= cap {
            stats.truncated = true;
            warn!(%start, %goal, cap, "search expansion cap reached, giving up");
            break;
        }
        stats.expanded += 1;

        trace!(pos = %entry.pos, distance = current, "expanding");

        for edge in graph.edges_of(entry.pos) {
            let skip = match config.mode {
                SearchMode::ClosedSet => closed.contains(&edge.to),
                SearchMode::NoBacktrack => state
                    .get(&edge.to)
                    .and_then(|e| e.predecessor)
                    .is_some_and(|p| p == entry.pos),
            };
            if skip {
                continue;
            }

            let tentative = current.saturating_add(edge.distance);
            let improves = match state.get(&edge.to) {
                Some(e) => tentative < e.distance,
                None => true,
            };

            if improves {
                state.insert(
                    edge.to,
                    SearchEntry {
                        distance: tentative,
                        predecessor: Some(entry.pos),
                    },
                );
                queue.push(QueueEntry {
                    priority: tentative.saturating_add(edge.to.manhattan(&goal)),
                    cost: tentative,
                    pos: edge.to,
                });
                stats.pushed += 1;
            }
        }
    }

    if !reached {
        debug!(%start, %goal, expanded = stats.expanded, "no path found");
        return SearchOutcome { route: None, stats };
    }

    let route = reconstruct(&state, start, goal);
    if let Some(ref r) = route {
        debug!(
            %start,
            %goal,
            distance = r.distance,
            nodes = r.nodes.len(),
            expanded = stats.expanded,
            "path found"
        );
    }

    SearchOutcome { route, stats }
}

/// Walk predecessor links back from the goal
fn reconstruct(state: &HashMap<GridPos, SearchEntry>, start: GridPos, goal: GridPos) -> Option<Route> {
    let distance = state.get(&goal)?.distance;
    let mut nodes = vec![goal];
    let mut current = goal;

    while current != start {
        // A chain longer than the state table means the links loop
        if nodes.len() > state.len() {
            warn!(%start, %goal, "predecessor chain loops, discarding path");
            return None;
        }
        current = state.get(&current)?.predecessor?;
        nodes.push(current);
    }

    nodes.reverse();
    Some(Route { nodes, distance })
}

fn default_expansion_cap(graph: &MazeGraph) -> usize {
    let junctions = graph.junctions().count();
    junctions.saturating_mul(junctions).max(64)
}

/// Format a route for display
pub fn format_route(route: &Route) -> String {
    if route.nodes.is_empty() {
        return "No path".to_string();
    }

    let mut result = String::new();
    for (i, pos) in route.nodes.iter().enumerate() {
        if i > 0 {
            result.push_str(" -> ");
        }
        result.push_str(&pos.to_string());
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_queue_pops_lowest_priority_first() {
        let mut queue = BinaryHeap::new();
        for (priority, row) in [(7, 1), (3, 2), (5, 3), (3, 0)] {
            queue.push(QueueEntry {
                priority,
                cost: 0,
                pos: GridPos::new(row, 0),
            });
        }
        let order: Vec<usize> = std::iter::from_fn(|| queue.pop()).map(|e| e.pos.row).collect();
        // Equal priorities fall back to the smaller position
        assert_eq!(order, vec![0, 2, 3, 1]);
    }

    #[test]
    fn test_reconstruct_detects_loops() {
        let a = GridPos::new(0, 1);
        let b = GridPos::new(1, 1);
        let c = GridPos::new(1, 3);
        let mut state = HashMap::new();
        state.insert(b, SearchEntry { distance: 1, predecessor: Some(c) });
        state.insert(c, SearchEntry { distance: 3, predecessor: Some(b) });

        assert_eq!(reconstruct(&state, a, c), None);
    }

    #[test]
    fn test_expansion_cap_floor() {
        let graph = MazeGraph::empty(3, 3);
        assert_eq!(default_expansion_cap(&graph), 64);
    }
}
