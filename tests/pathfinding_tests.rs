mod common;

use common::*;
use maze_graph::config::SearchConfig;
use maze_graph::pathfinding::{find_path_with, format_route};
use maze_graph::{compile, find_path, GridPos, SearchMode};

fn p(row: usize, col: usize) -> GridPos {
    GridPos::new(row, col)
}

#[test]
fn test_loop_shortest_route() {
    println!("\n=== Loop maze shortest route ===");
    let grid = parse_grid(&LOOP_5X5);
    let maze = compile(&grid, Vec::new());

    let route = find_path(&maze.graph, p(0, 1), p(4, 3)).expect("Path should exist");
    println!("Route: {}", format_route(&route));
    println!("{}", visualize_route(&grid, &route.nodes));

    assert_eq!(route.distance, 6);
    assert_eq!(route.nodes.len(), 5);
    assert_eq!(route.start(), Some(p(0, 1)));
    assert_eq!(route.goal(), Some(p(4, 3)));
    assert_eq!(route.weight_in(&maze.graph), Some(6));

    // Both ways around the post are equally short
    let via = route.nodes[2];
    assert!(via == p(1, 3) || via == p(3, 1), "unexpected detour through {}", via);
}

#[test]
fn test_repeated_queries_are_identical() {
    let maze = compile_rows(&LOOP_5X5);

    let first = find_path(&maze.graph, p(0, 1), p(4, 3));
    let second = find_path(&maze.graph, p(0, 1), p(4, 3));
    assert_eq!(first, second, "Search state must not leak between calls");

    let back = find_path(&maze.graph, p(4, 3), p(0, 1)).unwrap();
    assert_eq!(back.distance, 6);
}

#[test]
fn test_start_equals_goal() {
    let maze = compile_rows(&LOOP_5X5);
    let route = find_path(&maze.graph, p(1, 1), p(1, 1)).unwrap();

    assert_eq!(route.nodes, vec![p(1, 1)]);
    assert_eq!(route.distance, 0);
    assert_eq!(route.hops(), 0);
}

#[test]
fn test_missing_endpoints() {
    let maze = compile_rows(&LOOP_5X5);

    assert!(find_path(&maze.graph, p(0, 0), p(4, 3)).is_none(), "Wall start");
    assert!(find_path(&maze.graph, p(0, 1), p(2, 2)).is_none(), "Wall goal");
    assert!(find_path(&maze.graph, p(0, 1), p(40, 40)).is_none(), "Outside the grid");
}

#[test]
fn test_disconnected_entrances() {
    let maze = compile_rows(&["#.#.#", "#.#.#", "#####"]);
    assert_eq!(maze.entrances, vec![p(0, 1), p(0, 3)]);

    let outcome = find_path_with(&maze.graph, p(0, 1), p(0, 3), &SearchConfig::default());
    assert!(outcome.route.is_none());
    assert!(!outcome.stats.truncated, "Queue ran dry, no cap involved");
    assert_eq!(outcome.stats.expanded, 2);
}

#[test]
fn test_corridor_steps_are_counted() {
    let maze = compile_rows(&["#.#", "#.#", "#.#", "#.#", "#.#"]);
    let route = find_path(&maze.graph, p(0, 1), p(4, 1)).unwrap();

    assert_eq!(route.nodes, vec![p(0, 1), p(4, 1)]);
    assert_eq!(route.distance, 4);
}

#[test]
fn test_route_through_item() {
    let maze = compile_rows(&["#.#", "#.#", "#b#", "#.#", "#.#"]);
    let route = find_path(&maze.graph, p(0, 1), p(4, 1)).unwrap();

    assert_eq!(route.nodes, vec![p(0, 1), p(2, 1), p(4, 1)]);
    assert_eq!(route.distance, 4);
}

#[test]
fn test_expansion_cap_truncates() {
    let maze = compile_rows(&LOOP_5X5);
    let config = SearchConfig {
        mode: SearchMode::ClosedSet,
        max_expansions: Some(1),
    };

    let outcome = find_path_with(&maze.graph, p(0, 1), p(4, 3), &config);
    assert!(outcome.route.is_none());
    assert!(outcome.stats.truncated);
    assert_eq!(outcome.stats.expanded, 1);
}

#[test]
fn test_random_mazes_match_reference() {
    println!("\n=== Random mazes against grid BFS ===");
    for seed in 0..40 {
        let grid = random_maze(seed, 7, 9, 12);
        let maze = compile(&grid, Vec::new());
        let (start, goal) = (maze.entrances[0], maze.entrances[1]);

        let expected = grid_distance(&grid, start, goal).expect("random mazes are connected");
        let outcome = find_path_with(&maze.graph, start, goal, &SearchConfig::default());
        let route = outcome.route.expect("route should exist");

        assert_eq!(route.distance, expected, "seed {}", seed);
        assert_eq!(route.weight_in(&maze.graph), Some(route.distance), "seed {}", seed);
        assert!(!outcome.stats.truncated, "seed {}", seed);
        assert!(
            outcome.stats.expanded <= maze.graph.junctions().count(),
            "Closed set expands each node at most once (seed {})",
            seed
        );
    }
}

#[test]
fn test_no_backtrack_mode_on_tree_mazes() {
    let relaxed = SearchConfig {
        mode: SearchMode::NoBacktrack,
        max_expansions: None,
    };

    for seed in 100..120 {
        let grid = random_maze(seed, 6, 6, 0);
        let maze = compile(&grid, Vec::new());
        let (start, goal) = (maze.entrances[0], maze.entrances[1]);

        let closed = find_path(&maze.graph, start, goal).unwrap();
        let open = find_path_with(&maze.graph, start, goal, &relaxed)
            .route
            .expect("no-backtrack search should reach the goal");

        assert_eq!(open.nodes, closed.nodes, "seed {}", seed);
        assert_eq!(open.distance, closed.distance, "seed {}", seed);
    }
}

#[test]
fn test_no_backtrack_mode_returns_consistent_route_on_loops() {
    let relaxed = SearchConfig {
        mode: SearchMode::NoBacktrack,
        max_expansions: None,
    };

    for seed in 200..220 {
        let grid = random_maze(seed, 6, 6, 15);
        let maze = compile(&grid, Vec::new());
        let (start, goal) = (maze.entrances[0], maze.entrances[1]);

        if let Some(route) = find_path_with(&maze.graph, start, goal, &relaxed).route {
            assert_eq!(route.start(), Some(start));
            assert_eq!(route.goal(), Some(goal));
            assert_eq!(route.weight_in(&maze.graph), Some(route.distance), "seed {}", seed);
        }
    }
}
