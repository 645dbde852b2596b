mod common;

use common::*;
use maze_graph::config::SearchConfig;
use maze_graph::pathfinding::{find_path_with, format_route};
use maze_graph::{compile, MazeSnapshot, SearchMode};
use std::path::Path;

const GOLDEN: &str = "test_data/golden_maze.json";

#[test]
fn test_golden_maze_route() {
    let golden = load_golden(Path::new(GOLDEN)).expect("Failed to load golden fixture");
    println!("\n=== Golden: {} ===", golden.name);

    let rows: Vec<&str> = golden.grid.iter().map(String::as_str).collect();
    let grid = parse_grid(&rows);
    let maze = compile(&grid, items_in(&grid));

    assert_eq!(maze.entrances, vec![golden.start, golden.goal]);
    assert_eq!(maze.items.len(), 2);

    let route = maze_graph::find_path(&maze.graph, golden.start, golden.goal).expect("golden route");
    println!("Route: {}", format_route(&route));
    println!("{}", visualize_route(&grid, &route.nodes));

    assert_eq!(route.nodes, golden.expected_path);
    assert_eq!(route.distance, golden.expected_distance);
    assert_eq!(grid_distance(&grid, golden.start, golden.goal), Some(golden.expected_distance));
}

#[test]
fn test_golden_maze_after_snapshot_replay() {
    let golden = load_golden(Path::new(GOLDEN)).unwrap();
    let rows: Vec<&str> = golden.grid.iter().map(String::as_str).collect();
    let grid = parse_grid(&rows);
    let maze = compile(&grid, items_in(&grid));

    let json = MazeSnapshot::from_compiled(&maze).to_json().unwrap();
    let replayed = MazeSnapshot::from_json(&json).unwrap().to_compiled().unwrap();

    let route = maze_graph::find_path(&replayed.graph, golden.start, golden.goal).unwrap();
    assert_eq!(route.nodes, golden.expected_path);
    assert_eq!(route.distance, golden.expected_distance);
}

#[test]
fn test_golden_maze_in_both_search_modes() {
    let golden = load_golden(Path::new(GOLDEN)).unwrap();
    let rows: Vec<&str> = golden.grid.iter().map(String::as_str).collect();
    let maze = compile_rows(&rows);

    for mode in [SearchMode::ClosedSet, SearchMode::NoBacktrack] {
        let config = SearchConfig { mode, max_expansions: None };
        let outcome = find_path_with(&maze.graph, golden.start, golden.goal, &config);
        let route = outcome.route.expect("golden route");

        println!("{:?}: expanded {} nodes", mode, outcome.stats.expanded);
        assert_eq!(route.distance, golden.expected_distance, "{:?}", mode);
        assert_eq!(route.nodes, golden.expected_path, "{:?}", mode);
    }
}
