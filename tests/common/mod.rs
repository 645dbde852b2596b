#![allow(dead_code)]

use maze_graph::{compile, Cell, CompiledMaze, DetectedItem, Frame, GridPos, LatticeLine, OccupancyGrid, PlacedItem};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::collections::{HashSet, VecDeque};
use std::fs;
use std::path::Path;

/// Two entrances joined by a loop around a single wall post.
/// Junctions: (0,1) (1,1) (1,3) (3,1) (3,3) (4,3)
pub const LOOP_5X5: [&str; 5] = [
    "#.###",
    "#...#",
    "#.#.#",
    "#...#",
    "###.#",
];

/// Golden replay fixture
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GoldenMaze {
    pub name: String,
    pub grid: Vec<String>,
    pub start: GridPos,
    pub goal: GridPos,
    pub expected_path: Vec<GridPos>,
    pub expected_distance: u32,
}

/// Load a golden fixture from JSON file
pub fn load_golden(path: &Path) -> Result<GoldenMaze, Box<dyn std::error::Error>> {
    let contents = fs::read_to_string(path)?;
    let golden: GoldenMaze = serde_json::from_str(&contents)?;
    Ok(golden)
}

pub fn parse_grid(rows: &[&str]) -> OccupancyGrid {
    rows.join("\n").parse().expect("test grid should parse")
}

/// Items written into the grid, as the lattice would have placed them
pub fn items_in(grid: &OccupancyGrid) -> Vec<PlacedItem> {
    grid.iter()
        .filter_map(|(pos, cell)| match cell {
            Cell::Item(kind) => Some(PlacedItem { pos, kind }),
            _ => None,
        })
        .collect()
}

pub fn compile_rows(rows: &[&str]) -> CompiledMaze {
    let grid = parse_grid(rows);
    let items = items_in(&grid);
    compile(&grid, items)
}

/// Lattice frame that builds `LOOP_5X5`: lines at 0, 10 and 20 on both axes
pub fn loop_frame() -> Frame {
    let length = 21;
    Frame {
        vlines: vec![
            LatticeLine::solid(0, length),
            LatticeLine::solid(10, length).with_gap(3, 8).with_gap(13, 18),
            LatticeLine::solid(20, length),
        ],
        hlines: vec![
            LatticeLine::solid(0, length).with_gap(3, 8),
            LatticeLine::solid(10, length).with_gap(3, 8).with_gap(13, 18),
            LatticeLine::solid(20, length).with_gap(13, 18),
        ],
        items: Vec::new(),
    }
}

/// Same lattice with the bottom entrance walled off
pub fn single_entrance_frame() -> Frame {
    let mut frame = loop_frame();
    frame.hlines[2] = LatticeLine::solid(20, 21);
    frame
}

pub fn item_at(x: i32, y: i32, kind: maze_graph::ItemKind) -> DetectedItem {
    DetectedItem { x, y, kind }
}

/// Reference shortest distance: breadth-first search over every open grid
/// cell, no corridor collapsing
pub fn grid_distance(grid: &OccupancyGrid, from: GridPos, to: GridPos) -> Option<u32> {
    if grid.is_wall(from) || grid.is_wall(to) {
        return None;
    }

    let mut visited: HashSet<GridPos> = HashSet::new();
    let mut queue: VecDeque<(GridPos, u32)> = VecDeque::new();
    visited.insert(from);
    queue.push_back((from, 0));

    while let Some((pos, dist)) = queue.pop_front() {
        if pos == to {
            return Some(dist);
        }
        for next in grid.open_neighbors(pos) {
            if visited.insert(next) {
                queue.push_back((next, dist + 1));
            }
        }
    }
    None
}

/// Seeded random maze of `cell_rows x cell_cols` cells.
///
/// Carves a spanning tree with a depth-first walk, then knocks out
/// `extra_openings` more interior walls to create loops. One entrance is
/// opened on the top border and one on the bottom border.
pub fn random_maze(seed: u64, cell_rows: usize, cell_cols: usize, extra_openings: usize) -> OccupancyGrid {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut grid = OccupancyGrid::walled(cell_rows, cell_cols);
    let (rows, cols) = (grid.rows(), grid.cols());

    let mut visited = vec![vec![false; cell_cols]; cell_rows];
    let mut stack = vec![(0usize, 0usize)];
    visited[0][0] = true;

    while let Some(&(r, c)) = stack.last() {
        let mut options: Vec<(usize, usize)> = Vec::new();
        if r > 0 && !visited[r - 1][c] {
            options.push((r - 1, c));
        }
        if r + 1 < cell_rows && !visited[r + 1][c] {
            options.push((r + 1, c));
        }
        if c > 0 && !visited[r][c - 1] {
            options.push((r, c - 1));
        }
        if c + 1 < cell_cols && !visited[r][c + 1] {
            options.push((r, c + 1));
        }

        match options.choose(&mut rng) {
            Some(&(nr, nc)) => {
                visited[nr][nc] = true;
                // Wall segment midway between the two cell interiors
                let wall = GridPos::new(r + nr + 1, c + nc + 1);
                grid.set(wall, Cell::Open);
                stack.push((nr, nc));
            }
            None => {
                stack.pop();
            }
        }
    }

    for _ in 0..extra_openings {
        let row = rng.gen_range(1..rows - 1);
        let col = rng.gen_range(1..cols - 1);
        // Only wall segments between two cells, never lattice posts
        if (row + col) % 2 == 1 {
            grid.set(GridPos::new(row, col), Cell::Open);
        }
    }

    let top = rng.gen_range(0..cell_cols) * 2 + 1;
    let bottom = rng.gen_range(0..cell_cols) * 2 + 1;
    grid.set(GridPos::new(0, top), Cell::Open);
    grid.set(GridPos::new(rows - 1, bottom), Cell::Open);

    grid
}

/// Draw a route over the grid for test output
pub fn visualize_route(grid: &OccupancyGrid, route: &[GridPos]) -> String {
    let mut result = String::new();
    for row in 0..grid.rows() {
        for col in 0..grid.cols() {
            let pos = GridPos::new(row, col);
            let symbol = if route.first() == Some(&pos) {
                'S'
            } else if route.last() == Some(&pos) {
                'G'
            } else if route.contains(&pos) {
                '*'
            } else if grid.is_wall(pos) {
                '#'
            } else {
                '.'
            };
            result.push(symbol);
        }
        result.push('\n');
    }
    result
}
