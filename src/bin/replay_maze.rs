/// Replays a pathfinding scenario offline
///
/// Reads a maze snapshot (.json) or an ASCII grid, finds the route between two
/// entrances and prints it with an overlay of the maze

use std::env;
use std::fs;
use std::path::Path;
use std::process;

use maze_graph::config::Config;
use maze_graph::grid::{Cell, ItemKind};
use maze_graph::pathfinding::{find_path_with, format_route};
use maze_graph::{compile, logging, CompiledMaze, GridPos, MazeSnapshot, OccupancyGrid, Route};

fn main() {
    let args: Vec<String> = env::args().collect();
    if args.len() != 2 && args.len() != 4 {
        eprintln!("Usage: {} <maze.json|grid.txt> [start_row,start_col goal_row,goal_col]", args[0]);
        eprintln!("Finds the route between two entrances (default: the first two)");
        process::exit(1);
    }

    let config = Config::load();
    logging::init(&config.logging);

    if let Err(e) = run(&args, &config) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run(args: &[String], config: &Config) -> maze_graph::Result<()> {
    let path = Path::new(&args[1]);
    let maze = load_maze(path)?;

    println!("=== Maze: {} ===", path.display());
    println!(
        "Grid {}x{}, {} nodes, {} junctions, {} edges",
        maze.graph.rows(),
        maze.graph.cols(),
        maze.graph.len(),
        maze.graph.junctions().count(),
        maze.graph.edge_count()
    );
    println!("Entrances: {:?}", maze.entrances);
    println!("Items: {}\n", maze.items.len());

    let (start, goal) = if args.len() == 4 {
        (args[2].parse::<GridPos>()?, args[3].parse::<GridPos>()?)
    } else if maze.entrances.len() >= 2 {
        (maze.entrances[0], maze.entrances[1])
    } else {
        println!("Fewer than 2 entrances, nothing to replay");
        return Ok(());
    };

    let outcome = find_path_with(&maze.graph, start, goal, &config.search);
    match &outcome.route {
        Some(route) => {
            println!("Route {} -> {}: {}", start, goal, format_route(route));
            println!("Distance: {}, hops: {}", route.distance, route.hops());
        }
        None => println!("No path from {} to {}", start, goal),
    }
    println!(
        "Expanded {} nodes, {} queue pushes{}\n",
        outcome.stats.expanded,
        outcome.stats.pushed,
        if outcome.stats.truncated { " (truncated)" } else { "" }
    );

    print!("{}", render(&maze, outcome.route.as_ref()));
    Ok(())
}

fn load_maze(path: &Path) -> maze_graph::Result<CompiledMaze> {
    if path.extension().and_then(|s| s.to_str()) == Some("json") {
        return MazeSnapshot::load_from_file(path)?.to_compiled();
    }

    let text = fs::read_to_string(path)?;
    let grid: OccupancyGrid = text.parse()?;
    let items = grid
        .iter()
        .filter_map(|(pos, cell)| match cell {
            Cell::Item(kind) => Some(maze_graph::PlacedItem { pos, kind }),
            _ => None,
        })
        .collect();
    Ok(compile(&grid, items))
}

/// ASCII overlay: `#` wall, `*` route, `E` entrance, `b`/`s` items, `+` junction, `.` corridor
fn render(maze: &CompiledMaze, route: Option<&Route>) -> String {
    let on_route = |pos: &GridPos| route.is_some_and(|r| r.nodes.contains(pos));
    let mut out = String::new();

    for row in 0..maze.graph.rows() {
        for col in 0..maze.graph.cols() {
            let pos = GridPos::new(row, col);
            let symbol = match maze.graph.node(pos) {
                None => '#',
                Some(_) if on_route(&pos) => '*',
                Some(node) if node.entrance => 'E',
                Some(node) => match node.value {
                    Cell::Item(ItemKind::Big) => 'b',
                    Cell::Item(ItemKind::Small) => 's',
                    _ if node.corridor => '.',
                    _ => '+',
                },
            };
            out.push(symbol);
        }
        out.push('\n');
    }
    out
}
