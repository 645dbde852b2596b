pub mod cache;
pub mod compiler;
pub mod config;
pub mod error;
pub mod event_log;
pub mod graph;
pub mod grid;
pub mod lattice;
pub mod logging;
pub mod maze;
pub mod pathfinding;
pub mod session;
pub mod snapshot;
pub mod validator;

pub use cache::{CacheStatus, MazeCache};
pub use compiler::{compile, CompiledMaze};
pub use config::Config;
pub use error::{MazeError, Result};
pub use graph::{Edge, MazeGraph, Node};
pub use grid::{Cell, GridPos, ItemKind, OccupancyGrid};
pub use lattice::{DetectedItem, LatticeLine, LatticeMap, PlacedItem, RealPos};
pub use maze::Maze;
pub use pathfinding::{find_path, Route, SearchMode};
pub use session::{Frame, FrameOutcome, MazeSession};
pub use snapshot::MazeSnapshot;
pub use validator::validate;
