//! Frame pipeline for one play session.
//!
//! Each camera frame yields lattice lines and detected items. The session
//! turns them into a grid, reuses or compiles the graph through its cache,
//! validates the result and, if accepted, makes it the current maze.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info};

use crate::cache::{CacheStatus, MazeCache};
use crate::compiler::compile;
use crate::config::Config;
use crate::error::{MazeError, Result};
use crate::event_log::{EventLog, SessionEvent};
use crate::grid::{Fingerprint, GridPos};
use crate::lattice::{DetectedItem, LatticeLine, LatticeMap};
use crate::maze::Maze;
use crate::pathfinding::Route;
use crate::validator::validate;

/// Vision pipeline output for one frame
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Frame {
    pub vlines: Vec<LatticeLine>,
    pub hlines: Vec<LatticeLine>,
    pub items: Vec<DetectedItem>,
}

/// What happened to a submitted frame
#[derive(Debug)]
pub enum FrameOutcome {
    /// The frame's maze is now current
    Accepted(CacheStatus),
    /// The frame was dropped; the previous maze (if any) stays current
    Rejected(MazeError),
}

impl FrameOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, FrameOutcome::Accepted(_))
    }
}

#[derive(Debug)]
pub struct MazeSession {
    config: Config,
    cache: MazeCache,
    current: Option<Maze>,
    events: EventLog,
}

impl Default for MazeSession {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl MazeSession {
    pub fn new(config: Config) -> Self {
        let cache = MazeCache::from_config(&config.cache);
        MazeSession {
            config,
            cache,
            current: None,
            events: EventLog::new(),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn cache(&self) -> &MazeCache {
        &self.cache
    }

    pub fn events(&self) -> &EventLog {
        &self.events
    }

    /// The accepted maze, if any
    pub fn current(&self) -> Option<&Maze> {
        self.current.as_ref()
    }

    fn record(&mut self, event: SessionEvent) {
        if self.config.logging.record_events {
            self.events.log(event);
        }
    }

    /// Build a maze from a frame without validating or accepting it. A miss
    /// is compiled but not stored; only `submit_frame` caches accepted mazes.
    pub fn compile_frame(&mut self, frame: &Frame) -> Result<(Maze, CacheStatus)> {
        self.build_frame(frame).map(|(maze, _, status)| (maze, status))
    }

    fn build_frame(&mut self, frame: &Frame) -> Result<(Maze, Fingerprint, CacheStatus)> {
        let lattice = LatticeMap::new(frame.vlines.clone(), frame.hlines.clone())?;
        let mut grid = lattice.build_grid();
        let items = lattice.place_items(&mut grid, &frame.items);

        let key = grid.fingerprint();
        let (compiled, status) = match self.cache.lookup(&key) {
            Some(compiled) => (compiled, CacheStatus::Hit),
            None => (Arc::new(compile(&grid, items)), CacheStatus::Miss),
        };
        self.record(SessionEvent::FrameCompiled {
            cache_hit: status == CacheStatus::Hit,
            nodes: compiled.graph.len(),
            entrances: compiled.entrances.len(),
            items: compiled.items.len(),
        });

        let maze = Maze::new(compiled, lattice).with_search(self.config.search.clone());
        Ok((maze, key, status))
    }

    /// Run the whole pipeline for one frame. Never fails: a bad frame is
    /// reported as `Rejected` and the session keeps its current maze.
    /// Rejected mazes never enter the cache.
    pub fn submit_frame(&mut self, frame: &Frame) -> FrameOutcome {
        let (maze, key, status) = match self.build_frame(frame) {
            Ok(result) => result,
            Err(e) => {
                debug!("frame malformed: {}", e);
                self.record(SessionEvent::FrameMalformed { reason: e.to_string() });
                return FrameOutcome::Rejected(e);
            }
        };

        if let Err(e) = validate(&maze, &self.config.validation) {
            self.record(SessionEvent::MazeRejected { reason: e.to_string() });
            return FrameOutcome::Rejected(e);
        }

        if status == CacheStatus::Miss {
            self.cache.insert(key, Arc::clone(maze.compiled()));
        }

        info!(
            entrances = maze.entrances().len(),
            items = maze.items().len(),
            cached = status == CacheStatus::Hit,
            "maze accepted"
        );
        self.record(SessionEvent::MazeAccepted {
            entrances: maze.entrances().len(),
            items: maze.items().len(),
        });
        self.current = Some(maze);
        FrameOutcome::Accepted(status)
    }

    /// Route query against the current maze. None without a maze or a path.
    pub fn find_path(&mut self, from: GridPos, to: GridPos) -> Option<Route> {
        let route = self.current.as_ref()?.find_path(from, to);
        self.record(SessionEvent::PathComputed {
            from,
            to,
            found: route.is_some(),
            distance: route.as_ref().map(|r| r.distance),
            hops: route.as_ref().map_or(0, |r| r.hops()),
        });
        route
    }

    /// Forget the current maze, keep compiled mazes for when it comes back
    pub fn stop(&mut self) {
        self.current = None;
        self.record(SessionEvent::SessionStopped);
        info!("session stopped");
    }

    /// Full session reset: drop the current maze and every cached one
    pub fn reset(&mut self) {
        self.current = None;
        self.cache.clear();
        self.record(SessionEvent::SessionReset);
        info!("session reset");
    }

    /// Write the event journal to the configured path
    pub fn save_events(&self) -> Result<()> {
        self.events.save_to_file(&self.config.logging.event_log_path)
    }
}
