use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::grid::GridPos;

/// Things that happen to a maze session
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum SessionEvent {
    /// A frame was turned into a compiled maze (fresh or from cache)
    FrameCompiled { cache_hit: bool, nodes: usize, entrances: usize, items: usize },
    /// The frame's lattice could not produce a grid
    FrameMalformed { reason: String },
    /// Validation passed and the maze became current
    MazeAccepted { entrances: usize, items: usize },
    /// Validation failed, keep scanning
    MazeRejected { reason: String },
    /// A route query against the current maze
    PathComputed { from: GridPos, to: GridPos, found: bool, distance: Option<u32>, hops: usize },
    /// Current maze forgotten, cache kept
    SessionStopped,
    /// Cache and current maze dropped
    SessionReset,
}

/// Logged event with timestamp
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LoggedEvent {
    /// Milliseconds since the log was created
    pub timestamp_ms: u64,
    pub event: SessionEvent,
}

/// In-memory journal of session events
#[derive(Debug)]
pub struct EventLog {
    start_time: Instant,
    events: Vec<LoggedEvent>,
}

impl Default for EventLog {
    fn default() -> Self {
        Self::new()
    }
}

impl EventLog {
    pub fn new() -> Self {
        EventLog {
            start_time: Instant::now(),
            events: Vec::new(),
        }
    }

    /// Record an event with the current timestamp
    pub fn log(&mut self, event: SessionEvent) {
        let timestamp_ms = self.start_time.elapsed().as_millis() as u64;
        self.events.push(LoggedEvent { timestamp_ms, event });
    }

    pub fn events(&self) -> &[LoggedEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Save log to JSON file
    pub fn save_to_file(&self, path: &str) -> crate::error::Result<()> {
        let json = serde_json::to_string_pretty(&self.events)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Summary statistics
    pub fn summary(&self) -> String {
        let mut compiled = 0;
        let mut cache_hits = 0;
        let mut malformed = 0;
        let mut accepted = 0;
        let mut rejected = 0;
        let mut paths = 0;
        let mut paths_found = 0;

        for logged in &self.events {
            match &logged.event {
                SessionEvent::FrameCompiled { cache_hit, .. } => {
                    compiled += 1;
                    if *cache_hit {
                        cache_hits += 1;
                    }
                }
                SessionEvent::FrameMalformed { .. } => malformed += 1,
                SessionEvent::MazeAccepted { .. } => accepted += 1,
                SessionEvent::MazeRejected { .. } => rejected += 1,
                SessionEvent::PathComputed { found, .. } => {
                    paths += 1;
                    if *found {
                        paths_found += 1;
                    }
                }
                _ => {}
            }
        }

        let duration = self.events.last().map(|e| e.timestamp_ms).unwrap_or(0);

        format!(
            "Session Duration: {}ms\n\
             Frames: {} compiled ({} cache hits), {} malformed\n\
             Mazes: {} accepted, {} rejected\n\
             Paths: {} computed, {} found",
            duration, compiled, cache_hits, malformed, accepted, rejected, paths, paths_found
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_counts() {
        let mut log = EventLog::new();
        log.log(SessionEvent::FrameCompiled { cache_hit: false, nodes: 10, entrances: 2, items: 0 });
        log.log(SessionEvent::MazeRejected { reason: "no path".to_string() });
        log.log(SessionEvent::FrameCompiled { cache_hit: true, nodes: 10, entrances: 2, items: 0 });
        log.log(SessionEvent::MazeAccepted { entrances: 2, items: 0 });

        assert_eq!(log.len(), 4);
        let summary = log.summary();
        assert!(summary.contains("Frames: 2 compiled (1 cache hits), 0 malformed"));
        assert!(summary.contains("Mazes: 1 accepted, 1 rejected"));
    }

    #[test]
    fn test_events_serialize() {
        let mut log = EventLog::new();
        log.log(SessionEvent::PathComputed {
            from: GridPos::new(0, 1),
            to: GridPos::new(4, 3),
            found: true,
            distance: Some(6),
            hops: 4,
        });
        let json = serde_json::to_string(log.events()).unwrap();
        assert!(json.contains("PathComputed"));
        let back: Vec<LoggedEvent> = serde_json::from_str(&json).unwrap();
        assert_eq!(back[0].event, log.events()[0].event);
    }
}
