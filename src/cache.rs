use std::collections::{HashMap, VecDeque};
use std::fmt::Debug;
use std::sync::Arc;
use tracing::debug;

use crate::compiler::CompiledMaze;
use crate::config::CacheConfig;
use crate::grid::{Fingerprint, OccupancyGrid};
use crate::lattice::PlacedItem;

/// Decides which compiled maze to drop when the cache grows
pub trait EvictionPolicy: Debug {
    /// A new entry was stored
    fn on_insert(&mut self, key: &Fingerprint);

    /// An existing entry was returned
    fn on_hit(&mut self, key: &Fingerprint);

    /// Entry to drop now that the cache holds `len` entries, if any
    fn victim(&mut self, len: usize) -> Option<Fingerprint>;

    fn clear(&mut self) {}
}

/// Keep everything for the whole session
#[derive(Debug, Default, Clone, Copy)]
pub struct NeverEvict;

impl EvictionPolicy for NeverEvict {
    fn on_insert(&mut self, _key: &Fingerprint) {}

    fn on_hit(&mut self, _key: &Fingerprint) {}

    fn victim(&mut self, _len: usize) -> Option<Fingerprint> {
        None
    }
}

/// Bounded cache, least recently used entry goes first
#[derive(Debug, Clone)]
pub struct LruEviction {
    capacity: usize,
    order: VecDeque<Fingerprint>,
}

impl LruEviction {
    pub fn new(capacity: usize) -> Self {
        LruEviction {
            capacity: capacity.max(1),
            order: VecDeque::new(),
        }
    }

    fn touch(&mut self, key: &Fingerprint) {
        self.order.retain(|k| k != key);
        self.order.push_back(key.clone());
    }
}

impl EvictionPolicy for LruEviction {
    fn on_insert(&mut self, key: &Fingerprint) {
        self.touch(key);
    }

    fn on_hit(&mut self, key: &Fingerprint) {
        self.touch(key);
    }

    fn victim(&mut self, len: usize) -> Option<Fingerprint> {
        if len > self.capacity {
            self.order.pop_front()
        } else {
            None
        }
    }

    fn clear(&mut self) {
        self.order.clear();
    }
}

/// Whether `get_or_build` reused a compiled maze
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheStatus {
    Hit,
    Miss,
}

/// Compiled mazes keyed by grid fingerprint, owned by the session
#[derive(Debug)]
pub struct MazeCache {
    entries: HashMap<Fingerprint, Arc<CompiledMaze>>,
    policy: Box<dyn EvictionPolicy>,
    hits: u64,
    misses: u64,
}

impl Default for MazeCache {
    fn default() -> Self {
        Self::new()
    }
}

impl MazeCache {
    /// Cache that never evicts
    pub fn new() -> Self {
        Self::with_policy(Box::new(NeverEvict))
    }

    pub fn with_policy(policy: Box<dyn EvictionPolicy>) -> Self {
        MazeCache {
            entries: HashMap::new(),
            policy,
            hits: 0,
            misses: 0,
        }
    }

    pub fn from_config(config: &CacheConfig) -> Self {
        match config.max_entries {
            Some(capacity) => Self::with_policy(Box::new(LruEviction::new(capacity))),
            None => Self::new(),
        }
    }

    pub fn get(&self, key: &Fingerprint) -> Option<Arc<CompiledMaze>> {
        self.entries.get(key).cloned()
    }

    /// Like `get`, but counts the hit or miss and refreshes the entry's
    /// eviction order
    pub fn lookup(&mut self, key: &Fingerprint) -> Option<Arc<CompiledMaze>> {
        match self.entries.get(key) {
            Some(maze) => {
                self.hits += 1;
                self.policy.on_hit(key);
                debug!(entries = self.entries.len(), "maze cache hit");
                Some(Arc::clone(maze))
            }
            None => {
                self.misses += 1;
                None
            }
        }
    }

    /// Store a compiled maze, evicting whatever the policy gives up
    pub fn insert(&mut self, key: Fingerprint, maze: Arc<CompiledMaze>) {
        self.entries.insert(key.clone(), maze);
        self.policy.on_insert(&key);

        while let Some(victim) = self.policy.victim(self.entries.len()) {
            if self.entries.remove(&victim).is_none() {
                break;
            }
            debug!("evicted compiled maze");
        }
        debug!(entries = self.entries.len(), "maze cached");
    }

    /// Return the cached maze for this grid, compiling and storing it on a miss
    pub fn get_or_build<F>(
        &mut self,
        grid: &OccupancyGrid,
        items: Vec<PlacedItem>,
        build: F,
    ) -> (Arc<CompiledMaze>, CacheStatus)
    where
        F: FnOnce(&OccupancyGrid, Vec<PlacedItem>) -> CompiledMaze,
    {
        let key = grid.fingerprint();
        if let Some(maze) = self.lookup(&key) {
            return (maze, CacheStatus::Hit);
        }

        let maze = Arc::new(build(grid, items));
        self.insert(key, Arc::clone(&maze));
        (maze, CacheStatus::Miss)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn misses(&self) -> u64 {
        self.misses
    }

    /// Drop every entry (full session reset)
    pub fn clear(&mut self) {
        self.entries.clear();
        self.policy.clear();
        self.hits = 0;
        self.misses = 0;
    }
}
