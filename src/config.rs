use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::{info, warn};

use crate::error::Result;
use crate::pathfinding::SearchMode;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub validation: ValidationConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchConfig {
    #[serde(default)]
    pub mode: SearchMode,
    /// Cap on node expansions per search; derived from graph size when unset
    #[serde(default)]
    pub max_expansions: Option<usize>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ValidationConfig {
    #[serde(default = "default_min_entrances")]
    pub min_entrances: usize,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CacheConfig {
    /// Keep at most this many compiled mazes (least recently used evicted).
    /// Unset means never evict.
    #[serde(default)]
    pub max_entries: Option<usize>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_filter")]
    pub filter: String,
    #[serde(default = "default_record_events")]
    pub record_events: bool,
    #[serde(default = "default_event_log_path")]
    pub event_log_path: String,
}

// Default values
fn default_min_entrances() -> usize { 2 }
fn default_filter() -> String { "info".to_string() }
fn default_record_events() -> bool { true }
fn default_event_log_path() -> String { "maze_events.json".to_string() }

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            min_entrances: default_min_entrances(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_filter(),
            record_events: default_record_events(),
            event_log_path: default_event_log_path(),
        }
    }
}

impl Config {
    /// Load configuration from `config.toml`, or use defaults if it is missing or invalid
    pub fn load() -> Self {
        let path = Path::new("config.toml");
        if !path.exists() {
            info!("No config.toml found, using default configuration");
            return Config::default();
        }
        match Config::load_from(path) {
            Ok(config) => {
                info!("Loaded configuration from config.toml");
                config
            }
            Err(e) => {
                warn!("Failed to load config.toml: {}, using default configuration", e);
                Config::default()
            }
        }
    }

    /// Load configuration from a specific file
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Config::parse(&contents)
    }

    pub fn parse(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }
}
