//! Match configuration.

use crate::context::{ControlMode, GameContext};
use crate::search::{SearchWorker, StrategyKind, WorkerMode, build_strategy};
use derive_getters::Getters;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info, instrument};

/// Settings for one match, loadable from TOML.
///
/// Every field has a default, so an empty file is a valid configuration
/// for a human (White) against the computer (Black).
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct MatchConfig {
    /// Controller of White.
    #[serde(default = "default_white")]
    white: ControlMode,

    /// Controller of Black.
    #[serde(default = "default_black")]
    black: ControlMode,

    /// Search algorithm for computer sides.
    #[serde(default)]
    strategy: StrategyKind,

    /// Minimax depth in plies.
    #[serde(default = "default_depth")]
    depth: u8,

    /// Seed for the random strategy.
    #[serde(default)]
    seed: Option<u64>,

    /// How the search worker obtains threads.
    #[serde(default)]
    worker: WorkerMode,

    /// Pause between frames of the headless loop.
    #[serde(default = "default_frame_interval_ms")]
    frame_interval_ms: u64,

    /// Stop the headless loop after this many frames.
    #[serde(default)]
    max_frames: Option<u64>,
}

fn default_white() -> ControlMode {
    ControlMode::Human
}

fn default_black() -> ControlMode {
    ControlMode::Computer
}

fn default_depth() -> u8 {
    3
}

fn default_frame_interval_ms() -> u64 {
    16
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            white: default_white(),
            black: default_black(),
            strategy: StrategyKind::default(),
            depth: default_depth(),
            seed: None,
            worker: WorkerMode::default(),
            frame_interval_ms: default_frame_interval_ms(),
            max_frames: None,
        }
    }
}

impl MatchConfig {
    /// Loads configuration from a TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading match config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;

        let config = Self::from_toml(&content)?;
        info!(white = %config.white, black = %config.black, strategy = %config.strategy, "Config loaded");
        Ok(config)
    }

    /// Parses configuration from TOML text.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Sets White's controller.
    pub fn with_white(mut self, mode: ControlMode) -> Self {
        self.white = mode;
        self
    }

    /// Sets Black's controller.
    pub fn with_black(mut self, mode: ControlMode) -> Self {
        self.black = mode;
        self
    }

    /// Sets the search algorithm.
    pub fn with_strategy(mut self, strategy: StrategyKind) -> Self {
        self.strategy = strategy;
        self
    }

    /// Sets the minimax depth.
    pub fn with_depth(mut self, depth: u8) -> Self {
        self.depth = depth;
        self
    }

    /// Sets the random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Sets the worker mode.
    pub fn with_worker(mut self, worker: WorkerMode) -> Self {
        self.worker = worker;
        self
    }

    /// Sets the frame limit.
    pub fn with_max_frames(mut self, frames: u64) -> Self {
        self.max_frames = Some(frames);
        self
    }

    /// Checks value ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.depth == 0 {
            return Err(ConfigError::new("depth must be at least 1".to_string()));
        }
        Ok(())
    }

    /// Builds a game context from this configuration.
    #[instrument(skip(self))]
    pub fn build_context(&self) -> GameContext {
        let strategy = build_strategy(self.strategy, self.depth, self.seed);
        GameContext::new(self.white, self.black, strategy)
            .with_worker(SearchWorker::with_mode(self.worker))
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_uses_defaults() {
        let config = MatchConfig::from_toml("").expect("empty config parses");
        assert_eq!(config, MatchConfig::default());
        assert_eq!(*config.black(), ControlMode::Computer);
    }

    #[test]
    fn zero_depth_is_rejected() {
        let err = MatchConfig::from_toml("depth = 0").expect_err("depth 0 is invalid");
        assert!(err.message.contains("depth"));
    }
}
