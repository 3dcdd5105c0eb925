//! # Loop Configuration
//!
//! ```toml
//! max_delta_seconds = 0.1
//! effect_capacity = 1024
//! enable_timing_logs = true
//! target_fps = 60
//!
//! [engine]
//! max_entities = 4096
//! trace_systems = false
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tessera_core::EngineConfig;

use crate::error::{LoopError, LoopResult};

/// Configuration for the game loop.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoopConfig {
    /// Upper bound on a single step's Δt, in seconds.
    pub max_delta_seconds: f32,
    /// Capacity of the effect channel.
    pub effect_capacity: usize,
    /// Log frames that exceed the frame budget.
    pub enable_timing_logs: bool,
    /// Target frames per second, used for the frame budget.
    pub target_fps: u32,
    /// Core engine settings.
    pub engine: EngineConfig,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            max_delta_seconds: 0.1,
            effect_capacity: 1024,
            enable_timing_logs: false,
            target_fps: 60,
            engine: EngineConfig::default(),
        }
    }
}

impl LoopConfig {
    /// Parses and validates a configuration from TOML.
    ///
    /// # Errors
    ///
    /// Returns [`LoopError::Config`] if the document is malformed or any
    /// value is out of range.
    pub fn from_toml_str(source: &str) -> LoopResult<Self> {
        let config: Self = toml::from_str(source).map_err(|e| LoopError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and parses a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`LoopError::Io`] if the file cannot be read, otherwise as
    /// [`LoopConfig::from_toml_str`].
    pub fn load(path: impl AsRef<Path>) -> LoopResult<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| LoopError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&source)
    }

    /// Checks value ranges.
    ///
    /// # Errors
    ///
    /// Returns [`LoopError::Config`] on a non-positive Δt clamp or zero
    /// target FPS, and propagates engine config errors.
    pub fn validate(&self) -> LoopResult<()> {
        if self.max_delta_seconds.is_nan() || self.max_delta_seconds <= 0.0 {
            return Err(LoopError::Config("max_delta_seconds must be positive".to_string()));
        }
        if self.target_fps == 0 {
            return Err(LoopError::Config("target_fps must be greater than zero".to_string()));
        }
        self.engine.validate()?;
        Ok(())
    }

    /// Time budget for one frame.
    #[must_use]
    pub fn frame_budget(&self) -> Duration {
        Duration::from_nanos(1_000_000_000 / u64::from(self.target_fps.max(1)))
    }
}
