//! # Engine Configuration
//!
//! Loaded once at startup, usually from a TOML table. Every field has a
//! default so an empty document is a valid configuration.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

/// Tunables for the identifier allocator and the step engine.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Size of the recyclable id domain. Allocation fails once this many
    /// entities are live at the same time.
    pub max_entities: u32,
    /// Slot reservation hint for the allocator and component stores.
    pub initial_capacity: usize,
    /// Emit a trace event for every system and listener application.
    pub trace_systems: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_entities: u32::MAX,
            initial_capacity: 1024,
            trace_systems: false,
        }
    }
}

impl EngineConfig {
    /// Parses and validates a configuration from TOML.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidConfig`] if the document is malformed or
    /// `max_entities` is zero.
    pub fn from_toml_str(source: &str) -> CoreResult<Self> {
        let config: Self =
            toml::from_str(source).map_err(|e| CoreError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Checks the invariants the allocator relies on.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidConfig`] if `max_entities` is zero.
    pub fn validate(&self) -> CoreResult<()> {
        if self.max_entities == 0 {
            return Err(CoreError::InvalidConfig(
                "max_entities must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}
