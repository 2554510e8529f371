//! Engine configuration
//!
//! A single optional TOML file; every field has a default so an empty or
//! absent file yields a working configuration.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use cadforge_core::errors::{CadError, Result};

/// Session engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Per-call time bound for backend invocations, in milliseconds
    pub backend_timeout_ms: u64,

    /// Number of recent history records surfaced in agent context info
    pub context_window: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            backend_timeout_ms: 5000,
            context_window: 5,
        }
    }
}

impl EngineConfig {
    /// The backend timeout as a Duration
    pub fn backend_timeout(&self) -> Duration {
        Duration::from_millis(self.backend_timeout_ms)
    }

    /// Parse a configuration from TOML text
    ///
    /// # Errors
    ///
    /// Returns `Serialization` on malformed TOML.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| CadError::Serialization {
            message: e.to_string(),
        })
    }

    /// Load a configuration file, falling back to defaults if absent
    ///
    /// # Errors
    ///
    /// Returns `Io` if the file exists but cannot be read, or
    /// `Serialization` on malformed TOML.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }
}
