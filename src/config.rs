//! Runtime configuration.
//!
//! Loaded from an optional JSON file; anything left out falls back to the
//! defaults, so `{}` is a valid config.
//!
//! ```json
//! {
//!   "animation": { "step_ms": 800, "easing": "ease-in-out" },
//!   "layout": { "width": 900, "height": 520, "boxes": [ ... ] }
//! }
//! ```

use std::path::Path;
use serde::{Serialize, Deserialize};
use thiserror::Error;
use tracing::info;

use crate::anim::{AnimationConfig, TimingError};
use crate::diagram::{Layout, LayoutError};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub animation: AnimationConfig,
    pub layout: Layout,
}

impl Config {
    /// Parse and validate a JSON config.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_json::from_str(text)?;
        config.animation.validate()?;
        config.layout.validate()?;
        Ok(config)
    }

    /// Load a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let config = Self::from_json(&text)?;
        info!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Load `path` if given, otherwise use the defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        path.map_or_else(|| Ok(Self::default()), |p| Self::load(p))
    }

    /// Pretty JSON, e.g. to seed a config file.
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Errors that can occur while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io { path: String, source: std::io::Error },

    #[error("invalid config: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid animation timing: {0}")]
    Timing(#[from] TimingError),

    #[error("invalid layout: {0}")]
    Layout(#[from] LayoutError),
}
