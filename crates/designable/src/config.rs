#![forbid(unsafe_code)]

//! Runtime configuration for a [`Designer`](crate::designer::Designer).
//!
//! # Loading
//!
//! ```toml
//! # designable.toml
//! storage_key = "com.example.appearance"
//! system_appearance_enabled = false
//!
//! [animation]
//! enabled = true
//! duration_ms = 400
//! ```
//!
//! ```rust,ignore
//! let config = DesignerConfig::from_toml_file("designable.toml")?;
//! let config = DesignerConfig::from_json_str(json)?;
//! ```
//!
//! # Defaults
//!
//! `DesignerConfig::default()` stores under [`DEFAULT_STORAGE_KEY`],
//! animates changes over 250 ms and follows the system appearance.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::transition::{Animation, DEFAULT_ANIMATION_DURATION};

/// Storage key the current appearance type is persisted under.
pub const DEFAULT_STORAGE_KEY: &str = "designable.appearance";

/// Longest animation `validate` accepts.
pub const MAX_ANIMATION_MS: u64 = 10_000;

/// Top-level designer configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DesignerConfig {
    /// Key under which the appearance type is persisted.
    pub storage_key: String,

    /// Presentation of changes requested without an explicit animation.
    pub animation: AnimationConfig,

    /// Whether the application follows the platform light/dark setting.
    pub system_appearance_enabled: bool,
}

impl Default for DesignerConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            animation: AnimationConfig::default(),
            system_appearance_enabled: true,
        }
    }
}

/// Default animation for appearance changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationConfig {
    pub enabled: bool,
    pub duration_ms: u64,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            duration_ms: DEFAULT_ANIMATION_DURATION.as_millis() as u64,
        }
    }
}

impl AnimationConfig {
    /// The [`Animation`] this config requests.
    #[must_use]
    pub fn to_animation(self) -> Animation {
        if self.enabled {
            Animation::Animated(Duration::from_millis(self.duration_ms))
        } else {
            Animation::Immediate
        }
    }
}

impl DesignerConfig {
    /// Load from a TOML string.
    #[cfg(feature = "config-file")]
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    /// Load from a TOML file on disk.
    #[cfg(feature = "config-file")]
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    /// Load from a JSON string.
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(s)?)
    }

    /// Load from a JSON file on disk.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&content)
    }

    /// Validate all parameters are within acceptable ranges.
    ///
    /// Returns a list of validation errors. An empty list means the config
    /// is valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if self.storage_key.trim().is_empty() {
            errors.push("storage_key must not be empty".to_string());
        }
        if self.animation.duration_ms > MAX_ANIMATION_MS {
            errors.push(format!(
                "animation.duration_ms must be <= {MAX_ANIMATION_MS}, got {}",
                self.animation.duration_ms
            ));
        }
        errors
    }
}
