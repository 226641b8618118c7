#![forbid(unsafe_code)]

//! Error taxonomy for the appearance registry.
//!
//! Only two kinds of failure reach code outside this crate:
//!
//! - [`DesignError`] from [`AppearanceStore::set_appearance`], which the
//!   [`Designer`] treats as fatal.
//! - [`ConfigError`] when loading a [`DesignerConfig`] from disk.
//!
//! Read-side problems (missing or corrupt persisted data) never surface as
//! errors; the store falls back to the default appearance type instead.
//!
//! [`AppearanceStore::set_appearance`]: crate::store::AppearanceStore::set_appearance
//! [`Designer`]: crate::designer::Designer
//! [`DesignerConfig`]: crate::config::DesignerConfig

use thiserror::Error;

/// Result alias for [`StorageBackend`](crate::storage::StorageBackend) calls.
pub type StorageResult<T> = std::result::Result<T, StorageError>;

/// Failure inside a storage backend.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("storage document is corrupted: {message}")]
    Corrupted { message: String },

    #[error("unsupported storage version: {found} (expected {expected})")]
    UnsupportedVersion { found: u64, expected: u64 },

    #[error("failed to serialize storage document: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl StorageError {
    #[must_use]
    pub fn corrupted(message: impl Into<String>) -> Self {
        Self::Corrupted {
            message: message.into(),
        }
    }
}

/// Failure to turn an appearance type into bytes.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("failed to encode appearance type as JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to encode appearance type: {message}")]
    Custom { message: String },
}

impl CodecError {
    #[must_use]
    pub fn custom(message: impl Into<String>) -> Self {
        Self::Custom {
            message: message.into(),
        }
    }
}

/// Failure while switching the current appearance type.
#[derive(Debug, Error)]
pub enum DesignError {
    #[error(transparent)]
    Encode(#[from] CodecError),

    #[error("failed to persist appearance type under `{key}`: {source}")]
    Storage {
        key: String,
        #[source]
        source: StorageError,
    },
}

/// Failure while loading a [`DesignerConfig`](crate::config::DesignerConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[cfg(feature = "config-file")]
    #[error("invalid TOML config: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid JSON config: {0}")]
    Json(#[from] serde_json::Error),
}
