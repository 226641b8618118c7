#![forbid(unsafe_code)]

//! Errors surfaced by the demo binary and their process exit codes.

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, DemoError>;

#[derive(Debug, Error)]
pub enum DemoError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to load config: {0}")]
    Config(#[from] designable::ConfigError),

    #[error("invalid config {path}: {problems}")]
    InvalidConfig { path: PathBuf, problems: String },
}

impl DemoError {
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) | Self::InvalidConfig { .. } => 2,
            _ => 1,
        }
    }
}
