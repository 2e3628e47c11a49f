//! Error types shared by the snapshot loader and config layer.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    TomlDe(#[from] toml::de::Error),

    #[error("TOML serialization error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    #[error("Invalid snapshot {path}: {message}")]
    Snapshot { path: PathBuf, message: String },
}

impl Error {
    pub fn snapshot(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Snapshot {
            path: path.into(),
            message: message.into(),
        }
    }
}
