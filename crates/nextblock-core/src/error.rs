//! Core error types for nextblock-core.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for nextblock-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// A wall-clock time string fails its format contract.
    #[error("invalid time string '{text}': {reason}")]
    Parse { text: String, reason: String },

    /// The schedule document is structurally malformed.
    #[error("invalid schedule document: {0}")]
    Validation(String),

    /// No candidate schedule file exists in the folder.
    ///
    /// Surfaced distinctly so a host can offer a first-run setup flow
    /// instead of a generic failure.
    #[error("no schedule file found in {0}")]
    MissingSource(PathBuf),

    /// A query was issued before any document loaded successfully.
    #[error("no schedule document loaded")]
    NotLoaded,

    /// Filesystem watch backend error.
    #[error("watch error: {0}")]
    Watch(#[from] notify::Error),

    /// YAML deserialization error.
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Filesystem I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CoreError {
    pub(crate) fn parse(text: &str, reason: &str) -> Self {
        CoreError::Parse {
            text: text.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// Result type alias for CoreError.
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
