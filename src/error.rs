//! Error types for chatvault.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type alias for chatvault operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in chatvault operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Bad argument supplied by the caller.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Filesystem operation denied or failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Chat file does not exist.
    #[error("Chat file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// Chat file exists but cannot be parsed as a session.
    #[error("Corrupt chat file {}: {reason}", path.display())]
    CorruptFile {
        /// Offending file.
        path: PathBuf,
        /// What failed to parse.
        reason: String,
    },

    /// JSON serialization/deserialization error outside of chat files.
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Map an I/O error on `path`, turning `NotFound` into [`Error::FileNotFound`].
    pub(crate) fn io_at(err: io::Error, path: &Path) -> Self {
        if err.kind() == io::ErrorKind::NotFound {
            Self::FileNotFound(path.to_path_buf())
        } else {
            Self::Io(err)
        }
    }

    /// Build a [`Error::CorruptFile`] for `path`.
    pub(crate) fn corrupt(path: impl Into<PathBuf>, reason: &impl fmt::Display) -> Self {
        Self::CorruptFile {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}
