//! Chat directory setup.

use crate::error::Result;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Make sure the chat directory exists, creating missing parents.
///
/// Existing directories are returned untouched.
///
/// # Errors
///
/// Returns [`crate::Error::Io`] if `path` exists but is not a directory, or
/// if the directory cannot be created.
pub fn ensure_chat_directory(path: &Path) -> Result<PathBuf> {
    match fs::metadata(path) {
        Ok(meta) if meta.is_dir() => return Ok(path.to_path_buf()),
        Ok(_) => {
            return Err(io::Error::new(
                io::ErrorKind::AlreadyExists,
                format!("{} exists and is not a directory", path.display()),
            )
            .into());
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => return Err(e.into()),
    }

    fs::create_dir_all(path)?;
    tracing::debug!(path = %path.display(), "created chat directory");
    Ok(path.to_path_buf())
}
