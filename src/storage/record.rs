//! On-disk chat record.
//!
//! A chat file is a JSON object tagged with [`FORMAT_TAG`] and a version
//! number. Unknown tags and versions newer than [`FORMAT_VERSION`] are
//! rejected rather than guessed at.

use crate::core::{ChatSession, Message};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Tag identifying a chatvault session file.
pub const FORMAT_TAG: &str = "chatvault.session";

/// Current record version.
pub const FORMAT_VERSION: u32 = 1;

/// Borrowed view of a session, written by `save`.
#[derive(Debug, Serialize)]
pub(crate) struct RecordOut<'a> {
    format: &'static str,
    version: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    title: Option<&'a str>,
    started_at: DateTime<Utc>,
    saved_at: DateTime<Utc>,
    messages: &'a [Message],
}

impl<'a> RecordOut<'a> {
    pub(crate) fn new(session: &'a ChatSession, saved_at: DateTime<Utc>) -> Self {
        Self {
            format: FORMAT_TAG,
            version: FORMAT_VERSION,
            title: session.title(),
            started_at: session.start_time(),
            saved_at,
            messages: session.messages(),
        }
    }
}

/// Owned record, read by `load`.
#[derive(Debug, Deserialize)]
pub(crate) struct RecordIn {
    format: String,
    version: u32,
    #[serde(default)]
    title: Option<String>,
    started_at: DateTime<Utc>,
    messages: Vec<Message>,
}

impl RecordIn {
    /// Check the tag and version, then convert to a session.
    pub(crate) fn into_session(self) -> Result<ChatSession, String> {
        check_header(&self.format, self.version)?;
        Ok(ChatSession::from_parts(
            self.started_at,
            self.title,
            self.messages,
        ))
    }
}

/// Validate a record's format tag and version.
pub(crate) fn check_header(format: &str, version: u32) -> Result<(), String> {
    if format != FORMAT_TAG {
        return Err(format!("unexpected format tag {format:?}"));
    }
    if version == 0 || version > FORMAT_VERSION {
        return Err(format!("unsupported format version {version}"));
    }
    Ok(())
}
