//! Chat file metadata for history listings.
//!
//! Metadata is read by streaming the file: messages are decoded one at a
//! time and dropped, so memory use does not grow with the transcript.

use crate::core::{Message, Role};
use crate::error::{Error, Result};
use crate::storage::filename::DEFAULT_SLUG_CHARS;
use crate::storage::record::check_header;
use chrono::{DateTime, Utc};
use serde::de::{Deserializer, SeqAccess, Visitor};
use serde::Deserialize;
use std::fmt;
use std::fs::{self, File};
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// Default maximum preview length in characters.
pub const DEFAULT_PREVIEW_CHARS: usize = 50;

/// Length of a title derived from the first user message.
const DERIVED_TITLE_CHARS: usize = DEFAULT_SLUG_CHARS;

/// Whether a chat file could be read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileStatus {
    /// Parsed successfully.
    Ok,
    /// Content could not be parsed; carries the reason.
    Corrupt(String),
}

/// Summary of a stored chat, computed on demand.
///
/// Fields that could not be determined are `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatFileMetadata {
    /// Path of the chat file.
    pub path: PathBuf,

    /// File size in bytes.
    pub size_bytes: u64,

    /// Last modification time.
    pub modified: Option<DateTime<Utc>>,

    /// Number of messages.
    pub message_count: Option<usize>,

    /// Stored session title, else the start of the first user message.
    pub title: Option<String>,

    /// Truncated text of the first user message (or first message).
    pub preview: Option<String>,

    /// Parse status.
    pub status: FileStatus,
}

impl ChatFileMetadata {
    /// Whether the file failed to parse.
    #[must_use]
    pub fn is_corrupt(&self) -> bool {
        matches!(self.status, FileStatus::Corrupt(_))
    }

    /// Title for display: known title, else the file stem.
    #[must_use]
    pub fn display_title(&self) -> String {
        self.title.clone().unwrap_or_else(|| {
            self.path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default()
        })
    }
}

/// Read metadata for the chat file at `path`.
///
/// Malformed content is reported through [`FileStatus::Corrupt`] with only
/// the filesystem fields filled in.
///
/// # Errors
///
/// Returns [`Error::FileNotFound`] if the file does not exist, or
/// [`Error::Io`] if it cannot be opened.
pub fn read_metadata(path: &Path, preview_chars: usize) -> Result<ChatFileMetadata> {
    let stat = fs::metadata(path).map_err(|e| Error::io_at(e, path))?;
    if !stat.is_file() {
        return Err(Error::InvalidInput(format!(
            "{} is not a file",
            path.display()
        )));
    }

    let mut meta = ChatFileMetadata {
        path: path.to_path_buf(),
        size_bytes: stat.len(),
        modified: stat.modified().ok().map(DateTime::<Utc>::from),
        message_count: None,
        title: None,
        preview: None,
        status: FileStatus::Ok,
    };

    // The file may vanish between stat and open.
    let file = File::open(path).map_err(|e| Error::io_at(e, path))?;
    let parsed = serde_json::from_reader::<_, Summary>(BufReader::new(file))
        .map_err(|e| e.to_string())
        .and_then(|summary| {
            check_header(&summary.format, summary.version)?;
            Ok(summary)
        });

    match parsed {
        Ok(summary) => {
            let scan = summary.messages;
            meta.message_count = Some(scan.count);
            meta.title = summary
                .title
                .filter(|t| !t.trim().is_empty())
                .or_else(|| scan.first_user.as_deref().and_then(derived_title));
            meta.preview = scan
                .first_user
                .or(scan.first_any)
                .map(|text| truncate_preview(&text, preview_chars));
        }
        Err(reason) => {
            tracing::warn!(path = %path.display(), %reason, "unreadable chat file");
            meta.status = FileStatus::Corrupt(reason);
        }
    }

    Ok(meta)
}

/// Collapse whitespace and cut `text` to `max_chars`, marking the cut.
#[must_use]
pub fn truncate_preview(text: &str, max_chars: usize) -> String {
    let flat = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() <= max_chars {
        return flat;
    }
    let cut: String = flat.chars().take(max_chars).collect();
    format!("{}...", cut.trim_end())
}

/// Title for an untitled chat: its first user message, cut short.
fn derived_title(text: &str) -> Option<String> {
    let flat = text.split_whitespace().collect::<Vec<_>>().join(" ");
    let cut: String = flat.chars().take(DERIVED_TITLE_CHARS).collect();
    let cut = cut.trim_end();
    (!cut.is_empty()).then(|| cut.to_string())
}

/// Header fields plus a message scan; other fields are skipped.
#[derive(Deserialize)]
struct Summary {
    format: String,
    version: u32,
    #[serde(default)]
    title: Option<String>,
    // Required field; parsed only so info and load agree on validity.
    #[serde(rename = "started_at")]
    _started_at: DateTime<Utc>,
    messages: MessageScan,
}

/// Running totals from streaming the message list.
#[derive(Default)]
struct MessageScan {
    count: usize,
    first_user: Option<String>,
    first_any: Option<String>,
}

impl<'de> Deserialize<'de> for MessageScan {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        deserializer.deserialize_seq(ScanVisitor)
    }
}

struct ScanVisitor;

impl<'de> Visitor<'de> for ScanVisitor {
    type Value = MessageScan;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a list of chat messages")
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> std::result::Result<MessageScan, A::Error> {
        let mut scan = MessageScan::default();
        while let Some(message) = seq.next_element::<Message>()? {
            scan.count += 1;
            if scan.first_user.is_none() && message.role == Role::User {
                scan.first_user = Some(message.content);
            } else if scan.first_any.is_none() {
                scan.first_any = Some(message.content);
            }
        }
        Ok(scan)
    }
}
