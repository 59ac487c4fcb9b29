//! Chat filename generation.
//!
//! Names look like `{slug}_{YYYYMMDD-HHMMSS}.json`. The slug never contains
//! `_`, so the timestamp and any collision suffix can be split off again.

use crate::core::ChatSession;
use chrono::{DateTime, Utc};
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

/// Extension used for chat files.
pub const CHAT_EXTENSION: &str = "json";

/// Default maximum slug length in characters.
pub const DEFAULT_SLUG_CHARS: usize = 30;

/// Slug used when a session has no usable title or user message.
const FALLBACK_SLUG: &str = "chat";

/// Sortable timestamp format embedded in filenames.
const TIMESTAMP_FORMAT: &str = "%Y%m%d-%H%M%S";

/// Device names Windows refuses as file stems.
const RESERVED_NAMES: &[&str] = &[
    "con", "prn", "aux", "nul", "com1", "com2", "com3", "com4", "com5", "com6", "com7", "com8",
    "com9", "lpt1", "lpt2", "lpt3", "lpt4", "lpt5", "lpt6", "lpt7", "lpt8", "lpt9",
];

/// Builds descriptive filenames for chat sessions.
#[derive(Debug, Clone)]
pub struct FilenameGenerator {
    slug_chars: usize,
}

impl FilenameGenerator {
    /// Create a generator that keeps at most `slug_chars` slug characters.
    #[must_use]
    pub fn new(slug_chars: usize) -> Self {
        Self {
            slug_chars: slug_chars.max(1),
        }
    }

    /// Derive the filename for `session` saved at `now`.
    ///
    /// Deterministic: collision handling lives in [`unique_path`].
    #[must_use]
    pub fn generate(&self, session: &ChatSession, now: DateTime<Utc>) -> String {
        let slug = session
            .title()
            .and_then(|t| slugify(t, self.slug_chars))
            .or_else(|| {
                session
                    .first_user_message()
                    .and_then(|m| slugify(&m.content, self.slug_chars))
            })
            .unwrap_or_else(|| FALLBACK_SLUG.to_string());

        format!(
            "{slug}_{}.{CHAT_EXTENSION}",
            now.format(TIMESTAMP_FORMAT)
        )
    }
}

impl Default for FilenameGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_SLUG_CHARS)
    }
}

/// Derive a filename with the default slug length.
#[must_use]
pub fn generate_filename(session: &ChatSession, now: DateTime<Utc>) -> String {
    FilenameGenerator::default().generate(session, now)
}

/// Turn free text into a lowercase, filesystem-safe slug.
///
/// Returns `None` if nothing usable is left after sanitizing.
#[must_use]
pub fn slugify(text: &str, max_chars: usize) -> Option<String> {
    let re = separator_regex()?;
    let lowered = text.to_lowercase();
    let dashed = re.replace_all(&lowered, "-");

    let truncated: String = dashed.trim_matches('-').chars().take(max_chars).collect();
    let slug = truncated.trim_end_matches('-');
    if slug.is_empty() {
        return None;
    }

    if RESERVED_NAMES.contains(&slug) {
        return Some(format!("{slug}-chat"));
    }
    Some(slug.to_string())
}

/// Runs of anything other than letters and digits.
fn separator_regex() -> Option<&'static Regex> {
    static SEPARATORS: OnceLock<Option<Regex>> = OnceLock::new();
    SEPARATORS
        .get_or_init(|| Regex::new(r"[^\p{Alphabetic}\p{Nd}]+").ok())
        .as_ref()
}

/// Find a free path for `filename` in `dir`.
///
/// Returns `dir/filename` if unused, otherwise the first free
/// `{stem}_{n}.{ext}` counting from 1.
#[must_use]
pub fn unique_path(dir: &Path, filename: &str) -> PathBuf {
    let candidate = dir.join(filename);
    if !candidate.exists() {
        return candidate;
    }

    let (stem, ext) = filename
        .rsplit_once('.')
        .map_or((filename, None), |(s, e)| (s, Some(e)));

    let mut n: u64 = 1;
    loop {
        let path = match ext {
            Some(ext) => dir.join(format!("{stem}_{n}.{ext}")),
            None => dir.join(format!("{stem}_{n}")),
        };
        if !path.exists() {
            return path;
        }
        n += 1;
    }
}
