//! `chatvault info` command implementation.

use crate::config::Config;
use crate::error::Result;
use crate::size::format_size;
use crate::storage::{ChatFileMetadata, ChatStore, FileStatus};
use std::fmt::Write;

/// Run the info command.
///
/// Prints metadata for one saved chat without loading the transcript.
///
/// # Errors
///
/// Returns an error if the chat file does not exist.
pub fn run(config: &Config, chat: &str) -> Result<()> {
    let store = ChatStore::from_config(config);
    let meta = store.info(&store.resolve(chat))?;

    print!("{}", render_info(&meta));
    Ok(())
}

fn render_info(meta: &ChatFileMetadata) -> String {
    const UNKNOWN: &str = "unknown";

    let messages = meta
        .message_count
        .map_or_else(|| UNKNOWN.to_string(), |n| n.to_string());
    let modified = meta.modified.map_or_else(
        || UNKNOWN.to_string(),
        |t| t.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
    );
    let status = match &meta.status {
        FileStatus::Ok => "ok".to_string(),
        FileStatus::Corrupt(reason) => format!("corrupt ({reason})"),
    };

    let mut out = String::new();
    let _ = writeln!(out, "{:<9} {}", "Path", meta.path.display());
    let _ = writeln!(out, "{:<9} {}", "Title", meta.display_title());
    let _ = writeln!(out, "{:<9} {}", "Size", format_size(meta.size_bytes));
    let _ = writeln!(out, "{:<9} {messages}", "Messages");
    let _ = writeln!(out, "{:<9} {modified}", "Modified");
    let _ = writeln!(
        out,
        "{:<9} {}",
        "Preview",
        meta.preview.as_deref().unwrap_or(UNKNOWN)
    );
    let _ = writeln!(out, "{:<9} {status}", "Status");
    out
}
