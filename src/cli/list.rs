//! `chatvault list` command implementation.

use crate::config::Config;
use crate::error::Result;
use crate::size::format_size;
use crate::storage::{ChatFileMetadata, ChatStore};
use chrono::{DateTime, Local, Utc};
use std::fmt::Write;

/// Placeholder for fields that could not be read.
const UNKNOWN: &str = "?";

/// Run the list command.
///
/// Shows saved chats with their name, size, message count, modification
/// time, and preview.
///
/// # Errors
///
/// Returns an error if the chat directory cannot be read.
pub fn run(config: &Config, limit: Option<usize>) -> Result<()> {
    let store = ChatStore::from_config(config);
    let limit = limit.unwrap_or(config.history.list_limit);

    let chats = store.list(limit)?;

    if chats.is_empty() {
        println!("No saved chats found.");
        println!("\nChats are stored in: {}", store.chat_dir().display());
        return Ok(());
    }

    print!("{}", render_table(&chats));
    println!("Showing {} chat(s)", chats.len());

    Ok(())
}

/// Render the chat table, one row per chat.
fn render_table(chats: &[ChatFileMetadata]) -> String {
    let rule = "─".repeat(100);
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<44} {:>8} {:>5} {:<16} Preview",
        "Chat", "Size", "Msgs", "Modified"
    );
    let _ = writeln!(out, "{rule}");

    for chat in chats {
        let name = chat
            .path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let count = chat
            .message_count
            .map_or_else(|| UNKNOWN.to_string(), |n| n.to_string());
        let modified = chat
            .modified
            .map_or_else(|| UNKNOWN.to_string(), format_local_time);
        let preview = if chat.is_corrupt() {
            "(unreadable)".to_string()
        } else {
            chat.preview.clone().unwrap_or_else(|| "(empty chat)".to_string())
        };

        let _ = writeln!(
            out,
            "{:<44} {:>8} {:>5} {:<16} {}",
            name,
            format_size(chat.size_bytes),
            count,
            modified,
            preview
        );
    }

    let _ = writeln!(out, "{rule}");
    out
}

/// Format UTC time as local time for display.
fn format_local_time(utc: DateTime<Utc>) -> String {
    let local: DateTime<Local> = utc.into();
    local.format("%Y-%m-%d %H:%M").to_string()
}
