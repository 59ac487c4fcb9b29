//! `chatvault show` command implementation.

use crate::config::Config;
use crate::core::ChatSession;
use crate::error::Result;
use crate::storage::ChatStore;
use chrono::{DateTime, Local};
use std::fmt::Write;

/// Run the show command.
///
/// Prints the full transcript of a saved chat.
///
/// # Errors
///
/// Returns an error if the chat does not exist or cannot be parsed.
pub fn run(config: &Config, chat: &str) -> Result<()> {
    let store = ChatStore::from_config(config);
    let session = store.load(&store.resolve(chat))?;

    print!("{}", render_transcript(&session));
    Ok(())
}

/// Render a session as plain text.
fn render_transcript(session: &ChatSession) -> String {
    let started: DateTime<Local> = session.start_time().into();
    let mut out = String::new();

    if let Some(title) = session.title() {
        let _ = writeln!(out, "# {title}");
    }
    let _ = writeln!(
        out,
        "Started {} · {} message(s)",
        started.format("%Y-%m-%d %H:%M"),
        session.len()
    );

    for message in session.messages() {
        let _ = write!(out, "\n[{}]\n{}\n", message.role, message.content);
        for attachment in &message.attachments {
            let name = attachment
                .filename
                .as_deref()
                .unwrap_or(attachment.file_id.as_str());
            let _ = writeln!(out, "  📎 {name}");
        }
    }

    out
}
