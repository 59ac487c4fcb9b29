//! `chatvault import` command implementation.

use crate::config::Config;
use crate::core::{ChatSession, Message};
use crate::error::{Error, Result};
use crate::storage::ChatStore;
use std::fs;
use std::io::{self, Read};
use std::path::Path;

/// Run the import command.
///
/// Reads a JSON array of `{"role", "content"}` messages from `source` (a
/// file path, or `-` for stdin) and saves it as a new chat.
///
/// # Errors
///
/// Returns an error if the input cannot be read or parsed, contains no
/// messages, or the chat cannot be written.
pub fn run(config: &Config, source: &str, title: Option<&str>) -> Result<()> {
    let input = if source == "-" {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        fs::read_to_string(source).map_err(|e| Error::io_at(e, Path::new(source)))?
    };

    let session = parse_transcript(&input, title)?;
    let store = ChatStore::from_config(config);
    let path = store.save(&session)?;

    println!("Saved {} message(s) to {}", session.len(), path.display());
    Ok(())
}

/// Build a session from a JSON message array.
fn parse_transcript(input: &str, title: Option<&str>) -> Result<ChatSession> {
    let messages: Vec<Message> = serde_json::from_str(input)
        .map_err(|e| Error::InvalidInput(format!("expected a JSON array of messages: {e}")))?;

    if messages.is_empty() {
        return Err(Error::InvalidInput("transcript has no messages".to_string()));
    }

    let mut session = ChatSession::new();
    if let Some(title) = title {
        session = session.with_title(title);
    }
    session.extend(messages);
    Ok(session)
}
