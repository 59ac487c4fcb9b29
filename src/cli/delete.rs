//! `chatvault delete` command implementation.

use crate::config::Config;
use crate::error::Result;
use crate::storage::ChatStore;

/// Run the delete command.
///
/// # Errors
///
/// Returns an error if the chat does not exist or cannot be removed.
pub fn run(config: &Config, chat: &str) -> Result<()> {
    let store = ChatStore::from_config(config);
    let path = store.resolve(chat);

    store.delete(&path)?;
    println!("Deleted {}", path.display());
    Ok(())
}
