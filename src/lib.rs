//! chatvault - Durable local storage for AI chat transcripts.
//!
//! Saves conversations as self-contained JSON files with descriptive,
//! collision-free names, loads them back losslessly, and summarizes them
//! for history browsing without reading whole transcripts into memory.

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod providers;
pub mod size;
pub mod storage;

pub use config::Config;
pub use core::{ChatSession, Message, Role};
pub use error::{Error, Result};
pub use providers::{ModelDescriptor, ProviderCatalog, ProviderCredentials, ProviderFamily};
pub use size::format_size;
pub use storage::{ChatFileMetadata, ChatStore, ensure_chat_directory, generate_filename};
