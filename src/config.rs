//! Configuration loading and management.
//!
//! Configuration is loaded with the following precedence:
//! 1. Environment variables (`CHATVAULT_*`, provider API keys)
//! 2. Config file (`~/.chatvault/config.toml`)
//! 3. Defaults

use crate::error::{Error, Result};
use crate::providers::ProviderCredentials;
use crate::storage::filename::DEFAULT_SLUG_CHARS;
use crate::storage::metadata::DEFAULT_PREVIEW_CHARS;
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::PathBuf;

/// Main configuration struct.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// Storage configuration.
    pub storage: StorageConfig,

    /// History display configuration.
    pub history: HistoryConfig,

    /// Provider credentials.
    pub providers: ProviderCredentials,
}

/// Storage configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory holding saved chats.
    #[serde(alias = "path")]
    pub chat_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            chat_dir: default_home().join("chats"),
        }
    }
}

/// History display configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    /// Maximum characters shown in a chat preview.
    pub preview_chars: usize,

    /// Maximum characters of the filename slug.
    pub slug_chars: usize,

    /// Number of chats shown by `list` by default.
    pub list_limit: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            preview_chars: DEFAULT_PREVIEW_CHARS,
            slug_chars: DEFAULT_SLUG_CHARS,
            list_limit: 20,
        }
    }
}

/// Get the default chatvault home directory.
fn default_home() -> PathBuf {
    dirs::home_dir().map_or_else(|| PathBuf::from(".chatvault"), |h| h.join(".chatvault"))
}

/// Load configuration with precedence: env vars → file → defaults.
///
/// # Errors
///
/// Returns an error if the config file exists but cannot be read or parsed.
pub fn load_config() -> Result<Config> {
    load_config_with(|key| env::var(key).ok())
}

/// Load configuration using `lookup` in place of the process environment.
///
/// # Errors
///
/// Returns an error if the config file exists but cannot be read or parsed.
pub fn load_config_with(lookup: impl Fn(&str) -> Option<String>) -> Result<Config> {
    let mut config = Config::default();

    let config_path = config_path(&lookup);
    if config_path.exists() {
        let contents = fs::read_to_string(&config_path)?;
        config = parse_config(&contents)?;
        tracing::debug!(path = %config_path.display(), "loaded config file");
    }

    apply_env_overrides(&mut config, &lookup);

    Ok(config)
}

/// Parse a TOML config document.
///
/// # Errors
///
/// Returns [`Error::Config`] if the document is not valid TOML or has
/// fields of the wrong type.
pub fn parse_config(contents: &str) -> Result<Config> {
    toml::from_str(contents).map_err(|e| Error::Config(e.to_string()))
}

/// Get the path to the config file.
fn config_path(lookup: &impl Fn(&str) -> Option<String>) -> PathBuf {
    if let Some(path) = lookup("CHATVAULT_CONFIG") {
        return PathBuf::from(path);
    }

    if let Some(home) = lookup("CHATVAULT_HOME") {
        return PathBuf::from(home).join("config.toml");
    }

    default_home().join("config.toml")
}

/// Apply environment variable overrides to config.
fn apply_env_overrides(config: &mut Config, lookup: &impl Fn(&str) -> Option<String>) {
    // Storage path
    if let Some(dir) = lookup("CHATVAULT_CHAT_DIR") {
        config.storage.chat_dir = PathBuf::from(dir);
    } else if let Some(home) = lookup("CHATVAULT_HOME") {
        config.storage.chat_dir = PathBuf::from(home).join("chats");
    }

    // History
    if let Some(val) = lookup("CHATVAULT_PREVIEW_CHARS") {
        if let Ok(chars) = val.parse() {
            config.history.preview_chars = chars;
        }
    }

    if let Some(val) = lookup("CHATVAULT_LIST_LIMIT") {
        if let Ok(limit) = val.parse() {
            config.history.list_limit = limit;
        }
    }

    // Provider credentials
    if let Some(key) = lookup("OPENAI_API_KEY").filter(|k| !k.is_empty()) {
        config.providers.openai_api_key = Some(key);
    }

    if let Some(key) = lookup("ANTHROPIC_API_KEY")
        .filter(|k| !k.is_empty())
        .or_else(|| lookup("CLAUDE_API_KEY").filter(|k| !k.is_empty()))
    {
        config.providers.anthropic_api_key = Some(key);
    }
}
