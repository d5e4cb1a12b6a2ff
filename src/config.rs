//! Configuration module for ttybbs.

use serde::Deserialize;
use std::path::Path;

use crate::crypto::{PostCipher, KEY_SIZE};
use crate::{BbsError, Result};

/// Environment variable holding the hex-encoded post encryption key.
pub const ENCRYPTION_KEY_ENV: &str = "TTYBBS_ENCRYPTION_KEY";

/// Storage configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Path to the board list JSON file.
    #[serde(default = "default_boards_file")]
    pub boards_file: String,
    /// Directory holding one post file per board.
    #[serde(default = "default_posts_dir")]
    pub posts_dir: String,
    /// Hex-encoded 256-bit key for post files (empty = plaintext).
    #[serde(default)]
    pub encryption_key: String,
}

fn default_boards_file() -> String {
    "data/boards.json".to_string()
}

fn default_posts_dir() -> String {
    "data/posts".to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            boards_file: default_boards_file(),
            posts_dir: default_posts_dir(),
            encryption_key: String::new(),
        }
    }
}

/// Board repository configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct BbsConfig {
    /// Boards created when no board list has been stored yet.
    #[serde(default = "default_boards")]
    pub default_boards: Vec<String>,
    /// Board used for posts that name no board.
    #[serde(default = "default_fallback_board")]
    pub fallback_board: String,
    /// Author recorded for posts and comments without one.
    #[serde(default = "default_author")]
    pub default_author: String,
    /// Posts per page when listing a board page by page.
    #[serde(default = "default_posts_per_page")]
    pub posts_per_page: usize,
}

fn default_boards() -> Vec<String> {
    vec!["general".to_string(), "tech".to_string()]
}

fn default_fallback_board() -> String {
    "general".to_string()
}

fn default_author() -> String {
    "anonymous".to_string()
}

fn default_posts_per_page() -> usize {
    10
}

impl Default for BbsConfig {
    fn default() -> Self {
        Self {
            default_boards: default_boards(),
            fallback_board: default_fallback_board(),
            default_author: default_author(),
            posts_per_page: default_posts_per_page(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Path to the log file. Blank logs to the console only.
    #[serde(default = "default_log_file")]
    pub file: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_file() -> String {
    "logs/ttybbs.log".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: default_log_file(),
        }
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    /// Storage configuration.
    #[serde(default)]
    pub storage: StorageConfig,
    /// Board repository configuration.
    #[serde(default)]
    pub bbs: BbsConfig,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(BbsError::Io)?;
        Self::parse(&content)
    }

    /// Load configuration from a TOML file and apply environment variable overrides.
    pub fn load_with_env<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| BbsError::Config(format!("config parse error: {e}")))
    }

    /// Apply environment variable overrides to the configuration.
    ///
    /// Supported environment variables:
    /// - `TTYBBS_ENCRYPTION_KEY`: Override the post encryption key
    pub fn apply_env_overrides(&mut self) {
        if let Ok(key) = std::env::var(ENCRYPTION_KEY_ENV) {
            if !key.trim().is_empty() {
                self.storage.encryption_key = key.trim().to_string();
            }
        }
    }

    /// Validate the configuration.
    ///
    /// Returns an error if:
    /// - The encryption key is set but does not decode to 32 bytes
    /// - `posts_per_page` is zero
    /// - The fallback board name is blank
    pub fn validate(&self) -> Result<()> {
        self.encryption_cipher()?;
        if self.bbs.posts_per_page == 0 {
            return Err(BbsError::Config(
                "posts_per_page must be greater than 0".to_string(),
            ));
        }
        if self.bbs.fallback_board.trim().is_empty() {
            return Err(BbsError::Config(
                "fallback_board must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Build the post cipher from the configured key, if one is set.
    pub fn encryption_cipher(&self) -> Result<Option<PostCipher>> {
        let key = self.storage.encryption_key.trim();
        if key.is_empty() {
            return Ok(None);
        }
        PostCipher::from_hex(key).map(Some).map_err(|e| {
            BbsError::Config(format!(
                "invalid encryption key (expected {} hex chars): {e}",
                KEY_SIZE * 2
            ))
        })
    }
}
