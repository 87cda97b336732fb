//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.bestof.toml` files.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Name of the configuration file looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = ".bestof.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Forum endpoints and link style.
    #[serde(default)]
    pub forum: ForumConfig,

    /// Award computation settings.
    #[serde(default)]
    pub awards: AwardsConfig,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Directory receiving the rendered reports.
    #[serde(default = "default_export_dir")]
    pub export_dir: String,

    /// Enable verbose logging by default.
    #[serde(default)]
    pub verbose: bool,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            export_dir: default_export_dir(),
            verbose: false,
        }
    }
}

fn default_export_dir() -> String {
    "Exports".to_string()
}

/// Forum settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForumConfig {
    /// Base URL prefixed to permalinks in the report.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Base URL of the JSON API used for out-of-band comment lookups.
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Number of parent comments shown when following a comment link.
    #[serde(default = "default_context")]
    pub context: u32,

    /// User agent sent with API requests.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

impl Default for ForumConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_url: default_api_url(),
            context: default_context(),
            user_agent: default_user_agent(),
            timeout_seconds: default_timeout(),
        }
    }
}

fn default_base_url() -> String {
    crate::sanitize::DEFAULT_BASE_URL.to_string()
}

fn default_api_url() -> String {
    "https://www.reddit.com".to_string()
}

fn default_context() -> u32 {
    crate::sanitize::DEFAULT_CONTEXT
}

fn default_user_agent() -> String {
    format!("rust:bestof:v{}", env!("CARGO_PKG_VERSION"))
}

fn default_timeout() -> u64 {
    30
}

/// Award computation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AwardsConfig {
    /// Title prefix of the daily open-discussion thread, excluded from the
    /// most-commented award.
    #[serde(default = "default_open_thread_marker")]
    pub open_thread_marker: String,

    /// Maximum length of comment excerpts in the report.
    #[serde(default = "default_max_text_length")]
    pub max_text_length: usize,

    /// Total characters an author must exceed to compete for the quality award.
    #[serde(default = "default_qualite_min_length")]
    pub qualite_min_length: usize,
}

impl Default for AwardsConfig {
    fn default() -> Self {
        Self {
            open_thread_marker: default_open_thread_marker(),
            max_text_length: default_max_text_length(),
            qualite_min_length: default_qualite_min_length(),
        }
    }
}

fn default_open_thread_marker() -> String {
    "[Forum Libre]".to_string()
}

fn default_max_text_length() -> usize {
    crate::sanitize::DEFAULT_MAX_TEXT_LENGTH
}

fn default_qualite_min_length() -> usize {
    140
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        Self::load_from_dir(Path::new("."))
    }

    /// Try to load configuration from a directory.
    pub fn load_from_dir(dir: &Path) -> Result<Option<Self>> {
        let config_path = dir.join(CONFIG_FILE_NAME);

        if config_path.exists() {
            Ok(Some(Self::load(&config_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings.
    /// This method only overrides config when CLI provides explicit values.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(ref export_dir) = args.export_dir {
            self.general.export_dir = export_dir.display().to_string();
        }

        if let Some(ref api_url) = args.api_url {
            self.forum.api_url = api_url.clone();
        }

        if let Some(timeout) = args.timeout {
            self.forum.timeout_seconds = timeout;
        }

        if let Some(ref marker) = args.open_thread_marker {
            self.awards.open_thread_marker = marker.clone();
        }

        // Flags always override
        if args.verbose {
            self.general.verbose = true;
        }
    }

    /// Log level once CLI flags are merged: `--quiet` wins, then the
    /// `verbose` setting from either source.
    pub fn log_level(&self, args: &crate::cli::Args) -> tracing::Level {
        if self.general.verbose && !args.quiet {
            tracing::Level::DEBUG
        } else {
            args.log_level()
        }
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}
