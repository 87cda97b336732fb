//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use crate::period::PeriodKind;
use crate::report::OutputFormat;
use clap::Parser;
use std::path::PathBuf;

/// BestOf - award reports for a subreddit
///
/// Computes the day's (or month's, or year's) awards from a record file of
/// posts and comments and renders them through a template.
///
/// Examples:
///   bestof --subreddit france --input records.json --template-file post.md
///   bestof -s france -i records.json --period month --date 2021-11 --format json
///   bestof -s france -i records.json -f post.md --offline
///   bestof --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Subreddit the records come from (without prefix, example: france)
    #[arg(short, long, required_unless_present = "init_config")]
    pub subreddit: Option<String>,

    /// JSON file holding the posts and comments of the report window
    #[arg(short, long, value_name = "FILE", required_unless_present = "init_config")]
    pub input: Option<PathBuf>,

    /// Template file containing the content of the report
    ///
    /// Required with --format text.
    #[arg(short = 'f', long, value_name = "FILE")]
    pub template_file: Option<PathBuf>,

    /// Template file containing the title of the report
    #[arg(short = 't', long, value_name = "FILE")]
    pub title_template: Option<PathBuf>,

    /// Kind of report window
    #[arg(short, long, default_value = "day", value_name = "KIND")]
    pub period: PeriodKind,

    /// Report window: YYYY-MM-DD, YYYY-MM or YYYY depending on --period
    ///
    /// Defaults to the current day, month or year.
    #[arg(short, long, value_name = "VALUE")]
    pub date: Option<String>,

    /// Output format (text, json)
    #[arg(long, default_value = "text", value_name = "FORMAT")]
    pub format: OutputFormat,

    /// Write the report to this file instead of the export directory
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Directory receiving exported reports
    #[arg(long, value_name = "DIR")]
    pub export_dir: Option<PathBuf>,

    /// Base URL of the forum JSON API used for comment lookups
    #[arg(long, value_name = "URL", env = "BESTOF_API_URL")]
    pub api_url: Option<String>,

    /// Lookup request timeout in seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Title prefix of the open-discussion thread excluded from the
    /// most-commented award
    #[arg(long, value_name = "PREFIX")]
    pub open_thread_marker: Option<String>,

    /// Never reach the forum; a discussed comment outside the records fails
    /// the report
    #[arg(long)]
    pub offline: bool,

    /// Keep every record regardless of its timestamp
    #[arg(long)]
    pub no_window: bool,

    /// Path to configuration file
    ///
    /// If not specified, looks for .bestof.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long)]
    pub quiet: bool,

    /// Generate a default .bestof.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        // Skip validation for --init-config
        if self.init_config {
            return Ok(());
        }

        match self.subreddit.as_deref() {
            Some(sub) if !sub.is_empty() && !sub.contains('/') => {}
            _ => return Err("Subreddit must be a bare name, e.g. 'france'".to_string()),
        }

        if let Some(ref input) = self.input {
            if !input.is_file() {
                return Err(format!("Record file does not exist: {}", input.display()));
            }
        }

        if self.format == OutputFormat::Text && self.template_file.is_none() {
            return Err("--template-file is required with --format text".to_string());
        }

        for template in [&self.template_file, &self.title_template].into_iter().flatten() {
            if !template.is_file() {
                return Err(format!("Template {} does not exist", template.display()));
            }
        }

        if let Some(ref url) = self.api_url {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err("API URL must start with 'http://' or 'https://'".to_string());
            }
        }

        // Check for conflicting options
        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        if let Some(timeout) = self.timeout {
            if timeout == 0 {
                return Err("Timeout must be at least 1 second".to_string());
            }
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }

    /// Subreddit name; empty when running --init-config.
    pub fn subreddit_name(&self) -> &str {
        self.subreddit.as_deref().unwrap_or("")
    }
}
