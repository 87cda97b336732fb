//! Report rendering and export.
//!
//! This module turns the assembled mapping into the final text (through a
//! template) or JSON document and writes it to the export directory.

use crate::period::ReportPeriod;
use crate::report::assembler::ReportEnv;
use crate::report::template::render_template;
use anyhow::{Context, Result};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

/// Output format of the exported report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Template-rendered text (default)
    #[default]
    Text,
    /// JSON mapping of every statistic
    Json,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Text => "txt",
            OutputFormat::Json => "json",
        }
    }
}

/// Read a template file and substitute the report values into it.
pub fn generate_text_report(template_path: &Path, env: &ReportEnv) -> Result<String> {
    let template = std::fs::read_to_string(template_path)
        .with_context(|| format!("Failed to read template: {}", template_path.display()))?;
    Ok(render_template(&template, env))
}

/// Generate a JSON report.
pub fn generate_json_report(env: &ReportEnv) -> Result<String> {
    serde_json::to_string_pretty(env).map_err(Into::into)
}

/// `<period>_<subreddit>_<unix start time>.<ext>`
pub fn export_file_name(
    period: &ReportPeriod,
    subreddit: &str,
    started_at: i64,
    format: OutputFormat,
) -> String {
    format!(
        "{}_{}_{}.{}",
        period,
        subreddit,
        started_at,
        format.extension()
    )
}

/// Write the report to `dir/name`, creating the directory if needed.
pub fn write_report(dir: &Path, name: &str, content: &str) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create export directory: {}", dir.display()))?;

    let path = dir.join(name);
    let mut file = std::fs::File::create(&path)
        .with_context(|| format!("Failed to create report file: {}", path.display()))?;
    file.write_all(content.as_bytes())
        .with_context(|| format!("Failed to write report to {}", path.display()))?;

    info!("Exported report to {}", path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ReportValue;
    use chrono::NaiveDate;

    fn create_test_env() -> ReportEnv {
        let mut env = ReportEnv::new();
        env.insert("subreddit".to_string(), ReportValue::from("france"));
        env.insert("best_post_score".to_string(), ReportValue::from(42i64));
        env.insert("qualite_score".to_string(), ReportValue::from(67.36));
        env
    }

    #[test]
    fn test_generate_json_report() {
        let json = generate_json_report(&create_test_env()).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed["subreddit"], "france");
        assert_eq!(parsed["best_post_score"], 42);
        assert_eq!(parsed["qualite_score"], 67.36);
    }

    #[test]
    fn test_generate_text_report() {
        let dir = tempfile::tempdir().unwrap();
        let template = dir.path().join("template.md");
        std::fs::write(&template, "# BestOf /r/$subreddit\n\nScore : $best_post_score\n").unwrap();

        let text = generate_text_report(&template, &create_test_env()).unwrap();
        assert_eq!(text, "# BestOf /r/france\n\nScore : 42\n");

        assert!(generate_text_report(&dir.path().join("missing.md"), &create_test_env()).is_err());
    }

    #[test]
    fn test_export_file_name() {
        let period = ReportPeriod::Day(NaiveDate::from_ymd_opt(2021, 11, 2).unwrap());
        assert_eq!(
            export_file_name(&period, "france", 1635890000, OutputFormat::Text),
            "2021-11-02_france_1635890000.txt"
        );
        assert_eq!(
            export_file_name(&ReportPeriod::Year(2021), "france", 1, OutputFormat::Json),
            "2021_france_1.json"
        );
    }

    #[test]
    fn test_write_report_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let export_dir = dir.path().join("Exports");

        let path = write_report(&export_dir, "report.txt", "contenu").unwrap();
        assert_eq!(path, export_dir.join("report.txt"));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "contenu");
    }
}
