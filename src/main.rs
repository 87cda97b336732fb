//! BestOf - award reports for a subreddit
//!
//! A CLI tool that reads the posts and comments of a report window,
//! computes the award statistics and renders them through a template.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Runtime error (config, record file, empty statistic, lookup failure, etc.)

use anyhow::{Context, Result};
use bestof::analysis::AwardSettings;
use bestof::cli::Args;
use bestof::config::{self, Config};
use bestof::lookup::{CommentLookup, OfflineLookup, RedditLookup, RedditLookupConfig};
use bestof::period::ReportPeriod;
use bestof::records::RecordSet;
use bestof::report::{self, OutputFormat, ReportContext};
use chrono::Utc;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, error, info};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    // Load configuration before logging so its verbose setting applies
    let mut config = load_config(&args)?;
    config.merge_with_args(&args);

    // Initialize logging
    init_logging(config.log_level(&args));

    info!("BestOf v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);
    debug!("Configuration: {:?}", config);

    if let Err(e) = run_report(args, config).await {
        error!("Report failed: {:#}", e);
        eprintln!("\n❌ Error: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}

/// Handle --init-config: generate a default .bestof.toml.
fn handle_init_config() -> Result<()> {
    let path = Path::new(config::CONFIG_FILE_NAME);

    if path.exists() {
        eprintln!("⚠️  .bestof.toml already exists. Remove it first or edit it manually.");
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content).context("Failed to write .bestof.toml")?;

    println!("✅ Created .bestof.toml with default settings.");
    println!("   Edit it to customize links, award thresholds and the export directory.");
    Ok(())
}

/// Initialize logging at the resolved verbosity.
fn init_logging(level: tracing::Level) {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }
}

/// Run the complete report workflow.
async fn run_report(args: Args, config: Config) -> Result<()> {
    let start_time = Instant::now();
    let started_at = Utc::now();

    let subreddit = args.subreddit_name().to_string();

    // Step 1: Resolve the report window
    let period = match args.date {
        Some(ref value) => ReportPeriod::parse(args.period, value)?,
        None => ReportPeriod::current(args.period, started_at.date_naive()),
    };
    let range = period.timestamp_range()?;
    info!("Creating report for /r/{} and {}", subreddit, period);
    debug!(
        "Keeping records between {} and {}",
        range.min_timestamp, range.max_timestamp
    );

    // Step 2: Load and normalize the records
    let input = args.input.as_deref().context("No record file given")?;
    let mut records = RecordSet::load(input)?
        .normalize(&config.forum)
        .context("Record file is malformed")?;
    if !args.no_window {
        records = records.within(range.min_timestamp, range.max_timestamp);
    }

    if records.posts.is_empty() {
        anyhow::bail!(
            "No posts were found on /r/{} for {} (between {} and {})",
            subreddit,
            period,
            range.min_timestamp,
            range.max_timestamp
        );
    }

    // Step 3: Compute the awards
    let lookup: Box<dyn CommentLookup> = if args.offline {
        info!("Offline mode: comments outside the records cannot be fetched");
        Box::new(OfflineLookup)
    } else {
        Box::new(RedditLookup::new(RedditLookupConfig::from(&config.forum))?)
    };

    let context = ReportContext {
        date: range.display_date.clone(),
        subreddit: subreddit.clone(),
    };
    let settings = AwardSettings::from_config(&config);
    let env = report::assemble_report(&records, &context, &settings, lookup.as_ref())
        .await
        .context("Failed to compute statistics")?;

    // Step 4: Render and export
    let content = match args.format {
        OutputFormat::Json => report::generate_json_report(&env)?,
        OutputFormat::Text => {
            let template = args
                .template_file
                .as_deref()
                .context("--template-file is required with --format text")?;
            report::generate_text_report(template, &env)?
        }
    };

    let path = match args.output {
        Some(ref output) => {
            let dir = output.parent().unwrap_or_else(|| Path::new("."));
            let name = output
                .file_name()
                .and_then(|n| n.to_str())
                .context("Output path has no file name")?;
            report::write_report(dir, name, &content)?
        }
        None => {
            let name = report::export_file_name(
                &period,
                &subreddit,
                started_at.timestamp(),
                args.format,
            );
            report::write_report(Path::new(&config.general.export_dir), &name, &content)?
        }
    };

    if let Some(ref title_template) = args.title_template {
        let title_env = report::title_env(&env, &period.title_date()?);
        let title = report::generate_text_report(title_template, &title_env)?;
        println!("📰 Title: {}", title.trim());
    }

    // Print summary
    let duration = start_time.elapsed().as_secs_f64();
    println!("\n📊 Report Summary:");
    println!("   Posts: {}", records.posts.len());
    println!("   Comments: {}", records.comments.len());
    println!("   Unique users: {}", records.unique_authors());
    println!("   Duration: {:.1}s", duration);
    println!("\n✅ Report complete! Saved to: {}", path.display());

    Ok(())
}

/// Load configuration from file or use defaults.
///
/// Runs before the subscriber is installed, so problems go to stderr.
fn load_config(args: &Args) -> Result<Config> {
    // Try explicit config path
    if let Some(ref config_path) = args.config {
        return Config::load(config_path);
    }

    // Try default location
    match Config::load_default() {
        Ok(Some(config)) => Ok(config),
        Ok(None) => Ok(Config::default()),
        Err(e) => {
            eprintln!("⚠️  Failed to load .bestof.toml, using defaults: {:#}", e);
            Ok(Config::default())
        }
    }
}
