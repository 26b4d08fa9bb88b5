//! jobscrub - remove stale jobs from a build-automation server
//!
//! One pass per invocation: select candidate jobs (override list, governing
//! pattern, or exclusion filters), measure days since each job's last
//! build, then delete everything past the staleness threshold — or just
//! report what would go, with `--dry-run`.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use tracing::Level;

use jobscrub_core::{
    init_tracing, DeletionPolicy, ScrubAction, ScrubConfig, ScrubDefaults, ScrubReport, Scrubber,
};
use jobscrub_server::JenkinsClient;

#[derive(Parser)]
#[command(name = "jobscrub")]
#[command(author = "Stevedores Org")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Remove stale jobs from a build-automation server", long_about = None)]
struct Cli {
    /// Build server URL
    server_url: String,

    /// Login username
    username: String,

    /// Login password or API token
    #[arg(env = "JOBSCRUB_PASSWORD")]
    password: String,

    /// TOML file with additional only/ignore entries
    #[arg(long)]
    config_file: Option<PathBuf>,

    /// Report the deletion plan without deleting anything
    #[arg(long)]
    dry_run: bool,

    /// Keep a job by exact name (repeatable)
    #[arg(long = "ignore-job", value_name = "NAME")]
    ignore_jobs: Vec<String>,

    /// Only consider this job, overriding all other filters (repeatable)
    #[arg(long = "job", value_name = "NAME")]
    only_jobs: Vec<String>,

    /// Keep jobs whose name matches this pattern (repeatable, ordered)
    #[arg(long = "regex-ignore-job", value_name = "PATTERN")]
    ignore_patterns: Vec<String>,

    /// Consider only jobs matching this pattern, replacing listing + filters
    #[arg(long, value_name = "PATTERN")]
    regex: Option<String>,

    /// Maximum number of days a job can stick around without a build
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    max_days: Option<u32>,

    /// Verify the server's TLS certificate (off by default)
    #[arg(long)]
    ssl_verify: bool,

    /// Order the deletion plan by ascending staleness
    #[arg(long)]
    sort: bool,

    /// Collect delete failures and keep going instead of aborting
    #[arg(long)]
    keep_going: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    init_tracing(cli.json, level);

    let defaults = ScrubDefaults::default();
    let config = build_config(&cli, &defaults)?;

    let client = JenkinsClient::new(
        &cli.server_url,
        &cli.username,
        &cli.password,
        config.ssl_verify,
    )
    .context("Failed to construct build server client")?;

    if config.dry_run {
        println!("-- (Simulation Mode) --");
    }

    let max_days = config.max_days;
    let today = Utc::now().date_naive();
    let scrubber = Scrubber::new(Arc::new(client), config, today);
    let report = scrubber.run().await.context("Scrub run failed")?;

    print_report(&report, max_days);

    if !report.is_clean() {
        anyhow::bail!("{} job deletion(s) failed", report.failures.len());
    }
    Ok(())
}

/// Assemble the run configuration: defaults, then CLI values, then the
/// optional config file (merged by union, first appearance wins).
fn build_config(cli: &Cli, defaults: &ScrubDefaults) -> Result<ScrubConfig> {
    let mut config = ScrubConfig::new(defaults);

    if cli.dry_run {
        config.dry_run = true;
    }
    if cli.ssl_verify {
        config.ssl_verify = true;
    }
    if let Some(days) = cli.max_days {
        config.max_days = days;
    }
    config.sort_by_staleness = cli.sort;
    if cli.keep_going {
        config.deletion_policy = DeletionPolicy::Continue;
    }
    config.pattern = cli.regex.clone();

    config.add_only_jobs(cli.only_jobs.iter().cloned());
    config.add_ignore_jobs(cli.ignore_jobs.iter().cloned());
    config.add_ignore_patterns(cli.ignore_patterns.iter().cloned());

    if let Some(path) = &cli.config_file {
        config.merge_file(path)?;
    }

    Ok(config)
}

fn print_report(report: &ScrubReport, max_days: u32) {
    println!("Jobs last built more than {max_days} days ago");

    if report.jobs.is_empty() {
        println!("Nothing to scrub.");
        return;
    }

    for planned in &report.jobs {
        println!(
            "({} days) - {}",
            planned.job.days_since_last_build, planned.job.name
        );
        if planned.action == ScrubAction::Deleted {
            println!("Job: {} deleted!", planned.job.name);
        }
    }

    for failure in &report.failures {
        eprintln!("Failed to delete {}: {}", failure.name, failure.error);
    }
}
