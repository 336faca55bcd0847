//! Site-Mirror main entry point
//!
//! This is the command-line interface for the Site-Mirror website mirroring crawler.

use anyhow::Context;
use clap::{ArgAction, Parser};
use site_mirror::config::{load_config_file_with_hash, validate, CrawlConfig};
use site_mirror::crawler::Coordinator;
use site_mirror::output::log_report;
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// Site-Mirror: a bounded, concurrent website mirror
///
/// Site-Mirror downloads a page, its embedded resources and the pages it
/// links to, up to a depth limit, and writes everything into a local tree
/// laid out by host and path.
#[derive(Parser, Debug)]
#[command(name = "site-mirror")]
#[command(version = "1.0.0")]
#[command(about = "A bounded, concurrent website mirror", long_about = None)]
struct Cli {
    /// URL to start mirroring from
    #[arg(value_name = "URL")]
    url: String,

    /// Optional TOML configuration file; flags override its values
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Output directory
    #[arg(short, long, value_name = "DIR")]
    output: Option<PathBuf>,

    /// User-Agent header value
    #[arg(short, long)]
    user_agent: Option<String>,

    /// Maximum link depth
    #[arg(short, long)]
    depth: Option<u32>,

    /// Number of concurrent workers
    #[arg(short, long)]
    workers: Option<usize>,

    /// Per-request timeout in seconds
    #[arg(short, long, value_name = "SECONDS")]
    timeout: Option<u64>,

    /// Delay before each request in milliseconds
    #[arg(long, value_name = "MS")]
    delay: Option<u64>,

    /// Only download from the seed's host
    #[arg(short, long, value_name = "BOOL", action = ArgAction::Set)]
    same_domain: Option<bool>,

    /// Respect robots.txt
    #[arg(short, long, value_name = "BOOL", action = ArgAction::Set)]
    robots: Option<bool>,

    /// Run-wide deadline in seconds
    #[arg(long, value_name = "SECONDS")]
    deadline: Option<u64>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate and print the configuration without crawling
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let config = build_config(&cli)?;
    print_banner(&config);

    if cli.dry_run {
        println!("\n✓ Configuration is valid");
        return Ok(());
    }

    let coordinator = Coordinator::new(config).context("Failed to initialize crawler")?;
    let report = coordinator.run().await.context("Crawl failed")?;
    log_report(&report);

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("site_mirror=info,warn"),
            1 => EnvFilter::new("site_mirror=debug,info"),
            2 => EnvFilter::new("site_mirror=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Resolves the configuration: defaults, then the optional file, then flags
fn build_config(cli: &Cli) -> anyhow::Result<CrawlConfig> {
    let mut config = CrawlConfig::new(&cli.url)?;

    if let Some(path) = &cli.config {
        tracing::info!("Loading configuration from: {}", path.display());
        let (file, hash) = load_config_file_with_hash(path)
            .with_context(|| format!("Failed to load {}", path.display()))?;
        tracing::info!("Configuration loaded successfully (hash: {})", hash);
        config.apply_file(&file);
    }

    if let Some(output) = &cli.output {
        config.output_dir = output.clone();
    }
    if let Some(agent) = &cli.user_agent {
        config.user_agent = agent.clone();
    }
    if let Some(depth) = cli.depth {
        config.max_depth = depth;
    }
    if let Some(workers) = cli.workers {
        config.workers = workers;
    }
    if let Some(secs) = cli.timeout {
        config.request_timeout = Duration::from_secs(secs);
    }
    if let Some(ms) = cli.delay {
        config.delay = Duration::from_millis(ms);
    }
    if let Some(same_domain) = cli.same_domain {
        config.same_domain_only = same_domain;
    }
    if let Some(robots) = cli.robots {
        config.respect_robots = robots;
    }
    if let Some(secs) = cli.deadline {
        config.deadline = Duration::from_secs(secs);
    }

    validate(&config)?;
    Ok(config)
}

fn print_banner(config: &CrawlConfig) {
    println!("=== Site-Mirror ===\n");
    println!("  URL: {}", config.seed_url);
    println!("  Output: {}", config.output_dir.display());
    println!("  User agent: {}", config.user_agent);
    println!("  Max depth: {}", config.max_depth);
    println!("  Workers: {}", config.workers);
    println!("  Timeout: {:?}", config.request_timeout);
    println!("  Delay: {:?}", config.delay);
    println!("  Same domain only: {}", config.same_domain_only);
    println!("  Respect robots.txt: {}", config.respect_robots);
    println!("  Deadline: {:?}", config.deadline);
}
