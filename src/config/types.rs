use crate::{ConfigError, ConfigResult};
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

pub const DEFAULT_OUTPUT_DIR: &str = "./download";
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0";
pub const DEFAULT_MAX_DEPTH: u32 = 1;
pub const DEFAULT_WORKERS: usize = 5;
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_DELAY_MS: u64 = 100;
pub const DEFAULT_DEADLINE_SECS: u64 = 60;
pub const DEFAULT_QUEUE_CAPACITY: usize = 1000;

/// Immutable snapshot of everything one crawl run needs
///
/// Built once before the run starts and then shared read-only by every
/// worker, so it carries no synchronization of its own.
#[derive(Debug, Clone)]
pub struct CrawlConfig {
    /// Starting point of the crawl
    pub seed_url: Url,

    /// Root of the mirror tree
    pub output_dir: PathBuf,

    /// Sent on every request and used for the robots.txt check
    pub user_agent: String,

    /// Link recursion bound (0 = seed page and its resources only)
    pub max_depth: u32,

    /// Number of concurrent workers
    pub workers: usize,

    /// Overall timeout for a single request
    pub request_timeout: Duration,

    /// Fixed pause before every fetch
    pub delay: Duration,

    /// Only follow URLs on the seed's host
    pub same_domain_only: bool,

    /// Fetch and check robots.txt before crawling
    pub respect_robots: bool,

    /// Run-wide deadline, independent of the per-request timeout
    pub deadline: Duration,

    /// Capacity of the shared work queue
    pub queue_capacity: usize,
}

impl CrawlConfig {
    /// Creates a configuration for `seed_url` with every other option at its default
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidUrl` if the seed cannot be parsed as an
    /// absolute URL.
    pub fn new(seed_url: &str) -> ConfigResult<Self> {
        let seed_url = Url::parse(seed_url).map_err(|e| {
            ConfigError::InvalidUrl(format!("Invalid seed URL '{}': {}", seed_url, e))
        })?;

        Ok(Self {
            seed_url,
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            max_depth: DEFAULT_MAX_DEPTH,
            workers: DEFAULT_WORKERS,
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            delay: Duration::from_millis(DEFAULT_DELAY_MS),
            same_domain_only: true,
            respect_robots: true,
            deadline: Duration::from_secs(DEFAULT_DEADLINE_SECS),
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
        })
    }

    /// Layers the values present in a configuration file over this config
    pub fn apply_file(&mut self, file: &FileConfig) {
        if let Some(dir) = &file.output_dir {
            self.output_dir = dir.clone();
        }
        if let Some(agent) = &file.user_agent {
            self.user_agent = agent.clone();
        }
        if let Some(depth) = file.max_depth {
            self.max_depth = depth;
        }
        if let Some(workers) = file.workers {
            self.workers = workers;
        }
        if let Some(secs) = file.timeout_secs {
            self.request_timeout = Duration::from_secs(secs);
        }
        if let Some(ms) = file.delay_ms {
            self.delay = Duration::from_millis(ms);
        }
        if let Some(same_domain) = file.same_domain_only {
            self.same_domain_only = same_domain;
        }
        if let Some(robots) = file.respect_robots {
            self.respect_robots = robots;
        }
        if let Some(secs) = file.deadline_secs {
            self.deadline = Duration::from_secs(secs);
        }
        if let Some(capacity) = file.queue_capacity {
            self.queue_capacity = capacity;
        }
    }
}

/// Optional settings read from a TOML configuration file
///
/// Every key is optional; absent keys leave the current value untouched.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileConfig {
    /// Root of the mirror tree
    pub output_dir: Option<PathBuf>,

    /// User-Agent header value
    pub user_agent: Option<String>,

    /// Link recursion bound
    pub max_depth: Option<u32>,

    /// Number of concurrent workers
    pub workers: Option<usize>,

    /// Per-request timeout (seconds)
    pub timeout_secs: Option<u64>,

    /// Delay before every fetch (milliseconds)
    pub delay_ms: Option<u64>,

    /// Restrict the crawl to the seed's host
    pub same_domain_only: Option<bool>,

    /// Check robots.txt before crawling
    pub respect_robots: Option<bool>,

    /// Run-wide deadline (seconds)
    pub deadline_secs: Option<u64>,

    /// Capacity of the shared work queue
    pub queue_capacity: Option<usize>,
}
