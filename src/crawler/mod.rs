//! Crawler module for fetching and mirroring a site
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching with a redirect cap and fixed headers
//! - HTML and CSS reference extraction
//! - The shared work queue and visited set
//! - Overall crawl coordination

mod coordinator;
mod extractor;
mod fetcher;
mod scheduler;

pub use coordinator::Coordinator;
pub use extractor::{extract_css_urls, ContentExtractor, Extracted, HtmlExtractor};
pub use fetcher::{build_http_client, fetch_url, FetchError, FetchResult, MAX_REDIRECTS};
pub use scheduler::{CompletionGuard, CrawlTask, VisitedSet, WorkQueue};

use crate::config::CrawlConfig;
use crate::output::CrawlReport;
use crate::MirrorError;

/// Runs a complete crawl operation
///
/// This is the main entry point for mirroring a site. It will:
/// 1. Validate the configuration and build the HTTP client
/// 2. Create the output root and check robots.txt
/// 3. Fetch the seed and everything reachable within the depth limit
/// 4. Stop when the queue drains or the run deadline fires
///
/// # Arguments
///
/// * `config` - The crawl configuration
///
/// # Returns
///
/// * `Ok(CrawlReport)` - The run finished, possibly at its deadline
/// * `Err(MirrorError)` - A fatal setup error
///
/// # Example
///
/// ```no_run
/// use site_mirror::config::CrawlConfig;
/// use site_mirror::crawler::crawl;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let mut config = CrawlConfig::new("https://example.com/")?;
/// config.max_depth = 2;
/// let report = crawl(config).await?;
/// println!("Saved {} files", report.stats.saved);
/// # Ok(())
/// # }
/// ```
pub async fn crawl(config: CrawlConfig) -> Result<CrawlReport, MirrorError> {
    Coordinator::new(config)?.run().await
}
