//! Robots.txt handling module
//!
//! The seed host's robots.txt is fetched once, before any worker starts. Only
//! the seed URL is checked against it, and a disallowed seed is a warning,
//! not an error.

mod parser;

pub use parser::RobotsPolicy;

use crate::config::CrawlConfig;
use crate::crawler::{fetch_url, FetchError};
use crate::output::MirrorWriter;
use crate::MirrorError;
use reqwest::Client;
use url::Url;

/// Builds `{scheme}://{host}[:port]/robots.txt` for a URL
///
/// # Returns
///
/// * `Some(String)` - The robots.txt URL
/// * `None` - If the URL has no host
///
/// # Examples
///
/// ```
/// use site_mirror::robots::robots_url;
/// use url::Url;
///
/// let url = Url::parse("http://127.0.0.1:8080/docs/page.html?x=1").unwrap();
/// assert_eq!(robots_url(&url).as_deref(), Some("http://127.0.0.1:8080/robots.txt"));
/// ```
pub fn robots_url(url: &Url) -> Option<String> {
    url.host_str()?;
    let mut robots = url.clone();
    robots.set_path("/robots.txt");
    robots.set_query(None);
    robots.set_fragment(None);
    Some(robots.into())
}

/// Fetches and evaluates the seed host's robots.txt
///
/// # Status Handling
///
/// * 404 - No policy; the crawl proceeds and nothing is saved
/// * 200 - Parsed; a non-empty body is saved under the host directory
/// * Other statuses, including other 2xx codes, and network failures - Fatal
///
/// # Errors
///
/// * `MirrorError::RobotsFetch` - Network, timeout or redirect failure
/// * `MirrorError::RobotsStatus` - Any status other than 200 or 404
/// * `MirrorError::RobotsParse` - The body is not valid UTF-8
pub async fn check_robots(
    client: &Client,
    config: &CrawlConfig,
    writer: &MirrorWriter,
) -> Result<RobotsPolicy, MirrorError> {
    let url = robots_url(&config.seed_url)
        .ok_or_else(|| crate::UrlError::MissingHost(config.seed_url.to_string()))?;

    tracing::debug!("Fetching robots.txt from {}", url);

    let fetched = match fetch_url(client, &url).await {
        Ok(fetched) => fetched,
        Err(FetchError::Status { status: 404 }) => {
            tracing::info!("No robots.txt found at {}", url);
            return Ok(RobotsPolicy::allow_all());
        }
        Err(FetchError::Status { status }) => {
            return Err(MirrorError::RobotsStatus { url, status });
        }
        Err(source) => return Err(MirrorError::RobotsFetch { url, source }),
    };

    if fetched.status != 200 {
        return Err(MirrorError::RobotsStatus {
            url,
            status: fetched.status,
        });
    }

    if fetched.body.is_empty() {
        tracing::info!("Empty robots.txt at {}", url);
        return Ok(RobotsPolicy::allow_all());
    }

    let content = std::str::from_utf8(&fetched.body).map_err(|e| MirrorError::RobotsParse {
        url: url.clone(),
        message: e.to_string(),
    })?;
    let policy = RobotsPolicy::from_content(content);

    if !policy.is_allowed(config.seed_url.as_str(), &config.user_agent) {
        tracing::warn!(
            "Warning: {} is disallowed by robots.txt for user agent {}",
            config.seed_url,
            config.user_agent
        );
    }

    match writer.save(&url, &fetched.body, &fetched.content_type).await {
        Ok(path) => tracing::info!("Saved robots.txt to {}", path.display()),
        Err(e) => tracing::warn!("Failed to save robots.txt: {}", e),
    }

    Ok(policy)
}
