//! Site-Mirror: a bounded, concurrent website mirroring crawler
//!
//! Given a seed URL, this crate fetches pages and their embedded resources,
//! writes the retrieved bytes untouched into a local mirror tree, and follows
//! hyperlinks up to a configurable depth while honoring same-domain and
//! robots.txt restrictions.

pub mod config;
pub mod crawler;
pub mod output;
pub mod robots;
pub mod url;

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for Site-Mirror operations
///
/// Every variant here is fatal for a crawl run except the mirror write
/// variants, which the coordinator logs and skips per task.
#[derive(Debug, Error)]
pub enum MirrorError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Failed to create output directory {path}: {source}")]
    OutputDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to fetch robots.txt from {url}: {source}")]
    RobotsFetch {
        url: String,
        source: crawler::FetchError,
    },

    #[error("Unexpected status code for robots.txt at {url}: {status}")]
    RobotsStatus { url: String, status: u16 },

    #[error("Failed to parse robots.txt from {url}: {message}")]
    RobotsParse { url: String, message: String },

    #[error("Failed to create directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write file {path}: {source}")]
    WriteFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("URL error: {0}")]
    UrlError(#[from] UrlError),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Missing host in URL: {0}")]
    MissingHost(String),
}

/// Result type alias for Site-Mirror operations
pub type Result<T> = std::result::Result<T, MirrorError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::CrawlConfig;
pub use crawler::{crawl, Coordinator};
pub use output::{CrawlOutcome, CrawlReport};
pub use crate::url::{host_key, normalize, unique, EligibilityFilter};
