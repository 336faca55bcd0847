//! Configuration module for Site-Mirror
//!
//! A crawl is driven by one immutable [`CrawlConfig`]. It starts from built-in
//! defaults, can be layered with an optional TOML file, and is finally
//! overridden by command-line flags before being validated.
//!
//! # Example
//!
//! ```no_run
//! use site_mirror::config::{load_config_file, validate, CrawlConfig};
//! use std::path::Path;
//!
//! let mut config = CrawlConfig::new("https://example.com/").unwrap();
//! let file = load_config_file(Path::new("mirror.toml")).unwrap();
//! config.apply_file(&file);
//! validate(&config).unwrap();
//! println!("Crawler will use max depth: {}", config.max_depth);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    CrawlConfig, FileConfig, DEFAULT_DEADLINE_SECS, DEFAULT_DELAY_MS, DEFAULT_MAX_DEPTH,
    DEFAULT_OUTPUT_DIR, DEFAULT_QUEUE_CAPACITY, DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT,
    DEFAULT_WORKERS,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config_file, load_config_file_with_hash};
pub use validation::validate;
