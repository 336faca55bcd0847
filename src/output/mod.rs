//! Output module for the mirror tree and the run report
//!
//! This module handles:
//! - Mapping URLs onto local file paths and writing fetched bytes
//! - Recording crawl statistics
//! - Summarizing how a run ended

mod mirror;
pub mod stats;

pub use mirror::MirrorWriter;
pub use stats::{log_report, CrawlOutcome, CrawlReport, CrawlStats, StatsSnapshot};
