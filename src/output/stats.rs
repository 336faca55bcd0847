//! Run statistics and the final crawl report
//!
//! Workers bump lock-free counters while the crawl runs; the coordinator
//! takes one snapshot at the end and wraps it in a [`CrawlReport`].

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Live counters shared by every worker
#[derive(Debug, Default)]
pub struct CrawlStats {
    fetched: AtomicU64,
    saved: AtomicU64,
    bytes_written: AtomicU64,
    fetch_failures: AtomicU64,
    save_failures: AtomicU64,
    skipped_visited: AtomicU64,
    skipped_depth: AtomicU64,
}

impl CrawlStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_fetched(&self) {
        self.fetched.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_saved(&self, bytes: usize) {
        self.saved.fetch_add(1, Ordering::Relaxed);
        self.bytes_written.fetch_add(bytes as u64, Ordering::Relaxed);
    }

    pub fn record_fetch_failure(&self) {
        self.fetch_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_save_failure(&self) {
        self.save_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_skipped_visited(&self) {
        self.skipped_visited.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_skipped_depth(&self) {
        self.skipped_depth.fetch_add(1, Ordering::Relaxed);
    }

    /// Reads every counter into a plain value
    ///
    /// Counters are read one by one, so a snapshot taken while workers are
    /// still running is only approximately consistent.
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            fetched: self.fetched.load(Ordering::Relaxed),
            saved: self.saved.load(Ordering::Relaxed),
            bytes_written: self.bytes_written.load(Ordering::Relaxed),
            fetch_failures: self.fetch_failures.load(Ordering::Relaxed),
            save_failures: self.save_failures.load(Ordering::Relaxed),
            skipped_visited: self.skipped_visited.load(Ordering::Relaxed),
            skipped_depth: self.skipped_depth.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time copy of [`CrawlStats`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatsSnapshot {
    /// Successful fetches
    pub fetched: u64,

    /// Files written to the mirror tree
    pub saved: u64,

    /// Total bytes written to the mirror tree
    pub bytes_written: u64,

    /// Fetches that failed (status, timeout, transport)
    pub fetch_failures: u64,

    /// Fetched bodies that could not be written
    pub save_failures: u64,

    /// Tasks discarded because the URL was already claimed
    pub skipped_visited: u64,

    /// Tasks discarded for exceeding the depth limit
    pub skipped_depth: u64,
}

/// How a crawl run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrawlOutcome {
    /// Every reachable task was processed
    Completed,

    /// The run-wide deadline fired first; the mirror is partial
    DeadlineReached,
}

impl fmt::Display for CrawlOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CrawlOutcome::Completed => write!(f, "completed"),
            CrawlOutcome::DeadlineReached => write!(f, "deadline reached"),
        }
    }
}

/// Summary returned by a finished crawl run
#[derive(Debug, Clone)]
pub struct CrawlReport {
    pub outcome: CrawlOutcome,
    pub stats: StatsSnapshot,
    pub elapsed: Duration,
}

impl CrawlReport {
    /// Returns true if the run ended on its deadline
    pub fn timed_out(&self) -> bool {
        self.outcome == CrawlOutcome::DeadlineReached
    }
}

/// Logs the report at the end of a run
pub fn log_report(report: &CrawlReport) {
    let stats = &report.stats;

    if report.timed_out() {
        tracing::warn!(
            "Download stopped at deadline after {:.2?}: partial mirror",
            report.elapsed
        );
    } else {
        tracing::info!("Download completed in {:.2?}", report.elapsed);
    }

    tracing::info!(
        "Fetched {} URLs, saved {} files ({} bytes)",
        stats.fetched,
        stats.saved,
        stats.bytes_written
    );

    if stats.fetch_failures > 0 || stats.save_failures > 0 {
        tracing::warn!(
            "{} fetch failures, {} save failures",
            stats.fetch_failures,
            stats.save_failures
        );
    }

    tracing::debug!(
        "Discarded {} already visited and {} too deep",
        stats.skipped_visited,
        stats.skipped_depth
    );
}
