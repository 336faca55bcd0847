//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the crawl run that coordinates all aspects of
//! mirroring a site, including:
//! - Preparing the output tree and checking robots.txt
//! - Starting the worker pool on the shared work queue
//! - Fetching, saving and extracting per task
//! - Detecting completion and enforcing the run deadline

use crate::config::{validate, CrawlConfig};
use crate::crawler::extractor::{extract_css_urls, ContentExtractor, HtmlExtractor};
use crate::crawler::scheduler::{CrawlTask, VisitedSet, WorkQueue};
use crate::crawler::{build_http_client, fetch_url, FetchResult};
use crate::output::{CrawlOutcome, CrawlReport, CrawlStats, MirrorWriter};
use crate::robots::check_robots;
use crate::url::EligibilityFilter;
use crate::Result;
use reqwest::Client;
use std::sync::Arc;
use std::time::Instant;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use url::Url;

/// Main crawler coordinator structure
pub struct Coordinator {
    config: Arc<CrawlConfig>,
    client: Client,
    writer: Arc<MirrorWriter>,
    extractor: Arc<dyn ContentExtractor>,
}

impl Coordinator {
    /// Creates a new coordinator instance
    ///
    /// # Arguments
    ///
    /// * `config` - The crawl configuration; validated here
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Ready to run
    /// * `Err(MirrorError)` - Invalid configuration or HTTP client failure
    pub fn new(config: CrawlConfig) -> Result<Self> {
        validate(&config)?;
        let client = build_http_client(&config)?;
        let writer = MirrorWriter::new(config.output_dir.clone());

        Ok(Self {
            config: Arc::new(config),
            client,
            writer: Arc::new(writer),
            extractor: Arc::new(HtmlExtractor::new()),
        })
    }

    /// Replaces the HTML extractor, e.g. with extra resource rules
    pub fn with_extractor(mut self, extractor: impl ContentExtractor + 'static) -> Self {
        self.extractor = Arc::new(extractor);
        self
    }

    pub fn config(&self) -> &CrawlConfig {
        &self.config
    }

    /// Runs one crawl to completion or to the deadline
    ///
    /// 1. Creates the output root
    /// 2. Checks robots.txt for the seed host, if enabled
    /// 3. Starts the worker pool and enqueues the seed at depth 0
    /// 4. Waits until all work is done or the deadline fires
    ///
    /// Per-URL failures never end the run. Reaching the deadline is reported
    /// as [`CrawlOutcome::DeadlineReached`], not as an error.
    pub async fn run(&self) -> Result<CrawlReport> {
        let start = Instant::now();
        tracing::info!("Starting download of {}", self.config.seed_url);

        self.writer.ensure_root().await?;

        if self.config.respect_robots {
            let policy = check_robots(&self.client, &self.config, &self.writer).await?;
            if policy.is_allow_all() {
                tracing::debug!("robots.txt places no restrictions on this host");
            }
        }

        let shutdown = CancellationToken::new();
        let queue = WorkQueue::new(self.config.queue_capacity, shutdown.clone());
        let done = queue.done_signal();
        let stats = Arc::new(CrawlStats::new());
        let visited = VisitedSet::new();
        let filter = Arc::new(EligibilityFilter::new(
            &self.config.seed_url,
            self.config.same_domain_only,
        ));

        let mut workers = JoinSet::new();
        for id in 0..self.config.workers {
            let worker = Worker {
                id,
                config: Arc::clone(&self.config),
                client: self.client.clone(),
                writer: Arc::clone(&self.writer),
                extractor: Arc::clone(&self.extractor),
                filter: Arc::clone(&filter),
                queue: queue.clone(),
                visited: visited.clone(),
                stats: Arc::clone(&stats),
            };
            workers.spawn(worker.run());
        }

        queue
            .push(CrawlTask::new(self.config.seed_url.to_string(), 0))
            .await;

        let outcome = tokio::select! {
            _ = done.cancelled() => {
                while let Some(joined) = workers.join_next().await {
                    if let Err(e) = joined {
                        tracing::error!("Worker task failed: {}", e);
                    }
                }
                CrawlOutcome::Completed
            }
            _ = tokio::time::sleep(self.config.deadline) => {
                shutdown.cancel();
                tracing::warn!(
                    "Deadline of {:?} reached, stopping with {} tasks outstanding",
                    self.config.deadline,
                    queue.outstanding()
                );
                // In-flight fetches finish or time out on their own
                workers.detach_all();
                CrawlOutcome::DeadlineReached
            }
        };

        queue.close().await;
        tracing::debug!("Visited {} distinct URLs", visited.len());

        Ok(CrawlReport {
            outcome,
            stats: stats.snapshot(),
            elapsed: start.elapsed(),
        })
    }
}

/// One member of the worker pool
struct Worker {
    id: usize,
    config: Arc<CrawlConfig>,
    client: Client,
    writer: Arc<MirrorWriter>,
    extractor: Arc<dyn ContentExtractor>,
    filter: Arc<EligibilityFilter>,
    queue: WorkQueue,
    visited: VisitedSet,
    stats: Arc<CrawlStats>,
}

impl Worker {
    async fn run(self) {
        tracing::trace!("Worker {} started", self.id);

        while let Some(task) = self.queue.next().await {
            let _completion = self.queue.completion_guard();
            self.process(task).await;
        }

        tracing::trace!("Worker {} stopped", self.id);
    }

    /// Processes a single task
    ///
    /// Fetch and save failures are logged and end the task; they never reach
    /// the caller.
    async fn process(&self, task: CrawlTask) {
        if task.depth > self.config.max_depth {
            tracing::debug!("Skipping {} at depth {}", task.url, task.depth);
            self.stats.record_skipped_depth();
            return;
        }

        if !self.visited.mark(&task.url) {
            tracing::debug!("Already visited {}", task.url);
            self.stats.record_skipped_visited();
            return;
        }

        if !self.config.delay.is_zero() {
            tokio::time::sleep(self.config.delay).await;
        }

        let fetched = match fetch_url(&self.client, &task.url).await {
            Ok(fetched) => fetched,
            Err(e) => {
                tracing::warn!("Failed to download {}: {}", task.url, e);
                self.stats.record_fetch_failure();
                return;
            }
        };
        self.stats.record_fetched();

        match self
            .writer
            .save(&task.url, &fetched.body, &fetched.content_type)
            .await
        {
            Ok(path) => {
                self.stats.record_saved(fetched.body.len());
                tracing::info!("Downloaded: {} -> {}", task.url, path.display());
            }
            Err(e) => {
                tracing::warn!("Failed to save {}: {}", task.url, e);
                self.stats.record_save_failure();
                return;
            }
        }

        self.enqueue_children(&task, &fetched).await;
    }

    /// Enqueues resources at the task's depth and links one level deeper
    async fn enqueue_children(&self, task: &CrawlTask, fetched: &FetchResult) {
        if !fetched.is_html() && !fetched.is_css() {
            return;
        }

        let Ok(base) = Url::parse(&task.url) else {
            return;
        };

        let (links, resources) = if fetched.is_html() {
            let extracted = self.extractor.extract(&base, &fetched.body);
            (extracted.links, extracted.resources)
        } else {
            (Vec::new(), extract_css_urls(&base, &fetched.body))
        };

        for resource in resources {
            if !self.eligible(&resource) {
                continue;
            }
            if !self.queue.push(CrawlTask::new(resource, task.depth)).await {
                return;
            }
        }

        let next_depth = task.depth + 1;
        if next_depth > self.config.max_depth {
            return;
        }

        for link in links {
            if !self.eligible(&link) {
                continue;
            }
            if !self.queue.push(CrawlTask::new(link, next_depth)).await {
                return;
            }
        }
    }

    fn eligible(&self, url: &str) -> bool {
        !self.visited.contains(url) && self.filter.should_download(url)
    }
}
