//! Work queue and visited-set shared by the crawl workers
//!
//! This module handles:
//! - The bounded, self-feeding FIFO queue of crawl tasks
//! - Outstanding-task accounting and the "done" broadcast
//! - Run-wide shutdown observed by every receive and every blocked send
//! - The at-most-once visited set

use dashmap::DashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};
use tokio_util::sync::CancellationToken;

/// A URL waiting to be processed, with its link distance from the seed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlTask {
    /// Absolute, normalized URL
    pub url: String,

    /// Number of link hops from the seed
    pub depth: u32,
}

impl CrawlTask {
    pub fn new(url: impl Into<String>, depth: u32) -> Self {
        Self {
            url: url.into(),
            depth,
        }
    }
}

/// Set of URLs already claimed by a worker during this run
///
/// Cloning shares the underlying set; every worker must see every insert.
#[derive(Debug, Clone, Default)]
pub struct VisitedSet {
    inner: Arc<DashSet<String>>,
}

impl VisitedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks a URL as visited
    ///
    /// Check and insert happen as one atomic step, so of several workers
    /// racing on the same URL exactly one gets `true`.
    ///
    /// # Returns
    ///
    /// * `true` - The URL was not visited before; the caller owns it now
    /// * `false` - Another worker already claimed it
    pub fn mark(&self, url: &str) -> bool {
        self.inner.insert(url.to_string())
    }

    /// Returns true if the URL has already been claimed
    ///
    /// Advisory only; [`VisitedSet::mark`] is the authoritative check.
    pub fn contains(&self, url: &str) -> bool {
        self.inner.contains(url)
    }

    pub(crate) fn len(&self) -> usize {
        self.inner.len()
    }
}

/// Bounded multi-producer, multi-consumer task queue
///
/// Workers both consume from and produce into the same queue. Termination is
/// detected with an outstanding-task counter: it is incremented before a task
/// is sent and decremented only after the task (and every child it enqueued)
/// has been handled. When it drops to zero the `done` token fires and releases
/// every worker parked on [`WorkQueue::next`].
///
/// A full queue blocks the producer, but the blocked send still gives up when
/// the run is shut down.
#[derive(Debug, Clone)]
pub struct WorkQueue {
    sender: mpsc::Sender<CrawlTask>,
    receiver: Arc<Mutex<mpsc::Receiver<CrawlTask>>>,
    outstanding: Arc<AtomicUsize>,
    done: CancellationToken,
    shutdown: CancellationToken,
}

impl WorkQueue {
    /// Creates a queue holding at most `capacity` buffered tasks
    ///
    /// `shutdown` is the run-wide cancellation signal (the deadline).
    pub fn new(capacity: usize, shutdown: CancellationToken) -> Self {
        let (sender, receiver) = mpsc::channel(capacity.max(1));

        Self {
            sender,
            receiver: Arc::new(Mutex::new(receiver)),
            outstanding: Arc::new(AtomicUsize::new(0)),
            done: CancellationToken::new(),
            shutdown,
        }
    }

    /// Enqueues a task, waiting for room if the queue is full
    ///
    /// # Returns
    ///
    /// * `true` - The task was accepted
    /// * `false` - The run was shut down or the queue closed before it fit
    pub async fn push(&self, task: CrawlTask) -> bool {
        self.outstanding.fetch_add(1, Ordering::AcqRel);
        tracing::trace!("Enqueue {} (depth {})", task.url, task.depth);

        let accepted = tokio::select! {
            biased;
            _ = self.shutdown.cancelled() => false,
            sent = self.sender.send(task) => sent.is_ok(),
        };

        if !accepted {
            self.complete();
        }
        accepted
    }

    /// Waits for the next task
    ///
    /// # Returns
    ///
    /// * `Some(CrawlTask)` - A task to process; call [`WorkQueue::complete`] when done with it
    /// * `None` - All work is finished, the run was shut down, or the queue closed
    pub async fn next(&self) -> Option<CrawlTask> {
        let mut receiver = tokio::select! {
            biased;
            _ = self.shutdown.cancelled() => return None,
            _ = self.done.cancelled() => return None,
            guard = self.receiver.lock() => guard,
        };

        tokio::select! {
            biased;
            _ = self.shutdown.cancelled() => None,
            _ = self.done.cancelled() => None,
            task = receiver.recv() => task,
        }
    }

    /// Returns a guard that calls [`WorkQueue::complete`] when dropped
    ///
    /// Holding it while a task is processed keeps the outstanding count
    /// correct even if processing panics.
    pub fn completion_guard(&self) -> CompletionGuard<'_> {
        CompletionGuard { queue: self }
    }

    /// Marks one dequeued task as fully handled
    ///
    /// Must be called exactly once per task returned by [`WorkQueue::next`],
    /// after any children have been pushed.
    pub fn complete(&self) {
        if self.outstanding.fetch_sub(1, Ordering::AcqRel) == 1 {
            tracing::debug!("Work queue drained");
            self.done.cancel();
        }
    }

    /// Returns the signal fired once every enqueued task has been handled
    pub fn done_signal(&self) -> CancellationToken {
        self.done.clone()
    }

    /// Number of tasks enqueued but not yet completed
    pub fn outstanding(&self) -> usize {
        self.outstanding.load(Ordering::Acquire)
    }

    /// Closes the queue; later pushes are rejected
    pub async fn close(&self) {
        self.receiver.lock().await.close();
    }
}

/// Completes one task on drop; see [`WorkQueue::completion_guard`]
#[must_use = "the task is completed as soon as the guard is dropped"]
pub struct CompletionGuard<'a> {
    queue: &'a WorkQueue,
}

impl Drop for CompletionGuard<'_> {
    fn drop(&mut self) {
        self.queue.complete();
    }
}
