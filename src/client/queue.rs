// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Operation queue
//!
//! Every submitted operation becomes a tokio task that waits for a slot on
//! the queue semaphore before it runs. Cancelling an operation that has not
//! yet taken a slot completes it with [`Error::Cancelled`]; once it holds a
//! slot the request is already being built and cancellation is ignored.
//! Each operation's completion runs exactly once.

use std::future::Future;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use parking_lot::RwLock;
use tokio::sync::{oneshot, Semaphore};
use tokio::task::JoinHandle;

use crate::error::{Error, Result};
use crate::operations::OperationResponse;

/// Bounded executor for operations
#[derive(Debug)]
pub struct OperationQueue {
    /// Maximum operations in flight
    max_concurrent: usize,
    /// Semaphore for limiting concurrency
    semaphore: Arc<Semaphore>,
    /// Id of the next submitted operation
    next_id: AtomicU64,
    /// Queue statistics
    stats: RwLock<QueueStats>,
}

/// Queue statistics
#[derive(Debug, Clone, Default)]
pub struct QueueStats {
    /// Operations submitted
    pub submitted: u64,
    /// Operations that took a slot and ran
    pub dispatched: u64,
    /// Operations cancelled before dispatch
    pub cancelled: u64,
    /// Operations currently running
    pub active: u64,
    /// Peak concurrent operations
    pub peak_concurrent: u64,
    /// Total time spent waiting for a slot (ms)
    pub total_wait_ms: u64,
}

/// A queued operation
///
/// Dropping it does not cancel the operation.
#[derive(Debug)]
pub struct PendingOperation {
    id: u64,
    cancelled: Arc<AtomicBool>,
    task: JoinHandle<()>,
}

impl PendingOperation {
    /// Queue-assigned id
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Ask for the operation not to be dispatched
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    /// Whether [`cancel`](Self::cancel) was called
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }

    /// Whether the operation and its completion have run
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Wait until the completion has run
    pub async fn wait_until_finished(self) {
        if let Err(e) = self.task.await {
            if e.is_panic() {
                tracing::error!(operation_id = self.id, "Operation completion panicked");
            }
        }
    }
}

/// A queued operation whose outcome is delivered to the handle
#[derive(Debug)]
pub struct OperationHandle {
    pending: PendingOperation,
    outcome: oneshot::Receiver<Result<OperationResponse>>,
}

impl OperationHandle {
    /// Queue-assigned id
    pub fn id(&self) -> u64 {
        self.pending.id()
    }

    /// Ask for the operation not to be dispatched
    pub fn cancel(&self) {
        self.pending.cancel();
    }

    /// Wait for the outcome
    pub async fn wait(self) -> Result<OperationResponse> {
        self.outcome.await.unwrap_or(Err(Error::QueueClosed))
    }
}

impl OperationQueue {
    /// Create a queue running at most `max_concurrent` operations at once
    pub fn new(max_concurrent: usize) -> Self {
        let max_concurrent = max_concurrent.max(1);
        Self {
            max_concurrent,
            semaphore: Arc::new(Semaphore::new(max_concurrent)),
            next_id: AtomicU64::new(1),
            stats: RwLock::new(QueueStats::default()),
        }
    }

    /// Maximum operations in flight
    pub fn max_concurrent(&self) -> usize {
        self.max_concurrent
    }

    /// Free slots
    pub fn available_slots(&self) -> usize {
        self.semaphore.available_permits()
    }

    /// Get queue statistics
    pub fn stats(&self) -> QueueStats {
        self.stats.read().clone()
    }

    /// Stop dispatching; operations still waiting complete with
    /// [`Error::QueueClosed`]
    pub fn close(&self) {
        self.semaphore.close();
    }

    /// Whether [`close`](Self::close) was called
    pub fn is_closed(&self) -> bool {
        self.semaphore.is_closed()
    }

    /// Queue `work` and deliver its outcome to the returned handle
    pub fn submit<Fut>(self: &Arc<Self>, work: Fut) -> OperationHandle
    where
        Fut: Future<Output = Result<OperationResponse>> + Send + 'static,
    {
        let (tx, rx) = oneshot::channel();
        let pending = self.spawn(work, move |outcome| {
            // Receiver gone means the caller stopped waiting
            let _ = tx.send(outcome);
        });
        OperationHandle {
            pending,
            outcome: rx,
        }
    }

    /// Queue `work` and pass its outcome to `completion`
    pub fn spawn<Fut, C>(self: &Arc<Self>, work: Fut, completion: C) -> PendingOperation
    where
        Fut: Future<Output = Result<OperationResponse>> + Send + 'static,
        C: FnOnce(Result<OperationResponse>) + Send + 'static,
    {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let cancelled = Arc::new(AtomicBool::new(false));
        self.stats.write().submitted += 1;

        let queue = Arc::clone(self);
        let flag = Arc::clone(&cancelled);
        let task = tokio::spawn(async move {
            let outcome = queue.run(id, &flag, work).await;
            completion(outcome);
        });

        PendingOperation {
            id,
            cancelled,
            task,
        }
    }

    async fn run<Fut>(&self, id: u64, cancelled: &AtomicBool, work: Fut) -> Result<OperationResponse>
    where
        Fut: Future<Output = Result<OperationResponse>>,
    {
        let start = Instant::now();
        let permit = self.semaphore.clone().acquire_owned().await;

        {
            let mut stats = self.stats.write();
            stats.total_wait_ms += start.elapsed().as_millis() as u64;
        }

        let Ok(_permit) = permit else {
            tracing::debug!(operation_id = id, "Queue closed before dispatch");
            return Err(Error::QueueClosed);
        };

        if cancelled.load(Ordering::Acquire) {
            self.stats.write().cancelled += 1;
            tracing::debug!(operation_id = id, "Operation cancelled before dispatch");
            return Err(Error::Cancelled);
        }

        {
            let mut stats = self.stats.write();
            stats.dispatched += 1;
            stats.active += 1;
            if stats.active > stats.peak_concurrent {
                stats.peak_concurrent = stats.active;
            }
        }

        let outcome = work.await;

        {
            let mut stats = self.stats.write();
            stats.active = stats.active.saturating_sub(1);
        }

        outcome
    }
}
