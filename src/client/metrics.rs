// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Client metrics
//!
//! Counts operation outcomes and keeps a window of latencies for percentiles.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

const LATENCY_WINDOW: usize = 10_000;

/// Operation metrics collector
#[derive(Debug, Default)]
pub struct ClientMetrics {
    /// Operations that finished successfully
    operations_succeeded: AtomicU64,
    /// Operations the server answered with an unexpected status
    operations_failed: AtomicU64,
    /// Operations rejected before any request was sent
    validation_failures: AtomicU64,
    /// Transport failures and timeouts
    transport_errors: AtomicU64,
    /// Total operation time (milliseconds)
    total_latency_ms: AtomicU64,
    start_time: RwLock<Option<Instant>>,
    latencies: RwLock<Vec<u64>>,
}

/// Counters kept by the transport and queue, folded into a report
#[derive(Debug, Clone, Copy, Default)]
pub struct ExchangeCounters {
    /// HTTP exchanges sent, replays included
    pub exchanges: u64,
    /// Replays requested by interceptors
    pub retries: u64,
    /// `_session` exchanges started
    pub session_requests: u64,
    /// Operations cancelled before dispatch
    pub cancelled: u64,
}

/// Metrics report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsReport {
    /// Uptime in seconds
    pub uptime_secs: u64,
    /// Operations that completed, in any outcome
    pub operations_completed: u64,
    pub operations_succeeded: u64,
    pub operations_failed: u64,
    pub validation_failures: u64,
    pub transport_errors: u64,
    pub operations_cancelled: u64,
    /// HTTP exchanges sent, replays included
    pub exchanges: u64,
    /// Replays requested by interceptors
    pub retries: u64,
    /// `_session` exchanges started
    pub session_requests: u64,
    /// Average operation time (ms)
    pub avg_latency_ms: f64,
    /// Operation latency percentiles
    pub latency_p50_ms: u64,
    pub latency_p95_ms: u64,
    pub latency_p99_ms: u64,
    /// Operations per second
    pub operations_per_second: f64,
}

impl ClientMetrics {
    /// Create new metrics collector
    pub fn new() -> Self {
        let metrics = Self::default();
        *metrics.start_time.write() = Some(Instant::now());
        metrics
    }

    /// Record a finished operation
    pub fn record_outcome<T>(&self, outcome: &Result<T>, latency_ms: u64) {
        let counter = match outcome {
            Ok(_) => &self.operations_succeeded,
            Err(Error::Validation { .. }) => &self.validation_failures,
            Err(Error::Operation { .. }) => &self.operations_failed,
            Err(_) => &self.transport_errors,
        };
        counter.fetch_add(1, Ordering::Relaxed);

        if matches!(outcome, Err(Error::Validation { .. })) {
            return;
        }

        self.total_latency_ms.fetch_add(latency_ms, Ordering::Relaxed);
        let mut latencies = self.latencies.write();
        latencies.push(latency_ms);
        if latencies.len() > LATENCY_WINDOW {
            latencies.drain(0..LATENCY_WINDOW / 2);
        }
    }

    /// Operations that ran to an outcome
    pub fn completed(&self) -> u64 {
        self.operations_succeeded.load(Ordering::Relaxed)
            + self.operations_failed.load(Ordering::Relaxed)
            + self.validation_failures.load(Ordering::Relaxed)
            + self.transport_errors.load(Ordering::Relaxed)
    }

    /// Build a report
    pub fn report(&self, counters: ExchangeCounters) -> MetricsReport {
        let uptime_secs = self
            .start_time
            .read()
            .map(|t| t.elapsed().as_secs())
            .unwrap_or(0);

        let latencies = self.latencies.read();
        let (p50, p95, p99) = calculate_percentiles(&latencies);
        let timed = self.operations_succeeded.load(Ordering::Relaxed)
            + self.operations_failed.load(Ordering::Relaxed)
            + self.transport_errors.load(Ordering::Relaxed);

        let avg_latency_ms = if timed > 0 {
            self.total_latency_ms.load(Ordering::Relaxed) as f64 / timed as f64
        } else {
            0.0
        };

        let operations_completed = self.completed() + counters.cancelled;

        MetricsReport {
            uptime_secs,
            operations_completed,
            operations_succeeded: self.operations_succeeded.load(Ordering::Relaxed),
            operations_failed: self.operations_failed.load(Ordering::Relaxed),
            validation_failures: self.validation_failures.load(Ordering::Relaxed),
            transport_errors: self.transport_errors.load(Ordering::Relaxed),
            operations_cancelled: counters.cancelled,
            exchanges: counters.exchanges,
            retries: counters.retries,
            session_requests: counters.session_requests,
            avg_latency_ms,
            latency_p50_ms: p50,
            latency_p95_ms: p95,
            latency_p99_ms: p99,
            operations_per_second: operations_completed as f64 / uptime_secs.max(1) as f64,
        }
    }

    /// Reset all metrics
    pub fn reset(&self) {
        self.operations_succeeded.store(0, Ordering::Relaxed);
        self.operations_failed.store(0, Ordering::Relaxed);
        self.validation_failures.store(0, Ordering::Relaxed);
        self.transport_errors.store(0, Ordering::Relaxed);
        self.total_latency_ms.store(0, Ordering::Relaxed);
        *self.start_time.write() = Some(Instant::now());
        self.latencies.write().clear();
    }
}

/// Nearest-rank percentiles (p50, p95, p99)
fn calculate_percentiles(latencies: &[u64]) -> (u64, u64, u64) {
    if latencies.is_empty() {
        return (0, 0, 0);
    }

    let mut sorted = latencies.to_vec();
    sorted.sort_unstable();

    let len = sorted.len();
    let rank = |percent: usize| {
        let index = (len * percent).div_ceil(100).saturating_sub(1);
        sorted[index.min(len - 1)]
    };

    (rank(50), rank(95), rank(99))
}

/// Timer for one operation
pub struct MetricsTimer {
    start: Instant,
    metrics: Arc<ClientMetrics>,
}

impl MetricsTimer {
    /// Start a new timer
    pub fn start(metrics: Arc<ClientMetrics>) -> Self {
        Self {
            start: Instant::now(),
            metrics,
        }
    }

    /// Stop timer and record the outcome
    pub fn stop<T>(self, outcome: &Result<T>) {
        let latency_ms = self.start.elapsed().as_millis() as u64;
        self.metrics.record_outcome(outcome, latency_ms);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operations::OperationKind;

    #[test]
    fn test_metrics_basic() {
        let metrics = ClientMetrics::new();

        metrics.record_outcome(&Ok(()), 100);
        metrics.record_outcome(&Ok(()), 200);
        metrics.record_outcome::<()>(&Err(Error::operation(OperationKind::GetDocument, 404)), 50);
        metrics.record_outcome::<()>(
            &Err(Error::validation(OperationKind::GetDocument, "database")),
            0,
        );

        let report = metrics.report(ExchangeCounters {
            exchanges: 4,
            retries: 1,
            session_requests: 1,
            cancelled: 1,
        });
        assert_eq!(report.operations_completed, 5);
        assert_eq!(report.operations_succeeded, 2);
        assert_eq!(report.operations_failed, 1);
        assert_eq!(report.validation_failures, 1);
        assert_eq!(report.operations_cancelled, 1);
        assert_eq!(report.exchanges, 4);
        assert!((report.avg_latency_ms - 350.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_metrics_reset() {
        let metrics = ClientMetrics::new();
        metrics.record_outcome(&Ok(()), 100);

        metrics.reset();

        let report = metrics.report(ExchangeCounters::default());
        assert_eq!(report.operations_completed, 0);
        assert_eq!(report.latency_p50_ms, 0);
    }

    #[test]
    fn test_percentiles() {
        let latencies: Vec<u64> = (1..=100).collect();
        assert_eq!(calculate_percentiles(&latencies), (50, 95, 99));

        assert_eq!(calculate_percentiles(&[7]), (7, 7, 7));
        assert_eq!(calculate_percentiles(&[]), (0, 0, 0));
    }
}
