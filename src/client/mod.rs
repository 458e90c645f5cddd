// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Client, operation queue and configuration

mod config;
mod couch;
mod metrics;
mod queue;

pub use config::{env, ClientConfig, DEFAULT_URL};
pub use couch::{CouchClient, Database};
pub use metrics::{ClientMetrics, ExchangeCounters, MetricsReport, MetricsTimer};
pub use queue::{OperationHandle, OperationQueue, PendingOperation, QueueStats};
