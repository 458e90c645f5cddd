// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! # Cushion - Typed CouchDB Client
//!
//! An async client for CouchDB-compatible HTTP APIs (CouchDB, Cloudant).
//!
//! ## Features
//!
//! - Typed operations: databases, documents and attachments
//! - Validation before dispatch: missing fields never reach the network
//! - Interceptor chain: rewrite requests and responses, request replays
//! - Session cookie authentication with renewal on 401/403
//! - Operation queue: bounded concurrency, cancellation, completion callbacks
//! - Metrics: outcome counters and latency percentiles
//!
//! ## Example
//!
//! ```rust,no_run
//! use cushion::{ClientConfig, CouchClient};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Serialize, Deserialize)]
//! struct Animal {
//!     #[serde(rename = "_id")]
//!     id: String,
//!     legs: u32,
//! }
//!
//! #[tokio::main]
//! async fn main() -> cushion::Result<()> {
//!     let client = CouchClient::with_config(ClientConfig::from_env()?)?;
//!     let db = client.database("animals");
//!
//!     db.create().await?;
//!     let rev = db
//!         .put_document("aardvark", &Animal { id: "aardvark".into(), legs: 4 })
//!         .await?;
//!
//!     let animal: Animal = db.get_document(&rev.id).await?;
//!     println!("{} has {} legs", animal.id, animal.legs);
//!
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod error;
pub mod http;
pub mod network;
pub mod operations;

// Re-exports for convenience

// Client
pub use client::{ClientConfig, CouchClient, Database};
pub use client::{OperationHandle, OperationQueue, PendingOperation, QueueStats};
pub use client::{ClientMetrics, MetricsReport};

// Errors
pub use error::{Error, Result};

// HTTP
pub use http::{InterceptableSession, Request, Response};

// Network
pub use network::{
    HeaderInjector, HttpInterceptor, InterceptorChain, InterceptorContext, RequestLogger,
    SessionCookieInterceptor, SessionState,
};

// Operations
pub use operations::{
    CreateDatabase, DeleteAttachment, DeleteDatabase, DeleteDocument, DocumentRevision,
    GetDocument, Operation, OperationKind, OperationResponse, PutAttachment, PutDocument,
    ReadAttachment,
};

/// Cushion version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
