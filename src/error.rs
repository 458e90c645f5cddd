// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Error types for the cushion client
//!
//! One enum covers every failure a caller can observe: validation errors
//! raised before dispatch, transport failures, and non-success statuses
//! reported by the server for an operation.

use thiserror::Error;

use crate::operations::OperationKind;

/// Result type alias for cushion operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the cushion client
#[derive(Error, Debug)]
pub enum Error {
    /// HTTP exchange failed at the transport level
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// URL parsing failed
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// JSON encoding or decoding failed
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A required operation field was absent; no request was sent
    #[error("{operation} validation failed: missing required field `{field}`")]
    Validation {
        operation: OperationKind,
        field: &'static str,
    },

    /// The server answered with a status outside the operation's success set
    #[error("{operation} failed with status {status}{}", describe_reason(.error, .reason))]
    Operation {
        operation: OperationKind,
        status: u16,
        error: Option<String>,
        reason: Option<String>,
    },

    /// A header name or value could not be represented
    #[error("Invalid header {name}: {reason}")]
    InvalidHeader { name: String, reason: String },

    /// The operation was cancelled before it was dispatched
    #[error("Operation was cancelled before dispatch")]
    Cancelled,

    /// The operation queue stopped before delivering an outcome
    #[error("Operation queue closed")]
    QueueClosed,

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// An interceptor chain broke the exchange contract
    #[error("{0}")]
    Other(String),
}

fn describe_reason(error: &Option<String>, reason: &Option<String>) -> String {
    match (error, reason) {
        (Some(e), Some(r)) => format!(": {} ({})", e, r),
        (Some(e), None) => format!(": {}", e),
        (None, Some(r)) => format!(": {}", r),
        (None, None) => String::new(),
    }
}

impl Error {
    /// Create a validation error for a missing field
    pub fn validation(operation: OperationKind, field: &'static str) -> Self {
        Error::Validation { operation, field }
    }

    /// Create an operation failure from a status code
    pub fn operation(operation: OperationKind, status: u16) -> Self {
        Error::Operation {
            operation,
            status,
            error: None,
            reason: None,
        }
    }

    /// Attach the server-reported error/reason pair to an operation failure
    pub fn with_reason(mut self, server_error: Option<String>, server_reason: Option<String>) -> Self {
        if let Error::Operation {
            ref mut error,
            ref mut reason,
            ..
        } = self
        {
            *error = server_error;
            *reason = server_reason;
        }
        self
    }

    /// Create a generic error
    pub fn other<S: Into<String>>(msg: S) -> Self {
        Error::Other(msg.into())
    }

    /// Check if this error was raised before any network call
    pub fn is_validation(&self) -> bool {
        matches!(self, Error::Validation { .. })
    }

    /// Check if this is recoverable (can retry)
    pub fn is_recoverable(&self) -> bool {
        match self {
            Error::Http(_) => true,
            Error::Operation { status, .. } => *status == 429 || (500..600).contains(status),
            _ => false,
        }
    }

    /// Check if the server refused the request for lack of credentials
    pub fn is_unauthorized(&self) -> bool {
        matches!(self.status_code(), Some(401) | Some(403))
    }

    /// Get HTTP status code if available
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Error::Operation { status, .. } => Some(*status),
            Error::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// The operation this error belongs to, when known
    pub fn operation_kind(&self) -> Option<OperationKind> {
        match self {
            Error::Validation { operation, .. } | Error::Operation { operation, .. } => {
                Some(*operation)
            }
            _ => None,
        }
    }
}
