// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Typed CouchDB operations
//!
//! Each operation is a plain struct with optional fields, wrapped in the
//! [`Operation`] enum. What varies per kind (verb, success statuses,
//! response format) lives in one route table, [`OperationKind::route`];
//! what varies per value (required fields, path, query, body) comes from
//! each struct's `parts()`.
//!
//! ```rust
//! use cushion::operations::{Operation, PutAttachment};
//!
//! let put = PutAttachment::new()
//!     .database("db")
//!     .doc_id("doc")
//!     .rev("1-abc")
//!     .name("essay.txt")
//!     .content_type("text/plain")
//!     .data("hello");
//!
//! let op = Operation::from(put);
//! assert!(op.validate().is_ok());
//! assert_eq!(op.endpoint(), "/db/doc/essay.txt");
//! ```

mod attachment;
mod database;
mod document;
mod response;

use std::fmt;

use bytes::Bytes;
use reqwest::Method;
use url::Url;

use crate::error::{Error, Result};
use crate::http::{content_types, headers, Request};

pub use attachment::{DeleteAttachment, PutAttachment, ReadAttachment};
pub use database::{CreateDatabase, DeleteDatabase};
pub use document::{DeleteDocument, GetDocument, PutDocument};
pub use response::{DocumentRevision, OperationResponse};

pub(crate) use response::interpret;

/// Operation kinds known to the client
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    CreateDatabase,
    DeleteDatabase,
    PutDocument,
    GetDocument,
    DeleteDocument,
    PutAttachment,
    ReadAttachment,
    DeleteAttachment,
}

/// How a successful response body is interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseFormat {
    /// Body parsed as JSON
    Json,
    /// Body returned as raw bytes
    Raw,
}

/// Static routing data for an operation kind
#[derive(Debug, Clone)]
pub struct Route {
    pub method: Method,
    pub success: &'static [u16],
    pub format: ResponseFormat,
}

impl OperationKind {
    /// Route table
    pub fn route(self) -> Route {
        use OperationKind::*;
        let (method, success, format): (Method, &'static [u16], ResponseFormat) = match self {
            CreateDatabase => (Method::PUT, &[201, 202], ResponseFormat::Json),
            DeleteDatabase => (Method::DELETE, &[200, 202], ResponseFormat::Json),
            PutDocument => (Method::PUT, &[201, 202], ResponseFormat::Json),
            GetDocument => (Method::GET, &[200], ResponseFormat::Json),
            DeleteDocument => (Method::DELETE, &[200, 202], ResponseFormat::Json),
            PutAttachment => (Method::PUT, &[201, 202], ResponseFormat::Json),
            ReadAttachment => (Method::GET, &[200], ResponseFormat::Raw),
            DeleteAttachment => (Method::DELETE, &[200, 202], ResponseFormat::Json),
        };
        Route {
            method,
            success,
            format,
        }
    }

    /// Check whether `status` counts as success for this kind
    pub fn is_success(self, status: u16) -> bool {
        self.route().success.contains(&status)
    }

    fn label(self) -> &'static str {
        match self {
            OperationKind::CreateDatabase => "create database",
            OperationKind::DeleteDatabase => "delete database",
            OperationKind::PutDocument => "put document",
            OperationKind::GetDocument => "get document",
            OperationKind::DeleteDocument => "delete document",
            OperationKind::PutAttachment => "put attachment",
            OperationKind::ReadAttachment => "read attachment",
            OperationKind::DeleteAttachment => "delete attachment",
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Request body of an operation
#[derive(Debug)]
pub(crate) enum Payload<'a> {
    Json(&'a serde_json::Value),
    Raw { data: &'a Bytes, content_type: &'a str },
}

/// Per-value request description produced by each operation struct
#[derive(Debug)]
pub(crate) struct Parts<'a> {
    pub required: Vec<(&'static str, bool)>,
    pub segments: Vec<&'a str>,
    pub params: Vec<(&'static str, String)>,
    pub payload: Option<Payload<'a>>,
}

/// True when an optional string field holds a non-empty value
pub(crate) fn present(value: &Option<String>) -> bool {
    value.as_deref().map_or(false, |v| !v.is_empty())
}

/// Path segment for an optional field; empty when absent
pub(crate) fn segment(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or_default()
}

/// A single REST call against the server
#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    CreateDatabase(CreateDatabase),
    DeleteDatabase(DeleteDatabase),
    PutDocument(PutDocument),
    GetDocument(GetDocument),
    DeleteDocument(DeleteDocument),
    PutAttachment(PutAttachment),
    ReadAttachment(ReadAttachment),
    DeleteAttachment(DeleteAttachment),
}

impl Operation {
    /// Kind of this operation
    pub fn kind(&self) -> OperationKind {
        match self {
            Operation::CreateDatabase(_) => OperationKind::CreateDatabase,
            Operation::DeleteDatabase(_) => OperationKind::DeleteDatabase,
            Operation::PutDocument(_) => OperationKind::PutDocument,
            Operation::GetDocument(_) => OperationKind::GetDocument,
            Operation::DeleteDocument(_) => OperationKind::DeleteDocument,
            Operation::PutAttachment(_) => OperationKind::PutAttachment,
            Operation::ReadAttachment(_) => OperationKind::ReadAttachment,
            Operation::DeleteAttachment(_) => OperationKind::DeleteAttachment,
        }
    }

    fn parts(&self) -> Parts<'_> {
        match self {
            Operation::CreateDatabase(op) => op.parts(),
            Operation::DeleteDatabase(op) => op.parts(),
            Operation::PutDocument(op) => op.parts(),
            Operation::GetDocument(op) => op.parts(),
            Operation::DeleteDocument(op) => op.parts(),
            Operation::PutAttachment(op) => op.parts(),
            Operation::ReadAttachment(op) => op.parts(),
            Operation::DeleteAttachment(op) => op.parts(),
        }
    }

    /// Database the operation targets
    pub fn database(&self) -> Option<&str> {
        match self {
            Operation::CreateDatabase(op) => op.database.as_deref(),
            Operation::DeleteDatabase(op) => op.database.as_deref(),
            Operation::PutDocument(op) => op.database.as_deref(),
            Operation::GetDocument(op) => op.database.as_deref(),
            Operation::DeleteDocument(op) => op.database.as_deref(),
            Operation::PutAttachment(op) => op.database.as_deref(),
            Operation::ReadAttachment(op) => op.database.as_deref(),
            Operation::DeleteAttachment(op) => op.database.as_deref(),
        }
    }

    /// Point the operation at `database`
    pub fn set_database(&mut self, database: impl Into<String>) {
        let database = Some(database.into());
        match self {
            Operation::CreateDatabase(op) => op.database = database,
            Operation::DeleteDatabase(op) => op.database = database,
            Operation::PutDocument(op) => op.database = database,
            Operation::GetDocument(op) => op.database = database,
            Operation::DeleteDocument(op) => op.database = database,
            Operation::PutAttachment(op) => op.database = database,
            Operation::ReadAttachment(op) => op.database = database,
            Operation::DeleteAttachment(op) => op.database = database,
        }
    }

    /// Check required fields; fails on the first absent one
    pub fn validate(&self) -> Result<()> {
        let kind = self.kind();
        match self.parts().required.into_iter().find(|(_, ok)| !ok) {
            Some((field, _)) => Err(Error::validation(kind, field)),
            None => Ok(()),
        }
    }

    /// HTTP method
    pub fn method(&self) -> Method {
        self.kind().route().method
    }

    /// Unencoded request path, e.g. `/db/doc/attachment`
    pub fn endpoint(&self) -> String {
        format!("/{}", self.parts().segments.join("/"))
    }

    /// Query parameters
    pub fn parameters(&self) -> Vec<(&'static str, String)> {
        self.parts().params
    }

    /// Build the HTTP request against `base`, validating first
    pub fn to_request(&self, base: &Url) -> Result<Request> {
        self.validate()?;
        let parts = self.parts();
        let route = self.kind().route();

        let mut url = base.clone();
        url.path_segments_mut()
            .map_err(|_| Error::Config(format!("base URL cannot hold a path: {}", base)))?
            .pop_if_empty()
            .extend(&parts.segments);
        url.set_query(None);
        if !parts.params.is_empty() {
            let mut query = url.query_pairs_mut();
            for (name, value) in &parts.params {
                query.append_pair(name, value);
            }
        }

        let mut request = Request::new(route.method, url);
        if route.format == ResponseFormat::Json {
            request = request.header(headers::ACCEPT, content_types::JSON);
        }

        match parts.payload {
            Some(Payload::Json(value)) => request = request.json(value)?,
            Some(Payload::Raw { data, content_type }) => {
                request = request
                    .body(data.clone())
                    .header(headers::CONTENT_TYPE, content_type);
            }
            None => {}
        }

        Ok(request)
    }
}

macro_rules! impl_from_operation {
    ($($variant:ident),* $(,)?) => {
        $(
            impl From<$variant> for Operation {
                fn from(op: $variant) -> Self {
                    Operation::$variant(op)
                }
            }
        )*
    };
}

impl_from_operation!(
    CreateDatabase,
    DeleteDatabase,
    PutDocument,
    GetDocument,
    DeleteDocument,
    PutAttachment,
    ReadAttachment,
    DeleteAttachment,
);

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("http://localhost:5984").unwrap()
    }

    #[test]
    fn test_route_table() {
        assert_eq!(OperationKind::DeleteDatabase.route().method, Method::DELETE);
        assert!(OperationKind::DeleteDatabase.is_success(200));
        assert!(OperationKind::DeleteDatabase.is_success(202));
        assert!(!OperationKind::DeleteDatabase.is_success(201));
        assert!(!OperationKind::DeleteDatabase.is_success(404));
        assert_eq!(OperationKind::ReadAttachment.route().format, ResponseFormat::Raw);
    }

    #[test]
    fn test_request_url_is_encoded() {
        let op = Operation::from(GetDocument::new().database("my/db").doc_id("a b"));
        let request = op.to_request(&base()).unwrap();

        assert_eq!(request.method, Method::GET);
        assert_eq!(request.url.as_str(), "http://localhost:5984/my%2Fdb/a%20b");
        assert_eq!(op.endpoint(), "/my/db/a b");
    }

    #[test]
    fn test_request_under_base_path() {
        let base = Url::parse("https://proxy.example.com/couch/").unwrap();
        let op = Operation::from(CreateDatabase::named("animals"));
        let request = op.to_request(&base).unwrap();

        assert_eq!(request.url.as_str(), "https://proxy.example.com/couch/animals");
        assert_eq!(request.method, Method::PUT);
    }

    #[test]
    fn test_validation_runs_before_request() {
        let op = Operation::from(GetDocument::new().doc_id("doc"));
        let err = op.to_request(&base()).unwrap_err();
        assert!(matches!(
            err,
            Error::Validation {
                operation: OperationKind::GetDocument,
                field: "database"
            }
        ));
    }

    #[test]
    fn test_set_database() {
        let mut op = Operation::from(PutDocument::new().doc_id("doc"));
        assert_eq!(op.database(), None);
        op.set_database("db");
        assert_eq!(op.database(), Some("db"));
    }

    #[test]
    fn test_display() {
        assert_eq!(OperationKind::CreateDatabase.to_string(), "create database");
    }
}
