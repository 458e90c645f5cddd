// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Document operations

use serde::Serialize;
use serde_json::Value;

use super::{present, segment, Parts, Payload};
use crate::error::Result;

/// `PUT /{database}/{doc_id}`, creating or updating a document
///
/// Updating an existing document needs its current revision.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PutDocument {
    pub database: Option<String>,
    pub doc_id: Option<String>,
    pub rev: Option<String>,
    pub body: Option<Value>,
}

impl PutDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn database(mut self, database: impl Into<String>) -> Self {
        self.database = Some(database.into());
        self
    }

    pub fn doc_id(mut self, doc_id: impl Into<String>) -> Self {
        self.doc_id = Some(doc_id.into());
        self
    }

    pub fn rev(mut self, rev: impl Into<String>) -> Self {
        self.rev = Some(rev.into());
        self
    }

    pub fn body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Set the body from any serializable value
    pub fn body_from<T: Serialize>(self, body: &T) -> Result<Self> {
        Ok(self.body(serde_json::to_value(body)?))
    }

    pub(crate) fn parts(&self) -> Parts<'_> {
        let mut params = Vec::new();
        if let Some(rev) = self.rev.as_ref().filter(|r| !r.is_empty()) {
            params.push(("rev", rev.clone()));
        }

        Parts {
            required: vec![
                ("database", present(&self.database)),
                ("doc_id", present(&self.doc_id)),
                ("body", self.body.is_some()),
            ],
            segments: vec![segment(&self.database), segment(&self.doc_id)],
            params,
            payload: self.body.as_ref().map(Payload::Json),
        }
    }
}

/// `GET /{database}/{doc_id}`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GetDocument {
    pub database: Option<String>,
    pub doc_id: Option<String>,
    /// Fetch this revision instead of the winning one
    pub rev: Option<String>,
    /// Include the revision history (`revs=true`)
    pub include_revs: bool,
}

impl GetDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn database(mut self, database: impl Into<String>) -> Self {
        self.database = Some(database.into());
        self
    }

    pub fn doc_id(mut self, doc_id: impl Into<String>) -> Self {
        self.doc_id = Some(doc_id.into());
        self
    }

    pub fn rev(mut self, rev: impl Into<String>) -> Self {
        self.rev = Some(rev.into());
        self
    }

    pub fn include_revs(mut self, include: bool) -> Self {
        self.include_revs = include;
        self
    }

    pub(crate) fn parts(&self) -> Parts<'_> {
        let mut params = Vec::new();
        if let Some(rev) = self.rev.as_ref().filter(|r| !r.is_empty()) {
            params.push(("rev", rev.clone()));
        }
        if self.include_revs {
            params.push(("revs", "true".to_string()));
        }

        Parts {
            required: vec![
                ("database", present(&self.database)),
                ("doc_id", present(&self.doc_id)),
            ],
            segments: vec![segment(&self.database), segment(&self.doc_id)],
            params,
            payload: None,
        }
    }
}

/// `DELETE /{database}/{doc_id}?rev=`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeleteDocument {
    pub database: Option<String>,
    pub doc_id: Option<String>,
    pub rev: Option<String>,
}

impl DeleteDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn database(mut self, database: impl Into<String>) -> Self {
        self.database = Some(database.into());
        self
    }

    pub fn doc_id(mut self, doc_id: impl Into<String>) -> Self {
        self.doc_id = Some(doc_id.into());
        self
    }

    pub fn rev(mut self, rev: impl Into<String>) -> Self {
        self.rev = Some(rev.into());
        self
    }

    pub(crate) fn parts(&self) -> Parts<'_> {
        Parts {
            required: vec![
                ("database", present(&self.database)),
                ("doc_id", present(&self.doc_id)),
                ("rev", present(&self.rev)),
            ],
            segments: vec![segment(&self.database), segment(&self.doc_id)],
            params: vec![("rev", segment(&self.rev).to_string())],
            payload: None,
        }
    }
}
