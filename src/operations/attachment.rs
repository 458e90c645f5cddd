// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Attachment operations

use bytes::Bytes;

use super::{present, segment, Parts, Payload};

/// `PUT /{database}/{doc_id}/{name}?rev=`, uploading an attachment
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PutAttachment {
    pub database: Option<String>,
    pub doc_id: Option<String>,
    /// Current revision of the owning document
    pub rev: Option<String>,
    /// Attachment name
    pub name: Option<String>,
    /// MIME type sent as `Content-Type`
    pub content_type: Option<String>,
    /// Attachment bytes
    pub data: Option<Bytes>,
}

impl PutAttachment {
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

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    pub fn data(mut self, data: impl Into<Bytes>) -> Self {
        self.data = Some(data.into());
        self
    }

    pub(crate) fn parts(&self) -> Parts<'_> {
        let payload = match (&self.data, &self.content_type) {
            (Some(data), Some(content_type)) => Some(Payload::Raw {
                data,
                content_type: content_type.as_str(),
            }),
            _ => None,
        };

        Parts {
            required: vec![
                ("database", present(&self.database)),
                ("doc_id", present(&self.doc_id)),
                ("rev", present(&self.rev)),
                ("name", present(&self.name)),
                ("content_type", present(&self.content_type)),
                ("data", self.data.is_some()),
            ],
            segments: vec![
                segment(&self.database),
                segment(&self.doc_id),
                segment(&self.name),
            ],
            params: vec![("rev", segment(&self.rev).to_string())],
            payload,
        }
    }
}

/// `GET /{database}/{doc_id}/{name}`, returning the raw attachment bytes
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReadAttachment {
    pub database: Option<String>,
    pub doc_id: Option<String>,
    pub name: Option<String>,
    /// Read from this document revision instead of the winning one
    pub rev: Option<String>,
}

impl ReadAttachment {
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

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn rev(mut self, rev: impl Into<String>) -> Self {
        self.rev = Some(rev.into());
        self
    }

    pub(crate) fn parts(&self) -> Parts<'_> {
        let mut params = Vec::new();
        if present(&self.rev) {
            params.push(("rev", segment(&self.rev).to_string()));
        }

        Parts {
            required: vec![
                ("database", present(&self.database)),
                ("doc_id", present(&self.doc_id)),
                ("name", present(&self.name)),
            ],
            segments: vec![
                segment(&self.database),
                segment(&self.doc_id),
                segment(&self.name),
            ],
            params,
            payload: None,
        }
    }
}

/// `DELETE /{database}/{doc_id}/{name}?rev=`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeleteAttachment {
    pub database: Option<String>,
    pub doc_id: Option<String>,
    pub rev: Option<String>,
    pub name: Option<String>,
}

impl DeleteAttachment {
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

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub(crate) fn parts(&self) -> Parts<'_> {
        Parts {
            required: vec![
                ("database", present(&self.database)),
                ("doc_id", present(&self.doc_id)),
                ("rev", present(&self.rev)),
                ("name", present(&self.name)),
            ],
            segments: vec![
                segment(&self.database),
                segment(&self.doc_id),
                segment(&self.name),
            ],
            params: vec![("rev", segment(&self.rev).to_string())],
            payload: None,
        }
    }
}
