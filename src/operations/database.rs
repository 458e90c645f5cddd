// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Database lifecycle operations

use super::{present, segment, Parts};

/// `PUT /{database}`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CreateDatabase {
    pub database: Option<String>,
}

impl CreateDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a database with the given name
    pub fn named(database: impl Into<String>) -> Self {
        Self::new().database(database)
    }

    pub fn database(mut self, database: impl Into<String>) -> Self {
        self.database = Some(database.into());
        self
    }

    pub(crate) fn parts(&self) -> Parts<'_> {
        Parts {
            required: vec![("database", present(&self.database))],
            segments: vec![segment(&self.database)],
            params: Vec::new(),
            payload: None,
        }
    }
}

/// `DELETE /{database}`
///
/// CouchDB answers 200, or 202 when the deletion was accepted but not yet
/// committed to a quorum.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeleteDatabase {
    pub database: Option<String>,
}

impl DeleteDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delete the database with the given name
    pub fn named(database: impl Into<String>) -> Self {
        Self::new().database(database)
    }

    pub fn database(mut self, database: impl Into<String>) -> Self {
        self.database = Some(database.into());
        self
    }

    pub(crate) fn parts(&self) -> Parts<'_> {
        Parts {
            required: vec![("database", present(&self.database))],
            segments: vec![segment(&self.database)],
            params: Vec::new(),
            payload: None,
        }
    }
}
