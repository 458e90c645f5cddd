// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Operation outcomes

use bytes::Bytes;
use reqwest::header::HeaderMap;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{OperationKind, ResponseFormat};
use crate::error::{Error, Result};
use crate::http::Response;

/// Successful result of an operation
#[derive(Debug, Clone)]
pub struct OperationResponse {
    /// Operation that produced this response
    pub kind: OperationKind,
    /// Response status code
    pub status: StatusCode,
    /// Response headers
    pub headers: HeaderMap,
    /// Raw response body
    pub body: Bytes,
    json: Option<Value>,
}

/// `{"ok": true, "id": ..., "rev": ...}` returned by document writes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentRevision {
    #[serde(default)]
    pub ok: bool,
    pub id: String,
    pub rev: String,
}

#[derive(Debug, Default, Deserialize)]
struct ServerError {
    error: Option<String>,
    reason: Option<String>,
}

impl OperationResponse {
    /// Get status code as u16
    pub fn status_code(&self) -> u16 {
        self.status.as_u16()
    }

    /// Parsed JSON body, for kinds that return JSON
    pub fn json(&self) -> Option<&Value> {
        self.json.as_ref()
    }

    /// Deserialize the body into `T`
    pub fn deserialize<T: DeserializeOwned>(&self) -> Result<T> {
        match self.json {
            Some(ref value) => T::deserialize(value).map_err(Error::from),
            None => serde_json::from_slice(&self.body).map_err(Error::from),
        }
    }

    /// Document id and revision from a write response
    pub fn revision(&self) -> Result<DocumentRevision> {
        self.deserialize()
    }

    /// `id` member of the JSON body
    pub fn id(&self) -> Option<&str> {
        self.json.as_ref()?.get("id")?.as_str()
    }

    /// `rev` (or `_rev` for fetched documents) member of the JSON body
    pub fn rev(&self) -> Option<&str> {
        let json = self.json.as_ref()?;
        json.get("rev")
            .or_else(|| json.get("_rev"))
            .and_then(Value::as_str)
    }

    /// Raw body bytes
    pub fn data(&self) -> &Bytes {
        &self.body
    }

    /// Content type of the body
    pub fn content_type(&self) -> Option<&str> {
        self.headers
            .get(crate::http::headers::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
    }
}

/// Map a raw response to the outcome of an operation of `kind`
pub(crate) fn interpret(kind: OperationKind, response: Response) -> Result<OperationResponse> {
    let route = kind.route();
    let status = response.status_code();

    if !route.success.contains(&status) {
        let server = serde_json::from_slice::<ServerError>(&response.body).unwrap_or_default();
        return Err(Error::operation(kind, status).with_reason(server.error, server.reason));
    }

    let json = match route.format {
        ResponseFormat::Json => Some(serde_json::from_slice(&response.body)?),
        ResponseFormat::Raw => None,
    };

    Ok(OperationResponse {
        kind,
        status: response.status,
        headers: response.headers,
        body: response.body,
        json,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use url::Url;

    fn response(status: u16, body: &'static str) -> Response {
        Response::new(
            StatusCode::from_u16(status).unwrap(),
            HeaderMap::new(),
            Bytes::from(body),
            Url::parse("http://localhost:5984/db").unwrap(),
            1,
        )
    }

    #[test]
    fn test_delete_database_statuses() {
        for status in [200, 202] {
            let outcome = interpret(OperationKind::DeleteDatabase, response(status, r#"{"ok":true}"#));
            assert_eq!(outcome.unwrap().status_code(), status);
        }

        for status in [201, 400, 401, 404, 412, 500] {
            let err = interpret(OperationKind::DeleteDatabase, response(status, "")).unwrap_err();
            assert_eq!(err.status_code(), Some(status));
            assert_eq!(err.operation_kind(), Some(OperationKind::DeleteDatabase));
        }
    }

    #[test]
    fn test_failure_carries_server_reason() {
        let err = interpret(
            OperationKind::GetDocument,
            response(404, r#"{"error":"not_found","reason":"missing"}"#),
        )
        .unwrap_err();

        match err {
            Error::Operation {
                status,
                error,
                reason,
                ..
            } => {
                assert_eq!(status, 404);
                assert_eq!(error.as_deref(), Some("not_found"));
                assert_eq!(reason.as_deref(), Some("missing"));
            }
            other => panic!("expected operation error, got {:?}", other),
        }
    }

    #[test]
    fn test_write_revision() {
        let outcome = interpret(
            OperationKind::PutDocument,
            response(201, r#"{"ok":true,"id":"doc","rev":"1-abc"}"#),
        )
        .unwrap();

        assert_eq!(outcome.id(), Some("doc"));
        assert_eq!(outcome.rev(), Some("1-abc"));
        assert_eq!(
            outcome.revision().unwrap(),
            DocumentRevision {
                ok: true,
                id: "doc".into(),
                rev: "1-abc".into()
            }
        );
    }

    #[test]
    fn test_invalid_json_on_success() {
        let err = interpret(OperationKind::CreateDatabase, response(201, "<html>")).unwrap_err();
        assert!(matches!(err, Error::Serialization(_)));
    }

    #[test]
    fn test_raw_body_kept() {
        let outcome = interpret(OperationKind::ReadAttachment, response(200, "hello")).unwrap();
        assert!(outcome.json().is_none());
        assert_eq!(outcome.data().as_ref(), b"hello");
    }
}
