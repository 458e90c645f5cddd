// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! HTTP request types

use std::time::Duration;

use bytes::Bytes;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Method;
use serde::Serialize;
use url::Url;

use super::{content_types, headers};
use crate::error::{Error, Result};

/// HTTP request representation
///
/// Interceptors receive a mutable reference to this value before it is
/// handed to the transport, so everything that ends up on the wire lives here.
#[derive(Debug, Clone)]
pub struct Request {
    /// Request method
    pub method: Method,
    /// Request URL
    pub url: Url,
    /// Request headers
    pub headers: HeaderMap,
    /// Request body
    pub body: Option<Bytes>,
    /// Per-request timeout, overriding the transport default
    pub timeout: Option<Duration>,
}

impl Request {
    /// Create a new request with arbitrary method
    pub fn new(method: Method, url: Url) -> Self {
        Self {
            method,
            url,
            headers: HeaderMap::new(),
            body: None,
            timeout: None,
        }
    }

    /// Create a new GET request
    pub fn get(url: impl AsRef<str>) -> Result<Self> {
        Ok(Self::new(Method::GET, Url::parse(url.as_ref())?))
    }

    /// Create a new POST request
    pub fn post(url: impl AsRef<str>) -> Result<Self> {
        Ok(Self::new(Method::POST, Url::parse(url.as_ref())?))
    }

    /// Set a header, silently skipping names or values that are not valid
    pub fn header(mut self, name: impl AsRef<str>, value: impl AsRef<str>) -> Self {
        if let Err(e) = self.set_header(name, value) {
            tracing::debug!(error = %e, "Skipping invalid header");
        }
        self
    }

    /// Set a header in place, replacing any previous value
    pub fn set_header(&mut self, name: impl AsRef<str>, value: impl AsRef<str>) -> Result<()> {
        let header_name = HeaderName::try_from(name.as_ref()).map_err(|e| Error::InvalidHeader {
            name: name.as_ref().to_string(),
            reason: e.to_string(),
        })?;
        let header_value =
            HeaderValue::try_from(value.as_ref()).map_err(|e| Error::InvalidHeader {
                name: name.as_ref().to_string(),
                reason: e.to_string(),
            })?;
        self.headers.insert(header_name, header_value);
        Ok(())
    }

    /// Get a header value
    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Set the request body
    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Set JSON body
    pub fn json<T: Serialize + ?Sized>(self, data: &T) -> Result<Self> {
        let json = serde_json::to_vec(data)?;
        Ok(self
            .body(json)
            .header(headers::CONTENT_TYPE, content_types::JSON))
    }

    /// Set timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_creation() {
        let req = Request::get("http://localhost:5984/db").unwrap();
        assert_eq!(req.method, Method::GET);
        assert_eq!(req.url.host_str(), Some("localhost"));
        assert!(req.body.is_none());
    }

    #[test]
    fn test_set_header_replaces_value() {
        let mut req = Request::get("http://localhost:5984").unwrap();
        req.set_header("cookie", "AuthSession=a").unwrap();
        req.set_header("cookie", "AuthSession=b").unwrap();

        assert_eq!(req.headers.get_all("cookie").iter().count(), 1);
        assert_eq!(req.header_value("cookie"), Some("AuthSession=b"));
    }

    #[test]
    fn test_invalid_header_value() {
        let mut req = Request::get("http://localhost:5984").unwrap();
        let err = req.set_header("cookie", "bad\nvalue").unwrap_err();
        assert!(matches!(err, Error::InvalidHeader { .. }));
    }

    #[test]
    fn test_json_body() {
        let req = Request::post("http://localhost:5984/db")
            .unwrap()
            .json(&serde_json::json!({"a": 1}))
            .unwrap();

        assert_eq!(req.header_value("content-type"), Some("application/json"));
        assert_eq!(req.body.as_deref(), Some(&b"{\"a\":1}"[..]));
    }
}
