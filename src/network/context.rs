// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Interceptor context

use crate::http::{Request, Response};

/// State shared by the interceptors of a single exchange attempt
///
/// A fresh context is built for every attempt; nothing in it survives a
/// retry except what interceptors keep internally.
#[derive(Debug, Clone)]
pub struct InterceptorContext {
    /// The outgoing request
    pub request: Request,
    /// The response, absent until the exchange completed
    pub response: Option<Response>,
    /// Set by a response interceptor to replay the request
    pub should_retry: bool,
    /// Zero-based attempt number
    pub attempt: u32,
}

impl InterceptorContext {
    pub fn new(request: Request, attempt: u32) -> Self {
        Self {
            request,
            response: None,
            should_retry: false,
            attempt,
        }
    }

    /// Status of the response, if one exists
    pub fn status_code(&self) -> Option<u16> {
        self.response.as_ref().map(|r| r.status_code())
    }
}
