// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Interceptable HTTP session
//!
//! Every exchange runs through the interceptor chain: request interceptors
//! in order, the HTTP call, then response interceptors in the same order.
//! An interceptor can ask for the exchange to be replayed; the replay starts
//! again from the original request and is bounded by `max_retries`.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use reqwest::Client;

use super::request::Request;
use super::response::Response;
use crate::error::{Error, Result};
use crate::network::{InterceptorChain, InterceptorContext};

/// Default number of replays an interceptor may request per exchange
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// HTTP transport that applies an interceptor chain around each exchange
pub struct InterceptableSession {
    client: Client,
    chain: InterceptorChain,
    max_retries: u32,
    exchanges: AtomicU64,
    retries: AtomicU64,
}

impl InterceptableSession {
    /// Create a session over an existing reqwest client
    pub fn new(client: Client, chain: InterceptorChain) -> Self {
        Self {
            client,
            chain,
            max_retries: DEFAULT_MAX_RETRIES,
            exchanges: AtomicU64::new(0),
            retries: AtomicU64::new(0),
        }
    }

    /// Set the retry bound
    pub fn max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Get the interceptor chain
    pub fn chain(&self) -> &InterceptorChain {
        &self.chain
    }

    /// Get the underlying reqwest client
    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Number of HTTP exchanges sent, replays included
    pub fn exchange_count(&self) -> u64 {
        self.exchanges.load(Ordering::Relaxed)
    }

    /// Number of replays requested by interceptors
    pub fn retry_count(&self) -> u64 {
        self.retries.load(Ordering::Relaxed)
    }

    /// Execute a request through the interceptor chain
    pub async fn execute(&self, request: Request) -> Result<Response> {
        let mut attempt = 0;

        loop {
            let mut ctx = InterceptorContext::new(request.clone(), attempt);
            self.chain.process_request(&mut ctx).await;

            let response = match self.send(&ctx.request).await {
                Ok(response) => response,
                Err(e) => {
                    self.chain.notify_error(&ctx.request, &e).await;
                    return Err(e);
                }
            };

            ctx.response = Some(response);
            self.chain.process_response(&mut ctx).await;

            let response = ctx
                .response
                .take()
                .ok_or_else(|| Error::other("response dropped by interceptor"))?;

            if !ctx.should_retry {
                return Ok(response);
            }

            if attempt >= self.max_retries {
                tracing::warn!(
                    url = %request.url,
                    status = %response.status,
                    attempts = attempt + 1,
                    "Retry limit reached, returning last response"
                );
                return Ok(response);
            }

            attempt += 1;
            self.retries.fetch_add(1, Ordering::Relaxed);
            tracing::debug!(
                url = %request.url,
                status = %response.status,
                attempt,
                "Interceptor requested retry"
            );
        }
    }

    /// Send a single request without interception
    async fn send(&self, request: &Request) -> Result<Response> {
        let start = Instant::now();
        self.exchanges.fetch_add(1, Ordering::Relaxed);

        let mut builder = self
            .client
            .request(request.method.clone(), request.url.clone())
            .headers(request.headers.clone());

        if let Some(ref body) = request.body {
            builder = builder.body(body.clone());
        }

        if let Some(timeout) = request.timeout {
            builder = builder.timeout(timeout);
        }

        let response = builder.send().await?;
        let status = response.status();
        let headers = response.headers().clone();
        let url = response.url().clone();
        let body = response.bytes().await?;
        let response_time = start.elapsed().as_millis() as u64;

        Ok(Response::new(status, headers, body, url, response_time))
    }
}
