// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! HTTP interceptor trait and chain
//!
//! An interceptor is a pair of hooks invoked around every exchange.

use std::sync::Arc;

use async_trait::async_trait;

use super::context::InterceptorContext;
use crate::error::Error;
use crate::http::{headers, Request};

/// HTTP interceptor trait
///
/// `intercept_request` may rewrite the outgoing request and must give the
/// same result when called again with an unchanged context.
/// `intercept_response` may set [`InterceptorContext::should_retry`] to have
/// the session replay the request through the whole chain.
///
/// # Example
///
/// ```rust,no_run
/// use async_trait::async_trait;
/// use cushion::network::{HttpInterceptor, InterceptorContext};
///
/// struct RequestId;
///
/// #[async_trait]
/// impl HttpInterceptor for RequestId {
///     async fn intercept_request(&self, ctx: &mut InterceptorContext) {
///         let _ = ctx.request.set_header("x-request-id", "42");
///     }
/// }
/// ```
#[async_trait]
pub trait HttpInterceptor: Send + Sync {
    /// Called before a request is sent
    async fn intercept_request(&self, _ctx: &mut InterceptorContext) {}

    /// Called after a response is received
    async fn intercept_response(&self, _ctx: &mut InterceptorContext) {}

    /// Called when the exchange failed before any response arrived
    async fn on_error(&self, _request: &Request, _error: &Error) {}

    /// Name used in log output
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

/// Interceptor chain - runs interceptors in insertion order
///
/// The response phase uses the same order as the request phase.
#[derive(Clone, Default)]
pub struct InterceptorChain {
    interceptors: Vec<Arc<dyn HttpInterceptor>>,
}

impl InterceptorChain {
    /// Create a new empty chain
    pub fn new() -> Self {
        Self {
            interceptors: Vec::new(),
        }
    }

    /// Add an interceptor
    pub fn add<I: HttpInterceptor + 'static>(&mut self, interceptor: I) {
        self.interceptors.push(Arc::new(interceptor));
    }

    /// Add an interceptor the caller keeps a handle to
    pub fn add_shared(&mut self, interceptor: Arc<dyn HttpInterceptor>) {
        self.interceptors.push(interceptor);
    }

    /// Builder-style [`add`](Self::add)
    pub fn with<I: HttpInterceptor + 'static>(mut self, interceptor: I) -> Self {
        self.add(interceptor);
        self
    }

    /// Append every interceptor of `other`, keeping its order
    pub fn extend(&mut self, other: InterceptorChain) {
        self.interceptors.extend(other.interceptors);
    }

    /// Number of interceptors
    pub fn len(&self) -> usize {
        self.interceptors.len()
    }

    /// Check if the chain is empty
    pub fn is_empty(&self) -> bool {
        self.interceptors.is_empty()
    }

    /// Interceptor names in execution order
    pub fn names(&self) -> Vec<&'static str> {
        self.interceptors.iter().map(|i| i.name()).collect()
    }

    /// Process request through all interceptors
    pub async fn process_request(&self, ctx: &mut InterceptorContext) {
        for interceptor in &self.interceptors {
            interceptor.intercept_request(ctx).await;
        }
    }

    /// Process response through all interceptors
    pub async fn process_response(&self, ctx: &mut InterceptorContext) {
        for interceptor in &self.interceptors {
            interceptor.intercept_response(ctx).await;
        }
    }

    /// Notify interceptors of an error
    pub async fn notify_error(&self, request: &Request, error: &Error) {
        for interceptor in &self.interceptors {
            interceptor.on_error(request, error).await;
        }
    }
}

/// Header injector - sets fixed headers on every request
///
/// Useful for basic authentication or proxy headers.
#[derive(Debug, Clone, Default)]
pub struct HeaderInjector {
    headers: Vec<(String, String)>,
}

impl HeaderInjector {
    /// Create a new header injector
    pub fn new() -> Self {
        Self::default()
    }

    /// Add basic auth
    pub fn basic_auth(mut self, username: &str, password: &str) -> Self {
        let encoded = base64::Engine::encode(
            &base64::engine::general_purpose::STANDARD,
            format!("{}:{}", username, password),
        );
        self.headers
            .push((headers::AUTHORIZATION.to_string(), format!("Basic {}", encoded)));
        self
    }

    /// Add custom header
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }
}

#[async_trait]
impl HttpInterceptor for HeaderInjector {
    async fn intercept_request(&self, ctx: &mut InterceptorContext) {
        for (name, value) in &self.headers {
            if let Err(e) = ctx.request.set_header(name, value) {
                tracing::warn!(error = %e, "Header injection skipped");
            }
        }
    }

    fn name(&self) -> &'static str {
        "header-injector"
    }
}

/// Request logger interceptor
#[derive(Debug, Clone, Default)]
pub struct RequestLogger {
    /// Log response bodies
    pub log_responses: bool,
}

#[async_trait]
impl HttpInterceptor for RequestLogger {
    async fn intercept_request(&self, ctx: &mut InterceptorContext) {
        tracing::debug!(
            method = %ctx.request.method,
            url = %ctx.request.url,
            attempt = ctx.attempt,
            "Request"
        );
    }

    async fn intercept_response(&self, ctx: &mut InterceptorContext) {
        if let Some(ref response) = ctx.response {
            tracing::debug!(
                url = %ctx.request.url,
                status = %response.status,
                time_ms = response.response_time_ms,
                "Response"
            );

            if self.log_responses {
                tracing::trace!(body = %response.text_lossy(), "Response body");
            }
        }
    }

    async fn on_error(&self, request: &Request, error: &Error) {
        tracing::warn!(method = %request.method, url = %request.url, error = %error, "Request failed");
    }

    fn name(&self) -> &'static str {
        "request-logger"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    struct Recorder {
        tag: &'static str,
        log: Arc<Mutex<Vec<String>>>,
    }

    #[async_trait]
    impl HttpInterceptor for Recorder {
        async fn intercept_request(&self, _ctx: &mut InterceptorContext) {
            self.log.lock().push(format!("req:{}", self.tag));
        }

        async fn intercept_response(&self, _ctx: &mut InterceptorContext) {
            self.log.lock().push(format!("resp:{}", self.tag));
        }
    }

    fn context() -> InterceptorContext {
        InterceptorContext::new(Request::get("http://localhost:5984/db").unwrap(), 0)
    }

    #[test]
    fn test_header_injector() {
        let injector = HeaderInjector::new()
            .basic_auth("admin", "secret")
            .header("x-custom", "value");

        assert_eq!(injector.headers.len(), 2);
        assert_eq!(injector.headers[0].1, "Basic YWRtaW46c2VjcmV0");
    }

    #[tokio::test]
    async fn test_header_injector_is_idempotent() {
        let injector = HeaderInjector::new().header("x-custom", "value");
        let mut ctx = context();

        injector.intercept_request(&mut ctx).await;
        injector.intercept_request(&mut ctx).await;

        assert_eq!(ctx.request.headers.get_all("x-custom").iter().count(), 1);
    }

    #[tokio::test]
    async fn test_chain_runs_in_insertion_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let chain = InterceptorChain::new()
            .with(Recorder {
                tag: "a",
                log: log.clone(),
            })
            .with(Recorder {
                tag: "b",
                log: log.clone(),
            });

        let mut ctx = context();
        chain.process_request(&mut ctx).await;
        chain.process_response(&mut ctx).await;

        assert_eq!(chain.len(), 2);
        assert_eq!(*log.lock(), vec!["req:a", "req:b", "resp:a", "resp:b"]);
    }
}
