// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Session cookie authentication
//!
//! Exchanges credentials for a session cookie at `POST {base}/_session` and replays
//! the cookie on every request. A 401/403 from any request drops the cookie
//! and asks the session to retry, which triggers a fresh `_session` exchange.
//!
//! State per interceptor instance:
//!
//! ```text
//!  NoCookie --(_session 2xx + ok:true + Set-Cookie)--> HasCookie
//!  HasCookie --(401/403 on any response)-------------> NoCookie
//!  any -------(_session 401 or other non-2xx/non-5xx)-> AuthDisabled (terminal)
//! ```
//!
//! Transport failures, timeouts and 5xx responses on `_session` leave the
//! state unchanged so the next request tries again.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use parking_lot::Mutex;
use reqwest::{Client, StatusCode};
use url::Url;

use super::context::InterceptorContext;
use super::interceptor_trait::HttpInterceptor;
use crate::http::{content_types, form_credentials, headers, session_cookie_value};

/// How long a request waits for the `_session` exchange
pub const DEFAULT_SESSION_TIMEOUT: Duration = Duration::from_secs(600);

/// Authentication endpoint segment, appended to the server base URL
pub const SESSION_PATH: &str = "_session";

/// Observable state of a [`SessionCookieInterceptor`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No cookie cached; the next request creates a session
    NoCookie,
    /// A cookie is cached and attached to requests
    HasCookie,
    /// Credentials were rejected; requests pass through untouched
    AuthDisabled,
}

#[derive(Debug, Default)]
struct CookieState {
    cookie: Option<String>,
    disabled: bool,
}

/// Result of one `_session` exchange
#[derive(Debug, PartialEq, Eq)]
enum SessionOutcome {
    Established(String),
    Transient,
    Rejected,
}

/// Interceptor performing CouchDB session cookie authentication
pub struct SessionCookieInterceptor {
    session_body: Bytes,
    timeout: Duration,
    endpoint: Option<Url>,
    client: Client,
    state: Mutex<CookieState>,
    session_requests: AtomicU64,
}

impl SessionCookieInterceptor {
    /// Create an interceptor with its own HTTP client
    pub fn new(username: &str, password: &str) -> Self {
        Self::with_client(username, password, Client::new())
    }

    /// Create an interceptor that issues `_session` requests through `client`
    ///
    /// The client must not carry this interceptor itself.
    pub fn with_client(username: &str, password: &str, client: Client) -> Self {
        Self {
            session_body: Bytes::from(form_credentials(username, password)),
            timeout: DEFAULT_SESSION_TIMEOUT,
            endpoint: None,
            client,
            state: Mutex::new(CookieState::default()),
            session_requests: AtomicU64::new(0),
        }
    }

    /// Set how long a request may block on session creation
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Send `_session` requests under `base` instead of the request's server root
    pub fn endpoint(mut self, base: &Url) -> Self {
        self.endpoint = Some(session_url(base));
        self
    }

    /// Current state
    pub fn state(&self) -> SessionState {
        let state = self.state.lock();
        if state.disabled {
            SessionState::AuthDisabled
        } else if state.cookie.is_some() {
            SessionState::HasCookie
        } else {
            SessionState::NoCookie
        }
    }

    /// Cached cookie (`name=value`)
    pub fn cookie(&self) -> Option<String> {
        self.state.lock().cookie.clone()
    }

    /// Whether authentication is still attempted
    pub fn is_enabled(&self) -> bool {
        !self.state.lock().disabled
    }

    /// Number of `_session` exchanges started
    pub fn session_requests(&self) -> u64 {
        self.session_requests.load(Ordering::Relaxed)
    }

    /// Configured session creation timeout
    pub fn session_timeout(&self) -> Duration {
        self.timeout
    }

    /// Run a `_session` exchange for a request to `url`
    async fn start_new_session(&self, url: &Url) -> Option<String> {
        let session_url = match &self.endpoint {
            Some(endpoint) => endpoint.clone(),
            None => {
                let mut root = url.clone();
                root.set_path("/");
                session_url(&root)
            }
        };

        self.session_requests.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(url = %session_url, "Requesting session cookie");

        let exchange = async {
            let response = self
                .client
                .post(session_url.clone())
                .timeout(self.timeout)
                .header(headers::CONTENT_TYPE, content_types::FORM)
                .body(self.session_body.clone())
                .send()
                .await?;
            let status = response.status();
            let set_cookie = response
                .headers()
                .get(headers::SET_COOKIE)
                .and_then(|v| v.to_str().ok())
                .map(String::from);
            let body = response.bytes().await?;
            Ok::<_, reqwest::Error>((status, set_cookie, body))
        };

        let outcome = match tokio::time::timeout(self.timeout, exchange).await {
            Err(_) => {
                tracing::warn!(
                    url = %session_url,
                    timeout_secs = self.timeout.as_secs(),
                    "Timed out waiting for session cookie"
                );
                SessionOutcome::Transient
            }
            Ok(Err(e)) => {
                tracing::warn!(url = %session_url, error = %e, "Session request failed");
                SessionOutcome::Transient
            }
            Ok(Ok((status, set_cookie, body))) => {
                classify_session_response(status, set_cookie.as_deref(), &body)
            }
        };

        match outcome {
            SessionOutcome::Established(cookie) => Some(cookie),
            SessionOutcome::Transient => None,
            SessionOutcome::Rejected => {
                self.state.lock().disabled = true;
                None
            }
        }
    }
}

/// `_session` endpoint under `base`, keeping any path prefix
fn session_url(base: &Url) -> Url {
    let mut url = base.clone();
    url.set_query(None);
    url.set_fragment(None);
    if let Ok(mut segments) = url.path_segments_mut() {
        segments.pop_if_empty().push(SESSION_PATH);
    }
    url
}

/// Decide what a `_session` response means for the interceptor
fn classify_session_response(
    status: StatusCode,
    set_cookie: Option<&str>,
    body: &[u8],
) -> SessionOutcome {
    if status.is_success() {
        let ok = serde_json::from_slice::<serde_json::Value>(body)
            .map(|json| json.get("ok").and_then(|v| v.as_bool()) == Some(true));

        match ok {
            Ok(true) => {}
            Ok(false) => {
                tracing::warn!("Session response did not contain ok:true");
                return SessionOutcome::Transient;
            }
            Err(e) => {
                tracing::warn!(error = %e, "Session response was not valid JSON");
                return SessionOutcome::Transient;
            }
        }

        match set_cookie.and_then(session_cookie_value) {
            Some(cookie) => SessionOutcome::Established(cookie),
            None => {
                tracing::warn!("Session response had no usable Set-Cookie header");
                SessionOutcome::Transient
            }
        }
    } else if status == StatusCode::UNAUTHORIZED {
        tracing::error!(
            "Credentials are incorrect, cookie authentication will not be attempted again by this interceptor"
        );
        SessionOutcome::Rejected
    } else if status.is_server_error() {
        tracing::warn!(status = status.as_u16(), "Failed to get session cookie from the server");
        SessionOutcome::Transient
    } else {
        tracing::error!(
            status = status.as_u16(),
            "Failed to get session cookie, cookie authentication will not be attempted again by this interceptor"
        );
        SessionOutcome::Rejected
    }
}

#[async_trait]
impl HttpInterceptor for SessionCookieInterceptor {
    async fn intercept_request(&self, ctx: &mut InterceptorContext) {
        let cached = {
            let state = self.state.lock();
            if state.disabled {
                return;
            }
            state.cookie.clone()
        };

        let cookie = match cached {
            Some(cookie) => cookie,
            None => match self.start_new_session(&ctx.request.url).await {
                Some(cookie) => {
                    let mut state = self.state.lock();
                    if !state.disabled {
                        state.cookie = Some(cookie.clone());
                    }
                    cookie
                }
                None => return,
            },
        };

        if let Err(e) = ctx.request.set_header(headers::COOKIE, &cookie) {
            tracing::warn!(error = %e, "Session cookie could not be attached");
        }
    }

    async fn intercept_response(&self, ctx: &mut InterceptorContext) {
        let Some(response) = ctx.response.as_ref() else {
            return;
        };

        let mut state = self.state.lock();
        if state.disabled {
            return;
        }

        if response.is_auth_failure() {
            tracing::debug!(status = %response.status, "Session cookie rejected, retrying");
            state.cookie = None;
            ctx.should_retry = true;
        } else if let Some(cookie) = response.set_cookie().and_then(session_cookie_value) {
            state.cookie = Some(cookie);
        }
    }

    fn name(&self) -> &'static str {
        "session-cookie"
    }
}
