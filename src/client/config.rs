// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Client configuration

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use url::Url;

use crate::error::{Error, Result};
use crate::http::{DEFAULT_MAX_RETRIES, DEFAULT_USER_AGENT};
use crate::network::DEFAULT_SESSION_TIMEOUT;

/// Default server URL
pub const DEFAULT_URL: &str = "http://localhost:5984";

/// Environment variables read by [`ClientConfig::from_env`]
pub mod env {
    pub const URL: &str = "CUSHION_URL";
    pub const USERNAME: &str = "CUSHION_USERNAME";
    pub const PASSWORD: &str = "CUSHION_PASSWORD";
    pub const MAX_CONCURRENT: &str = "CUSHION_MAX_CONCURRENT";
    pub const TIMEOUT_SECS: &str = "CUSHION_TIMEOUT_SECS";
}

/// Client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Server base URL
    pub url: String,
    /// Username for session cookie authentication
    pub username: Option<String>,
    /// Password for session cookie authentication
    pub password: Option<String>,
    /// User agent string
    pub user_agent: String,
    /// Default timeout for requests
    pub timeout: Duration,
    /// How long a request may wait for session creation
    pub session_timeout: Duration,
    /// Replays an interceptor may request per exchange
    pub max_retries: u32,
    /// Operations executed at the same time by the queue
    pub max_concurrent_operations: usize,
    /// Accept invalid TLS certificates
    pub accept_invalid_certs: bool,
    /// Proxy URL
    pub proxy: Option<String>,
    /// Default headers
    pub default_headers: Vec<(String, String)>,
    /// Log every exchange at debug level
    pub log_requests: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_URL.to_string(),
            username: None,
            password: None,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: Duration::from_secs(30),
            session_timeout: DEFAULT_SESSION_TIMEOUT,
            max_retries: DEFAULT_MAX_RETRIES,
            max_concurrent_operations: 4,
            accept_invalid_certs: false,
            proxy: None,
            default_headers: vec![],
            log_requests: true,
        }
    }
}

impl ClientConfig {
    /// Create a config for the server at `url`
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    /// Load configuration from `CUSHION_*` environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::new(lookup(env::URL).unwrap_or_else(|| DEFAULT_URL.to_string()));

        if let (Some(username), Some(password)) = (lookup(env::USERNAME), lookup(env::PASSWORD)) {
            config = config.credentials(username, password);
        }

        if let Some(value) = lookup(env::MAX_CONCURRENT) {
            let max = value.parse::<usize>().map_err(|e| {
                Error::Config(format!("{} must be a positive integer: {}", env::MAX_CONCURRENT, e))
            })?;
            config = config.max_concurrent_operations(max);
        }

        if let Some(value) = lookup(env::TIMEOUT_SECS) {
            let secs = value.parse::<u64>().map_err(|e| {
                Error::Config(format!("{} must be a number of seconds: {}", env::TIMEOUT_SECS, e))
            })?;
            config = config.timeout(Duration::from_secs(secs));
        }

        config.validate()?;
        Ok(config)
    }

    /// Set credentials, enabling session cookie authentication
    pub fn credentials(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }

    /// Set user agent
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set session creation timeout
    pub fn session_timeout(mut self, timeout: Duration) -> Self {
        self.session_timeout = timeout;
        self
    }

    /// Set retry bound
    pub fn max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Set queue concurrency; 1 runs operations serially
    pub fn max_concurrent_operations(mut self, max: usize) -> Self {
        self.max_concurrent_operations = max;
        self
    }

    /// Accept invalid TLS certificates
    pub fn accept_invalid_certs(mut self, accept: bool) -> Self {
        self.accept_invalid_certs = accept;
        self
    }

    /// Set proxy
    pub fn proxy(mut self, proxy: impl Into<String>) -> Self {
        self.proxy = Some(proxy.into());
        self
    }

    /// Add default header
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.default_headers.push((name.into(), value.into()));
        self
    }

    /// Enable/disable exchange logging
    pub fn log_requests(mut self, enabled: bool) -> Self {
        self.log_requests = enabled;
        self
    }

    /// Whether session cookie authentication is configured
    pub fn has_credentials(&self) -> bool {
        self.username.is_some() && self.password.is_some()
    }

    /// Check the configuration for values the client cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.max_concurrent_operations == 0 {
            return Err(Error::Config(
                "max_concurrent_operations must be at least 1".to_string(),
            ));
        }
        self.base_url()?;
        Ok(())
    }

    /// Parsed base URL
    pub fn base_url(&self) -> Result<Url> {
        let url = Url::parse(&self.url)?;
        if url.cannot_be_a_base() {
            return Err(Error::Config(format!("URL cannot be used as a base: {}", self.url)));
        }
        match url.scheme() {
            "http" | "https" => Ok(url),
            scheme => Err(Error::Config(format!("Unsupported URL scheme: {}", scheme))),
        }
    }

    /// Build the reqwest client used for all exchanges
    pub fn build_http_client(&self) -> Result<reqwest::Client> {
        let mut default_headers = HeaderMap::new();
        for (name, value) in &self.default_headers {
            let header_name = HeaderName::try_from(name.as_str()).map_err(|e| Error::InvalidHeader {
                name: name.clone(),
                reason: e.to_string(),
            })?;
            let header_value = HeaderValue::try_from(value.as_str()).map_err(|e| Error::InvalidHeader {
                name: name.clone(),
                reason: e.to_string(),
            })?;
            default_headers.insert(header_name, header_value);
        }

        let mut builder = reqwest::Client::builder()
            .user_agent(&self.user_agent)
            .timeout(self.timeout)
            .danger_accept_invalid_certs(self.accept_invalid_certs)
            .default_headers(default_headers);

        if let Some(ref proxy_url) = self.proxy {
            builder = builder.proxy(
                reqwest::Proxy::all(proxy_url)
                    .map_err(|e| Error::Config(format!("Invalid proxy URL: {}", e)))?,
            );
        }

        Ok(builder.build()?)
    }
}
