// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! HTTP layer for cushion
//!
//! Owned request/response values, cookie helpers and the interceptable
//! session that runs every exchange through the interceptor chain.

mod cookie;
mod request;
mod response;
mod session;

pub use cookie::{form_credentials, session_cookie_value};
pub use request::Request;
pub use response::Response;
pub use session::{InterceptableSession, DEFAULT_MAX_RETRIES};

/// Default user agent string
pub const DEFAULT_USER_AGENT: &str = concat!("cushion/", env!("CARGO_PKG_VERSION"));

/// Common HTTP headers
pub mod headers {
    pub const ACCEPT: &str = "accept";
    pub const CONTENT_TYPE: &str = "content-type";
    pub const COOKIE: &str = "cookie";
    pub const SET_COOKIE: &str = "set-cookie";
    pub const USER_AGENT: &str = "user-agent";
    pub const AUTHORIZATION: &str = "authorization";
}

/// Content types used by the CouchDB API
pub mod content_types {
    pub const JSON: &str = "application/json";
    pub const FORM: &str = "application/x-www-form-urlencoded";
}
