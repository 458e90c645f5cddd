// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Request/response interception
//!
//! Interceptors observe and rewrite every exchange made by an
//! [`InterceptableSession`](crate::http::InterceptableSession).

mod context;
mod interceptor_trait;
mod session_cookie;

pub use context::InterceptorContext;
pub use interceptor_trait::{HeaderInjector, HttpInterceptor, InterceptorChain, RequestLogger};
pub use session_cookie::{
    SessionCookieInterceptor, SessionState, DEFAULT_SESSION_TIMEOUT, SESSION_PATH,
};
