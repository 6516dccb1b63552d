// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! HTTP layer for kurly
//!
//! Request construction, cookie handling and a thin transport context over
//! reqwest. Nothing here speaks the wire protocol directly.

mod body;
mod client;
mod cookie;
mod directives;
mod jar;
mod redirect;
mod request;
mod response;
mod trace;

pub use body::{Body, ProgressFn, ProgressReader};
pub use client::{HttpClient, HttpClientConfig};
pub use cookie::{Cookie, CookieMatcher};
pub use directives::{apply_directive, apply_directives};
pub use jar::{merge_cookies, parse_jar, persist_cookies, read_jar, write_jar};
pub use redirect::{RedirectAction, RedirectPolicy};
pub use request::{parse_target, Request, RequestBuilder};
pub use response::Response;
pub use trace::{TraceObserver, VerboseTracer};

/// Default user agent string
pub const DEFAULT_USER_AGENT: &str = concat!("Kurly/", env!("CARGO_PKG_VERSION"));

/// Common HTTP headers
pub mod headers {
    pub const ACCEPT: &str = "accept";
    pub const AUTHORIZATION: &str = "authorization";
    pub const CONTENT_LENGTH: &str = "content-length";
    pub const CONTENT_TYPE: &str = "content-type";
    pub const COOKIE: &str = "cookie";
    pub const EXPECT: &str = "expect";
    pub const HOST: &str = "host";
    pub const LAST_MODIFIED: &str = "last-modified";
    pub const LOCATION: &str = "location";
    pub const RANGE: &str = "range";
    pub const SET_COOKIE: &str = "set-cookie";
    pub const USER_AGENT: &str = "user-agent";
}
