// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! # Kurly - curl-style HTTP transfers
//!
//! Builds requests the way curl's command line does and hands them to reqwest
//! for the wire work.
//!
//! ## Features
//!
//! - Header directives: `Name: value`, `Name;` for an empty value, `Name:` to remove
//! - Cookies from inline strings or Netscape jar files, written back after the transfer
//! - Multipart forms with file parts and per-field content types
//! - Form-encoded data from the `-d` option family
//! - Streaming uploads with an explicit Content-Length
//! - Resumed downloads via `Range`
//! - Redirect following with a hop limit
//!
//! ## Example
//!
//! ```rust,no_run
//! use kurly::{fetch, Options};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let options = Options::new()
//!         .output("index.html")
//!         .cookie_jar("cookies.txt")
//!         .follow_redirects(5);
//!
//!     let summary = fetch("https://example.com", &options).await?;
//!     println!("status {}", summary.status);
//!
//!     Ok(())
//! }
//! ```

pub mod data;
pub mod deadline;
pub mod error;
pub mod form;
pub mod http;
pub mod options;
pub mod output;
pub mod transfer;

// Re-exports for convenience

// Errors
pub use error::{Error, ErrorContext, Result};

// Options
pub use options::{Options, ResumeOffset};

// Transfer
pub use deadline::{spawn_deadline, TIMEOUT_EXIT_CODE};
pub use output::Output;
pub use transfer::{fetch, Prepared, Transfer, TransferSummary};

// HTTP
pub use http::{
    persist_cookies, read_jar, Body, Cookie, CookieMatcher, HttpClient, ProgressFn, Request,
    RequestBuilder, Response, TraceObserver, VerboseTracer,
};

// Forms
pub use form::{build_multipart, parse_form, FieldDescriptor, FormData, MultipartWriter};

/// Kurly version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
