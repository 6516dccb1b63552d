// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Transfer options
//!
//! `Options` is populated once by the command line front end and is read-only
//! afterwards. Builder setters exist so library users and tests can assemble one
//! without going through argument parsing.

use std::path::PathBuf;
use std::time::Duration;

use crate::error::{Error, Result};
use crate::http::DEFAULT_USER_AGENT;

/// Every setting recognised by a transfer
#[derive(Debug, Clone)]
pub struct Options {
    /// Write the body to this file instead of stdout
    pub output: Option<PathBuf>,
    /// Name the output file after the last URL path segment
    pub remote_name: bool,
    /// Upload this file with PUT
    pub upload_file: Option<PathBuf>,
    /// Resume token: `-` or a byte offset
    pub continue_at: Option<String>,
    /// Verbose output
    pub verbose: bool,
    /// Hard wall-clock budget for the whole run
    pub max_time: Option<Duration>,
    /// Stamp the output file with the remote Last-Modified time
    pub remote_time: bool,
    /// Inline `name=value` cookie string, or a jar file to read
    pub cookie: Option<String>,
    /// Jar file to write received cookies to
    pub cookie_jar: Option<PathBuf>,
    /// Follow 3xx redirects
    pub follow_redirects: bool,
    /// Redirect hop ceiling
    pub max_redirects: usize,
    /// Mute all output except errors
    pub silent: bool,
    /// Explicit method; `None` lets the body source decide
    pub method: Option<String>,
    /// Raw header directives
    pub headers: Vec<String>,
    /// User agent string
    pub user_agent: String,
    /// `user:password` for Basic auth
    pub user: Option<String>,
    /// `-d` values, sent verbatim
    pub data: Vec<String>,
    /// `--data-ascii` values
    pub data_ascii: Vec<String>,
    /// `--data-raw` values
    pub data_raw: Vec<String>,
    /// `--data-binary` values
    pub data_binary: Vec<String>,
    /// `--data-urlencode` values
    pub data_urlencode: Vec<String>,
    /// `-F` multipart field specs
    pub form: Vec<String>,
    /// Fetch headers only
    pub head: bool,
    /// Accept invalid TLS certificates
    pub insecure: bool,
    /// Per-request transport timeout
    pub timeout: Option<Duration>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            output: None,
            remote_name: false,
            upload_file: None,
            continue_at: None,
            verbose: false,
            max_time: None,
            remote_time: false,
            cookie: None,
            cookie_jar: None,
            follow_redirects: false,
            max_redirects: 10,
            silent: false,
            method: None,
            headers: vec![],
            user_agent: DEFAULT_USER_AGENT.to_string(),
            user: None,
            data: vec![],
            data_ascii: vec![],
            data_raw: vec![],
            data_binary: vec![],
            data_urlencode: vec![],
            form: vec![],
            head: false,
            insecure: false,
            timeout: None,
        }
    }
}

impl Options {
    /// Create options with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Set output file
    pub fn output(mut self, path: impl Into<PathBuf>) -> Self {
        self.output = Some(path.into());
        self
    }

    /// Set upload file
    pub fn upload_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.upload_file = Some(path.into());
        self
    }

    /// Set resume token
    pub fn continue_at(mut self, token: impl Into<String>) -> Self {
        self.continue_at = Some(token.into());
        self
    }

    /// Set cookie argument
    pub fn cookie(mut self, cookie: impl Into<String>) -> Self {
        self.cookie = Some(cookie.into());
        self
    }

    /// Set cookie jar output path
    pub fn cookie_jar(mut self, path: impl Into<PathBuf>) -> Self {
        self.cookie_jar = Some(path.into());
        self
    }

    /// Enable redirect following with a hop ceiling
    pub fn follow_redirects(mut self, max: usize) -> Self {
        self.follow_redirects = true;
        self.max_redirects = max;
        self
    }

    /// Set explicit method
    pub fn method(mut self, method: impl Into<String>) -> Self {
        self.method = Some(method.into());
        self
    }

    /// Add header directive
    pub fn header(mut self, directive: impl Into<String>) -> Self {
        self.headers.push(directive.into());
        self
    }

    /// Set user agent
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set Basic auth credential
    pub fn user(mut self, user: impl Into<String>) -> Self {
        self.user = Some(user.into());
        self
    }

    /// Add `-d` value
    pub fn data(mut self, data: impl Into<String>) -> Self {
        self.data.push(data.into());
        self
    }

    /// Add `-F` field spec
    pub fn form(mut self, field: impl Into<String>) -> Self {
        self.form.push(field.into());
        self
    }

    /// Fetch headers only
    pub fn head(mut self, head: bool) -> Self {
        self.head = head;
        self
    }

    /// Accept invalid TLS certificates
    pub fn insecure(mut self, insecure: bool) -> Self {
        self.insecure = insecure;
        self
    }

    /// Mute output
    pub fn silent(mut self, silent: bool) -> Self {
        self.silent = silent;
        self
    }

    /// True when any data family carries a value
    pub fn has_data(&self) -> bool {
        !(self.data.is_empty()
            && self.data_ascii.is_empty()
            && self.data_raw.is_empty()
            && self.data_binary.is_empty()
            && self.data_urlencode.is_empty())
    }

    /// Parse the resume token, if one was given
    pub fn resume(&self) -> Result<Option<ResumeOffset>> {
        self.continue_at.as_deref().map(ResumeOffset::parse).transpose()
    }
}

/// Where a resumed download continues from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResumeOffset {
    /// Use the current size of the output file
    Auto,
    /// Explicit byte offset
    At(u64),
}

impl ResumeOffset {
    /// Parse a `-C` token
    pub fn parse(token: &str) -> Result<Self> {
        if token == "-" {
            return Ok(ResumeOffset::Auto);
        }
        token
            .parse::<u64>()
            .map(ResumeOffset::At)
            .map_err(|_| Error::InvalidResumeOffset(token.to_string()))
    }
}
