// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Error types for kurly
//!
//! Every fatal error carries the context an operator needs to act on it
//! (file path, field spec, URL or HTTP status) without re-running with `-v`.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Result type alias for kurly operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for kurly
#[derive(Error, Debug)]
pub enum Error {
    /// A `-F` field spec broke the one-unkeyed-token rule or lacked `=`
    #[error("malformed form field '{spec}': {reason}")]
    MalformedField { spec: String, reason: String },

    /// A local file could not be opened or read
    #[error("unable to read {}: {source}", path.display())]
    File {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// `-C` was neither `-` nor a non-negative integer
    #[error("invalid resume offset '{0}': expected a valid positive number or '-'")]
    InvalidResumeOffset(String),

    /// The server rejected the requested range
    #[error("unable to get {url}: server responded {status}; either ranges are unsupported or the range is invalid")]
    InvalidRange { url: String, status: u16 },

    /// Transport-level failure, passed through from the HTTP client
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Cookie jar could not be written back
    #[error("unable to save cookies to {}: {source}", path.display())]
    JarPersist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// URL parsing failed
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// I/O error without a known path
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Create a malformed form field error
    pub fn malformed_field(spec: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::MalformedField {
            spec: spec.into(),
            reason: reason.into(),
        }
    }

    /// Create a file error for `path`
    pub fn file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::File {
            path: path.into(),
            source,
        }
    }

    /// Create a jar persistence error
    pub fn jar_persist(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::JarPersist {
            path: path.into(),
            source,
        }
    }

    /// Create a configuration error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Error::Config(msg.into())
    }

    /// True for errors raised while building the request, before any network I/O
    pub fn is_fatal_before_network(&self) -> bool {
        matches!(
            self,
            Error::MalformedField { .. }
                | Error::File { .. }
                | Error::InvalidResumeOffset(_)
                | Error::InvalidUrl(_)
                | Error::Config(_)
        )
    }

    /// Check if this is a transport error
    pub fn is_transport(&self) -> bool {
        matches!(self, Error::Transport(_))
    }

    /// Get HTTP status code if available
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Error::InvalidRange { status, .. } => Some(*status),
            Error::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Get the file path involved, if any
    pub fn path(&self) -> Option<&Path> {
        match self {
            Error::File { path, .. } | Error::JarPersist { path, .. } => Some(path),
            _ => None,
        }
    }
}

/// Helper trait for attaching a path to I/O failures
pub trait ErrorContext<T> {
    /// Turn an I/O error into [`Error::File`] for `path`
    fn with_path(self, path: &Path) -> Result<T>;
}

impl<T> ErrorContext<T> for std::result::Result<T, std::io::Error> {
    fn with_path(self, path: &Path) -> Result<T> {
        self.map_err(|e| Error::file(path, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_error_context() {
        let res: std::result::Result<(), _> = Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "missing",
        ));
        let err = res.with_path(Path::new("/tmp/photo.png")).unwrap_err();

        assert!(err.is_fatal_before_network());
        assert_eq!(err.path(), Some(Path::new("/tmp/photo.png")));
        assert!(err.to_string().contains("/tmp/photo.png"));
    }

    #[test]
    fn test_invalid_range_error() {
        let err = Error::InvalidRange {
            url: "http://example.com/file".to_string(),
            status: 416,
        };

        assert_eq!(err.status_code(), Some(416));
        assert!(!err.is_fatal_before_network());
        assert!(err.to_string().contains("416"));
    }

    #[test]
    fn test_malformed_field_message() {
        let err = Error::malformed_field("a=1;b=2", "second unkeyed token 'b'");
        assert!(err.to_string().contains("a=1;b=2"));
        assert!(err.path().is_none());
    }
}
