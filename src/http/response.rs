// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! HTTP response types
//!
//! The body is not buffered; it is pulled chunk by chunk into the output sink.

use bytes::Bytes;
use chrono::{DateTime, Utc};
use reqwest::header::HeaderMap;
use reqwest::{StatusCode, Version};
use tokio::io::{AsyncWrite, AsyncWriteExt};
use url::Url;

use super::body::ProgressFn;
use super::cookie::Cookie;
use super::headers::{LAST_MODIFIED, LOCATION, SET_COOKIE};
use crate::error::Result;

/// HTTP response with a streaming body
#[derive(Debug)]
pub struct Response {
    /// Response status code
    pub status: StatusCode,
    /// Protocol version
    pub version: Version,
    /// Response headers
    pub headers: HeaderMap,
    /// Final URL (after redirects)
    pub url: Url,
    inner: reqwest::Response,
}

impl Response {
    /// Wrap a transport response
    pub fn new(inner: reqwest::Response) -> Self {
        Self {
            status: inner.status(),
            version: inner.version(),
            headers: inner.headers().clone(),
            url: inner.url().clone(),
            inner,
        }
    }

    /// Get status code as u16
    pub fn status_code(&self) -> u16 {
        self.status.as_u16()
    }

    /// Check if status is redirect (3xx)
    pub fn is_redirect(&self) -> bool {
        self.status.is_redirection()
    }

    /// Status line, e.g. `HTTP/1.1 200 OK`
    pub fn status_line(&self) -> String {
        format!("{:?} {}", self.version, self.status)
    }

    /// Get a header value
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Get all values for a header
    pub fn header_all(&self, name: &str) -> Vec<&str> {
        self.headers
            .get_all(name)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .collect()
    }

    /// Body length announced by the server
    pub fn content_length(&self) -> Option<u64> {
        self.inner.content_length()
    }

    /// Location header resolved against the response URL
    pub fn location(&self) -> Option<Url> {
        self.header(LOCATION).and_then(|loc| self.url.join(loc).ok())
    }

    /// Last-Modified header as a timestamp
    pub fn last_modified(&self) -> Option<DateTime<Utc>> {
        self.header(LAST_MODIFIED)
            .and_then(|v| DateTime::parse_from_rfc2822(v).ok())
            .map(|dt| dt.with_timezone(&Utc))
    }

    /// Cookies set by this response
    ///
    /// A cookie without a Domain attribute belongs to the host named by the
    /// Location header, or else to the host of `request_url`.
    pub fn received_cookies(&self, request_url: &Url) -> Vec<Cookie> {
        let fallback_host = self
            .location()
            .as_ref()
            .unwrap_or(request_url)
            .host_str()
            .unwrap_or_default()
            .to_string();

        self.header_all(SET_COOKIE)
            .into_iter()
            .filter_map(Cookie::parse)
            .map(|mut cookie| {
                if cookie.domain.is_empty() {
                    cookie.domain = fallback_host.clone();
                }
                cookie
            })
            .collect()
    }

    /// Headers formatted one per line, as `-I` prints them
    pub fn header_block(&self) -> String {
        let mut block = format!("{}\r\n", self.status_line());
        for (name, value) in self.headers.iter() {
            block.push_str(&format!(
                "{}: {}\r\n",
                name,
                String::from_utf8_lossy(value.as_bytes())
            ));
        }
        block.push_str("\r\n");
        block
    }

    /// Next body chunk, `None` at the end
    pub async fn chunk(&mut self) -> Result<Option<Bytes>> {
        Ok(self.inner.chunk().await?)
    }

    /// Stream the rest of the body into `writer`, returning the byte count
    pub async fn copy_to<W>(&mut self, writer: &mut W, progress: Option<&ProgressFn>) -> Result<u64>
    where
        W: AsyncWrite + Unpin + ?Sized,
    {
        let total = self.content_length().unwrap_or(0);
        let mut written = 0u64;
        while let Some(chunk) = self.chunk().await? {
            writer.write_all(&chunk).await?;
            written += chunk.len() as u64;
            if let Some(report) = progress {
                report(written, total);
            }
        }
        writer.flush().await?;
        Ok(written)
    }
}
