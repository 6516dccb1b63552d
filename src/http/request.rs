// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! HTTP request types and builder

use base64::Engine;
use bytes::Bytes;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Method;
use url::Url;

use super::body::{Body, ProgressFn};
use super::cookie::CookieMatcher;
use super::directives::apply_directives;
use super::headers::{
    ACCEPT, AUTHORIZATION, CONTENT_LENGTH, CONTENT_TYPE, COOKIE, EXPECT, HOST, RANGE, USER_AGENT,
};
use crate::data::{aggregate, join_data};
use crate::error::{Error, Result};
use crate::form::{build_multipart, parse_form};
use crate::options::Options;

/// Fully assembled request, ready for the transport
#[derive(Debug)]
pub struct Request {
    /// Request method
    pub method: Method,
    /// Request URL
    pub url: Url,
    /// Request headers
    pub headers: HeaderMap,
    /// Request body
    pub body: Option<Body>,
}

impl Request {
    /// Size of the body, if there is one
    pub fn content_length(&self) -> Option<u64> {
        self.body.as_ref().map(Body::size)
    }

    /// Get a header value as text
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// All values of a header as text
    pub fn header_all(&self, name: &str) -> Vec<&str> {
        self.headers
            .get_all(name)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .collect()
    }

    /// Host plus explicit port, as sent in the Host header
    pub fn host(&self) -> String {
        host_header(&self.url)
    }
}

/// Body picked from the configured sources
struct BodyPlan {
    body: Body,
    content_type: Option<String>,
    method: Method,
    expect_continue: bool,
}

/// Turns [`Options`] into a [`Request`]
pub struct RequestBuilder<'a> {
    options: &'a Options,
    matcher: CookieMatcher,
    progress: Option<ProgressFn>,
}

impl<'a> RequestBuilder<'a> {
    /// Create a builder over `options`
    pub fn new(options: &'a Options) -> Self {
        Self {
            options,
            matcher: CookieMatcher::current(),
            progress: None,
        }
    }

    /// Use a specific cookie matcher (fixes the reference time)
    pub fn matcher(mut self, matcher: CookieMatcher) -> Self {
        self.matcher = matcher;
        self
    }

    /// Report upload progress through `progress`
    pub fn progress(mut self, progress: ProgressFn) -> Self {
        self.progress = Some(progress);
        self
    }

    /// Build the request for `target`, resuming at `resume_offset` when non-zero
    pub fn build(&self, target: &str, resume_offset: u64) -> Result<Request> {
        let url = parse_target(target)?;
        let plan = if self.options.head {
            None
        } else {
            self.plan_body()?
        };

        let method = self.method(plan.as_ref())?;
        let mut headers = HeaderMap::new();

        if resume_offset > 0 {
            insert(&mut headers, RANGE, &format!("bytes={}-", resume_offset))?;
        }
        insert(&mut headers, USER_AGENT, &self.options.user_agent)?;
        if let Some(ref user) = self.options.user {
            let encoded = base64::engine::general_purpose::STANDARD.encode(user);
            insert(&mut headers, AUTHORIZATION, &format!("Basic {}", encoded))?;
        }
        insert(&mut headers, ACCEPT, "*/*")?;
        insert(&mut headers, HOST, &host_header(&url))?;

        let body = match plan {
            Some(plan) => {
                if let Some(ref content_type) = plan.content_type {
                    insert(&mut headers, CONTENT_TYPE, content_type)?;
                }
                if plan.expect_continue {
                    insert(&mut headers, EXPECT, "100-continue")?;
                }
                insert(&mut headers, CONTENT_LENGTH, &plan.body.size().to_string())?;
                Some(plan.body)
            }
            None => None,
        };

        apply_directives(&mut headers, &self.options.headers);

        if let Some(ref arg) = self.options.cookie {
            for value in self.matcher.cookie_headers(arg, &url) {
                match HeaderValue::try_from(value) {
                    Ok(value) => {
                        headers.append(COOKIE, value);
                    }
                    Err(_) => tracing::debug!("skipping cookie with invalid header bytes"),
                }
            }
        }

        Ok(Request {
            method,
            url,
            headers,
            body,
        })
    }

    fn method(&self, plan: Option<&BodyPlan>) -> Result<Method> {
        if let Some(ref method) = self.options.method {
            return Method::from_bytes(method.as_bytes())
                .map_err(|_| Error::config(format!("invalid HTTP method '{}'", method)));
        }
        if self.options.head {
            return Ok(Method::HEAD);
        }
        Ok(plan.map_or(Method::GET, |p| p.method.clone()))
    }

    /// First configured source wins: upload file, then form, then data
    fn plan_body(&self) -> Result<Option<BodyPlan>> {
        let options = self.options;

        if let Some(ref path) = options.upload_file {
            let body = match self.progress {
                Some(ref progress) => Body::file_with_progress(path, progress.clone())?,
                None => Body::file(path)?,
            };
            return Ok(Some(BodyPlan {
                body,
                content_type: None,
                method: Method::PUT,
                expect_continue: true,
            }));
        }

        if !options.form.is_empty() {
            let form = parse_form(&options.form)?;
            let (bytes, content_type) = build_multipart(&form)?;
            return Ok(Some(BodyPlan {
                body: Body::Buffer(bytes),
                content_type: Some(content_type),
                method: Method::POST,
                expect_continue: false,
            }));
        }

        if options.has_data() {
            let entries = aggregate(options)?;
            return Ok(Some(BodyPlan {
                body: Body::Buffer(Bytes::from(join_data(&entries))),
                content_type: Some("application/x-www-form-urlencoded".to_string()),
                method: Method::POST,
                expect_continue: false,
            }));
        }

        Ok(None)
    }
}

/// Parse a command line target, defaulting to `http://` when no scheme is given
pub fn parse_target(target: &str) -> Result<Url> {
    if target.contains("://") {
        Ok(Url::parse(target)?)
    } else {
        Ok(Url::parse(&format!("http://{}", target))?)
    }
}

fn host_header(url: &Url) -> String {
    let host = url.host_str().unwrap_or("");
    match url.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host.to_string(),
    }
}

fn insert(headers: &mut HeaderMap, name: &'static str, value: &str) -> Result<()> {
    let value = HeaderValue::try_from(value)
        .map_err(|_| Error::config(format!("invalid value for header {}: {:?}", name, value)))?;
    headers.insert(HeaderName::from_static(name), value);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::Cookie;
    use chrono::{Duration, Utc};
    use std::io::Write;

    #[test]
    fn test_default_get() {
        let opts = Options::new().user_agent("Kurly/1.0");
        let req = RequestBuilder::new(&opts)
            .build("http://example.com:8080/path", 0)
            .unwrap();

        assert_eq!(req.method, Method::GET);
        assert_eq!(req.header("user-agent"), Some("Kurly/1.0"));
        assert_eq!(req.header("accept"), Some("*/*"));
        assert_eq!(req.header("host"), Some("example.com:8080"));
        assert!(req.header("range").is_none());
        assert!(req.header("content-length").is_none());
        assert!(req.body.is_none());
    }

    #[test]
    fn test_target_without_scheme() {
        let req = RequestBuilder::new(&Options::new()).build("example.com/x", 0).unwrap();
        assert_eq!(req.url.as_str(), "http://example.com/x");
        assert_eq!(req.host(), "example.com");
    }

    #[test]
    fn test_basic_auth() {
        let opts = Options::new().user("user:pass");
        let req = RequestBuilder::new(&opts).build("http://example.com/", 0).unwrap();
        assert_eq!(req.header("authorization"), Some("Basic dXNlcjpwYXNz"));
    }

    #[test]
    fn test_resume_range_header() {
        let req = RequestBuilder::new(&Options::new())
            .build("http://example.com/file", 1024)
            .unwrap();
        assert_eq!(req.header("range"), Some("bytes=1024-"));
    }

    #[test]
    fn test_data_body() {
        let opts = Options::new().data("a=1").data("b=2");
        let req = RequestBuilder::new(&opts).build("http://example.com/", 0).unwrap();

        assert_eq!(req.method, Method::POST);
        assert_eq!(
            req.header("content-type"),
            Some("application/x-www-form-urlencoded")
        );
        assert_eq!(req.header("content-length"), Some("7"));
        assert_eq!(req.content_length(), Some(7));
    }

    #[test]
    fn test_upload_wins_over_data() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        tmp.write_all(b"payload").unwrap();

        let opts = Options::new().upload_file(tmp.path()).data("ignored=1");
        let req = RequestBuilder::new(&opts).build("http://example.com/up", 0).unwrap();

        assert_eq!(req.method, Method::PUT);
        assert_eq!(req.header("expect"), Some("100-continue"));
        assert_eq!(req.header("content-length"), Some("7"));
        assert!(req.header("content-type").is_none());
        assert!(matches!(req.body, Some(Body::File { size: 7, .. })));
    }

    #[test]
    fn test_form_body() {
        let opts = Options::new().form("name=kurly").data("ignored=1");
        let req = RequestBuilder::new(&opts).build("http://example.com/", 0).unwrap();

        assert_eq!(req.method, Method::POST);
        assert!(req
            .header("content-type")
            .unwrap()
            .starts_with("multipart/form-data; boundary="));
        let Some(Body::Buffer(ref bytes)) = req.body else {
            panic!("expected buffer body");
        };
        assert_eq!(req.content_length(), Some(bytes.len() as u64));
        assert!(String::from_utf8_lossy(bytes).contains("kurly"));
    }

    #[test]
    fn test_missing_form_file_fails_at_build() {
        let opts = Options::new().form("file=@/no/such/file.png");
        let err = RequestBuilder::new(&opts)
            .build("http://example.com/", 0)
            .unwrap_err();
        assert!(matches!(err, Error::File { .. }));
    }

    #[test]
    fn test_explicit_method_and_head() {
        let opts = Options::new().method("DELETE").data("a=1");
        let req = RequestBuilder::new(&opts).build("http://example.com/", 0).unwrap();
        assert_eq!(req.method, Method::DELETE);

        let opts = Options::new().head(true).data("a=1");
        let req = RequestBuilder::new(&opts).build("http://example.com/", 0).unwrap();
        assert_eq!(req.method, Method::HEAD);
        assert!(req.body.is_none());
    }

    #[test]
    fn test_user_directives_override_defaults() {
        let opts = Options::new()
            .header("Accept:")
            .header("User-Agent: custom/2")
            .header("X-Empty;");
        let req = RequestBuilder::new(&opts).build("http://example.com/", 0).unwrap();

        assert!(req.header("accept").is_none());
        assert_eq!(req.header("user-agent"), Some("custom/2"));
        assert_eq!(req.header("x-empty"), Some(""));
    }

    #[test]
    fn test_inline_cookie() {
        let opts = Options::new().cookie("session=abc");
        let req = RequestBuilder::new(&opts).build("http://example.com/", 0).unwrap();
        assert_eq!(req.header_all("cookie"), vec!["session=abc"]);
    }

    #[test]
    fn test_jar_cookies_each_own_header() {
        let dir = tempfile::tempdir().unwrap();
        let jar = dir.path().join("cookies.txt");
        crate::http::write_jar(
            std::fs::File::create(&jar).unwrap(),
            &[
                Cookie::new("a", "1")
                    .domain(".example.com")
                    .expires(Utc::now() + Duration::days(1)),
                Cookie::new("b", "2").domain("example.com").secure(true),
                Cookie::new("s", "0").domain("example.com"),
                Cookie::new("c", "3")
                    .domain("example.com")
                    .expires(Utc::now() + Duration::days(1)),
                Cookie::new("d", "4").domain("other.com"),
            ],
        )
        .unwrap();

        let opts = Options::new().cookie(jar.to_string_lossy());
        let req = RequestBuilder::new(&opts)
            .build("http://www.example.com/", 0)
            .unwrap();
        assert_eq!(req.header_all("cookie"), vec!["a=1", "c=3"]);
    }
}
