// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Cookies and request-time cookie matching (RFC 6265 §5.1.3, §5.1.4)

use std::path::Path;

use chrono::{DateTime, Duration, NaiveDateTime, TimeZone, Utc};
use url::Url;

use super::jar::read_jar;

/// Longest lifetime honoured for Max-Age, 400 days
const MAX_AGE_CAP: i64 = 400 * 24 * 60 * 60;

/// A single HTTP cookie
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cookie {
    /// Cookie name
    pub name: String,
    /// Cookie value
    pub value: String,
    /// Domain the cookie belongs to, as stored (may carry a leading dot)
    pub domain: String,
    /// Path the cookie is valid for
    pub path: String,
    /// Expiration time (None = session cookie)
    pub expires: Option<DateTime<Utc>>,
    /// Secure flag (HTTPS only)
    pub secure: bool,
    /// HttpOnly flag
    pub http_only: bool,
    /// Jar flag telling whether subdomains share the cookie
    pub include_subdomains: bool,
}

impl Cookie {
    /// Create a new cookie
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            domain: String::new(),
            path: "/".to_string(),
            expires: None,
            secure: false,
            http_only: false,
            include_subdomains: false,
        }
    }

    /// Set the domain; a leading dot also marks the cookie as shared with subdomains
    pub fn domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = domain.into();
        self.include_subdomains = self.domain.starts_with('.');
        self
    }

    /// Set the path
    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    /// Set secure flag
    pub fn secure(mut self, secure: bool) -> Self {
        self.secure = secure;
        self
    }

    /// Set http_only flag
    pub fn http_only(mut self, http_only: bool) -> Self {
        self.http_only = http_only;
        self
    }

    /// Set expiration time
    pub fn expires(mut self, expires: DateTime<Utc>) -> Self {
        self.expires = Some(expires);
        self
    }

    /// Check whether the cookie has expired at `now`, to the second
    ///
    /// A cookie without an expiry counts as expiring at the epoch, the same
    /// as the `0` a jar stores for it, so it is never sent from a jar.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires.map_or(0, |exp| exp.timestamp()) <= now.timestamp()
    }

    /// Check whether an explicit expiry has passed; session cookies never lapse
    pub fn has_lapsed(&self, now: DateTime<Utc>) -> bool {
        self.expires.map_or(false, |exp| exp <= now)
    }

    /// Two cookies with the same name, domain and path occupy the same jar slot
    pub fn same_slot(&self, other: &Cookie) -> bool {
        self.name == other.name
            && self.path == other.path
            && self.domain.eq_ignore_ascii_case(&other.domain)
    }

    /// Parse a Set-Cookie header value
    ///
    /// The domain stays empty when the header has no `Domain` attribute; the
    /// caller decides which host the cookie belongs to.
    pub fn parse(header: &str) -> Option<Self> {
        let mut parts = header.split(';');
        let first = parts.next()?.trim();

        let (name, value) = first.split_once('=')?;
        let name = name.trim();
        if name.is_empty() {
            return None;
        }
        let mut cookie = Cookie::new(name, value.trim());
        let mut max_age = None;

        for part in parts {
            let part = part.trim();
            if let Some((attr, val)) = part.split_once('=') {
                let val = val.trim();
                match attr.trim().to_ascii_lowercase().as_str() {
                    "domain" if !val.is_empty() => {
                        cookie.domain = format!(".{}", val.trim_start_matches('.'));
                        cookie.include_subdomains = true;
                    }
                    "path" if val.starts_with('/') => cookie.path = val.to_string(),
                    "expires" => cookie.expires = parse_cookie_date(val).or(cookie.expires),
                    "max-age" => max_age = val.parse::<i64>().ok(),
                    _ => {}
                }
            } else {
                match part.to_ascii_lowercase().as_str() {
                    "secure" => cookie.secure = true,
                    "httponly" => cookie.http_only = true,
                    _ => {}
                }
            }
        }

        // Max-Age wins over Expires
        if let Some(secs) = max_age {
            cookie.expires = Some(Utc::now() + Duration::seconds(secs.clamp(0, MAX_AGE_CAP)));
        }

        Some(cookie)
    }

    /// Convert to cookie header format
    pub fn to_header_value(&self) -> String {
        format!("{}={}", self.name, self.value)
    }
}

fn parse_cookie_date(val: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc2822(val) {
        return Some(dt.with_timezone(&Utc));
    }
    // Netscape style: Wed, 09-Jun-2021 10:18:14 GMT
    NaiveDateTime::parse_from_str(val, "%a, %d-%b-%Y %H:%M:%S GMT")
        .ok()
        .map(|naive| Utc.from_utc_datetime(&naive))
}

/// Picks the stored cookies that apply to a request
#[derive(Debug, Clone, Copy)]
pub struct CookieMatcher {
    now: DateTime<Utc>,
}

impl CookieMatcher {
    /// Matcher evaluating expiry against `now`
    pub fn new(now: DateTime<Utc>) -> Self {
        Self { now }
    }

    /// Matcher evaluating expiry against the current time
    pub fn current() -> Self {
        Self::new(Utc::now())
    }

    /// Check if the cookie applies to `url`
    pub fn matches(&self, cookie: &Cookie, url: &Url) -> bool {
        if cookie.secure && url.scheme() != "https" {
            return false;
        }

        if cookie.is_expired_at(self.now) {
            return false;
        }

        let host = url.host_str().unwrap_or("");
        if !domain_matches(&cookie.domain, host) {
            return false;
        }

        path_matches(&cookie.path, url.path())
    }

    /// Cookies from `cookies` that apply to `url`, in stored order
    pub fn select<'a>(&self, cookies: &'a [Cookie], url: &Url) -> Vec<&'a Cookie> {
        cookies.iter().filter(|c| self.matches(c, url)).collect()
    }

    /// Resolve a `-b` argument into Cookie header values
    ///
    /// An argument containing `=` is sent verbatim. Anything else names a jar
    /// file; a missing or unreadable jar yields no cookies.
    pub fn cookie_headers(&self, arg: &str, url: &Url) -> Vec<String> {
        if arg.contains('=') {
            return vec![arg.to_string()];
        }

        let cookies = read_jar(Path::new(arg));
        self.select(&cookies, url)
            .into_iter()
            .map(Cookie::to_header_value)
            .collect()
    }
}

fn domain_matches(domain: &str, host: &str) -> bool {
    let domain = domain.to_ascii_lowercase();
    let host = host.to_ascii_lowercase();

    if domain.is_empty() {
        return false;
    }
    if domain.trim_start_matches('.') == host {
        return true;
    }

    let suffix = if domain.starts_with('.') {
        domain
    } else {
        format!(".{}", domain)
    };
    host.ends_with(&suffix)
}

fn path_matches(cookie_path: &str, request_path: &str) -> bool {
    let request_path = if request_path.is_empty() { "/" } else { request_path };
    let cookie_path = if cookie_path.is_empty() { "/" } else { cookie_path };

    if request_path == cookie_path {
        return true;
    }

    match request_path.strip_prefix(cookie_path) {
        Some(rest) => cookie_path.ends_with('/') || rest.starts_with('/'),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    fn future() -> DateTime<Utc> {
        Utc::now() + Duration::days(30)
    }

    #[test]
    fn test_cookie_parsing() {
        let header = "session=abc123; Domain=example.com; Path=/app; Secure; HttpOnly";
        let cookie = Cookie::parse(header).unwrap();

        assert_eq!(cookie.name, "session");
        assert_eq!(cookie.value, "abc123");
        assert_eq!(cookie.domain, ".example.com");
        assert!(cookie.include_subdomains);
        assert_eq!(cookie.path, "/app");
        assert!(cookie.secure);
        assert!(cookie.http_only);
        assert!(cookie.expires.is_none());
    }

    #[test]
    fn test_cookie_parsing_without_domain() {
        let cookie = Cookie::parse("id=7").unwrap();
        assert!(cookie.domain.is_empty());
        assert!(!cookie.include_subdomains);
        assert_eq!(cookie.path, "/");
        assert!(Cookie::parse("no-equals-sign").is_none());
    }

    #[test]
    fn test_cookie_expiry_attributes() {
        let cookie = Cookie::parse("a=b; Expires=Wed, 21 Oct 2015 07:28:00 GMT").unwrap();
        assert_eq!(cookie.expires.unwrap().timestamp(), 1445412480);

        let cookie = Cookie::parse("a=b; Expires=Wed, 21-Oct-2015 07:28:00 GMT").unwrap();
        assert_eq!(cookie.expires.unwrap().timestamp(), 1445412480);

        let cookie =
            Cookie::parse("a=b; Expires=Wed, 21 Oct 2015 07:28:00 GMT; Max-Age=3600").unwrap();
        assert!(cookie.expires.unwrap() > Utc::now());

        let cookie = Cookie::parse("a=b; Max-Age=0").unwrap();
        assert!(cookie.is_expired_at(Utc::now()));
    }

    #[test]
    fn test_domain_matching() {
        let matcher = CookieMatcher::current();
        let cookie = Cookie::new("k", "v").domain(".example.com").expires(future());

        assert!(!matcher.matches(&cookie, &url("http://other.com/")));
        assert!(matcher.matches(&cookie, &url("http://www.example.com/")));
        assert!(matcher.matches(&cookie, &url("http://example.com/")));
        assert!(!matcher.matches(&cookie, &url("http://badexample.com/")));

        let exact = Cookie::new("k", "v").domain("Example.COM").expires(future());
        assert!(matcher.matches(&exact, &url("http://example.com/")));
        assert!(matcher.matches(&exact, &url("http://api.example.com/")));
    }

    #[test]
    fn test_dotted_domain_matches_bare_host() {
        // RFC 6265 ignores a leading dot, so the registrable host itself matches
        let matcher = CookieMatcher::current();
        let cookie = Cookie::new("k", "v").domain(".example.com").expires(future());

        assert!(matcher.matches(&cookie, &url("http://example.com/")));
        assert!(matcher.matches(&cookie, &url("http://EXAMPLE.com/")));
        assert!(!matcher.matches(&cookie, &url("http://ample.com/")));
    }

    #[test]
    fn test_secure_and_expiry() {
        let matcher = CookieMatcher::current();
        let secure = Cookie::new("k", "v")
            .domain("example.com")
            .secure(true)
            .expires(future());

        assert!(!matcher.matches(&secure, &url("http://example.com/")));
        assert!(matcher.matches(&secure, &url("https://example.com/")));

        let expired = Cookie::new("k", "v")
            .domain("example.com")
            .expires(Utc::now() - Duration::seconds(1));
        assert!(!matcher.matches(&expired, &url("https://example.com/")));

        let live = Cookie::new("k", "v").domain("example.com").expires(future());
        assert!(matcher.matches(&live, &url("https://example.com/")));
    }

    #[test]
    fn test_expiry_boundary_is_exclusive() {
        let now = Utc::now();
        let cookie = Cookie::new("k", "v").domain("example.com").expires(now);
        assert!(!CookieMatcher::new(now).matches(&cookie, &url("http://example.com/")));

        let later = Cookie::new("k", "v")
            .domain("example.com")
            .expires(now + Duration::seconds(1));
        assert!(CookieMatcher::new(now).matches(&later, &url("http://example.com/")));
    }

    #[test]
    fn test_session_cookie_from_jar_not_sent() {
        let cookies =
            crate::http::parse_jar("example.com\tFALSE\t/\tFALSE\t0\tsid\tabc\n".as_bytes());
        assert_eq!(cookies.len(), 1);

        let matcher = CookieMatcher::current();
        assert!(cookies[0].is_expired_at(Utc::now()));
        assert!(!matcher.matches(&cookies[0], &url("http://example.com/")));
        assert!(!cookies[0].has_lapsed(Utc::now()));
    }

    #[test]
    fn test_path_matching() {
        assert!(path_matches("/", "/anything"));
        assert!(path_matches("/docs", "/docs"));
        assert!(path_matches("/docs", "/docs/page"));
        assert!(path_matches("/docs/", "/docs/page"));
        assert!(!path_matches("/docs", "/docsearch"));
        assert!(!path_matches("/docs", "/"));
        assert!(path_matches("/", ""));
    }

    #[test]
    fn test_select_keeps_stored_order() {
        let cookies = vec![
            Cookie::new("first", "1").domain("example.com").expires(future()),
            Cookie::new("skipped", "x").domain("other.com").expires(future()),
            Cookie::new("second", "2")
                .domain(".example.com")
                .path("/a")
                .expires(future()),
        ];
        let matcher = CookieMatcher::current();

        let names: Vec<_> = matcher
            .select(&cookies, &url("http://www.example.com/a/b"))
            .iter()
            .map(|c| c.name.as_str())
            .collect();
        assert_eq!(names, vec!["first", "second"]);
    }

    #[test]
    fn test_inline_cookie_short_circuits() {
        let matcher = CookieMatcher::current();
        let headers = matcher.cookie_headers("a=1; b=2", &url("https://example.com/"));
        assert_eq!(headers, vec!["a=1; b=2".to_string()]);
    }

    #[test]
    fn test_missing_jar_yields_nothing() {
        let matcher = CookieMatcher::current();
        let headers =
            matcher.cookie_headers("/nonexistent/kurly-jar.txt", &url("https://example.com/"));
        assert!(headers.is_empty());
    }
}
