// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Netscape cookie-jar file format
//!
//! One cookie per line, seven tab-separated fields:
//! `domain  include-subdomains  path  secure  expiry  name  value`.
//! Lines starting with `#` are comments, except curl's `#HttpOnly_` domain
//! prefix which marks an HttpOnly cookie. Expiry `0` is a session cookie.

use std::fs::{File, OpenOptions};
use std::io::{self, BufRead, BufReader, BufWriter, Seek, SeekFrom, Write};
use std::path::Path;

use chrono::{TimeZone, Utc};

use super::cookie::Cookie;
use crate::error::{Error, Result};

const JAR_HEADER: &str = "# Netscape HTTP Cookie File\n\
# https://curl.se/docs/http-cookies.html\n\
# This file was generated by kurly! Edit at your own risk.\n\n";

const HTTP_ONLY_PREFIX: &str = "#HttpOnly_";

/// Parse every well-formed cookie line; malformed lines are skipped
pub fn parse_jar<R: BufRead>(reader: R) -> Vec<Cookie> {
    let mut cookies = Vec::new();
    if let Err(e) = read_cookies(reader, &mut cookies) {
        tracing::debug!(error = %e, "cookie jar read stopped early");
    }
    cookies
}

/// Collect cookies line by line; a line that is not UTF-8 is skipped, not fatal
fn read_cookies<R: BufRead>(reader: R, cookies: &mut Vec<Cookie>) -> io::Result<()> {
    for line in reader.split(b'\n') {
        let line = line?;
        match std::str::from_utf8(&line) {
            Ok(text) => cookies.extend(parse_line(text.trim_end_matches('\r'))),
            Err(_) => tracing::debug!("skipping cookie jar line that is not UTF-8"),
        }
    }
    Ok(())
}

fn parse_line(line: &str) -> Option<Cookie> {
    let (line, http_only) = match line.strip_prefix(HTTP_ONLY_PREFIX) {
        Some(rest) => (rest, true),
        None => (line, false),
    };
    if line.trim().is_empty() || line.starts_with('#') {
        return None;
    }

    let fields: Vec<&str> = line.split('\t').collect();
    if fields.len() < 7 {
        return None;
    }

    let expiry: i64 = fields[4].trim().parse().ok()?;
    let expires = match expiry {
        0 => None,
        secs => Some(Utc.timestamp_opt(secs, 0).single()?),
    };

    Some(Cookie {
        name: fields[5].to_string(),
        value: fields[6..].join("\t"),
        domain: fields[0].to_string(),
        path: fields[2].to_string(),
        expires,
        secure: fields[3].eq_ignore_ascii_case("TRUE"),
        http_only,
        include_subdomains: fields[1].eq_ignore_ascii_case("TRUE"),
    })
}

/// Read a jar file; a missing or unreadable file is an empty jar
pub fn read_jar(path: &Path) -> Vec<Cookie> {
    match File::open(path) {
        Ok(file) => parse_jar(BufReader::new(file)),
        Err(e) => {
            tracing::debug!(path = %path.display(), error = %e, "no cookies read");
            Vec::new()
        }
    }
}

/// Write the jar header followed by one line per cookie
pub fn write_jar<W: Write>(mut writer: W, cookies: &[Cookie]) -> io::Result<()> {
    writer.write_all(JAR_HEADER.as_bytes())?;
    for cookie in cookies {
        writeln!(
            writer,
            "{}{}\t{}\t{}\t{}\t{}\t{}\t{}",
            if cookie.http_only { HTTP_ONLY_PREFIX } else { "" },
            cookie.domain,
            flag(cookie.include_subdomains),
            cookie.path,
            flag(cookie.secure),
            cookie.expires.map_or(0, |e| e.timestamp()),
            cookie.name,
            cookie.value,
        )?;
    }
    writer.flush()
}

fn flag(value: bool) -> &'static str {
    if value {
        "TRUE"
    } else {
        "FALSE"
    }
}

/// Merge `incoming` into `existing`
///
/// An incoming cookie replaces the stored one with the same name, domain and
/// path in place; anything else is appended.
pub fn merge_cookies(mut existing: Vec<Cookie>, incoming: Vec<Cookie>) -> Vec<Cookie> {
    for cookie in incoming {
        match existing.iter_mut().find(|c| c.same_slot(&cookie)) {
            Some(slot) => *slot = cookie,
            None => existing.push(cookie),
        }
    }
    existing
}

/// Merge `cookies` into the jar at `path` and rewrite it from the start
///
/// Cookies whose explicit expiry has passed are dropped, which is how a
/// server deletes a cookie. Session cookies are kept. If the existing contents
/// cannot be read in full the file is left untouched.
pub fn persist_cookies(path: &Path, cookies: Vec<Cookie>) -> Result<()> {
    let fail = |e| Error::jar_persist(path, e);

    let mut file = OpenOptions::new()
        .read(true)
        .write(true)
        .create(true)
        .open(path)
        .map_err(fail)?;

    let mut existing = Vec::new();
    read_cookies(BufReader::new(&file), &mut existing).map_err(fail)?;

    let now = Utc::now();
    let mut merged = merge_cookies(existing, cookies);
    merged.retain(|c| !c.has_lapsed(now));

    file.set_len(0).map_err(fail)?;
    file.seek(SeekFrom::Start(0)).map_err(fail)?;
    write_jar(BufWriter::new(&file), &merged).map_err(fail)?;

    tracing::debug!(path = %path.display(), cookies = merged.len(), "cookie jar saved");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use std::collections::HashSet;

    fn tuples(cookies: &[Cookie]) -> HashSet<(String, String, String, String)> {
        cookies
            .iter()
            .map(|c| (c.name.clone(), c.domain.clone(), c.path.clone(), c.value.clone()))
            .collect()
    }

    #[test]
    fn test_parse_netscape_lines() {
        let jar = "# Netscape HTTP Cookie File\n\
                   \n\
                   .example.com\tTRUE\t/\tFALSE\t2145916800\tsid\tabc\n\
                   #HttpOnly_api.example.com\tFALSE\t/v1\tTRUE\t0\ttoken\tx=y\n\
                   broken line without tabs\n";
        let cookies = parse_jar(jar.as_bytes());

        assert_eq!(cookies.len(), 2);
        assert_eq!(cookies[0].domain, ".example.com");
        assert!(cookies[0].include_subdomains);
        assert_eq!(cookies[0].expires.unwrap().timestamp(), 2145916800);

        assert_eq!(cookies[1].domain, "api.example.com");
        assert!(cookies[1].http_only);
        assert!(cookies[1].secure);
        assert!(cookies[1].expires.is_none());
        assert_eq!(cookies[1].value, "x=y");
    }

    #[test]
    fn test_empty_value_is_kept() {
        let cookies = parse_jar("example.com\tFALSE\t/\tFALSE\t0\tempty\t\n".as_bytes());
        assert_eq!(cookies.len(), 1);
        assert_eq!(cookies[0].value, "");
    }

    #[test]
    fn test_round_trip() {
        let cookies = vec![
            Cookie::new("sid", "abc").domain(".example.com"),
            Cookie::new("pref", "dark")
                .domain("www.example.com")
                .path("/settings")
                .secure(true)
                .expires(Utc.timestamp_opt(2145916800, 0).unwrap()),
            Cookie::new("h", "1").domain("example.org").http_only(true),
        ];

        let mut buf = Vec::new();
        write_jar(&mut buf, &cookies).unwrap();
        let parsed = parse_jar(buf.as_slice());

        assert_eq!(tuples(&parsed), tuples(&cookies));
        assert_eq!(parsed, cookies);
    }

    #[test]
    fn test_missing_file_is_empty() {
        assert!(read_jar(Path::new("/definitely/not/here.jar")).is_empty());
    }

    #[test]
    fn test_merge_replaces_same_slot() {
        let existing = vec![
            Cookie::new("a", "old").domain("example.com"),
            Cookie::new("b", "keep").domain("example.com"),
        ];
        let incoming = vec![
            Cookie::new("a", "new").domain("EXAMPLE.com"),
            Cookie::new("a", "other-path").domain("example.com").path("/x"),
        ];

        let merged = merge_cookies(existing, incoming);
        assert_eq!(merged.len(), 3);
        assert_eq!(merged[0].value, "new");
        assert_eq!(merged[1].value, "keep");
        assert_eq!(merged[2].path, "/x");
    }

    #[test]
    fn test_persist_merges_and_truncates() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("jar.txt");

        let long_value = "v".repeat(200);
        persist_cookies(
            &path,
            vec![
                Cookie::new("a", long_value).domain("example.com"),
                Cookie::new("b", "2").domain("example.com"),
            ],
        )
        .unwrap();
        persist_cookies(&path, vec![Cookie::new("a", "short").domain("example.com")]).unwrap();

        let cookies = read_jar(&path);
        assert_eq!(cookies.len(), 2);
        assert_eq!(cookies[0].value, "short");
        assert_eq!(cookies[1].name, "b");

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("# Netscape HTTP Cookie File"));
        assert!(!text.contains("vvvv"));
    }

    #[test]
    fn test_persist_drops_expired() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("jar.txt");

        persist_cookies(&path, vec![Cookie::new("gone", "1").domain("example.com")]).unwrap();
        persist_cookies(
            &path,
            vec![Cookie::new("gone", "")
                .domain("example.com")
                .expires(Utc::now() - Duration::hours(1))],
        )
        .unwrap();

        assert!(read_jar(&path).is_empty());
    }

    #[test]
    fn test_undecodable_line_does_not_hide_later_cookies() {
        let mut jar = b"example.com\tFALSE\t/\tFALSE\t0\tfirst\t1\n".to_vec();
        jar.extend_from_slice(b"example.com\tFALSE\t/\tFALSE\t0\tbad\t\xff\xfe\n");
        jar.extend_from_slice(b"example.com\tFALSE\t/\tFALSE\t0\tkeep\t1\r\n");

        let names: Vec<_> = parse_jar(jar.as_slice()).into_iter().map(|c| c.name).collect();
        assert_eq!(names, vec!["first", "keep"]);
    }

    #[test]
    fn test_persist_keeps_cookies_after_undecodable_line() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("jar.txt");
        let mut jar = b"example.com\tFALSE\t/\tFALSE\t0\tbad\t\xff\xfe\n".to_vec();
        jar.extend_from_slice(b"example.com\tFALSE\t/\tFALSE\t0\tkeep\t1\n");
        std::fs::write(&path, jar).unwrap();

        persist_cookies(&path, vec![Cookie::new("new", "2").domain("example.com")]).unwrap();

        let names: Vec<_> = read_jar(&path).into_iter().map(|c| c.name).collect();
        assert_eq!(names, vec!["keep", "new"]);
    }

    #[test]
    fn test_persist_keeps_session_cookies() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("jar.txt");

        persist_cookies(&path, vec![Cookie::new("sid", "1").domain("example.com")]).unwrap();
        persist_cookies(&path, vec![Cookie::new("other", "2").domain("example.com")]).unwrap();

        let cookies = read_jar(&path);
        assert_eq!(cookies.len(), 2);
        assert!(cookies.iter().all(|c| c.expires.is_none()));
    }

    #[test]
    fn test_persist_into_missing_directory_fails() {
        let err = persist_cookies(Path::new("/no/such/dir/jar.txt"), vec![]).unwrap_err();
        assert!(matches!(err, Error::JarPersist { .. }));
    }
}
