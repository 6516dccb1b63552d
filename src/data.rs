// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! `-d` family aggregation into one form-encoded body

use std::path::Path;

use url::form_urlencoded;

use crate::error::{Error, Result};
use crate::options::Options;

/// Collect every data option into `key=value` entries
///
/// Plain `-d` values come first, then ascii, raw, binary and finally one
/// combined entry for all urlencode pairs.
pub fn aggregate(options: &Options) -> Result<Vec<String>> {
    let mut entries = options.data.clone();

    for item in &options.data_ascii {
        match item.split_once('=') {
            Some((key, value)) => match value.strip_prefix('@') {
                Some(path) => entries.push(format!("{}={}", key, read_stripped(key, path)?)),
                None => entries.push(item.clone()),
            },
            None => entries.push(item.clone()),
        }
    }

    entries.extend(options.data_raw.iter().cloned());
    entries.extend(options.data_binary.iter().cloned());

    if let Some(encoded) = urlencode(&options.data_urlencode) {
        entries.push(encoded);
    }

    Ok(entries)
}

/// Join entries into a request body
pub fn join_data(entries: &[String]) -> String {
    entries.join("&")
}

/// Read `path` and drop every CR and LF
fn read_stripped(key: &str, path: &str) -> Result<String> {
    let contents = std::fs::read_to_string(path).map_err(|e| {
        tracing::error!("Unable to read file {} for data element {}", path, key);
        Error::file(Path::new(path), e)
    })?;
    Ok(contents.chars().filter(|c| !matches!(c, '\r' | '\n')).collect())
}

/// Encode all pairs into one query string, ordered by key
fn urlencode(items: &[String]) -> Option<String> {
    if items.is_empty() {
        return None;
    }

    let mut pairs: Vec<(&str, &str)> = items
        .iter()
        .map(|item| item.split_once('=').unwrap_or((item.as_str(), "")))
        .collect();
    pairs.sort_by_key(|&(key, _)| key);

    let mut serializer = form_urlencoded::Serializer::new(String::new());
    serializer.extend_pairs(pairs);
    Some(serializer.finish())
}
