// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Header directive handling for `-H`
//!
//! A directive is `"Name: Value"` to set, `"Name;"` to send an empty header or
//! `"Name:"` to remove one. Anything that does not fit is dropped without error.

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};

/// Apply every directive in order
pub fn apply_directives<S: AsRef<str>>(headers: &mut HeaderMap, directives: &[S]) {
    for directive in directives {
        apply_directive(headers, directive.as_ref());
    }
}

/// Apply a single directive
pub fn apply_directive(headers: &mut HeaderMap, directive: &str) {
    let parts: Vec<&str> = directive.split(": ").collect();
    match parts.as_slice() {
        [single] => {
            if let Some(name) = single.strip_suffix(';') {
                set_header(headers, name, "");
            } else if let Some(name) = single.strip_suffix(':') {
                if let Ok(name) = HeaderName::try_from(name) {
                    headers.remove(name);
                }
            }
        }
        [name, value] => set_header(headers, name, value),
        [name, rest @ ..] => set_header(headers, name, &rest.join(": ")),
        // split() always yields at least one part
        [] => {}
    }
}

fn set_header(headers: &mut HeaderMap, name: &str, value: &str) {
    if let (Ok(name), Ok(value)) = (HeaderName::try_from(name), HeaderValue::try_from(value)) {
        headers.insert(name, value);
    } else {
        tracing::debug!(name, "dropping invalid header directive");
    }
}
