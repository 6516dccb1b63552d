// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! `-F` field spec parsing
//!
//! A spec is a `;`-separated list of `key=value` tokens. The first token names
//! the field; `type=` and `filename=` may follow. Double quotes protect `;`.

use std::collections::BTreeMap;
use std::path::Path;

use crate::error::{Error, Result};

/// Parsed form field
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldDescriptor {
    /// Value is a path to upload
    pub is_file: bool,
    /// Literal value, or the file path when `is_file`
    pub value: String,
    /// Filename sent in Content-Disposition
    pub file_alias: String,
    /// Content-Type override, empty when unset
    pub content_type: String,
}

/// Field name to descriptor
pub type FormData = BTreeMap<String, FieldDescriptor>;

/// Parse every spec; a later field with the same name replaces the earlier one
pub fn parse_form<S: AsRef<str>>(specs: &[S]) -> Result<FormData> {
    let mut form = FormData::new();
    for spec in specs {
        let (name, field) = parse_field(spec.as_ref())?;
        form.insert(name, field);
    }
    Ok(form)
}

/// Parse one field spec into its name and descriptor
pub fn parse_field(raw: &str) -> Result<(String, FieldDescriptor)> {
    let mut field = FieldDescriptor::default();
    let mut name: Option<String> = None;

    for (i, token) in split_params(raw).iter().enumerate() {
        let (key, value) = token.split_once('=').ok_or_else(|| {
            Error::malformed_field(raw, format!("'{}' is not a key=value pair", token))
        })?;

        match key {
            "type" => field.content_type = value.to_string(),
            "filename" => field.file_alias = value.to_string(),
            _ => {
                if name.is_some() || i != 0 {
                    return Err(Error::malformed_field(
                        raw,
                        format!("unexpected field name '{}'", key),
                    ));
                }
                name = Some(key.to_string());
                match value.strip_prefix('@') {
                    Some(path) if !path.is_empty() => {
                        field.is_file = true;
                        field.value = path.to_string();
                    }
                    _ => field.value = value.to_string(),
                }
            }
        }
    }

    let name = name.ok_or_else(|| Error::malformed_field(raw, "missing field name"))?;

    if field.is_file && field.file_alias.is_empty() {
        field.file_alias = Path::new(&field.value)
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| field.value.clone());
    }

    Ok((name, field))
}

/// Split on `;` outside double quotes; quotes are dropped, empty tokens skipped
fn split_params(raw: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;

    for ch in raw.chars() {
        match ch {
            '"' => in_quotes = !in_quotes,
            ';' if !in_quotes => {
                if !current.is_empty() {
                    tokens.push(std::mem::take(&mut current));
                }
            }
            _ => current.push(ch),
        }
    }
    if !current.is_empty() {
        tokens.push(current);
    }

    tokens
}
