// Copyright © 2024 LabContent. All rights reserved.
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! # Front-matter Parsing
//!
//! Splits a content file into a YAML metadata block and a free-text body.
//!
//! ```text
//! ---
//! slug: "jdoe"
//! name: "Jane Doe"
//! tags:
//!   - visualization
//! ---
//!
//! Jane works on visual analytics.
//! ```
//!
//! Parsing is total: a file without a usable block still produces a
//! [`Document`], with [`FrontmatterStatus`] telling the caller what went wrong.
//! Loaders treat that as "every field defaulted", the integrity checker turns it
//! into a violation.
//!
//! ## Example
//!
//! ```
//! use labcontent::frontmatter::Document;
//!
//! let doc = Document::parse("---\ntitle: Hello\nyear: 2020\n---\n\nBody text.\n");
//! assert!(doc.has_frontmatter());
//! assert_eq!(doc.metadata.text("title"), Some("Hello"));
//! assert_eq!(doc.metadata.integer("year"), Some(2020));
//! assert_eq!(doc.body, "Body text.");
//! ```

use serde::Serialize;
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;

/// Delimiter line that opens and closes a metadata block.
const DELIMITER: &str = "---";

/// A loosely typed front-matter value.
///
/// YAML scalars, sequences and mappings are mapped onto this sum type once, at
/// parse time, so that every later decode step matches on a closed set of
/// shapes.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// An explicit `null` / `~` or an unrepresentable scalar.
    Null,
    /// A boolean scalar.
    Bool(bool),
    /// A numeric scalar.
    Number(f64),
    /// A string scalar (including unquoted dates such as `2024-01-01`).
    Text(String),
    /// A sequence.
    List(Vec<FieldValue>),
    /// A nested mapping.
    Map(BTreeMap<String, FieldValue>),
}

impl FieldValue {
    /// Returns the string content when the value is textual.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Returns the numeric value of a finite number or of a string that trims
    /// to a finite number.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            FieldValue::Number(n) if n.is_finite() => Some(*n),
            FieldValue::Text(text) => {
                let trimmed = text.trim();
                if trimmed.is_empty() {
                    return None;
                }
                trimmed.parse::<f64>().ok().filter(|n| n.is_finite())
            }
            _ => None,
        }
    }

    /// Returns the boolean value, accepting `"true"`/`"false"` strings.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FieldValue::Bool(b) => Some(*b),
            FieldValue::Text(text) => match text.trim() {
                "true" => Some(true),
                "false" => Some(false),
                _ => None,
            },
            _ => None,
        }
    }

    /// Returns the elements when the value is a sequence.
    pub fn as_list(&self) -> Option<&[FieldValue]> {
        match self {
            FieldValue::List(items) => Some(items),
            _ => None,
        }
    }

    /// Returns the entries when the value is a mapping.
    pub fn as_map(&self) -> Option<&BTreeMap<String, FieldValue>> {
        match self {
            FieldValue::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Short name of the value's shape, used in diagnostics.
    pub fn shape(&self) -> &'static str {
        match self {
            FieldValue::Null => "null",
            FieldValue::Bool(_) => "boolean",
            FieldValue::Number(_) => "number",
            FieldValue::Text(_) => "string",
            FieldValue::List(_) => "list",
            FieldValue::Map(_) => "mapping",
        }
    }
}

impl From<JsonValue> for FieldValue {
    fn from(value: JsonValue) -> Self {
        match value {
            JsonValue::Null => FieldValue::Null,
            JsonValue::Bool(b) => FieldValue::Bool(b),
            JsonValue::Number(n) => {
                n.as_f64().map_or(FieldValue::Null, FieldValue::Number)
            }
            JsonValue::String(s) => FieldValue::Text(s),
            JsonValue::Array(items) => FieldValue::List(
                items.into_iter().map(FieldValue::from).collect(),
            ),
            JsonValue::Object(map) => FieldValue::Map(
                map.into_iter()
                    .map(|(k, v)| (k, FieldValue::from(v)))
                    .collect(),
            ),
        }
    }
}

/// The parsed metadata block of one content file.
///
/// Accessors are lenient: a field of the wrong shape reads as absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Metadata {
    fields: BTreeMap<String, FieldValue>,
}

impl Metadata {
    /// Creates an empty metadata map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces a field.
    pub fn insert<K: Into<String>>(&mut self, key: K, value: FieldValue) {
        let _ = self.fields.insert(key.into(), value);
    }

    /// Raw access to a field.
    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.fields.get(key)
    }

    /// Whether the field exists with a non-null value.
    pub fn contains(&self, key: &str) -> bool {
        matches!(self.fields.get(key), Some(v) if *v != FieldValue::Null)
    }

    /// Whether the block holds no fields at all.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Number of fields in the block.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Field names in sorted order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// A textual field with non-whitespace content.
    pub fn text(&self, key: &str) -> Option<&str> {
        self.get(key)
            .and_then(FieldValue::as_text)
            .filter(|s| !s.trim().is_empty())
    }

    /// Like [`Metadata::text`] but owned.
    pub fn string(&self, key: &str) -> Option<String> {
        self.text(key).map(str::to_string)
    }

    /// A numeric-like field.
    pub fn number(&self, key: &str) -> Option<f64> {
        self.get(key).and_then(FieldValue::as_number)
    }

    /// A numeric-like field truncated toward zero.
    pub fn integer(&self, key: &str) -> Option<i64> {
        self.number(key).map(|n| n.trunc() as i64)
    }

    /// A boolean field.
    pub fn boolean(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(FieldValue::as_bool)
    }

    /// The non-blank string elements of a list field; empty when the field is
    /// missing or not a list.
    pub fn string_list(&self, key: &str) -> Vec<String> {
        self.get(key)
            .and_then(FieldValue::as_list)
            .map(|items| {
                items
                    .iter()
                    .filter_map(FieldValue::as_text)
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }
}

impl FromIterator<(String, FieldValue)> for Metadata {
    fn from_iter<I: IntoIterator<Item = (String, FieldValue)>>(
        iter: I,
    ) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}

/// Outcome of looking for a metadata block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrontmatterStatus {
    /// A non-empty YAML mapping was found.
    Present,
    /// No block, or a block with no fields.
    Missing,
    /// A block was found but is not a YAML mapping.
    Malformed(String),
}

/// A content file split into metadata and body.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    /// Parsed metadata; empty unless `status` is `Present`.
    pub metadata: Metadata,
    /// Body text with surrounding whitespace trimmed.
    pub body: String,
    /// Whether a usable metadata block was found.
    pub status: FrontmatterStatus,
}

impl Document {
    /// Parses the raw text of one content file. Never fails.
    pub fn parse(raw: &str) -> Self {
        let Some((block, rest)) = split_block(raw) else {
            return Self::without_metadata(
                raw.trim_start_matches('\u{feff}'),
                FrontmatterStatus::Missing,
            );
        };

        if block.trim().is_empty() {
            return Self::without_metadata(rest, FrontmatterStatus::Missing);
        }

        match serde_yml::from_str::<JsonValue>(block) {
            Ok(JsonValue::Object(map)) if map.is_empty() => {
                Self::without_metadata(rest, FrontmatterStatus::Missing)
            }
            Ok(JsonValue::Object(map)) => Self {
                metadata: map
                    .into_iter()
                    .map(|(k, v)| (k, FieldValue::from(v)))
                    .collect(),
                body: rest.trim().to_string(),
                status: FrontmatterStatus::Present,
            },
            Ok(JsonValue::Null) => {
                Self::without_metadata(rest, FrontmatterStatus::Missing)
            }
            Ok(other) => Self::without_metadata(
                rest,
                FrontmatterStatus::Malformed(format!(
                    "expected a mapping, found {}",
                    FieldValue::from(other).shape()
                )),
            ),
            Err(e) => Self::without_metadata(
                rest,
                FrontmatterStatus::Malformed(e.to_string()),
            ),
        }
    }

    /// A document with no metadata, e.g. for a file that could not be read.
    pub fn empty() -> Self {
        Self::without_metadata("", FrontmatterStatus::Missing)
    }

    /// Whether a non-empty metadata block was parsed.
    pub fn has_frontmatter(&self) -> bool {
        self.status == FrontmatterStatus::Present
    }

    fn without_metadata(body: &str, status: FrontmatterStatus) -> Self {
        Self {
            metadata: Metadata::new(),
            body: body.trim().to_string(),
            status,
        }
    }
}

/// Splits `raw` into the text between the delimiter lines and the text after
/// the closing delimiter.
fn split_block(raw: &str) -> Option<(&str, &str)> {
    let text = raw.strip_prefix('\u{feff}').unwrap_or(raw);
    let after_open = text.strip_prefix(DELIMITER)?;
    let rest = after_open
        .strip_prefix("\r\n")
        .or_else(|| after_open.strip_prefix('\n'))?;

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end_matches(|c| c == '\r' || c == '\n') == DELIMITER {
            return Some((&rest[..offset], &rest[offset + line.len()..]));
        }
        offset += line.len();
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_scalars_lists_and_body() {
        let input = r#"---
slug: "foo"
title: "X"
authors:
  - "A"
  - "B"
year: 2020
featured: true
date: 2024-01-01
---

First paragraph.

Second paragraph.
"#;
        let doc = Document::parse(input);
        assert_eq!(doc.status, FrontmatterStatus::Present);
        assert_eq!(doc.metadata.text("slug"), Some("foo"));
        assert_eq!(doc.metadata.string_list("authors"), vec!["A", "B"]);
        assert_eq!(doc.metadata.integer("year"), Some(2020));
        assert_eq!(doc.metadata.boolean("featured"), Some(true));
        assert_eq!(doc.metadata.text("date"), Some("2024-01-01"));
        assert_eq!(doc.body, "First paragraph.\n\nSecond paragraph.");
    }

    #[test]
    fn test_missing_block() {
        let doc = Document::parse("Just a body.\n");
        assert_eq!(doc.status, FrontmatterStatus::Missing);
        assert!(doc.metadata.is_empty());
        assert_eq!(doc.body, "Just a body.");
    }

    #[test]
    fn test_empty_block_is_missing() {
        let doc = Document::parse("---\n---\nBody");
        assert_eq!(doc.status, FrontmatterStatus::Missing);
        assert_eq!(doc.body, "Body");
    }

    #[test]
    fn test_unclosed_block_is_missing() {
        let doc = Document::parse("---\ntitle: x\nno closing line");
        assert_eq!(doc.status, FrontmatterStatus::Missing);
        assert!(!doc.has_frontmatter());
    }

    #[test]
    fn test_non_mapping_block_is_malformed() {
        let doc = Document::parse("---\n- a\n- b\n---\nBody");
        assert!(matches!(doc.status, FrontmatterStatus::Malformed(_)));
        assert!(doc.metadata.is_empty());
        assert_eq!(doc.body, "Body");
    }

    #[test]
    fn test_crlf_and_bom() {
        let doc =
            Document::parse("\u{feff}---\r\ntitle: Windows\r\n---\r\nBody\r\n");
        assert!(doc.has_frontmatter());
        assert_eq!(doc.metadata.text("title"), Some("Windows"));
        assert_eq!(doc.body, "Body");
    }

    #[test]
    fn test_nested_mapping_in_list() {
        let input = "---\naudio:\n  - label: Rain\n    src: /a/rain.mp3\n---\n";
        let doc = Document::parse(input);
        let tracks = doc.metadata.get("audio").and_then(FieldValue::as_list);
        let first = tracks
            .and_then(|t| t.first())
            .and_then(FieldValue::as_map)
            .and_then(|m| m.get("label"))
            .and_then(FieldValue::as_text);
        assert_eq!(first, Some("Rain"));
    }

    #[test]
    fn test_blank_text_reads_as_absent() {
        let doc = Document::parse("---\nimage: \"  \"\ntitle: T\n---\n");
        assert_eq!(doc.metadata.text("image"), None);
        assert!(doc.metadata.contains("image"));
    }

    #[test]
    fn test_string_list_skips_non_strings() {
        let doc = Document::parse("---\ntags: [a, 3, \"\", b]\n---\n");
        assert_eq!(doc.metadata.string_list("tags"), vec!["a", "b"]);
    }

    #[test]
    fn test_quoted_number() {
        let doc = Document::parse("---\norder: \"7\"\n---\n");
        assert_eq!(doc.metadata.integer("order"), Some(7));
    }
}
