// Copyright © 2024 LabContent. All rights reserved.
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! # Schema Registry
//!
//! One declarative entry per collection: where its files live, which fields
//! are required and with which semantic type, and an optional cross-field
//! check. The integrity checker validates raw files against this table and
//! every loader runs the same required-field pass while decoding, so the
//! rules live in exactly one place.

use crate::core::error::LabContentError;
use crate::frontmatter::{FieldValue, Metadata};
use crate::validators::validate_field;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Every collection the site knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum CollectionKind {
    /// Lab members, current and past.
    People,
    /// Papers, preprints, theses and talks.
    Publications,
    /// Programs, projects and tools.
    Projects,
    /// The news/log feed.
    Log,
    /// Datasets, repositories and software released by the lab.
    OpenLab,
    /// Interactive demos.
    Playground,
    /// Research areas.
    ResearchAreas,
}

impl CollectionKind {
    /// All collections, in the order the checker visits them.
    pub const ALL: [CollectionKind; 7] = [
        CollectionKind::People,
        CollectionKind::Publications,
        CollectionKind::Projects,
        CollectionKind::Log,
        CollectionKind::OpenLab,
        CollectionKind::Playground,
        CollectionKind::ResearchAreas,
    ];

    /// Collection name, which is also its directory under the content root.
    pub fn name(self) -> &'static str {
        match self {
            CollectionKind::People => "people",
            CollectionKind::Publications => "publications",
            CollectionKind::Projects => "projects",
            CollectionKind::Log => "log",
            CollectionKind::OpenLab => "open-lab",
            CollectionKind::Playground => "playground",
            CollectionKind::ResearchAreas => "research-areas",
        }
    }

    /// The registry entry for this collection.
    pub fn schema(self) -> &'static CollectionSchema {
        schema_for(self)
    }
}

impl fmt::Display for CollectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CollectionKind {
    type Err = LabContentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace('_', "-");
        CollectionKind::ALL
            .into_iter()
            .find(|kind| kind.name() == normalized)
            .or(match normalized.as_str() {
                "person" => Some(CollectionKind::People),
                "publication" | "pubs" => Some(CollectionKind::Publications),
                "project" => Some(CollectionKind::Projects),
                "news" => Some(CollectionKind::Log),
                "openlab" => Some(CollectionKind::OpenLab),
                "research" | "areas" => Some(CollectionKind::ResearchAreas),
                _ => None,
            })
            .ok_or_else(|| LabContentError::UnknownCollection(s.to_string()))
    }
}

/// Semantic type of a required field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FieldKind {
    /// A non-empty string.
    #[serde(rename = "string")]
    String,
    /// A number, or a string holding one.
    #[serde(rename = "number")]
    Number,
    /// A non-empty list of non-empty strings.
    #[serde(rename = "stringArray")]
    StringArray,
}

impl FieldKind {
    /// Name used in violation messages.
    pub fn name(self) -> &'static str {
        match self {
            FieldKind::String => "string",
            FieldKind::Number => "number",
            FieldKind::StringArray => "stringArray",
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Cross-field rule: receives the metadata and the file's path relative to the
/// content root, returns human-readable violation messages.
pub type CustomCheck = fn(&Metadata, &str) -> Vec<String>;

/// A required field that is absent or has the wrong shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldIssue {
    /// Front-matter key.
    pub field: &'static str,
    /// Declared type.
    pub expected: FieldKind,
    /// Shape that was actually found, `None` when the key is absent.
    pub found: Option<&'static str>,
}

impl fmt::Display for FieldIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.found {
            Some(found) => write!(
                f,
                "\"{}\" should be {} but is an invalid {}",
                self.field, self.expected, found
            ),
            None => write!(
                f,
                "\"{}\" ({}) is missing",
                self.field, self.expected
            ),
        }
    }
}

/// Registry entry for one collection.
#[derive(Debug)]
pub struct CollectionSchema {
    /// Which collection this entry describes.
    pub kind: CollectionKind,
    /// Required fields and their semantic type, `slug` first.
    pub required: &'static [(&'static str, FieldKind)],
    /// Optional cross-field rule.
    pub custom_check: Option<CustomCheck>,
}

impl CollectionSchema {
    /// Directory name under the content root.
    pub fn directory(&self) -> &'static str {
        self.kind.name()
    }

    /// Required fields other than `slug`, which is checked on its own.
    pub fn required_fields(
        &self,
    ) -> impl Iterator<Item = (&'static str, FieldKind)> + '_ {
        self.required
            .iter()
            .copied()
            .filter(|(field, _)| *field != "slug")
    }

    /// Runs every required-field validator and returns the failures.
    pub fn field_issues(&self, metadata: &Metadata) -> Vec<FieldIssue> {
        self.required
            .iter()
            .filter_map(|&(field, expected)| {
                let value = metadata.get(field);
                if validate_field(expected, value) {
                    None
                } else {
                    Some(FieldIssue {
                        field,
                        expected,
                        found: value
                            .filter(|v| **v != FieldValue::Null)
                            .map(FieldValue::shape),
                    })
                }
            })
            .collect()
    }

    /// Runs the cross-field rule, if any.
    pub fn run_custom_check(
        &self,
        metadata: &Metadata,
        relative_path: &str,
    ) -> Vec<String> {
        self.custom_check
            .map(|check| check(metadata, relative_path))
            .unwrap_or_default()
    }
}

/// The registry, in checker order.
pub static SCHEMAS: [CollectionSchema; 7] = [
    CollectionSchema {
        kind: CollectionKind::People,
        required: &[
            ("slug", FieldKind::String),
            ("name", FieldKind::String),
            ("role", FieldKind::String),
            ("status", FieldKind::String),
            ("order", FieldKind::Number),
            ("researchAreas", FieldKind::StringArray),
            ("tags", FieldKind::StringArray),
        ],
        custom_check: None,
    },
    CollectionSchema {
        kind: CollectionKind::Publications,
        required: &[
            ("slug", FieldKind::String),
            ("title", FieldKind::String),
            ("authors", FieldKind::StringArray),
            ("year", FieldKind::Number),
        ],
        custom_check: None,
    },
    CollectionSchema {
        kind: CollectionKind::Projects,
        required: &[
            ("slug", FieldKind::String),
            ("title", FieldKind::String),
            ("kind", FieldKind::String),
            ("summary", FieldKind::String),
            ("status", FieldKind::String),
            ("relatedAreas", FieldKind::StringArray),
        ],
        custom_check: None,
    },
    CollectionSchema {
        kind: CollectionKind::Log,
        required: &[
            ("slug", FieldKind::String),
            ("title", FieldKind::String),
            ("date", FieldKind::String),
            ("kind", FieldKind::String),
        ],
        custom_check: None,
    },
    CollectionSchema {
        kind: CollectionKind::OpenLab,
        required: &[
            ("slug", FieldKind::String),
            ("title", FieldKind::String),
            ("kind", FieldKind::String),
        ],
        custom_check: Some(updated_or_date),
    },
    CollectionSchema {
        kind: CollectionKind::Playground,
        required: &[
            ("slug", FieldKind::String),
            ("title", FieldKind::String),
            ("kind", FieldKind::String),
        ],
        custom_check: None,
    },
    CollectionSchema {
        kind: CollectionKind::ResearchAreas,
        required: &[
            ("slug", FieldKind::String),
            ("title", FieldKind::String),
            ("order", FieldKind::Number),
            ("tags", FieldKind::StringArray),
        ],
        custom_check: None,
    },
];

/// Looks up the registry entry for `kind`.
pub fn schema_for(kind: CollectionKind) -> &'static CollectionSchema {
    // SCHEMAS is declared in CollectionKind::ALL order.
    &SCHEMAS[kind as usize]
}

/// Open-lab resources are dated by `updated`, falling back to `date`.
fn updated_or_date(metadata: &Metadata, _relative_path: &str) -> Vec<String> {
    if is_set(metadata.get("updated")) || is_set(metadata.get("date")) {
        Vec::new()
    } else {
        vec!["expected \"updated\" or \"date\" in frontmatter".to_string()]
    }
}

fn is_set(value: Option<&FieldValue>) -> bool {
    match value {
        None | Some(FieldValue::Null) => false,
        Some(FieldValue::Text(s)) => !s.trim().is_empty(),
        Some(FieldValue::Bool(b)) => *b,
        Some(FieldValue::Number(n)) => *n != 0.0,
        Some(FieldValue::List(_)) | Some(FieldValue::Map(_)) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontmatter::Document;

    #[test]
    fn test_registry_order_matches_kinds() {
        for kind in CollectionKind::ALL {
            assert_eq!(schema_for(kind).kind, kind);
            assert_eq!(schema_for(kind).required[0].0, "slug");
        }
    }

    #[test]
    fn test_collection_kind_from_str() {
        assert_eq!(
            "open_lab".parse::<CollectionKind>().ok(),
            Some(CollectionKind::OpenLab)
        );
        assert_eq!(
            "Research-Areas".parse::<CollectionKind>().ok(),
            Some(CollectionKind::ResearchAreas)
        );
        assert_eq!(
            "news".parse::<CollectionKind>().ok(),
            Some(CollectionKind::Log)
        );
        assert!("blog".parse::<CollectionKind>().is_err());
    }

    #[test]
    fn test_field_issues_reports_each_failure() {
        let doc = Document::parse(
            "---\nslug: foo\ntitle: \"\"\nauthors: []\n---\n",
        );
        let issues = schema_for(CollectionKind::Publications)
            .field_issues(&doc.metadata);
        let fields: Vec<_> = issues.iter().map(|i| i.field).collect();
        assert_eq!(fields, vec!["title", "authors", "year"]);
        assert_eq!(issues[2].found, None);
        assert_eq!(issues[0].found, Some("string"));
    }

    #[test]
    fn test_required_fields_skip_slug() {
        let fields: Vec<_> = schema_for(CollectionKind::Log)
            .required_fields()
            .map(|(f, _)| f)
            .collect();
        assert_eq!(fields, vec!["title", "date", "kind"]);
    }

    #[test]
    fn test_open_lab_custom_check() {
        let schema = schema_for(CollectionKind::OpenLab);
        let neither = Document::parse("---\nslug: a\n---\n");
        let dated = Document::parse("---\nslug: a\ndate: 2024-01-01\n---\n");
        let updated = Document::parse("---\nslug: a\nupdated: 2024-02-01\n---\n");
        assert_eq!(
            schema.run_custom_check(&neither.metadata, "open-lab/a.mdx").len(),
            1
        );
        assert!(schema
            .run_custom_check(&dated.metadata, "open-lab/a.mdx")
            .is_empty());
        assert!(schema
            .run_custom_check(&updated.metadata, "open-lab/a.mdx")
            .is_empty());
    }

    #[test]
    fn test_no_custom_check_is_empty() {
        let doc = Document::parse("---\nslug: a\n---\n");
        assert!(schema_for(CollectionKind::People)
            .run_custom_check(&doc.metadata, "people/a.mdx")
            .is_empty());
    }
}
