// Copyright © 2024 LabContent. All rights reserved.
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! # Core Traits Module
//!
//! The two traits every collection is built from:
//!
//! - [`Record`]: an immutable value decoded from one content file
//! - [`Collection`]: how a directory of files becomes an ordered list of
//!   records (which schema, how to decode one document, how to order them)
//!
//! [`crate::loader::ContentLoader`] drives any `Collection` generically, so
//! adding a collection means adding one type that implements it.

use std::cmp::Ordering;
use std::fmt;

use serde::Serialize;

use crate::collections::tags::TagVocabularies;
use crate::frontmatter::Document;
use crate::schema::{CollectionKind, FieldIssue};

/// An immutable record decoded from one content file.
pub trait Record:
    Clone + fmt::Debug + Serialize + Send + Sync + 'static
{
    /// Unique identifier within the collection.
    fn slug(&self) -> &str;

    /// Display title (a person's name for people).
    fn title(&self) -> &str;

    /// Free-text body of the file.
    fn body(&self) -> &str;
}

/// Per-file inputs to [`Collection::decode`] besides the document itself.
#[derive(Debug, Clone, Copy)]
pub struct DecodeContext<'a> {
    /// File name without extension; the slug when front-matter has none.
    pub file_stem: &'a str,
    /// Allowed tag vocabularies.
    pub vocabularies: &'a TagVocabularies,
}

impl DecodeContext<'_> {
    /// The declared slug, or the file stem when it is absent.
    pub fn slug(&self, document: &Document) -> String {
        document
            .metadata
            .string("slug")
            .unwrap_or_else(|| self.file_stem.to_string())
    }
}

/// A decoded record together with the required-field problems found in its
/// source document.
#[derive(Debug, Clone)]
pub struct Decoded<R> {
    /// The record, with defaults applied wherever a field was unusable.
    pub record: R,
    /// Required fields that were missing or had the wrong shape.
    pub issues: Vec<FieldIssue>,
}

impl<R> Decoded<R> {
    /// Whether every required field was present and well-formed.
    pub fn is_valid(&self) -> bool {
        self.issues.is_empty()
    }

    /// The record when valid, the issues otherwise.
    pub fn into_result(self) -> Result<R, Vec<FieldIssue>> {
        if self.issues.is_empty() {
            Ok(self.record)
        } else {
            Err(self.issues)
        }
    }
}

/// A directory-scoped set of content files sharing one record shape.
pub trait Collection: fmt::Debug {
    /// The record type produced for each file.
    type Record: Record;

    /// Which registry entry (and directory) this collection uses.
    const KIND: CollectionKind;

    /// Builds a record from a parsed document, applying defaults, enum
    /// fallbacks and tag filtering. Never fails.
    fn decode(document: &Document, ctx: &DecodeContext<'_>) -> Self::Record;

    /// Total order used to sort the collection.
    fn compare(a: &Self::Record, b: &Self::Record) -> Ordering;

    /// Decodes and reports the required-field problems of the document
    /// against the collection's schema.
    fn decode_checked(
        document: &Document,
        ctx: &DecodeContext<'_>,
    ) -> Decoded<Self::Record> {
        Decoded {
            record: Self::decode(document, ctx),
            issues: Self::KIND.schema().field_issues(&document.metadata),
        }
    }
}
