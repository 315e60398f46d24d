// Copyright © 2024 LabContent. All rights reserved.
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! # Collections
//!
//! One module per content collection. Each defines the typed record, the
//! [`Collection`](crate::core::traits::Collection) implementation that
//! decodes and orders it, and the presentation helpers built on the loaded
//! list.

use std::cmp::Ordering;

use crate::body::first_paragraph;
use crate::frontmatter::Metadata;

pub mod log_entries;
pub mod open_lab;
pub mod people;
pub mod playground;
pub mod projects;
pub mod publications;
pub mod research_areas;
pub mod tags;

pub use self::log_entries::{LogEntries, LogEntry, LogKind};
pub use self::open_lab::{OpenLab, OpenLabKind, OpenLabResource};
pub use self::people::{People, Person, PersonStatus, Role};
pub use self::playground::{
    AudioTrack, Playground, PlaygroundItem, PlaygroundKind, PlaygroundMedia,
};
pub use self::projects::{Project, ProjectKind, ProjectStatus, Projects};
pub use self::publications::{
    Citation, Publication, PublicationFilter, PublicationKind, Publications,
};
pub use self::research_areas::{ResearchArea, ResearchAreas};

/// Orders text case-insensitively, falling back to byte order so that
/// strings differing only in case still compare deterministically.
pub(crate) fn compare_text(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

/// Lowercased, trimmed token of an enumerated field.
pub(crate) fn enum_token(metadata: &Metadata, key: &str) -> Option<String> {
    metadata.text(key).map(|s| s.trim().to_lowercase())
}

/// The `summary` field when set, otherwise the first paragraph of the body.
pub(crate) fn summary_or_body(metadata: &Metadata, body: &str) -> String {
    metadata
        .string("summary")
        .unwrap_or_else(|| first_paragraph(body))
}
