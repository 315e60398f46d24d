// Copyright © 2024 LabContent. All rights reserved.
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! # Open Lab
//!
//! Datasets, repositories and software released by the lab, most recently
//! updated first.

use std::cmp::Ordering;

use serde::Serialize;

use super::log_entries::UNDATED;
use super::{compare_text, enum_token, summary_or_body};
use crate::core::traits::{Collection, DecodeContext, Record};
use crate::frontmatter::Document;
use crate::schema::CollectionKind;

/// Type of released resource.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize,
)]
#[serde(rename_all = "lowercase")]
pub enum OpenLabKind {
    /// Dataset; also the fallback.
    #[default]
    Dataset,
    /// Source repository.
    Repository,
    /// Packaged software.
    Software,
}

impl OpenLabKind {
    /// All kinds, in display order.
    pub const ALL: [OpenLabKind; 3] = [
        OpenLabKind::Dataset,
        OpenLabKind::Repository,
        OpenLabKind::Software,
    ];

    fn parse(token: &str) -> Option<Self> {
        match token {
            "dataset" => Some(OpenLabKind::Dataset),
            "repository" => Some(OpenLabKind::Repository),
            "software" => Some(OpenLabKind::Software),
            _ => None,
        }
    }
}

/// A released resource.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenLabResource {
    /// Identifier, equal to the file stem.
    pub slug: String,
    /// Title.
    pub title: String,
    /// Type of resource.
    pub kind: OpenLabKind,
    /// Front-matter summary or the first paragraph of the body.
    pub summary: String,
    /// Research area it belongs to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub area: Option<String>,
    /// Download or repository link.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    /// Free tags.
    pub tags: Vec<String>,
    /// Last update: `updated`, else `date`, else the epoch.
    pub updated: String,
    /// Body of the file.
    pub body: String,
}

impl Record for OpenLabResource {
    fn slug(&self) -> &str {
        &self.slug
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn body(&self) -> &str {
        &self.body
    }
}

/// The `open-lab` collection.
#[derive(Debug, Clone, Copy)]
pub struct OpenLab;

impl Collection for OpenLab {
    type Record = OpenLabResource;
    const KIND: CollectionKind = CollectionKind::OpenLab;

    fn decode(document: &Document, ctx: &DecodeContext<'_>) -> OpenLabResource {
        let meta = &document.metadata;
        OpenLabResource {
            slug: ctx.slug(document),
            title: meta.string("title").unwrap_or_default(),
            kind: enum_token(meta, "kind")
                .and_then(|t| OpenLabKind::parse(&t))
                .unwrap_or_default(),
            summary: summary_or_body(meta, &document.body),
            area: meta.string("area"),
            link: meta.string("link"),
            tags: meta.string_list("tags"),
            updated: meta
                .string("updated")
                .or_else(|| meta.string("date"))
                .unwrap_or_else(|| UNDATED.to_string()),
            body: document.body.clone(),
        }
    }

    fn compare(a: &OpenLabResource, b: &OpenLabResource) -> Ordering {
        b.updated
            .cmp(&a.updated)
            .then_with(|| compare_text(&a.title, &b.title))
            .then_with(|| a.slug.cmp(&b.slug))
    }
}

/// Number of resources of each kind, every kind listed even when zero.
pub fn count_by_kind(resources: &[OpenLabResource]) -> Vec<(OpenLabKind, usize)> {
    OpenLabKind::ALL
        .into_iter()
        .map(|kind| (kind, resources.iter().filter(|r| r.kind == kind).count()))
        .collect()
}
