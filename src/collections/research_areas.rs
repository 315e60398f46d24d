// Copyright © 2024 LabContent. All rights reserved.
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Research areas, in their declared order.

use std::cmp::Ordering;

use serde::Serialize;

use crate::core::traits::{Collection, DecodeContext, Record};
use crate::frontmatter::Document;
use crate::schema::CollectionKind;

/// A research area.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResearchArea {
    /// Identifier, equal to the file stem.
    pub slug: String,
    /// Full title.
    pub title: String,
    /// Compact title for navigation; the title when missing.
    pub short_title: String,
    /// Position in listings.
    pub order: f64,
    /// Tags from the research vocabulary.
    pub tags: Vec<String>,
    /// Teaser image.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Teaser video.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video: Option<String>,
    /// Body of the file.
    pub body: String,
}

impl Record for ResearchArea {
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

/// The `research-areas` collection.
#[derive(Debug, Clone, Copy)]
pub struct ResearchAreas;

impl Collection for ResearchAreas {
    type Record = ResearchArea;
    const KIND: CollectionKind = CollectionKind::ResearchAreas;

    fn decode(document: &Document, ctx: &DecodeContext<'_>) -> ResearchArea {
        let meta = &document.metadata;
        let title = meta.string("title").unwrap_or_default();
        ResearchArea {
            slug: ctx.slug(document),
            short_title: meta
                .string("shortTitle")
                .unwrap_or_else(|| title.clone()),
            title,
            order: meta.number("order").unwrap_or(0.0),
            tags: ctx.vocabularies.research.filter(meta.string_list("tags")),
            image: meta.string("image"),
            video: meta.string("video"),
            body: document.body.clone(),
        }
    }

    fn compare(a: &ResearchArea, b: &ResearchArea) -> Ordering {
        a.order.total_cmp(&b.order).then_with(|| a.slug.cmp(&b.slug))
    }
}
