// Copyright © 2024 LabContent. All rights reserved.
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! # Publications
//!
//! Papers, preprints, theses and talks, newest first. Besides the record
//! this module carries the helpers behind the publication index: grouping
//! by year, the year and tag facets, and a text/facet filter.

use std::cmp::Ordering;
use std::collections::BTreeSet;

use serde::Serialize;

use super::{compare_text, enum_token};
use crate::core::traits::{Collection, DecodeContext, Record};
use crate::frontmatter::{Document, FieldValue, Metadata};
use crate::schema::CollectionKind;

/// Type of publication.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PublicationKind {
    /// Peer-reviewed paper.
    #[default]
    Paper,
    /// Preprint.
    Preprint,
    /// Thesis or dissertation.
    Thesis,
    /// Talk or keynote.
    Talk,
}

impl PublicationKind {
    /// Parses a lowercase token.
    pub fn parse(token: &str) -> Option<Self> {
        match token {
            "paper" => Some(PublicationKind::Paper),
            "preprint" => Some(PublicationKind::Preprint),
            "thesis" => Some(PublicationKind::Thesis),
            "talk" => Some(PublicationKind::Talk),
            _ => None,
        }
    }
}

/// A formatted citation in one style, e.g. APA.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Citation {
    /// Style name.
    pub style: String,
    /// Formatted text.
    pub text: String,
}

/// A publication.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Publication {
    /// Identifier, equal to the file stem.
    pub slug: String,
    /// Title.
    pub title: String,
    /// Authors in citation order.
    pub authors: Vec<String>,
    /// Year of publication; 0 when missing.
    pub year: i32,
    /// Journal, conference or event.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub venue: Option<String>,
    /// Publication type.
    pub kind: PublicationKind,
    /// Publisher or project page.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_url: Option<String>,
    /// DOI.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doi: Option<String>,
    /// Tags from the publication vocabulary.
    pub tags: Vec<String>,
    /// Highlighted on the landing page.
    pub featured: bool,
    /// Small preview image.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    /// Teaser image.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Teaser video.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video: Option<String>,
    /// Abstract.
    #[serde(rename = "abstract", skip_serializing_if = "Option::is_none")]
    pub abstract_text: Option<String>,
    /// Pre-formatted citations.
    pub cite: Vec<Citation>,
    /// BibTeX entry.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bibtex: Option<String>,
    /// Body of the file.
    pub body: String,
}

impl Publication {
    /// Whether any of the searchable fields contains `needle`, which must
    /// already be lowercase.
    fn mentions(&self, needle: &str) -> bool {
        let hit = |s: &str| s.to_lowercase().contains(needle);
        hit(&self.title)
            || self.venue.as_deref().is_some_and(hit)
            || self.authors.iter().any(|a| hit(a))
            || self.tags.iter().any(|t| hit(t))
    }
}

impl Record for Publication {
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

/// The `publications` collection.
#[derive(Debug, Clone, Copy)]
pub struct Publications;

impl Collection for Publications {
    type Record = Publication;
    const KIND: CollectionKind = CollectionKind::Publications;

    fn decode(document: &Document, ctx: &DecodeContext<'_>) -> Publication {
        let meta = &document.metadata;
        Publication {
            slug: ctx.slug(document),
            title: meta.string("title").unwrap_or_default(),
            authors: meta.string_list("authors"),
            year: meta
                .integer("year")
                .and_then(|y| i32::try_from(y).ok())
                .unwrap_or(0),
            venue: meta.string("venue"),
            kind: enum_token(meta, "kind")
                .and_then(|t| PublicationKind::parse(&t))
                .unwrap_or_default(),
            external_url: meta.string("externalUrl"),
            doi: meta.string("doi"),
            tags: ctx.vocabularies.publications.filter(meta.string_list("tags")),
            featured: meta.boolean("featured").unwrap_or(false),
            thumbnail: meta.string("thumbnail"),
            image: meta.string("image"),
            video: meta.string("video"),
            abstract_text: meta.string("abstract"),
            cite: citations(meta),
            bibtex: meta.string("bibtex"),
            body: document.body.clone(),
        }
    }

    fn compare(a: &Publication, b: &Publication) -> Ordering {
        b.year
            .cmp(&a.year)
            .then_with(|| compare_text(&a.title, &b.title))
            .then_with(|| a.slug.cmp(&b.slug))
    }
}

/// Entries of `cite` that carry both a style and a text.
fn citations(meta: &Metadata) -> Vec<Citation> {
    let Some(items) = meta.get("cite").and_then(FieldValue::as_list) else {
        return Vec::new();
    };
    items
        .iter()
        .filter_map(FieldValue::as_map)
        .filter_map(|entry| {
            let field = |key: &str| {
                entry
                    .get(key)
                    .and_then(FieldValue::as_text)
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
            };
            Some(Citation {
                style: field("style")?,
                text: field("text")?,
            })
        })
        .collect()
}

/// Facets for narrowing the publication list. Unset facets match anything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PublicationFilter {
    /// Case-insensitive substring of title, venue, an author or a tag.
    pub query: Option<String>,
    /// Exact year.
    pub year: Option<i32>,
    /// Exact kind.
    pub kind: Option<PublicationKind>,
    /// Exact tag.
    pub tag: Option<String>,
}

impl PublicationFilter {
    /// Whether `publication` passes every set facet.
    pub fn matches(&self, publication: &Publication) -> bool {
        if self.year.is_some_and(|y| y != publication.year) {
            return false;
        }
        if self.kind.is_some_and(|k| k != publication.kind) {
            return false;
        }
        if let Some(tag) = &self.tag {
            if !publication.tags.contains(tag) {
                return false;
            }
        }
        match self.query.as_deref().map(str::trim) {
            Some(query) if !query.is_empty() => {
                publication.mentions(&query.to_lowercase())
            }
            _ => true,
        }
    }

    /// The matching publications, order preserved.
    pub fn apply<'a>(
        &self,
        publications: &'a [Publication],
    ) -> Vec<&'a Publication> {
        publications.iter().filter(|p| self.matches(p)).collect()
    }
}

/// Groups publications by year, newest year first. Within a year the input
/// order is kept.
pub fn group_by_year(
    publications: &[Publication],
) -> Vec<(i32, Vec<&Publication>)> {
    let mut groups: Vec<(i32, Vec<&Publication>)> = Vec::new();
    for publication in publications {
        match groups.iter_mut().find(|(year, _)| *year == publication.year) {
            Some((_, members)) => members.push(publication),
            None => groups.push((publication.year, vec![publication])),
        }
    }
    groups.sort_by(|a, b| b.0.cmp(&a.0));
    groups
}

/// Distinct years, newest first.
pub fn available_years(publications: &[Publication]) -> Vec<i32> {
    let years: BTreeSet<i32> = publications.iter().map(|p| p.year).collect();
    years.into_iter().rev().collect()
}

/// Distinct tags in use, sorted.
pub fn available_tags(publications: &[Publication]) -> Vec<String> {
    let tags: BTreeSet<&str> = publications
        .iter()
        .flat_map(|p| p.tags.iter().map(String::as_str))
        .collect();
    tags.into_iter().map(str::to_string).collect()
}
