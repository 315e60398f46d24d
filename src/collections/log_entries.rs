// Copyright © 2024 LabContent. All rights reserved.
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The news/log feed, newest first.

use std::cmp::Ordering;

use serde::Serialize;

use super::{compare_text, enum_token, summary_or_body};
use crate::core::traits::{Collection, DecodeContext, Record};
use crate::frontmatter::Document;
use crate::schema::CollectionKind;

/// Date used when an entry has none; sorts last.
pub const UNDATED: &str = "1970-01-01";

/// Category of a log entry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogKind {
    /// Workshop, seminar or similar.
    Event,
    /// General news; also the fallback.
    #[default]
    News,
    /// Software or dataset release.
    Release,
    /// Talk given by a member.
    Talk,
    /// Lab visit.
    Visit,
}

impl LogKind {
    fn parse(token: &str) -> Option<Self> {
        match token {
            "event" => Some(LogKind::Event),
            "news" => Some(LogKind::News),
            "release" => Some(LogKind::Release),
            "talk" => Some(LogKind::Talk),
            "visit" => Some(LogKind::Visit),
            _ => None,
        }
    }
}

/// One entry of the feed.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    /// Identifier, equal to the file stem.
    pub slug: String,
    /// Headline.
    pub title: String,
    /// ISO-like date, compared as a string.
    pub date: String,
    /// Category.
    pub kind: LogKind,
    /// Front-matter summary or the first paragraph of the body.
    pub summary: String,
    /// Related link.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    /// Image.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Video.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video: Option<String>,
    /// Body of the file.
    pub body: String,
}

impl Record for LogEntry {
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

/// The `log` collection.
#[derive(Debug, Clone, Copy)]
pub struct LogEntries;

impl Collection for LogEntries {
    type Record = LogEntry;
    const KIND: CollectionKind = CollectionKind::Log;

    fn decode(document: &Document, ctx: &DecodeContext<'_>) -> LogEntry {
        let meta = &document.metadata;
        LogEntry {
            slug: ctx.slug(document),
            title: meta.string("title").unwrap_or_default(),
            date: meta.string("date").unwrap_or_else(|| UNDATED.to_string()),
            kind: enum_token(meta, "kind")
                .and_then(|t| LogKind::parse(&t))
                .unwrap_or_default(),
            summary: summary_or_body(meta, &document.body),
            link: meta.string("link"),
            image: meta.string("image"),
            video: meta.string("video"),
            body: document.body.clone(),
        }
    }

    fn compare(a: &LogEntry, b: &LogEntry) -> Ordering {
        b.date
            .cmp(&a.date)
            .then_with(|| compare_text(&a.title, &b.title))
            .then_with(|| a.slug.cmp(&b.slug))
    }
}
