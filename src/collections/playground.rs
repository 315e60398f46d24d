// Copyright © 2024 LabContent. All rights reserved.
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! # Playground
//!
//! Interactive demos. Each item declares a kind and carries the media field
//! that kind uses (a model, a video, audio tracks or an image). The shape is
//! not enforced while loading; [`PlaygroundItem::media`] returns `None` when
//! the kind's field is absent.

use std::cmp::Ordering;

use serde::Serialize;

use super::projects::Project;
use super::{compare_text, enum_token};
use crate::core::traits::{Collection, DecodeContext, Record};
use crate::frontmatter::{Document, FieldValue, Metadata};
use crate::schema::CollectionKind;

/// Order given to items without one; places them after ordered items.
pub const DEFAULT_ORDER: f64 = 99.0;

/// Label given to audio tracks without one.
pub const DEFAULT_AUDIO_LABEL: &str = "Audio";

/// Media type of a demo.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaygroundKind {
    /// 3D model viewer.
    #[serde(rename = "3d")]
    ThreeD,
    /// Video.
    Video,
    /// Audio tracks.
    Audio,
    /// Still image.
    Image,
    /// Embedded interactive widget; also the fallback.
    #[default]
    Interactive,
}

impl PlaygroundKind {
    fn parse(token: &str) -> Option<Self> {
        match token {
            "3d" => Some(PlaygroundKind::ThreeD),
            "video" => Some(PlaygroundKind::Video),
            "audio" => Some(PlaygroundKind::Audio),
            "image" => Some(PlaygroundKind::Image),
            "interactive" => Some(PlaygroundKind::Interactive),
            _ => None,
        }
    }
}

/// One audio track of an audio demo.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AudioTrack {
    /// Display label.
    pub label: String,
    /// Source path; empty when missing.
    pub src: String,
}

/// The media a demo presents, matching its kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaygroundMedia<'a> {
    /// Path of a 3D model.
    Model(&'a str),
    /// Path of a video.
    Video(&'a str),
    /// Audio tracks.
    Audio(&'a [AudioTrack]),
    /// Path of an image.
    Image(&'a str),
}

/// A demo.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaygroundItem {
    /// Identifier, equal to the file stem.
    pub slug: String,
    /// Title.
    pub title: String,
    /// Media type.
    pub kind: PlaygroundKind,
    /// One-line summary; empty when missing.
    pub summary: String,
    /// Body of the file.
    pub body: String,
    /// Position in the gallery.
    pub order: f64,
    /// Highlighted among items of equal order.
    pub featured: bool,
    /// 3D model path.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// Video path.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video: Option<String>,
    /// Audio tracks, present when `audio` is a list.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio: Option<Vec<AudioTrack>>,
    /// Image path.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Usage instructions.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
    /// Slug of the project this demo belongs to. Not checked on load.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub related_project: Option<String>,
    /// Free tags.
    pub tags: Vec<String>,
}

impl PlaygroundItem {
    /// The media field selected by `kind`, if it is set. Interactive demos
    /// have none.
    pub fn media(&self) -> Option<PlaygroundMedia<'_>> {
        match self.kind {
            PlaygroundKind::ThreeD => {
                self.model.as_deref().map(PlaygroundMedia::Model)
            }
            PlaygroundKind::Video => {
                self.video.as_deref().map(PlaygroundMedia::Video)
            }
            PlaygroundKind::Audio => self
                .audio
                .as_deref()
                .filter(|tracks| !tracks.is_empty())
                .map(PlaygroundMedia::Audio),
            PlaygroundKind::Image => {
                self.image.as_deref().map(PlaygroundMedia::Image)
            }
            PlaygroundKind::Interactive => None,
        }
    }

    /// The project named by `related_project`, if it exists in `projects`.
    pub fn resolve_project<'a>(
        &self,
        projects: &'a [Project],
    ) -> Option<&'a Project> {
        let slug = self.related_project.as_deref()?;
        projects.iter().find(|project| project.slug == slug)
    }
}

impl Record for PlaygroundItem {
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

/// The `playground` collection.
#[derive(Debug, Clone, Copy)]
pub struct Playground;

impl Collection for Playground {
    type Record = PlaygroundItem;
    const KIND: CollectionKind = CollectionKind::Playground;

    fn decode(document: &Document, ctx: &DecodeContext<'_>) -> PlaygroundItem {
        let meta = &document.metadata;
        PlaygroundItem {
            slug: ctx.slug(document),
            title: meta.string("title").unwrap_or_default(),
            kind: enum_token(meta, "kind")
                .and_then(|t| PlaygroundKind::parse(&t))
                .unwrap_or_default(),
            summary: meta.string("summary").unwrap_or_default(),
            body: document.body.clone(),
            order: meta.number("order").unwrap_or(DEFAULT_ORDER),
            featured: meta.boolean("featured").unwrap_or(false),
            model: meta.string("model"),
            video: meta.string("video"),
            audio: audio_tracks(meta),
            image: meta.string("image"),
            instructions: meta.string("instructions"),
            related_project: meta.string("relatedProject"),
            tags: meta.string_list("tags"),
        }
    }

    fn compare(a: &PlaygroundItem, b: &PlaygroundItem) -> Ordering {
        a.order
            .total_cmp(&b.order)
            .then_with(|| b.featured.cmp(&a.featured))
            .then_with(|| compare_text(&a.title, &b.title))
            .then_with(|| a.slug.cmp(&b.slug))
    }
}

fn audio_tracks(meta: &Metadata) -> Option<Vec<AudioTrack>> {
    let items = meta.get("audio").and_then(FieldValue::as_list)?;
    Some(
        items
            .iter()
            .map(|item| {
                let field = |key: &str| {
                    item.as_map()
                        .and_then(|map| map.get(key))
                        .and_then(FieldValue::as_text)
                        .map(str::to_string)
                };
                AudioTrack {
                    label: field("label")
                        .unwrap_or_else(|| DEFAULT_AUDIO_LABEL.to_string()),
                    src: field("src").unwrap_or_default(),
                }
            })
            .collect(),
    )
}
