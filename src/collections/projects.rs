// Copyright © 2024 LabContent. All rights reserved.
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Programs, projects and tools, ordered by title.

use std::cmp::Ordering;

use serde::Serialize;

use super::{compare_text, enum_token};
use crate::core::traits::{Collection, DecodeContext, Record};
use crate::frontmatter::Document;
use crate::schema::CollectionKind;

/// How many projects the grid highlights.
pub const FEATURED_LIMIT: usize = 3;

/// Scale of a project.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectKind {
    /// Umbrella program.
    Program,
    /// Research project.
    #[default]
    Project,
    /// Released tool.
    Tool,
}

impl ProjectKind {
    fn parse(token: &str) -> Option<Self> {
        match token {
            "program" => Some(ProjectKind::Program),
            "project" => Some(ProjectKind::Project),
            "tool" => Some(ProjectKind::Tool),
            _ => None,
        }
    }
}

/// Lifecycle state of a project.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectStatus {
    /// In progress.
    #[default]
    Active,
    /// Finished.
    Archived,
    /// Kept for reference only.
    Legacy,
}

impl ProjectStatus {
    fn parse(token: &str) -> Option<Self> {
        match token {
            "active" => Some(ProjectStatus::Active),
            "archived" => Some(ProjectStatus::Archived),
            "legacy" => Some(ProjectStatus::Legacy),
            _ => None,
        }
    }
}

/// A program, project or tool.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    /// Identifier, equal to the file stem.
    pub slug: String,
    /// Title.
    pub title: String,
    /// Scale.
    pub kind: ProjectKind,
    /// One-line summary; empty when missing.
    pub summary: String,
    /// Lifecycle state.
    pub status: ProjectStatus,
    /// Project page or repository.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_url: Option<String>,
    /// Research-area slugs.
    pub related_areas: Vec<String>,
    /// Tags from the project vocabulary.
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

impl Project {
    /// Tools and active projects are candidates for the highlighted row.
    pub fn is_featured_candidate(&self) -> bool {
        self.kind == ProjectKind::Tool || self.status == ProjectStatus::Active
    }
}

impl Record for Project {
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

/// The `projects` collection.
#[derive(Debug, Clone, Copy)]
pub struct Projects;

impl Collection for Projects {
    type Record = Project;
    const KIND: CollectionKind = CollectionKind::Projects;

    fn decode(document: &Document, ctx: &DecodeContext<'_>) -> Project {
        let meta = &document.metadata;
        Project {
            slug: ctx.slug(document),
            title: meta.string("title").unwrap_or_default(),
            kind: enum_token(meta, "kind")
                .and_then(|t| ProjectKind::parse(&t))
                .unwrap_or_default(),
            summary: meta.string("summary").unwrap_or_default(),
            status: enum_token(meta, "status")
                .and_then(|t| ProjectStatus::parse(&t))
                .unwrap_or_default(),
            external_url: meta.string("externalUrl"),
            related_areas: meta.string_list("relatedAreas"),
            tags: ctx.vocabularies.projects.filter(meta.string_list("tags")),
            image: meta.string("image"),
            video: meta.string("video"),
            body: document.body.clone(),
        }
    }

    fn compare(a: &Project, b: &Project) -> Ordering {
        compare_text(&a.title, &b.title).then_with(|| a.slug.cmp(&b.slug))
    }
}

/// Splits the grid into the highlighted projects (the first
/// [`FEATURED_LIMIT`] candidates) and the rest, both in input order.
pub fn featured(projects: &[Project]) -> (Vec<&Project>, Vec<&Project>) {
    let highlighted: Vec<&Project> = projects
        .iter()
        .filter(|p| p.is_featured_candidate())
        .take(FEATURED_LIMIT)
        .collect();
    let rest = projects
        .iter()
        .filter(|p| !highlighted.iter().any(|h| h.slug == p.slug))
        .collect();
    (highlighted, rest)
}
