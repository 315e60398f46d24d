// Copyright © 2024 LabContent. All rights reserved.
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Allowed tag vocabularies.
//!
//! Publications, projects and research areas only keep tags from their own
//! vocabulary; anything else in the raw front-matter is dropped silently.

use crate::core::config::TagConfig;
use serde::Serialize;
use std::collections::BTreeSet;

/// Tags a research area may carry.
pub const RESEARCH_TAGS: &[&str] = &[
    "visualization",
    "interaction",
    "urban-data",
    "imaging",
    "neuroanalytics",
    "data-systems",
    "reproducibility",
    "responsible-ai",
];

/// Tags a project may carry.
pub const PROJECT_TAGS: &[&str] = &[
    "dashboards",
    "multimodal",
    "sensemaking",
    "urban-computing",
    "soundscapes",
    "maps",
    "provenance",
    "workflows",
    "debugging",
    "explainability",
    "fairness",
    "evaluation",
    "simulation",
    "planning",
    "scenarios",
    "open-science",
    "infrastructure",
];

/// Tags a publication may carry.
pub const PUBLICATION_TAGS: &[&str] = &[
    "visualization",
    "databases",
    "machine-learning",
    "biomedical",
    "urban-data",
    "explainability",
];

/// A closed set of allowed tags.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct TagVocabulary {
    allowed: BTreeSet<String>,
}

impl TagVocabulary {
    /// Builds a vocabulary from any list of tags.
    pub fn new<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            allowed: tags.into_iter().map(Into::into).collect(),
        }
    }

    /// Whether `tag` is allowed.
    pub fn contains(&self, tag: &str) -> bool {
        self.allowed.contains(tag)
    }

    /// Keeps the allowed tags, in their original order.
    pub fn filter(&self, tags: Vec<String>) -> Vec<String> {
        tags.into_iter().filter(|tag| self.contains(tag)).collect()
    }

    /// Allowed tags in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.allowed.iter().map(String::as_str)
    }
}

/// The three vocabularies used by the loaders.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct TagVocabularies {
    /// Research-area tags.
    pub research: TagVocabulary,
    /// Project tags.
    pub projects: TagVocabulary,
    /// Publication tags.
    pub publications: TagVocabulary,
}

impl TagVocabularies {
    /// Built-in vocabularies, replaced by any list given in configuration.
    pub fn from_config(config: &TagConfig) -> Self {
        let pick = |custom: &Option<Vec<String>>, builtin: &[&str]| {
            custom.as_ref().map_or_else(
                || TagVocabulary::new(builtin.iter().copied()),
                |tags| TagVocabulary::new(tags.iter().cloned()),
            )
        };
        Self {
            research: pick(&config.research, RESEARCH_TAGS),
            projects: pick(&config.projects, PROJECT_TAGS),
            publications: pick(&config.publications, PUBLICATION_TAGS),
        }
    }
}

impl Default for TagVocabularies {
    fn default() -> Self {
        Self::from_config(&TagConfig::default())
    }
}
