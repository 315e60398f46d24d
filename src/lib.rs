// Copyright © 2024 LabContent. All rights reserved.
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! # LabContent Library
//!
//! LabContent is the content layer of a research lab website. Pages for
//! people, publications, projects, research areas, the news log, open-lab
//! resources and playground demos are written as `.mdx` files with YAML
//! front-matter; this crate loads them into strongly typed, deterministically
//! ordered records and checks them for schema violations before publishing.
//!
//! - [`loader::ContentLoader`] loads a collection or looks up one record
//! - [`checker::IntegrityChecker`] reports every violation in one pass
//! - [`schema`] holds the single table of required fields per collection
//!
//! For more information, visit the [LabContent documentation](https://docs.rs/labcontent).

#![doc = include_str!("../README.md")]
#![doc(html_root_url = "https://docs.rs/labcontent")]
#![crate_name = "labcontent"]

use std::path::Path;

use crate::checker::{CheckReport, IntegrityChecker};
use crate::core::config::{Config, ConfigBuilder};
use crate::core::error::Result;
use crate::loader::ContentLoader;

/// Core utilities: configuration, errors and the collection traits.
pub mod core;

/// Body summaries and Markdown rendering.
pub mod body;

/// Optional in-memory cache of loaded collections.
pub mod cache;

/// Batch validation of every collection.
pub mod checker;

/// Command-line interface utilities.
pub mod cli;

/// Typed records, one module per collection.
pub mod collections;

/// Front-matter parsing.
pub mod frontmatter;

/// Collection loading and lookups.
pub mod loader;

/// The schema registry.
pub mod schema;

/// Content file enumeration and reading.
pub mod source;

/// Field validators.
pub mod validators;

pub use crate::collections::{
    LogEntry, OpenLabResource, Person, PlaygroundItem, Project, Publication,
    ResearchArea,
};
pub use crate::core::error::LabContentError;
pub use crate::schema::CollectionKind;

/// A configured content root: a loader and a checker sharing one
/// configuration.
///
/// # Example
///
/// ```rust,no_run
/// use labcontent::LabContent;
///
/// let site = LabContent::open("content")?;
/// let report = site.check();
/// if report.is_ok() {
///     for person in site.loader().people()? {
///         println!("{} ({})", person.name, person.role);
///     }
/// }
/// # Ok::<(), labcontent::LabContentError>(())
/// ```
#[derive(Debug, Clone)]
pub struct LabContent {
    config: Config,
    loader: ContentLoader,
}

impl LabContent {
    /// Creates an instance from a configuration.
    ///
    /// # Errors
    ///
    /// Returns `LabContentError::ConfigError` if the configuration is invalid.
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        let loader = ContentLoader::from_config(&config);
        Ok(Self { config, loader })
    }

    /// Creates an instance over `root` with default settings.
    ///
    /// # Errors
    ///
    /// Returns `LabContentError::ConfigError` if `root` exists but is not a
    /// directory.
    pub fn open<P: AsRef<Path>>(root: P) -> Result<Self> {
        Self::new(ConfigBuilder::new().with_content_root(root).build()?)
    }

    /// The resolved configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The collection loader.
    pub fn loader(&self) -> &ContentLoader {
        &self.loader
    }

    /// Runs the integrity checker over the content root.
    pub fn check(&self) -> CheckReport {
        IntegrityChecker::from_config(&self.config).run()
    }
}
