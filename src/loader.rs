// Copyright © 2024 LabContent. All rights reserved.
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! # Collection Loader
//!
//! [`ContentLoader`] turns a collection directory into an ordered list of
//! typed records:
//!
//! 1. list `<slug>.<extension>` files in file-name order
//! 2. read, parse and decode each file; problems are logged, never fatal
//! 3. drop later files repeating an already-seen slug (configurable)
//! 4. sort with the collection's comparator
//!
//! Lookups by slug scan the loaded collection.
//!
//! ## Example
//!
//! ```rust,no_run
//! use labcontent::collections::Publications;
//! use labcontent::loader::ContentLoader;
//!
//! let loader = ContentLoader::new("content");
//! for publication in loader.publications()? {
//!     println!("{} ({})", publication.title, publication.year);
//! }
//! let paper = loader.get_by_slug::<Publications>("foo")?;
//! # Ok::<(), labcontent::core::error::LabContentError>(())
//! ```

use std::collections::hash_map::DefaultHasher;
use std::collections::HashSet;
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use log::{debug, warn};

use crate::cache::CollectionCache;
use crate::collections::tags::TagVocabularies;
use crate::collections::{
    LogEntries, LogEntry, OpenLab, OpenLabResource, People, Person,
    Playground, PlaygroundItem, Project, Projects, Publication, Publications,
    ResearchArea, ResearchAreas,
};
use crate::core::config::{Config, LoaderConfig};
use crate::core::error::Result;
use crate::core::traits::{Collection, DecodeContext, Record};
use crate::frontmatter::{Document, FrontmatterStatus};
use crate::schema::CollectionKind;
use crate::source::{file_stem, list_content_files, read_content};

/// Default extension of content files.
pub const DEFAULT_EXTENSION: &str = "mdx";

/// Loads collections from a content root.
#[derive(Debug, Clone)]
pub struct ContentLoader {
    root: PathBuf,
    extension: String,
    options: LoaderConfig,
    vocabularies: TagVocabularies,
    cache: Option<Arc<CollectionCache>>,
}

impl ContentLoader {
    /// A loader over `root` with default settings and no cache.
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            extension: DEFAULT_EXTENSION.to_string(),
            options: LoaderConfig::default(),
            vocabularies: TagVocabularies::default(),
            cache: None,
        }
    }

    /// A loader configured from `config`, with a cache when enabled there.
    pub fn from_config(config: &Config) -> Self {
        let loader = Self::new(&config.content_root)
            .with_extension(&config.extension)
            .with_options(config.loader)
            .with_vocabularies(TagVocabularies::from_config(&config.tags));
        if config.cache.enabled {
            loader.with_cache(Arc::new(CollectionCache::new(config.cache.ttl())))
        } else {
            loader
        }
    }

    /// Sets the content file extension (without the dot).
    pub fn with_extension<S: Into<String>>(mut self, extension: S) -> Self {
        self.extension = extension.into();
        self
    }

    /// Sets the loader options.
    pub fn with_options(mut self, options: LoaderConfig) -> Self {
        self.options = options;
        self
    }

    /// Replaces the tag vocabularies.
    pub fn with_vocabularies(mut self, vocabularies: TagVocabularies) -> Self {
        self.vocabularies = vocabularies;
        self
    }

    /// Serves loads through `cache`. The cache may be shared between loaders;
    /// each one only sees entries decoded under its own settings.
    pub fn with_cache(mut self, cache: Arc<CollectionCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Content root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Content file extension.
    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// The attached cache, if any.
    pub fn cache(&self) -> Option<&Arc<CollectionCache>> {
        self.cache.as_ref()
    }

    /// Directory of one collection.
    pub fn collection_dir(&self, kind: CollectionKind) -> PathBuf {
        self.root.join(kind.name())
    }

    /// Loads and sorts a whole collection.
    ///
    /// A missing collection directory yields an empty list.
    ///
    /// # Errors
    ///
    /// Returns `LabContentError::IOError` if the directory exists but
    /// cannot be listed.
    pub fn load<C: Collection>(&self) -> Result<Vec<C::Record>> {
        match &self.cache {
            Some(_) => Ok(self.load_shared::<C>()?.as_ref().clone()),
            None => self.read_collection::<C>(),
        }
    }

    /// Like [`ContentLoader::load`] but returns a shared list, served from
    /// the cache when one is attached.
    pub fn load_shared<C: Collection>(&self) -> Result<Arc<Vec<C::Record>>> {
        match &self.cache {
            Some(cache) => cache.get_or_load(
                C::KIND,
                self.settings_key(),
                &self.collection_dir(C::KIND),
                &self.extension,
                || self.read_collection::<C>(),
            ),
            None => self.read_collection::<C>().map(Arc::new),
        }
    }

    /// Key of the settings that change decoded records.
    fn settings_key(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.extension.hash(&mut hasher);
        self.options.hash(&mut hasher);
        self.vocabularies.hash(&mut hasher);
        hasher.finish()
    }

    /// The record whose slug is `slug`, or `None`.
    ///
    /// # Errors
    ///
    /// Fails only when the collection itself cannot be loaded.
    pub fn get_by_slug<C: Collection>(
        &self,
        slug: &str,
    ) -> Result<Option<C::Record>> {
        Ok(self
            .load_shared::<C>()?
            .iter()
            .find(|record| record.slug() == slug)
            .cloned())
    }

    /// All people, by role category, order and name.
    pub fn people(&self) -> Result<Vec<Person>> {
        self.load::<People>()
    }

    /// All publications, newest first.
    pub fn publications(&self) -> Result<Vec<Publication>> {
        self.load::<Publications>()
    }

    /// All projects, by title.
    pub fn projects(&self) -> Result<Vec<Project>> {
        self.load::<Projects>()
    }

    /// The log feed, newest first.
    pub fn log_entries(&self) -> Result<Vec<LogEntry>> {
        self.load::<LogEntries>()
    }

    /// Open-lab resources, most recently updated first.
    pub fn open_lab_resources(&self) -> Result<Vec<OpenLabResource>> {
        self.load::<OpenLab>()
    }

    /// Playground items, by order.
    pub fn playground_items(&self) -> Result<Vec<PlaygroundItem>> {
        self.load::<Playground>()
    }

    /// Research areas, by order.
    pub fn research_areas(&self) -> Result<Vec<ResearchArea>> {
        self.load::<ResearchAreas>()
    }

    /// Looks up a person.
    pub fn person_by_slug(&self, slug: &str) -> Result<Option<Person>> {
        self.get_by_slug::<People>(slug)
    }

    /// Looks up a publication.
    pub fn publication_by_slug(
        &self,
        slug: &str,
    ) -> Result<Option<Publication>> {
        self.get_by_slug::<Publications>(slug)
    }

    /// Looks up a project.
    pub fn project_by_slug(&self, slug: &str) -> Result<Option<Project>> {
        self.get_by_slug::<Projects>(slug)
    }

    /// Looks up a log entry.
    pub fn log_entry_by_slug(&self, slug: &str) -> Result<Option<LogEntry>> {
        self.get_by_slug::<LogEntries>(slug)
    }

    /// Looks up an open-lab resource.
    pub fn open_lab_resource_by_slug(
        &self,
        slug: &str,
    ) -> Result<Option<OpenLabResource>> {
        self.get_by_slug::<OpenLab>(slug)
    }

    /// Looks up a playground item.
    pub fn playground_item_by_slug(
        &self,
        slug: &str,
    ) -> Result<Option<PlaygroundItem>> {
        self.get_by_slug::<Playground>(slug)
    }

    /// Looks up a research area.
    pub fn research_area_by_slug(
        &self,
        slug: &str,
    ) -> Result<Option<ResearchArea>> {
        self.get_by_slug::<ResearchAreas>(slug)
    }

    fn read_collection<C: Collection>(&self) -> Result<Vec<C::Record>> {
        let dir = self.collection_dir(C::KIND);
        if !dir.exists() {
            warn!(
                "Collection directory {} does not exist; {} is empty",
                dir.display(),
                C::KIND
            );
            return Ok(Vec::new());
        }

        let files = list_content_files(&dir, &self.extension)?;
        debug!("Loading {} {} file(s) from {}", files.len(), C::KIND, dir.display());

        let mut seen = HashSet::new();
        let mut records = Vec::with_capacity(files.len());
        for path in files {
            let record = self.decode_file::<C>(&path);
            if self.options.dedupe_slugs && !seen.insert(record.slug().to_string()) {
                warn!(
                    "{}: duplicate slug \"{}\" in {}, keeping the first file",
                    path.display(),
                    record.slug(),
                    C::KIND
                );
                continue;
            }
            records.push(record);
        }

        records.sort_by(C::compare);
        Ok(records)
    }

    fn decode_file<C: Collection>(&self, path: &Path) -> C::Record {
        let document = match read_content(path) {
            Ok(raw) => Document::parse(&raw),
            Err(e) => {
                warn!("{e}; decoding an empty document");
                Document::empty()
            }
        };

        match &document.status {
            FrontmatterStatus::Present => {}
            FrontmatterStatus::Missing => {
                warn!("{}: missing frontmatter", path.display());
            }
            FrontmatterStatus::Malformed(reason) => {
                warn!("{}: malformed frontmatter: {reason}", path.display());
            }
        }

        let stem = file_stem(path);
        let ctx = DecodeContext {
            file_stem: &stem,
            vocabularies: &self.vocabularies,
        };
        let decoded = C::decode_checked(&document, &ctx);
        if self.options.log_decode_issues && document.has_frontmatter() {
            for issue in &decoded.issues {
                warn!("{}: {issue}", path.display());
            }
        }
        decoded.record
    }
}
