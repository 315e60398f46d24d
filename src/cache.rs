// Copyright © 2024 LabContent. All rights reserved.
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! # Collection Cache
//!
//! An optional in-memory cache in front of the loaders. It holds at most one
//! entry per collection and decode-settings key, so loaders with different
//! settings can share one cache. An entry is reused while the collection
//! directory's fingerprint (file names, sizes and modification times) is
//! unchanged and, when a TTL is set, while it is younger than the TTL.
//!
//! The cache is safe to share between threads; a miss loads outside the
//! lock, so concurrent misses may load the same collection twice.

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant, SystemTime};

use log::debug;
use parking_lot::RwLock;

use crate::core::error::Result;
use crate::schema::CollectionKind;

type SharedRecords = Arc<dyn Any + Send + Sync>;
type EntryKey = (CollectionKind, u64);

/// Identity of one file at the time a collection was loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
struct FileStamp {
    name: String,
    len: u64,
    modified: Option<SystemTime>,
}

/// State of a collection directory.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Fingerprint {
    dir: PathBuf,
    files: Vec<FileStamp>,
}

impl Fingerprint {
    /// Scans `dir`. A missing or unreadable directory has no files.
    fn scan(dir: &Path, extension: &str) -> Self {
        let mut files: Vec<FileStamp> = fs::read_dir(dir)
            .map(|entries| {
                entries
                    .filter_map(|entry| entry.ok())
                    .filter(|entry| {
                        entry.path().extension().and_then(|e| e.to_str())
                            == Some(extension)
                    })
                    .filter_map(|entry| {
                        let metadata = fs::metadata(entry.path()).ok()?;
                        metadata.is_file().then(|| FileStamp {
                            name: entry.file_name().to_string_lossy().into_owned(),
                            len: metadata.len(),
                            modified: metadata.modified().ok(),
                        })
                    })
                    .collect()
            })
            .unwrap_or_default();
        files.sort_by(|a, b| a.name.cmp(&b.name));
        Self {
            dir: dir.to_path_buf(),
            files,
        }
    }
}

struct CacheEntry {
    fingerprint: Fingerprint,
    loaded_at: Instant,
    records: SharedRecords,
}

/// Cache of loaded collections.
pub struct CollectionCache {
    ttl: Option<Duration>,
    entries: RwLock<HashMap<EntryKey, CacheEntry>>,
}

impl CollectionCache {
    /// An empty cache. `ttl` bounds the age of an entry; `None` keeps entries
    /// until the directory changes or they are invalidated.
    pub fn new(ttl: Option<Duration>) -> Self {
        Self {
            ttl,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Returns the records of `kind` cached under `settings` if `dir` is
    /// unchanged, otherwise calls `load` and caches its result. `settings`
    /// identifies the decode settings of the caller; entries cached under
    /// another key are never returned. Errors are not cached.
    ///
    /// # Errors
    ///
    /// Propagates the error returned by `load`.
    pub fn get_or_load<R, F>(
        &self,
        kind: CollectionKind,
        settings: u64,
        dir: &Path,
        extension: &str,
        load: F,
    ) -> Result<Arc<Vec<R>>>
    where
        R: Send + Sync + 'static,
        F: FnOnce() -> Result<Vec<R>>,
    {
        let fingerprint = Fingerprint::scan(dir, extension);

        if let Some(records) = self.lookup::<R>((kind, settings), &fingerprint) {
            debug!("Cache hit for {kind}");
            return Ok(records);
        }

        debug!("Cache miss for {kind}, loading");
        let records = Arc::new(load()?);
        let shared: SharedRecords = records.clone();
        let _ = self.entries.write().insert(
            (kind, settings),
            CacheEntry {
                fingerprint,
                loaded_at: Instant::now(),
                records: shared,
            },
        );
        Ok(records)
    }

    /// Drops every entry of one collection.
    pub fn invalidate(&self, kind: CollectionKind) {
        let mut entries = self.entries.write();
        let before = entries.len();
        entries.retain(|(cached, _), _| *cached != kind);
        if entries.len() < before {
            debug!("Invalidated cached {kind}");
        }
    }

    /// Drops every entry.
    pub fn clear(&self) {
        self.entries.write().clear();
    }

    /// Number of cached entries.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Whether nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    fn lookup<R: Send + Sync + 'static>(
        &self,
        key: EntryKey,
        fingerprint: &Fingerprint,
    ) -> Option<Arc<Vec<R>>> {
        let entries = self.entries.read();
        let entry = entries.get(&key)?;
        if entry.fingerprint != *fingerprint {
            return None;
        }
        if self
            .ttl
            .is_some_and(|ttl| entry.loaded_at.elapsed() >= ttl)
        {
            return None;
        }
        entry.records.clone().downcast::<Vec<R>>().ok()
    }
}

impl fmt::Debug for CollectionCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let entries = self.entries.read();
        let mut kinds: Vec<_> = entries.keys().map(|(kind, _)| *kind).collect();
        kinds.sort();
        kinds.dedup();
        f.debug_struct("CollectionCache")
            .field("ttl", &self.ttl)
            .field("collections", &kinds)
            .finish()
    }
}

impl Default for CollectionCache {
    fn default() -> Self {
        Self::new(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use tempfile::TempDir;

    fn load_counting(counter: &Cell<u32>) -> Result<Vec<String>> {
        counter.set(counter.get() + 1);
        Ok(vec!["a".to_string()])
    }

    #[test]
    fn test_hit_until_directory_changes() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path();
        fs::write(dir.join("a.mdx"), "one").unwrap();

        let cache = CollectionCache::new(None);
        let calls = Cell::new(0);
        let kind = CollectionKind::People;

        let _ = cache.get_or_load(kind, 0, dir, "mdx", || load_counting(&calls)).unwrap();
        let _ = cache.get_or_load(kind, 0, dir, "mdx", || load_counting(&calls)).unwrap();
        assert_eq!(calls.get(), 1);

        fs::write(dir.join("b.mdx"), "two").unwrap();
        let _ = cache.get_or_load(kind, 0, dir, "mdx", || load_counting(&calls)).unwrap();
        assert_eq!(calls.get(), 2);

        fs::write(dir.join("ignored.txt"), "x").unwrap();
        let _ = cache.get_or_load(kind, 0, dir, "mdx", || load_counting(&calls)).unwrap();
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn test_invalidate_and_clear() {
        let temp_dir = TempDir::new().unwrap();
        let cache = CollectionCache::default();
        let calls = Cell::new(0);

        for kind in [CollectionKind::Log, CollectionKind::Projects] {
            let _ = cache
                .get_or_load(kind, 0, temp_dir.path(), "mdx", || load_counting(&calls))
                .unwrap();
        }
        assert_eq!(cache.len(), 2);

        cache.invalidate(CollectionKind::Log);
        assert_eq!(cache.len(), 1);
        let _ = cache
            .get_or_load(CollectionKind::Log, 0, temp_dir.path(), "mdx", || load_counting(&calls))
            .unwrap();
        assert_eq!(calls.get(), 3);

        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn test_entries_are_separated_by_settings() {
        let temp_dir = TempDir::new().unwrap();
        let cache = CollectionCache::default();
        let kind = CollectionKind::Projects;

        let plain = cache
            .get_or_load(kind, 1, temp_dir.path(), "mdx", || Ok(vec!["plain".to_string()]))
            .unwrap();
        let custom = cache
            .get_or_load(kind, 2, temp_dir.path(), "mdx", || Ok(vec!["custom".to_string()]))
            .unwrap();
        assert_eq!(plain.as_slice(), ["plain".to_string()]);
        assert_eq!(custom.as_slice(), ["custom".to_string()]);
        assert_eq!(cache.len(), 2);

        let calls = Cell::new(0);
        let again = cache
            .get_or_load(kind, 1, temp_dir.path(), "mdx", || load_counting(&calls))
            .unwrap();
        assert_eq!(again.as_slice(), ["plain".to_string()]);
        assert_eq!(calls.get(), 0);

        cache.invalidate(kind);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_zero_ttl_always_reloads() {
        let temp_dir = TempDir::new().unwrap();
        let cache = CollectionCache::new(Some(Duration::ZERO));
        let calls = Cell::new(0);
        for _ in 0..2 {
            let _ = cache
                .get_or_load(CollectionKind::Playground, 0, temp_dir.path(), "mdx", || {
                    load_counting(&calls)
                })
                .unwrap();
        }
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn test_errors_are_not_cached() {
        let temp_dir = TempDir::new().unwrap();
        let cache = CollectionCache::default();
        let result: Result<Arc<Vec<String>>> = cache.get_or_load(
            CollectionKind::People,
            0,
            temp_dir.path(),
            "mdx",
            || Err(crate::core::error::LabContentError::internal_error("boom")),
        );
        assert!(result.is_err());
        assert!(cache.is_empty());
    }
}
