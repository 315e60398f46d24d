// Copyright © 2024 LabContent. All rights reserved.
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! # Configuration Module
//!
//! Layered configuration for the loaders, the integrity checker and the cache.
//! Values come from, in increasing precedence: built-in defaults, a TOML file,
//! environment variables with a prefix, and programmatic overrides.
//!
//! ```toml
//! content_root = "content"
//! extension = "mdx"
//!
//! [loader]
//! dedupe_slugs = true
//!
//! [checker]
//! check_references = true
//!
//! [tags]
//! projects = ["maps", "provenance"]
//! ```
//!
//! Environment variables use `__` between a section and its key, e.g.
//! `LABCONTENT_CHECKER__CHECK_REFERENCES=true`.
//!
//! ## Example
//!
//! ```rust,no_run
//! use labcontent::core::config::ConfigBuilder;
//!
//! let config = ConfigBuilder::new()
//!     .with_file("labcontent.toml")
//!     .with_env_prefix("LABCONTENT_")
//!     .with_override("loader.dedupe_slugs", false)
//!     .build()
//!     .unwrap();
//!
//! assert!(!config.loader.dedupe_slugs);
//! ```

use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use log::debug;
use serde::{Deserialize, Serialize};
use toml::Value as TomlValue;

use crate::core::error::{LabContentError, Result};

/// Default name of the configuration file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "labcontent.toml";

/// Default prefix for environment overrides.
pub const DEFAULT_ENV_PREFIX: &str = "LABCONTENT_";

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_content_root")]
    /// Directory holding one sub-directory per collection.
    pub content_root: PathBuf,

    #[serde(default = "default_extension")]
    /// Extension of content files, without the leading dot.
    pub extension: String,

    #[serde(default)]
    /// Collection loader behaviour.
    pub loader: LoaderConfig,

    #[serde(default)]
    /// Integrity checker behaviour.
    pub checker: CheckerConfig,

    #[serde(default)]
    /// Collection cache behaviour.
    pub cache: CacheConfig,

    #[serde(default)]
    /// Tag vocabulary overrides.
    pub tags: TagConfig,
}

/// Settings for the collection loaders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LoaderConfig {
    #[serde(default = "default_true")]
    /// Drop later records whose slug was already loaded (keep-first).
    pub dedupe_slugs: bool,

    #[serde(default = "default_true")]
    /// Log required-field problems found while decoding.
    pub log_decode_issues: bool,
}

/// Settings for the integrity checker.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckerConfig {
    #[serde(default)]
    /// Verify that every playground `relatedProject` names a project.
    pub check_references: bool,
}

/// Settings for the optional collection cache.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheConfig {
    #[serde(default)]
    /// Serve repeated loads from memory while the directory is unchanged.
    pub enabled: bool,

    #[serde(default)]
    /// Upper bound on the age of a cached collection, in seconds.
    pub ttl_secs: Option<u64>,
}

impl CacheConfig {
    /// The TTL as a `Duration`.
    pub fn ttl(&self) -> Option<Duration> {
        self.ttl_secs.map(Duration::from_secs)
    }
}

/// Replacement tag vocabularies; `None` keeps the built-in list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagConfig {
    #[serde(default)]
    /// Allowed research-area tags.
    pub research: Option<Vec<String>>,

    #[serde(default)]
    /// Allowed project tags.
    pub projects: Option<Vec<String>>,

    #[serde(default)]
    /// Allowed publication tags.
    pub publications: Option<Vec<String>>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            content_root: default_content_root(),
            extension: default_extension(),
            loader: LoaderConfig::default(),
            checker: CheckerConfig::default(),
            cache: CacheConfig::default(),
            tags: TagConfig::default(),
        }
    }
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            dedupe_slugs: true,
            log_decode_issues: true,
        }
    }
}

impl Config {
    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        validate_config(self)
    }

    /// Directory of one collection under the content root.
    pub fn collection_dir(&self, directory: &str) -> PathBuf {
        self.content_root.join(directory)
    }
}

/// Builds a [`Config`] from a file, the environment and overrides.
#[derive(Debug, Default)]
pub struct ConfigBuilder {
    config_file: Option<PathBuf>,
    env_prefix: Option<String>,
    overrides: Vec<(String, TomlValue)>,
    content_root: Option<PathBuf>,
}

impl ConfigBuilder {
    /// Initialises a new `ConfigBuilder` with no sources.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads a TOML configuration file.
    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config_file = Some(path.as_ref().to_path_buf());
        self
    }

    /// Applies environment variables starting with `prefix`.
    pub fn with_env_prefix<S: Into<String>>(mut self, prefix: S) -> Self {
        self.env_prefix = Some(prefix.into());
        self
    }

    /// Overrides a single key, e.g. `"checker.check_references"`.
    pub fn with_override<K, V>(mut self, key: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<TomlValue>,
    {
        self.overrides.push((key.into(), value.into()));
        self
    }

    /// Overrides `content_root`; applied after every other source.
    pub fn with_content_root<P: AsRef<Path>>(mut self, root: P) -> Self {
        self.content_root = Some(root.as_ref().to_path_buf());
        self
    }

    /// Loads the file, applies environment and explicit overrides, and
    /// validates the result.
    pub fn build(self) -> Result<Config> {
        let mut config = match &self.config_file {
            Some(path) => load_from_file(path)?,
            None => Config::default(),
        };

        if let Some(prefix) = &self.env_prefix {
            apply_env_overrides(&mut config, prefix)?;
        }

        for (key, value) in &self.overrides {
            apply_config_value(&mut config, key, value)?;
        }

        if let Some(root) = self.content_root {
            config.content_root = root;
        }

        validate_config(&config)?;
        debug!("Resolved configuration: {:?}", config);
        Ok(config)
    }
}

// Internal helper functions

fn load_from_file(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path).map_err(|e| {
        LabContentError::config_error(
            format!("Failed to read config file: {}", e),
            Some(path.to_path_buf()),
        )
    })?;

    toml::from_str(&content).map_err(|e| {
        LabContentError::config_error(
            format!("Failed to parse config file: {}", e),
            Some(path.to_path_buf()),
        )
    })
}

fn apply_env_overrides(config: &mut Config, prefix: &str) -> Result<()> {
    let mut vars: HashMap<String, String> = HashMap::new();
    for (key, value) in env::vars() {
        if let Some(stripped) = key.strip_prefix(prefix) {
            let config_key = stripped
                .trim_start_matches('_')
                .to_lowercase()
                .replace("__", ".");
            let _ = vars.insert(config_key, value);
        }
    }
    for (key, value) in &vars {
        apply_config_value(config, key, value)?;
    }
    Ok(())
}

fn apply_config_value<T: ToString>(
    config: &mut Config,
    key: &str,
    value: &T,
) -> Result<()> {
    let value_str = value.to_string().trim_matches('"').to_string();
    match key {
        "content_root" => config.content_root = PathBuf::from(value_str),
        "extension" => {
            config.extension =
                value_str.trim_start_matches('.').to_string()
        }
        _ => {
            let Some((section, field)) = key.split_once('.') else {
                return Err(LabContentError::config_error(
                    format!("Unknown configuration key: {}", key),
                    None,
                ));
            };
            match (section, field) {
                ("loader", "dedupe_slugs") => {
                    config.loader.dedupe_slugs =
                        parse_flag(key, &value_str)?
                }
                ("loader", "log_decode_issues") => {
                    config.loader.log_decode_issues =
                        parse_flag(key, &value_str)?
                }
                ("checker", "check_references") => {
                    config.checker.check_references =
                        parse_flag(key, &value_str)?
                }
                ("cache", "enabled") => {
                    config.cache.enabled = parse_flag(key, &value_str)?
                }
                ("cache", "ttl_secs") => {
                    config.cache.ttl_secs =
                        Some(value_str.parse().map_err(|e| {
                            LabContentError::config_error(
                                format!(
                                    "Invalid {} value '{}': {}",
                                    key, value_str, e
                                ),
                                None,
                            )
                        })?)
                }
                ("tags", "research") => {
                    config.tags.research = Some(parse_list(&value_str))
                }
                ("tags", "projects") => {
                    config.tags.projects = Some(parse_list(&value_str))
                }
                ("tags", "publications") => {
                    config.tags.publications = Some(parse_list(&value_str))
                }
                _ => {
                    return Err(LabContentError::config_error(
                        format!("Unknown configuration key: {}", key),
                        None,
                    ));
                }
            }
        }
    }
    Ok(())
}

fn parse_flag(key: &str, value: &str) -> Result<bool> {
    value.parse().map_err(|e| {
        LabContentError::config_error(
            format!("Invalid {} value '{}': {}", key, value, e),
            None,
        )
    })
}

/// Accepts `a,b,c` as well as the TOML rendering `["a", "b", "c"]`.
fn parse_list(value: &str) -> Vec<String> {
    value
        .trim_start_matches('[')
        .trim_end_matches(']')
        .split(',')
        .map(|item| item.trim().trim_matches('"').to_string())
        .filter(|item| !item.is_empty())
        .collect()
}

fn validate_config(config: &Config) -> Result<()> {
    if config.extension.trim().is_empty() {
        return Err(LabContentError::config_error(
            "No content extension specified",
            None,
        ));
    }

    let root = &config.content_root;
    if root.exists() && !root.is_dir() {
        return Err(LabContentError::config_error(
            format!("content root is not a directory: {}", root.display()),
            Some(root.clone()),
        ));
    }

    Ok(())
}

// Default value functions
fn default_true() -> bool {
    true
}

fn default_content_root() -> PathBuf {
    PathBuf::from("content")
}

fn default_extension() -> String {
    "mdx".to_string()
}
