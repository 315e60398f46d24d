// Copyright © 2024 LabContent. All rights reserved.
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! # Error Handling for LabContent
//!
//! This module defines the error type shared by the loaders, the configuration
//! layer and the command-line interface. The `thiserror` crate is used to keep
//! the variants and their messages in one place.
//!
//! Content problems (missing front-matter, invalid fields, duplicate slugs) are
//! *not* errors: loaders degrade gracefully and the integrity checker reports
//! them as [`crate::checker::Violation`]s. The variants below cover the failures
//! that genuinely stop an operation.

use std::path::PathBuf;
use thiserror::Error;

/// A unified result type for the LabContent library.
pub type Result<T> = std::result::Result<T, LabContentError>;

/// The main error type for LabContent.
#[derive(Error, Debug)]
pub enum LabContentError {
    /// Error related to configuration loading or validation.
    #[error("Configuration error: {message}.")]
    ConfigError {
        /// Detailed description of the configuration error.
        message: String,
        /// Optional path of the configuration file or directory at fault.
        path: Option<PathBuf>,
    },

    /// IO error encountered while enumerating or reading content.
    #[error("File IO error at `{}`: {source}", .path.display())]
    IOError {
        /// Path associated with the IO error.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// A collection name that does not match any registered collection.
    #[error("Unknown collection `{0}`")]
    UnknownCollection(String),

    /// A lookup by slug found no record. Library lookups return `None`;
    /// this variant is for callers that treat absence as a failure.
    #[error("{collection} `{slug}` not found")]
    NotFound {
        /// Collection that was searched.
        collection: String,
        /// Slug that was looked up.
        slug: String,
    },

    /// General internal error.
    #[error("Internal error: {0}")]
    InternalError(String),
}

impl From<std::io::Error> for LabContentError {
    /// Converts a standard IO error into a `LabContentError::IOError`
    /// with an empty path.
    fn from(source: std::io::Error) -> Self {
        LabContentError::IOError {
            path: PathBuf::new(),
            source,
        }
    }
}

impl LabContentError {
    /// Creates a `ConfigError` with a specific message.
    ///
    /// # Parameters
    /// - `message`: A description of the configuration error.
    /// - `path`: Optional path of the file or directory causing the error.
    pub fn config_error<S: Into<String>>(
        message: S,
        path: Option<PathBuf>,
    ) -> Self {
        LabContentError::ConfigError {
            message: message.into(),
            path,
        }
    }

    /// Wraps an IO error as an `IOError` variant with the specified path.
    pub fn io_error(path: PathBuf, source: std::io::Error) -> Self {
        LabContentError::IOError { path, source }
    }

    /// Creates a `NotFound` error for `slug` in `collection`.
    pub fn not_found<C: ToString, S: Into<String>>(
        collection: C,
        slug: S,
    ) -> Self {
        LabContentError::NotFound {
            collection: collection.to_string(),
            slug: slug.into(),
        }
    }

    /// Creates a general internal error with a custom message.
    pub fn internal_error<S: Into<String>>(message: S) -> Self {
        LabContentError::InternalError(message.into())
    }
}
