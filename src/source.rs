// Copyright © 2024 LabContent. All rights reserved.
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Enumerating and reading content files.
//!
//! Files are returned in file-name order so that every pass over a directory
//! (loading, de-duplication, checking) sees the same sequence.

use std::fs;
use std::path::{Path, PathBuf};

use crate::core::error::{LabContentError, Result};

/// Lists the regular files in `dir` whose extension is `extension`,
/// sorted by file name. Sub-directories are not visited.
///
/// # Errors
///
/// Returns `LabContentError::IOError` if the directory cannot be read.
pub fn list_content_files<P: AsRef<Path>>(
    dir: P,
    extension: &str,
) -> Result<Vec<PathBuf>> {
    let dir = dir.as_ref();
    let entries = fs::read_dir(dir)
        .map_err(|e| LabContentError::io_error(dir.to_path_buf(), e))?;

    let mut files = Vec::new();
    for entry in entries {
        let entry =
            entry.map_err(|e| LabContentError::io_error(dir.to_path_buf(), e))?;
        let path = entry.path();
        if path.is_file() && has_extension(&path, extension) {
            files.push(path);
        }
    }
    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

/// Reads a content file as UTF-8.
///
/// # Errors
///
/// Returns `LabContentError::IOError` carrying the path if reading fails.
pub fn read_content<P: AsRef<Path>>(path: P) -> Result<String> {
    let path = path.as_ref();
    fs::read_to_string(path)
        .map_err(|e| LabContentError::io_error(path.to_path_buf(), e))
}

/// File name without its extension.
pub fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension().and_then(|ext| ext.to_str()) == Some(extension)
}
