//! # Registry Discovery
//!
//! Loads registry entries from a checkout of the registry repository.
//!
//! Layout: every top-level directory of the root (except tooling directories
//! such as `.git` or `node_modules`) is a registry folder, and every file in a
//! registry folder must be named `<name>.json`. Files at the root itself are
//! not entries. Anything else inside a registry folder, including a nested
//! directory, is rejected rather than silently skipped.

use std::fs;
use std::path::{Path, PathBuf};

use chainreg_core::{RawEntry, ValidationError};
use thiserror::Error;

/// Top-level directories that never hold registry entries.
pub const IGNORED_DIRECTORIES: &[&str] = &[
    ".git",
    ".github",
    "node_modules",
    "src",
    "script",
    "target",
];

/// Failure while loading entries from disk.
#[derive(Error, Debug)]
pub enum DiscoveryError {
    /// The registry content itself is invalid (bad file name, bad JSON, empty).
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The file system could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        /// Path being read.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
}

impl DiscoveryError {
    fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Whether `file_name` is exactly `<name>.json` (extension case-insensitive).
pub fn is_entry_file_name(file_name: &str) -> bool {
    let mut parts = file_name.split('.');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(name), Some(ext), None) => !name.is_empty() && ext.eq_ignore_ascii_case("json"),
        _ => false,
    }
}

/// Load every registry entry under `root`, sorted by path.
///
/// # Errors
///
/// - [`ValidationError::InvalidFileName`] for a misnamed file or a nested
///   directory in a registry folder.
/// - [`ValidationError::InvalidJson`] for a file that does not parse.
/// - [`ValidationError::NoEntriesFound`] when there is nothing to validate.
/// - [`DiscoveryError::Io`] when a directory or file cannot be read.
pub fn discover_entries(root: &Path) -> Result<Vec<RawEntry>, DiscoveryError> {
    let mut entries = Vec::new();

    for folder in registry_folders(root)? {
        tracing::debug!(folder = %folder.display(), "searching registry folder");
        for path in sorted_children(&folder)? {
            entries.push(load_entry(&path)?);
        }
    }

    if entries.is_empty() {
        return Err(ValidationError::NoEntriesFound.into());
    }

    tracing::info!(root = %root.display(), count = entries.len(), "registry entries discovered");
    Ok(entries)
}

fn registry_folders(root: &Path) -> Result<Vec<PathBuf>, DiscoveryError> {
    let mut folders = Vec::new();
    for path in sorted_children(root)? {
        let ignored = path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| IGNORED_DIRECTORIES.contains(&n));
        if path.is_dir() && !ignored {
            folders.push(path);
        }
    }
    Ok(folders)
}

fn sorted_children(dir: &Path) -> Result<Vec<PathBuf>, DiscoveryError> {
    let read_dir = fs::read_dir(dir).map_err(|e| DiscoveryError::io(dir, e))?;
    let mut paths = Vec::new();
    for dir_entry in read_dir {
        let dir_entry = dir_entry.map_err(|e| DiscoveryError::io(dir, e))?;
        paths.push(dir_entry.path());
    }
    paths.sort();
    Ok(paths)
}

fn load_entry(path: &Path) -> Result<RawEntry, DiscoveryError> {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    if path.is_dir() || !is_entry_file_name(&file_name) {
        return Err(ValidationError::InvalidFileName(file_name).into());
    }

    let text = fs::read_to_string(path).map_err(|e| DiscoveryError::io(path, e))?;
    let content = serde_json::from_str(&text).map_err(|e| ValidationError::InvalidJson {
        file: file_name.clone(),
        reason: e.to_string(),
    })?;

    Ok(RawEntry::new(file_name, content))
}
