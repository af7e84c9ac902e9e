//! Discovery and hashing of interface-definition source files.

use std::path::{Path, PathBuf};

use schemagen_common::ContentHash;
use serde::{Deserialize, Serialize};

/// File extensions recognized as interface-definition sources.
pub const SOURCE_EXTENSIONS: &[&str] = &["smithy", "json"];

/// A discovered source file together with the hash of its content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputFile {
    /// Location of the file.
    pub path: PathBuf,
    /// XXH3 hash of the file content at scan time.
    pub content_hash: ContentHash,
}

/// The ordered set of source files a generation request reads.
///
/// Files are sorted by path so that two scans of an unchanged directory
/// produce equal sets.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputSet {
    files: Vec<InputFile>,
}

impl InputSet {
    /// Scans `dir` recursively for interface-definition files.
    ///
    /// A missing directory yields an empty set. Files that cannot be read are
    /// skipped with a warning rather than failing the scan.
    pub fn scan(dir: &Path) -> Self {
        if !dir.is_dir() {
            tracing::debug!(dir = %dir.display(), "input directory absent, using empty input set");
            return Self::default();
        }

        let mut paths = Vec::new();
        walk_dir(dir, &mut paths);
        paths.sort();

        let files = paths
            .into_iter()
            .filter_map(|path| match std::fs::read(&path) {
                Ok(content) => Some(InputFile {
                    content_hash: ContentHash::from_bytes(&content),
                    path,
                }),
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "skipping unreadable input");
                    None
                }
            })
            .collect();

        Self { files }
    }

    /// Iterates over the file paths in scan order.
    pub fn paths(&self) -> impl Iterator<Item = &Path> {
        self.files.iter().map(|f| f.path.as_path())
    }

    /// Returns the number of files.
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Returns `true` if no source files were found.
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

/// Returns `true` if the path has an interface-definition extension.
pub fn is_interface_definition(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| SOURCE_EXTENSIONS.contains(&ext))
}

fn walk_dir(dir: &Path, out: &mut Vec<PathBuf>) {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::warn!(dir = %dir.display(), error = %e, "cannot list input directory");
            return;
        }
    };
    // Symlinked directories are not followed.
    for entry in entries.flatten() {
        let path = entry.path();
        let Ok(file_type) = entry.file_type() else {
            tracing::warn!(path = %path.display(), "cannot stat input entry, skipping");
            continue;
        };
        if file_type.is_dir() {
            walk_dir(&path, out);
        } else if file_type.is_symlink() && path.is_dir() {
            tracing::debug!(path = %path.display(), "not following symlinked directory");
        } else if is_interface_definition(&path) {
            out.push(path);
        }
    }
}
