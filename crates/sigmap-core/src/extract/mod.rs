//! Source-tree scanner producing [`RelationshipRecord`]s from `@receiver(...)` decorators.

mod lexer;
mod scan;

pub use scan::{ReceiverBinding, ScanError, scan_source};

use crate::error::{Error, Result};
use crate::model::RelationshipRecord;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Marker file that identifies a Django project root.
pub const DJANGO_PROJECT_MARKER: &str = "manage.py";

#[derive(Debug, Clone)]
pub struct ExtractOptions {
    /// When set, the root must contain this file or extraction fails with
    /// [`Error::NotAProject`].
    pub project_marker: Option<String>,
    /// File extensions (without the dot, compared case-sensitively) that are scanned.
    pub extensions: Vec<String>,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            project_marker: None,
            extensions: vec!["py".to_string()],
        }
    }
}

impl ExtractOptions {
    /// Defaults plus the `manage.py` project check.
    pub fn django() -> Self {
        Self {
            project_marker: Some(DJANGO_PROJECT_MARKER.to_string()),
            ..Self::default()
        }
    }

    fn wants(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| self.extensions.iter().any(|want| want == ext))
    }
}

fn validate_root(root: &Path, options: &ExtractOptions) -> Result<()> {
    let metadata = match std::fs::metadata(root) {
        Ok(m) => m,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return Err(Error::RootNotFound {
                path: root.to_path_buf(),
            });
        }
        Err(source) => {
            return Err(Error::RootUnreadable {
                path: root.to_path_buf(),
                source,
            });
        }
    };
    if !metadata.is_dir() {
        return Err(Error::RootNotDirectory {
            path: root.to_path_buf(),
        });
    }
    std::fs::read_dir(root).map_err(|source| Error::RootUnreadable {
        path: root.to_path_buf(),
        source,
    })?;

    if let Some(marker) = options.project_marker.as_deref() {
        if !root.join(marker).is_file() {
            return Err(Error::NotAProject {
                path: root.to_path_buf(),
                marker: marker.to_string(),
            });
        }
    }
    Ok(())
}

/// Scans one file. Any failure (I/O, non UTF-8 content, malformed tokens) is a skip.
fn scan_file(path: &Path) -> std::result::Result<Vec<RelationshipRecord>, String> {
    let src = std::fs::read_to_string(path).map_err(|e| e.to_string())?;
    let bindings = scan_source(&src).map_err(|e| e.to_string())?;
    let source_file = path.display().to_string();
    Ok(bindings
        .into_iter()
        .map(|b| RelationshipRecord::new(b.event, b.sender, b.function, source_file.clone()))
        .collect())
}

/// Walks `root` and returns every receiver binding found, files in name-sorted walk order.
///
/// Only root-level problems are errors. Unreadable directories and files that fail to scan are
/// logged and skipped.
pub fn extract(root: &Path, options: &ExtractOptions) -> Result<Vec<RelationshipRecord>> {
    validate_root(root, options)?;

    let mut records = Vec::new();
    let mut scanned = 0usize;
    let mut skipped: Vec<PathBuf> = Vec::new();

    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                tracing::warn!(error = %err, "skipping unreadable directory entry");
                continue;
            }
        };
        if !entry.file_type().is_file() || !options.wants(entry.path()) {
            continue;
        }
        scanned += 1;
        match scan_file(entry.path()) {
            Ok(found) => records.extend(found),
            Err(reason) => {
                tracing::debug!(path = %entry.path().display(), %reason, "skipping file");
                skipped.push(entry.into_path());
            }
        }
    }

    tracing::info!(
        root = %root.display(),
        scanned,
        skipped = skipped.len(),
        records = records.len(),
        "extraction finished"
    );
    Ok(records)
}
