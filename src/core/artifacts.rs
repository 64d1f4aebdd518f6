//! Local package artifact discovery and package name derivation

use crate::core::error::{PublishError, PublishResult};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fs::ReadDir;
use std::path::{Path, PathBuf};

/// Directory searched for built packages when none is given
pub const DEFAULT_DIST_DIR: &str = "dist";

/// Source distributions (`.tar.gz`) and wheels
pub const DEFAULT_EXTENSIONS: &[&str] = &[".gz", ".whl"];

#[allow(clippy::unwrap_used)] // literal pattern
static PACKAGE_NAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9](?:[A-Za-z0-9._-]*[A-Za-z0-9])?$").unwrap());

/// Lazy listing of package files directly under one directory.
///
/// Entries are produced in the order the filesystem returns them. The
/// iterator is finite and cannot be restarted.
#[derive(Debug)]
pub struct PackageFiles {
    entries: ReadDir,
    extensions: Vec<String>,
}

impl Iterator for PackageFiles {
    type Item = PathBuf;

    fn next(&mut self) -> Option<Self::Item> {
        for entry in self.entries.by_ref() {
            let Ok(entry) = entry else {
                continue;
            };
            let path = entry.path();
            if path.is_file() && has_extension(&path, &self.extensions) {
                return Some(path);
            }
        }
        None
    }
}

/// Find package files under `path` whose name ends in one of `extensions`.
///
/// `None` selects [`DEFAULT_EXTENSIONS`]. Subdirectories are not searched.
pub fn find_package_files(path: &Path, extensions: Option<&[String]>) -> PublishResult<PackageFiles> {
    let entries = std::fs::read_dir(path)?;
    let extensions = match extensions {
        Some(exts) if !exts.is_empty() => exts.iter().map(|e| normalize_extension(e)).collect(),
        _ => DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
    };
    Ok(PackageFiles {
        entries,
        extensions,
    })
}

fn normalize_extension(ext: &str) -> String {
    if ext.starts_with('.') {
        ext.to_string()
    } else {
        format!(".{}", ext)
    }
}

fn has_extension(path: &Path, extensions: &[String]) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|name| extensions.iter().any(|ext| name.ends_with(ext.as_str())))
}

/// Derive the package name from an artifact file name.
///
/// Source distributions (`.gz`) keep every `-`-delimited token except the
/// trailing version, so `scikit-learn-1.0.1.tar.gz` becomes `scikit-learn`.
/// Wheels use the first token with underscores replaced by hyphens, so
/// `scikit_learn-1.0.1-cp37-cp37m-any.whl` becomes `scikit-learn` too.
pub fn package_name_from_path(path: &Path) -> PublishResult<String> {
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| {
            PublishError::InvalidConfig(format!("Invalid package file name: {}", path.display()))
        })?;

    let name = if file_name.ends_with(".gz") {
        file_name
            .rsplit_once('-')
            .map(|(stem, _version)| stem.to_string())
            .unwrap_or_default()
    } else {
        file_name
            .split('-')
            .next()
            .unwrap_or(file_name)
            .replace('_', "-")
    };
    validate_package_name(&name)?;
    Ok(name)
}

/// Check a package name is usable as a single key segment
pub fn validate_package_name(name: &str) -> PublishResult<()> {
    if PACKAGE_NAME_RE.is_match(name) {
        Ok(())
    } else {
        Err(PublishError::InvalidConfig(format!(
            "Invalid package name '{}': use letters, digits, '.', '_' or '-'",
            name
        )))
    }
}
