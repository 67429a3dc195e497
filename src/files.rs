//! Input discovery and output naming.
//!
//! Inputs come as a single file, a directory (scanned one level deep) or a
//! glob pattern. Files whose name already contains the output suffix are
//! skipped so a second run does not clean its own output again.

use std::path::{Path, PathBuf};

use crate::error::Result;

/// File extensions accepted as input, lowercase.
pub const SUPPORTED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "webp", "bmp"];

/// Default suffix appended to output file stems.
pub const DEFAULT_SUFFIX: &str = "_clean";

/// Check if a file has a supported image extension.
#[must_use]
pub fn is_supported_image(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| SUPPORTED_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
}

/// Whether `input` contains glob metacharacters (`*`, `?` or `[`).
#[must_use]
pub fn is_glob_pattern(input: &str) -> bool {
    input.contains(['*', '?', '['])
}

/// Whether `path`'s file name contains `suffix`, ignoring case.
#[must_use]
pub fn has_output_suffix(path: &Path, suffix: &str) -> bool {
    if suffix.is_empty() {
        return false;
    }
    path.file_name()
        .map(|n| n.to_string_lossy().to_lowercase())
        .is_some_and(|name| name.contains(&suffix.to_lowercase()))
}

fn is_candidate(path: &Path, suffix: &str) -> bool {
    path.is_file() && is_supported_image(path) && !has_output_suffix(path, suffix)
}

/// Expand a glob pattern into the supported image files it matches.
///
/// Directories, unsupported extensions and previous outputs are dropped.
/// Unreadable matches are logged and skipped.
///
/// # Errors
///
/// Returns [`crate::Error::Pattern`] if the pattern is malformed.
pub fn expand_glob(pattern: &str, suffix: &str) -> Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = glob::glob(pattern)?
        .filter_map(|entry| match entry {
            Ok(path) => Some(path),
            Err(e) => {
                tracing::warn!(error = %e, "skipping unreadable glob match");
                None
            }
        })
        .filter(|path| is_candidate(path, suffix))
        .collect();
    files.sort();
    Ok(files)
}

/// List supported image files directly inside `dir` (no recursion).
///
/// # Errors
///
/// Returns [`crate::Error::Io`] if the directory cannot be read.
pub fn find_image_files(dir: &Path, suffix: &str) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if is_candidate(&path, suffix) {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Whether `input` names a batch (a directory or a glob) rather than one file.
#[must_use]
pub fn is_batch_input(input: &str) -> bool {
    is_glob_pattern(input) || Path::new(input).is_dir()
}

/// Resolve a command-line input (file, directory or glob) to image paths.
///
/// A plain file is returned as is, even without a supported extension; the
/// decoder gets the final say on it.
///
/// # Errors
///
/// Propagates pattern and directory read errors.
pub fn collect_inputs(input: &str, suffix: &str) -> Result<Vec<PathBuf>> {
    if is_glob_pattern(input) {
        return expand_glob(input, suffix);
    }
    let path = Path::new(input);
    if path.is_dir() {
        find_image_files(path, suffix)
    } else {
        Ok(vec![path.to_path_buf()])
    }
}

/// Output path for `input`: the suffix goes between stem and extension.
///
/// Example: `"photos/cat.png"` with `"_clean"` becomes `"photos/cat_clean.png"`.
#[must_use]
pub fn output_path(input: &Path, suffix: &str) -> PathBuf {
    let stem = input.file_stem().unwrap_or_default().to_string_lossy();
    let name = match input.extension() {
        Some(ext) => format!("{stem}{suffix}.{}", ext.to_string_lossy()),
        None => format!("{stem}{suffix}"),
    };

    match input.parent() {
        Some(parent) if parent != Path::new("") && parent != Path::new(".") => parent.join(name),
        _ => PathBuf::from(name),
    }
}
