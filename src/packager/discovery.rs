//! Artifact discovery in an execution directory.

use crate::packager::error::{ErrorExt, Result};
use std::path::Path;

/// Finds a file in `directory` (not recursing) whose name ends with `suffix`.
///
/// Candidates are sorted by name before the first is picked, so the result does not
/// depend on filesystem iteration order. Returns `Ok(None)` when nothing matches; the
/// caller decides whether that is an error.
pub async fn find_first_with_suffix(directory: &Path, suffix: &str) -> Result<Option<String>> {
    let mut entries = tokio::fs::read_dir(directory)
        .await
        .fs_context("listing directory", directory)?;

    let mut candidates = Vec::new();
    while let Some(entry) = entries
        .next_entry()
        .await
        .fs_context("reading directory entry in", directory)?
    {
        let file_type = entry
            .file_type()
            .await
            .fs_context("reading file type of", entry.path())?;
        if file_type.is_dir() {
            continue;
        }

        if let Some(name) = entry.file_name().to_str() {
            if name.ends_with(suffix) {
                candidates.push(name.to_string());
            }
        }
    }

    candidates.sort();
    Ok(candidates.into_iter().next())
}
