//! File system utilities for the packager.
//!
//! Provides file writes with automatic directory creation, sorted file listing and
//! directory copying.

use crate::packager::error::{Error, ErrorExt, Result};
use std::io;
use std::path::{Component, Path, PathBuf};
use tokio::fs;

/// Writes `contents` to `path`, creating any parent directories as needed.
///
/// Existing files are overwritten.
pub async fn write_file(path: &Path, contents: impl AsRef<[u8]>) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .await
            .fs_context("creating directory", parent)?;
    }
    fs::write(path, contents)
        .await
        .fs_context("writing file", path)
}

/// Creates all of the directories of the specified path, erasing it first if specified.
pub async fn create_dir_all(path: &Path, erase: bool) -> Result<()> {
    if erase {
        // Try removal, ignore NotFound (idempotent)
        match fs::remove_dir_all(path).await {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(e).fs_context("removing directory", path),
        }
    }

    fs::create_dir_all(path)
        .await
        .fs_context("creating directory", path)
}

/// Lists regular files below `root`, as paths relative to `root`, sorted by path.
pub async fn list_files(root: &Path) -> Result<Vec<PathBuf>> {
    let root = root.to_path_buf();

    // Offload blocking iteration to the dedicated thread pool
    tokio::task::spawn_blocking(move || {
        let mut files = Vec::new();
        for entry in walkdir::WalkDir::new(&root).sort_by_file_name() {
            let entry = entry.map_err(|e| {
                let path = e.path().unwrap_or(&root).to_path_buf();
                Error::Fs {
                    action: "walking directory",
                    path,
                    source: io::Error::from(e),
                }
            })?;
            if !entry.file_type().is_file() {
                continue;
            }
            let relative = entry
                .path()
                .strip_prefix(&root)
                .map_err(|e| Error::GenericError(format!("{}: {}", entry.path().display(), e)))?;
            files.push(relative.to_path_buf());
        }
        Ok(files)
    })
    .await
    .map_err(|e| Error::GenericError(format!("Directory listing task panicked: {}", e)))?
}

/// Copies every file below `from` into `to`, keeping relative paths and overwriting
/// existing files.
pub async fn copy_dir_contents(from: &Path, to: &Path) -> Result<Vec<PathBuf>> {
    if !from.is_dir() {
        crate::bail!("{} is not a directory", from.display());
    }

    let files = list_files(from).await?;
    for relative in &files {
        let source = from.join(relative);
        let target = to.join(relative);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)
                .await
                .fs_context("creating directory", parent)?;
        }
        fs::copy(&source, &target)
            .await
            .fs_context("copying file", &source)?;
    }
    Ok(files)
}

/// Forward-slash form of a relative path, independent of the host separator.
pub fn to_slash_path(relative: &Path) -> String {
    relative
        .components()
        .filter_map(|component| match component {
            Component::Normal(part) => Some(part.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn write_file_creates_parents_and_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("a/b/c.txt");

        write_file(&target, "one").await.unwrap();
        write_file(&target, "two").await.unwrap();

        assert_eq!(std::fs::read_to_string(&target).unwrap(), "two");
    }

    #[tokio::test]
    async fn list_files_is_sorted_and_relative() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("tools")).unwrap();
        std::fs::write(dir.path().join("tools/b.ps1"), "").unwrap();
        std::fs::write(dir.path().join("a.nuspec"), "").unwrap();
        std::fs::write(dir.path().join("README.md"), "").unwrap();

        let files = list_files(dir.path()).await.unwrap();
        let names: Vec<String> = files.iter().map(|p| to_slash_path(p)).collect();
        assert_eq!(names, vec!["README.md", "a.nuspec", "tools/b.ps1"]);
    }

    #[tokio::test]
    async fn create_dir_all_with_erase_clears_contents() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("prepare");
        std::fs::create_dir_all(&target).unwrap();
        std::fs::write(target.join("stale.txt"), "").unwrap();

        create_dir_all(&target, true).await.unwrap();

        assert!(target.is_dir());
        assert!(!target.join("stale.txt").exists());
    }

    #[tokio::test]
    async fn copy_dir_contents_mirrors_tree() {
        let dir = tempfile::tempdir().unwrap();
        let from = dir.path().join("from");
        let to = dir.path().join("to");
        std::fs::create_dir_all(from.join("app/tools")).unwrap();
        std::fs::write(from.join("app/tools/x.ps1"), "x").unwrap();
        std::fs::create_dir_all(&to).unwrap();
        std::fs::write(to.join("keep.txt"), "k").unwrap();

        let copied = copy_dir_contents(&from, &to).await.unwrap();

        assert_eq!(copied.len(), 1);
        assert_eq!(std::fs::read_to_string(to.join("app/tools/x.ps1")).unwrap(), "x");
        assert!(to.join("keep.txt").exists());
    }
}
