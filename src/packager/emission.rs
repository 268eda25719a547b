//! File emission: routes each prepared file to its final location in the package
//! directory and writes it.
//!
//! Routing is a pure function supplied by the backend; this stage only walks the tree,
//! applies decisions and performs the writes. Files are visited in sorted order and
//! existing output is overwritten.

use super::error::{ErrorExt, Result};
use super::fs::{list_files, to_slash_path, write_file};
use std::path::{Path, PathBuf};

/// Where a prepared file ends up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoutingDecision {
    /// Do not emit the file.
    Skip,
    /// Emit the file at this path, relative to the output root.
    Write(PathBuf),
}

/// Files written and skipped by one emission run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmissionReport {
    /// Absolute paths of written files
    pub written: Vec<PathBuf>,
    /// Relative paths of skipped files
    pub skipped: Vec<String>,
}

/// Emits every file of `prepared_dir` into `output_dir` following `route`.
///
/// `route` receives the file's path relative to `prepared_dir` with `/` separators.
pub async fn emit_prepared_files<F>(
    prepared_dir: &Path,
    output_dir: &Path,
    route: F,
) -> Result<EmissionReport>
where
    F: Fn(&str) -> RoutingDecision,
{
    let mut report = EmissionReport::default();

    for relative in list_files(prepared_dir).await? {
        let relative_name = to_slash_path(&relative);

        match route(&relative_name) {
            RoutingDecision::Skip => {
                log::debug!("skipping {}", relative_name);
                report.skipped.push(relative_name);
            }
            RoutingDecision::Write(target) => {
                let source = prepared_dir.join(&relative);
                let content = tokio::fs::read(&source)
                    .await
                    .fs_context("reading prepared file", &source)?;

                let output_file = output_dir.join(target);
                log::debug!("writing {}", output_file.display());
                write_file(&output_file, content).await?;
                report.written.push(output_file);
            }
        }
    }

    Ok(report)
}
