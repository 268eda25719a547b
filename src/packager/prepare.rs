//! Renders a template tree into the prepare directory.
//!
//! Files ending in `.tpl` are rendered against the [`TemplateContext`]; anything else
//! (icons, static scripts) is copied byte for byte. Relative paths and file names are
//! kept as-is so the emission stage sees the original template names.

use super::error::{ErrorExt, Result};
use super::fs::{create_dir_all, list_files, to_slash_path, write_file};
use super::template::{TPL_EXTENSION, TemplateContext, TemplateRenderer};
use std::path::{Path, PathBuf};

/// Template compiled into the binary.
#[derive(Debug, Clone, Copy)]
pub struct EmbeddedTemplate {
    /// Relative path, `/` separated
    pub path: &'static str,
    /// Template text
    pub content: &'static str,
}

/// Where a backend's templates come from.
#[derive(Debug, Clone)]
pub enum TemplateSource {
    /// User-supplied directory
    Directory(PathBuf),
    /// Built-in defaults
    Embedded(&'static [EmbeddedTemplate]),
}

/// Renders `source` into `prepare_dir`, which is emptied first.
///
/// Returns the written paths relative to `prepare_dir`.
pub async fn render_templates(
    renderer: &TemplateRenderer,
    source: &TemplateSource,
    context: &TemplateContext,
    prepare_dir: &Path,
) -> Result<Vec<PathBuf>> {
    create_dir_all(prepare_dir, true).await?;

    let mut written = Vec::new();
    match source {
        TemplateSource::Embedded(templates) => {
            for template in templates.iter() {
                let content = renderer.render(template.path, template.content, context)?;
                let relative = PathBuf::from(template.path);
                write_file(&prepare_dir.join(&relative), content).await?;
                written.push(relative);
            }
        }
        TemplateSource::Directory(directory) => {
            for relative in list_files(directory).await? {
                let name = to_slash_path(&relative);
                let source_file = directory.join(&relative);
                let target = prepare_dir.join(&relative);

                if name.ends_with(TPL_EXTENSION) {
                    let template = tokio::fs::read_to_string(&source_file)
                        .await
                        .fs_context("reading template", &source_file)?;
                    let content = renderer.render(&name, &template, context)?;
                    write_file(&target, content).await?;
                } else {
                    let bytes = tokio::fs::read(&source_file)
                        .await
                        .fs_context("reading template resource", &source_file)?;
                    write_file(&target, bytes).await?;
                }
                written.push(relative);
            }
        }
    }

    log::debug!(
        "rendered {} template file(s) into {}",
        written.len(),
        prepare_dir.display()
    );
    Ok(written)
}
