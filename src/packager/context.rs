//! Execution context threaded through every packager call.
//!
//! Carries the dry-run flag, base and output directories, the host platform and the
//! read-only release model. Nothing in the pipeline reads process-wide state.

use crate::model::{Project, Releaser};
use std::fmt;
use std::path::{Path, PathBuf};

/// Host operating system family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    /// Microsoft Windows
    Windows,
    /// Apple macOS
    MacOs,
    /// Linux
    Linux,
    /// Anything else
    Other,
}

impl Platform {
    /// Platform this binary was compiled for.
    pub fn current() -> Self {
        if cfg!(target_os = "windows") {
            Platform::Windows
        } else if cfg!(target_os = "macos") {
            Platform::MacOs
        } else if cfg!(target_os = "linux") {
            Platform::Linux
        } else {
            Platform::Other
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Platform::Windows => "Windows",
            Platform::MacOs => "macOS",
            Platform::Linux => "Linux",
            Platform::Other => "unknown",
        };
        f.write_str(name)
    }
}

/// Explicit context for one packaging run.
///
/// Shared read-only between processors; each processor derives its own
/// distribution-scoped directories from it.
#[derive(Debug, Clone)]
pub struct ExecutionContext {
    basedir: PathBuf,
    output_directory: PathBuf,
    dry_run: bool,
    host: Platform,
    project: Project,
    releaser: Releaser,
}

impl ExecutionContext {
    /// Creates a context rooted at `basedir`.
    ///
    /// Output goes to `<basedir>/out/packager` unless overridden.
    pub fn new(basedir: impl Into<PathBuf>, project: Project, releaser: Releaser) -> Self {
        let basedir = basedir.into();
        let output_directory = basedir.join("out").join("packager");
        Self {
            basedir,
            output_directory,
            dry_run: false,
            host: Platform::current(),
            project,
            releaser,
        }
    }

    /// Overrides the output directory. Relative paths resolve against the base directory.
    pub fn with_output_directory(mut self, directory: impl AsRef<Path>) -> Self {
        self.output_directory = self.resolve_path(directory);
        self
    }

    /// Enables or disables dry-run mode.
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Overrides the detected host platform.
    pub fn with_host_platform(mut self, host: Platform) -> Self {
        self.host = host;
        self
    }

    /// Whether side effects on external systems are suppressed.
    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    /// Whether the host can run tooling that requires `required`.
    pub fn is_supported_platform(&self, required: Platform) -> bool {
        self.host == required
    }

    /// Root of all generated output.
    pub fn output_directory(&self) -> &Path {
        &self.output_directory
    }

    /// Project metadata.
    pub fn project(&self) -> &Project {
        &self.project
    }

    /// Release host.
    pub fn releaser(&self) -> &Releaser {
        &self.releaser
    }

    /// Directory receiving rendered templates for a distribution/packager pair.
    pub fn prepare_directory(&self, distribution: &str, packager: &str) -> PathBuf {
        self.output_directory
            .join("prepare")
            .join(distribution)
            .join(packager)
    }

    /// Directory receiving emitted package files for a distribution/packager pair.
    pub fn package_directory(&self, distribution: &str, packager: &str) -> PathBuf {
        self.output_directory
            .join("package")
            .join(distribution)
            .join(packager)
    }

    /// Resolves `path` against the base directory unless it is absolute.
    pub fn resolve_path(&self, path: impl AsRef<Path>) -> PathBuf {
        let path = path.as_ref();
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.basedir.join(path)
        }
    }

    /// Shortens `path` for messages by stripping the base directory.
    pub fn relativize_to_basedir(&self, path: &Path) -> PathBuf {
        path.strip_prefix(&self.basedir)
            .map(Path::to_path_buf)
            .unwrap_or_else(|_| path.to_path_buf())
    }
}
