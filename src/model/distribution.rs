//! Distribution being packaged.

use serde::Deserialize;
use std::path::PathBuf;

/// One buildable artifact of the project, from a `[[distributions]]` entry.
#[derive(Debug, Clone, Deserialize)]
pub struct Distribution {
    /// Distribution name. Also names the per-distribution output subdirectories.
    pub name: String,

    /// Launcher executable name.
    ///
    /// Default: the distribution name
    #[serde(default)]
    pub executable: Option<String>,

    /// Main entry point class, for JVM style distributions.
    #[serde(default)]
    pub main_class: Option<String>,

    /// Main entry point module, for JVM style distributions.
    #[serde(default)]
    pub main_module: Option<String>,

    /// Archive downloaded by the installed package.
    #[serde(default)]
    pub artifact: Option<DistributionArtifact>,
}

/// Downloadable archive of a distribution.
#[derive(Debug, Clone, Deserialize)]
pub struct DistributionArtifact {
    /// Public download URL.
    pub url: String,

    /// Local copy, used to compute the SHA-256 checksum.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

impl DistributionArtifact {
    /// File name component of the download URL.
    pub fn file_name(&self) -> &str {
        let trimmed = self.url.split(['?', '#']).next().unwrap_or(&self.url);
        trimmed.rsplit('/').next().unwrap_or(trimmed)
    }
}

impl Distribution {
    /// Creates a distribution with only a name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            executable: None,
            main_class: None,
            main_module: None,
            artifact: None,
        }
    }

    /// Returns the executable name, falling back to the distribution name.
    pub fn executable(&self) -> &str {
        self.executable.as_deref().unwrap_or(&self.name)
    }
}
