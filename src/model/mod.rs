//! Release model read from the packager configuration file.
//!
//! The orchestrator owns these values; the packager pipeline only reads them.

mod chocolatey;
mod distribution;
mod project;
mod release;

pub use chocolatey::{ChocolateyConfig, PackagerRepository};
pub use distribution::{Distribution, DistributionArtifact};
pub use project::Project;
pub use release::{Releaser, ReleaserKind};

use crate::error::{AppError, CliError, Result};
use serde::Deserialize;
use std::path::Path;

/// Environment variable consulted when `chocolatey.api_key` is not in the file.
pub const CHOCOLATEY_API_KEY_ENV: &str = "CHOCOLATEY_API_KEY";

/// Complete packager configuration file.
#[derive(Debug, Clone, Deserialize)]
pub struct PackagerFile {
    /// `[project]`
    pub project: Project,

    /// `[release]`
    pub release: Releaser,

    /// `[[distributions]]`
    #[serde(default)]
    pub distributions: Vec<Distribution>,

    /// `[chocolatey]`
    #[serde(default)]
    pub chocolatey: ChocolateyConfig,
}

impl PackagerFile {
    /// Reads and parses a packager configuration file.
    ///
    /// Falls back to [`CHOCOLATEY_API_KEY_ENV`] for the API key.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            AppError::Cli(CliError::ExecutionFailed {
                command: "read_config".to_string(),
                reason: format!("Failed to read {}: {}", path.display(), e),
            })
        })?;

        let mut file = Self::parse(&contents)?;

        if file.chocolatey.api_key.is_none() {
            file.chocolatey.api_key = std::env::var(CHOCOLATEY_API_KEY_ENV)
                .ok()
                .filter(|key| !key.trim().is_empty());
        }

        Ok(file)
    }

    /// Parses configuration from TOML text.
    pub fn parse(contents: &str) -> Result<Self> {
        let file: Self = toml::from_str(contents)?;

        if file.distributions.is_empty() {
            return Err(AppError::Cli(CliError::InvalidArguments {
                reason: "No [[distributions]] defined in configuration".to_string(),
            }));
        }

        Ok(file)
    }

    /// Looks up a distribution by name.
    pub fn distribution(&self, name: &str) -> Option<&Distribution> {
        self.distributions.iter().find(|d| d.name == name)
    }
}
