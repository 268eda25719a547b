//! Chocolatey packager settings.

use super::{Distribution, Project, Releaser};
use serde::Deserialize;
use std::path::PathBuf;

/// Chocolatey packager configuration from the `[chocolatey]` table.
///
/// ```toml
/// [chocolatey]
/// package_name = "app"
/// remote_build = false
/// source = "https://push.chocolatey.org/"
///
/// [chocolatey.repository]
/// name = "chocolatey-bucket"
/// ```
///
/// The API key may be omitted from the file and supplied through
/// `CHOCOLATEY_API_KEY` instead.
#[derive(Clone, Debug, Deserialize)]
pub struct ChocolateyConfig {
    /// Package id on the feed.
    ///
    /// Default: the distribution name
    #[serde(default)]
    pub package_name: Option<String>,

    /// Package version template.
    ///
    /// Default: `{{projectVersion}}`
    #[serde(default = "default_package_version")]
    pub package_version: String,

    /// Display title.
    ///
    /// Default: the project name
    #[serde(default)]
    pub title: Option<String>,

    /// Feed account that owns the package.
    ///
    /// Default: the release repository owner
    #[serde(default)]
    pub username: Option<String>,

    /// Icon URL template.
    #[serde(default = "default_icon_url")]
    pub icon_url: String,

    /// Feed API key. Required for local publishing.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Push source (feed URL).
    #[serde(default = "default_source")]
    pub source: String,

    /// Delegate packing and pushing to CI in the bucket repository.
    #[serde(default)]
    pub remote_build: bool,

    /// Repository receiving the rendered files in remote-build mode.
    #[serde(default)]
    pub repository: PackagerRepository,

    /// Directory with custom templates, relative to the base directory.
    ///
    /// Default: None (embedded templates)
    #[serde(default)]
    pub template_directory: Option<PathBuf>,
}

/// Packager-owned git repository (the "bucket").
#[derive(Clone, Debug, Deserialize)]
pub struct PackagerRepository {
    /// Owner. Default: the release repository owner
    #[serde(default)]
    pub owner: Option<String>,

    /// Repository name.
    #[serde(default = "default_repository_name")]
    pub name: String,

    /// Branch receiving commits.
    #[serde(default = "default_branch")]
    pub branch: String,

    /// Commit message template.
    #[serde(default = "default_commit_message")]
    pub commit_message: String,
}

fn default_package_version() -> String {
    "{{projectVersion}}".to_string()
}

fn default_icon_url() -> String {
    "https://rawcdn.githack.com/{{repoOwner}}/{{repoName}}/{{tagName}}/icons/icon.png".to_string()
}

fn default_source() -> String {
    "https://push.chocolatey.org/".to_string()
}

fn default_repository_name() -> String {
    "chocolatey-bucket".to_string()
}

fn default_branch() -> String {
    "main".to_string()
}

fn default_commit_message() -> String {
    "{{distributionName}} {{chocolateyPackageVersion}}".to_string()
}

impl Default for PackagerRepository {
    fn default() -> Self {
        Self {
            owner: None,
            name: default_repository_name(),
            branch: default_branch(),
            commit_message: default_commit_message(),
        }
    }
}

impl Default for ChocolateyConfig {
    fn default() -> Self {
        Self {
            package_name: None,
            package_version: default_package_version(),
            title: None,
            username: None,
            icon_url: default_icon_url(),
            api_key: None,
            source: default_source(),
            remote_build: false,
            repository: PackagerRepository::default(),
            template_directory: None,
        }
    }
}

impl ChocolateyConfig {
    /// Package id for `distribution`.
    pub fn package_name<'a>(&'a self, distribution: &'a Distribution) -> &'a str {
        self.package_name.as_deref().unwrap_or(&distribution.name)
    }

    /// Display title for `project`.
    pub fn title<'a>(&'a self, project: &'a Project) -> &'a str {
        self.title.as_deref().unwrap_or(&project.name)
    }

    /// Feed username.
    pub fn username<'a>(&'a self, releaser: &'a Releaser) -> &'a str {
        self.username.as_deref().unwrap_or(&releaser.owner)
    }

    /// Bucket repository owner.
    pub fn repository_owner<'a>(&'a self, releaser: &'a Releaser) -> &'a str {
        self.repository.owner.as_deref().unwrap_or(&releaser.owner)
    }
}
