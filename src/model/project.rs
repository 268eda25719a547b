//! Project metadata shared by every distribution.

use serde::Deserialize;

/// Project metadata.
///
/// Mirrors the `[project]` table of the packager configuration file.
///
/// ```toml
/// [project]
/// name = "app"
/// version = "1.2.0"
/// license = "Apache-2.0"
/// license_url = "https://www.apache.org/licenses/LICENSE-2.0"
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct Project {
    /// Project name.
    pub name: String,

    /// Resolved release version, e.g. "1.2.0".
    pub version: String,

    /// One-line description used in package manifests.
    #[serde(default)]
    pub description: Option<String>,

    /// Authors, e.g. "Jane Doe".
    #[serde(default)]
    pub authors: Vec<String>,

    /// SPDX license identifier.
    #[serde(default)]
    pub license: Option<String>,

    /// URL of the license text. Package managers warn when this is absent.
    #[serde(default)]
    pub license_url: Option<String>,

    /// Project homepage.
    #[serde(default)]
    pub website: Option<String>,

    /// Release tag template, resolved against the template context.
    ///
    /// Default: `v{{projectVersion}}`
    #[serde(default = "default_tag_name")]
    pub tag_name: String,
}

fn default_tag_name() -> String {
    "v{{projectVersion}}".to_string()
}

impl Project {
    /// Creates project metadata with only a name and version set.
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            description: None,
            authors: Vec::new(),
            license: None,
            license_url: None,
            website: None,
            tag_name: default_tag_name(),
        }
    }
}
