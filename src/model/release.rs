//! Release host (git forge) the project publishes to.

use serde::Deserialize;

/// Kind of git forge hosting the release repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReleaserKind {
    /// github.com or GitHub Enterprise
    #[default]
    Github,
    /// gitlab.com or self-hosted GitLab
    Gitlab,
    /// Self-hosted Gitea
    Gitea,
    /// codeberg.org
    Codeberg,
}

impl ReleaserKind {
    fn default_host(self) -> &'static str {
        match self {
            ReleaserKind::Github => "github.com",
            ReleaserKind::Gitlab => "gitlab.com",
            ReleaserKind::Gitea => "gitea.com",
            ReleaserKind::Codeberg => "codeberg.org",
        }
    }
}

/// Release repository settings from the `[release]` table.
///
/// ```toml
/// [release]
/// kind = "github"
/// owner = "acme"
/// name = "app"
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct Releaser {
    /// Forge kind.
    #[serde(default)]
    pub kind: ReleaserKind,

    /// Repository owner (user or organization).
    pub owner: String,

    /// Repository name.
    pub name: String,

    /// Host override for self-hosted forges, e.g. "git.example.com".
    #[serde(default)]
    pub host: Option<String>,
}

impl Releaser {
    /// Creates a releaser on the default host of `kind`.
    pub fn new(kind: ReleaserKind, owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            kind,
            owner: owner.into(),
            name: name.into(),
            host: None,
        }
    }

    fn host(&self) -> &str {
        self.host
            .as_deref()
            .unwrap_or_else(|| self.kind.default_host())
    }

    /// Web URL of the project's own release repository.
    pub fn resolved_repo_url(&self) -> String {
        self.repo_url(&self.owner, &self.name)
    }

    /// Web URL of an arbitrary repository on the same host.
    pub fn repo_url(&self, owner: &str, name: &str) -> String {
        format!("https://{}/{}/{}", self.host(), owner, name)
    }

    /// HTTPS clone URL of an arbitrary repository on the same host.
    pub fn repo_clone_url(&self, owner: &str, name: &str) -> String {
        format!("https://{}/{}/{}.git", self.host(), owner, name)
    }

    /// Whether the host runs `.github` workflow files.
    pub fn supports_github_workflows(&self) -> bool {
        self.kind == ReleaserKind::Github
    }
}
