//! Chocolatey (Windows package manager) backend.
//!
//! Packs a `.nuspec` manifest with `choco pack` and publishes the resulting `.nupkg`
//! with `choco apikey` + `choco push`. In remote-build mode the rendered files go to
//! a bucket repository whose CI workflow does the packing instead.

mod templates;

pub use templates::DEFAULT_TEMPLATES;

use crate::model::{ChocolateyConfig, Distribution, Releaser};
use crate::packager::{
    backend::{PackagerBackend, PublishPlan, RepositoryTarget, UploadStep},
    command::ToolCommand,
    context::{ExecutionContext, Platform},
    emission::RoutingDecision,
    error::{Error, Result},
    prepare::TemplateSource,
    template::{TemplateContext, keys, resolve_template, trim_tpl_extension},
};
use std::path::PathBuf;

/// Chocolatey CLI program name.
pub const CHOCO: &str = "choco";

/// Extension of the built package.
pub const NUPKG_SUFFIX: &str = ".nupkg";

/// Logical name of the manifest template after `.tpl` is trimmed.
const MANIFEST_TEMPLATE: &str = "binary.nuspec";

/// Chocolatey packager backend.
#[derive(Debug, Clone)]
pub struct ChocolateyBackend {
    config: ChocolateyConfig,
}

impl ChocolateyBackend {
    /// Creates a backend from packager settings.
    pub fn new(config: ChocolateyConfig) -> Self {
        Self { config }
    }

    fn manifest_file_name(&self, distribution: &Distribution) -> String {
        format!("{}.nuspec", self.config.package_name(distribution))
    }
}

impl PackagerBackend for ChocolateyBackend {
    fn name(&self) -> &'static str {
        "chocolatey"
    }

    fn required_platform(&self) -> Platform {
        Platform::Windows
    }

    fn is_remote_build(&self) -> bool {
        self.config.remote_build
    }

    fn templates(&self, context: &ExecutionContext) -> TemplateSource {
        match &self.config.template_directory {
            Some(directory) => TemplateSource::Directory(context.resolve_path(directory)),
            None => TemplateSource::Embedded(DEFAULT_TEMPLATES),
        }
    }

    fn repository(&self, releaser: &Releaser) -> RepositoryTarget {
        let repository = &self.config.repository;
        RepositoryTarget {
            clone_url: releaser
                .repo_clone_url(self.config.repository_owner(releaser), &repository.name),
            branch: repository.branch.clone(),
            commit_message: repository.commit_message.clone(),
        }
    }

    fn fill_properties(
        &self,
        context: &ExecutionContext,
        distribution: &Distribution,
        props: &mut TemplateContext,
    ) -> Result<()> {
        props.set(
            keys::DISTRIBUTION_MAIN_CLASS,
            distribution.main_class.clone().unwrap_or_default(),
        );
        props.set(
            keys::DISTRIBUTION_MAIN_MODULE,
            distribution.main_module.clone().unwrap_or_default(),
        );

        if props.is_blank(keys::PROJECT_LICENSE_URL) {
            log::warn!(
                "project.license_url is not set; the {} package will have no license link",
                distribution.name
            );
        }

        let releaser = context.releaser();
        let owner = self.config.repository_owner(releaser);
        let name = &self.config.repository.name;

        let release_url = releaser.resolved_repo_url();
        let repository_url = releaser.repo_url(owner, name);
        let repository_clone_url = releaser.repo_clone_url(owner, name);

        props.set(keys::CHOCOLATEY_BUCKET_REPO_URL, repository_url.clone());
        props.set(
            keys::CHOCOLATEY_BUCKET_REPO_CLONE_URL,
            repository_clone_url.clone(),
        );
        props.set(
            keys::CHOCOLATEY_PACKAGE_SOURCE_URL,
            if self.config.remote_build {
                repository_url.clone()
            } else {
                release_url
            },
        );
        props.set(keys::CHOCOLATEY_REPOSITORY_URL, repository_url);
        props.set(keys::CHOCOLATEY_REPOSITORY_CLONE_URL, repository_clone_url);

        props.set(
            keys::CHOCOLATEY_PACKAGE_NAME,
            self.config.package_name(distribution),
        );
        let version = resolve_template(&self.config.package_version, props)?;
        props.set(keys::CHOCOLATEY_PACKAGE_VERSION, version);
        props.set(keys::CHOCOLATEY_USERNAME, self.config.username(releaser));
        props.set(keys::CHOCOLATEY_TITLE, self.config.title(context.project()));
        let icon_url = resolve_template(&self.config.icon_url, props)?;
        props.set(keys::CHOCOLATEY_ICON_URL, icon_url);
        props.set(keys::CHOCOLATEY_SOURCE, self.config.source.as_str());

        Ok(())
    }

    fn route_file(
        &self,
        distribution: &Distribution,
        relative_path: &str,
        releaser: &Releaser,
    ) -> RoutingDecision {
        if relative_path.contains(".github")
            && (!self.config.remote_build || !releaser.supports_github_workflows())
        {
            return RoutingDecision::Skip;
        }

        let file_name = trim_tpl_extension(relative_path);

        let target = if file_name == MANIFEST_TEMPLATE {
            PathBuf::from(&distribution.name).join(self.manifest_file_name(distribution))
        } else if file_name.ends_with(".ps1") {
            PathBuf::from(&distribution.name).join(file_name)
        } else {
            PathBuf::from(file_name)
        };

        RoutingDecision::Write(target)
    }

    fn build_commands(
        &self,
        distribution: &Distribution,
        _props: &TemplateContext,
    ) -> Result<Vec<ToolCommand>> {
        Ok(vec![
            ToolCommand::new(CHOCO)
                .arg("pack")
                .arg(self.manifest_file_name(distribution)),
        ])
    }

    fn publish_commands(
        &self,
        _distribution: &Distribution,
        _props: &TemplateContext,
    ) -> Result<PublishPlan> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| Error::MissingConfiguration {
                field: "chocolatey.api_key".to_string(),
            })?;
        let source = &self.config.source;

        Ok(PublishPlan {
            register: vec![
                ToolCommand::new(CHOCO)
                    .arg("apikey")
                    .arg("-k")
                    .secret_arg(api_key)
                    .arg("-source")
                    .arg(source),
            ],
            upload: Some(
                UploadStep::new(CHOCO, NUPKG_SUFFIX)
                    .before_artifact("push")
                    .after_artifact("-s")
                    .after_artifact(source),
            ),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Project, ReleaserKind};
    use std::path::Path;

    fn backend(remote_build: bool) -> ChocolateyBackend {
        ChocolateyBackend::new(ChocolateyConfig {
            package_name: Some("foo".into()),
            remote_build,
            api_key: Some("secret".into()),
            ..Default::default()
        })
    }

    fn github() -> Releaser {
        Releaser::new(ReleaserKind::Github, "acme", "foo")
    }

    fn gitlab() -> Releaser {
        Releaser::new(ReleaserKind::Gitlab, "acme", "foo")
    }

    #[test]
    fn manifest_is_renamed_under_distribution_directory() {
        let distribution = Distribution::new("foo");
        let decision = backend(false).route_file(&distribution, "binary.nuspec.tpl", &github());
        assert_eq!(
            decision,
            RoutingDecision::Write(PathBuf::from("foo").join("foo.nuspec"))
        );
    }

    #[test]
    fn manifest_uses_package_name_not_distribution_name() {
        let distribution = Distribution::new("app");
        let decision = backend(false).route_file(&distribution, "binary.nuspec.tpl", &github());
        assert_eq!(
            decision,
            RoutingDecision::Write(Path::new("app").join("foo.nuspec"))
        );
    }

    #[test]
    fn scripts_go_under_distribution_and_others_under_root() {
        let distribution = Distribution::new("app");
        let backend = backend(false);

        assert_eq!(
            backend.route_file(&distribution, "tools/chocolateyinstall.ps1.tpl", &github()),
            RoutingDecision::Write(Path::new("app").join("tools/chocolateyinstall.ps1"))
        );
        assert_eq!(
            backend.route_file(&distribution, "README.md.tpl", &github()),
            RoutingDecision::Write(PathBuf::from("README.md"))
        );
        assert_eq!(
            backend.route_file(&distribution, "icon.png", &github()),
            RoutingDecision::Write(PathBuf::from("icon.png"))
        );
    }

    #[test]
    fn workflow_files_need_remote_build_on_github() {
        let distribution = Distribution::new("app");
        let workflow = ".github/workflows/publish.yml.tpl";

        assert_eq!(
            backend(false).route_file(&distribution, workflow, &github()),
            RoutingDecision::Skip
        );
        assert_eq!(
            backend(true).route_file(&distribution, workflow, &gitlab()),
            RoutingDecision::Skip
        );
        assert_eq!(
            backend(true).route_file(&distribution, workflow, &github()),
            RoutingDecision::Write(PathBuf::from(".github/workflows/publish.yml"))
        );
    }

    #[test]
    fn routing_is_deterministic() {
        let distribution = Distribution::new("app");
        for remote in [false, true] {
            for releaser in [github(), gitlab()] {
                for path in ["binary.nuspec.tpl", ".github/x.yml.tpl", "tools/a.ps1.tpl"] {
                    let backend = backend(remote);
                    let first = backend.route_file(&distribution, path, &releaser);
                    let second = backend.route_file(&distribution, path, &releaser);
                    assert_eq!(first, second);
                }
            }
        }
    }

    #[test]
    fn pack_command_targets_manifest() {
        let commands = backend(false)
            .build_commands(&Distribution::new("app"), &TemplateContext::new())
            .unwrap();
        assert_eq!(commands.len(), 1);
        assert_eq!(commands[0].program(), "choco");
        assert_eq!(commands[0].args(), ["pack", "foo.nuspec"]);
    }

    #[test]
    fn publish_plan_has_exact_argument_order() {
        let plan = backend(false)
            .publish_commands(&Distribution::new("app"), &TemplateContext::new())
            .unwrap();

        assert_eq!(plan.register.len(), 1);
        assert_eq!(
            plan.register[0].args(),
            ["apikey", "-k", "secret", "-source", "https://push.chocolatey.org/"]
        );
        let upload = plan.upload.unwrap();
        assert_eq!(upload.artifact_suffix(), ".nupkg");
        assert_eq!(
            upload.command_for("foo.1.0.0.nupkg").args(),
            ["push", "foo.1.0.0.nupkg", "-s", "https://push.chocolatey.org/"]
        );
    }

    #[test]
    fn publish_without_api_key_is_a_configuration_error() {
        let backend = ChocolateyBackend::new(ChocolateyConfig::default());
        let err = backend
            .publish_commands(&Distribution::new("app"), &TemplateContext::new())
            .unwrap_err();
        assert!(matches!(err, Error::MissingConfiguration { .. }));
    }

    #[test]
    fn fills_repository_and_package_variables() {
        let mut project = Project::new("App", "1.2.0");
        project.license_url = Some("https://example.com/LICENSE".into());
        let context = ExecutionContext::new("/work", project, github());

        let mut props = TemplateContext::new();
        props.set(keys::PROJECT_VERSION, "1.2.0");
        props.set(keys::PROJECT_LICENSE_URL, "https://example.com/LICENSE");
        props.set(keys::REPO_OWNER, "acme");
        props.set(keys::REPO_NAME, "foo");
        props.set(keys::TAG_NAME, "v1.2.0");

        backend(false)
            .fill_properties(&context, &Distribution::new("app"), &mut props)
            .unwrap();

        assert_eq!(props.get_str(keys::CHOCOLATEY_PACKAGE_NAME).unwrap(), "foo");
        assert_eq!(props.get_str(keys::CHOCOLATEY_PACKAGE_VERSION).unwrap(), "1.2.0");
        assert_eq!(props.get_str(keys::CHOCOLATEY_TITLE).unwrap(), "App");
        assert_eq!(props.get_str(keys::CHOCOLATEY_USERNAME).unwrap(), "acme");
        assert_eq!(
            props.get_str(keys::CHOCOLATEY_BUCKET_REPO_CLONE_URL).unwrap(),
            "https://github.com/acme/chocolatey-bucket.git"
        );
        assert_eq!(
            props.get_str(keys::CHOCOLATEY_PACKAGE_SOURCE_URL).unwrap(),
            "https://github.com/acme/foo"
        );
        assert_eq!(
            props.get_str(keys::CHOCOLATEY_ICON_URL).unwrap(),
            "https://rawcdn.githack.com/acme/foo/v1.2.0/icons/icon.png"
        );
        assert_eq!(props.get_str(keys::DISTRIBUTION_MAIN_CLASS).unwrap(), "");
    }

    #[test]
    fn remote_build_sources_package_from_bucket() {
        let context = ExecutionContext::new("/work", Project::new("App", "1.0.0"), github());
        let mut props = TemplateContext::new();
        props.set(keys::PROJECT_VERSION, "1.0.0");
        props.set(keys::REPO_OWNER, "acme");
        props.set(keys::REPO_NAME, "foo");
        props.set(keys::TAG_NAME, "v1.0.0");

        backend(true)
            .fill_properties(&context, &Distribution::new("app"), &mut props)
            .unwrap();

        assert_eq!(
            props.get_str(keys::CHOCOLATEY_PACKAGE_SOURCE_URL).unwrap(),
            "https://github.com/acme/chocolatey-bucket"
        );
    }
}
