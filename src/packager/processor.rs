//! Backend-agnostic package/publish state machine for one distribution.
//!
//! ```text
//! Idle ──prepare──▶ Prepared ──package──▶ Packaging ──▶ Packaged ──publish──▶ Publishing ──▶ Published
//!                                              │                                   │
//!                                              ├──▶ Delegated (remote build)       ├──▶ Delegated (repository push)
//!                                              └──▶ Skipped (unsupported host)     └──▶ Skipped (dry run / unsupported host)
//! ```
//!
//! Any fatal error moves the processor to `Failed`. Files already written stay on disk.

use super::{
    backend::PackagerBackend,
    checksum::calculate_sha256,
    command::{CommandRunner, invoke},
    context::{ExecutionContext, Platform},
    discovery::find_first_with_suffix,
    emission::{EmissionReport, emit_prepared_files},
    error::{Error, Result},
    fs::create_dir_all,
    prepare::render_templates,
    repository::{GitClient, GitRepository, RepositoryOutcome, publish_to_repository},
    template::{TemplateContext, TemplateRenderer, keys, resolve_template},
};
use crate::model::Distribution;
use std::fmt;
use std::path::PathBuf;

/// Lifecycle position of a [`PackagerProcessor`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessorState {
    /// Nothing done yet
    Idle,
    /// Templates rendered into the prepare directory
    Prepared,
    /// Package phase running
    Packaging,
    /// Package built locally
    Packaged,
    /// Publish phase running
    Publishing,
    /// Package uploaded
    Published,
    /// Work handed to a remote build
    Delegated,
    /// Phase skipped on purpose
    Skipped,
    /// A phase failed
    Failed,
}

impl fmt::Display for ProcessorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ProcessorState::Idle => "idle",
            ProcessorState::Prepared => "prepared",
            ProcessorState::Packaging => "packaging",
            ProcessorState::Packaged => "packaged",
            ProcessorState::Publishing => "publishing",
            ProcessorState::Published => "published",
            ProcessorState::Delegated => "delegated",
            ProcessorState::Skipped => "skipped",
            ProcessorState::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Why a phase ended without doing its work.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Host cannot run the package manager's CLI
    UnsupportedPlatform(Platform),
    /// Dry-run mode suppresses publishing
    DryRun,
}

/// Result of the package phase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PackageOutcome {
    /// Package built in the execution directory
    Packaged(EmissionReport),
    /// Files emitted; packing left to the remote build
    Delegated(EmissionReport),
    /// Files emitted; packing skipped
    Skipped(EmissionReport, SkipReason),
}

/// Result of the publish phase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublishOutcome {
    /// Artifact uploaded
    Published {
        /// Uploaded file name, if the backend uploads one
        artifact: Option<String>,
    },
    /// Files pushed to the packager repository
    Delegated(RepositoryOutcome),
    /// Publishing skipped
    Skipped(SkipReason),
}

/// Runs the package and publish phases of one backend for one distribution.
///
/// Owns its [`TemplateContext`] and its execution directory; nothing is shared with
/// other processors. Remote builds publish through `G`.
pub struct PackagerProcessor<'a, B, R, G = GitRepository> {
    context: &'a ExecutionContext,
    backend: &'a B,
    runner: &'a R,
    git: G,
    distribution: &'a Distribution,
    renderer: TemplateRenderer,
    props: Option<TemplateContext>,
    state: ProcessorState,
}

impl<B, R, G> fmt::Debug for PackagerProcessor<'_, B, R, G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PackagerProcessor")
            .field("distribution", &self.distribution.name)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl<'a, B: PackagerBackend, R: CommandRunner> PackagerProcessor<'a, B, R> {
    /// Creates an idle processor.
    pub fn new(
        context: &'a ExecutionContext,
        backend: &'a B,
        runner: &'a R,
        distribution: &'a Distribution,
    ) -> Self {
        Self {
            context,
            backend,
            runner,
            git: GitRepository::new(),
            distribution,
            renderer: TemplateRenderer::new(),
            props: None,
            state: ProcessorState::Idle,
        }
    }
}

impl<'a, B: PackagerBackend, R: CommandRunner, G: GitClient> PackagerProcessor<'a, B, R, G> {
    /// Replaces the git client used for remote-build publishing.
    pub fn with_git_client<H: GitClient>(self, git: H) -> PackagerProcessor<'a, B, R, H> {
        PackagerProcessor {
            context: self.context,
            backend: self.backend,
            runner: self.runner,
            git,
            distribution: self.distribution,
            renderer: self.renderer,
            props: self.props,
            state: self.state,
        }
    }

    /// Current state.
    pub fn state(&self) -> ProcessorState {
        self.state
    }

    /// Directory receiving rendered templates.
    pub fn prepare_directory(&self) -> PathBuf {
        self.context
            .prepare_directory(&self.distribution.name, self.backend.name())
    }

    /// Root directory of emitted package files.
    pub fn package_directory(&self) -> PathBuf {
        self.context
            .package_directory(&self.distribution.name, self.backend.name())
    }

    /// Working directory of the package manager's CLI.
    pub fn execution_directory(&self) -> PathBuf {
        self.package_directory().join(&self.distribution.name)
    }

    /// Builds the template context if it has not been built yet.
    pub async fn resolve_properties(&mut self) -> Result<&TemplateContext> {
        if self.props.is_none() {
            let props = self.build_properties().await?;
            self.props = Some(props);
        }
        self.props_ref()
    }

    /// Renders the backend templates into the prepare directory.
    pub async fn prepare(&mut self) -> Result<Vec<PathBuf>> {
        if !matches!(self.state, ProcessorState::Idle | ProcessorState::Prepared) {
            return Err(self.invalid_state("prepare"));
        }

        let result = self.do_prepare().await;
        self.state = match result {
            Ok(_) => ProcessorState::Prepared,
            Err(_) => ProcessorState::Failed,
        };
        result
    }

    /// Runs the package phase, preparing first when needed.
    pub async fn package(&mut self) -> Result<PackageOutcome> {
        if !matches!(self.state, ProcessorState::Idle | ProcessorState::Prepared) {
            return Err(self.invalid_state("package"));
        }
        if self.state == ProcessorState::Idle {
            self.prepare().await?;
        }

        self.state = ProcessorState::Packaging;
        let result = self.do_package().await;
        self.state = match &result {
            Ok(PackageOutcome::Packaged(_)) => ProcessorState::Packaged,
            Ok(PackageOutcome::Delegated(_)) => ProcessorState::Delegated,
            Ok(PackageOutcome::Skipped(..)) => ProcessorState::Skipped,
            Err(_) => ProcessorState::Failed,
        };
        result
    }

    /// Runs the publish phase.
    ///
    /// Allowed after packaging, or on a fresh processor when the package directory was
    /// produced by an earlier run.
    pub async fn publish(&mut self) -> Result<PublishOutcome> {
        if !matches!(
            self.state,
            ProcessorState::Idle
                | ProcessorState::Prepared
                | ProcessorState::Packaged
                | ProcessorState::Delegated
                | ProcessorState::Skipped
        ) {
            return Err(self.invalid_state("publish"));
        }

        self.state = ProcessorState::Publishing;
        let result = self.do_publish().await;
        self.state = match &result {
            Ok(PublishOutcome::Published { .. }) => ProcessorState::Published,
            Ok(PublishOutcome::Delegated(_)) => ProcessorState::Delegated,
            Ok(PublishOutcome::Skipped(_)) => ProcessorState::Skipped,
            Err(_) => ProcessorState::Failed,
        };
        result
    }

    async fn do_prepare(&mut self) -> Result<Vec<PathBuf>> {
        self.resolve_properties().await?;
        let source = self.backend.templates(self.context);
        let prepare_directory = self.prepare_directory();

        log::info!(
            "preparing {} distribution {}",
            self.backend.name(),
            self.distribution.name
        );
        render_templates(&self.renderer, &source, self.props_ref()?, &prepare_directory).await
    }

    async fn do_package(&mut self) -> Result<PackageOutcome> {
        let backend = self.backend;
        let distribution = self.distribution;
        let releaser = self.context.releaser();

        log::info!("packaging {} distribution {}", backend.name(), distribution.name);
        let package_directory = self.package_directory();
        // Output of earlier runs must not leak into discovery or repository publishing.
        create_dir_all(&package_directory, true).await?;
        let report = emit_prepared_files(
            &self.prepare_directory(),
            &package_directory,
            |relative| backend.route_file(distribution, relative, releaser),
        )
        .await?;

        if backend.is_remote_build() {
            log::info!(
                "{} uses a remote build; packaging of {} is delegated",
                backend.name(),
                distribution.name
            );
            return Ok(PackageOutcome::Delegated(report));
        }

        let required = backend.required_platform();
        if !self.context.is_supported_platform(required) {
            log::warn!(
                "{} packager requires a {} host; skipping packaging of {}",
                backend.name(),
                required,
                distribution.name
            );
            return Ok(PackageOutcome::Skipped(
                report,
                SkipReason::UnsupportedPlatform(required),
            ));
        }

        let execution_directory = self.execution_directory();
        for command in backend.build_commands(distribution, self.props_ref()?)? {
            invoke(self.runner, &execution_directory, &command).await?;
        }

        Ok(PackageOutcome::Packaged(report))
    }

    async fn do_publish(&mut self) -> Result<PublishOutcome> {
        self.resolve_properties().await?;
        let backend = self.backend;
        let distribution = self.distribution;

        if backend.is_remote_build() {
            let target = backend.repository(self.context.releaser());
            let message = resolve_template(&target.commit_message, self.props_ref()?)?;
            let outcome = publish_to_repository(
                self.context,
                &self.git,
                &target,
                &message,
                &self.package_directory(),
            )
            .await?;
            return Ok(PublishOutcome::Delegated(outcome));
        }

        if self.context.is_dry_run() {
            log::warn!(
                "dry-run is set: skipping {} publication of {}",
                backend.name(),
                distribution.name
            );
            return Ok(PublishOutcome::Skipped(SkipReason::DryRun));
        }

        let required = backend.required_platform();
        if !self.context.is_supported_platform(required) {
            log::warn!(
                "{} packager requires a {} host; skipping publication of {}",
                backend.name(),
                required,
                distribution.name
            );
            return Ok(PublishOutcome::Skipped(SkipReason::UnsupportedPlatform(
                required,
            )));
        }

        let plan = backend.publish_commands(distribution, self.props_ref()?)?;
        let execution_directory = self.execution_directory();

        for command in &plan.register {
            invoke(self.runner, &execution_directory, command).await?;
        }

        let Some(upload) = plan.upload else {
            return Ok(PublishOutcome::Published { artifact: None });
        };

        let artifact = find_first_with_suffix(&execution_directory, upload.artifact_suffix())
            .await?
            .ok_or_else(|| Error::ArtifactNotFound {
                suffix: upload.artifact_suffix().to_string(),
                directory: self.context.relativize_to_basedir(&execution_directory),
            })?;

        invoke(
            self.runner,
            &execution_directory,
            &upload.command_for(&artifact),
        )
        .await?;

        log::info!("published {} for {}", artifact, distribution.name);
        Ok(PublishOutcome::Published {
            artifact: Some(artifact),
        })
    }

    async fn build_properties(&self) -> Result<TemplateContext> {
        let project = self.context.project();
        let releaser = self.context.releaser();
        let distribution = self.distribution;
        let mut props = TemplateContext::new();

        props.set(keys::PROJECT_NAME, project.name.as_str());
        props.set(keys::PROJECT_VERSION, project.version.as_str());
        props.set(
            keys::PROJECT_DESCRIPTION,
            project.description.clone().unwrap_or_default(),
        );
        props.set(keys::PROJECT_LICENSE, project.license.clone().unwrap_or_default());
        props.set(
            keys::PROJECT_LICENSE_URL,
            project.license_url.clone().unwrap_or_default(),
        );
        props.set(
            keys::PROJECT_WEBSITE,
            project
                .website
                .clone()
                .unwrap_or_else(|| releaser.resolved_repo_url()),
        );
        props.set(keys::PROJECT_AUTHORS_BY_SPACE, project.authors.join(" "));
        props.set(keys::PROJECT_AUTHORS_BY_COMMA, project.authors.join(","));

        props.set(keys::REPO_OWNER, releaser.owner.as_str());
        props.set(keys::REPO_NAME, releaser.name.as_str());
        props.set(keys::REPO_URL, releaser.resolved_repo_url());
        let tag_name = resolve_template(&project.tag_name, &props)?;
        props.set(keys::TAG_NAME, tag_name);

        props.set(keys::DISTRIBUTION_NAME, distribution.name.as_str());
        props.set(keys::DISTRIBUTION_EXECUTABLE, distribution.executable());
        props.set_path(
            keys::DISTRIBUTION_PACKAGE_DIRECTORY,
            &self.package_directory(),
        );

        props.set(keys::DISTRIBUTION_URL, "");
        props.set(keys::DISTRIBUTION_ARTIFACT_FILE, "");
        props.set(keys::DISTRIBUTION_CHECKSUM_SHA256, "");
        if let Some(artifact) = &distribution.artifact {
            props.set(keys::DISTRIBUTION_URL, artifact.url.as_str());
            props.set(keys::DISTRIBUTION_ARTIFACT_FILE, artifact.file_name());
            if let Some(path) = &artifact.path {
                let checksum = calculate_sha256(&self.context.resolve_path(path)).await?;
                props.set(keys::DISTRIBUTION_CHECKSUM_SHA256, checksum);
            }
        }

        self.backend
            .fill_properties(self.context, distribution, &mut props)?;
        Ok(props)
    }

    fn props_ref(&self) -> Result<&TemplateContext> {
        self.props.as_ref().ok_or_else(|| Error::InvalidState {
            operation: "read properties",
            state: self.state.to_string(),
        })
    }

    fn invalid_state(&self, operation: &'static str) -> Error {
        Error::InvalidState {
            operation,
            state: self.state.to_string(),
        }
    }
}
