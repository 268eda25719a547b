//! Seam between the generic processor and a package manager.
//!
//! A backend supplies templates, fills its template variables, routes prepared files,
//! and describes the external commands for building and publishing. The processor owns
//! sequencing, gating and invocation.

use super::command::ToolCommand;
use super::context::{ExecutionContext, Platform};
use super::emission::RoutingDecision;
use super::error::Result;
use super::prepare::TemplateSource;
use super::template::TemplateContext;
use crate::model::{Distribution, Releaser};

/// Commands run by the publish phase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishPlan {
    /// Commands run first, in order (e.g. credential registration)
    pub register: Vec<ToolCommand>,
    /// Upload of a built artifact found in the execution directory
    pub upload: Option<UploadStep>,
}

/// Upload command built around a discovered artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadStep {
    artifact_suffix: String,
    program: String,
    leading: Vec<String>,
    trailing: Vec<String>,
}

impl UploadStep {
    /// Upload with `program` of the first file ending in `artifact_suffix`.
    pub fn new(program: impl Into<String>, artifact_suffix: impl Into<String>) -> Self {
        Self {
            artifact_suffix: artifact_suffix.into(),
            program: program.into(),
            leading: Vec::new(),
            trailing: Vec::new(),
        }
    }

    /// Argument placed before the artifact name.
    pub fn before_artifact(mut self, arg: impl Into<String>) -> Self {
        self.leading.push(arg.into());
        self
    }

    /// Argument placed after the artifact name.
    pub fn after_artifact(mut self, arg: impl Into<String>) -> Self {
        self.trailing.push(arg.into());
        self
    }

    /// Suffix used to discover the artifact.
    pub fn artifact_suffix(&self) -> &str {
        &self.artifact_suffix
    }

    /// Concrete command uploading `artifact`.
    pub fn command_for(&self, artifact: &str) -> ToolCommand {
        let command = self
            .leading
            .iter()
            .fold(ToolCommand::new(&self.program), |cmd, arg| cmd.arg(arg));
        self.trailing
            .iter()
            .fold(command.arg(artifact), |cmd, arg| cmd.arg(arg))
    }
}

/// Packager repository that receives rendered files in remote-build mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryTarget {
    /// Clone URL
    pub clone_url: String,
    /// Branch to push
    pub branch: String,
    /// Commit message template
    pub commit_message: String,
}

/// Package-manager specific hooks.
pub trait PackagerBackend: Sync {
    /// Packager name, used for directory names and logs (e.g. "chocolatey").
    fn name(&self) -> &'static str;

    /// Host platform the package manager's CLI requires.
    fn required_platform(&self) -> Platform;

    /// Whether packing and pushing are delegated to a remote build.
    fn is_remote_build(&self) -> bool;

    /// Templates rendered during the prepare step.
    fn templates(&self, context: &ExecutionContext) -> TemplateSource;

    /// Repository receiving the rendered files when building remotely.
    fn repository(&self, releaser: &Releaser) -> RepositoryTarget;

    /// Adds backend variables on top of the base project/distribution variables.
    fn fill_properties(
        &self,
        context: &ExecutionContext,
        distribution: &Distribution,
        props: &mut TemplateContext,
    ) -> Result<()>;

    /// Decides the output location of one prepared file.
    ///
    /// Must be a pure function of its arguments.
    fn route_file(
        &self,
        distribution: &Distribution,
        relative_path: &str,
        releaser: &Releaser,
    ) -> RoutingDecision;

    /// Commands building the package in the execution directory.
    fn build_commands(
        &self,
        distribution: &Distribution,
        props: &TemplateContext,
    ) -> Result<Vec<ToolCommand>>;

    /// Commands registering credentials and uploading the built package.
    fn publish_commands(
        &self,
        distribution: &Distribution,
        props: &TemplateContext,
    ) -> Result<PublishPlan>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upload_command_places_artifact_between_arguments() {
        let step = UploadStep::new("choco", ".nupkg")
            .before_artifact("push")
            .after_artifact("-s")
            .after_artifact("https://push.chocolatey.org/");

        let cmd = step.command_for("foo.1.0.0.nupkg");
        assert_eq!(cmd.program(), "choco");
        assert_eq!(
            cmd.args(),
            ["push", "foo.1.0.0.nupkg", "-s", "https://push.chocolatey.org/"]
        );
        assert_eq!(step.artifact_suffix(), ".nupkg");
    }
}
