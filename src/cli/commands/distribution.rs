//! Runs the packager pipeline for one distribution.

use crate::cli::Step;
use crate::model::Distribution;
use crate::packager::{
    CommandRunner, ExecutionContext, PackageOutcome, PackagerBackend, PackagerProcessor,
    ProcessorState, PublishOutcome, RepositoryOutcome, Result, SkipReason,
};

/// What happened to one distribution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DistributionReport {
    /// Distribution name
    pub distribution: String,
    /// Backend name
    pub packager: &'static str,
    /// Package phase result, when it ran
    pub package: Option<PackageOutcome>,
    /// Publish phase result, when it ran
    pub publish: Option<PublishOutcome>,
    /// Final processor state
    pub state: ProcessorState,
}

impl DistributionReport {
    /// One line per phase, for terminal output.
    pub fn summary(&self) -> String {
        let mut lines = vec![format!(
            "{} [{}]: {}",
            self.distribution, self.packager, self.state
        )];

        if let Some(outcome) = &self.package {
            let line = match outcome {
                PackageOutcome::Packaged(report) => {
                    format!("  package: packed ({} files)", report.written.len())
                }
                PackageOutcome::Delegated(report) => {
                    format!("  package: delegated to remote build ({} files)", report.written.len())
                }
                PackageOutcome::Skipped(report, reason) => format!(
                    "  package: skipped, {} ({} files emitted)",
                    describe_skip(*reason),
                    report.written.len()
                ),
            };
            lines.push(line);
        }

        if let Some(outcome) = &self.publish {
            let line = match outcome {
                PublishOutcome::Published {
                    artifact: Some(artifact),
                } => format!("  publish: pushed {}", artifact),
                PublishOutcome::Published { artifact: None } => "  publish: done".to_string(),
                PublishOutcome::Delegated(RepositoryOutcome::Pushed) => {
                    "  publish: pushed to repository".to_string()
                }
                PublishOutcome::Delegated(RepositoryOutcome::NoChanges) => {
                    "  publish: repository already up to date".to_string()
                }
                PublishOutcome::Delegated(RepositoryOutcome::DryRun) => {
                    "  publish: committed locally, push skipped (dry run)".to_string()
                }
                PublishOutcome::Skipped(reason) => {
                    format!("  publish: skipped, {}", describe_skip(*reason))
                }
            };
            lines.push(line);
        }

        lines.join("\n")
    }
}

fn describe_skip(reason: SkipReason) -> String {
    match reason {
        SkipReason::UnsupportedPlatform(required) => format!("requires a {} host", required),
        SkipReason::DryRun => "dry run".to_string(),
    }
}

/// Runs `step` for `distribution` with a fresh processor.
pub async fn run_distribution<B, R>(
    context: &ExecutionContext,
    backend: &B,
    runner: &R,
    distribution: &Distribution,
    step: Step,
) -> Result<DistributionReport>
where
    B: PackagerBackend,
    R: CommandRunner,
{
    let mut processor = PackagerProcessor::new(context, backend, runner, distribution);

    let package = if step.packages() {
        Some(processor.package().await?)
    } else {
        None
    };

    let publish = if step.publishes() {
        Some(processor.publish().await?)
    } else {
        None
    };

    Ok(DistributionReport {
        distribution: distribution.name.clone(),
        packager: backend.name(),
        package,
        publish,
        state: processor.state(),
    })
}
