//! Command line interface for kodegen packager.
//!
//! This module provides the CLI for packager operations: argument parsing,
//! configuration loading, and running every selected distribution.

mod args;
pub mod commands;

pub use args::{Args, DEFAULT_CONFIG_FILE, Step};

use crate::error::{AppError, CliError, Result};
use crate::model::{Distribution, PackagerFile};
use crate::packager::{ChocolateyBackend, ExecutionContext, ProcessRunner};
use commands::{DistributionReport, run_distribution};

/// Main CLI entry point
pub async fn run() -> Result<i32> {
    let args = Args::parse_args();
    execute(&args).await
}

/// Runs the selected step for every selected distribution.
///
/// A failing distribution does not stop the others; all failures are reported together.
pub async fn execute(args: &Args) -> Result<i32> {
    args.validate()
        .map_err(|reason| CliError::InvalidArguments { reason })?;

    let config_path = args.config_path();
    log::debug!("loading configuration from {}", config_path.display());
    let file = PackagerFile::load(&config_path)?;

    let distributions = select_distributions(&file, &args.distributions)?;

    let mut context = ExecutionContext::new(&args.basedir, file.project.clone(), file.release.clone())
        .with_dry_run(args.dry_run);
    if let Some(output_dir) = &args.output_dir {
        context = context.with_output_directory(output_dir);
    }
    if args.dry_run {
        log::warn!("dry-run is set: nothing will be published");
    }

    let runner = match args.timeout() {
        Some(timeout) => ProcessRunner::new().with_timeout(timeout),
        None => ProcessRunner::new(),
    };
    let backend = ChocolateyBackend::new(file.chocolatey.clone());

    let mut failures = Vec::new();
    for distribution in &distributions {
        match run_distribution(&context, &backend, &runner, distribution, args.step).await {
            Ok(report) => print_report(&report),
            Err(e) => {
                log::error!("{}: {}", distribution.name, e);
                failures.push(format!("{}: {}", distribution.name, e));
            }
        }
    }

    if failures.is_empty() {
        return Ok(0);
    }

    Err(AppError::Anyhow(anyhow::anyhow!(
        "{} of {} distribution(s) failed:\n  {}",
        failures.len(),
        distributions.len(),
        failures.join("\n  ")
    )))
}

/// Resolves `--distribution` filters against the configuration, preserving file order.
fn select_distributions<'a>(file: &'a PackagerFile, names: &[String]) -> Result<Vec<&'a Distribution>> {
    if names.is_empty() {
        return Ok(file.distributions.iter().collect());
    }

    if let Some(unknown) = names.iter().find(|name| file.distribution(name).is_none()) {
        return Err(CliError::InvalidArguments {
            reason: format!("Unknown distribution: {}", unknown),
        }
        .into());
    }

    Ok(file
        .distributions
        .iter()
        .filter(|d| names.contains(&d.name))
        .collect())
}

fn print_report(report: &DistributionReport) {
    println!("{}", report.summary());
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file() -> PackagerFile {
        PackagerFile::parse(
            r#"
[project]
name = "app"
version = "1.0.0"

[release]
owner = "acme"
name = "app"

[[distributions]]
name = "app"

[[distributions]]
name = "cli"
"#,
        )
        .unwrap()
    }

    #[test]
    fn selects_all_without_filter() {
        let file = file();
        let selected = select_distributions(&file, &[]).unwrap();
        assert_eq!(selected.len(), 2);
    }

    #[test]
    fn filter_keeps_configuration_order() {
        let file = file();
        let selected = select_distributions(&file, &["cli".into(), "app".into()]).unwrap();
        let names: Vec<_> = selected.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, ["app", "cli"]);
    }

    #[test]
    fn unknown_distribution_is_rejected() {
        let file = file();
        let err = select_distributions(&file, &["nope".into()]).unwrap_err();
        assert!(err.to_string().contains("Unknown distribution: nope"));
    }
}
