//! Command line argument parsing and validation.
//!
//! This module provides CLI argument parsing using clap,
//! with validation of values clap cannot check on its own.

use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::time::Duration;

/// Default configuration file name, looked up in the base directory.
pub const DEFAULT_CONFIG_FILE: &str = "packager.toml";

/// Pipeline phases to run.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Render templates, emit package files and pack
    Package,
    /// Publish previously packaged files
    Publish,
    /// Package, then publish
    Full,
}

impl Step {
    /// Whether the package phase runs.
    pub fn packages(self) -> bool {
        matches!(self, Step::Package | Step::Full)
    }

    /// Whether the publish phase runs.
    pub fn publishes(self) -> bool {
        matches!(self, Step::Publish | Step::Full)
    }
}

/// Package manager publishing for released distributions
#[derive(Parser, Debug)]
#[command(
    name = "kodegen_bundler_packager",
    version,
    about = "Package manager publishing for released distributions",
    long_about = "Renders Chocolatey packages for each configured distribution, packs them with choco and pushes them.

With chocolatey.remote_build = true the rendered files are committed to the bucket repository instead,
and CI takes over packing and pushing.

Usage:
  kodegen_bundler_packager package
  kodegen_bundler_packager --dry-run full
  kodegen_bundler_packager --config release/packager.toml --distribution app publish

Exit code 0 = every selected distribution was packaged/published or deliberately skipped."
)]
pub struct Args {
    /// Configuration file (defaults to packager.toml in the base directory)
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Project base directory
    #[arg(short, long, value_name = "DIR", default_value = ".")]
    pub basedir: PathBuf,

    /// Output directory, relative paths resolve against the base directory
    #[arg(short, long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Only process these distributions (repeatable)
    #[arg(short, long = "distribution", value_name = "NAME")]
    pub distributions: Vec<String>,

    /// Render and pack, but never publish
    #[arg(long, env = "PACKAGER_DRY_RUN")]
    pub dry_run: bool,

    /// Kill external tools running longer than this many seconds
    #[arg(long, value_name = "SECS")]
    pub tool_timeout: Option<u64>,

    /// Phase to run
    #[arg(value_enum)]
    pub step: Step,
}

impl Args {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate arguments for consistency
    pub fn validate(&self) -> Result<(), String> {
        if self.tool_timeout == Some(0) {
            return Err("--tool-timeout must be greater than zero".to_string());
        }

        if let Some(name) = self.distributions.iter().find(|n| n.trim().is_empty()) {
            return Err(format!("Invalid distribution name: '{}'", name));
        }

        Ok(())
    }

    /// Configuration file to load.
    pub fn config_path(&self) -> PathBuf {
        self.config
            .clone()
            .unwrap_or_else(|| self.basedir.join(DEFAULT_CONFIG_FILE))
    }

    /// External tool timeout, if any.
    pub fn timeout(&self) -> Option<Duration> {
        self.tool_timeout.map(Duration::from_secs)
    }
}
