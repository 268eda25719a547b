//! Package manager publishing for released distributions.
//!
//! This library renders package metadata for a package manager, builds the package
//! with the manager's own CLI and publishes it:
//! - Chocolatey (`.nuspec` + PowerShell install scripts, `choco pack` / `choco push`)
//! - Remote builds through a git "bucket" repository
//!
//! It can be used both as a CLI tool and as a library dependency.

pub mod cli;
pub mod error;
pub mod model;
pub mod packager;

// Re-export commonly used types
pub use error::{AppError, CliError, Result};
