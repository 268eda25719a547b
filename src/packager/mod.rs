//! Packager pipeline.
//!
//! A [`PackagerProcessor`] drives one [`PackagerBackend`] for one distribution:
//! templates are rendered into a prepare directory, routed into the package
//! directory, packed with the package manager's CLI and finally published.
//!
//! External tools always run through a [`CommandRunner`] and git through a
//! [`GitClient`], so the whole pipeline can be exercised without the real tools installed.

pub mod backend;
pub mod checksum;
pub mod chocolatey;
pub mod command;
pub mod context;
pub mod discovery;
pub mod emission;
pub mod error;
pub mod fs;
pub mod prepare;
pub mod processor;
pub mod repository;
pub mod template;

pub use backend::{PackagerBackend, PublishPlan, RepositoryTarget, UploadStep};
pub use chocolatey::ChocolateyBackend;
pub use command::{CommandOutput, CommandRunner, ProcessRunner, ToolCommand, invoke};
pub use context::{ExecutionContext, Platform};
pub use discovery::find_first_with_suffix;
pub use emission::{EmissionReport, RoutingDecision, emit_prepared_files};
pub use error::{Error, ErrorExt, Result};
pub use processor::{PackageOutcome, PackagerProcessor, ProcessorState, PublishOutcome, SkipReason};
pub use repository::{GitClient, GitRepository, RepositoryOutcome};
pub use template::{TemplateContext, TemplateRenderer};
