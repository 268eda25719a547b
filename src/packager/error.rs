//! Error types for packager operations.
//!
//! Every fatal condition of the package/publish pipeline is a variant of [`Error`].
//! Skips (remote build, unsupported host, dry run) are not errors and never show up here.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type alias for packager operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the packager pipeline
#[derive(Error, Debug)]
pub enum Error {
    /// A template variable was requested but never set
    #[error("missing template variable: {key}")]
    MissingKey {
        /// Variable name
        key: String,
    },

    /// A template variable holds a value that cannot be converted to the requested type
    #[error("template variable {key} has an invalid value: {reason}")]
    InvalidValue {
        /// Variable name
        key: String,
        /// Conversion failure
        reason: String,
    },

    /// Template could not be parsed or rendered
    #[error("failed to render template {name}: {reason}")]
    Template {
        /// Template name (usually its relative path)
        name: String,
        /// Renderer message
        reason: String,
    },

    /// External tool exited with a nonzero status
    #[error(
        "`{program} {}` failed with exit code {}\n{output}",
        .args.join(" "),
        exit_code_display(.exit_code)
    )]
    ExternalToolFailure {
        /// Program name
        program: String,
        /// Arguments as logged (secrets masked)
        args: Vec<String>,
        /// Exit code, `None` when terminated by a signal
        exit_code: Option<i32>,
        /// Captured stdout and stderr
        output: String,
    },

    /// External tool is not available on `PATH`
    #[error("{program} not found in PATH")]
    ToolNotFound {
        /// Program name
        program: String,
    },

    /// External tool did not finish within the configured timeout
    #[error("{program} did not finish within {seconds}s and was terminated")]
    ToolTimeout {
        /// Program name
        program: String,
        /// Timeout that elapsed
        seconds: u64,
    },

    /// External tool could not be spawned or awaited
    #[error("failed to run `{command}`: {error}")]
    CommandFailed {
        /// Command line (secrets masked)
        command: String,
        /// Underlying error
        #[source]
        error: std::io::Error,
    },

    /// Publish found no built artifact to upload
    #[error("no *{suffix} artifact found in {}", .directory.display())]
    ArtifactNotFound {
        /// Required file name suffix
        suffix: String,
        /// Execution directory, relative to the base directory
        directory: PathBuf,
    },

    /// Filesystem operation failed
    #[error("error {action} {}: {source}", .path.display())]
    Fs {
        /// What was being done
        action: &'static str,
        /// Path involved
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Required packager setting is absent
    #[error("missing configuration value: {field}")]
    MissingConfiguration {
        /// Dotted configuration path, e.g. `chocolatey.api_key`
        field: String,
    },

    /// Operation requested from a state that does not allow it
    #[error("cannot {operation} while processor is {state}")]
    InvalidState {
        /// Requested operation
        operation: &'static str,
        /// Current state name
        state: String,
    },

    /// Git repository operation failed
    #[error("git {operation} failed in {}: {reason}", .repository.display())]
    Git {
        /// Operation name (clone, add, status, commit, push)
        operation: &'static str,
        /// Repository working directory
        repository: PathBuf,
        /// Underlying error message
        reason: String,
    },

    /// Generic error
    #[error("{0}")]
    GenericError(String),
}

fn exit_code_display(code: &Option<i32>) -> String {
    match code {
        Some(code) => code.to_string(),
        None => "<signal>".to_string(),
    }
}

/// Attaches filesystem context to IO results.
pub trait ErrorExt<T> {
    /// Wraps an IO error with the action being performed and the path involved.
    fn fs_context(self, action: &'static str, path: impl AsRef<Path>) -> Result<T>;
}

impl<T> ErrorExt<T> for std::result::Result<T, std::io::Error> {
    fn fs_context(self, action: &'static str, path: impl AsRef<Path>) -> Result<T> {
        self.map_err(|source| Error::Fs {
            action,
            path: path.as_ref().to_path_buf(),
            source,
        })
    }
}

/// Returns early with a [`Error::GenericError`] built from a format string.
#[macro_export]
macro_rules! bail {
    ($($arg:tt)*) => {
        return Err($crate::packager::Error::GenericError(format!($($arg)*)))
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tool_failure_message_carries_arguments_and_code() {
        let err = Error::ExternalToolFailure {
            program: "choco".into(),
            args: vec!["pack".into(), "foo.nuspec".into()],
            exit_code: Some(1),
            output: "boom".into(),
        };
        let message = err.to_string();
        assert!(message.contains("choco pack foo.nuspec"));
        assert!(message.contains("exit code 1"));
        assert!(message.contains("boom"));
    }

    #[test]
    fn fs_context_keeps_path() {
        let result: std::io::Result<()> =
            Err(std::io::Error::new(std::io::ErrorKind::NotFound, "gone"));
        let err = result.fs_context("reading manifest", "/tmp/x.nuspec").unwrap_err();
        match err {
            Error::Fs { action, path, .. } => {
                assert_eq!(action, "reading manifest");
                assert_eq!(path, PathBuf::from("/tmp/x.nuspec"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn git_failure_names_operation_and_checkout() {
        let err = Error::Git {
            operation: "push",
            repository: PathBuf::from("/tmp/checkout"),
            reason: "rejected".into(),
        };
        assert_eq!(err.to_string(), "git push failed in /tmp/checkout: rejected");
    }
}
