//! External tool invocation.
//!
//! [`ToolCommand`] describes a program and its arguments, a [`CommandRunner`] executes it,
//! and [`invoke`] logs the command line and turns a nonzero exit into
//! [`Error::ExternalToolFailure`]. There are no retries.

use crate::packager::error::{Error, Result};
use std::future::Future;
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

const SECRET_MASK: &str = "********";

/// Program plus ordered arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolCommand {
    program: String,
    args: Vec<String>,
    secrets: Vec<usize>,
}

impl ToolCommand {
    /// Creates a command for `program` with no arguments.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            secrets: Vec::new(),
        }
    }

    /// Appends an argument.
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Appends an argument that must never appear in logs or error messages.
    pub fn secret_arg(mut self, arg: impl Into<String>) -> Self {
        self.secrets.push(self.args.len());
        self.args.push(arg.into());
        self
    }

    /// Program name.
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Arguments exactly as passed to the process.
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Arguments with secrets masked.
    pub fn display_args(&self) -> Vec<String> {
        self.args
            .iter()
            .enumerate()
            .map(|(i, arg)| {
                if self.secrets.contains(&i) {
                    SECRET_MASK.to_string()
                } else {
                    arg.clone()
                }
            })
            .collect()
    }

    /// Program and masked arguments joined by spaces.
    pub fn command_line(&self) -> String {
        let mut parts = vec![self.program.clone()];
        parts.extend(self.display_args());
        parts.join(" ")
    }
}

/// Captured result of one external process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code, `None` when terminated by a signal
    pub exit_code: Option<i32>,
    /// Whether the process exited successfully
    pub success: bool,
    /// Captured stdout
    pub stdout: String,
    /// Captured stderr
    pub stderr: String,
}

impl CommandOutput {
    /// Successful output with the given stdout.
    pub fn success(stdout: impl Into<String>) -> Self {
        Self {
            exit_code: Some(0),
            success: true,
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    /// Failed output with the given exit code and stderr.
    pub fn failure(exit_code: i32, stderr: impl Into<String>) -> Self {
        Self {
            exit_code: Some(exit_code),
            success: false,
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }

    /// Stdout followed by stderr, for diagnostics.
    pub fn combined(&self) -> String {
        match (self.stdout.trim().is_empty(), self.stderr.trim().is_empty()) {
            (false, false) => format!("{}\n{}", self.stdout.trim_end(), self.stderr.trim_end()),
            (false, true) => self.stdout.trim_end().to_string(),
            (true, false) => self.stderr.trim_end().to_string(),
            (true, true) => String::new(),
        }
    }
}

/// Executes external commands.
///
/// Implementations report spawn/IO problems as errors but return nonzero exits as a
/// regular [`CommandOutput`]; [`invoke`] decides that a nonzero exit is fatal.
pub trait CommandRunner: Sync {
    /// Runs `command` in `working_dir` and waits for it to finish.
    fn execute(
        &self,
        working_dir: &Path,
        command: &ToolCommand,
    ) -> impl Future<Output = Result<CommandOutput>> + Send;
}

/// Runs commands as real child processes.
#[derive(Debug, Clone, Default)]
pub struct ProcessRunner {
    timeout: Option<Duration>,
}

impl ProcessRunner {
    /// Creates a runner that waits indefinitely.
    pub fn new() -> Self {
        Self::default()
    }

    /// Kills processes still running after `timeout`.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

impl CommandRunner for ProcessRunner {
    async fn execute(&self, working_dir: &Path, command: &ToolCommand) -> Result<CommandOutput> {
        let program = which::which(command.program()).map_err(|e| {
            log::debug!("{} not found in PATH: {}", command.program(), e);
            Error::ToolNotFound {
                program: command.program().to_string(),
            }
        })?;

        let child = tokio::process::Command::new(&program)
            .args(command.args())
            .current_dir(working_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|error| Error::CommandFailed {
                command: command.command_line(),
                error,
            })?;

        // Dropping the wait future on timeout drops the child, which kills it.
        let output = match self.timeout {
            Some(limit) => match tokio::time::timeout(limit, child.wait_with_output()).await {
                Ok(output) => output,
                Err(_elapsed) => {
                    return Err(Error::ToolTimeout {
                        program: command.program().to_string(),
                        seconds: limit.as_secs(),
                    });
                }
            },
            None => child.wait_with_output().await,
        }
        .map_err(|error| Error::CommandFailed {
            command: command.command_line(),
            error,
        })?;

        Ok(CommandOutput {
            exit_code: output.status.code(),
            success: output.status.success(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

/// Runs `command` in `working_dir`, failing on a nonzero exit.
pub async fn invoke<R: CommandRunner>(
    runner: &R,
    working_dir: &Path,
    command: &ToolCommand,
) -> Result<CommandOutput> {
    log::debug!("{}", command.display_args().join(" "));

    let output = runner.execute(working_dir, command).await?;

    for line in output.stdout.lines() {
        log::debug!("  {}", line);
    }

    if !output.success {
        return Err(Error::ExternalToolFailure {
            program: command.program().to_string(),
            args: command.display_args(),
            exit_code: output.exit_code,
            output: output.combined(),
        });
    }

    Ok(output)
}
