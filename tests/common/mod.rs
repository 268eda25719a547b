//! Shared fixtures for pipeline tests.

#![allow(dead_code)]

use kodegen_bundler_packager::model::{
    ChocolateyConfig, Distribution, Project, Releaser, ReleaserKind,
};
use kodegen_bundler_packager::packager::repository::GitClient;
use kodegen_bundler_packager::packager::{
    CommandOutput, CommandRunner, ExecutionContext, Platform, Result, ToolCommand,
};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// One recorded external tool call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub working_dir: PathBuf,
    pub program: String,
    pub args: Vec<String>,
}

impl Invocation {
    /// `program` followed by its first argument, e.g. `choco pack`.
    pub fn verb(&self) -> String {
        match self.args.first() {
            Some(first) => format!("{} {}", self.program, first),
            None => self.program.clone(),
        }
    }
}

/// Records every call and answers from canned outputs keyed by `program subcommand`.
#[derive(Default)]
pub struct RecordingRunner {
    calls: Mutex<Vec<Invocation>>,
    outputs: HashMap<String, CommandOutput>,
}

impl RecordingRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(mut self, verb: &str, output: CommandOutput) -> Self {
        self.outputs.insert(verb.to_string(), output);
        self
    }

    pub fn calls(&self) -> Vec<Invocation> {
        self.calls.lock().unwrap().clone()
    }

    pub fn verbs(&self) -> Vec<String> {
        self.calls().iter().map(Invocation::verb).collect()
    }
}

impl CommandRunner for RecordingRunner {
    async fn execute(&self, working_dir: &Path, command: &ToolCommand) -> Result<CommandOutput> {
        let invocation = Invocation {
            working_dir: working_dir.to_path_buf(),
            program: command.program().to_string(),
            args: command.args().to_vec(),
        };
        let verb = invocation.verb();
        self.calls.lock().unwrap().push(invocation);

        Ok(self
            .outputs
            .get(&verb)
            .cloned()
            .unwrap_or_else(|| CommandOutput::success("")))
    }
}

/// Records git operations; reports a dirty checkout when `dirty` is set.
#[derive(Default)]
pub struct RecordingGit {
    dirty: bool,
    ops: Mutex<Vec<String>>,
    checkouts: Mutex<Vec<PathBuf>>,
}

impl RecordingGit {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dirty() -> Self {
        Self {
            dirty: true,
            ..Self::default()
        }
    }

    pub fn ops(&self) -> Vec<String> {
        self.ops.lock().unwrap().clone()
    }

    /// Relative paths of every file present in the checkout when it was staged.
    pub fn staged_files(&self) -> Vec<String> {
        self.checkouts
            .lock()
            .unwrap()
            .iter()
            .map(|p| p.to_string_lossy().replace('\\', "/"))
            .collect()
    }

    fn record(&self, op: String) {
        self.ops.lock().unwrap().push(op);
    }
}

impl GitClient for RecordingGit {
    async fn clone_branch(&self, url: &str, branch: &str, _into: &Path) -> Result<()> {
        self.record(format!("clone {} {}", url, branch));
        Ok(())
    }

    async fn stage_all(&self, workdir: &Path) -> Result<()> {
        let mut files = Vec::new();
        for entry in walk(workdir) {
            files.push(entry.strip_prefix(workdir).unwrap().to_path_buf());
        }
        files.sort();
        *self.checkouts.lock().unwrap() = files;
        self.record("add".to_string());
        Ok(())
    }

    async fn has_changes(&self, _workdir: &Path) -> Result<bool> {
        self.record("status".to_string());
        Ok(self.dirty)
    }

    async fn commit(&self, _workdir: &Path, message: &str) -> Result<()> {
        self.record(format!("commit {}", message));
        Ok(())
    }

    async fn push(&self, _workdir: &Path, branch: &str) -> Result<()> {
        self.record(format!("push {}", branch));
        Ok(())
    }
}

fn walk(dir: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir).unwrap() {
        let path = entry.unwrap().path();
        if path.is_dir() {
            files.extend(walk(&path));
        } else {
            files.push(path);
        }
    }
    files
}

pub fn project() -> Project {
    let mut project = Project::new("app", "1.2.0");
    project.description = Some("Sample application".to_string());
    project.authors = vec!["Jane Doe".to_string(), "John Roe".to_string()];
    project.license = Some("MIT".to_string());
    project.license_url = Some("https://example.com/LICENSE".to_string());
    project
}

pub fn releaser() -> Releaser {
    Releaser::new(ReleaserKind::Github, "acme", "app")
}

pub fn context(basedir: &Path, host: Platform) -> ExecutionContext {
    ExecutionContext::new(basedir, project(), releaser()).with_host_platform(host)
}

pub fn chocolatey_config() -> ChocolateyConfig {
    ChocolateyConfig {
        api_key: Some("s3cr3t".to_string()),
        ..ChocolateyConfig::default()
    }
}

pub fn distribution() -> Distribution {
    Distribution::new("app")
}
