//! Repository-based publishing for remote builds.
//!
//! The rendered package files are committed to the packager's own git repository,
//! where CI takes over packing and pushing. Git runs in-process: `gix` for the
//! shallow clone, `kodegen_tools_git` for staging, status, commit and push.

use super::backend::RepositoryTarget;
use super::context::ExecutionContext;
use super::error::{Error, ErrorExt, Result};
use super::fs::copy_dir_contents;
use std::fmt::Display;
use std::future::Future;
use std::path::{Path, PathBuf};

/// Seconds allowed for a push before giving up.
const PUSH_TIMEOUT_SECS: u64 = 300;

/// Result of a repository publish.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepositoryOutcome {
    /// Changes were committed and pushed
    Pushed,
    /// Repository already matched the package files
    NoChanges,
    /// Changes were committed locally but the push was suppressed
    DryRun,
}

/// Git operations needed to publish into a repository.
pub trait GitClient {
    /// Shallow-clones `branch` of `url` into the empty directory `into`.
    fn clone_branch(
        &self,
        url: &str,
        branch: &str,
        into: &Path,
    ) -> impl Future<Output = Result<()>>;

    /// Stages every change in the working tree.
    fn stage_all(&self, workdir: &Path) -> impl Future<Output = Result<()>>;

    /// Whether the working tree or index differs from `HEAD`.
    fn has_changes(&self, workdir: &Path) -> impl Future<Output = Result<bool>>;

    /// Commits the index.
    fn commit(&self, workdir: &Path, message: &str) -> impl Future<Output = Result<()>>;

    /// Pushes `HEAD` to `branch` on `origin`.
    fn push(&self, workdir: &Path, branch: &str) -> impl Future<Output = Result<()>>;
}

impl<T: GitClient> GitClient for &T {
    fn clone_branch(
        &self,
        url: &str,
        branch: &str,
        into: &Path,
    ) -> impl Future<Output = Result<()>> {
        (**self).clone_branch(url, branch, into)
    }

    fn stage_all(&self, workdir: &Path) -> impl Future<Output = Result<()>> {
        (**self).stage_all(workdir)
    }

    fn has_changes(&self, workdir: &Path) -> impl Future<Output = Result<bool>> {
        (**self).has_changes(workdir)
    }

    fn commit(&self, workdir: &Path, message: &str) -> impl Future<Output = Result<()>> {
        (**self).commit(workdir, message)
    }

    fn push(&self, workdir: &Path, branch: &str) -> impl Future<Output = Result<()>> {
        (**self).push(workdir, branch)
    }
}

fn git_error(operation: &'static str, repository: &Path, error: impl Display) -> Error {
    Error::Git {
        operation,
        repository: repository.to_path_buf(),
        reason: error.to_string(),
    }
}

/// Pure Rust git client.
#[derive(Debug, Clone, Copy, Default)]
pub struct GitRepository;

impl GitRepository {
    /// Creates a client.
    pub fn new() -> Self {
        Self
    }
}

fn clone_shallow(url: &str, branch: &str, into: &Path) -> Result<()> {
    let interrupt = &gix::interrupt::IS_INTERRUPTED;

    let mut prepare = gix::prepare_clone(url, into)
        .map_err(|e| git_error("clone", into, e))?
        .with_ref_name(Some(branch))
        .map_err(|e| git_error("clone", into, e))?
        .with_shallow(gix::remote::fetch::Shallow::DepthAtRemote(
            std::num::NonZeroU32::MIN,
        ));

    let (mut checkout, _) = prepare
        .fetch_then_checkout(gix::progress::Discard, interrupt)
        .map_err(|e| git_error("clone", into, e))?;
    checkout
        .main_worktree(gix::progress::Discard, interrupt)
        .map_err(|e| git_error("clone", into, e))?;

    Ok(())
}

impl GitClient for GitRepository {
    async fn clone_branch(&self, url: &str, branch: &str, into: &Path) -> Result<()> {
        let url = url.to_string();
        let branch = branch.to_string();
        let target = into.to_path_buf();

        // gix networking is blocking
        tokio::task::spawn_blocking(move || clone_shallow(&url, &branch, &target))
            .await
            .map_err(|e| git_error("clone", into, e))?
    }

    async fn stage_all(&self, workdir: &Path) -> Result<()> {
        use kodegen_tools_git::{AddOpts, add, open_repo};

        let repo = open_repo(workdir)
            .await
            .map_err(|e| git_error("open", workdir, e))?
            .map_err(|e| git_error("open", workdir, e))?;

        add(
            repo,
            AddOpts {
                paths: vec![PathBuf::from(".")],
                update_only: false,
                force: false,
            },
        )
        .await
        .map_err(|e| git_error("add", workdir, e))?;
        Ok(())
    }

    async fn has_changes(&self, workdir: &Path) -> Result<bool> {
        use kodegen_tools_git::{is_clean, open_repo};

        let repo = open_repo(workdir)
            .await
            .map_err(|e| git_error("open", workdir, e))?
            .map_err(|e| git_error("open", workdir, e))?;

        let clean = is_clean(&repo)
            .await
            .map_err(|e| git_error("status", workdir, e))?;
        Ok(!clean)
    }

    async fn commit(&self, workdir: &Path, message: &str) -> Result<()> {
        use kodegen_tools_git::{CommitOpts, commit, open_repo};

        let repo = open_repo(workdir)
            .await
            .map_err(|e| git_error("open", workdir, e))?
            .map_err(|e| git_error("open", workdir, e))?;

        commit(
            repo,
            CommitOpts {
                message: message.to_string(),
                amend: false,
                all: false,
                author: None,
                committer: None,
            },
        )
        .await
        .map_err(|e| git_error("commit", workdir, e))?;
        Ok(())
    }

    async fn push(&self, workdir: &Path, branch: &str) -> Result<()> {
        use kodegen_tools_git::{PushOpts, open_repo, push};

        let repo = open_repo(workdir)
            .await
            .map_err(|e| git_error("open", workdir, e))?
            .map_err(|e| git_error("open", workdir, e))?;

        let result = push(
            &repo,
            PushOpts {
                remote: "origin".to_string(),
                refspecs: vec![format!("HEAD:refs/heads/{}", branch)],
                force: false,
                tags: false,
                timeout_secs: Some(PUSH_TIMEOUT_SECS),
            },
        )
        .await
        .map_err(|e| git_error("push", workdir, e))?;

        log::debug!("pushed {} commit(s) to origin", result.commits_pushed);
        Ok(())
    }
}

/// Clones `target`, copies `package_directory` into it, commits and pushes.
///
/// `commit_message` must already be rendered.
pub async fn publish_to_repository<G: GitClient>(
    context: &ExecutionContext,
    git: &G,
    target: &RepositoryTarget,
    commit_message: &str,
    package_directory: &Path,
) -> Result<RepositoryOutcome> {
    let checkout = tempfile::Builder::new()
        .prefix("packager-repo-")
        .tempdir()
        .fs_context("creating temporary checkout", std::env::temp_dir())?;
    let workdir = checkout.path();

    log::info!("cloning {} ({})", target.clone_url, target.branch);
    git.clone_branch(&target.clone_url, &target.branch, workdir)
        .await?;

    let copied = copy_dir_contents(package_directory, workdir).await?;
    log::debug!("copied {} file(s) into checkout", copied.len());

    git.stage_all(workdir).await?;

    if !git.has_changes(workdir).await? {
        log::info!("{} is up to date, nothing to commit", target.clone_url);
        return Ok(RepositoryOutcome::NoChanges);
    }

    git.commit(workdir, commit_message).await?;

    if context.is_dry_run() {
        log::warn!("dry-run is set: not pushing to {}", target.clone_url);
        return Ok(RepositoryOutcome::DryRun);
    }

    git.push(workdir, &target.branch).await?;

    log::info!("pushed {} to {}", target.branch, target.clone_url);
    Ok(RepositoryOutcome::Pushed)
}
