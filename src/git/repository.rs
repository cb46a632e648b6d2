//! Version-control provider: repository discovery, diff capture and commit.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use git2::{IndexAddOption, Repository};
use tracing::{debug, info};

use crate::error::GitError;
use crate::git::diff::{PendingChangeSet, collect_pending_changes, resolve_head_tree};

/// A repository the workflow can read pending changes from and commit to.
///
/// This abstraction allows mocking the repository in tests.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VersionControl: Send + Sync {
    /// Capture the uncommitted changes. Never fails just because there are none.
    async fn pending_diff(&self) -> Result<PendingChangeSet, GitError>;

    /// Commit the pending changes with the given message.
    async fn commit(&self, message: &str) -> Result<(), GitError>;
}

#[async_trait]
impl<T: VersionControl + ?Sized> VersionControl for Arc<T> {
    async fn pending_diff(&self) -> Result<PendingChangeSet, GitError> {
        (**self).pending_diff().await
    }

    async fn commit(&self, message: &str) -> Result<(), GitError> {
        (**self).commit(message).await
    }
}

/// Resolves the repository for the current workspace, if there is one.
pub trait Workspace: Send + Sync {
    type Repo: VersionControl + 'static;

    fn repository(&self) -> Option<Self::Repo>;
}

/// Workspace rooted at a directory on disk.
#[derive(Debug, Clone)]
pub struct GitWorkspace {
    root: PathBuf,
}

impl GitWorkspace {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl Workspace for GitWorkspace {
    type Repo = GitRepository;

    /// Walks up from the workspace root looking for a repository.
    ///
    /// Bare repositories have no working tree to commit from and are treated
    /// as absent.
    fn repository(&self) -> Option<GitRepository> {
        match Repository::discover(&self.root) {
            Ok(repo) => {
                let workdir = repo.workdir()?.to_path_buf();
                debug!("Resolved repository at {}", workdir.display());
                Some(GitRepository { workdir })
            }
            Err(e) => {
                debug!("No repository found from {}: {}", self.root.display(), e);
                None
            }
        }
    }
}

/// A non-bare git repository identified by its working directory.
#[derive(Debug, Clone)]
pub struct GitRepository {
    workdir: PathBuf,
}

impl GitRepository {
    pub fn workdir(&self) -> &Path {
        &self.workdir
    }

    fn open(&self) -> Result<Repository, GitError> {
        Repository::open(&self.workdir).map_err(GitError::OpenRepository)
    }
}

#[async_trait]
impl VersionControl for GitRepository {
    async fn pending_diff(&self) -> Result<PendingChangeSet, GitError> {
        let repo = self.open()?;
        let set = collect_pending_changes(&repo)?;
        debug!(
            "Diff: {} files, {} additions, {} deletions, truncated={}",
            set.changed_files.len(),
            set.additions,
            set.deletions,
            set.truncated
        );
        Ok(set)
    }

    async fn commit(&self, message: &str) -> Result<(), GitError> {
        let repo = self.open()?;
        let oid = stage_and_commit(&repo, message)?;
        info!("Created commit {oid}");
        Ok(())
    }
}

/// Stage all changes and create a commit.
///
/// Uses `index.add_all()` plus `index.update_all()` to stage everything
/// (like `git add -A`), then creates a commit on HEAD with the given message.
/// An unborn branch gets a root commit.
pub fn stage_and_commit(repo: &Repository, message: &str) -> Result<git2::Oid, GitError> {
    let mut index = repo.index().map_err(GitError::StagingFailed)?;
    index
        .add_all(["*"].iter(), IndexAddOption::DEFAULT, None)
        .map_err(GitError::StagingFailed)?;
    index
        .update_all(["*"].iter(), None)
        .map_err(GitError::StagingFailed)?;
    index.write().map_err(GitError::StagingFailed)?;

    let tree_id = index.write_tree().map_err(GitError::StagingFailed)?;
    let tree = repo.find_tree(tree_id).map_err(GitError::CommitFailed)?;

    let head_tree = resolve_head_tree(repo)?;
    if head_tree.as_ref().is_some_and(|t| t.id() == tree_id) {
        return Err(GitError::NothingToCommit);
    }

    let sig = repo.signature().map_err(GitError::ConfigError)?;

    let parent = match head_tree {
        Some(_) => Some(
            repo.head()
                .and_then(|h| h.peel_to_commit())
                .map_err(GitError::CommitFailed)?,
        ),
        None => None,
    };
    let parents: Vec<&git2::Commit<'_>> = parent.iter().collect();

    repo.commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)
        .map_err(GitError::CommitFailed)
}
