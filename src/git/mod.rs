//! Git integration: pending change capture and committing.

pub mod diff;
pub mod repository;

pub use diff::{
    ChangedFile, FileStatus, MAX_DIFF_LENGTH, PendingChangeSet, TRUNCATION_NOTICE,
    collect_pending_changes,
};
pub use repository::{GitRepository, GitWorkspace, VersionControl, Workspace, stage_and_commit};

#[cfg(test)]
pub use repository::MockVersionControl;
