//! Per-invocation state carried from generation through edit and commit.

use std::fmt;

use tracing::debug;

use crate::commit::DraftCommitMessage;

/// Where an invocation currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowState {
    Idle,
    DiffCaptured,
    Generating,
    DraftReady,
    Editing,
    Committed,
    Declined,
    Failed,
}

impl WorkflowState {
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkflowState::Idle => "idle",
            WorkflowState::DiffCaptured => "diff-captured",
            WorkflowState::Generating => "generating",
            WorkflowState::DraftReady => "draft-ready",
            WorkflowState::Editing => "editing",
            WorkflowState::Committed => "committed",
            WorkflowState::Declined => "declined",
            WorkflowState::Failed => "failed",
        }
    }
}

impl fmt::Display for WorkflowState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How an edit round ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOutcome {
    /// The user dismissed the edit prompt; the draft is unchanged.
    Cancelled,
    /// The draft was edited but the user chose not to commit.
    Declined,
    /// The draft was edited and committed.
    Committed,
}

/// Context for a single `generate_and_offer` invocation.
///
/// Owns the repository handle the diff came from and the one live draft.
/// A new invocation produces a new session; nothing is shared between them.
pub struct DraftSession<R> {
    repo: R,
    draft: DraftCommitMessage,
    state: WorkflowState,
}

impl<R> DraftSession<R> {
    pub(crate) fn new(repo: R, draft: DraftCommitMessage) -> Self {
        Self {
            repo,
            draft,
            state: WorkflowState::DraftReady,
        }
    }

    pub fn draft(&self) -> &DraftCommitMessage {
        &self.draft
    }

    pub fn state(&self) -> WorkflowState {
        self.state
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    pub(crate) fn draft_mut(&mut self) -> &mut DraftCommitMessage {
        &mut self.draft
    }

    pub(crate) fn enter(&mut self, next: WorkflowState) {
        debug!("Workflow state: {} -> {}", self.state, next);
        self.state = next;
    }
}

impl<R> fmt::Debug for DraftSession<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DraftSession")
            .field("draft", &self.draft)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}
