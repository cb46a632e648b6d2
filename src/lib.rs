//! commitdraft - Generate a commit message from pending changes, let the user
//! edit it, then commit.
//!
//! # Overview
//!
//! commitdraft captures the working tree diff with git2, asks a text
//! generator (Claude Code CLI, Codex CLI or the OpenAI API) for a commit
//! message, and shows the result as a persistent indicator. Activating the
//! indicator opens the draft for editing and offers to commit it.

pub mod app;
pub mod claude;
pub mod codex;
pub mod commit;
pub mod error;
pub mod git;
pub mod llm;
pub mod ui;
pub mod workflow;

// Re-export commonly used types
pub use app::{Command, Controller, Dispatched};
pub use commit::DraftCommitMessage;
pub use error::{ClaudeError, CodexError, GitError, OpenAiError, WorkflowError};
pub use git::{GitWorkspace, PendingChangeSet, VersionControl, Workspace};
pub use llm::{LlmError, Provider, TextGenerator};
pub use ui::{BinaryChoice, HostSurface, Indicator};
pub use workflow::{CommitWorkflow, DraftSession, EditOutcome, WorkflowState};
