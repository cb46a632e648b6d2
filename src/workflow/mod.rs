//! Commit message lifecycle: capture diff, generate, offer, edit, commit.
//!
//! [`CommitWorkflow`] holds the three collaborators and no per-run state.
//! Each [`CommitWorkflow::generate_and_offer`] call returns a fresh
//! [`DraftSession`] which the caller passes back into
//! [`CommitWorkflow::edit_draft`] when the user activates the indicator.

pub mod session;

use tracing::{debug, info};

use crate::app::Command;
use crate::commit::{DraftCommitMessage, build_commit_prompt};
use crate::error::WorkflowError;
use crate::git::{VersionControl, Workspace};
use crate::llm::TextGenerator;
use crate::ui::{BinaryChoice, HostSurface, Indicator};

pub use session::{DraftSession, EditOutcome, WorkflowState};

/// Tooltip attached to the draft indicator.
pub const EDIT_TOOLTIP: &str = "Click to edit the commit message";

/// Prompt shown above the editable draft.
pub const EDIT_PROMPT: &str = "Edit Commit Message";

/// Question asked after a successful edit.
pub const COMMIT_QUESTION: &str = "Do you want to commit the changes with this message?";

/// Notice shown when the diff sent for generation was cut short.
pub const DIFF_TRUNCATED: &str =
    "The diff was too large and was truncated; the message may not cover every change";

/// Notice shown after the commit succeeds.
pub const COMMIT_APPLIED: &str = "Commit message applied!";

pub struct CommitWorkflow<W, G, S> {
    workspace: W,
    generator: G,
    surface: S,
}

impl<W, G, S> CommitWorkflow<W, G, S>
where
    W: Workspace,
    G: TextGenerator,
    S: HostSurface,
{
    pub fn new(workspace: W, generator: G, surface: S) -> Self {
        Self {
            workspace,
            generator,
            surface,
        }
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Generate a draft from the pending changes and display it.
    ///
    /// Errors are shown on the surface before being returned.
    pub async fn generate_and_offer(&self) -> Result<DraftSession<W::Repo>, WorkflowError> {
        let result = self.generate().await;
        if let Err(ref e) = result {
            self.report(e);
        }
        result
    }

    /// Let the user edit the draft, then optionally commit it.
    ///
    /// An empty or whitespace-only edit counts as a cancel and leaves the
    /// draft unchanged.
    ///
    /// On commit failure the draft and indicator are left as they were so
    /// the user can try again without regenerating.
    pub async fn edit_draft(
        &self,
        session: &mut DraftSession<W::Repo>,
    ) -> Result<EditOutcome, WorkflowError> {
        let result = self.edit(session).await;
        if let Err(ref e) = result {
            self.report(e);
        }
        result
    }

    async fn generate(&self) -> Result<DraftSession<W::Repo>, WorkflowError> {
        debug!("Workflow state: {}", WorkflowState::Idle);

        let repo = self
            .workspace
            .repository()
            .ok_or(WorkflowError::NoRepository)?;

        let changes = repo
            .pending_diff()
            .await
            .map_err(WorkflowError::DiffFailed)?;
        debug!("Workflow state: {}", WorkflowState::DiffCaptured);

        if changes.is_empty() {
            info!("No pending changes; requesting a message anyway");
        }
        if changes.truncated {
            debug!(
                "Diff truncated; {} changed files in total",
                changes.changed_files.len()
            );
            self.surface.show_info(DIFF_TRUNCATED);
        }

        let prompt = build_commit_prompt(&changes.diff_text);
        drop(changes);

        debug!(
            "Workflow state: {} ({} char prompt)",
            WorkflowState::Generating,
            prompt.len()
        );
        let completion = self
            .generator
            .complete(&prompt)
            .await
            .map_err(|e| {
                debug!("{} provider failed: {:?}", e.provider(), e);
                WorkflowError::GenerationFailed(e)
            })?;

        let draft = DraftCommitMessage::from_completion(&completion)
            .ok_or(WorkflowError::GenerationEmpty)?;

        let session = DraftSession::new(repo, draft);
        debug!("Workflow state: {}", session.state());
        self.publish(session.draft());

        Ok(session)
    }

    async fn edit(&self, session: &mut DraftSession<W::Repo>) -> Result<EditOutcome, WorkflowError> {
        session.enter(WorkflowState::Editing);

        let edited = self
            .surface
            .prompt_editable_text(EDIT_PROMPT, session.draft().as_str())
            .await
            .filter(|text| !text.trim().is_empty());

        let Some(edited) = edited else {
            debug!("Edit dismissed; draft unchanged");
            session.enter(WorkflowState::DraftReady);
            return Ok(EditOutcome::Cancelled);
        };

        session.draft_mut().replace(edited);
        session.enter(WorkflowState::DraftReady);
        self.publish(session.draft());

        if self.surface.prompt_binary_choice(COMMIT_QUESTION).await != Some(BinaryChoice::Yes) {
            session.enter(WorkflowState::Declined);
            return Ok(EditOutcome::Declined);
        }

        match session.repository().commit(session.draft().as_str()).await {
            Ok(()) => {
                session.enter(WorkflowState::Committed);
                self.surface.show_info(COMMIT_APPLIED);
                Ok(EditOutcome::Committed)
            }
            Err(e) => {
                session.enter(WorkflowState::Failed);
                Err(WorkflowError::CommitFailed(e))
            }
        }
    }

    fn publish(&self, draft: &DraftCommitMessage) {
        self.surface.show_indicator(Indicator {
            text: draft.indicator_text(),
            tooltip: EDIT_TOOLTIP.to_string(),
            command: Command::EditDraft,
        });
    }

    fn report(&self, error: &WorkflowError) {
        debug!("Workflow failed: {:?}", error);
        self.surface.show_error(&error.to_string());
    }
}
