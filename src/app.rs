//! Command dispatch and the lifetime of the live draft.
//!
//! The [`Controller`] owns the single draft slot shared by the two commands.
//! Registration of the edit command is process-wide: it happens once, on the
//! first published draft, and is undone by [`Controller::deactivate`].

use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::error::WorkflowError;
use crate::git::Workspace;
use crate::llm::TextGenerator;
use crate::ui::HostSurface;
use crate::workflow::{CommitWorkflow, DraftSession, EditOutcome};

/// Set once the edit command has been registered with the host.
static EDIT_COMMAND_REGISTERED: AtomicBool = AtomicBool::new(false);

/// Notice shown when a command arrives while another one is running.
pub const COMMAND_BUSY: &str = "Still working on the commit message; try again when it finishes";

/// Notice shown when the edit command is activated with nothing to edit.
pub const NO_DRAFT: &str = "No commit message to edit";

/// The user-invocable commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Generate,
    EditDraft,
}

impl Command {
    pub fn id(&self) -> &'static str {
        match self {
            Command::Generate => "commitdraft.generate",
            Command::EditDraft => "commitdraft.edit",
        }
    }
}

/// What a dispatched command ended up doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatched {
    /// A new draft is displayed.
    DraftReady,
    /// Another command was in flight; this request was dropped.
    Busy,
    /// An edit round ran on the stored draft.
    Edited(EditOutcome),
    /// There was no draft to edit.
    NoDraft,
    /// The edit command has not been registered yet.
    NotRegistered,
}

/// Whether the edit command is currently registered.
pub fn is_edit_command_registered() -> bool {
    EDIT_COMMAND_REGISTERED.load(Ordering::SeqCst)
}

/// Clears the in-flight flag when a command finishes, however it ends.
struct InFlight<'a>(&'a AtomicBool);

impl<'a> InFlight<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

pub struct Controller<W: Workspace, G, S> {
    workflow: CommitWorkflow<W, G, S>,
    session: Mutex<Option<DraftSession<W::Repo>>>,
    /// Set while a generate or edit runs. The two never overlap, so a draft
    /// is never published while an edit is committing and hiding the old one.
    busy: AtomicBool,
}

impl<W, G, S> Controller<W, G, S>
where
    W: Workspace,
    G: TextGenerator,
    S: HostSurface,
{
    pub fn activate(workflow: CommitWorkflow<W, G, S>) -> Self {
        debug!("Activating controller");
        Self {
            workflow,
            session: Mutex::new(None),
            busy: AtomicBool::new(false),
        }
    }

    /// Tear down: drop the draft, hide the indicator and unregister the
    /// edit command so the next activation registers it again.
    pub fn deactivate(self) {
        self.workflow.surface().hide_indicator();
        if EDIT_COMMAND_REGISTERED.swap(false, Ordering::SeqCst) {
            debug!("Unregistered {}", Command::EditDraft.id());
        }
    }

    pub fn workflow(&self) -> &CommitWorkflow<W, G, S> {
        &self.workflow
    }

    /// The current draft text, if any.
    pub async fn draft(&self) -> Option<String> {
        self.session
            .lock()
            .await
            .as_ref()
            .map(|session| session.draft().as_str().to_string())
    }

    pub async fn dispatch(&self, command: Command) -> Result<Dispatched, WorkflowError> {
        debug!("Dispatching {}", command.id());
        match command {
            Command::Generate => self.generate().await,
            Command::EditDraft => self.edit().await,
        }
    }

    async fn generate(&self) -> Result<Dispatched, WorkflowError> {
        let Some(_guard) = InFlight::acquire(&self.busy) else {
            info!("Command already in flight; dropping generate request");
            self.workflow.surface().show_info(COMMAND_BUSY);
            return Ok(Dispatched::Busy);
        };

        let session = self.workflow.generate_and_offer().await?;
        *self.session.lock().await = Some(session);

        if EDIT_COMMAND_REGISTERED
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
        {
            debug!("Registered {}", Command::EditDraft.id());
        }

        Ok(Dispatched::DraftReady)
    }

    async fn edit(&self) -> Result<Dispatched, WorkflowError> {
        if !is_edit_command_registered() {
            warn!("{} invoked before registration", Command::EditDraft.id());
            return Ok(Dispatched::NotRegistered);
        }

        let Some(_guard) = InFlight::acquire(&self.busy) else {
            info!("Command already in flight; dropping edit request");
            self.workflow.surface().show_info(COMMAND_BUSY);
            return Ok(Dispatched::Busy);
        };

        let mut slot = self.session.lock().await;
        let Some(session) = slot.as_mut() else {
            self.workflow.surface().show_info(NO_DRAFT);
            return Ok(Dispatched::NoDraft);
        };

        let outcome = self.workflow.edit_draft(session).await?;
        if outcome == EditOutcome::Committed {
            *slot = None;
            self.workflow.surface().hide_indicator();
        }

        Ok(Dispatched::Edited(outcome))
    }
}
