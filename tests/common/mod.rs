//! Shared test utilities for integration tests.
//!
//! Not all functions are used by every test file, but they're shared across tests.
#![allow(dead_code)]

use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use git2::{Oid, Repository, Signature};
use tokio::sync::Notify;

use commitdraft::error::{ClaudeError, GitError};
use commitdraft::git::{PendingChangeSet, VersionControl, Workspace};
use commitdraft::llm::{LlmError, TextGenerator};
use commitdraft::ui::{BinaryChoice, HostSurface, Indicator};

/// Get the path to test fixtures directory.
pub fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

/// Read a response fixture as a string.
pub fn read_response_fixture(name: &str) -> String {
    let path = fixtures_dir().join("responses").join(name);
    std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Failed to read fixture {:?}: {}", path, e))
}

/// Workspace that hands out a shared fake repository, or none at all.
pub struct FakeWorkspace {
    repo: Option<Arc<FakeRepo>>,
}

impl FakeWorkspace {
    pub fn with(repo: Arc<FakeRepo>) -> Self {
        Self { repo: Some(repo) }
    }

    pub fn empty() -> Self {
        Self { repo: None }
    }
}

impl Workspace for FakeWorkspace {
    type Repo = Arc<FakeRepo>;

    fn repository(&self) -> Option<Arc<FakeRepo>> {
        self.repo.clone()
    }
}

/// Repository that returns a fixed diff and records commits.
#[derive(Default)]
pub struct FakeRepo {
    diff: String,
    fail_diff: bool,
    failing_commits: Mutex<usize>,
    pub commits: Mutex<Vec<String>>,
}

impl FakeRepo {
    pub fn with_diff(diff: &str) -> Arc<Self> {
        Arc::new(Self {
            diff: diff.to_string(),
            ..Default::default()
        })
    }

    pub fn broken_diff() -> Arc<Self> {
        Arc::new(Self {
            fail_diff: true,
            ..Default::default()
        })
    }

    /// The first `count` commit attempts fail.
    pub fn failing_commits(diff: &str, count: usize) -> Arc<Self> {
        Arc::new(Self {
            diff: diff.to_string(),
            failing_commits: Mutex::new(count),
            ..Default::default()
        })
    }

    pub fn commits(&self) -> Vec<String> {
        self.commits.lock().unwrap().clone()
    }
}

#[async_trait]
impl VersionControl for FakeRepo {
    async fn pending_diff(&self) -> Result<PendingChangeSet, GitError> {
        if self.fail_diff {
            return Err(GitError::DiffFailed(git2::Error::from_str(
                "index is locked",
            )));
        }
        Ok(PendingChangeSet::from_text(&self.diff))
    }

    async fn commit(&self, message: &str) -> Result<(), GitError> {
        let mut remaining = self.failing_commits.lock().unwrap();
        if *remaining > 0 {
            *remaining -= 1;
            return Err(GitError::CommitFailed(git2::Error::from_str(
                "failed to lock HEAD",
            )));
        }
        self.commits.lock().unwrap().push(message.to_string());
        Ok(())
    }
}

/// Generator that replies from a script and records every prompt.
///
/// With a gate set, each call waits for the gate to be notified before answering.
#[derive(Default)]
pub struct FakeGenerator {
    replies: Mutex<VecDeque<Result<String, String>>>,
    gate: Option<Arc<Notify>>,
    pub prompts: Mutex<Vec<String>>,
}

impl FakeGenerator {
    pub fn replying(replies: &[&str]) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.iter().map(|r| Ok(r.to_string())).collect()),
            ..Default::default()
        })
    }

    pub fn failing(message: &str) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(VecDeque::from([Err(message.to_string())])),
            ..Default::default()
        })
    }

    pub fn gated(replies: &[&str], gate: Arc<Notify>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.iter().map(|r| Ok(r.to_string())).collect()),
            gate: Some(gate),
            ..Default::default()
        })
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl TextGenerator for FakeGenerator {
    async fn complete(&self, prompt: &str) -> Result<String, LlmError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        let reply = self.replies.lock().unwrap().pop_front();
        match reply {
            Some(Ok(text)) => Ok(text),
            Some(Err(message)) => Err(ClaudeError::ExecutionFailed(message).into()),
            None => Ok(String::new()),
        }
    }
}

/// Surface that answers prompts from a script and records what it was shown.
#[derive(Default)]
pub struct RecordingSurface {
    edits: Mutex<VecDeque<Option<String>>>,
    choices: Mutex<VecDeque<Option<BinaryChoice>>>,
    pub indicators: Mutex<Vec<Indicator>>,
    pub hidden: Mutex<usize>,
    pub errors: Mutex<Vec<String>>,
    pub infos: Mutex<Vec<String>>,
    pub edit_prompts: Mutex<Vec<(String, String)>>,
    pub questions: Mutex<Vec<String>>,
}

impl RecordingSurface {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Queue the answer to the next edit prompt. `None` dismisses it.
    pub fn will_edit(&self, answer: Option<&str>) {
        self.edits
            .lock()
            .unwrap()
            .push_back(answer.map(str::to_string));
    }

    /// Queue the answer to the next yes/no question. `None` dismisses it.
    pub fn will_choose(&self, answer: Option<BinaryChoice>) {
        self.choices.lock().unwrap().push_back(answer);
    }

    pub fn indicator_texts(&self) -> Vec<String> {
        self.indicators
            .lock()
            .unwrap()
            .iter()
            .map(|i| i.text.clone())
            .collect()
    }

    pub fn errors(&self) -> Vec<String> {
        self.errors.lock().unwrap().clone()
    }

    pub fn infos(&self) -> Vec<String> {
        self.infos.lock().unwrap().clone()
    }

    pub fn hidden_count(&self) -> usize {
        *self.hidden.lock().unwrap()
    }
}

#[async_trait]
impl HostSurface for RecordingSurface {
    fn show_indicator(&self, indicator: Indicator) {
        self.indicators.lock().unwrap().push(indicator);
    }

    fn hide_indicator(&self) {
        *self.hidden.lock().unwrap() += 1;
    }

    async fn prompt_editable_text(&self, prompt: &str, initial: &str) -> Option<String> {
        self.edit_prompts
            .lock()
            .unwrap()
            .push((prompt.to_string(), initial.to_string()));
        self.edits.lock().unwrap().pop_front().flatten()
    }

    async fn prompt_binary_choice(&self, question: &str) -> Option<BinaryChoice> {
        self.questions.lock().unwrap().push(question.to_string());
        self.choices.lock().unwrap().pop_front().flatten()
    }

    fn show_error(&self, message: &str) {
        self.errors.lock().unwrap().push(message.to_string());
    }

    fn show_info(&self, message: &str) {
        self.infos.lock().unwrap().push(message.to_string());
    }
}

/// A test git repository builder for integration tests.
pub struct TestRepo {
    pub dir: tempfile::TempDir,
    pub repo: Repository,
}

impl TestRepo {
    /// Create a new empty git repository in a temp directory, with an
    /// identity configured so commits can be signed.
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp directory");
        let repo = Repository::init(dir.path()).expect("Failed to init git repo");
        {
            let mut config = repo.config().expect("Failed to open config");
            config
                .set_str("user.name", "Test User")
                .expect("Failed to set user.name");
            config
                .set_str("user.email", "test@example.com")
                .expect("Failed to set user.email");
        }
        Self { dir, repo }
    }

    /// Write a file relative to the repository root.
    pub fn write(&self, name: &str, content: &str) {
        let path = self.dir.path().join(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        std::fs::write(path, content).expect("Failed to write file");
    }

    /// Stage `name` and commit it directly with git2. Returns the commit OID.
    pub fn commit_file(&self, name: &str, content: &str, message: &str) -> Oid {
        self.write(name, content);

        let mut index = self.repo.index().expect("Failed to get index");
        index
            .add_path(std::path::Path::new(name))
            .expect("Failed to add file");
        index.write().expect("Failed to write index");
        let tree_id = index.write_tree().expect("Failed to write tree");
        let tree = self.repo.find_tree(tree_id).expect("Failed to find tree");

        let sig = Signature::now("Test User", "test@example.com")
            .expect("Failed to create signature");
        let parent = self.repo.head().ok().and_then(|h| h.peel_to_commit().ok());
        let parents: Vec<&git2::Commit<'_>> = parent.iter().collect();

        self.repo
            .commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)
            .expect("Failed to create commit")
    }

    /// Message of the commit HEAD points at, if any.
    pub fn head_message(&self) -> Option<String> {
        let commit = self.repo.head().ok()?.peel_to_commit().ok()?;
        commit.message().map(str::to_string)
    }

    /// Number of commits reachable from HEAD.
    pub fn commit_count(&self) -> usize {
        let Ok(mut walk) = self.repo.revwalk() else {
            return 0;
        };
        if walk.push_head().is_err() {
            return 0;
        }
        walk.count()
    }
}
