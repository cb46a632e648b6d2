//! Codex CLI invocation.

use std::ffi::OsString;
use std::path::Path;

use tempfile::NamedTempFile;

use crate::error::CodexError;
use crate::llm::cli::{CliFailure, CliTool};

/// Environment variable overriding the run timeout, in seconds.
pub const TIMEOUT_ENV_VAR: &str = "COMMITDRAFT_CODEX_TIMEOUT";

const CODEX: CliTool = CliTool::new("codex", TIMEOUT_ENV_VAR);

impl From<CliFailure> for CodexError {
    fn from(failure: CliFailure) -> Self {
        match failure {
            CliFailure::NotInstalled => CodexError::NotInstalled,
            CliFailure::Spawn(e) => CodexError::SpawnFailed(e),
            CliFailure::Timeout(secs) => CodexError::Timeout(secs),
            CliFailure::NonZeroExit { code, stderr } => CodexError::NonZeroExit { code, stderr },
        }
    }
}

/// Check that the Codex CLI is on PATH and runnable.
pub async fn check_codex_installed() -> Result<(), CodexError> {
    Ok(CODEX.ensure_installed().await?)
}

/// Run `codex exec` with a prompt and return the agent's final message.
///
/// Codex prints progress to stdout, so the final message is requested
/// through `--output-last-message` into a temp file. If that file stays
/// empty, stdout is used instead.
pub async fn run_codex(prompt: &str) -> Result<String, CodexError> {
    let last_message = NamedTempFile::new().map_err(|e| {
        CodexError::ExecutionFailed(format!("Failed to create output file: {}", e))
    })?;

    let stdout = CODEX.run(exec_args(last_message.path(), prompt)).await?;
    read_last_message(last_message.path(), stdout)
}

fn exec_args(last_message: &Path, prompt: &str) -> Vec<OsString> {
    vec![
        "exec".into(),
        "--output-last-message".into(),
        last_message.into(),
        prompt.into(),
    ]
}

/// Prefer the last-message file; fall back to stdout when it is empty.
fn read_last_message(path: &Path, stdout: String) -> Result<String, CodexError> {
    let message = std::fs::read_to_string(path).map_err(|e| {
        CodexError::ExecutionFailed(format!("Failed to read output file: {}", e))
    })?;

    if message.trim().is_empty() {
        Ok(stdout)
    } else {
        Ok(message)
    }
}
