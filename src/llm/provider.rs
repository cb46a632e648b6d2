//! Provider selection, error wrapping and generator construction.

use std::fmt;

use thiserror::Error;

use crate::claude::{ClaudeGenerator, check_claude_installed};
use crate::codex::{CodexGenerator, check_codex_installed};
use crate::error::{ClaudeError, CodexError, OpenAiError};
use crate::llm::TextGenerator;
use crate::llm::openai::{DEFAULT_MODEL, OpenAiGenerator};

/// Supported LLM providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum Provider {
    #[default]
    Claude,
    Codex,
    #[value(name = "openai")]
    OpenAi,
}

impl Provider {
    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::Claude => "Claude",
            Provider::Codex => "Codex",
            Provider::OpenAi => "OpenAI",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Provider-specific error wrapper.
#[derive(Error, Debug)]
pub enum LlmError {
    #[error(transparent)]
    Claude(#[from] ClaudeError),

    #[error(transparent)]
    Codex(#[from] CodexError),

    #[error(transparent)]
    OpenAi(#[from] OpenAiError),
}

impl LlmError {
    pub fn provider(&self) -> Provider {
        match self {
            LlmError::Claude(_) => Provider::Claude,
            LlmError::Codex(_) => Provider::Codex,
            LlmError::OpenAi(_) => Provider::OpenAi,
        }
    }

    /// One-line description suitable for a notification.
    pub fn summary(&self) -> String {
        match self {
            LlmError::Claude(err) => summarize_claude_error(err),
            LlmError::Codex(err) => summarize_codex_error(err),
            LlmError::OpenAi(err) => summarize_openai_error(err),
        }
    }
}

/// Settings needed to build a generator, derived from CLI flags and env.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderSettings {
    pub provider: Provider,
    /// Model name for the OpenAI provider.
    pub model: String,
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            provider: Provider::default(),
            model: DEFAULT_MODEL.to_string(),
        }
    }
}

/// Build the generator for the selected provider.
pub fn build_generator(settings: &ProviderSettings) -> Result<Box<dyn TextGenerator>, LlmError> {
    let generator: Box<dyn TextGenerator> = match settings.provider {
        Provider::Claude => Box::new(ClaudeGenerator::new()),
        Provider::Codex => Box::new(CodexGenerator::new()),
        Provider::OpenAi => Box::new(OpenAiGenerator::from_env()?.with_model(&settings.model)),
    };
    Ok(generator)
}

/// Verify that the selected provider can be reached before starting.
///
/// CLI providers must be on PATH; the OpenAI provider needs an API key.
pub async fn check_provider_available(provider: Provider) -> Result<(), LlmError> {
    match provider {
        Provider::Claude => check_claude_installed().await?,
        Provider::Codex => check_codex_installed().await?,
        Provider::OpenAi => {
            OpenAiGenerator::from_env()?;
        }
    }
    Ok(())
}

fn summarize_claude_error(err: &ClaudeError) -> String {
    match err {
        ClaudeError::NotInstalled => "Claude CLI not found".to_string(),
        ClaudeError::ExecutionFailed(msg) => format!("Claude CLI reported an error: {}", msg),
        ClaudeError::SpawnFailed(_) => "Failed to start Claude CLI".to_string(),
        ClaudeError::Timeout(secs) => format!("Claude timed out after {}s", secs),
        ClaudeError::NonZeroExit { code, .. } => format!("Claude CLI exited with code {}", code),
    }
}

fn summarize_codex_error(err: &CodexError) -> String {
    match err {
        CodexError::NotInstalled => "Codex CLI not found".to_string(),
        CodexError::ExecutionFailed(msg) => format!("Codex CLI reported an error: {}", msg),
        CodexError::SpawnFailed(_) => "Failed to start Codex CLI".to_string(),
        CodexError::Timeout(secs) => format!("Codex timed out after {}s", secs),
        CodexError::NonZeroExit { code, .. } => format!("Codex CLI exited with code {}", code),
    }
}

fn summarize_openai_error(err: &OpenAiError) -> String {
    match err {
        OpenAiError::MissingApiKey => "OPENAI_API_KEY is not set".to_string(),
        OpenAiError::Request(e) if e.is_timeout() => "OpenAI request timed out".to_string(),
        OpenAiError::Request(_) => "Could not reach the OpenAI API".to_string(),
        OpenAiError::Api { status, .. } => format!("OpenAI API returned HTTP {}", status),
    }
}
