//! Text generation through the Claude CLI.

use async_trait::async_trait;
use serde::Deserialize;

use crate::error::ClaudeError;
use crate::llm::{LlmError, TextGenerator};

use super::subprocess::run_claude;

/// Trait for executing Claude CLI commands.
///
/// This abstraction allows mocking the Claude subprocess in tests.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ClaudeExecutor: Send + Sync {
    /// Run Claude with the given prompt and return the raw response.
    async fn run(&self, prompt: &str) -> Result<String, ClaudeError>;
}

/// Default executor that calls the real Claude CLI.
pub struct DefaultExecutor;

#[async_trait]
impl ClaudeExecutor for DefaultExecutor {
    async fn run(&self, prompt: &str) -> Result<String, ClaudeError> {
        run_claude(prompt).await
    }
}

/// [`TextGenerator`] backed by Claude Code.
pub struct ClaudeGenerator<E = DefaultExecutor> {
    executor: E,
}

impl ClaudeGenerator {
    pub fn new() -> Self {
        Self {
            executor: DefaultExecutor,
        }
    }
}

impl Default for ClaudeGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: ClaudeExecutor> ClaudeGenerator<E> {
    pub fn with_executor(executor: E) -> Self {
        Self { executor }
    }
}

#[async_trait]
impl<E: ClaudeExecutor> TextGenerator for ClaudeGenerator<E> {
    async fn complete(&self, prompt: &str) -> Result<String, LlmError> {
        let response = self.executor.run(prompt).await?;
        Ok(parse_claude_response(&response)?)
    }
}

/// Claude CLI JSON envelope when using --output-format json
#[derive(Deserialize)]
struct ClaudeCliResponse {
    #[serde(default)]
    result: Option<String>,
    #[serde(default)]
    is_error: bool,
}

/// Unwrap the CLI envelope into the generated text.
///
/// Output that is not an envelope is taken as the answer itself.
fn parse_claude_response(response: &str) -> Result<String, ClaudeError> {
    match serde_json::from_str::<ClaudeCliResponse>(response) {
        Ok(envelope) if envelope.is_error => Err(ClaudeError::ExecutionFailed(
            envelope.result.unwrap_or_default(),
        )),
        Ok(envelope) => Ok(envelope.result.unwrap_or_default()),
        Err(_) => Ok(response.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_claude_cli_envelope() {
        let response = r#"{"type":"result","subtype":"success","is_error":false,"result":"Add new line to file"}"#;
        assert_eq!(
            parse_claude_response(response).unwrap(),
            "Add new line to file"
        );
    }

    #[test]
    fn test_parse_claude_cli_envelope_error() {
        let response = r#"{"type":"result","is_error":true,"result":"Credit balance is too low"}"#;
        let result = parse_claude_response(response);
        assert!(
            matches!(result, Err(ClaudeError::ExecutionFailed(ref msg)) if msg.contains("Credit balance"))
        );
    }

    #[test]
    fn test_parse_claude_envelope_without_result_is_empty() {
        let response = r#"{"type":"result","is_error":false}"#;
        assert_eq!(parse_claude_response(response).unwrap(), "");
    }

    #[test]
    fn test_parse_plain_text_passes_through() {
        let response = "Fix typo in README";
        assert_eq!(parse_claude_response(response).unwrap(), "Fix typo in README");
    }

    #[tokio::test]
    async fn test_generator_forwards_prompt_to_executor() {
        let mut mock = MockClaudeExecutor::new();
        mock.expect_run()
            .withf(|prompt| prompt.contains("+added line"))
            .times(1)
            .returning(|_| Ok(r#"{"is_error":false,"result":"Add line"}"#.to_string()));

        let generator = ClaudeGenerator::with_executor(mock);
        let text = generator.complete("diff:\n+added line").await.unwrap();
        assert_eq!(text, "Add line");
    }

    #[tokio::test]
    async fn test_generator_does_not_retry_on_failure() {
        let mut mock = MockClaudeExecutor::new();
        mock.expect_run()
            .times(1)
            .returning(|_| Err(ClaudeError::Timeout(300)));

        let generator = ClaudeGenerator::with_executor(mock);
        let result = generator.complete("prompt").await;
        assert!(matches!(
            result,
            Err(LlmError::Claude(ClaudeError::Timeout(300)))
        ));
    }
}
