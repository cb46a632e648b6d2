//! Text generation through the Codex CLI.

use async_trait::async_trait;

use crate::error::CodexError;
use crate::llm::{LlmError, TextGenerator};

use super::subprocess::run_codex;

/// Trait for executing Codex CLI commands.
///
/// This abstraction allows mocking the Codex subprocess in tests.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CodexExecutor: Send + Sync {
    /// Run Codex with the given prompt and return its final message.
    async fn run(&self, prompt: &str) -> Result<String, CodexError>;
}

/// Default executor that calls the real Codex CLI.
pub struct DefaultExecutor;

#[async_trait]
impl CodexExecutor for DefaultExecutor {
    async fn run(&self, prompt: &str) -> Result<String, CodexError> {
        run_codex(prompt).await
    }
}

/// [`TextGenerator`] backed by Codex.
pub struct CodexGenerator<E = DefaultExecutor> {
    executor: E,
}

impl CodexGenerator {
    pub fn new() -> Self {
        Self {
            executor: DefaultExecutor,
        }
    }
}

impl Default for CodexGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: CodexExecutor> CodexGenerator<E> {
    pub fn with_executor(executor: E) -> Self {
        Self { executor }
    }
}

#[async_trait]
impl<E: CodexExecutor> TextGenerator for CodexGenerator<E> {
    async fn complete(&self, prompt: &str) -> Result<String, LlmError> {
        Ok(self.executor.run(prompt).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_generator_returns_executor_output() {
        let mut mock = MockCodexExecutor::new();
        mock.expect_run()
            .times(1)
            .returning(|_| Ok("Add provider selection flag".to_string()));

        let generator = CodexGenerator::with_executor(mock);
        assert_eq!(
            generator.complete("prompt").await.unwrap(),
            "Add provider selection flag"
        );
    }

    #[tokio::test]
    async fn test_generator_maps_errors() {
        let mut mock = MockCodexExecutor::new();
        mock.expect_run().times(1).returning(|_| {
            Err(CodexError::NonZeroExit {
                code: 2,
                stderr: "not logged in".to_string(),
            })
        });

        let generator = CodexGenerator::with_executor(mock);
        let err = generator.complete("prompt").await.unwrap_err();
        assert!(matches!(
            err,
            LlmError::Codex(CodexError::NonZeroExit { code: 2, .. })
        ));
    }
}
