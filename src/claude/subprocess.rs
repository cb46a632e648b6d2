//! Claude CLI invocation.

use crate::error::ClaudeError;
use crate::llm::cli::{CliFailure, CliTool};

/// Environment variable overriding the run timeout, in seconds.
pub const TIMEOUT_ENV_VAR: &str = "COMMITDRAFT_CLAUDE_TIMEOUT";

const CLAUDE: CliTool = CliTool::new("claude", TIMEOUT_ENV_VAR);

impl From<CliFailure> for ClaudeError {
    fn from(failure: CliFailure) -> Self {
        match failure {
            CliFailure::NotInstalled => ClaudeError::NotInstalled,
            CliFailure::Spawn(e) => ClaudeError::SpawnFailed(e),
            CliFailure::Timeout(secs) => ClaudeError::Timeout(secs),
            CliFailure::NonZeroExit { code, stderr } => ClaudeError::NonZeroExit { code, stderr },
        }
    }
}

/// Check that Claude Code is on PATH and runnable.
pub async fn check_claude_installed() -> Result<(), ClaudeError> {
    Ok(CLAUDE.ensure_installed().await?)
}

/// Ask Claude for one non-interactive answer.
///
/// The reply comes back wrapped in the CLI's JSON result envelope, which
/// the generator unwraps.
pub async fn run_claude(prompt: &str) -> Result<String, ClaudeError> {
    Ok(CLAUDE.run(print_mode_args(prompt)).await?)
}

fn print_mode_args(prompt: &str) -> [&str; 4] {
    ["-p", prompt, "--output-format", "json"]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_is_passed_as_single_print_argument() {
        let prompt = "Write a concise git commit message for the following code changes:\n+x";
        assert_eq!(
            print_mode_args(prompt),
            ["-p", prompt, "--output-format", "json"]
        );
    }

    #[test]
    fn test_cli_failures_map_to_claude_errors() {
        assert!(matches!(
            ClaudeError::from(CliFailure::NotInstalled),
            ClaudeError::NotInstalled
        ));
        assert!(matches!(
            ClaudeError::from(CliFailure::Timeout(300)),
            ClaudeError::Timeout(300)
        ));

        let error = ClaudeError::from(CliFailure::NonZeroExit {
            code: 1,
            stderr: "Claude API rate limit exceeded".to_string(),
        });
        let message = error.to_string();
        assert!(message.contains("code 1"));
        assert!(message.contains("rate limit exceeded"));
    }
}
