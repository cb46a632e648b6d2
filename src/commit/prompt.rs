//! Prompt construction for AI-generated commit messages.

/// Directive placed ahead of the diff.
pub const COMMIT_DIRECTIVE: &str =
    "Write a concise git commit message for the following code changes:";

/// Build the LLM prompt for generating a commit message.
///
/// The diff is embedded verbatim, including when it is empty. Deciding what
/// to say about "no changes" is left to the provider.
pub fn build_commit_prompt(diff_text: &str) -> String {
    format!("{COMMIT_DIRECTIVE}\n{diff_text}")
}
