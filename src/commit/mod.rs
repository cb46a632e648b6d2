//! AI-generated commit messages: prompt and draft.

pub mod message;
pub mod prompt;

pub use message::DraftCommitMessage;
pub use prompt::{COMMIT_DIRECTIVE, build_commit_prompt};
