//! The draft commit message shown to the user.

use std::fmt;

/// The message currently shown to the user.
///
/// A single mutable slot: generation creates it, an explicit edit replaces
/// it, and nothing keeps earlier values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DraftCommitMessage(String);

impl DraftCommitMessage {
    /// Build a draft from a provider completion.
    ///
    /// Returns `None` when the completion has no usable content (empty or
    /// whitespace only).
    pub fn from_completion(completion: &str) -> Option<Self> {
        let trimmed = completion.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Replace the draft wholesale with a user edit.
    pub fn replace(&mut self, message: impl Into<String>) {
        self.0 = message.into();
    }

    /// Text for the persistent status indicator.
    pub fn indicator_text(&self) -> String {
        format!("Commit Message: {}", self.0)
    }
}

impl fmt::Display for DraftCommitMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
