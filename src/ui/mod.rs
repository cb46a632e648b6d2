//! Host UI surface: where drafts are shown and where the user answers.

pub mod terminal;

use std::sync::Arc;

use async_trait::async_trait;

use crate::app::Command;

pub use terminal::TerminalSurface;

/// A persistent status display with an attached activation command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Indicator {
    pub text: String,
    pub tooltip: String,
    /// Dispatched when the user activates the indicator.
    pub command: Command,
}

/// Answer to a yes/no question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryChoice {
    Yes,
    No,
}

/// The host that displays drafts and collects user input.
///
/// Prompts return `None` when the user dismisses them.
#[async_trait]
pub trait HostSurface: Send + Sync {
    /// Show (or replace) the persistent indicator.
    fn show_indicator(&self, indicator: Indicator);

    fn hide_indicator(&self);

    /// Ask for free text, pre-filled with `initial`.
    async fn prompt_editable_text(&self, prompt: &str, initial: &str) -> Option<String>;

    async fn prompt_binary_choice(&self, question: &str) -> Option<BinaryChoice>;

    fn show_error(&self, message: &str);

    fn show_info(&self, message: &str);
}

#[async_trait]
impl<T: HostSurface + ?Sized> HostSurface for Arc<T> {
    fn show_indicator(&self, indicator: Indicator) {
        (**self).show_indicator(indicator)
    }

    fn hide_indicator(&self) {
        (**self).hide_indicator()
    }

    async fn prompt_editable_text(&self, prompt: &str, initial: &str) -> Option<String> {
        (**self).prompt_editable_text(prompt, initial).await
    }

    async fn prompt_binary_choice(&self, question: &str) -> Option<BinaryChoice> {
        (**self).prompt_binary_choice(question).await
    }

    fn show_error(&self, message: &str) {
        (**self).show_error(message)
    }

    fn show_info(&self, message: &str) {
        (**self).show_info(message)
    }
}
