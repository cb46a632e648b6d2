//! Terminal host surface built on dialoguer.
//!
//! The indicator is printed once per change and remembered; the CLI polls
//! [`TerminalSurface::next_activation`] to let the user trigger its command.

use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use dialoguer::{Confirm, Input, Select};
use tracing::debug;

use crate::app::Command;
use crate::ui::{BinaryChoice, HostSurface, Indicator};

/// Label of the menu entry that leaves the activation loop.
const EXIT_LABEL: &str = "Done";

#[derive(Default)]
pub struct TerminalSurface {
    indicator: Mutex<Option<Indicator>>,
}

impl TerminalSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// The indicator currently displayed, if any.
    pub fn current_indicator(&self) -> Option<Indicator> {
        self.slot().clone()
    }

    /// Offer the displayed indicator's command to the user.
    ///
    /// Returns `None` when nothing is displayed or the user chooses to leave.
    pub async fn next_activation(&self) -> Option<Command> {
        let indicator = self.current_indicator()?;
        let tooltip = indicator.tooltip.clone();

        let selection = tokio::task::spawn_blocking(move || {
            Select::new()
                .with_prompt(tooltip)
                .item("Edit")
                .item(EXIT_LABEL)
                .default(0)
                .interact_opt()
                .ok()
                .flatten()
        })
        .await
        .ok()
        .flatten();

        match selection {
            Some(0) => Some(indicator.command),
            _ => None,
        }
    }

    fn slot(&self) -> MutexGuard<'_, Option<Indicator>> {
        self.indicator
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl HostSurface for TerminalSurface {
    fn show_indicator(&self, indicator: Indicator) {
        println!();
        println!("  ● {}", indicator.text);
        println!();
        *self.slot() = Some(indicator);
    }

    fn hide_indicator(&self) {
        if self.slot().take().is_some() {
            debug!("Indicator hidden");
        }
    }

    async fn prompt_editable_text(&self, prompt: &str, initial: &str) -> Option<String> {
        let prompt = prompt.to_string();
        let initial = initial.to_string();

        let answer = tokio::task::spawn_blocking(move || {
            Input::<String>::new()
                .with_prompt(prompt)
                .with_initial_text(initial)
                .allow_empty(true)
                .interact_text()
                .ok()
        })
        .await
        .ok()
        .flatten();

        answer.filter(|text| !text.trim().is_empty())
    }

    async fn prompt_binary_choice(&self, question: &str) -> Option<BinaryChoice> {
        let question = question.to_string();

        let answer = tokio::task::spawn_blocking(move || {
            Confirm::new()
                .with_prompt(question)
                .default(false)
                .interact_opt()
                .ok()
                .flatten()
        })
        .await
        .ok()
        .flatten();

        answer.map(|yes| if yes { BinaryChoice::Yes } else { BinaryChoice::No })
    }

    fn show_error(&self, message: &str) {
        eprintln!("Error: {}", message);
    }

    fn show_info(&self, message: &str) {
        println!("✓ {}", message);
    }
}
