//! commitdraft - CLI entry point.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::debug;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use commitdraft::app::{Command, Controller, Dispatched};
use commitdraft::error::WorkflowError;
use commitdraft::git::{GitWorkspace, Workspace};
use commitdraft::llm::openai::DEFAULT_MODEL;
use commitdraft::llm::{Provider, ProviderSettings, build_generator, check_provider_available};
use commitdraft::ui::{HostSurface, TerminalSurface};
use commitdraft::workflow::CommitWorkflow;

/// Generate a commit message for pending changes, edit it, and commit.
#[derive(Parser, Debug)]
#[command(name = "commitdraft")]
#[command(about = "Generate, edit and commit an AI-written commit message")]
#[command(version)]
struct Cli {
    /// Directory to resolve the repository from
    #[arg(short = 'C', long, default_value = ".")]
    repo: PathBuf,

    /// Text-generation provider
    #[arg(short, long, value_enum, default_value_t = Provider::Claude)]
    provider: Provider,

    /// Model for the OpenAI provider
    #[arg(short, long, default_value = DEFAULT_MODEL)]
    model: String,

    /// Dry run - print the generated message and exit
    #[arg(long)]
    dry_run: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

/// Workspace for `path`, or `NoRepository` when no repository encloses it.
fn resolve_workspace(path: &Path) -> Result<GitWorkspace, WorkflowError> {
    let workspace = GitWorkspace::new(path);
    match workspace.repository() {
        Some(repo) => {
            debug!("Using repository at {}", repo.workdir().display());
            Ok(workspace)
        }
        None => Err(WorkflowError::NoRepository),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if cli.verbose { "debug" } else { "warn" })
    });
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();

    let surface = Arc::new(TerminalSurface::new());
    let workspace = match resolve_workspace(&cli.repo) {
        Ok(workspace) => workspace,
        Err(e) => {
            surface.show_error(&e.to_string());
            std::process::exit(1);
        }
    };

    check_provider_available(cli.provider)
        .await
        .with_context(|| format!("Provider '{}' is not available", cli.provider))?;

    let settings = ProviderSettings {
        provider: cli.provider,
        model: cli.model,
    };
    let generator = build_generator(&settings).context("Failed to set up provider")?;

    let workflow = CommitWorkflow::new(workspace, generator, surface.clone());
    let controller = Controller::activate(workflow);

    println!("Generating commit message with {}...", cli.provider);

    // Errors have already been shown on the surface.
    let generated = controller.dispatch(Command::Generate).await;
    if generated.is_err() {
        controller.deactivate();
        std::process::exit(1);
    }

    if cli.dry_run {
        if let Some(draft) = controller.draft().await {
            println!("\n--- Dry Run Output ---\n");
            println!("{}", draft);
        }
        controller.deactivate();
        return Ok(());
    }

    while let Some(command) = surface.next_activation().await {
        match controller.dispatch(command).await {
            Ok(Dispatched::Edited(outcome)) => debug!("Edit finished: {:?}", outcome),
            Ok(other) => debug!("Dispatch finished: {:?}", other),
            Err(e) => debug!("Dispatch failed: {}", e),
        }
    }

    controller.deactivate();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_directory_outside_repository_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let err = resolve_workspace(dir.path()).unwrap_err();
        assert!(matches!(err, WorkflowError::NoRepository));
    }

    #[test]
    fn test_repository_subdirectory_resolves() {
        let dir = tempfile::tempdir().unwrap();
        git2::Repository::init(dir.path()).unwrap();
        let nested = dir.path().join("src");
        std::fs::create_dir(&nested).unwrap();

        assert!(resolve_workspace(&nested).is_ok());
    }
}
