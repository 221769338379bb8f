//! Commands module
//!
//! Defines all CLI commands and their handlers.

mod docs;
mod gamma;
mod workflow;

pub use docs::DocsCommands;
pub use gamma::GammaCommands;
pub use workflow::WorkflowCommands;

use anyhow::Result;
use clap::Subcommand;

use crate::config::Config;

/// Top-level CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Gamma presentations, documents and webpages
    Gamma {
        #[command(subcommand)]
        command: GammaCommands,
    },
    /// DocsAutomator templates and documents
    Docs {
        #[command(subcommand)]
        command: DocsCommands,
    },
    /// Chained flows from note content to generated artifacts
    Workflow {
        #[command(subcommand)]
        command: WorkflowCommands,
    },
}

/// Handle a CLI command
///
/// Routes the command to the appropriate handler module.
pub async fn handle_command(command: Commands, config: &Config) -> Result<()> {
    match command {
        Commands::Gamma { command } => gamma::handle_gamma_command(command, config).await,
        Commands::Docs { command } => docs::handle_docs_command(command, config).await,
        Commands::Workflow { command } => {
            workflow::handle_workflow_command(command, config).await
        }
    }
}
