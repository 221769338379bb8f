//! DocsAutomator command handlers

use anyhow::{Context, Result};
use clap::Subcommand;
use colored::*;
use genflow_core::dto::docs::{Automation, CreateDocument, DocumentUrls};

use crate::config::Config;
use crate::types::{JsonArg, parse_key_val, template_values};

/// DocsAutomator subcommands
#[derive(Subcommand)]
pub enum DocsCommands {
    /// Create a document from a template
    Create {
        /// Automation/template ID
        doc_id: String,

        /// Placeholder values as a JSON object or @file
        #[arg(short, long)]
        data: Option<JsonArg>,

        /// Single placeholder value as key=value (repeatable)
        #[arg(long = "field", value_parser = parse_key_val)]
        fields: Vec<(String, String)>,

        /// Name of the generated document
        #[arg(short, long)]
        name: Option<String>,
    },
    /// List automations in the workspace
    Automations,
    /// Update an automation's settings
    Update {
        /// Automation ID
        doc_id: String,

        /// Fields to update as a JSON object or @file
        #[arg(short, long)]
        updates: JsonArg,
    },
}

/// Handle docs commands
pub async fn handle_docs_command(command: DocsCommands, config: &Config) -> Result<()> {
    let client = config.docs_client()?;

    match command {
        DocsCommands::Create {
            doc_id,
            data,
            fields,
            name,
        } => {
            let req = CreateDocument {
                doc_id,
                data: template_values(data.as_ref(), &fields)?,
                document_name: name,
            };
            let urls = client
                .create_document(&req)
                .await
                .context("Failed to create document")?;

            println!("{}", "✓ Document created".green());
            print_document_urls(&urls);
            Ok(())
        }
        DocsCommands::Automations => {
            let automations = client.list_automations().await?;
            print_automations(&automations);
            Ok(())
        }
        DocsCommands::Update { doc_id, updates } => {
            let updates = updates.load()?;
            let updated = client
                .update_automation(&doc_id, &updates)
                .await
                .context("Failed to update automation")?;

            println!("{}", format!("✓ Automation {} updated", doc_id).green());
            println!("{}", serde_json::to_string_pretty(&updated)?);
            Ok(())
        }
    }
}

/// Print the locations of a rendered document
pub fn print_document_urls(urls: &DocumentUrls) {
    if let Some(url) = &urls.google_doc_url {
        println!("  Google Doc: {}", url.underline());
    }
    if let Some(url) = &urls.pdf_url {
        println!("  PDF URL:    {}", url.underline());
    }
    if let Some(folder) = &urls.save_pdf_google_drive_folder_id {
        println!("  Drive folder: {}", folder.dimmed());
    }
}

fn print_automations(automations: &[Automation]) {
    if automations.is_empty() {
        println!("{}", "No automations found.".yellow());
        return;
    }

    println!(
        "{}",
        format!("Found {} automation(s):", automations.len()).bold()
    );
    println!();
    for automation in automations {
        println!(
            "  {} {} {}",
            "▸".cyan(),
            automation.title.as_deref().unwrap_or("(untitled)"),
            automation.id.dimmed()
        );
    }
}
