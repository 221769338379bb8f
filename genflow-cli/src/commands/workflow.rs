//! Workflow command handlers
//!
//! Chained flows that turn note content into generated artifacts and
//! print the URLs to write back into the notes.

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use colored::*;
use genflow_client::DocsAutomatorClient;
use genflow_core::domain::job::Payload;
use genflow_core::dto::docs::{CreateDocument, DocumentUrls};
use serde_json::{Map, Value};
use tracing::info;

use super::docs::print_document_urls;
use super::gamma::{ContentArgs, GenerationOptions, generate_and_wait, print_generation_urls};
use crate::config::Config;
use crate::types::{JsonArg, parse_key_val, template_values};

/// Workflow subcommands
#[derive(Subcommand)]
pub enum WorkflowCommands {
    /// Note content to a DocsAutomator document
    Document {
        #[command(flatten)]
        target: DocumentTarget,

        /// Placeholder values as a JSON object or @file
        #[arg(short, long)]
        data: Option<JsonArg>,

        /// Single placeholder value as key=value (repeatable)
        #[arg(long = "field", value_parser = parse_key_val)]
        fields: Vec<(String, String)>,
    },
    /// Note content to a Gamma presentation
    Presentation {
        #[command(flatten)]
        content: ContentArgs,

        #[command(flatten)]
        options: GenerationOptions,
    },
    /// Note content to both a document and a presentation
    Combined {
        #[command(flatten)]
        content: ContentArgs,

        #[command(flatten)]
        target: DocumentTarget,

        /// Extra placeholder value as key=value (repeatable)
        #[arg(long = "field", value_parser = parse_key_val)]
        fields: Vec<(String, String)>,

        #[command(flatten)]
        options: GenerationOptions,
    },
}

/// Which template to render and what to call the result
#[derive(Args, Debug, Clone)]
pub struct DocumentTarget {
    /// Template ID; defaults to the first automation in the workspace
    #[arg(long)]
    pub doc_id: Option<String>,

    /// Name of the generated document
    #[arg(long)]
    pub document_name: Option<String>,
}

/// Handle workflow commands
pub async fn handle_workflow_command(command: WorkflowCommands, config: &Config) -> Result<()> {
    match command {
        WorkflowCommands::Document {
            target,
            data,
            fields,
        } => {
            let docs = config.docs_client()?;
            let values = template_values(data.as_ref(), &fields)?;
            let urls = create_document(&docs, &target, values).await?;
            print_write_back(Some(&urls), None);
            Ok(())
        }
        WorkflowCommands::Presentation { content, options } => {
            let gamma = config.gamma_client()?;
            let req = options.to_request(content.read()?)?;

            println!("{}", "Creating presentation with Gamma...".bold());
            let payload = generate_and_wait(&gamma, &req, config).await?;

            println!("{}", "✓ Presentation created".green());
            print_generation_urls(&payload);
            print_write_back(None, Some(&payload));
            Ok(())
        }
        WorkflowCommands::Combined {
            content,
            target,
            fields,
            options,
        } => {
            let docs = config.docs_client()?;
            let gamma = config.gamma_client()?;
            let text = content.read()?;
            let values = content_values(&text, &fields);
            let req = options.to_request(text)?;

            // A failed render must not leave a generation submitted
            println!("{}", "Step 1: Creating document...".bold());
            let urls = create_document(&docs, &target, values).await?;

            println!("\n{}", "Step 2: Creating presentation...".bold());
            let payload = generate_and_wait(&gamma, &req, config).await?;

            println!("{}", "✓ Presentation created".green());
            print_generation_urls(&payload);
            print_write_back(Some(&urls), Some(&payload));
            Ok(())
        }
    }
}

/// Render `values` into the target template
async fn create_document(
    client: &DocsAutomatorClient,
    target: &DocumentTarget,
    values: Map<String, Value>,
) -> Result<DocumentUrls> {
    let doc_id = match &target.doc_id {
        Some(doc_id) => doc_id.clone(),
        None => {
            let automations = client.list_automations().await?;
            info!("Found {} automation(s)", automations.len());
            automations
                .into_iter()
                .next()
                .map(|automation| automation.id)
                .context("No automations found. Create a template in DocsAutomator first.")?
        }
    };

    println!("{}", format!("Creating document from template {}...", doc_id).bold());
    let urls = client
        .create_document(&CreateDocument {
            doc_id,
            data: values,
            document_name: target.document_name.clone(),
        })
        .await
        .context("Failed to create document")?;

    println!("{}", "✓ Document created".green());
    print_document_urls(&urls);
    Ok(urls)
}

/// Template values for the combined flow: the content plus any extra fields
fn content_values(text: &str, fields: &[(String, String)]) -> Map<String, Value> {
    let mut values = Map::new();
    values.insert("content".to_string(), Value::String(text.to_string()));
    for (key, value) in fields {
        values.insert(key.clone(), Value::String(value.clone()));
    }
    values
}

/// URLs to record back in the note-taking workspace
fn write_back_entries(
    document: Option<&DocumentUrls>,
    presentation: Option<&Payload>,
) -> Vec<(&'static str, String)> {
    let mut entries = Vec::new();

    if let Some(urls) = document {
        if let Some(url) = &urls.google_doc_url {
            entries.push(("Document URL", url.clone()));
        }
    }

    if let Some(payload) = presentation {
        for (field, label) in [("gammaUrl", "Presentation URL"), ("pptxUrl", "PPTX URL")] {
            if let Some(url) = payload.get(field).and_then(Value::as_str) {
                entries.push((label, url.to_string()));
            }
        }
    }

    entries
}

fn print_write_back(document: Option<&DocumentUrls>, presentation: Option<&Payload>) {
    let entries = write_back_entries(document, presentation);
    if entries.is_empty() {
        return;
    }

    println!();
    println!("{}", "Write back to your notes:".bold());
    for (label, url) in entries {
        println!("  - {}: {}", label, url);
    }
}
