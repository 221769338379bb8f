//! Gamma command handlers
//!
//! Handles starting generations, checking on them, waiting for them to
//! finish, and listing workspace themes and folders.

use anyhow::{Context, Result, bail};
use clap::{Args, Subcommand};
use colored::*;
use genflow_client::{GammaClient, PollError};
use genflow_core::domain::job::{JobHandle, JobStatus, Payload};
use genflow_core::dto::gamma::{ExportFormat, Format, GenerationRequest, TextMode};
use serde_json::Value;
use std::path::PathBuf;

use crate::config::Config;
use crate::types::JsonArg;

/// Result fields worth showing, in display order
const URL_FIELDS: [(&str, &str); 3] = [
    ("gammaUrl", "Gamma URL"),
    ("pdfUrl", "PDF URL"),
    ("pptxUrl", "PPTX URL"),
];

/// Gamma subcommands
#[derive(Subcommand)]
pub enum GammaCommands {
    /// Start a new generation
    Generate {
        #[command(flatten)]
        content: ContentArgs,

        #[command(flatten)]
        options: GenerationOptions,

        /// Wait for the generation to finish and print its URLs
        #[arg(short, long)]
        wait: bool,
    },
    /// Show the current status of a generation
    Status {
        /// Generation ID
        id: String,
    },
    /// Wait for one or more generations to finish
    Wait {
        /// Generation IDs
        #[arg(required = true)]
        ids: Vec<String>,
    },
    /// List available themes
    Themes,
    /// List available folders
    Folders,
}

/// Input text for a generation
#[derive(Args, Debug, Clone)]
pub struct ContentArgs {
    /// Content to generate from
    #[arg(required_unless_present = "file", conflicts_with = "file")]
    pub text: Option<String>,

    /// Read the content from a file
    #[arg(short, long)]
    pub file: Option<PathBuf>,
}

impl ContentArgs {
    pub fn read(&self) -> Result<String> {
        let text = match (&self.text, &self.file) {
            (Some(text), _) => text.clone(),
            (None, Some(path)) => std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?,
            (None, None) => bail!("No content given (pass TEXT or --file)"),
        };

        if text.trim().is_empty() {
            bail!("Content is empty");
        }
        Ok(text)
    }
}

/// Generation settings shared by `gamma generate` and the workflows
#[derive(Args, Debug, Clone)]
pub struct GenerationOptions {
    /// generate, condense or preserve
    #[arg(long, default_value = "generate")]
    pub text_mode: TextMode,

    /// presentation, document, webpage or social
    #[arg(long, default_value = "presentation")]
    pub format: Format,

    /// Number of cards/slides
    #[arg(long, default_value_t = GenerationRequest::DEFAULT_NUM_CARDS)]
    pub num_cards: u32,

    /// Custom theme ID
    #[arg(long)]
    pub theme_id: Option<String>,

    /// Extra instructions for the generator
    #[arg(long)]
    pub instructions: Option<String>,

    /// Additional export: pdf or pptx
    #[arg(long)]
    pub export_as: Option<ExportFormat>,

    /// Text options as JSON or @file (language, tone, audience)
    #[arg(long)]
    pub text_options: Option<JsonArg>,

    /// Image options as JSON or @file
    #[arg(long)]
    pub image_options: Option<JsonArg>,

    /// Folder to store the gamma in (repeatable)
    #[arg(long = "folder-id")]
    pub folder_ids: Vec<String>,
}

impl GenerationOptions {
    /// Builds the request body for `input_text`
    pub fn to_request(&self, input_text: String) -> Result<GenerationRequest> {
        let mut req = GenerationRequest::new(input_text);
        req.text_mode = self.text_mode;
        req.format = self.format;
        req.num_cards = self.num_cards;
        req.theme_id = self.theme_id.clone();
        req.additional_instructions = self.instructions.clone();
        req.export_as = self.export_as;
        req.text_options = self
            .text_options
            .as_ref()
            .map(JsonArg::load)
            .transpose()
            .context("Invalid --text-options")?;
        req.image_options = self
            .image_options
            .as_ref()
            .map(JsonArg::load)
            .transpose()
            .context("Invalid --image-options")?;
        req.folder_ids = self.folder_ids.clone();
        Ok(req)
    }
}

/// Handle gamma commands
pub async fn handle_gamma_command(command: GammaCommands, config: &Config) -> Result<()> {
    let client = config.gamma_client()?;

    match command {
        GammaCommands::Generate {
            content,
            options,
            wait,
        } => generate(&client, &content, &options, wait, config).await,
        GammaCommands::Status { id } => show_status(&client, &id).await,
        GammaCommands::Wait { ids } => wait_for_generations(&client, ids, config).await,
        GammaCommands::Themes => list_values(client.list_themes().await?, "themes"),
        GammaCommands::Folders => list_values(client.list_folders().await?, "folders"),
    }
}

/// Start a generation, optionally waiting for it
async fn generate(
    client: &GammaClient,
    content: &ContentArgs,
    options: &GenerationOptions,
    wait: bool,
    config: &Config,
) -> Result<()> {
    let req = options.to_request(content.read()?)?;
    let handle = client.generate(&req).await.context("Failed to start generation")?;

    println!("{} Generation started: {}", "✓".green(), handle.to_string().cyan());

    if wait {
        wait_for_generations(client, vec![handle.to_string()], config).await?;
    }

    Ok(())
}

/// Start a generation and wait for its result
///
/// Used by the workflows, which need the payload rather than a report.
pub async fn generate_and_wait(
    client: &GammaClient,
    req: &GenerationRequest,
    config: &Config,
) -> Result<Payload> {
    let handle = client.generate(req).await.context("Failed to start generation")?;
    println!("{} Generation started: {}", "✓".green(), handle.to_string().cyan());
    println!("{}", "  Waiting for completion...".dimmed());

    client
        .wait_for_generation(&handle, &config.poll, &config.cancel)
        .await
        .map_err(anyhow::Error::from)
}

/// Show the status of a single generation
async fn show_status(client: &GammaClient, id: &str) -> Result<()> {
    let handle = JobHandle::new(id);
    let status = client.generation_status(&handle).await?;

    println!("{}", "Generation:".bold());
    println!("  ID:     {}", handle.to_string().cyan());
    println!("  Status: {}", colorize_status(&status));

    match &status {
        JobStatus::Completed(payload) => print_generation_urls(payload),
        JobStatus::Failed(detail) => {
            println!("\n{}", "Error:".bold());
            println!("{}", detail.red());
        }
        JobStatus::Pending(_) => {}
    }

    Ok(())
}

/// Wait for every handle concurrently, one task per handle
async fn wait_for_generations(
    client: &GammaClient,
    ids: Vec<String>,
    config: &Config,
) -> Result<()> {
    let total = ids.len();
    let mut tasks = Vec::with_capacity(total);

    for id in ids {
        let handle = JobHandle::new(id);
        let client = client.clone();
        let poll = config.poll.clone();
        let cancel = config.cancel.clone();

        tasks.push(tokio::spawn(async move {
            let result = client.wait_for_generation(&handle, &poll, &cancel).await;
            (handle, result)
        }));
    }

    let mut unfinished = 0;
    for task in tasks {
        let (handle, result) = task.await.context("Wait task panicked")?;
        match result {
            Ok(payload) => {
                println!("{} Generation {} completed", "✓".green(), handle.to_string().cyan());
                print_generation_urls(&payload);
            }
            Err(e) => {
                unfinished += 1;
                print_wait_failure(&handle, &e);
            }
        }
    }

    if unfinished > 0 {
        bail!("{} of {} generation(s) did not complete", unfinished, total);
    }

    Ok(())
}

/// Print the URLs of a finished gamma
pub fn print_generation_urls(payload: &Payload) {
    for (field, label) in URL_FIELDS {
        if let Some(url) = payload.get(field).and_then(Value::as_str) {
            println!("  {:<10} {}", format!("{}:", label), url.underline());
        }
    }
}

fn print_wait_failure(handle: &JobHandle, error: &PollError) {
    let id = handle.to_string();
    match error {
        PollError::GenerationFailed { detail, .. } => {
            println!("{} Generation {} failed: {}", "✗".red(), id.cyan(), detail.red())
        }
        PollError::Timeout { max_wait, .. } => println!(
            "{} Generation {} still running after {}s",
            "⚠".yellow(),
            id.cyan(),
            max_wait.as_secs()
        ),
        PollError::Cancelled { .. } => {
            println!("{} Wait for {} cancelled", "•".dimmed(), id.cyan())
        }
        PollError::Transport(e) => {
            println!("{} Status check for {} failed: {}", "✗".red(), id.cyan(), e)
        }
        PollError::InvalidRequest(message) => {
            println!("{} {}: {}", "✗".red(), id.cyan(), message)
        }
    }
}

fn list_values(values: Vec<Value>, what: &str) -> Result<()> {
    if values.is_empty() {
        println!("{}", format!("No {} found.", what).yellow());
        return Ok(());
    }

    println!("{}", format!("Found {} {}:", values.len(), what).bold());
    println!();
    for value in values {
        let id = value.get("id").and_then(Value::as_str).unwrap_or("-");
        let name = value.get("name").and_then(Value::as_str).unwrap_or("");
        println!("  {} {} {}", "▸".cyan(), name, id.dimmed());
    }

    Ok(())
}

/// Colorize generation status for display
fn colorize_status(status: &JobStatus) -> colored::ColoredString {
    let label = if status.label().is_empty() {
        "unknown"
    } else {
        status.label()
    };
    match status {
        JobStatus::Pending(_) => label.yellow(),
        JobStatus::Completed(_) => label.green(),
        JobStatus::Failed(_) => label.red(),
    }
}
