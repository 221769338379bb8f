//! Gamma generation DTOs

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::str::FromStr;

/// How Gamma treats the input text
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextMode {
    #[default]
    Generate,
    Condense,
    Preserve,
}

/// Kind of artifact to generate
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    #[default]
    Presentation,
    Document,
    Webpage,
    Social,
}

/// Additional export produced alongside the gamma
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Pdf,
    Pptx,
}

impl FromStr for TextMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "generate" => Ok(Self::Generate),
            "condense" => Ok(Self::Condense),
            "preserve" => Ok(Self::Preserve),
            other => Err(format!(
                "unknown text mode '{}' (expected generate, condense or preserve)",
                other
            )),
        }
    }
}

impl FromStr for Format {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "presentation" => Ok(Self::Presentation),
            "document" => Ok(Self::Document),
            "webpage" => Ok(Self::Webpage),
            "social" => Ok(Self::Social),
            other => Err(format!(
                "unknown format '{}' (expected presentation, document, webpage or social)",
                other
            )),
        }
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pdf" => Ok(Self::Pdf),
            "pptx" => Ok(Self::Pptx),
            other => Err(format!("unknown export format '{}' (expected pdf or pptx)", other)),
        }
    }
}

/// Request to start a new generation
///
/// Optional fields are left out of the body entirely when unset so the
/// remote side applies its own defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRequest {
    pub input_text: String,
    pub text_mode: TextMode,
    pub format: Format,
    pub num_cards: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_instructions: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub export_as: Option<ExportFormat>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_options: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_options: Option<Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub folder_ids: Vec<String>,
}

impl GenerationRequest {
    /// Default number of cards when the caller does not pick one
    pub const DEFAULT_NUM_CARDS: u32 = 10;

    pub fn new(input_text: impl Into<String>) -> Self {
        Self {
            input_text: input_text.into(),
            text_mode: TextMode::default(),
            format: Format::default(),
            num_cards: Self::DEFAULT_NUM_CARDS,
            theme_id: None,
            additional_instructions: None,
            export_as: None,
            text_options: None,
            image_options: None,
            folder_ids: Vec::new(),
        }
    }
}

/// Response to a generation request
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationCreated {
    #[serde(default)]
    pub generation_id: Option<String>,
}
