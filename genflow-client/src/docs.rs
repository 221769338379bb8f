//! DocsAutomator API endpoints

use genflow_core::dto::docs::{Automation, AutomationList, CreateDocument, DocumentUrls};
use reqwest::Client;
use serde_json::Value;
use tracing::info;

use crate::error::Result;
use crate::{handle_response, normalize_base_url};

/// HTTP client for the DocsAutomator API
///
/// Document creation is synchronous on the remote side: the response
/// already carries the document URLs, so nothing here needs polling.
#[derive(Debug, Clone)]
pub struct DocsAutomatorClient {
    base_url: String,
    api_key: String,
    client: Client,
}

impl DocsAutomatorClient {
    pub const DEFAULT_BASE_URL: &'static str = "https://api.docsautomator.co";

    /// Create a client for the public DocsAutomator endpoint
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_client(Self::DEFAULT_BASE_URL, api_key, Client::new())
    }

    /// Create a client with a custom base URL and HTTP client
    pub fn with_client(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        client: Client,
    ) -> Self {
        Self {
            base_url: normalize_base_url(base_url),
            api_key: api_key.into(),
            client,
        }
    }

    /// Get the base URL of the API
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Create a document from a template
    ///
    /// # Arguments
    /// * `req` - Template ID, placeholder values and optional document name
    ///
    /// # Returns
    /// The PDF and Google Doc URLs of the rendered document
    ///
    /// # Example
    /// ```no_run
    /// # use genflow_client::DocsAutomatorClient;
    /// # use genflow_core::dto::docs::CreateDocument;
    /// # async fn example() -> anyhow::Result<()> {
    /// let client = DocsAutomatorClient::new("my-api-key");
    /// let urls = client.create_document(&CreateDocument {
    ///     doc_id: "template-id".to_string(),
    ///     data: serde_json::Map::new(),
    ///     document_name: Some("Integration Guide".to_string()),
    /// }).await?;
    /// println!("{:?}", urls.google_doc_url);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn create_document(&self, req: &CreateDocument) -> Result<DocumentUrls> {
        let url = format!("{}/createDocument", self.base_url);
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(req)
            .send()
            .await?;

        let urls: DocumentUrls = handle_response(response).await?;
        info!(doc_id = %req.doc_id, "Document created");
        Ok(urls)
    }

    /// List all automations/templates in the workspace
    pub async fn list_automations(&self) -> Result<Vec<Automation>> {
        let url = format!("{}/automations", self.base_url);
        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.api_key)
            .send()
            .await?;

        let list: AutomationList = handle_response(response).await?;
        Ok(list.automations)
    }

    /// Update an automation's settings
    ///
    /// # Arguments
    /// * `doc_id` - The automation ID
    /// * `updates` - Fields to update
    ///
    /// # Returns
    /// The updated automation as returned by the API
    pub async fn update_automation(&self, doc_id: &str, updates: &Value) -> Result<Value> {
        let url = format!("{}/updateAutomation", self.base_url);
        let response = self
            .client
            .put(&url)
            .bearer_auth(&self.api_key)
            .query(&[("docId", doc_id)])
            .json(updates)
            .send()
            .await?;

        handle_response(response).await
    }
}
