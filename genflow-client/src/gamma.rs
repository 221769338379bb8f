//! Gamma API endpoints

use async_trait::async_trait;
use genflow_core::domain::job::{JobHandle, JobStatus, Payload};
use genflow_core::dto::gamma::{GenerationCreated, GenerationRequest};
use reqwest::Client;
use reqwest::header::{HeaderMap, HeaderValue};
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::config::PollConfig;
use crate::error::{ClientError, PollError, Result};
use crate::poller::{JobPoller, StatusFetcher};
use crate::{handle_response, normalize_base_url};

/// HTTP client for the Gamma public API
///
/// Generations are asynchronous: `generate` returns a handle right away
/// and the finished gamma is observed through `generation_status`.
#[derive(Debug, Clone)]
pub struct GammaClient {
    /// Base URL of the API (e.g., "https://public-api.gamma.app/v1.0")
    base_url: String,
    /// Value of the `X-API-KEY` header
    api_key: String,
    /// HTTP client instance
    client: Client,
}

impl GammaClient {
    pub const DEFAULT_BASE_URL: &'static str = "https://public-api.gamma.app/v1.0";

    /// Create a client for the public Gamma endpoint
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_client(Self::DEFAULT_BASE_URL, api_key, Client::new())
    }

    /// Create a client with a custom base URL and HTTP client
    ///
    /// This allows you to configure timeouts, proxies, TLS settings, or to
    /// point the client at a test server.
    ///
    /// # Example
    /// ```
    /// use genflow_client::GammaClient;
    /// use reqwest::Client;
    /// use std::time::Duration;
    ///
    /// let http_client = Client::builder()
    ///     .timeout(Duration::from_secs(30))
    ///     .build()
    ///     .unwrap();
    ///
    /// let client = GammaClient::with_client("http://localhost:8080", "key", http_client);
    /// ```
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

    fn headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        let key = HeaderValue::from_str(&self.api_key).map_err(|_| {
            ClientError::InvalidRequest("API key is not a valid header value".to_string())
        })?;
        headers.insert("x-api-key", key);
        headers.insert(reqwest::header::ACCEPT, HeaderValue::from_static("application/json"));
        Ok(headers)
    }

    // =============================================================================
    // Generations
    // =============================================================================

    /// Start a new generation
    ///
    /// # Arguments
    /// * `req` - The generation request
    ///
    /// # Returns
    /// The handle used to poll for the finished gamma
    pub async fn generate(&self, req: &GenerationRequest) -> Result<JobHandle> {
        let url = format!("{}/generations", self.base_url);
        let response = self
            .client
            .post(&url)
            .headers(self.headers()?)
            .json(req)
            .send()
            .await?;

        let created: GenerationCreated = handle_response(response).await?;
        let id = created
            .generation_id
            .filter(|id| !id.is_empty())
            .ok_or_else(|| ClientError::ParseError("Response has no generationId".to_string()))?;

        info!(generation_id = %id, format = ?req.format, "Generation started");
        Ok(JobHandle::new(id))
    }

    /// Get the status of a generation
    ///
    /// A 404 is returned by the API for a short while after `generate`,
    /// until the status record exists.
    pub async fn generation_status(&self, handle: &JobHandle) -> Result<JobStatus> {
        let url = format!("{}/generations/{}", self.base_url, handle);
        let response = self
            .client
            .get(&url)
            .headers(self.headers()?)
            .send()
            .await?;

        let status: JobStatus = handle_response(response).await?;
        debug!(generation_id = %handle, state = status.label(), "Fetched generation status");
        Ok(status)
    }

    /// Wait for a generation to complete
    ///
    /// # Returns
    /// The result fields of the finished gamma (`gammaUrl`, `pdfUrl`, `pptxUrl`)
    pub async fn wait_for_generation(
        &self,
        handle: &JobHandle,
        config: &PollConfig,
        cancel: &CancellationToken,
    ) -> std::result::Result<Payload, PollError> {
        JobPoller::new(config.clone())
            .wait_for_completion(handle, self, cancel)
            .await
    }

    // =============================================================================
    // Workspace
    // =============================================================================

    /// List available themes
    pub async fn list_themes(&self) -> Result<Vec<Value>> {
        let url = format!("{}/themes", self.base_url);
        let response = self
            .client
            .get(&url)
            .headers(self.headers()?)
            .send()
            .await?;

        handle_response(response).await
    }

    /// List available folders
    pub async fn list_folders(&self) -> Result<Vec<Value>> {
        let url = format!("{}/folders", self.base_url);
        let response = self
            .client
            .get(&url)
            .headers(self.headers()?)
            .send()
            .await?;

        handle_response(response).await
    }
}

#[async_trait]
impl StatusFetcher for GammaClient {
    async fn fetch_status(&self, handle: &JobHandle) -> Result<JobStatus> {
        self.generation_status(handle).await
    }
}
