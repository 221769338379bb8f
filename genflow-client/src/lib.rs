//! Genflow HTTP Client
//!
//! Type-safe HTTP clients for the Gamma and DocsAutomator generation APIs,
//! plus the poller used to wait for long-running Gamma generations.
//!
//! # Example
//!
//! ```no_run
//! use genflow_client::{GammaClient, PollConfig};
//! use genflow_core::dto::gamma::GenerationRequest;
//! use tokio_util::sync::CancellationToken;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = GammaClient::new("my-api-key");
//!
//!     let handle = client.generate(&GenerationRequest::new("# Quarterly review")).await?;
//!     let payload = client
//!         .wait_for_generation(&handle, &PollConfig::default(), &CancellationToken::new())
//!         .await?;
//!
//!     println!("Gamma URL: {}", payload["gammaUrl"]);
//!     Ok(())
//! }
//! ```

pub mod config;
mod docs;
pub mod error;
mod gamma;
pub mod poller;

// Re-export commonly used types
pub use config::PollConfig;
pub use docs::DocsAutomatorClient;
pub use error::{ClientError, PollError, Result};
pub use gamma::GammaClient;
pub use poller::{JobPoller, StatusFetcher};

use serde::de::DeserializeOwned;

/// Handle an API response and deserialize JSON
///
/// This checks the status code and returns an `ApiError` carrying it if
/// the request failed, or deserializes the response body if successful.
pub(crate) async fn handle_response<T: DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T> {
    let status = response.status();

    if !status.is_success() {
        let error_text = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        return Err(ClientError::api_error(status.as_u16(), error_text));
    }

    response
        .json()
        .await
        .map_err(|e| ClientError::ParseError(format!("Failed to parse JSON response: {}", e)))
}

pub(crate) fn normalize_base_url(base_url: impl Into<String>) -> String {
    base_url.into().trim_end_matches('/').to_string()
}
