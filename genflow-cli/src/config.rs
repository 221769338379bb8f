//! Configuration module
//!
//! Handles CLI configuration: API credentials, endpoints, HTTP timeouts,
//! poll settings and the cancellation token shared by every wait.

use anyhow::{Context, Result};
use genflow_client::{DocsAutomatorClient, GammaClient, PollConfig};
use reqwest::Client;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// CLI configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub gamma_api_key: Option<String>,
    pub docsautomator_api_key: Option<String>,
    pub gamma_base_url: String,
    pub docsautomator_base_url: String,
    /// Bound on each individual HTTP call
    pub request_timeout: Duration,
    pub poll: PollConfig,
    /// Fired on Ctrl-C
    pub cancel: CancellationToken,
}

impl Config {
    /// Builds a Gamma client, failing if no API key is configured
    pub fn gamma_client(&self) -> Result<GammaClient> {
        let key = require_key(
            self.gamma_api_key.as_deref(),
            "Gamma API key not set (use --gamma-api-key or GAMMA_API_KEY)",
        )?;
        Ok(GammaClient::with_client(
            &self.gamma_base_url,
            key,
            self.http_client()?,
        ))
    }

    /// Builds a DocsAutomator client, failing if no API key is configured
    pub fn docs_client(&self) -> Result<DocsAutomatorClient> {
        let key = require_key(
            self.docsautomator_api_key.as_deref(),
            "DocsAutomator API key not set (use --docsautomator-api-key or DOCSAUTOMATOR_API_KEY)",
        )?;
        Ok(DocsAutomatorClient::with_client(
            &self.docsautomator_base_url,
            key,
            self.http_client()?,
        ))
    }

    fn http_client(&self) -> Result<Client> {
        Client::builder()
            .timeout(self.request_timeout)
            .build()
            .context("Failed to build HTTP client")
    }
}

fn require_key<'a>(key: Option<&'a str>, missing: &'static str) -> Result<&'a str> {
    key.map(str::trim)
        .filter(|key| !key.is_empty())
        .context(missing)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> Config {
        Config {
            gamma_api_key: Some("gamma-key".to_string()),
            docsautomator_api_key: None,
            gamma_base_url: "http://localhost:9000/".to_string(),
            docsautomator_base_url: DocsAutomatorClient::DEFAULT_BASE_URL.to_string(),
            request_timeout: Duration::from_secs(5),
            poll: PollConfig::default(),
            cancel: CancellationToken::new(),
        }
    }

    #[test]
    fn test_clients_require_keys() {
        let config = test_config();

        let gamma = config.gamma_client().unwrap();
        assert_eq!(gamma.base_url(), "http://localhost:9000");

        let err = config.docs_client().unwrap_err();
        assert!(err.to_string().contains("DOCSAUTOMATOR_API_KEY"));
    }

    #[test]
    fn test_blank_key_counts_as_missing() {
        let mut config = test_config();
        config.gamma_api_key = Some("   ".to_string());
        assert!(config.gamma_client().is_err());
    }
}
