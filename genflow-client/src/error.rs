//! Error types for the genflow client

use genflow_core::domain::job::JobHandle;
use std::time::Duration;
use thiserror::Error;

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors that can occur when calling a remote generation service
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// API returned an error status code
    #[error("API error (status {status}): {message}")]
    ApiError {
        /// HTTP status code
        status: u16,
        /// Error message from the API
        message: String,
    },

    /// Failed to parse response
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// Invalid request
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl ClientError {
    /// Create an API error from status code and message
    pub fn api_error(status: u16, message: impl Into<String>) -> Self {
        Self::ApiError {
            status,
            message: message.into(),
        }
    }

    /// HTTP status code attached to this error, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::ApiError { status, .. } => Some(*status),
            Self::RequestFailed(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Check if this error is a "not found" error
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    /// Check if this error is a client error (4xx status)
    pub fn is_client_error(&self) -> bool {
        matches!(self.status(), Some(status) if (400..500).contains(&status))
    }

    /// Check if this error is a server error (5xx status)
    pub fn is_server_error(&self) -> bool {
        matches!(self.status(), Some(status) if status >= 500)
    }
}

/// Outcomes of a wait that did not end in a completed job
///
/// Every variant is a distinct way a wait can end; callers match on them
/// rather than on messages.
#[derive(Debug, Error)]
pub enum PollError {
    /// The remote service reported a terminal failure
    #[error("Generation {handle} failed: {detail}")]
    GenerationFailed { handle: JobHandle, detail: String },

    /// The job was still running when the wait budget ran out
    #[error("Generation {handle} did not complete within {} seconds", max_wait.as_secs())]
    Timeout { handle: JobHandle, max_wait: Duration },

    /// The caller cancelled the wait
    #[error("Wait for generation {handle} was cancelled")]
    Cancelled { handle: JobHandle },

    /// Unrecoverable failure of the status check itself
    #[error(transparent)]
    Transport(#[from] ClientError),

    /// The wait was not started because its inputs are unusable
    #[error("Invalid poll request: {0}")]
    InvalidRequest(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_classification() {
        let not_found = ClientError::api_error(404, "Generation not found");
        assert!(not_found.is_not_found());
        assert!(not_found.is_client_error());
        assert!(!not_found.is_server_error());

        let server = ClientError::api_error(503, "unavailable");
        assert_eq!(server.status(), Some(503));
        assert!(server.is_server_error());
        assert!(!server.is_not_found());

        let parse = ClientError::ParseError("bad json".to_string());
        assert_eq!(parse.status(), None);
        assert!(!parse.is_not_found());
    }

    #[test]
    fn test_poll_error_messages() {
        let timeout = PollError::Timeout {
            handle: JobHandle::new("gen-1"),
            max_wait: Duration::from_secs(180),
        };
        assert_eq!(
            timeout.to_string(),
            "Generation gen-1 did not complete within 180 seconds"
        );

        let transport: PollError = ClientError::api_error(500, "boom").into();
        assert_eq!(transport.to_string(), "API error (status 500): boom");
    }
}
