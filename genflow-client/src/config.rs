//! Poll configuration
//!
//! Defines how long to wait for a generation and how often to check on it.

use std::time::Duration;

use crate::error::PollError;

/// Settings for one wait on a generation job
///
/// Defaults match the pacing the generation APIs expect: a five minute
/// budget checked every five seconds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollConfig {
    /// Total wall-clock budget; zero means check exactly once
    pub max_wait: Duration,

    /// Delay between two status checks
    pub poll_interval: Duration,

    /// How many "not found yet" responses to tolerate before giving up
    ///
    /// `None` tolerates them for the whole wait.
    pub max_not_found: Option<u32>,
}

impl PollConfig {
    pub const DEFAULT_MAX_WAIT: Duration = Duration::from_secs(300);
    pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

    /// Creates a configuration with explicit budget and interval
    pub fn new(max_wait: Duration, poll_interval: Duration) -> Self {
        Self {
            max_wait,
            poll_interval,
            max_not_found: None,
        }
    }

    /// Creates configuration from environment variables
    ///
    /// Recognized environment variables (unset or unparsable values fall
    /// back to the defaults):
    /// - GENFLOW_MAX_WAIT (seconds, default: 300)
    /// - GENFLOW_POLL_INTERVAL (seconds, default: 5)
    /// - GENFLOW_MAX_NOT_FOUND (count, default: unbounded)
    pub fn from_env() -> Self {
        let max_wait = std::env::var("GENFLOW_MAX_WAIT")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or(Self::DEFAULT_MAX_WAIT);

        let poll_interval = std::env::var("GENFLOW_POLL_INTERVAL")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or(Self::DEFAULT_POLL_INTERVAL);

        let max_not_found = std::env::var("GENFLOW_MAX_NOT_FOUND")
            .ok()
            .and_then(|s| s.parse::<u32>().ok());

        Self {
            max_wait,
            poll_interval,
            max_not_found,
        }
    }

    pub fn with_max_wait(mut self, max_wait: Duration) -> Self {
        self.max_wait = max_wait;
        self
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    pub fn with_max_not_found(mut self, max_not_found: Option<u32>) -> Self {
        self.max_not_found = max_not_found;
        self
    }

    /// Validates the configuration
    pub fn validate(&self) -> Result<(), PollError> {
        if !self.max_wait.is_zero() && self.poll_interval.is_zero() {
            return Err(PollError::InvalidRequest(
                "poll_interval must be greater than 0 when max_wait is set".to_string(),
            ));
        }

        Ok(())
    }
}

impl Default for PollConfig {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MAX_WAIT, Self::DEFAULT_POLL_INTERVAL)
    }
}
