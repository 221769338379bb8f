//! Generation job domain types

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Result fields of a completed generation (e.g. `gammaUrl`, `pdfUrl`)
pub type Payload = Map<String, Value>;

/// Detail reported when the remote side gives no reason for a failure
pub const UNKNOWN_ERROR: &str = "Unknown error";

/// Opaque identifier of a remote generation job
///
/// Returned by a submission call and passed into every status poll.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobHandle(String);

impl JobHandle {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl std::fmt::Display for JobHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for JobHandle {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for JobHandle {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl AsRef<str> for JobHandle {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Snapshot of a job returned by one status poll
///
/// Only `Completed` and `Failed` are terminal. Any other remote label,
/// including one this crate has never seen, is kept as `Pending` so that
/// new in-progress states never break a wait loop.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "Value")]
pub enum JobStatus {
    /// Still running; carries the raw remote label (empty if absent)
    Pending(String),
    /// Finished successfully; carries the full result object
    Completed(Payload),
    /// Finished with an error; carries the remote diagnostic
    Failed(String),
}

impl JobStatus {
    /// Interprets a raw status body
    ///
    /// Never fails: a body without a recognized `status` string is pending.
    pub fn from_snapshot(body: Value) -> Self {
        let Value::Object(fields) = body else {
            return Self::Pending(String::new());
        };

        let label = fields
            .get("status")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        match label.as_str() {
            "completed" => Self::Completed(fields),
            "failed" => Self::Failed(failure_detail(&fields)),
            _ => Self::Pending(label),
        }
    }

    /// Whether no further transitions are possible
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed(_) | Self::Failed(_))
    }

    /// The state label as the remote service spells it
    pub fn label(&self) -> &str {
        match self {
            Self::Pending(label) => label,
            Self::Completed(_) => "completed",
            Self::Failed(_) => "failed",
        }
    }
}

impl From<Value> for JobStatus {
    fn from(body: Value) -> Self {
        Self::from_snapshot(body)
    }
}

fn failure_detail(fields: &Payload) -> String {
    match fields.get("error") {
        Some(Value::String(message)) if !message.is_empty() => message.clone(),
        Some(Value::Object(error)) => error
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or(UNKNOWN_ERROR)
            .to_string(),
        _ => UNKNOWN_ERROR.to_string(),
    }
}
