//! Reply definitions
//!
//! Represents the JSON envelope the server sends back for every command.

use serde::Deserialize;
use serde_json::Value;

use crate::error::{DocmuxError, Result};

/// Status value the server uses for successful replies
pub const STATUS_SUCCESS: &str = "success";

/// Reply envelope as it appears on the wire
#[derive(Debug, Clone, Deserialize)]
struct Envelope {
    status: String,

    #[serde(default)]
    data: Option<Value>,

    #[serde(default)]
    message: Option<String>,
}

/// A decoded reply
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    /// Command succeeded; `Null` when the server sent no data
    Success(Value),

    /// Command failed with the server's message
    Failure(String),
}

impl Reply {
    /// Parse a JSON payload into a reply
    ///
    /// Any status other than `"success"` is a failure and must carry a
    /// `message`.
    pub fn parse(payload: &str) -> Result<Self> {
        let envelope: Envelope = serde_json::from_str(payload)?;

        if envelope.status == STATUS_SUCCESS {
            return Ok(Reply::Success(envelope.data.unwrap_or(Value::Null)));
        }

        match envelope.message {
            Some(message) => Ok(Reply::Failure(message)),
            None => Err(DocmuxError::Protocol(format!(
                "reply with status '{}' has no message",
                envelope.status
            ))),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Reply::Success(_))
    }

    /// Convert into a result, mapping failures to `DocmuxError::Remote`
    pub fn into_result(self) -> Result<Value> {
        match self {
            Reply::Success(data) => Ok(data),
            Reply::Failure(message) => Err(DocmuxError::Remote(message)),
        }
    }
}
