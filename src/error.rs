//! Error types for docmux
//!
//! Provides a unified error type for all operations.

use thiserror::Error;

use crate::mux::RequestId;

/// Result type alias using DocmuxError
pub type Result<T> = std::result::Result<T, DocmuxError>;

/// Unified error type for docmux operations
#[derive(Debug, Error)]
pub enum DocmuxError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Serialization Errors
    // -------------------------------------------------------------------------
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // -------------------------------------------------------------------------
    // Protocol Errors
    // -------------------------------------------------------------------------
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// Failure reported by the server; the message is passed through untouched.
    #[error("{0}")]
    Remote(String),

    // -------------------------------------------------------------------------
    // Request Lifecycle Errors
    // -------------------------------------------------------------------------
    #[error("Connection closed: {0}")]
    Disconnected(String),

    #[error("Request {id} timed out after {waited_ms} ms")]
    Timeout { id: RequestId, waited_ms: u64 },

    #[error("Request {0} was abandoned before a reply arrived")]
    Abandoned(RequestId),

    // -------------------------------------------------------------------------
    // Network Errors
    // -------------------------------------------------------------------------
    #[error("Network error: {0}")]
    Network(String),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

impl DocmuxError {
    /// Server-reported failure message, if this is one
    pub fn remote_message(&self) -> Option<&str> {
        match self {
            DocmuxError::Remote(message) => Some(message),
            _ => None,
        }
    }
}
