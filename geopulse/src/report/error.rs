//! Error types for location reporting.

use thiserror::Error;

/// Errors from a single report attempt.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Nothing to report yet.
    #[error("No location available")]
    NoPosition,

    /// Building the HTTP client failed.
    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(String),

    /// The request did not complete.
    #[error("HTTP request failed: {0}")]
    Http(String),

    /// The collector answered with a non-success status.
    #[error("Server responded with status {0}")]
    Status(u16),

    /// The response body could not be read.
    #[error("Failed to parse response: {0}")]
    Json(String),

    /// The collector answered without `"success": true`.
    #[error("Server rejected the report{}", .0.as_deref().map(|m| format!(": {}", m)).unwrap_or_default())]
    Rejected(Option<String>),
}

/// Errors on the push channel.
#[derive(Debug, Error)]
pub enum PushError {
    /// The connection could not be established.
    #[error("Failed to connect to {url}: {reason}")]
    Connect { url: String, reason: String },

    /// The established connection failed.
    #[error("Connection error: {0}")]
    Connection(String),
}
