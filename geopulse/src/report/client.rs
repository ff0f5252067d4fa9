//! HTTP report client.
//!
//! The [`ReportClient`] trait is the one-shot channel to the collector. The
//! [`HttpReportClient`] implementation posts JSON via `reqwest`:
//!
//! ```text
//! POST /send-location
//! {"lat": 53.630278, "long": 9.988333}
//!
//! 200 OK
//! {"success": true}
//! ```

use std::future::Future;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::error::ReportError;
use crate::location::Position;

/// Request body.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LocationPayload {
    pub lat: f64,
    pub long: f64,
}

impl From<&Position> for LocationPayload {
    fn from(position: &Position) -> Self {
        Self {
            lat: position.latitude,
            long: position.longitude,
        }
    }
}

/// Response body. A missing `success` flag counts as failure.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReportResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
}

/// Sends a position to the collector.
pub trait ReportClient: Send + Sync {
    /// Post one payload. `Ok` only when the collector confirmed it.
    fn send_location(
        &self,
        payload: &LocationPayload,
    ) -> impl Future<Output = Result<(), ReportError>> + Send;
}

/// Collector client over HTTP.
///
/// Holds a reusable `reqwest::Client`, so connections are pooled across
/// reports.
#[derive(Debug, Clone)]
pub struct HttpReportClient {
    http: reqwest::Client,
    url: String,
}

impl HttpReportClient {
    /// Create a client posting to `url` with the given request timeout.
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, ReportError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ReportError::ClientBuild(e.to_string()))?;

        Ok(Self {
            http,
            url: url.into(),
        })
    }

    /// Endpoint URL.
    pub fn url(&self) -> &str {
        &self.url
    }
}

impl ReportClient for HttpReportClient {
    async fn send_location(&self, payload: &LocationPayload) -> Result<(), ReportError> {
        let response = self
            .http
            .post(&self.url)
            .json(payload)
            .send()
            .await
            .map_err(|e| ReportError::Http(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ReportError::Status(status.as_u16()));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| ReportError::Http(e.to_string()))?;
        let body: ReportResponse =
            serde_json::from_slice(&bytes).map_err(|e| ReportError::Json(e.to_string()))?;

        tracing::debug!(
            url = %self.url,
            status = status.as_u16(),
            success = body.success,
            "Report response received"
        );

        if body.success {
            Ok(())
        } else {
            Err(ReportError::Rejected(body.message))
        }
    }
}
