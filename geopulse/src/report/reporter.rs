//! Report attempts.
//!
//! A report takes the last known position and posts it once. Every outcome is
//! turned into an alert here; callers only see the result for logging.

use std::sync::Arc;

use super::client::{LocationPayload, ReportClient};
use super::error::ReportError;
use crate::alert::{Alert, AlertSink};
use crate::location::Position;

/// Sends positions through a [`ReportClient`] and raises the matching alert.
pub struct LocationReporter<C> {
    client: C,
    alerts: Arc<dyn AlertSink>,
}

impl<C: ReportClient> LocationReporter<C> {
    pub fn new(client: C, alerts: Arc<dyn AlertSink>) -> Self {
        Self { client, alerts }
    }

    /// The underlying client.
    pub fn client(&self) -> &C {
        &self.client
    }

    /// Report `position`, if there is one.
    ///
    /// Without a position no request is made. No retry either way.
    pub async fn report(&self, position: Option<Position>) -> Result<(), ReportError> {
        let Some(position) = position else {
            tracing::warn!("Report requested before any location was acquired");
            self.alerts.notify(Alert::missing_location());
            return Err(ReportError::NoPosition);
        };

        let payload = LocationPayload::from(&position);
        match self.client.send_location(&payload).await {
            Ok(()) => {
                tracing::info!(lat = payload.lat, long = payload.long, "Location sent");
                self.alerts.notify(Alert::send_succeeded());
                Ok(())
            }
            Err(e) => {
                tracing::error!(error = %e, lat = payload.lat, long = payload.long, "Failed to send location");
                self.alerts.notify(Alert::send_failed());
                Err(e)
            }
        }
    }
}
