//! User-visible alerts.
//!
//! Anything network- or connection-related, and an acquisition that ran out
//! of attempts, is surfaced as a blocking [`Alert`]. Producers hand alerts to
//! an [`AlertSink`]; the screen drains them into a modal one at a time.

use std::fmt;

use tokio::sync::mpsc;

/// What an alert is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertKind {
    /// The push channel reported a connection error.
    ConnectionError,
    /// A report was requested before any position was acquired.
    MissingLocation,
    /// The collector confirmed a report.
    SendSucceeded,
    /// The report was rejected or the request failed.
    SendFailed,
    /// Every fix attempt of an acquisition failed.
    AcquisitionFailed,
}

/// A modal notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub kind: AlertKind,
    pub title: String,
    pub message: String,
}

impl Alert {
    /// Create an alert.
    pub fn new(kind: AlertKind, title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind,
            title: title.into(),
            message: message.into(),
        }
    }

    /// The push channel failed.
    pub fn connection_error(detail: &str) -> Self {
        Self::new(
            AlertKind::ConnectionError,
            "WebSocket Error",
            format!("Connection to the server failed: {}", detail),
        )
    }

    /// A report was attempted with no position.
    pub fn missing_location() -> Self {
        Self::new(
            AlertKind::MissingLocation,
            "Error",
            "No location available. Please fetch your location first.",
        )
    }

    /// The collector accepted the report.
    pub fn send_succeeded() -> Self {
        Self::new(AlertKind::SendSucceeded, "Success", "Location sent successfully")
    }

    /// The report did not go through.
    pub fn send_failed() -> Self {
        Self::new(AlertKind::SendFailed, "Error", "Failed to send location")
    }

    /// Acquisition gave up after `attempts` failed fixes.
    pub fn acquisition_failed(attempts: u32, cause: &str) -> Self {
        Self::new(
            AlertKind::AcquisitionFailed,
            "Location Error",
            format!(
                "Unable to get your location after {} attempts: {}",
                attempts, cause
            ),
        )
    }
}

impl fmt::Display for Alert {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.title, self.message)
    }
}

/// Destination for alerts.
pub trait AlertSink: Send + Sync {
    /// Raise an alert. Must not block.
    fn notify(&self, alert: Alert);
}

/// Alert sink that only logs.
///
/// Used by headless commands where there is no modal to show.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingAlertSink;

impl AlertSink for TracingAlertSink {
    fn notify(&self, alert: Alert) {
        match alert.kind {
            AlertKind::SendSucceeded => {
                tracing::info!(title = %alert.title, "{}", alert.message)
            }
            _ => tracing::warn!(title = %alert.title, kind = ?alert.kind, "{}", alert.message),
        }
    }
}

/// Alert sink that forwards into a channel.
///
/// The receiving end belongs to whatever renders the modal.
#[derive(Debug, Clone)]
pub struct ChannelAlertSink {
    tx: mpsc::UnboundedSender<Alert>,
}

impl ChannelAlertSink {
    /// Create a sink and the receiver that drains it.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Alert>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl AlertSink for ChannelAlertSink {
    fn notify(&self, alert: Alert) {
        tracing::debug!(kind = ?alert.kind, "{}", alert);
        if self.tx.send(alert).is_err() {
            tracing::debug!("Alert receiver dropped, alert discarded");
        }
    }
}
