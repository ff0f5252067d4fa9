//! Error types for location acquisition.

use std::time::Duration;

use thiserror::Error;

use super::permission::PermissionResponse;
use crate::screen::{Severity, StatusError};

/// A single fix attempt failed.
#[derive(Debug, Error)]
pub enum FixError {
    /// No usable fix arrived within the timeout.
    #[error("Timed out after {}s waiting for a fix", .0.as_secs())]
    Timeout(Duration),

    /// The location source could not be reached.
    #[error("Location source unavailable: {0}")]
    Unavailable(String),

    /// The source sent something we could not understand.
    #[error("Malformed report from location source: {0}")]
    Protocol(String),

    /// The source closed the stream before producing a fix.
    #[error("Location source closed the stream without a fix")]
    NoFix,
}

/// Terminal outcome of an acquisition.
#[derive(Debug, Error)]
pub enum AcquisitionError {
    /// Location services are switched off; the user must act.
    #[error("Location services are disabled. Please enable them in your device settings.")]
    ServicesDisabled,

    /// The user did not allow location access.
    #[error("Location permission denied. Please allow location access to use this feature.")]
    PermissionDenied { response: PermissionResponse },

    /// Every fix attempt failed.
    #[error("Failed to get location: {source}")]
    FixFailed {
        attempts: u32,
        #[source]
        source: FixError,
    },
}

impl AcquisitionError {
    /// Severity shown in the status banner.
    pub fn severity(&self) -> Severity {
        match self {
            Self::ServicesDisabled => Severity::Warning,
            Self::PermissionDenied { .. } | Self::FixFailed { .. } => Severity::Error,
        }
    }

    /// Banner entry for this error.
    pub fn to_status(&self) -> StatusError {
        StatusError::new(self.to_string(), self.severity())
    }
}
