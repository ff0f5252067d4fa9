//! Location permission prompts.
//!
//! Before the first fix of an acquisition the user is asked for location
//! access. The question is always the same [`PermissionRequest`]; how it is
//! asked depends on the [`PermissionPrompt`] in use:
//!
//! - [`AutoGrant`] - permission is configured as granted
//! - [`StoredDecision`] - replays an answer collected earlier (the CLI asks
//!   once, before the screen takes over the terminal)
//!
//! Only [`PermissionResponse::Allow`] counts as granted.

use std::future::Future;

/// The three answers the prompt offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionResponse {
    /// "Ask Me Later"
    AskLater,
    /// "Cancel"
    Cancel,
    /// "OK"
    Allow,
}

impl PermissionResponse {
    /// Whether this answer grants access.
    pub fn is_granted(&self) -> bool {
        matches!(self, Self::Allow)
    }

    /// Button label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::AskLater => "Ask Me Later",
            Self::Cancel => "Cancel",
            Self::Allow => "OK",
        }
    }
}

/// What the user is asked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermissionRequest {
    pub title: String,
    pub message: String,
    /// Options in display order.
    pub options: [PermissionResponse; 3],
}

impl PermissionRequest {
    /// The location access request.
    pub fn location() -> Self {
        Self {
            title: "Location Permission".to_string(),
            message: "GeoPulse needs access to your location to report it to the server."
                .to_string(),
            options: [
                PermissionResponse::AskLater,
                PermissionResponse::Cancel,
                PermissionResponse::Allow,
            ],
        }
    }
}

/// Asks the user for location access.
pub trait PermissionPrompt: Send + Sync {
    /// Present the request and wait for an answer.
    fn request(
        &self,
        request: &PermissionRequest,
    ) -> impl Future<Output = PermissionResponse> + Send;
}

/// Always allows.
#[derive(Debug, Default, Clone, Copy)]
pub struct AutoGrant;

impl PermissionPrompt for AutoGrant {
    async fn request(&self, _request: &PermissionRequest) -> PermissionResponse {
        PermissionResponse::Allow
    }
}

/// Replays an answer given earlier.
#[derive(Debug, Clone, Copy)]
pub struct StoredDecision(pub PermissionResponse);

impl PermissionPrompt for StoredDecision {
    async fn request(&self, request: &PermissionRequest) -> PermissionResponse {
        tracing::debug!(
            title = %request.title,
            answer = self.0.label(),
            "Using stored permission decision"
        );
        self.0
    }
}
