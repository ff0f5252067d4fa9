//! Location acquisition flow.
//!
//! One acquisition runs these steps against a [`LocationProvider`] and a
//! [`PermissionPrompt`], recording progress in the screen state:
//!
//! 1. Services check. Disabled services end the acquisition with a
//!    warning; retrying cannot help until the user switches them on.
//! 2. Permission request. Anything but "OK" ends it with an error.
//! 3. Fix request.
//! 4. A failed fix bumps the retry counter. Below the attempt limit the flow
//!    waits a fixed delay and tries again; at the limit it gives up with an
//!    error banner and a blocking alert.
//! 5. A successful fix replaces the stored position and resets the counter.
//!
//! ```text
//! services? ──no──► Warning (terminal)
//!    │yes
//! permission? ──no──► Error (terminal)
//!    │allow
//! fix ──ok──► record position, retries = 0
//!    │err
//! retries += 1 ── retries < max ──► sleep(delay) ──► fix
//!    │ retries == max
//!    ▼
//! Error + alert (terminal)
//! ```
//!
//! Loading is set for the whole acquisition, retry delays included, and is
//! cleared by a drop guard on every exit path, cancellation included.

use std::sync::Arc;
use std::time::Duration;

use super::error::AcquisitionError;
use super::model::{FixRequest, Position};
use super::permission::{PermissionPrompt, PermissionRequest};
use super::provider::LocationProvider;
use crate::alert::{Alert, AlertSink};
use crate::config::{AcquisitionSettings, DEFAULT_MAX_ATTEMPTS, DEFAULT_RETRY_DELAY_SECS};
use crate::screen::{LoadingGuard, SharedScreenState};

/// Fixed-delay retry policy for fix attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Fix attempts before giving up (at least 1).
    pub max_attempts: u32,
    /// Wait between a failed attempt and the next one.
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            delay: Duration::from_secs(DEFAULT_RETRY_DELAY_SECS),
        }
    }
}

impl RetryPolicy {
    /// Whether another attempt is allowed after `failures` failed ones.
    pub fn should_retry(&self, failures: u32) -> bool {
        failures < self.max_attempts.max(1)
    }
}

/// Runs acquisitions.
pub struct LocationAcquirer<P, Q> {
    provider: P,
    prompt: Q,
    policy: RetryPolicy,
    fix_request: FixRequest,
    alerts: Arc<dyn AlertSink>,
}

impl<P: LocationProvider, Q: PermissionPrompt> LocationAcquirer<P, Q> {
    /// Create an acquirer with the default policy and fix request.
    pub fn new(provider: P, prompt: Q, alerts: Arc<dyn AlertSink>) -> Self {
        Self {
            provider,
            prompt,
            policy: RetryPolicy::default(),
            fix_request: FixRequest::default(),
            alerts,
        }
    }

    /// Create an acquirer configured from `[acquisition]` settings.
    pub fn from_settings(
        provider: P,
        prompt: Q,
        alerts: Arc<dyn AlertSink>,
        settings: &AcquisitionSettings,
    ) -> Self {
        Self::new(provider, prompt, alerts)
            .with_policy(RetryPolicy {
                max_attempts: settings.max_attempts,
                delay: Duration::from_secs(settings.retry_delay),
            })
            .with_fix_request(FixRequest {
                high_accuracy: settings.high_accuracy,
                timeout: Duration::from_secs(settings.fix_timeout),
            })
    }

    /// Set the retry policy.
    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Set the fix request parameters.
    pub fn with_fix_request(mut self, request: FixRequest) -> Self {
        self.fix_request = request;
        self
    }

    /// Retry policy in use.
    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }

    /// Location source.
    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Run one acquisition, recording progress in `state`.
    ///
    /// Errors are already reflected in `state` (and, after the last attempt,
    /// raised as an alert) when this returns; callers only need the result
    /// if they want to print it.
    pub async fn acquire(&self, state: &SharedScreenState) -> Result<Position, AcquisitionError> {
        self.acquire_with(state, state.begin_acquisition()).await
    }

    /// Run one acquisition under a loading claim the caller already holds.
    ///
    /// `loading` must come from `state`; it is released when this returns.
    pub async fn acquire_with(
        &self,
        state: &SharedScreenState,
        loading: LoadingGuard,
    ) -> Result<Position, AcquisitionError> {
        let _loading = loading;

        let result = self.run(state).await;
        if let Err(e) = &result {
            state.set_error(e.to_status());
        }
        result
    }

    async fn run(&self, state: &SharedScreenState) -> Result<Position, AcquisitionError> {
        if !self.provider.services_enabled().await {
            tracing::warn!("Location services are disabled");
            return Err(AcquisitionError::ServicesDisabled);
        }

        let response = self.prompt.request(&PermissionRequest::location()).await;
        if !response.is_granted() {
            tracing::warn!(answer = response.label(), "Location permission denied");
            return Err(AcquisitionError::PermissionDenied { response });
        }

        loop {
            match self.provider.current_position(&self.fix_request).await {
                Ok(position) => {
                    state.record_position(position);
                    tracing::info!(
                        lat = position.latitude,
                        long = position.longitude,
                        accuracy = ?position.accuracy,
                        "Location acquired"
                    );
                    return Ok(position);
                }
                Err(e) => {
                    let failures = state.record_fix_failure();

                    if !self.policy.should_retry(failures) {
                        tracing::error!(error = %e, attempts = failures, "Giving up on location");
                        self.alerts
                            .notify(Alert::acquisition_failed(failures, &e.to_string()));
                        return Err(AcquisitionError::FixFailed {
                            attempts: failures,
                            source: e,
                        });
                    }

                    tracing::warn!(
                        error = %e,
                        attempt = failures,
                        max_attempts = self.policy.max_attempts,
                        retry_in_ms = self.policy.delay.as_millis() as u64,
                        "Location fix failed, retrying"
                    );
                    tokio::time::sleep(self.policy.delay).await;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_attempts, 3);
        assert_eq!(policy.delay, Duration::from_secs(2));
    }

    #[test]
    fn test_should_retry_below_limit_only() {
        let policy = RetryPolicy::default();
        assert!(policy.should_retry(1));
        assert!(policy.should_retry(2));
        assert!(!policy.should_retry(3));
        assert!(!policy.should_retry(4));
    }

    #[test]
    fn test_zero_attempts_behaves_like_one() {
        let policy = RetryPolicy {
            max_attempts: 0,
            delay: Duration::ZERO,
        };
        assert!(!policy.should_retry(1));
    }
}
