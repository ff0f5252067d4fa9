//! Integration tests for the location acquisition flow.
//!
//! These tests drive `LocationAcquirer` against a scripted provider:
//! - Services check and permission outcomes (terminal, no retry)
//! - Fixed-delay retries and the retry counter
//! - Last-good-position semantics on failure
//! - Loading flag lifetime, cancellation included
//!
//! Timing tests run on a paused clock, so the 2 s delays cost nothing.
//!
//! Run with: `cargo test --test acquisition_integration`

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::Instant;

use geopulse::alert::{Alert, AlertKind, ChannelAlertSink};
use geopulse::location::{
    AcquisitionError, AutoGrant, FixError, FixRequest, LocationAcquirer, LocationProvider,
    PermissionPrompt, PermissionResponse, Position, StoredDecision,
};
use geopulse::screen::{OperationalStatus, Severity, SharedScreenState};
use geopulse::task::{CancellableTask, TaskError};

// ============================================================================
// Test Helpers
// ============================================================================

/// What the provider saw when a fix was requested.
#[derive(Debug, Clone, Copy)]
struct FixCall {
    at: Instant,
    retry_count: u32,
    loading: bool,
}

/// Provider returning scripted fix results in order.
///
/// Clones share the script and the call log.
#[derive(Clone)]
struct ScriptedProvider {
    inner: Arc<Script>,
}

struct Script {
    services: bool,
    results: Mutex<VecDeque<Result<Position, FixError>>>,
    calls: Mutex<Vec<FixCall>>,
    state: SharedScreenState,
}

impl ScriptedProvider {
    fn new(
        state: &SharedScreenState,
        results: impl IntoIterator<Item = Result<Position, FixError>>,
    ) -> Self {
        Self::build(state, true, results.into_iter().collect())
    }

    fn services_disabled(state: &SharedScreenState) -> Self {
        Self::build(state, false, VecDeque::new())
    }

    fn build(
        state: &SharedScreenState,
        services: bool,
        results: VecDeque<Result<Position, FixError>>,
    ) -> Self {
        Self {
            inner: Arc::new(Script {
                services,
                results: Mutex::new(results),
                calls: Mutex::new(Vec::new()),
                state: state.clone(),
            }),
        }
    }

    fn calls(&self) -> Vec<FixCall> {
        self.inner.calls.lock().unwrap().clone()
    }
}

impl LocationProvider for ScriptedProvider {
    async fn services_enabled(&self) -> bool {
        self.inner.services
    }

    async fn current_position(&self, _request: &FixRequest) -> Result<Position, FixError> {
        let snapshot = self.inner.state.snapshot();
        self.inner.calls.lock().unwrap().push(FixCall {
            at: Instant::now(),
            retry_count: snapshot.retry_count,
            loading: snapshot.loading,
        });
        self.inner
            .results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(FixError::NoFix))
    }
}

fn acquirer<Q: PermissionPrompt>(
    provider: &ScriptedProvider,
    prompt: Q,
) -> (
    LocationAcquirer<ScriptedProvider, Q>,
    mpsc::UnboundedReceiver<Alert>,
) {
    let (sink, rx) = ChannelAlertSink::new();
    (
        LocationAcquirer::new(provider.clone(), prompt, Arc::new(sink)),
        rx,
    )
}

fn timeout_error() -> FixError {
    FixError::Timeout(Duration::from_secs(15))
}

/// Hamburg airport coordinates for testing.
const HAMBURG_LAT: f64 = 53.630278;
const HAMBURG_LON: f64 = 9.988333;

// ============================================================================
// Terminal outcomes
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_services_disabled_is_warning_without_retry() {
    let state = SharedScreenState::new();
    let provider = ScriptedProvider::services_disabled(&state);
    let (acquirer, mut alerts) = acquirer(&provider, AutoGrant);

    let start = Instant::now();
    let result = acquirer.acquire(&state).await;

    assert!(matches!(result, Err(AcquisitionError::ServicesDisabled)));
    assert!(provider.calls().is_empty());
    assert_eq!(start.elapsed(), Duration::ZERO);

    let snapshot = state.snapshot();
    assert!(!snapshot.loading);
    assert_eq!(snapshot.retry_count, 0);
    let error = snapshot.error.unwrap();
    assert_eq!(error.severity, Severity::Warning);
    assert!(error.message.starts_with("Location services are disabled"));
    assert!(alerts.try_recv().is_err());
}

#[tokio::test(start_paused = true)]
async fn test_permission_denied_is_error_without_retry() {
    for answer in [PermissionResponse::AskLater, PermissionResponse::Cancel] {
        let state = SharedScreenState::new();
        let provider = ScriptedProvider::new(&state, []);
        let (acquirer, _alerts) = acquirer(&provider, StoredDecision(answer));

        let result = acquirer.acquire(&state).await;

        assert!(matches!(
            result,
            Err(AcquisitionError::PermissionDenied { response }) if response == answer
        ));
        assert!(provider.calls().is_empty());

        let snapshot = state.snapshot();
        assert!(!snapshot.loading);
        assert_eq!(snapshot.status(), OperationalStatus::Errored);
        let error = snapshot.error.unwrap();
        assert_eq!(error.severity, Severity::Error);
        assert!(error.message.starts_with("Location permission denied"));
    }
}

// ============================================================================
// Retries
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_first_fix_succeeds_without_delay() {
    let state = SharedScreenState::new();
    let provider = ScriptedProvider::new(&state, [Ok(Position::new(HAMBURG_LAT, HAMBURG_LON))]);
    let (acquirer, _alerts) = acquirer(&provider, AutoGrant);

    let start = Instant::now();
    let position = acquirer.acquire(&state).await.unwrap();

    assert_eq!(start.elapsed(), Duration::ZERO);
    assert_eq!(position.latitude, HAMBURG_LAT);
    assert_eq!(state.snapshot().status(), OperationalStatus::Ready);
}

#[tokio::test(start_paused = true)]
async fn test_success_on_second_attempt_after_one_delay() {
    let state = SharedScreenState::new();
    let provider = ScriptedProvider::new(
        &state,
        [
            Err(timeout_error()),
            Ok(Position::new(HAMBURG_LAT, HAMBURG_LON)),
        ],
    );
    let (acquirer, mut alerts) = acquirer(&provider, AutoGrant);

    let start = Instant::now();
    let position = acquirer.acquire(&state).await.unwrap();

    let calls = provider.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[1].at - calls[0].at, Duration::from_secs(2));
    assert_eq!(start.elapsed(), Duration::from_secs(2));

    let snapshot = state.snapshot();
    assert_eq!(snapshot.position, Some(position));
    assert_eq!(snapshot.retry_count, 0);
    assert!(!snapshot.loading);
    assert!(snapshot.error.is_none());
    assert!(alerts.try_recv().is_err());
}

#[tokio::test(start_paused = true)]
async fn test_retry_counter_increments_once_per_failure() {
    let state = SharedScreenState::new();
    let provider = ScriptedProvider::new(
        &state,
        [
            Err(timeout_error()),
            Err(FixError::Unavailable("no satellites".into())),
            Ok(Position::new(HAMBURG_LAT, HAMBURG_LON)),
        ],
    );
    let (acquirer, _alerts) = acquirer(&provider, AutoGrant);

    acquirer.acquire(&state).await.unwrap();

    let seen: Vec<u32> = provider.calls().iter().map(|c| c.retry_count).collect();
    assert_eq!(seen, vec![0, 1, 2]);
    assert!(provider.calls().iter().all(|c| c.loading));
    assert_eq!(state.snapshot().retry_count, 0);
}

#[tokio::test(start_paused = true)]
async fn test_three_failures_are_terminal_with_alert() {
    let state = SharedScreenState::new();
    let provider = ScriptedProvider::new(
        &state,
        [
            Err(timeout_error()),
            Err(timeout_error()),
            Err(timeout_error()),
            Ok(Position::new(HAMBURG_LAT, HAMBURG_LON)),
        ],
    );
    let (acquirer, mut alerts) = acquirer(&provider, AutoGrant);

    let start = Instant::now();
    let result = acquirer.acquire(&state).await;

    match result {
        Err(AcquisitionError::FixFailed { attempts, source }) => {
            assert_eq!(attempts, 3);
            assert!(matches!(source, FixError::Timeout(_)));
        }
        other => panic!("expected FixFailed, got {:?}", other),
    }

    // Exactly three attempts, two delays, no fourth call.
    assert_eq!(provider.calls().len(), 3);
    assert_eq!(start.elapsed(), Duration::from_secs(4));

    let snapshot = state.snapshot();
    assert_eq!(snapshot.retry_count, 3);
    assert!(!snapshot.loading);
    let error = snapshot.error.unwrap();
    assert_eq!(error.severity, Severity::Error);
    assert!(error.message.starts_with("Failed to get location: "));
    assert!(error.message.contains("Timed out"));

    let alert = alerts.recv().await.unwrap();
    assert_eq!(alert.kind, AlertKind::AcquisitionFailed);
    assert!(alert.message.contains("3 attempts"));
    assert!(alerts.try_recv().is_err());

    // Nothing keeps retrying in the background.
    tokio::time::sleep(Duration::from_secs(60)).await;
    assert_eq!(provider.calls().len(), 3);
}

#[tokio::test(start_paused = true)]
async fn test_failures_keep_last_good_position() {
    let previous = Position::new(HAMBURG_LAT, HAMBURG_LON);
    let state = SharedScreenState::with_position(previous);
    let provider = ScriptedProvider::new(&state, []);
    let (acquirer, _alerts) = acquirer(&provider, AutoGrant);

    assert!(acquirer.acquire(&state).await.is_err());
    assert_eq!(state.position(), Some(previous));
}

#[tokio::test(start_paused = true)]
async fn test_next_acquisition_starts_from_zero_retries() {
    let state = SharedScreenState::new();
    let provider = ScriptedProvider::new(
        &state,
        [
            Err(timeout_error()),
            Err(timeout_error()),
            Err(timeout_error()),
            Err(timeout_error()),
            Ok(Position::new(HAMBURG_LAT, HAMBURG_LON)),
        ],
    );
    let (acquirer, _alerts) = acquirer(&provider, AutoGrant);

    assert!(acquirer.acquire(&state).await.is_err());
    acquirer.acquire(&state).await.unwrap();

    let seen: Vec<u32> = provider.calls().iter().map(|c| c.retry_count).collect();
    assert_eq!(seen, vec![0, 1, 2, 0, 1]);
    assert_eq!(state.snapshot().retry_count, 0);
}

// ============================================================================
// Loading lifetime
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_loading_covers_retry_delay() {
    let state = SharedScreenState::new();
    let provider = ScriptedProvider::new(
        &state,
        [
            Err(timeout_error()),
            Ok(Position::new(HAMBURG_LAT, HAMBURG_LON)),
        ],
    );
    let (acquirer, _alerts) = acquirer(&provider, AutoGrant);
    let acquirer = Arc::new(acquirer);

    let task = {
        let acquirer = Arc::clone(&acquirer);
        let state = state.clone();
        CancellableTask::spawn(async move { acquirer.acquire(&state).await })
    };

    // Midway through the delay.
    tokio::time::sleep(Duration::from_secs(1)).await;
    assert!(state.is_loading());
    assert_eq!(state.snapshot().retry_count, 1);

    task.join().await.unwrap().unwrap();
    assert!(!state.is_loading());
}

#[tokio::test(start_paused = true)]
async fn test_cancelled_acquisition_clears_loading() {
    let state = SharedScreenState::new();
    let provider = ScriptedProvider::new(&state, [Err(timeout_error())]);
    let (acquirer, _alerts) = acquirer(&provider, AutoGrant);
    let acquirer = Arc::new(acquirer);

    let task = {
        let acquirer = Arc::clone(&acquirer);
        let state = state.clone();
        CancellableTask::spawn(async move { acquirer.acquire(&state).await })
    };

    tokio::time::sleep(Duration::from_secs(1)).await;
    assert!(state.is_loading());

    task.cancel();
    assert!(matches!(task.join().await, Err(TaskError::Cancelled)));
    assert!(!state.is_loading());
    assert_eq!(provider.calls().len(), 1);
}
