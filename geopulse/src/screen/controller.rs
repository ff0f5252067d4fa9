//! Screen controller.
//!
//! Owns the screen state and the handle to the last known position, and
//! starts every piece of asynchronous work the screen needs:
//!
//! 1. **Mount**: [`ScreenController::mount`] starts the initial acquisition
//!    and the push listener
//! 2. **Operation**: [`ScreenController::refresh`] and
//!    [`ScreenController::send_location`] from user input; push triggers
//!    report in the background
//! 3. **Unmount**: [`ScreenController::unmount`] closes the push channel and
//!    waits for the listener to stop
//!
//! Acquisitions and reports run as detached [`CancellableTask`]s and are
//! never cancelled by the controller. Only the push listener is tied to the
//! controller's shutdown token.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use super::state::{PushStatus, ScreenSnapshot, SharedScreenState};
use crate::alert::{Alert, AlertSink};
use crate::location::{
    AcquisitionError, LocationAcquirer, LocationProvider, PermissionPrompt, Position,
};
use crate::report::{LocationReporter, PushChannel, PushEvent, ReportClient, ReportError};
use crate::task::CancellableTask;

/// Buffer between the push channel and the event dispatcher.
const PUSH_EVENT_BUFFER: usize = 16;

/// How long unmount waits for the push channel to close cleanly.
const UNMOUNT_TIMEOUT: Duration = Duration::from_secs(5);

/// Handle to a running acquisition.
pub type AcquisitionTask = CancellableTask<Result<Position, AcquisitionError>>;

/// Handle to a running report.
pub type ReportTask = CancellableTask<Result<(), ReportError>>;

/// Drives one screen lifetime.
pub struct ScreenController<P, Q, C> {
    state: SharedScreenState,
    acquirer: Arc<LocationAcquirer<P, Q>>,
    reporter: Arc<LocationReporter<C>>,
    alerts: Arc<dyn AlertSink>,
    shutdown: CancellationToken,
    push_task: Option<CancellableTask<()>>,
}

impl<P, Q, C> ScreenController<P, Q, C>
where
    P: LocationProvider + 'static,
    Q: PermissionPrompt + 'static,
    C: ReportClient + 'static,
{
    /// Create an unmounted controller with empty state.
    pub fn new(
        acquirer: LocationAcquirer<P, Q>,
        reporter: LocationReporter<C>,
        alerts: Arc<dyn AlertSink>,
    ) -> Self {
        Self {
            state: SharedScreenState::new(),
            acquirer: Arc::new(acquirer),
            reporter: Arc::new(reporter),
            alerts,
            shutdown: CancellationToken::new(),
            push_task: None,
        }
    }

    /// Start with a known position instead of an empty state.
    pub fn with_position(mut self, position: Position) -> Self {
        self.state = SharedScreenState::with_position(position);
        self
    }

    /// Shared state handle.
    pub fn state(&self) -> &SharedScreenState {
        &self.state
    }

    /// Current state for rendering.
    pub fn snapshot(&self) -> ScreenSnapshot {
        self.state.snapshot()
    }

    /// Whether the push listener is still running.
    pub fn is_listening(&self) -> bool {
        self.push_task.as_ref().is_some_and(|t| !t.is_finished())
    }

    /// Mount the screen: open the push channel and start the first
    /// acquisition.
    ///
    /// Mounting twice is a no-op for the push channel. No acquisition is
    /// started while one is already in flight.
    pub fn mount<T: PushChannel>(&mut self, channel: T) -> Option<AcquisitionTask> {
        if self.push_task.is_none() {
            self.push_task = Some(self.spawn_push_listener(channel));
        } else {
            tracing::debug!("Push listener already running");
        }
        self.spawn_acquisition()
    }

    /// Re-run acquisition. Refused while one is in flight.
    pub fn refresh(&self) -> Option<AcquisitionTask> {
        self.spawn_acquisition()
    }

    /// Report the last known position.
    pub fn send_location(&self) -> ReportTask {
        spawn_report(Arc::clone(&self.reporter), self.state.clone())
    }

    /// Unmount the screen: close the push channel and wait for the listener.
    pub async fn unmount(&mut self) {
        self.shutdown.cancel();

        let Some(task) = self.push_task.take() else {
            return;
        };

        let token = task.token();
        match tokio::time::timeout(UNMOUNT_TIMEOUT, task.join()).await {
            Ok(Ok(())) => tracing::debug!("Push listener stopped"),
            Ok(Err(e)) => tracing::warn!(error = %e, "Push listener ended abnormally"),
            Err(_) => {
                tracing::warn!(
                    timeout_secs = UNMOUNT_TIMEOUT.as_secs(),
                    "Push channel did not close in time, abandoning it"
                );
                token.cancel();
            }
        }
    }

    /// Loading is claimed here, before the task is spawned, so a second
    /// call made before the first task runs is refused.
    fn spawn_acquisition(&self) -> Option<AcquisitionTask> {
        let Some(loading) = self.state.try_begin_acquisition() else {
            tracing::debug!("Acquisition already in progress, not starting another");
            return None;
        };

        let acquirer = Arc::clone(&self.acquirer);
        let state = self.state.clone();
        Some(CancellableTask::spawn(async move { acquirer.acquire_with(&state, loading).await }))
    }

    fn spawn_push_listener<T: PushChannel>(&self, channel: T) -> CancellableTask<()> {
        let (tx, rx) = mpsc::channel(PUSH_EVENT_BUFFER);
        let shutdown = self.shutdown.clone();
        let state = self.state.clone();
        let reporter = Arc::clone(&self.reporter);
        let alerts = Arc::clone(&self.alerts);

        state.set_push_status(PushStatus::Connecting);

        // The listener's own token is only used to abandon a channel that
        // ignores shutdown; the channel watches `shutdown` so it can close
        // the connection cleanly.
        CancellableTask::spawn(async move {
            tokio::join!(
                channel.run(tx, shutdown),
                dispatch_push_events(rx, state, reporter, alerts)
            );
        })
    }
}

impl<P, Q, C> Drop for ScreenController<P, Q, C> {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

fn spawn_report<C: ReportClient + 'static>(
    reporter: Arc<LocationReporter<C>>,
    state: SharedScreenState,
) -> ReportTask {
    CancellableTask::spawn(async move {
        let result = reporter.report(state.position()).await;
        if result.is_ok() {
            state.record_report_sent();
        }
        result
    })
}

async fn dispatch_push_events<C: ReportClient + 'static>(
    mut events: mpsc::Receiver<PushEvent>,
    state: SharedScreenState,
    reporter: Arc<LocationReporter<C>>,
    alerts: Arc<dyn AlertSink>,
) {
    while let Some(event) = events.recv().await {
        match event {
            PushEvent::Opened => {
                tracing::info!("Push channel open");
                state.set_push_status(PushStatus::Open);
            }
            PushEvent::Message => {
                tracing::info!("Push trigger received, reporting location");
                // Detached: a slow collector must not hold up later events.
                let _ = spawn_report(Arc::clone(&reporter), state.clone());
            }
            PushEvent::Error(detail) => {
                tracing::error!(error = %detail, "Push channel error");
                state.set_push_status(PushStatus::Failed);
                alerts.notify(Alert::connection_error(&detail));
            }
            PushEvent::Closed => {
                tracing::info!("Push channel closed");
                state.set_push_status(PushStatus::Closed);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alert::{AlertKind, ChannelAlertSink};
    use crate::location::{AutoGrant, FixError, FixRequest, FixedProvider};
    use crate::report::LocationPayload;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingClient {
        sent: Mutex<Vec<LocationPayload>>,
    }

    impl ReportClient for Arc<RecordingClient> {
        async fn send_location(&self, payload: &LocationPayload) -> Result<(), ReportError> {
            self.sent.lock().unwrap().push(*payload);
            Ok(())
        }
    }

    /// Push channel replaying a fixed event list, then idling until shutdown.
    struct ScriptedChannel(Vec<PushEvent>);

    impl PushChannel for ScriptedChannel {
        async fn run(self, events: mpsc::Sender<PushEvent>, shutdown: CancellationToken) {
            for event in self.0 {
                let _ = events.send(event).await;
            }
            shutdown.cancelled().await;
            let _ = events.send(PushEvent::Closed).await;
        }
    }

    struct Unavailable;

    /// Services on and permission fine, but every fix fails after a second.
    #[derive(Default)]
    struct NeverFixes {
        calls: AtomicU32,
    }

    impl LocationProvider for Arc<NeverFixes> {
        async fn services_enabled(&self) -> bool {
            true
        }

        async fn current_position(&self, _request: &FixRequest) -> Result<Position, FixError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_secs(1)).await;
            Err(FixError::NoFix)
        }
    }

    impl LocationProvider for Unavailable {
        async fn services_enabled(&self) -> bool {
            false
        }

        async fn current_position(&self, _request: &FixRequest) -> Result<Position, FixError> {
            Err(FixError::NoFix)
        }
    }

    fn controller<P: LocationProvider + 'static>(
        provider: P,
    ) -> (
        ScreenController<P, AutoGrant, Arc<RecordingClient>>,
        Arc<RecordingClient>,
        mpsc::UnboundedReceiver<Alert>,
    ) {
        let (sink, rx) = ChannelAlertSink::new();
        let alerts: Arc<dyn AlertSink> = Arc::new(sink);
        let client = Arc::new(RecordingClient::default());
        let controller = ScreenController::new(
            LocationAcquirer::new(provider, AutoGrant, Arc::clone(&alerts)),
            LocationReporter::new(Arc::clone(&client), Arc::clone(&alerts)),
            alerts,
        );
        (controller, client, rx)
    }

    #[tokio::test]
    async fn test_mount_acquires_and_opens_channel() {
        let (mut controller, _client, _rx) = controller(FixedProvider::new(51.5, -0.12));

        let acquisition = controller.mount(ScriptedChannel(vec![PushEvent::Opened])).unwrap();
        let position = acquisition.join().await.unwrap().unwrap();

        assert_eq!(controller.snapshot().position, Some(position));
        assert!(controller.is_listening());

        controller.unmount().await;
        assert_eq!(controller.snapshot().push, PushStatus::Closed);
        assert!(!controller.is_listening());
    }

    #[tokio::test]
    async fn test_injected_position_is_reported() {
        let (controller, client, mut rx) = controller(Unavailable);
        let controller = controller.with_position(Position::new(35.6762, 139.6503));

        controller.send_location().join().await.unwrap().unwrap();

        let sent = client.sent.lock().unwrap().clone();
        assert_eq!(
            sent,
            vec![LocationPayload {
                lat: 35.6762,
                long: 139.6503
            }]
        );
        assert_eq!(rx.recv().await.unwrap().kind, AlertKind::SendSucceeded);
        assert_eq!(controller.snapshot().reports_sent, 1);
    }

    #[tokio::test]
    async fn test_push_error_raises_alert() {
        let (mut controller, _client, mut rx) = controller(Unavailable);

        let acquisition = controller
            .mount(ScriptedChannel(vec![PushEvent::Error("refused".into())]))
            .unwrap();
        assert!(acquisition.join().await.unwrap().is_err());

        let alert = rx.recv().await.unwrap();
        assert_eq!(alert.kind, AlertKind::ConnectionError);
        assert_eq!(alert.title, "WebSocket Error");
        assert_eq!(controller.snapshot().push, PushStatus::Failed);

        controller.unmount().await;
    }

    #[tokio::test]
    async fn test_refresh_refused_while_loading() {
        let (controller, _client, _rx) = controller(Unavailable);

        let _guard = controller.state().begin_acquisition();
        assert!(controller.refresh().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_back_to_back_refresh_starts_one_acquisition() {
        let provider = Arc::new(NeverFixes::default());
        let (controller, _client, mut rx) = controller(Arc::clone(&provider));

        let first = controller.refresh();
        let second = controller.refresh();
        assert!(first.is_some());
        assert!(second.is_none());

        assert!(first.unwrap().join().await.unwrap().is_err());
        assert_eq!(provider.calls.load(Ordering::SeqCst), 3);
        assert_eq!(controller.snapshot().retry_count, 3);
        assert!(!controller.snapshot().loading);
        assert_eq!(rx.recv().await.unwrap().kind, AlertKind::AcquisitionFailed);

        // A fresh acquisition gets its own three attempts.
        let again = controller.refresh().unwrap();
        assert!(again.join().await.unwrap().is_err());
        assert_eq!(provider.calls.load(Ordering::SeqCst), 6);
    }

    #[tokio::test(start_paused = true)]
    async fn test_refresh_refused_right_after_mount() {
        let provider = Arc::new(NeverFixes::default());
        let (mut controller, _client, _rx) = controller(Arc::clone(&provider));

        let initial = controller.mount(ScriptedChannel(vec![])).unwrap();
        assert!(controller.snapshot().loading);
        assert!(controller.refresh().is_none());

        assert!(initial.join().await.unwrap().is_err());
        assert_eq!(provider.calls.load(Ordering::SeqCst), 3);

        controller.unmount().await;
    }

    #[tokio::test]
    async fn test_unmount_without_mount_is_noop() {
        let (mut controller, _client, _rx) = controller(Unavailable);
        controller.unmount().await;
        assert_eq!(controller.snapshot().push, PushStatus::Idle);
    }
}
