//! Screen state and its transitions.
//!
//! [`ScreenState`] is owned by the screen controller behind
//! [`SharedScreenState`]. Renderers only ever see an immutable
//! [`ScreenSnapshot`]; every mutation goes through a named transition on
//! `SharedScreenState`, and no lock is held across an await point.

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::location::Position;

/// How bad a status error is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Recoverable by the user (e.g. switch location services on).
    Warning,
    /// Denied permission or failed fix.
    Error,
}

/// Error shown in the status banner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusError {
    pub message: String,
    pub severity: Severity,
}

impl StatusError {
    pub fn new(message: impl Into<String>, severity: Severity) -> Self {
        Self {
            message: message.into(),
            severity,
        }
    }
}

/// Tri-state operational status derived from the screen state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationalStatus {
    Loading,
    Ready,
    Errored,
}

/// Push channel connection state, for display only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PushStatus {
    /// Not opened yet.
    #[default]
    Idle,
    /// Connection handshake in progress.
    Connecting,
    /// Connected and listening.
    Open,
    /// Connection failed.
    Failed,
    /// Connection closed.
    Closed,
}

impl std::fmt::Display for PushStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Idle => write!(f, "Idle"),
            Self::Connecting => write!(f, "Connecting"),
            Self::Open => write!(f, "Connected"),
            Self::Failed => write!(f, "Failed"),
            Self::Closed => write!(f, "Closed"),
        }
    }
}

/// Mutable screen state. Only reachable through [`SharedScreenState`].
#[derive(Debug, Clone, Default)]
struct ScreenState {
    position: Option<Position>,
    loading: bool,
    error: Option<StatusError>,
    retry_count: u32,
    push: PushStatus,
    reports_sent: u64,
}

/// Immutable view of the screen state for rendering and tests.
#[derive(Debug, Clone, PartialEq)]
pub struct ScreenSnapshot {
    pub position: Option<Position>,
    pub loading: bool,
    pub error: Option<StatusError>,
    pub retry_count: u32,
    pub push: PushStatus,
    pub reports_sent: u64,
}

impl ScreenSnapshot {
    /// Operational status: loading wins, then error, else ready.
    pub fn status(&self) -> OperationalStatus {
        if self.loading {
            OperationalStatus::Loading
        } else if self.error.is_some() {
            OperationalStatus::Errored
        } else {
            OperationalStatus::Ready
        }
    }

    /// Whether the refresh control should be enabled.
    pub fn can_refresh(&self) -> bool {
        !self.loading
    }
}

/// Shared handle to the screen state.
///
/// Cloning shares the same state.
#[derive(Debug, Clone, Default)]
pub struct SharedScreenState {
    inner: Arc<RwLock<ScreenState>>,
}

impl SharedScreenState {
    /// Empty state: no position, not loading.
    pub fn new() -> Self {
        Self::default()
    }

    /// State that already holds a position.
    pub fn with_position(position: Position) -> Self {
        let state = Self::new();
        state.write().position = Some(position);
        state
    }

    /// Copy out the current state.
    pub fn snapshot(&self) -> ScreenSnapshot {
        let state = self.read();
        ScreenSnapshot {
            position: state.position,
            loading: state.loading,
            error: state.error.clone(),
            retry_count: state.retry_count,
            push: state.push,
            reports_sent: state.reports_sent,
        }
    }

    /// Last known position.
    pub fn position(&self) -> Option<Position> {
        self.read().position
    }

    /// Whether an acquisition is in flight.
    pub fn is_loading(&self) -> bool {
        self.read().loading
    }

    /// Start an acquisition.
    ///
    /// Clears the banner and the retry counter and sets loading. Loading is
    /// cleared when the returned guard drops, however the acquisition ends.
    pub fn begin_acquisition(&self) -> LoadingGuard {
        Self::start_loading(&mut self.write());
        LoadingGuard {
            state: self.clone(),
        }
    }

    /// Start an acquisition unless one is already in flight.
    ///
    /// The check and the claim happen under one lock, so of two concurrent
    /// callers exactly one gets the guard.
    pub fn try_begin_acquisition(&self) -> Option<LoadingGuard> {
        {
            let mut state = self.write();
            if state.loading {
                return None;
            }
            Self::start_loading(&mut state);
        }
        Some(LoadingGuard {
            state: self.clone(),
        })
    }

    /// Record a successful fix: replace the position, reset retries.
    pub fn record_position(&self, position: Position) {
        let mut state = self.write();
        state.position = Some(position);
        state.retry_count = 0;
        state.error = None;
    }

    /// Record a failed fix. Returns the new retry count.
    ///
    /// The stored position is left untouched.
    pub fn record_fix_failure(&self) -> u32 {
        let mut state = self.write();
        state.retry_count += 1;
        state.retry_count
    }

    /// Show an error in the banner.
    pub fn set_error(&self, error: StatusError) {
        self.write().error = Some(error);
    }

    /// Update the push channel display state.
    pub fn set_push_status(&self, status: PushStatus) {
        self.write().push = status;
    }

    /// Count a confirmed report.
    pub fn record_report_sent(&self) {
        self.write().reports_sent += 1;
    }

    fn start_loading(state: &mut ScreenState) {
        state.loading = true;
        state.error = None;
        state.retry_count = 0;
    }

    fn finish_loading(&self) {
        self.write().loading = false;
    }

    fn read(&self) -> RwLockReadGuard<'_, ScreenState> {
        // A panic while holding the lock cannot leave the state half-written:
        // every transition assigns whole fields.
        self.inner.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, ScreenState> {
        self.inner.write().unwrap_or_else(|e| e.into_inner())
    }
}

/// Clears the loading flag exactly once, on drop.
#[must_use = "loading is cleared as soon as the guard is dropped"]
#[derive(Debug)]
pub struct LoadingGuard {
    state: SharedScreenState,
}

impl Drop for LoadingGuard {
    fn drop(&mut self) {
        self.state.finish_loading();
    }
}
