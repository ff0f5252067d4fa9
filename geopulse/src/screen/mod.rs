//! The location screen.
//!
//! - [`state`] - `SharedScreenState` and the immutable `ScreenSnapshot` renderers see
//! - [`controller`] - `ScreenController` driving one screen lifetime

mod controller;
mod state;

pub use controller::{AcquisitionTask, ReportTask, ScreenController};
pub use state::{
    LoadingGuard, OperationalStatus, PushStatus, ScreenSnapshot, Severity, SharedScreenState,
    StatusError,
};
