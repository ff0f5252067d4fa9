//! GeoPulse - location reporter
//!
//! This library acquires the device position and reports it to a remote
//! collector over two channels: a one-shot HTTP `POST` and a long-lived
//! WebSocket whose inbound messages trigger a report.
//!
//! # High-Level API
//!
//! The [`screen`] module ties everything together:
//!
//! ```ignore
//! use std::sync::Arc;
//! use geopulse::alert::TracingAlertSink;
//! use geopulse::location::{AutoGrant, GpsdProvider, LocationAcquirer};
//! use geopulse::report::{HttpReportClient, LocationReporter, WebSocketChannel};
//! use geopulse::screen::ScreenController;
//!
//! let alerts = Arc::new(TracingAlertSink);
//! let acquirer = LocationAcquirer::new(GpsdProvider::new("127.0.0.1:2947"), AutoGrant, alerts.clone());
//! let reporter = LocationReporter::new(HttpReportClient::new(url, timeout)?, alerts.clone());
//!
//! let mut screen = ScreenController::new(acquirer, reporter, alerts);
//! let first_fix = screen.mount(WebSocketChannel::new("wss://collector.example"));
//! ```

pub mod alert;
pub mod config;
pub mod location;
pub mod logging;
pub mod report;
pub mod screen;
pub mod task;

/// Version of the GeoPulse library and CLI.
///
/// The version is defined in `Cargo.toml` and injected at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
