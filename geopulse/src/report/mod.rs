//! Location reporting.
//!
//! Two channels deliver the last known position to the collector:
//!
//! - [`push`] - a long-lived WebSocket used only as a trigger
//! - [`client`] - the one-shot `POST /send-location`
//!
//! [`reporter`] ties the HTTP client to the alert sink.
//!
//! ```text
//! WebSocketChannel ──PushEvent::Message──► ScreenController
//!                                              │
//!                                              ▼
//!                          LocationReporter::report(last position)
//!                                              │
//!                                              ▼
//!                          HttpReportClient ──POST──► collector
//! ```

mod client;
mod error;
mod push;
mod reporter;

pub use client::{HttpReportClient, LocationPayload, ReportClient, ReportResponse};
pub use error::{PushError, ReportError};
pub use push::{PushChannel, PushEvent, WebSocketChannel};
pub use reporter::LocationReporter;
