//! gpsd location provider.
//!
//! Talks to a running [gpsd](https://gpsd.io) daemon over its JSON socket
//! protocol (TCP, default `127.0.0.1:2947`).
//!
//! # Protocol
//!
//! A fix opens a fresh connection, enables watch mode with
//! `?WATCH={"enable":true,"json":true};` and reads newline-delimited JSON
//! reports. `VERSION`, `DEVICES`, `WATCH`, `SKY` and other classes are
//! skipped; the first `TPV` report with a usable fix wins:
//!
//! ```text
//! {"class":"TPV","device":"/dev/ttyUSB0","mode":3,"time":"2026-10-18T09:21:04.000Z",
//!  "lat":53.630278,"lon":9.988333,"epx":3.1,"epy":4.6}
//! ```
//!
//! `mode` is 0/1 for no fix, 2 for a 2D fix and 3 for a 3D fix. A
//! high-accuracy request only accepts mode 3.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;

use super::error::FixError;
use super::model::{FixRequest, Position};
use super::provider::LocationProvider;

/// Command enabling JSON watch mode.
const WATCH_COMMAND: &[u8] = b"?WATCH={\"enable\":true,\"json\":true};\n";

/// Default time allowed for the service check connection.
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(2);

/// Reports we care about, keyed by gpsd's `class` field.
#[derive(Debug, Deserialize)]
#[serde(tag = "class")]
enum GpsdReport {
    #[serde(rename = "TPV")]
    Tpv(TpvReport),
    #[serde(other)]
    Other,
}

/// Time-position-velocity report. Only the fields we use.
#[derive(Debug, Deserialize)]
struct TpvReport {
    #[serde(default)]
    mode: u8,
    lat: Option<f64>,
    lon: Option<f64>,
    time: Option<String>,
    epx: Option<f64>,
    epy: Option<f64>,
}

/// Location provider backed by gpsd.
#[derive(Debug, Clone)]
pub struct GpsdProvider {
    address: String,
    connect_timeout: Duration,
}

impl GpsdProvider {
    /// Create a provider for the daemon at `address` (`host:port`).
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
        }
    }

    /// Set how long the service check may wait for a connection.
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Daemon address.
    pub fn address(&self) -> &str {
        &self.address
    }

    async fn read_fix(&self, high_accuracy: bool) -> Result<Position, FixError> {
        let stream = TcpStream::connect(&self.address)
            .await
            .map_err(|e| FixError::Unavailable(format!("{}: {}", self.address, e)))?;
        let (read_half, mut write_half) = stream.into_split();

        write_half
            .write_all(WATCH_COMMAND)
            .await
            .map_err(|e| FixError::Unavailable(e.to_string()))?;

        let mut lines = BufReader::new(read_half).lines();
        let mut reports_seen: u64 = 0;

        while let Some(line) = lines
            .next_line()
            .await
            .map_err(|e| FixError::Unavailable(e.to_string()))?
        {
            reports_seen += 1;
            match parse_report(&line, high_accuracy) {
                Ok(Some(position)) => {
                    tracing::debug!(
                        address = %self.address,
                        reports_seen,
                        %position,
                        "gpsd fix received"
                    );
                    return Ok(position);
                }
                Ok(None) => {}
                Err(e) => tracing::debug!(error = %e, "Skipping unreadable gpsd report"),
            }
        }

        Err(FixError::NoFix)
    }
}

impl LocationProvider for GpsdProvider {
    async fn services_enabled(&self) -> bool {
        match tokio::time::timeout(self.connect_timeout, TcpStream::connect(&self.address)).await
        {
            Ok(Ok(_)) => true,
            Ok(Err(e)) => {
                tracing::debug!(address = %self.address, error = %e, "gpsd not reachable");
                false
            }
            Err(_) => {
                tracing::debug!(address = %self.address, "gpsd connection timed out");
                false
            }
        }
    }

    async fn current_position(&self, request: &FixRequest) -> Result<Position, FixError> {
        tokio::time::timeout(request.timeout, self.read_fix(request.high_accuracy))
            .await
            .map_err(|_| FixError::Timeout(request.timeout))?
    }
}

/// Parse one gpsd line into a position if it carries a usable fix.
fn parse_report(line: &str, high_accuracy: bool) -> Result<Option<Position>, FixError> {
    let report: GpsdReport =
        serde_json::from_str(line).map_err(|e| FixError::Protocol(e.to_string()))?;

    let tpv = match report {
        GpsdReport::Tpv(tpv) => tpv,
        GpsdReport::Other => return Ok(None),
    };

    let required_mode = if high_accuracy { 3 } else { 2 };
    if tpv.mode < required_mode {
        return Ok(None);
    }

    let (Some(latitude), Some(longitude)) = (tpv.lat, tpv.lon) else {
        return Ok(None);
    };

    let timestamp = tpv
        .time
        .as_deref()
        .and_then(|t| DateTime::parse_from_rfc3339(t).ok())
        .map(|t| t.with_timezone(&Utc))
        .unwrap_or_else(Utc::now);

    let mut position = Position::new(latitude, longitude).at(timestamp);
    if let Some(error) = max_error(tpv.epx, tpv.epy) {
        position = position.with_accuracy(error as f32);
    }

    if !position.is_valid() {
        return Err(FixError::Protocol(format!(
            "coordinate out of range: {}, {}",
            latitude, longitude
        )));
    }

    Ok(Some(position))
}

/// Larger of the two horizontal error estimates, if any.
fn max_error(epx: Option<f64>, epy: Option<f64>) -> Option<f64> {
    match (epx, epy) {
        (Some(x), Some(y)) => Some(x.max(y)),
        (x, y) => x.or(y),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TPV_3D: &str = r#"{"class":"TPV","device":"/dev/ttyUSB0","mode":3,"time":"2026-10-18T09:21:04.000Z","lat":53.630278,"lon":9.988333,"alt":16.2,"epx":3.1,"epy":4.6}"#;
    const TPV_2D: &str = r#"{"class":"TPV","mode":2,"lat":43.629444,"lon":1.363889}"#;
    const TPV_NO_FIX: &str = r#"{"class":"TPV","mode":1}"#;

    #[test]
    fn test_parse_3d_fix() {
        let position = parse_report(TPV_3D, true).unwrap().unwrap();
        assert!((position.latitude - 53.630278).abs() < 1e-9);
        assert!((position.longitude - 9.988333).abs() < 1e-9);
        assert_eq!(position.accuracy, Some(4.6));
        assert_eq!(position.timestamp.to_rfc3339(), "2026-10-18T09:21:04+00:00");
    }

    #[test]
    fn test_high_accuracy_skips_2d_fix() {
        assert!(parse_report(TPV_2D, true).unwrap().is_none());
        let position = parse_report(TPV_2D, false).unwrap().unwrap();
        assert_eq!(position.accuracy, None);
    }

    #[test]
    fn test_no_fix_is_skipped() {
        assert!(parse_report(TPV_NO_FIX, false).unwrap().is_none());
    }

    #[test]
    fn test_other_classes_are_skipped() {
        let version = r#"{"class":"VERSION","release":"3.25","rev":"3.25","proto_major":3,"proto_minor":15}"#;
        let sky = r#"{"class":"SKY","satellites":[]}"#;
        assert!(parse_report(version, true).unwrap().is_none());
        assert!(parse_report(sky, true).unwrap().is_none());
    }

    #[test]
    fn test_garbage_is_protocol_error() {
        assert!(matches!(parse_report("not json", true), Err(FixError::Protocol(_))));
    }

    #[test]
    fn test_out_of_range_fix_is_rejected() {
        let line = r#"{"class":"TPV","mode":3,"lat":123.0,"lon":0.0}"#;
        assert!(matches!(parse_report(line, true), Err(FixError::Protocol(_))));
    }

    #[test]
    fn test_max_error() {
        assert_eq!(max_error(Some(3.0), Some(5.0)), Some(5.0));
        assert_eq!(max_error(None, Some(2.0)), Some(2.0));
        assert_eq!(max_error(None, None), None);
    }

    #[tokio::test]
    async fn test_unreachable_daemon_reports_services_disabled() {
        // Bind then drop to get a port nothing listens on.
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let address = listener.local_addr().unwrap().to_string();
        drop(listener);

        let provider = GpsdProvider::new(address);
        assert!(!provider.services_enabled().await);
    }
}
