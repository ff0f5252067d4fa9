//! Settings structs for all configuration sections.
//!
//! Each struct represents one `[section]` of the INI config file.
//! These are pure data types with no parsing or serialization logic.

use std::path::PathBuf;
use std::time::Duration;

/// Complete application configuration loaded from config.ini.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigFile {
    /// Collector endpoints
    pub server: ServerSettings,
    /// Acquisition retry and fix settings
    pub acquisition: AcquisitionSettings,
    /// Location source settings
    pub location: LocationSettings,
    /// Logging settings
    pub logging: LoggingSettings,
}

/// Remote collector configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct ServerSettings {
    /// WebSocket URL of the push channel (e.g. `wss://collector.example`).
    pub socket_url: String,
    /// Full URL of the HTTP report endpoint.
    pub report_url: String,
    /// Timeout in seconds for the HTTP report request.
    pub request_timeout: u64,
}

impl ServerSettings {
    /// Request timeout as a `Duration`.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout)
    }
}

/// Acquisition configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct AcquisitionSettings {
    /// Fix attempts before the acquisition gives up.
    pub max_attempts: u32,
    /// Fixed delay in seconds between a failed fix and the next attempt.
    pub retry_delay: u64,
    /// Seconds to wait for a single fix.
    pub fix_timeout: u64,
    /// Request a 3D fix rather than any fix.
    pub high_accuracy: bool,
}

/// Where positions come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocationSourceKind {
    /// A running gpsd daemon.
    Gpsd,
    /// A fixed coordinate from the config file.
    Static,
}

impl LocationSourceKind {
    /// Config file spelling of this source.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Gpsd => "gpsd",
            Self::Static => "static",
        }
    }
}

impl std::str::FromStr for LocationSourceKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "gpsd" => Ok(Self::Gpsd),
            "static" => Ok(Self::Static),
            _ => Err(()),
        }
    }
}

/// How the location permission is resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionMode {
    /// Ask interactively.
    Prompt,
    /// Treat permission as already granted.
    Granted,
}

impl PermissionMode {
    /// Config file spelling of this mode.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Prompt => "prompt",
            Self::Granted => "granted",
        }
    }
}

impl std::str::FromStr for PermissionMode {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "prompt" => Ok(Self::Prompt),
            "granted" => Ok(Self::Granted),
            _ => Err(()),
        }
    }
}

/// Location source configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct LocationSettings {
    /// Which provider supplies fixes.
    pub source: LocationSourceKind,
    /// gpsd `host:port`.
    pub gpsd_address: String,
    /// Latitude for the static source.
    pub latitude: Option<f64>,
    /// Longitude for the static source.
    pub longitude: Option<f64>,
    /// Permission handling.
    pub permission: PermissionMode,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct LoggingSettings {
    /// Log file path
    pub file: PathBuf,
}
