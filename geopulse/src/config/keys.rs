//! Configuration key access and validation.
//!
//! Type-safe get/set of configuration values by `section.key` name, used by
//! the `config get` and `config set` commands.

use std::str::FromStr;
use thiserror::Error;

use super::parser::{expand_tilde, parse_bool, parse_coordinate};
use super::settings::ConfigFile;
use super::writer::path_to_string;

/// Errors that can occur when getting or setting configuration values.
#[derive(Debug, Error)]
pub enum ConfigKeyError {
    /// Unknown configuration key.
    #[error("Unknown configuration key '{0}'")]
    UnknownKey(String),

    /// Validation failed for the value.
    #[error("Invalid value for {key}: {reason}")]
    ValidationFailed { key: String, reason: String },
}

/// Supported configuration keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigKey {
    ServerSocketUrl,
    ServerReportUrl,
    ServerRequestTimeout,

    AcquisitionMaxAttempts,
    AcquisitionRetryDelay,
    AcquisitionFixTimeout,
    AcquisitionHighAccuracy,

    LocationSource,
    LocationGpsdAddress,
    LocationLatitude,
    LocationLongitude,
    LocationPermission,

    LoggingFile,
}

impl FromStr for ConfigKey {
    type Err = ConfigKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|key| key.name() == s.to_lowercase())
            .ok_or_else(|| ConfigKeyError::UnknownKey(s.to_string()))
    }
}

impl ConfigKey {
    /// Full `section.key` name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::ServerSocketUrl => "server.socket_url",
            Self::ServerReportUrl => "server.report_url",
            Self::ServerRequestTimeout => "server.request_timeout",
            Self::AcquisitionMaxAttempts => "acquisition.max_attempts",
            Self::AcquisitionRetryDelay => "acquisition.retry_delay",
            Self::AcquisitionFixTimeout => "acquisition.fix_timeout",
            Self::AcquisitionHighAccuracy => "acquisition.high_accuracy",
            Self::LocationSource => "location.source",
            Self::LocationGpsdAddress => "location.gpsd_address",
            Self::LocationLatitude => "location.latitude",
            Self::LocationLongitude => "location.longitude",
            Self::LocationPermission => "location.permission",
            Self::LoggingFile => "logging.file",
        }
    }

    /// Section part of the name.
    pub fn section(&self) -> &'static str {
        self.name().split_once('.').map_or("", |(section, _)| section)
    }

    /// Key part of the name, without the section.
    pub fn key_name(&self) -> &'static str {
        self.name().split_once('.').map_or("", |(_, key)| key)
    }

    /// Every supported key, in config file order.
    pub fn all() -> &'static [ConfigKey] {
        &[
            Self::ServerSocketUrl,
            Self::ServerReportUrl,
            Self::ServerRequestTimeout,
            Self::AcquisitionMaxAttempts,
            Self::AcquisitionRetryDelay,
            Self::AcquisitionFixTimeout,
            Self::AcquisitionHighAccuracy,
            Self::LocationSource,
            Self::LocationGpsdAddress,
            Self::LocationLatitude,
            Self::LocationLongitude,
            Self::LocationPermission,
            Self::LoggingFile,
        ]
    }

    /// Current value rendered as a string; empty when unset.
    pub fn get(&self, config: &ConfigFile) -> String {
        match self {
            Self::ServerSocketUrl => config.server.socket_url.clone(),
            Self::ServerReportUrl => config.server.report_url.clone(),
            Self::ServerRequestTimeout => config.server.request_timeout.to_string(),
            Self::AcquisitionMaxAttempts => config.acquisition.max_attempts.to_string(),
            Self::AcquisitionRetryDelay => config.acquisition.retry_delay.to_string(),
            Self::AcquisitionFixTimeout => config.acquisition.fix_timeout.to_string(),
            Self::AcquisitionHighAccuracy => config.acquisition.high_accuracy.to_string(),
            Self::LocationSource => config.location.source.as_str().to_string(),
            Self::LocationGpsdAddress => config.location.gpsd_address.clone(),
            Self::LocationLatitude => config
                .location
                .latitude
                .map(|v| v.to_string())
                .unwrap_or_default(),
            Self::LocationLongitude => config
                .location
                .longitude
                .map(|v| v.to_string())
                .unwrap_or_default(),
            Self::LocationPermission => config.location.permission.as_str().to_string(),
            Self::LoggingFile => path_to_string(&config.logging.file),
        }
    }

    /// Validate and store a value.
    pub fn set(&self, config: &mut ConfigFile, value: &str) -> Result<(), ConfigKeyError> {
        let value = value.trim();
        match self {
            Self::ServerSocketUrl => {
                if !(value.starts_with("ws://") || value.starts_with("wss://")) {
                    return Err(self.rejected("must start with ws:// or wss://"));
                }
                config.server.socket_url = value.to_string();
            }
            Self::ServerReportUrl => {
                if !(value.starts_with("http://") || value.starts_with("https://")) {
                    return Err(self.rejected("must start with http:// or https://"));
                }
                config.server.report_url = value.to_string();
            }
            Self::ServerRequestTimeout => {
                config.server.request_timeout = self.positive(value)?;
            }
            Self::AcquisitionMaxAttempts => {
                config.acquisition.max_attempts = u32::try_from(self.positive(value)?)
                    .map_err(|_| self.rejected("too large"))?;
            }
            Self::AcquisitionRetryDelay => {
                config.acquisition.retry_delay = value
                    .parse()
                    .map_err(|_| self.rejected("must be a non-negative integer"))?;
            }
            Self::AcquisitionFixTimeout => {
                config.acquisition.fix_timeout = self.positive(value)?;
            }
            Self::AcquisitionHighAccuracy => {
                config.acquisition.high_accuracy =
                    parse_bool(value).ok_or_else(|| self.rejected("must be true or false"))?;
            }
            Self::LocationSource => {
                config.location.source = value
                    .parse()
                    .map_err(|_| self.rejected("must be 'gpsd' or 'static'"))?;
            }
            Self::LocationGpsdAddress => {
                if value.is_empty() {
                    return Err(self.rejected("must not be empty"));
                }
                config.location.gpsd_address = value.to_string();
            }
            Self::LocationLatitude => {
                config.location.latitude = parse_coordinate(value, 90.0)
                    .map_err(|_| self.rejected("must be between -90 and 90"))?;
            }
            Self::LocationLongitude => {
                config.location.longitude = parse_coordinate(value, 180.0)
                    .map_err(|_| self.rejected("must be between -180 and 180"))?;
            }
            Self::LocationPermission => {
                config.location.permission = value
                    .parse()
                    .map_err(|_| self.rejected("must be 'prompt' or 'granted'"))?;
            }
            Self::LoggingFile => {
                if value.is_empty() {
                    return Err(self.rejected("must not be empty"));
                }
                config.logging.file = expand_tilde(value);
            }
        }
        Ok(())
    }

    fn positive(&self, value: &str) -> Result<u64, ConfigKeyError> {
        value
            .parse::<u64>()
            .ok()
            .filter(|n| *n > 0)
            .ok_or_else(|| self.rejected("must be a positive integer"))
    }

    fn rejected(&self, reason: &str) -> ConfigKeyError {
        ConfigKeyError::ValidationFailed {
            key: self.name().to_string(),
            reason: reason.to_string(),
        }
    }
}
