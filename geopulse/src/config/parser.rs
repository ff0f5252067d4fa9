//! INI parsing logic for converting `Ini` → `ConfigFile`.
//!
//! This module contains the `parse_ini()` function and its helpers.
//! It is the single place where INI key names are mapped to struct fields.

use ini::Ini;
use std::path::PathBuf;

use super::file::ConfigFileError;
use super::settings::ConfigFile;

/// Parse an `Ini` object into a `ConfigFile`.
///
/// Starts from `ConfigFile::default()` and overlays any values found in the INI.
pub(super) fn parse_ini(ini: &Ini) -> Result<ConfigFile, ConfigFileError> {
    let mut config = ConfigFile::default();

    // [server] section
    if let Some(section) = ini.section(Some("server")) {
        if let Some(v) = section.get("socket_url") {
            let v = v.trim();
            if !(v.starts_with("ws://") || v.starts_with("wss://")) {
                return Err(invalid("server", "socket_url", v, "must start with ws:// or wss://"));
            }
            config.server.socket_url = v.to_string();
        }
        if let Some(v) = section.get("report_url") {
            let v = v.trim();
            if !(v.starts_with("http://") || v.starts_with("https://")) {
                return Err(invalid(
                    "server",
                    "report_url",
                    v,
                    "must start with http:// or https://",
                ));
            }
            config.server.report_url = v.to_string();
        }
        if let Some(v) = section.get("request_timeout") {
            config.server.request_timeout = parse_positive(v)
                .ok_or_else(|| invalid("server", "request_timeout", v, "must be a positive integer (seconds)"))?;
        }
    }

    // [acquisition] section
    if let Some(section) = ini.section(Some("acquisition")) {
        if let Some(v) = section.get("max_attempts") {
            config.acquisition.max_attempts = parse_positive(v)
                .and_then(|n| u32::try_from(n).ok())
                .ok_or_else(|| invalid("acquisition", "max_attempts", v, "must be a positive integer"))?;
        }
        if let Some(v) = section.get("retry_delay") {
            config.acquisition.retry_delay = v.trim().parse().map_err(|_| {
                invalid("acquisition", "retry_delay", v, "must be a non-negative integer (seconds)")
            })?;
        }
        if let Some(v) = section.get("fix_timeout") {
            config.acquisition.fix_timeout = parse_positive(v)
                .ok_or_else(|| invalid("acquisition", "fix_timeout", v, "must be a positive integer (seconds)"))?;
        }
        if let Some(v) = section.get("high_accuracy") {
            config.acquisition.high_accuracy = parse_bool(v)
                .ok_or_else(|| invalid("acquisition", "high_accuracy", v, "must be true or false"))?;
        }
    }

    // [location] section
    if let Some(section) = ini.section(Some("location")) {
        if let Some(v) = section.get("source") {
            config.location.source = v
                .parse()
                .map_err(|_| invalid("location", "source", v, "must be 'gpsd' or 'static'"))?;
        }
        if let Some(v) = section.get("gpsd_address") {
            let v = v.trim();
            if !v.is_empty() {
                config.location.gpsd_address = v.to_string();
            }
        }
        if let Some(v) = section.get("latitude") {
            config.location.latitude = parse_coordinate(v, 90.0)
                .map_err(|_| invalid("location", "latitude", v, "must be between -90 and 90"))?;
        }
        if let Some(v) = section.get("longitude") {
            config.location.longitude = parse_coordinate(v, 180.0)
                .map_err(|_| invalid("location", "longitude", v, "must be between -180 and 180"))?;
        }
        if let Some(v) = section.get("permission") {
            config.location.permission = v
                .parse()
                .map_err(|_| invalid("location", "permission", v, "must be 'prompt' or 'granted'"))?;
        }
    }

    // [logging] section
    if let Some(section) = ini.section(Some("logging")) {
        if let Some(v) = section.get("file") {
            let v = v.trim();
            if !v.is_empty() {
                config.logging.file = expand_tilde(v);
            }
        }
    }

    Ok(config)
}

fn invalid(section: &str, key: &str, value: &str, reason: &str) -> ConfigFileError {
    ConfigFileError::InvalidValue {
        section: section.to_string(),
        key: key.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

fn parse_positive(value: &str) -> Option<u64> {
    value.trim().parse::<u64>().ok().filter(|n| *n > 0)
}

/// Parse a boolean in the spellings users tend to write.
pub(super) fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "yes" | "1" | "on" => Some(true),
        "false" | "no" | "0" | "off" => Some(false),
        _ => None,
    }
}

/// Parse an optional coordinate; empty means unset.
pub(super) fn parse_coordinate(value: &str, limit: f64) -> Result<Option<f64>, ()> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }
    match value.parse::<f64>() {
        Ok(n) if n.is_finite() && n.abs() <= limit => Ok(Some(n)),
        _ => Err(()),
    }
}

/// Expand `~` to the home directory.
pub(super) fn expand_tilde(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}
