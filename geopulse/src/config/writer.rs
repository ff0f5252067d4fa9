//! INI serialization logic for converting `ConfigFile` → INI string.
//!
//! This module contains the `to_config_string()` function that produces
//! the commented INI representation written to `config.ini`.

use std::path::Path;

use super::settings::ConfigFile;

/// Convert a `ConfigFile` to a commented INI string for saving.
pub(super) fn to_config_string(config: &ConfigFile) -> String {
    let latitude = config
        .location
        .latitude
        .map(|v| v.to_string())
        .unwrap_or_default();
    let longitude = config
        .location
        .longitude
        .map(|v| v.to_string())
        .unwrap_or_default();

    format!(
        r#"[server]
; WebSocket push channel. Any inbound message triggers a location report.
socket_url = {}
; HTTP endpoint receiving POST {{"lat": ..., "long": ...}}
report_url = {}
; Timeout in seconds for the report request (default: 30)
request_timeout = {}

[acquisition]
; Fix attempts before giving up (default: 3)
max_attempts = {}
; Fixed delay in seconds between attempts (default: 2)
retry_delay = {}
; Seconds to wait for a single fix (default: 15)
fix_timeout = {}
; Require a 3D fix (default: true)
high_accuracy = {}

[location]
; Position source:
;   gpsd   - read fixes from a running gpsd daemon
;   static - use latitude/longitude below
source = {}
; gpsd host:port (default: 127.0.0.1:2947)
gpsd_address = {}
; Fixed coordinates (required when source = static)
latitude = {}
longitude = {}
; Permission handling:
;   prompt  - ask before the first fix
;   granted - assume permission is granted
permission = {}

[logging]
; Log file location
file = {}
"#,
        config.server.socket_url,
        config.server.report_url,
        config.server.request_timeout,
        config.acquisition.max_attempts,
        config.acquisition.retry_delay,
        config.acquisition.fix_timeout,
        config.acquisition.high_accuracy,
        config.location.source.as_str(),
        config.location.gpsd_address,
        latitude,
        longitude,
        config.location.permission.as_str(),
        path_to_string(&config.logging.file),
    )
}

/// Render a path for the config file, collapsing the home directory to `~`.
pub(super) fn path_to_string(path: &Path) -> String {
    if let Some(home) = dirs::home_dir() {
        if let Ok(rest) = path.strip_prefix(&home) {
            return format!("~/{}", rest.display());
        }
    }
    path.display().to_string()
}
