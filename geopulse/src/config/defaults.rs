//! Default values and constants for all configuration settings.
//!
//! Contains all `DEFAULT_*` constants and the `ConfigFile::default()`
//! implementation.

use super::file::config_directory;
use super::settings::*;

/// Default push channel URL.
pub const DEFAULT_SOCKET_URL: &str = "wss://localhost:8080";

/// Default report endpoint URL.
pub const DEFAULT_REPORT_URL: &str = "https://localhost:8080/send-location";

/// Default HTTP request timeout in seconds.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Fix attempts per acquisition.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Fixed delay between fix attempts in seconds.
pub const DEFAULT_RETRY_DELAY_SECS: u64 = 2;

/// Single fix timeout in seconds.
pub const DEFAULT_FIX_TIMEOUT_SECS: u64 = 15;

/// Default gpsd address.
pub const DEFAULT_GPSD_ADDRESS: &str = "127.0.0.1:2947";

/// Default log file name inside the config directory.
pub const DEFAULT_LOG_FILE_NAME: &str = "geopulse.log";

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            server: ServerSettings {
                socket_url: DEFAULT_SOCKET_URL.to_string(),
                report_url: DEFAULT_REPORT_URL.to_string(),
                request_timeout: DEFAULT_REQUEST_TIMEOUT_SECS,
            },
            acquisition: AcquisitionSettings {
                max_attempts: DEFAULT_MAX_ATTEMPTS,
                retry_delay: DEFAULT_RETRY_DELAY_SECS,
                fix_timeout: DEFAULT_FIX_TIMEOUT_SECS,
                high_accuracy: true,
            },
            location: LocationSettings {
                source: LocationSourceKind::Gpsd,
                gpsd_address: DEFAULT_GPSD_ADDRESS.to_string(),
                latitude: None,
                longitude: None,
                permission: PermissionMode::Prompt,
            },
            logging: LoggingSettings {
                file: config_directory().join(DEFAULT_LOG_FILE_NAME),
            },
        }
    }
}
