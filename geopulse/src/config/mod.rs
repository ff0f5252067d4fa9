//! Configuration for GeoPulse.
//!
//! The INI file at `~/.geopulse/config.ini` is split by concern:
//!
//! - [`settings`] - plain data structs, one per `[section]`
//! - `defaults` - `DEFAULT_*` constants and `ConfigFile::default()`
//! - `parser` - `Ini` → `ConfigFile` with validation
//! - `writer` - `ConfigFile` → commented INI text
//! - `keys` - `section.key` access for the CLI
//!
//! # Example
//!
//! ```no_run
//! use geopulse::config::ConfigFile;
//!
//! let config = ConfigFile::load().unwrap_or_default();
//! println!("Reporting to {}", config.server.report_url);
//! ```

mod defaults;
mod file;
mod keys;
mod parser;
pub mod settings;
mod writer;

pub use defaults::*;
pub use file::{config_directory, config_file_path, ConfigFileError};
pub use keys::{ConfigKey, ConfigKeyError};
pub use settings::{
    AcquisitionSettings, ConfigFile, LocationSettings, LocationSourceKind, LoggingSettings,
    PermissionMode, ServerSettings,
};
