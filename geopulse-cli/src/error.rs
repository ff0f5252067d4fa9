//! CLI error handling with user-friendly messages.
//!
//! Centralizes error handling for the CLI, providing consistent formatting
//! and appropriate exit codes.

use std::fmt;
use std::process;

use geopulse::config::ConfigFileError;
use geopulse::location::{AcquisitionError, ProviderConfigError};
use geopulse::report::ReportError;

/// CLI-specific errors with user-friendly messages.
#[derive(Debug)]
pub enum CliError {
    /// Failed to initialize logging
    LoggingInit(String),
    /// Configuration error
    Config(String),
    /// Invalid command-line argument
    InvalidArgument(String),
    /// Failed to start the async runtime
    Runtime(std::io::Error),
    /// Location acquisition failed
    Acquisition(AcquisitionError),
    /// Report failed
    Report(ReportError),
    /// Terminal screen error
    Screen(std::io::Error),
}

impl CliError {
    /// Exit the process with an appropriate error message and code.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);

        // Print additional help for specific errors
        match self {
            CliError::Acquisition(AcquisitionError::ServicesDisabled) => {
                eprintln!();
                eprintln!("Location services are provided by gpsd. Make sure:");
                eprintln!("  1. gpsd is running: systemctl status gpsd");
                eprintln!("  2. location.gpsd_address points at it: geopulse config get location.gpsd_address");
                eprintln!("  3. Or use a fixed coordinate: geopulse config set location.source static");
            }
            CliError::Acquisition(AcquisitionError::PermissionDenied { .. }) => {
                eprintln!();
                eprintln!("To skip the prompt, grant access in the config file:");
                eprintln!("  geopulse config set location.permission granted");
            }
            CliError::Report(ReportError::Http(_)) | CliError::Report(ReportError::Status(_)) => {
                eprintln!();
                eprintln!("Check the collector address:");
                eprintln!("  geopulse config get server.report_url");
            }
            _ => {}
        }

        process::exit(1)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::LoggingInit(msg) => write!(f, "Failed to initialize logging: {}", msg),
            CliError::Config(msg) => write!(f, "Configuration error: {}", msg),
            CliError::InvalidArgument(msg) => write!(f, "Invalid argument: {}", msg),
            CliError::Runtime(e) => write!(f, "Failed to start async runtime: {}", e),
            CliError::Acquisition(e) => write!(f, "{}", e),
            CliError::Report(e) => write!(f, "Failed to send location: {}", e),
            CliError::Screen(e) => write!(f, "Terminal error: {}", e),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Runtime(e) => Some(e),
            CliError::Acquisition(e) => Some(e),
            CliError::Report(e) => Some(e),
            CliError::Screen(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ConfigFileError> for CliError {
    fn from(e: ConfigFileError) -> Self {
        CliError::Config(e.to_string())
    }
}

impl From<ProviderConfigError> for CliError {
    fn from(e: ProviderConfigError) -> Self {
        CliError::Config(e.to_string())
    }
}

impl From<AcquisitionError> for CliError {
    fn from(e: AcquisitionError) -> Self {
        CliError::Acquisition(e)
    }
}

impl From<ReportError> for CliError {
    fn from(e: ReportError) -> Self {
        CliError::Report(e)
    }
}
