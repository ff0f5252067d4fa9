//! CLI runner for common setup and operations.
//!
//! Encapsulates config loading, logging initialization, the async runtime,
//! and construction of the location and reporting pieces to reduce
//! duplication across command handlers.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use tokio::runtime::Runtime;
use tracing::info;

use geopulse::alert::AlertSink;
use geopulse::config::{config_file_path, ConfigFile};
use geopulse::location::{ConfiguredProvider, LocationAcquirer, PermissionPrompt};
use geopulse::logging::{default_log_file, init_logging_full, LoggingGuard};
use geopulse::report::{HttpReportClient, LocationReporter, WebSocketChannel};

use crate::error::CliError;

/// How long the gpsd service check may wait for a connection.
const GPSD_CONNECT_TIMEOUT: Duration = Duration::from_secs(2);

/// Options shared by every command.
#[derive(Debug, Clone, Default)]
pub struct GlobalOptions {
    /// Config file override.
    pub config: Option<PathBuf>,
    /// Force debug-level logging.
    pub debug: bool,
}

impl GlobalOptions {
    /// Config file in effect.
    pub fn config_path(&self) -> PathBuf {
        self.config.clone().unwrap_or_else(config_file_path)
    }
}

/// Runner that manages CLI lifecycle and common operations.
pub struct CliRunner {
    /// Logging guard - keeps logging active while runner exists
    #[allow(dead_code)]
    logging_guard: LoggingGuard,
    /// Loaded configuration file
    config: ConfigFile,
    /// Runtime for all async work
    runtime: Runtime,
}

impl CliRunner {
    /// Create a runner, loading config and initializing logging.
    ///
    /// When stdout is a TTY, stdout logging is disabled to prevent
    /// interference with the terminal screen and command output.
    pub fn new(options: &GlobalOptions) -> Result<Self, CliError> {
        let config = ConfigFile::load_from(&options.config_path())?;

        let (log_dir, log_file) = split_log_path(&config.logging.file);
        let stdout_enabled = !atty::is(atty::Stream::Stdout);

        let logging_guard = init_logging_full(&log_dir, &log_file, stdout_enabled, options.debug)
            .map_err(|e| CliError::LoggingInit(e.to_string()))?;

        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .thread_name("geopulse")
            .build()
            .map_err(CliError::Runtime)?;

        Ok(Self {
            logging_guard,
            config,
            runtime,
        })
    }

    /// Get the loaded configuration.
    pub fn config(&self) -> &ConfigFile {
        &self.config
    }

    /// Runtime for async work.
    pub fn runtime(&self) -> &Runtime {
        &self.runtime
    }

    /// Log startup information for a command.
    pub fn log_startup(&self, command: &str) {
        info!("GeoPulse v{}", geopulse::VERSION);
        info!("GeoPulse CLI: {} command", command);
    }

    /// Location provider named in `[location]`.
    pub fn provider(&self) -> Result<ConfiguredProvider, CliError> {
        let provider =
            ConfiguredProvider::from_settings(&self.config.location, GPSD_CONNECT_TIMEOUT)?;
        info!(source = %provider.describe(), "Location source");
        Ok(provider)
    }

    /// Acquirer over the configured provider.
    pub fn acquirer<Q: PermissionPrompt>(
        &self,
        prompt: Q,
        alerts: Arc<dyn AlertSink>,
    ) -> Result<LocationAcquirer<ConfiguredProvider, Q>, CliError> {
        Ok(LocationAcquirer::from_settings(
            self.provider()?,
            prompt,
            alerts,
            &self.config.acquisition,
        ))
    }

    /// Reporter posting to `server.report_url`.
    pub fn reporter(
        &self,
        alerts: Arc<dyn AlertSink>,
    ) -> Result<LocationReporter<HttpReportClient>, CliError> {
        let server = &self.config.server;
        let client = HttpReportClient::new(server.report_url.clone(), server.request_timeout())?;
        info!(url = %server.report_url, "Report endpoint");
        Ok(LocationReporter::new(client, alerts))
    }

    /// Push channel to `server.socket_url`.
    pub fn push_channel(&self) -> WebSocketChannel {
        info!(url = %self.config.server.socket_url, "Push endpoint");
        WebSocketChannel::new(self.config.server.socket_url.clone())
    }
}

/// Split a log file path into the directory and file name logging expects.
fn split_log_path(path: &Path) -> (String, String) {
    let log_dir = path
        .parent()
        .map(|p| p.to_string_lossy().to_string())
        .filter(|p| !p.is_empty())
        .unwrap_or_else(|| ".".to_string());
    let log_file = path
        .file_name()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| default_log_file().to_string());
    (log_dir, log_file)
}
