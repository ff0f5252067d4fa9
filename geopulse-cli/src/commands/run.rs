//! Run command - the location screen.
//!
//! Mounts a [`ScreenController`]: the first acquisition starts immediately
//! and the push channel stays open until the user quits. Every message from
//! the server reports the stored position.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use geopulse::alert::{AlertSink, ChannelAlertSink};
use geopulse::screen::ScreenController;

use crate::error::CliError;
use crate::prompt::CliPermission;
use crate::runner::{CliRunner, GlobalOptions};
use crate::tui_app::{self, TuiAppConfig};

/// Run the location screen until quit or Ctrl+C.
pub fn run(options: &GlobalOptions) -> Result<(), CliError> {
    let runner = CliRunner::new(options)?;
    runner.log_startup("run");

    let use_tui = atty::is(atty::Stream::Stdout);

    // The screen owns the terminal once it starts, so ask before that.
    let permission = CliPermission::ask_upfront(runner.config().location.permission);

    let (sink, alert_rx) = ChannelAlertSink::new();
    let alerts: Arc<dyn AlertSink> = Arc::new(sink);
    let acquirer = runner.acquirer(permission, Arc::clone(&alerts))?;
    let reporter = runner.reporter(Arc::clone(&alerts))?;
    let source = acquirer.provider().describe();

    // Set up signal handler for graceful shutdown
    let shutdown = Arc::new(AtomicBool::new(false));
    let shutdown_clone = shutdown.clone();

    ctrlc::set_handler(move || {
        shutdown_clone.store(true, Ordering::SeqCst);
    })
    .map_err(|e| CliError::Config(format!("Failed to set signal handler: {}", e)))?;

    // Spawning tasks needs a runtime context on this thread.
    let _runtime = runner.runtime().enter();

    let mut controller = ScreenController::new(acquirer, reporter, alerts);
    // Progress is observed through the state snapshot.
    let _initial = controller.mount(runner.push_channel());

    let result = if use_tui {
        tui_app::run_tui(TuiAppConfig {
            controller: &controller,
            alerts: alert_rx,
            shutdown,
            config: runner.config(),
            source,
        })
    } else {
        tui_app::run_headless(&controller, alert_rx, shutdown)
    };

    tracing::info!("Shutting down");
    runner.runtime().block_on(controller.unmount());

    result
}
