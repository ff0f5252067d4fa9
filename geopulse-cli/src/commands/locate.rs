//! One-shot acquisition.

use std::sync::Arc;

use geopulse::alert::{AlertSink, TracingAlertSink};
use geopulse::screen::SharedScreenState;

use super::common::print_position;
use crate::error::CliError;
use crate::prompt::CliPermission;
use crate::runner::{CliRunner, GlobalOptions};

/// Acquire the position once and print it.
pub fn run(options: &GlobalOptions) -> Result<(), CliError> {
    let runner = CliRunner::new(options)?;
    runner.log_startup("locate");

    let alerts: Arc<dyn AlertSink> = Arc::new(TracingAlertSink);
    let permission = CliPermission::interactive(runner.config().location.permission);
    let acquirer = runner.acquirer(permission, alerts)?;

    println!(
        "Acquiring location (up to {} attempts)...",
        runner.config().acquisition.max_attempts
    );

    let state = SharedScreenState::new();
    let position = runner.runtime().block_on(acquirer.acquire(&state))?;

    print_position(&position);
    Ok(())
}
