//! One-shot report.
//!
//! Reports the coordinates given on the command line, or acquires a fresh
//! position first when none are given.

use std::sync::Arc;

use console::style;

use geopulse::alert::{AlertSink, TracingAlertSink};
use geopulse::screen::SharedScreenState;

use super::common::position_from_args;
use crate::error::CliError;
use crate::prompt::CliPermission;
use crate::runner::{CliRunner, GlobalOptions};

/// Arguments for the send command.
#[derive(Debug, Clone, Copy, Default)]
pub struct SendArgs {
    pub lat: Option<f64>,
    pub long: Option<f64>,
}

/// Report a position once.
pub fn run(options: &GlobalOptions, args: SendArgs) -> Result<(), CliError> {
    let given = match (args.lat, args.long) {
        (Some(lat), Some(long)) => Some(position_from_args(lat, long).ok_or_else(|| {
            CliError::InvalidArgument(format!("coordinates {}, {} are out of range", lat, long))
        })?),
        _ => None,
    };

    let runner = CliRunner::new(options)?;
    runner.log_startup("send");

    let alerts: Arc<dyn AlertSink> = Arc::new(TracingAlertSink);
    let reporter = runner.reporter(Arc::clone(&alerts))?;

    let position = match given {
        Some(position) => position,
        None => {
            let permission = CliPermission::interactive(runner.config().location.permission);
            let acquirer = runner.acquirer(permission, alerts)?;
            println!("Acquiring location...");
            runner
                .runtime()
                .block_on(acquirer.acquire(&SharedScreenState::new()))?
        }
    };

    println!("Sending {} to {}", position, reporter.client().url());
    runner.runtime().block_on(reporter.report(Some(position)))?;
    println!("{} Location sent successfully", style("✓").green());

    Ok(())
}
