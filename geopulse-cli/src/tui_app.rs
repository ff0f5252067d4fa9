//! TUI application loop for the location screen.
//!
//! # Architecture
//!
//! - `run_tui()` - Interactive screen with key handling and the alert modal
//! - `run_headless()` - Plain status lines for non-TTY environments
//! - `TuiAppConfig` - Everything `run_tui()` needs from the run command
//!
//! Both loops are synchronous; the controller's tasks run on the runtime the
//! caller entered.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::mpsc;

use geopulse::alert::Alert;
use geopulse::config::ConfigFile;
use geopulse::location::{LocationProvider, PermissionPrompt};
use geopulse::report::ReportClient;
use geopulse::screen::ScreenController;

use crate::error::CliError;
use crate::ui::{self, LocationScreen, ScreenConfig, ScreenEvent};

/// Redraw interval.
const TICK_RATE: Duration = Duration::from_millis(100);

/// Configuration for starting the TUI application.
pub struct TuiAppConfig<'a, P, Q, C> {
    /// Mounted controller.
    pub controller: &'a ScreenController<P, Q, C>,
    /// Alerts raised by the controller's tasks.
    pub alerts: mpsc::UnboundedReceiver<Alert>,
    /// Shutdown signal from signal handler.
    pub shutdown: Arc<AtomicBool>,
    /// Configuration file.
    pub config: &'a ConfigFile,
    /// Location source description.
    pub source: String,
}

/// Run the interactive location screen until the user quits.
pub fn run_tui<P, Q, C>(config: TuiAppConfig<'_, P, Q, C>) -> Result<(), CliError>
where
    P: LocationProvider + 'static,
    Q: PermissionPrompt + 'static,
    C: ReportClient + 'static,
{
    let TuiAppConfig {
        controller,
        mut alerts,
        shutdown,
        config: cfg,
        source,
    } = config;

    let screen_config = ScreenConfig {
        source,
        socket_url: cfg.server.socket_url.clone(),
        report_url: cfg.server.report_url.clone(),
        max_attempts: cfg.acquisition.max_attempts,
    };

    let mut screen = LocationScreen::new(screen_config, shutdown).map_err(CliError::Screen)?;
    screen
        .draw(&controller.snapshot())
        .map_err(CliError::Screen)?;

    let mut last_draw = Instant::now();

    loop {
        match screen.poll_event().map_err(CliError::Screen)? {
            Some(ScreenEvent::Quit) => {
                tracing::info!("Quit requested");
                break;
            }
            Some(ScreenEvent::Refresh) => {
                if controller.refresh().is_none() {
                    screen.flash("Already locating");
                }
            }
            Some(ScreenEvent::Send) => {
                drop(controller.send_location());
            }
            Some(ScreenEvent::Dismiss) => screen.dismiss_alert(),
            None => {}
        }

        while let Ok(alert) = alerts.try_recv() {
            screen.push_alert(alert);
        }

        if last_draw.elapsed() >= TICK_RATE {
            screen
                .draw(&controller.snapshot())
                .map_err(CliError::Screen)?;
            last_draw = Instant::now();
        }
    }

    Ok(())
}

/// Run in headless mode (non-TTY environments).
///
/// Prints a status line whenever the state changes and every alert as it
/// arrives, until the shutdown signal is received.
pub fn run_headless<P, Q, C>(
    controller: &ScreenController<P, Q, C>,
    mut alerts: mpsc::UnboundedReceiver<Alert>,
    shutdown: Arc<AtomicBool>,
) -> Result<(), CliError>
where
    P: LocationProvider + 'static,
    Q: PermissionPrompt + 'static,
    C: ReportClient + 'static,
{
    println!("GeoPulse is running. Reports are sent when the server asks.");
    println!("Press Ctrl+C to stop.");
    println!();

    let mut last = controller.snapshot();
    ui::print_simple_status(&last);

    while !shutdown.load(Ordering::SeqCst) {
        std::thread::sleep(TICK_RATE);

        while let Ok(alert) = alerts.try_recv() {
            println!("[{}] {}", alert.title, alert.message);
        }

        let snapshot = controller.snapshot();
        if snapshot != last {
            ui::print_simple_status(&snapshot);
            last = snapshot;
        }
    }

    Ok(())
}
