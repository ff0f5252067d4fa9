//! Non-TUI output.

use geopulse::screen::{OperationalStatus, ScreenSnapshot};

/// One status line for non-interactive terminals.
pub fn format_simple_status(snapshot: &ScreenSnapshot) -> String {
    let status = match snapshot.status() {
        OperationalStatus::Loading => format!("locating (attempt {})", snapshot.retry_count + 1),
        OperationalStatus::Errored => match &snapshot.error {
            Some(error) => format!("error: {}", error.message),
            None => "error".to_string(),
        },
        OperationalStatus::Ready => "ready".to_string(),
    };

    let position = match &snapshot.position {
        Some(position) => position.to_string(),
        None => "none".to_string(),
    };

    format!(
        "[{}] Position: {} | Push: {} | Reports sent: {}",
        status, position, snapshot.push, snapshot.reports_sent
    )
}

/// Simple non-TUI fallback for non-interactive terminals.
pub fn print_simple_status(snapshot: &ScreenSnapshot) {
    println!("{}", format_simple_status(snapshot));
}
