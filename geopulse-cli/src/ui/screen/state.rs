//! State types for the location screen.
//!
//! Independent of the terminal so key handling and the alert queue can be
//! tested in isolation.

use std::collections::VecDeque;
use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use geopulse::alert::Alert;

/// Spinner animation frames.
pub const SPINNER_FRAMES: [char; 10] = ['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];

/// How long a flash message stays in the hint bar.
pub const FLASH_DURATION: Duration = Duration::from_secs(2);

/// Static information shown in the header.
#[derive(Debug, Clone)]
pub struct ScreenConfig {
    /// Location source description.
    pub source: String,
    pub socket_url: String,
    pub report_url: String,
    /// Attempts per acquisition.
    pub max_attempts: u32,
}

/// Events produced by the screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenEvent {
    /// User requested quit (Ctrl+C, 'q' or Esc).
    Quit,
    /// Re-run acquisition.
    Refresh,
    /// Report the stored position.
    Send,
    /// Dismiss the alert modal.
    Dismiss,
}

/// Map a key press to a screen event.
///
/// While a modal is open only dismissal and Ctrl+C get through.
pub fn key_to_event(key: KeyEvent, modal_open: bool) -> Option<ScreenEvent> {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(ScreenEvent::Quit);
    }

    if modal_open {
        return match key.code {
            KeyCode::Enter | KeyCode::Esc => Some(ScreenEvent::Dismiss),
            _ => None,
        };
    }

    match key.code {
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => Some(ScreenEvent::Quit),
        KeyCode::Char('r') | KeyCode::Char('R') => Some(ScreenEvent::Refresh),
        KeyCode::Char('s') | KeyCode::Char('S') => Some(ScreenEvent::Send),
        _ => None,
    }
}

/// Pending alerts, oldest first. The front one is on screen.
#[derive(Debug, Default)]
pub struct AlertQueue {
    pending: VecDeque<Alert>,
}

impl AlertQueue {
    pub fn push(&mut self, alert: Alert) {
        self.pending.push_back(alert);
    }

    /// Alert currently shown.
    pub fn current(&self) -> Option<&Alert> {
        self.pending.front()
    }

    /// Drop the shown alert, revealing the next.
    pub fn dismiss(&mut self) -> Option<Alert> {
        self.pending.pop_front()
    }

    /// Alerts waiting behind the shown one.
    pub fn behind(&self) -> usize {
        self.pending.len().saturating_sub(1)
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
