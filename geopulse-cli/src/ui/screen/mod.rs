//! Interactive location screen.
//!
//! Owns the terminal while `geopulse run` is active, renders
//! [`ScreenSnapshot`]s from the controller, and queues alerts for the modal.
//!
//! # Module Structure
//!
//! - `state` - Events, key mapping, alert queue (no rendering dependencies)
//! - `render` - Layout orchestration
//! - `utils` - Non-TUI output

mod render;
pub mod state;
pub mod utils;

use std::io::{self, Stdout};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use geopulse::alert::Alert;
use geopulse::screen::ScreenSnapshot;

use render::RenderContext;
pub use state::{
    key_to_event, AlertQueue, ScreenConfig, ScreenEvent, FLASH_DURATION, SPINNER_FRAMES,
};
pub use utils::print_simple_status;

/// The location screen UI.
pub struct LocationScreen {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    config: ScreenConfig,
    shutdown: Arc<AtomicBool>,
    alerts: AlertQueue,
    /// Spinner frame index while loading.
    spinner_frame: usize,
    /// Short message in the hint bar and when it was set.
    flash: Option<(String, Instant)>,
}

impl LocationScreen {
    /// Take over the terminal.
    pub fn new(config: ScreenConfig, shutdown: Arc<AtomicBool>) -> io::Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;

        Ok(Self {
            terminal,
            config,
            shutdown,
            alerts: AlertQueue::default(),
            spinner_frame: 0,
            flash: None,
        })
    }

    /// Restore terminal to normal state.
    pub fn restore(&mut self) -> io::Result<()> {
        disable_raw_mode()?;
        execute!(self.terminal.backend_mut(), LeaveAlternateScreen)?;
        self.terminal.show_cursor()?;
        Ok(())
    }

    /// Queue an alert behind any already showing.
    pub fn push_alert(&mut self, alert: Alert) {
        self.alerts.push(alert);
    }

    /// Close the alert modal, revealing the next one if queued.
    pub fn dismiss_alert(&mut self) {
        self.alerts.dismiss();
    }

    /// Show a short message in the hint bar.
    pub fn flash(&mut self, message: impl Into<String>) {
        self.flash = Some((message.into(), Instant::now()));
    }

    /// Draw the screen for the given snapshot.
    pub fn draw(&mut self, snapshot: &ScreenSnapshot) -> io::Result<()> {
        if snapshot.loading {
            self.spinner_frame = (self.spinner_frame + 1) % SPINNER_FRAMES.len();
        }
        if self
            .flash
            .as_ref()
            .is_some_and(|(_, at)| at.elapsed() > FLASH_DURATION)
        {
            self.flash = None;
        }

        let ctx = RenderContext {
            snapshot,
            config: &self.config,
            spinner: SPINNER_FRAMES[self.spinner_frame],
            alert: self.alerts.current(),
            alerts_behind: self.alerts.behind(),
            flash: self.flash.as_ref().map(|(message, _)| message.as_str()),
        };

        self.terminal.draw(|frame| render::render_screen(frame, &ctx))?;
        Ok(())
    }

    /// Check for events (non-blocking).
    pub fn poll_event(&mut self) -> io::Result<Option<ScreenEvent>> {
        // Check shutdown flag first (e.g., Ctrl+C signal)
        if self.shutdown.load(Ordering::SeqCst) {
            return Ok(Some(ScreenEvent::Quit));
        }

        if event::poll(Duration::from_millis(10))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    return Ok(key_to_event(key, !self.alerts.is_empty()));
                }
            }
        }

        Ok(None)
    }
}

impl Drop for LocationScreen {
    fn drop(&mut self) {
        let _ = self.restore();
    }
}
