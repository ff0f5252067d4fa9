//! Status banner widget.
//!
//! One line reflecting the operational status: a spinner while an
//! acquisition runs, the last error in yellow or red, or a ready message.

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use geopulse::screen::{OperationalStatus, ScreenSnapshot, Severity};

/// Widget displaying the operational status.
pub struct StatusBanner<'a> {
    snapshot: &'a ScreenSnapshot,
    spinner: char,
    max_attempts: u32,
}

impl<'a> StatusBanner<'a> {
    pub fn new(snapshot: &'a ScreenSnapshot, spinner: char, max_attempts: u32) -> Self {
        Self {
            snapshot,
            spinner,
            max_attempts,
        }
    }

    fn severity_style(severity: Severity) -> (char, Color) {
        match severity {
            Severity::Warning => ('⚠', Color::Yellow),
            Severity::Error => ('✗', Color::Red),
        }
    }

    fn build_line(&self) -> Line<'static> {
        match self.snapshot.status() {
            OperationalStatus::Loading => {
                let attempt = (self.snapshot.retry_count + 1).min(self.max_attempts.max(1));
                Line::from(vec![
                    Span::styled(
                        format!("{} Locating", self.spinner),
                        Style::default().fg(Color::Cyan),
                    ),
                    Span::styled(
                        format!(" (attempt {} of {})", attempt, self.max_attempts),
                        Style::default().fg(Color::DarkGray),
                    ),
                ])
            }
            OperationalStatus::Errored => {
                let Some(error) = &self.snapshot.error else {
                    return Line::default();
                };
                let (icon, color) = Self::severity_style(error.severity);
                Line::from(Span::styled(
                    format!("{} {}", icon, error.message),
                    Style::default().fg(color).add_modifier(Modifier::BOLD),
                ))
            }
            OperationalStatus::Ready if self.snapshot.position.is_some() => {
                Line::from(Span::styled(
                    "● Location ready",
                    Style::default().fg(Color::Green),
                ))
            }
            OperationalStatus::Ready => Line::from(Span::styled(
                "No location yet. Press r to locate.",
                Style::default().fg(Color::DarkGray),
            )),
        }
    }
}

impl Widget for StatusBanner<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Paragraph::new(self.build_line())
            .alignment(Alignment::Center)
            .render(area, buf);
    }
}
