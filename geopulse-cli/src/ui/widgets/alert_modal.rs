//! Modal for the oldest pending alert.
//!
//! ```text
//!        ┌─ Error ─────────────────────────────┐
//!        │                                     │
//!        │  Failed to send location            │
//!        │                                     │
//!        │  [Enter] OK            (+1 pending) │
//!        └─────────────────────────────────────┘
//! ```

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Widget, Wrap},
};

use geopulse::alert::{Alert, AlertKind};

const MODAL_WIDTH: u16 = 50;
const MODAL_HEIGHT: u16 = 8;

pub struct AlertModal<'a> {
    alert: &'a Alert,
    /// Alerts queued behind this one.
    behind: usize,
}

impl<'a> AlertModal<'a> {
    pub fn new(alert: &'a Alert, behind: usize) -> Self {
        Self { alert, behind }
    }

    fn border_color(kind: AlertKind) -> Color {
        match kind {
            AlertKind::SendSucceeded => Color::Green,
            AlertKind::MissingLocation => Color::Yellow,
            _ => Color::Red,
        }
    }
}

/// Rect of at most `width` x `height` centered in `area`.
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

impl Widget for AlertModal<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let rect = centered_rect(MODAL_WIDTH, MODAL_HEIGHT, area);
        let color = Self::border_color(self.alert.kind);

        let mut footer = vec![Span::styled(
            "[Enter] OK",
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        )];
        if self.behind > 0 {
            footer.push(Span::styled(
                format!("   (+{} pending)", self.behind),
                Style::default().fg(Color::DarkGray),
            ));
        }

        let text = vec![
            Line::default(),
            Line::from(self.alert.message.clone()),
            Line::default(),
            Line::from(footer),
        ];

        Clear.render(rect, buf);
        Paragraph::new(text)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(color))
                    .title(format!(" {} ", self.alert.title)),
            )
            .render(rect, buf);
    }
}
