//! Location screen rendering.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │ Header (3 lines)                                        │
//! ├─────────────────────────────────────────────────────────┤
//! │ Status banner (1 line)                                  │
//! ├─────────────────────────────────────────────────────────┤
//! │ World map (fills)                                       │
//! ├─────────────────────────────────────────────────────────┤
//! │ Position (5 lines)                                      │
//! ├─────────────────────────────────────────────────────────┤
//! │ Key hints (1 line)                                      │
//! └─────────────────────────────────────────────────────────┘
//! ```
//! The alert modal, when present, is drawn last over the whole frame.

use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use geopulse::alert::Alert;
use geopulse::screen::ScreenSnapshot;

use super::state::ScreenConfig;
use crate::ui::widgets::{AlertModal, PositionWidget, StatusBanner, WorldMap};

/// Everything one frame needs.
pub struct RenderContext<'a> {
    pub snapshot: &'a ScreenSnapshot,
    pub config: &'a ScreenConfig,
    pub spinner: char,
    pub alert: Option<&'a Alert>,
    pub alerts_behind: usize,
    pub flash: Option<&'a str>,
}

/// Render the location screen to the frame.
pub fn render_screen(frame: &mut Frame, ctx: &RenderContext) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Length(1), // Status
            Constraint::Min(8),    // Map
            Constraint::Length(5), // Position
            Constraint::Length(1), // Hints
        ])
        .split(frame.area());

    frame.render_widget(header(ctx.config), chunks[0]);
    frame.render_widget(
        StatusBanner::new(ctx.snapshot, ctx.spinner, ctx.config.max_attempts),
        chunks[1],
    );
    frame.render_widget(WorldMap::new(ctx.snapshot.position), chunks[2]);

    let position_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(" Position ");
    let position_area = position_block.inner(chunks[3]);
    frame.render_widget(position_block, chunks[3]);
    frame.render_widget(PositionWidget::new(ctx.snapshot), position_area);

    frame.render_widget(
        Paragraph::new(hint_line(ctx.snapshot.can_refresh(), ctx.flash)),
        chunks[4],
    );

    if let Some(alert) = ctx.alert {
        frame.render_widget(AlertModal::new(alert, ctx.alerts_behind), frame.area());
    }
}

fn header(config: &ScreenConfig) -> Paragraph<'static> {
    let title = Line::from(vec![
        Span::styled(
            "GeoPulse",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!(" v{}", geopulse::VERSION),
            Style::default().fg(Color::DarkGray),
        ),
        Span::styled("  │  Source: ", Style::default().fg(Color::DarkGray)),
        Span::styled(config.source.clone(), Style::default().fg(Color::White)),
    ]);
    let endpoints = Line::from(vec![
        Span::styled("Push: ", Style::default().fg(Color::DarkGray)),
        Span::styled(config.socket_url.clone(), Style::default().fg(Color::White)),
        Span::styled("  │  Report: ", Style::default().fg(Color::DarkGray)),
        Span::styled(config.report_url.clone(), Style::default().fg(Color::White)),
    ]);

    Paragraph::new(vec![title, endpoints]).block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(Style::default().fg(Color::DarkGray)),
    )
}

/// Key hints, greying out refresh while an acquisition runs.
fn hint_line(can_refresh: bool, flash: Option<&str>) -> Line<'static> {
    let key = Style::default().fg(Color::White).add_modifier(Modifier::BOLD);
    let label = Style::default().fg(Color::DarkGray);
    let refresh = if can_refresh {
        key
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let mut spans = vec![
        Span::styled(" [r]", refresh),
        Span::styled(" Refresh  ", label),
        Span::styled("[s]", key),
        Span::styled(" Send  ", label),
        Span::styled("[q]", key),
        Span::styled(" Quit", label),
    ];
    if let Some(message) = flash {
        spans.push(Span::styled(
            format!("   {}", message),
            Style::default().fg(Color::Yellow),
        ));
    }
    Line::from(spans)
}

#[cfg(test)]
mod tests {
    use super::*;
    use geopulse::location::Position;
    use geopulse::screen::PushStatus;
    use ratatui::{backend::TestBackend, Terminal};

    fn config() -> ScreenConfig {
        ScreenConfig {
            source: "gpsd at 127.0.0.1:2947".to_string(),
            socket_url: "wss://localhost:8080".to_string(),
            report_url: "https://localhost:8080/send-location".to_string(),
            max_attempts: 3,
        }
    }

    fn draw(ctx: &RenderContext) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 40)).unwrap();
        terminal.draw(|frame| render_screen(frame, ctx)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn test_screen_shows_position_and_endpoints() {
        let snapshot = ScreenSnapshot {
            position: Some(Position::new(53.630278, 9.988333).with_accuracy(5.0)),
            loading: false,
            error: None,
            retry_count: 0,
            push: PushStatus::Open,
            reports_sent: 1,
        };
        let config = config();

        let text = draw(&RenderContext {
            snapshot: &snapshot,
            config: &config,
            spinner: '⠋',
            alert: None,
            alerts_behind: 0,
            flash: None,
        });

        assert!(text.contains("53.630278°N, 9.988333°E"));
        assert!(text.contains("wss://localhost:8080"));
        assert!(text.contains("Location ready"));
        assert!(text.contains("Reports sent: 1"));
    }

    #[test]
    fn test_screen_draws_modal_and_flash() {
        let snapshot = ScreenSnapshot {
            position: None,
            loading: true,
            error: None,
            retry_count: 0,
            push: PushStatus::Connecting,
            reports_sent: 0,
        };
        let config = config();
        let alert = Alert::missing_location();

        let text = draw(&RenderContext {
            snapshot: &snapshot,
            config: &config,
            spinner: '⠋',
            alert: Some(&alert),
            alerts_behind: 0,
            flash: Some("Already locating"),
        });

        assert!(text.contains("No location available."));
        assert!(text.contains("Already locating"));
    }

    #[test]
    fn test_hint_line_greys_refresh_while_loading() {
        let line = hint_line(false, None);
        assert_eq!(line.spans[0].style.fg, Some(Color::DarkGray));

        let line = hint_line(true, None);
        assert_eq!(line.spans[0].style.fg, Some(Color::White));
    }
}
