//! Position widget.
//!
//! Layout:
//! ```text
//! ┌─ Position ───────────────────────────────────────────────┐
//! │ Position : 53.630278°N, 9.988333°E                       │
//! │ Accuracy : 5m | Age: 12s                                 │
//! │ Push     : * Connected | Reports sent: 3                 │
//! └──────────────────────────────────────────────────────────┘
//! ```

use std::time::Duration;

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use geopulse::screen::{PushStatus, ScreenSnapshot};

/// Widget displaying the stored position and channel state.
pub struct PositionWidget<'a> {
    snapshot: &'a ScreenSnapshot,
}

impl<'a> PositionWidget<'a> {
    /// Create a new position widget.
    pub fn new(snapshot: &'a ScreenSnapshot) -> Self {
        Self { snapshot }
    }

    /// Format latitude with direction suffix.
    pub fn format_lat(lat: f64) -> String {
        let dir = if lat >= 0.0 { "N" } else { "S" };
        format!("{:.6}°{}", lat.abs(), dir)
    }

    /// Format longitude with direction suffix.
    pub fn format_lon(lon: f64) -> String {
        let dir = if lon >= 0.0 { "E" } else { "W" };
        format!("{:.6}°{}", lon.abs(), dir)
    }

    /// Format accuracy value with appropriate unit.
    fn format_accuracy(meters: f32) -> String {
        if meters >= 1000.0 {
            format!("{:.1}km", meters / 1000.0)
        } else {
            format!("{:.0}m", meters)
        }
    }

    /// Get color based on horizontal accuracy.
    ///
    /// - Green: under 20m
    /// - Yellow: up to 100m
    /// - Red: worse than 100m
    fn accuracy_color(meters: f32) -> Color {
        if meters < 20.0 {
            Color::Green
        } else if meters <= 100.0 {
            Color::Yellow
        } else {
            Color::Red
        }
    }

    /// Format the age of a fix.
    fn format_age(age: Duration) -> String {
        let secs = age.as_secs();
        if secs >= 3600 {
            format!("{}h {:02}m", secs / 3600, (secs % 3600) / 60)
        } else if secs >= 60 {
            format!("{}m {:02}s", secs / 60, secs % 60)
        } else {
            format!("{}s", secs)
        }
    }

    fn push_indicator(status: PushStatus) -> (&'static str, Color) {
        match status {
            PushStatus::Open => ("*", Color::Green),
            PushStatus::Connecting => ("~", Color::Yellow),
            PushStatus::Failed => ("x", Color::Red),
            PushStatus::Idle | PushStatus::Closed => ("x", Color::DarkGray),
        }
    }

    fn build_position_line(&self) -> Line<'static> {
        match &self.snapshot.position {
            Some(position) => Line::from(vec![
                Span::styled("   Position : ", Style::default().fg(Color::DarkGray)),
                Span::styled(
                    format!(
                        "{}, {}",
                        Self::format_lat(position.latitude),
                        Self::format_lon(position.longitude)
                    ),
                    Style::default().fg(Color::White),
                ),
            ]),
            None => Line::from(vec![
                Span::styled("   Position : ", Style::default().fg(Color::DarkGray)),
                Span::styled("NO LOCATION YET", Style::default().fg(Color::DarkGray)),
            ]),
        }
    }

    fn build_accuracy_line(&self) -> Line<'static> {
        let Some(position) = &self.snapshot.position else {
            return Line::from(vec![
                Span::styled("   Accuracy : ", Style::default().fg(Color::DarkGray)),
                Span::styled("-", Style::default().fg(Color::DarkGray)),
            ]);
        };

        let accuracy = match position.accuracy {
            Some(meters) => Span::styled(
                Self::format_accuracy(meters),
                Style::default().fg(Self::accuracy_color(meters)),
            ),
            None => Span::styled("unknown", Style::default().fg(Color::DarkGray)),
        };

        Line::from(vec![
            Span::styled("   Accuracy : ", Style::default().fg(Color::DarkGray)),
            accuracy,
            Span::styled(" | Age: ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                Self::format_age(position.age()),
                Style::default().fg(Color::White),
            ),
        ])
    }

    fn build_channel_line(&self) -> Line<'static> {
        let (indicator, color) = Self::push_indicator(self.snapshot.push);

        Line::from(vec![
            Span::styled("   Push     : ", Style::default().fg(Color::DarkGray)),
            Span::styled(format!("{} ", indicator), Style::default().fg(color)),
            Span::styled(self.snapshot.push.to_string(), Style::default().fg(color)),
            Span::styled(" | Reports sent: ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                self.snapshot.reports_sent.to_string(),
                Style::default().fg(Color::White),
            ),
        ])
    }
}

impl Widget for PositionWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let text = vec![
            self.build_position_line(),
            self.build_accuracy_line(),
            self.build_channel_line(),
        ];
        Paragraph::new(text).render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geopulse::location::Position;

    fn snapshot(position: Option<Position>) -> ScreenSnapshot {
        ScreenSnapshot {
            position,
            loading: false,
            error: None,
            retry_count: 0,
            push: PushStatus::Open,
            reports_sent: 3,
        }
    }

    fn line_text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn test_format_lat() {
        assert_eq!(PositionWidget::format_lat(53.630278), "53.630278°N");
        assert_eq!(PositionWidget::format_lat(-33.8688), "33.868800°S");
        assert_eq!(PositionWidget::format_lat(0.0), "0.000000°N");
    }

    #[test]
    fn test_format_lon() {
        assert_eq!(PositionWidget::format_lon(9.988333), "9.988333°E");
        assert_eq!(PositionWidget::format_lon(-122.5), "122.500000°W");
    }

    #[test]
    fn test_format_accuracy() {
        assert_eq!(PositionWidget::format_accuracy(4.6), "5m");
        assert_eq!(PositionWidget::format_accuracy(1500.0), "1.5km");
    }

    #[test]
    fn test_accuracy_color() {
        assert_eq!(PositionWidget::accuracy_color(5.0), Color::Green);
        assert_eq!(PositionWidget::accuracy_color(50.0), Color::Yellow);
        assert_eq!(PositionWidget::accuracy_color(500.0), Color::Red);
    }

    #[test]
    fn test_format_age() {
        assert_eq!(PositionWidget::format_age(Duration::from_secs(12)), "12s");
        assert_eq!(PositionWidget::format_age(Duration::from_secs(184)), "3m 04s");
        assert_eq!(PositionWidget::format_age(Duration::from_secs(7500)), "2h 05m");
    }

    #[test]
    fn test_lines_without_position() {
        let snapshot = snapshot(None);
        let widget = PositionWidget::new(&snapshot);

        assert!(line_text(&widget.build_position_line()).contains("NO LOCATION YET"));
        assert!(line_text(&widget.build_accuracy_line()).ends_with('-'));
    }

    #[test]
    fn test_lines_with_position() {
        let snapshot = snapshot(Some(Position::new(48.8566, 2.3522).with_accuracy(8.0)));
        let widget = PositionWidget::new(&snapshot);

        assert_eq!(
            line_text(&widget.build_position_line()),
            "   Position : 48.856600°N, 2.352200°E"
        );
        assert!(line_text(&widget.build_accuracy_line()).contains("8m"));
        assert_eq!(
            line_text(&widget.build_channel_line()),
            "   Push     : * Connected | Reports sent: 3"
        );
    }
}
