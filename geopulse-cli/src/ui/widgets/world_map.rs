//! World map with a marker at the stored position.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    symbols::Marker,
    text::Span,
    widgets::{
        canvas::{Canvas, Map, MapResolution, Points},
        Block, Borders, Widget,
    },
};

use geopulse::location::Position;

pub struct WorldMap {
    position: Option<Position>,
}

impl WorldMap {
    pub fn new(position: Option<Position>) -> Self {
        Self { position }
    }
}

impl Widget for WorldMap {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let position = self.position;

        Canvas::default()
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::DarkGray))
                    .title(" Map "),
            )
            .marker(Marker::Braille)
            .x_bounds([-180.0, 180.0])
            .y_bounds([-90.0, 90.0])
            .paint(move |ctx| {
                ctx.draw(&Map {
                    resolution: MapResolution::High,
                    color: Color::DarkGray,
                });
                ctx.layer();

                if let Some(position) = position {
                    ctx.draw(&Points {
                        coords: &[(position.longitude, position.latitude)],
                        color: Color::Red,
                    });
                    ctx.print(
                        position.longitude,
                        position.latitude,
                        Span::styled("  you are here", Style::default().fg(Color::Red)),
                    );
                }
            })
            .render(area, buf);
    }
}
