//! Shared output helpers for one-shot commands.

use console::style;

use geopulse::location::Position;

/// Print a position block.
pub fn print_position(position: &Position) {
    println!("{}", style("Position").bold());
    println!("  Latitude:  {:.6}", position.latitude);
    println!("  Longitude: {:.6}", position.longitude);
    match position.accuracy {
        Some(meters) => println!("  Accuracy:  ±{:.0}m", meters),
        None => println!("  Accuracy:  unknown"),
    }
    println!("  Time:      {}", position.timestamp.to_rfc3339());
}

/// Position from command-line coordinates, if they are in range.
pub fn position_from_args(lat: f64, long: f64) -> Option<Position> {
    let position = Position::new(lat, long);
    position.is_valid().then_some(position)
}
