//! Terminal UI for GeoPulse.
//!
//! Provides the interactive location screen: a world map with the current
//! fix, the status banner, push channel state, and the alert modal.

pub mod screen;
pub mod widgets;

pub use screen::{print_simple_status, LocationScreen, ScreenConfig, ScreenEvent};
