//! Location screen widgets.
//!
//! - `StatusBanner` - Operational status (spinner, warning, error, ready)
//! - `WorldMap` - Map canvas with a marker at the position
//! - `PositionWidget` - Coordinates, accuracy, age, push channel
//! - `AlertModal` - Oldest pending alert

mod alert_modal;
mod position;
mod status;
mod world_map;

pub use alert_modal::AlertModal;
pub use position::PositionWidget;
pub use status::StatusBanner;
pub use world_map::WorldMap;
