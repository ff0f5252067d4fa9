//! Fixed-coordinate location provider.

use super::error::FixError;
use super::model::{FixRequest, Position};
use super::provider::LocationProvider;

/// Reports the same coordinate on every fix.
///
/// Useful on machines without a GPS receiver; services are always enabled.
#[derive(Debug, Clone, Copy)]
pub struct FixedProvider {
    latitude: f64,
    longitude: f64,
}

impl FixedProvider {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }
}

impl LocationProvider for FixedProvider {
    async fn services_enabled(&self) -> bool {
        true
    }

    async fn current_position(&self, _request: &FixRequest) -> Result<Position, FixError> {
        let position = Position::new(self.latitude, self.longitude);
        if !position.is_valid() {
            return Err(FixError::Protocol(format!(
                "configured coordinate {} is out of range",
                position
            )));
        }
        Ok(position)
    }
}
