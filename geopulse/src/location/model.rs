//! Position and fix request types.

use std::time::Duration;

use chrono::{DateTime, Utc};

/// A device-reported latitude/longitude pair with fix metadata.
///
/// A `Position` is always replaced as a whole; there is no way to update one
/// coordinate without the other.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    /// Latitude in degrees (-90 to 90).
    pub latitude: f64,

    /// Longitude in degrees (-180 to 180).
    pub longitude: f64,

    /// Horizontal accuracy in meters, when the source reports one.
    pub accuracy: Option<f32>,

    /// When the fix was taken.
    pub timestamp: DateTime<Utc>,
}

impl Position {
    /// Create a position taken now, with unknown accuracy.
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            accuracy: None,
            timestamp: Utc::now(),
        }
    }

    /// Set the horizontal accuracy in meters.
    pub fn with_accuracy(mut self, meters: f32) -> Self {
        self.accuracy = Some(meters);
        self
    }

    /// Set the fix timestamp.
    pub fn at(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Whether both coordinates are finite and in range.
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }

    /// Time since the fix was taken (zero for timestamps in the future).
    pub fn age(&self) -> Duration {
        Utc::now()
            .signed_duration_since(self.timestamp)
            .to_std()
            .unwrap_or(Duration::ZERO)
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.6}, {:.6}", self.latitude, self.longitude)?;
        if let Some(accuracy) = self.accuracy {
            write!(f, " (±{:.0}m)", accuracy)?;
        }
        Ok(())
    }
}

/// Parameters for a single position fix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixRequest {
    /// Require the most accurate fix the source can give (a 3D fix for gpsd).
    pub high_accuracy: bool,

    /// How long to wait before the fix counts as failed.
    pub timeout: Duration,
}

impl Default for FixRequest {
    fn default() -> Self {
        Self {
            high_accuracy: true,
            timeout: Duration::from_secs(15),
        }
    }
}
