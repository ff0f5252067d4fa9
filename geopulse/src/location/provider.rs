//! Location provider trait and the config-selected provider.
//!
//! A [`LocationProvider`] answers two questions: are location services
//! available at all, and where are we right now. Everything about retries,
//! permission and screen state lives in the acquisition flow, not here.

use std::future::Future;
use std::time::Duration;

use super::error::FixError;
use super::fixed::FixedProvider;
use super::gpsd::GpsdProvider;
use super::model::{FixRequest, Position};
use crate::config::{LocationSettings, LocationSourceKind};

/// Source of position fixes.
pub trait LocationProvider: Send + Sync {
    /// Whether location services are enabled.
    fn services_enabled(&self) -> impl Future<Output = bool> + Send;

    /// Produce a single fix.
    fn current_position(
        &self,
        request: &FixRequest,
    ) -> impl Future<Output = Result<Position, FixError>> + Send;
}

/// Errors building a provider from configuration.
#[derive(Debug, thiserror::Error)]
pub enum ProviderConfigError {
    /// The static source needs both coordinates.
    #[error("location.source = static requires location.latitude and location.longitude")]
    MissingCoordinates,
}

/// Provider selected by `[location] source`.
#[derive(Debug, Clone)]
pub enum ConfiguredProvider {
    Gpsd(GpsdProvider),
    Fixed(FixedProvider),
}

impl ConfiguredProvider {
    /// Build the provider named in the settings.
    ///
    /// `connect_timeout` bounds how long the gpsd service check may take.
    pub fn from_settings(
        settings: &LocationSettings,
        connect_timeout: Duration,
    ) -> Result<Self, ProviderConfigError> {
        match settings.source {
            LocationSourceKind::Gpsd => Ok(Self::Gpsd(
                GpsdProvider::new(settings.gpsd_address.clone())
                    .with_connect_timeout(connect_timeout),
            )),
            LocationSourceKind::Static => match (settings.latitude, settings.longitude) {
                (Some(latitude), Some(longitude)) => {
                    Ok(Self::Fixed(FixedProvider::new(latitude, longitude)))
                }
                _ => Err(ProviderConfigError::MissingCoordinates),
            },
        }
    }

    /// Short description for logs and the screen.
    pub fn describe(&self) -> String {
        match self {
            Self::Gpsd(p) => format!("gpsd at {}", p.address()),
            Self::Fixed(p) => format!("static {:.4}, {:.4}", p.latitude(), p.longitude()),
        }
    }
}

impl LocationProvider for ConfiguredProvider {
    async fn services_enabled(&self) -> bool {
        match self {
            Self::Gpsd(p) => p.services_enabled().await,
            Self::Fixed(p) => p.services_enabled().await,
        }
    }

    async fn current_position(&self, request: &FixRequest) -> Result<Position, FixError> {
        match self {
            Self::Gpsd(p) => p.current_position(request).await,
            Self::Fixed(p) => p.current_position(request).await,
        }
    }
}
