//! Location acquisition.
//!
//! # Components
//!
//! - [`model`] - `Position` and `FixRequest`
//! - [`provider`] - `LocationProvider` trait and the config-selected `ConfiguredProvider`
//! - [`gpsd`] - `GpsdProvider` talking to a gpsd daemon
//! - [`fixed`] - `FixedProvider` for a configured coordinate
//! - [`permission`] - `PermissionPrompt` and its canned answers
//! - [`acquisition`] - `LocationAcquirer`: services check, permission, fix with fixed-delay retries

mod acquisition;
mod error;
mod fixed;
mod gpsd;
mod model;
mod permission;
mod provider;

pub use acquisition::{LocationAcquirer, RetryPolicy};
pub use error::{AcquisitionError, FixError};
pub use fixed::FixedProvider;
pub use gpsd::GpsdProvider;
pub use model::{FixRequest, Position};
pub use permission::{
    AutoGrant, PermissionPrompt, PermissionRequest, PermissionResponse, StoredDecision,
};
pub use provider::{ConfiguredProvider, LocationProvider, ProviderConfigError};
