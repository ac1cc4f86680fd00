//! Device position sources.
//!
//! A locator is asked for a fresh, high-accuracy fix; it must not hand back
//! a cached position. The resolver bounds every call with the configured
//! geolocation timeout.

use agrifeed_core::LocationConfig;
use async_trait::async_trait;

use crate::types::{Coordinates, LocationError};

#[async_trait]
pub trait DeviceLocator: Send + Sync {
    /// Human-readable name for logs
    fn name(&self) -> &str;

    /// Obtain the current position.
    async fn locate(&self) -> Result<Coordinates, LocationError>;
}

/// A position known ahead of time, e.g. a surveyed farm plot.
#[derive(Debug, Clone)]
pub struct FixedLocator {
    coordinates: Coordinates,
}

impl FixedLocator {
    pub fn new(coordinates: Coordinates) -> Self {
        Self { coordinates }
    }
}

#[async_trait]
impl DeviceLocator for FixedLocator {
    fn name(&self) -> &str {
        "fixed"
    }

    async fn locate(&self) -> Result<Coordinates, LocationError> {
        Ok(self.coordinates)
    }
}

/// No positioning service on this machine.
#[derive(Debug, Clone, Default)]
pub struct UnavailableLocator;

#[async_trait]
impl DeviceLocator for UnavailableLocator {
    fn name(&self) -> &str {
        "unavailable"
    }

    async fn locate(&self) -> Result<Coordinates, LocationError> {
        Err(LocationError::ServiceUnavailable)
    }
}

/// Pick a locator from configuration.
pub fn locator_from_config(config: &LocationConfig) -> Box<dyn DeviceLocator> {
    match config.device {
        Some(device) => Box::new(FixedLocator::new(Coordinates {
            lat: device.latitude,
            lon: device.longitude,
        })),
        None => Box::new(UnavailableLocator),
    }
}
