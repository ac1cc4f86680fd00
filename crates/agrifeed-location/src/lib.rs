//! Location resolution for AgriFeed
//!
//! Produces a best-effort [`Location`] through a fallback chain:
//! device geolocation + reverse geocoding, then IP geolocation, then a
//! configured default.

pub mod chain;
pub mod device;
pub mod geocode;
pub mod ip;
pub mod resolver;
pub mod types;

pub use chain::{first_success, Stage, StageFailure};
pub use device::{locator_from_config, DeviceLocator, FixedLocator, UnavailableLocator};
pub use geocode::{Address, ReverseGeocoder};
pub use ip::IpLocator;
pub use resolver::LocationResolver;
pub use types::*;
