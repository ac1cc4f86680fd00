//! Weather advisories for AgriFeed
//!
//! Fetches current conditions from an OpenWeatherMap-compatible API and
//! turns each reading into exactly one farming advisory. Crop questions are
//! answered from local crop data.

pub mod advisor;
pub mod advisory;
pub mod crops;
pub mod provider;
pub mod types;

pub use advisor::WeatherAdvisor;
pub use advisory::{error_advisory, select_advisory};
pub use crops::{Crop, CropAnswer, CropBook, CropDataError, CropProfile};
pub use provider::{WeatherProvider, WeatherQuery};
pub use types::*;
