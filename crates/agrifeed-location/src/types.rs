use agrifeed_core::{FallbackLocation, NetworkError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Geographic coordinates in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

/// Which stage of the fallback chain last wrote a location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocationSource {
    Device,
    ReverseGeocode,
    IpLookup,
    Fallback,
}

impl fmt::Display for LocationSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Device => write!(f, "device"),
            Self::ReverseGeocode => write!(f, "reverse geocode"),
            Self::IpLookup => write!(f, "IP lookup"),
            Self::Fallback => write!(f, "built-in default"),
        }
    }
}

/// Best-effort location of the viewer.
///
/// Every field is optional and stages fill them in as they succeed. An empty
/// string means a stage answered but had nothing for that field; `None`
/// means no stage has written it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub district: Option<String>,
    pub coordinates: Option<Coordinates>,
    pub source: Option<LocationSource>,
}

impl Location {
    /// The configured last-resort location.
    pub fn from_fallback(fallback: &FallbackLocation) -> Self {
        Self {
            city: Some(fallback.city.clone()),
            state: Some(fallback.state.clone()),
            country: Some(fallback.country.clone()),
            district: Some(String::new()),
            coordinates: Some(Coordinates {
                lat: fallback.latitude,
                lon: fallback.longitude,
            }),
            source: Some(LocationSource::Fallback),
        }
    }

    /// Shallow merge: every field `newer` carries replaces ours, the rest stay.
    pub fn merge(&mut self, newer: Location) {
        if newer.city.is_some() {
            self.city = newer.city;
        }
        if newer.state.is_some() {
            self.state = newer.state;
        }
        if newer.country.is_some() {
            self.country = newer.country;
        }
        if newer.district.is_some() {
            self.district = newer.district;
        }
        if newer.coordinates.is_some() {
            self.coordinates = newer.coordinates;
        }
        if newer.source.is_some() {
            self.source = newer.source;
        }
    }

    pub fn city_name(&self) -> Option<&str> {
        non_empty(&self.city)
    }

    pub fn state_name(&self) -> Option<&str> {
        non_empty(&self.state)
    }

    pub fn country_name(&self) -> Option<&str> {
        non_empty(&self.country)
    }

    pub fn district_name(&self) -> Option<&str> {
        non_empty(&self.district)
    }

    /// Text for the location indicator.
    pub fn badge_text(&self) -> String {
        match (self.city_name(), self.state_name()) {
            (Some(city), state) => format!("{}, {}", city, state.unwrap_or_default()),
            (None, Some(state)) => state.to_string(),
            (None, None) => "Location detected".to_string(),
        }
    }

    /// Most specific place name to scope searches with: city, else state,
    /// else country, else `default_country`.
    pub fn search_term(&self, default_country: &str) -> String {
        self.city_name()
            .or_else(|| self.state_name())
            .or_else(|| self.country_name())
            .unwrap_or(default_country)
            .to_string()
    }
}

fn non_empty(field: &Option<String>) -> Option<&str> {
    field.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// Location service errors
#[derive(Debug, thiserror::Error)]
pub enum LocationError {
    #[error("Location service unavailable")]
    ServiceUnavailable,
    #[error("Location request timed out")]
    Timeout,
    #[error("Location lookup failed: {0}")]
    Network(#[from] NetworkError),
    #[error("Location response incomplete: {0}")]
    Incomplete(String),
}
