//! Reverse geocoding: convert coordinates to a structured address.
//! Uses Nominatim (OpenStreetMap) - free, no API key required.

use agrifeed_core::http::fetch_json;
use reqwest::Client;
use serde::Deserialize;
use tracing::instrument;

use crate::types::{Coordinates, Location, LocationError, LocationSource};

#[derive(Debug, Deserialize)]
struct NominatimResponse {
    address: Option<NominatimAddress>,
}

#[derive(Debug, Deserialize)]
struct NominatimAddress {
    city: Option<String>,
    town: Option<String>,
    village: Option<String>,
    state_district: Option<String>,
    county: Option<String>,
    state: Option<String>,
    country: Option<String>,
}

/// Address fields extracted from a reverse geocode.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Address {
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub district: Option<String>,
}

impl Address {
    /// Address fields as a location patch. Missing fields become empty
    /// strings and a missing country becomes `default_country`.
    pub fn into_location(self, default_country: &str) -> Location {
        Location {
            city: Some(self.city.unwrap_or_default()),
            state: Some(self.state.unwrap_or_default()),
            country: Some(
                present(self.country).unwrap_or_else(|| default_country.to_string()),
            ),
            district: Some(self.district.unwrap_or_default()),
            coordinates: None,
            source: Some(LocationSource::ReverseGeocode),
        }
    }

    /// Patch used when the lookup failed: blank address, default country.
    pub fn unresolved(default_country: &str) -> Location {
        Location {
            source: None,
            ..Address::default().into_location(default_country)
        }
    }
}

impl From<NominatimAddress> for Address {
    fn from(addr: NominatimAddress) -> Self {
        Self {
            // Prefer city > town > village for the place name
            city: present(addr.city)
                .or_else(|| present(addr.town))
                .or_else(|| present(addr.village)),
            state: present(addr.state),
            country: present(addr.country),
            district: present(addr.state_district).or_else(|| present(addr.county)),
        }
    }
}

/// Nominatim sometimes sends empty strings; treat them as absent.
fn present(field: Option<String>) -> Option<String> {
    field.filter(|s| !s.is_empty())
}

#[derive(Debug, Clone)]
pub struct ReverseGeocoder {
    client: Client,
    base_url: String,
}

impl ReverseGeocoder {
    pub fn new(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Reverse geocode coordinates to an address.
    #[instrument(skip(self), level = "debug")]
    pub async fn reverse(&self, coordinates: Coordinates) -> Result<Address, LocationError> {
        let url = format!("{}/reverse", self.base_url);
        let request = self.client.get(&url).query(&[
            ("lat", coordinates.lat.to_string()),
            ("lon", coordinates.lon.to_string()),
            ("format", "json".to_string()),
            ("addressdetails", "1".to_string()),
        ]);

        let body: NominatimResponse = fetch_json(request).await?;
        let address = body
            .address
            .ok_or_else(|| LocationError::Incomplete("reverse geocode returned no address".into()))?;

        let address = Address::from(address);
        tracing::info!(
            "Reverse geocoded to: {}, {}",
            address.city.as_deref().unwrap_or("?"),
            address.state.as_deref().unwrap_or("?")
        );
        Ok(address)
    }
}
