//! IP-based geolocation via ipapi.co.

use agrifeed_core::http::fetch_json;
use reqwest::Client;
use serde::Deserialize;
use tracing::instrument;

use crate::types::{Coordinates, Location, LocationError, LocationSource};

#[derive(Debug, Deserialize)]
struct IpApiResponse {
    city: Option<String>,
    region: Option<String>,
    country_name: Option<String>,
    latitude: Option<f64>,
    longitude: Option<f64>,
    /// Set by ipapi.co on quota or lookup failures, alongside a `reason`
    #[serde(default)]
    error: bool,
    reason: Option<String>,
}

#[derive(Debug, Clone)]
pub struct IpLocator {
    client: Client,
    base_url: String,
}

impl IpLocator {
    pub fn new(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Look up the caller's location from its public IP.
    ///
    /// Missing city/region become empty strings and a missing country becomes
    /// `default_country`. A response without coordinates is a failure.
    #[instrument(skip(self), level = "debug")]
    pub async fn lookup(&self, default_country: &str) -> Result<Location, LocationError> {
        let url = format!("{}/json/", self.base_url);
        let body: IpApiResponse = fetch_json(self.client.get(&url)).await?;

        if body.error {
            return Err(LocationError::Incomplete(
                body.reason.unwrap_or_else(|| "IP lookup refused".to_string()),
            ));
        }

        let (lat, lon) = match (body.latitude, body.longitude) {
            (Some(lat), Some(lon)) => (lat, lon),
            _ => {
                return Err(LocationError::Incomplete(
                    "IP lookup returned no coordinates".into(),
                ))
            }
        };

        tracing::info!(
            "IP geolocated to: {}, {}",
            body.city.as_deref().unwrap_or("?"),
            body.region.as_deref().unwrap_or("?")
        );

        Ok(Location {
            city: Some(body.city.unwrap_or_default()),
            state: Some(body.region.unwrap_or_default()),
            country: Some(
                body.country_name
                    .filter(|c| !c.is_empty())
                    .unwrap_or_else(|| default_country.to_string()),
            ),
            district: Some(String::new()),
            coordinates: Some(Coordinates { lat, lon }),
            source: Some(LocationSource::IpLookup),
        })
    }
}
