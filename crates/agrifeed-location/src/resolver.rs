//! Location resolver: orchestrates the fallback chain.
//!
//! Device fix (+ reverse geocode) → IP geolocation → configured default.

use std::time::Duration;

use agrifeed_core::{Config, FallbackLocation};
use reqwest::Client;

use crate::chain::{first_success, Stage};
use crate::device::{locator_from_config, DeviceLocator};
use crate::geocode::{Address, ReverseGeocoder};
use crate::ip::IpLocator;
use crate::types::{Location, LocationError, LocationSource};

pub struct LocationResolver {
    device: Box<dyn DeviceLocator>,
    geocoder: ReverseGeocoder,
    ip: IpLocator,
    geolocation_timeout: Duration,
    default_country: String,
    fallback: FallbackLocation,
}

impl LocationResolver {
    /// Build a resolver from configuration, sharing `client` for all lookups.
    pub fn new(config: &Config, client: Client) -> Self {
        Self {
            device: locator_from_config(&config.location),
            geocoder: ReverseGeocoder::new(client.clone(), &config.services.geocode_url),
            ip: IpLocator::new(client, &config.services.ip_location_url),
            geolocation_timeout: Duration::from_secs(config.location.geolocation_timeout_secs),
            default_country: config.location.default_country.clone(),
            fallback: config.location.fallback.clone(),
        }
    }

    /// Replace the device locator.
    pub fn with_device(mut self, device: Box<dyn DeviceLocator>) -> Self {
        self.device = device;
        self
    }

    /// Resolve the current location. Never fails: when every stage fails the
    /// configured fallback location is returned.
    pub async fn resolve(&self) -> Location {
        let stages: Vec<Stage<'_, Location, LocationError>> = vec![
            Stage::new("device", || self.device_stage()),
            Stage::new("ip", || self.ip_stage()),
        ];

        match first_success(stages).await {
            Ok(location) => {
                tracing::info!(
                    "Resolved location '{}' via {}",
                    location.badge_text(),
                    location
                        .source
                        .map(|s| s.to_string())
                        .unwrap_or_else(|| "unknown".to_string())
                );
                location
            }
            Err(failures) => {
                for failure in &failures {
                    tracing::warn!("Location stage failed: {}", failure);
                }
                tracing::warn!("Using fallback location {}", self.fallback.city);
                Location::from_fallback(&self.fallback)
            }
        }
    }

    /// Device fix, then reverse geocode. A geocode failure keeps the
    /// coordinates and blanks the address.
    async fn device_stage(&self) -> Result<Location, LocationError> {
        let coordinates = tokio::time::timeout(self.geolocation_timeout, self.device.locate())
            .await
            .map_err(|_| LocationError::Timeout)??;

        tracing::debug!(
            "Device '{}' reported {}, {}",
            self.device.name(),
            coordinates.lat,
            coordinates.lon
        );

        let mut location = Location {
            coordinates: Some(coordinates),
            source: Some(LocationSource::Device),
            ..Location::default()
        };

        let details = match self.geocoder.reverse(coordinates).await {
            Ok(address) => address.into_location(&self.default_country),
            Err(e) => {
                tracing::warn!("Reverse geocoding failed: {}", e);
                Address::unresolved(&self.default_country)
            }
        };
        location.merge(details);

        Ok(location)
    }

    async fn ip_stage(&self) -> Result<Location, LocationError> {
        self.ip.lookup(&self.default_country).await
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]
    use super::*;
    use crate::device::{FixedLocator, UnavailableLocator};
    use crate::types::Coordinates;
    use async_trait::async_trait;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    /// A locator that never answers.
    struct HangingLocator;

    #[async_trait]
    impl DeviceLocator for HangingLocator {
        fn name(&self) -> &str {
            "hanging"
        }

        async fn locate(&self) -> Result<Coordinates, LocationError> {
            std::future::pending().await
        }
    }

    fn config_for(server: &MockServer) -> Config {
        let mut config = Config::default();
        config.services.geocode_url = server.uri();
        config.services.ip_location_url = server.uri();
        config
    }

    async fn mount_ip_failure(server: &MockServer) {
        Mock::given(method("GET"))
            .and(path("/json/"))
            .respond_with(ResponseTemplate::new(500))
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_device_and_geocode_success() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/reverse"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "address": {"town": "Baramati", "state": "Maharashtra", "country": "India"}
            })))
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .and(path("/json/"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&mock_server)
            .await;

        let coords = Coordinates { lat: 18.15, lon: 74.58 };
        let resolver = LocationResolver::new(&config_for(&mock_server), Client::new())
            .with_device(Box::new(FixedLocator::new(coords)));

        let loc = resolver.resolve().await;
        assert_eq!(loc.city_name(), Some("Baramati"));
        assert_eq!(loc.coordinates, Some(coords));
        assert_eq!(loc.source, Some(LocationSource::ReverseGeocode));
    }

    #[tokio::test]
    async fn test_geocode_failure_keeps_coordinates() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/reverse"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&mock_server)
            .await;

        let coords = Coordinates { lat: 18.15, lon: 74.58 };
        let resolver = LocationResolver::new(&config_for(&mock_server), Client::new())
            .with_device(Box::new(FixedLocator::new(coords)));

        let loc = resolver.resolve().await;
        assert_eq!(loc.coordinates, Some(coords));
        assert_eq!(loc.city.as_deref(), Some(""));
        assert_eq!(loc.country.as_deref(), Some("India"));
        assert_eq!(loc.source, Some(LocationSource::Device));
    }

    #[tokio::test]
    async fn test_configured_default_country_on_geocode_failure() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/reverse"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&mock_server)
            .await;

        let mut config = config_for(&mock_server);
        config.location.default_country = "Ghana".to_string();
        let resolver = LocationResolver::new(&config, Client::new())
            .with_device(Box::new(FixedLocator::new(Coordinates { lat: 5.6, lon: -0.19 })));

        assert_eq!(resolver.resolve().await.country_name(), Some("Ghana"));
    }

    #[tokio::test]
    async fn test_device_unavailable_uses_ip() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/json/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "city": "Indore",
                "region": "Madhya Pradesh",
                "country_name": "India",
                "latitude": 22.7196,
                "longitude": 75.8577
            })))
            .mount(&mock_server)
            .await;

        let resolver = LocationResolver::new(&config_for(&mock_server), Client::new())
            .with_device(Box::new(UnavailableLocator));

        let loc = resolver.resolve().await;
        assert_eq!(loc.city_name(), Some("Indore"));
        assert_eq!(loc.source, Some(LocationSource::IpLookup));
    }

    #[tokio::test]
    async fn test_everything_fails_returns_default() {
        let mock_server = MockServer::start().await;
        mount_ip_failure(&mock_server).await;

        let resolver = LocationResolver::new(&config_for(&mock_server), Client::new())
            .with_device(Box::new(UnavailableLocator));

        let loc = resolver.resolve().await;
        assert_eq!(loc, Location::from_fallback(&FallbackLocation::default()));
        assert_eq!(loc.city_name(), Some("Mumbai"));
        assert_eq!(loc.country_name(), Some("India"));
    }

    #[tokio::test]
    async fn test_device_timeout_falls_through() {
        let mock_server = MockServer::start().await;
        mount_ip_failure(&mock_server).await;

        let mut config = config_for(&mock_server);
        config.location.geolocation_timeout_secs = 0;
        let resolver =
            LocationResolver::new(&config, Client::new()).with_device(Box::new(HangingLocator));

        let loc = resolver.resolve().await;
        assert_eq!(loc.source, Some(LocationSource::Fallback));
    }
}
