use agrifeed_core::Config;
use agrifeed_location::Location;
use chrono::Utc;
use reqwest::Client;

use crate::advisory::{error_advisory, select_advisory};
use crate::provider::{WeatherProvider, WeatherQuery};
use crate::types::AdvisoryReport;

/// Fetches conditions for a location and picks its advisory.
#[derive(Debug, Clone)]
pub struct WeatherAdvisor {
    provider: WeatherProvider,
    fallback_city: String,
}

impl WeatherAdvisor {
    pub fn new(config: &Config, client: Client) -> Self {
        Self::with_provider(
            WeatherProvider::new(
                client,
                &config.services.weather_api_url,
                &config.services.weather_api_key,
            ),
            &config.location.fallback.city,
        )
    }

    pub fn with_provider(provider: WeatherProvider, fallback_city: &str) -> Self {
        Self {
            provider,
            fallback_city: fallback_city.to_string(),
        }
    }

    /// Always yields a report; failures become an error advisory.
    pub async fn advise(&self, location: &Location) -> AdvisoryReport {
        let query = WeatherQuery::for_location(location, &self.fallback_city);

        match self.provider.current(&query).await {
            Ok(reading) => {
                let advisory = select_advisory(&reading);
                tracing::info!(
                    "Weather for {}: {}°C, {}% humidity -> {}",
                    reading.location_name,
                    reading.temp,
                    reading.humidity,
                    advisory.level.label()
                );
                AdvisoryReport {
                    advisory,
                    reading: Some(reading),
                    fetched_at: Utc::now(),
                }
            }
            Err(e) => {
                tracing::warn!("Weather fetch failed: {}", e);
                let summary = if e.is_malformed() {
                    "Invalid weather data"
                } else {
                    "Weather service unavailable"
                };
                AdvisoryReport {
                    advisory: error_advisory(summary),
                    reading: None,
                    fetched_at: Utc::now(),
                }
            }
        }
    }
}
