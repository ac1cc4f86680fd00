use agrifeed_core::http::fetch_json;
use agrifeed_core::NetworkError;
use agrifeed_location::{Coordinates, Location};
use reqwest::Client;
use tracing::instrument;

use crate::types::{CurrentWeatherResponse, WeatherError, WeatherReading};

/// What to ask the weather service about.
#[derive(Debug, Clone, PartialEq)]
pub enum WeatherQuery {
    Coordinates(Coordinates),
    City(String),
}

impl WeatherQuery {
    /// Coordinates when known, else the city name, else `fallback_city`.
    pub fn for_location(location: &Location, fallback_city: &str) -> Self {
        match (location.coordinates, location.city_name()) {
            (Some(coordinates), _) => Self::Coordinates(coordinates),
            (None, Some(city)) => Self::City(city.to_string()),
            (None, None) => Self::City(fallback_city.to_string()),
        }
    }
}

/// OpenWeatherMap current-conditions client.
#[derive(Debug, Clone)]
pub struct WeatherProvider {
    client: Client,
    base_url: String,
    api_key: String,
}

impl WeatherProvider {
    pub fn new(client: Client, base_url: &str, api_key: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        }
    }

    /// Fetch current conditions in metric units.
    #[instrument(skip(self), level = "info")]
    pub async fn current(&self, query: &WeatherQuery) -> Result<WeatherReading, WeatherError> {
        let url = format!("{}/data/2.5/weather", self.base_url);

        let mut params: Vec<(&str, String)> = match query {
            WeatherQuery::Coordinates(c) => {
                vec![("lat", c.lat.to_string()), ("lon", c.lon.to_string())]
            }
            WeatherQuery::City(city) => vec![("q", city.clone())],
        };
        params.push(("appid", self.api_key.clone()));
        params.push(("units", "metric".to_string()));

        let response: CurrentWeatherResponse =
            match fetch_json(self.client.get(&url).query(&params)).await {
                Ok(response) => response,
                Err(e) => rejected_payload(&e).ok_or(e)?,
            };

        WeatherReading::from_response(response)
    }
}

/// A 4xx answer with a JSON body (bad key, unknown city) is still a payload
/// to read; it carries no `main` block and so reads as malformed.
fn rejected_payload(error: &NetworkError) -> Option<CurrentWeatherResponse> {
    match error {
        NetworkError::ServerError { status, message } if (400..500).contains(status) => {
            serde_json::from_str(message).ok()
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn sample_body() -> serde_json::Value {
        serde_json::json!({
            "main": {"temp": 31.4, "feels_like": 34.9, "humidity": 58, "pressure": 1006},
            "wind": {"speed": 3.1},
            "weather": [{"description": "haze"}],
            "name": "Jalgaon"
        })
    }

    #[test]
    fn test_query_prefers_coordinates() {
        let coords = Coordinates { lat: 21.0, lon: 75.5 };
        let location = Location {
            city: Some("Jalgaon".into()),
            coordinates: Some(coords),
            ..Default::default()
        };
        assert_eq!(
            WeatherQuery::for_location(&location, "Mumbai"),
            WeatherQuery::Coordinates(coords)
        );
    }

    #[test]
    fn test_query_city_then_fallback() {
        let location = Location {
            city: Some("Jalgaon".into()),
            ..Default::default()
        };
        assert_eq!(
            WeatherQuery::for_location(&location, "Mumbai"),
            WeatherQuery::City("Jalgaon".into())
        );
        assert_eq!(
            WeatherQuery::for_location(&Location::default(), "Mumbai"),
            WeatherQuery::City("Mumbai".into())
        );
    }

    #[tokio::test]
    async fn test_current_by_coordinates() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/data/2.5/weather"))
            .and(query_param("lat", "21"))
            .and(query_param("lon", "75.5"))
            .and(query_param("appid", "test-key"))
            .and(query_param("units", "metric"))
            .respond_with(ResponseTemplate::new(200).set_body_json(sample_body()))
            .mount(&mock_server)
            .await;

        let provider = WeatherProvider::new(Client::new(), &mock_server.uri(), "test-key");
        let reading = provider
            .current(&WeatherQuery::Coordinates(Coordinates { lat: 21.0, lon: 75.5 }))
            .await
            .unwrap();

        assert_eq!(reading.temp, 31);
        assert_eq!(reading.feels_like, 35);
        assert_eq!(reading.wind_speed_kmh, 11);
        assert_eq!(reading.location_name, "Jalgaon");
    }

    #[tokio::test]
    async fn test_current_by_city() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/data/2.5/weather"))
            .and(query_param("q", "Jalgaon"))
            .respond_with(ResponseTemplate::new(200).set_body_json(sample_body()))
            .mount(&mock_server)
            .await;

        let provider = WeatherProvider::new(Client::new(), &mock_server.uri(), "test-key");
        let reading = provider
            .current(&WeatherQuery::City("Jalgaon".into()))
            .await
            .unwrap();
        assert_eq!(reading.description, "haze");
    }

    #[tokio::test]
    async fn test_current_invalid_key() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/data/2.5/weather"))
            .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
                "cod": 401,
                "message": "Invalid API key"
            })))
            .mount(&mock_server)
            .await;

        let provider = WeatherProvider::new(Client::new(), &mock_server.uri(), "bad");
        let err = provider
            .current(&WeatherQuery::City("Jalgaon".into()))
            .await
            .unwrap_err();
        assert!(matches!(err, WeatherError::Malformed(_)));
        assert!(err.is_malformed());
    }

    #[tokio::test]
    async fn test_current_unknown_city() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/data/2.5/weather"))
            .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
                "cod": "404",
                "message": "city not found"
            })))
            .mount(&mock_server)
            .await;

        let provider = WeatherProvider::new(Client::new(), &mock_server.uri(), "test-key");
        let err = provider
            .current(&WeatherQuery::City("Atlantis".into()))
            .await
            .unwrap_err();
        assert!(err.is_malformed());
    }

    #[tokio::test]
    async fn test_current_rejected_without_json_stays_network() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/data/2.5/weather"))
            .respond_with(ResponseTemplate::new(403).set_body_string("forbidden"))
            .mount(&mock_server)
            .await;

        let provider = WeatherProvider::new(Client::new(), &mock_server.uri(), "test-key");
        let err = provider
            .current(&WeatherQuery::City("Jalgaon".into()))
            .await
            .unwrap_err();
        assert!(matches!(err, WeatherError::Network(_)));
        assert!(!err.is_malformed());
    }
}
