use agrifeed_core::NetworkError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Metres per second to kilometres per hour
pub const MS_TO_KMH: f64 = 3.6;

/// Current conditions, rounded for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherReading {
    /// Temperature in °C
    pub temp: i64,
    /// Apparent temperature in °C (the temperature when the API omits it)
    pub feels_like: i64,
    /// Relative humidity in %
    pub humidity: i64,
    /// Wind speed in km/h
    pub wind_speed_kmh: i64,
    /// Sea-level pressure in hPa
    pub pressure: Option<i64>,
    /// Free-text condition, e.g. "light rain"
    pub description: String,
    /// Place name reported by the weather service
    pub location_name: String,
}

impl WeatherReading {
    /// Build a reading from the raw API payload.
    ///
    /// `main.temp` and `main.humidity` are required; everything else has a
    /// default.
    pub fn from_response(response: CurrentWeatherResponse) -> Result<Self, WeatherError> {
        let main = response
            .main
            .ok_or_else(|| WeatherError::Malformed("missing `main`".into()))?;
        let temp = main
            .temp
            .ok_or_else(|| WeatherError::Malformed("missing `main.temp`".into()))?;
        let humidity = main
            .humidity
            .ok_or_else(|| WeatherError::Malformed("missing `main.humidity`".into()))?;

        let wind_ms = response.wind.and_then(|w| w.speed).unwrap_or(0.0);
        let description = response
            .weather
            .into_iter()
            .next()
            .and_then(|c| c.description)
            .unwrap_or_default();

        let temp = round(temp);
        Ok(Self {
            temp,
            feels_like: main.feels_like.map(round).unwrap_or(temp),
            humidity: round(humidity),
            wind_speed_kmh: round(wind_ms * MS_TO_KMH),
            pressure: main.pressure.map(round),
            description,
            location_name: response.name.unwrap_or_default(),
        })
    }
}

fn round(value: f64) -> i64 {
    value.round() as i64
}

/// Severity/kind of an advisory. The order of the rule table, not the order
/// of this enum, decides which one applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdvisoryLevel {
    HighTemperature,
    ColdWeather,
    HighHumidity,
    StrongWinds,
    RainfallAlert,
    FavorableConditions,
    Error,
}

impl AdvisoryLevel {
    /// Badge text
    pub fn label(&self) -> &'static str {
        match self {
            Self::HighTemperature => "High Temperature",
            Self::ColdWeather => "Cold Weather",
            Self::HighHumidity => "High Humidity",
            Self::StrongWinds => "Strong Winds",
            Self::RainfallAlert => "Rainfall Alert",
            Self::FavorableConditions => "Favorable Conditions",
            Self::Error => "Error",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Self::HighTemperature => "\u{1F321}\u{FE0F}",
            Self::ColdWeather => "\u{2744}\u{FE0F}",
            Self::HighHumidity => "\u{1F4A7}",
            Self::StrongWinds => "\u{1F4A8}",
            Self::RainfallAlert => "\u{1F327}\u{FE0F}",
            Self::FavorableConditions => "\u{2705}",
            Self::Error => "\u{26A0}\u{FE0F}",
        }
    }
}

/// One recommended farming action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Advisory {
    pub level: AdvisoryLevel,
    pub message: String,
}

impl Advisory {
    pub fn icon(&self) -> &'static str {
        self.level.icon()
    }

    pub fn is_error(&self) -> bool {
        self.level == AdvisoryLevel::Error
    }
}

/// What the weather card shows: the advisory plus the reading it came from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdvisoryReport {
    pub advisory: Advisory,
    /// Absent when the fetch failed
    pub reading: Option<WeatherReading>,
    pub fetched_at: DateTime<Utc>,
}

/// Raw `/data/2.5/weather` response
#[derive(Debug, Clone, Deserialize)]
pub struct CurrentWeatherResponse {
    pub main: Option<MainBlock>,
    pub wind: Option<WindBlock>,
    #[serde(default)]
    pub weather: Vec<ConditionBlock>,
    pub name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MainBlock {
    pub temp: Option<f64>,
    pub feels_like: Option<f64>,
    pub humidity: Option<f64>,
    pub pressure: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WindBlock {
    /// m/s with `units=metric`
    pub speed: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ConditionBlock {
    pub description: Option<String>,
}

/// Weather provider errors
#[derive(Debug, thiserror::Error)]
pub enum WeatherError {
    #[error("Weather request failed: {0}")]
    Network(#[from] NetworkError),
    #[error("Malformed weather payload: {0}")]
    Malformed(String),
}

impl WeatherError {
    /// True when the service answered with something that is not a reading.
    pub fn is_malformed(&self) -> bool {
        match self {
            Self::Network(e) => e.is_malformed(),
            Self::Malformed(_) => true,
        }
    }
}
