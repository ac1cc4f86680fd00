use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use url::Url;

use crate::error::ConfigError;

/// Environment variable that overrides `services.weather_api_key`.
pub const WEATHER_API_KEY_ENV: &str = "AGRIFEED_WEATHER_API_KEY";
/// Environment variable that overrides `services.news_api_key`.
pub const NEWS_API_KEY_ENV: &str = "AGRIFEED_NEWS_API_KEY";

/// Configuration validation errors
#[derive(Debug, Clone)]
pub struct ConfigValidationError {
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Result of config validation
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationResult {
    /// Returns true if there are no errors (warnings are OK)
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Add an error
    pub fn add_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Add a warning
    pub fn add_warning(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Get a user-friendly message summarizing all errors
    pub fn error_summary(&self) -> String {
        if self.errors.is_empty() {
            return String::new();
        }
        self.errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// External service endpoints and keys
    pub services: ServiceConfig,

    /// Location resolution settings
    #[serde(default)]
    pub location: LocationConfig,

    /// Refresh intervals
    #[serde(default)]
    pub refresh: RefreshConfig,

    /// News query settings
    #[serde(default)]
    pub news: NewsConfig,

    /// Crop question settings
    #[serde(default)]
    pub crops: CropConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Base URL of the OpenWeatherMap-compatible weather API
    pub weather_api_url: String,

    /// API key for the weather service (or set AGRIFEED_WEATHER_API_KEY)
    pub weather_api_key: String,

    /// Base URL of the NewsAPI-compatible search API
    pub news_api_url: String,

    /// API key for the news service (or set AGRIFEED_NEWS_API_KEY)
    pub news_api_key: String,

    /// Base URL of the Nominatim-compatible reverse geocoder
    pub geocode_url: String,

    /// Base URL of the ipapi.co-compatible IP geolocation service
    pub ip_location_url: String,

    /// Base URL of the MyMemory-compatible translation service
    pub translate_url: String,

    /// User-Agent sent with every request (Nominatim rejects anonymous clients)
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl ServiceConfig {
    /// Check if the weather key is set (not a placeholder)
    pub fn has_weather_key(&self) -> bool {
        is_real_key(&self.weather_api_key)
    }

    /// Check if the news key is set (not a placeholder)
    pub fn has_news_key(&self) -> bool {
        is_real_key(&self.news_api_key)
    }
}

fn is_real_key(key: &str) -> bool {
    !key.is_empty() && !key.starts_with("YOUR_")
}

fn default_user_agent() -> String {
    format!("AgriFeed/{}", env!("CARGO_PKG_VERSION"))
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            weather_api_url: "https://api.openweathermap.org".to_string(),
            weather_api_key: "YOUR_OPENWEATHERMAP_API_KEY".to_string(),
            news_api_url: "https://newsapi.org".to_string(),
            news_api_key: "YOUR_NEWSAPI_KEY".to_string(),
            geocode_url: "https://nominatim.openstreetmap.org".to_string(),
            ip_location_url: "https://ipapi.co".to_string(),
            translate_url: "https://api.mymemory.translated.net".to_string(),
            user_agent: default_user_agent(),
        }
    }
}

/// The location used when every resolution stage has failed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FallbackLocation {
    pub city: String,
    pub state: String,
    pub country: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl Default for FallbackLocation {
    fn default() -> Self {
        Self {
            city: "Mumbai".to_string(),
            state: "Maharashtra".to_string(),
            country: "India".to_string(),
            latitude: 19.0760,
            longitude: 72.8777,
        }
    }
}

/// Surveyed coordinates standing in for a device position fix.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DeviceCoordinates {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationConfig {
    /// Country assumed when a lookup omits it
    #[serde(default = "default_country")]
    pub default_country: String,

    /// Seconds to wait for a device position fix
    #[serde(default = "default_geolocation_timeout")]
    pub geolocation_timeout_secs: u64,

    /// Device position, if this machine has a known one
    #[serde(default)]
    pub device: Option<DeviceCoordinates>,

    /// Last-resort location
    #[serde(default)]
    pub fallback: FallbackLocation,
}

fn default_country() -> String {
    "India".to_string()
}

fn default_geolocation_timeout() -> u64 {
    10
}

impl Default for LocationConfig {
    fn default() -> Self {
        Self {
            default_country: default_country(),
            geolocation_timeout_secs: default_geolocation_timeout(),
            device: None,
            fallback: FallbackLocation::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshConfig {
    /// Weather refresh interval in minutes
    #[serde(default = "default_weather_minutes")]
    pub weather_minutes: u32,

    /// News refresh interval in minutes
    #[serde(default = "default_news_minutes")]
    pub news_minutes: u32,

    /// Date line refresh interval in seconds
    #[serde(default = "default_clock_seconds")]
    pub clock_seconds: u32,
}

fn default_weather_minutes() -> u32 {
    10
}

fn default_news_minutes() -> u32 {
    30
}

fn default_clock_seconds() -> u32 {
    60
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            weather_minutes: default_weather_minutes(),
            news_minutes: default_news_minutes(),
            clock_seconds: default_clock_seconds(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsConfig {
    /// Language filter passed to the search API
    #[serde(default = "default_language")]
    pub language: String,

    /// Page size per query
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// Articles kept after deduplication
    #[serde(default = "default_max_articles")]
    pub max_articles: usize,

    /// Viewer locale for headline translation (e.g. "hi-IN"); "en*" disables it
    #[serde(default = "default_locale")]
    pub viewer_locale: String,
}

fn default_language() -> String {
    "en".to_string()
}

fn default_page_size() -> u32 {
    10
}

fn default_max_articles() -> usize {
    6
}

fn default_locale() -> String {
    "en".to_string()
}

impl Default for NewsConfig {
    fn default() -> Self {
        Self {
            language: default_language(),
            page_size: default_page_size(),
            max_articles: default_max_articles(),
            viewer_locale: default_locale(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CropConfig {
    /// JSON file of crop name to profile; the built-in table is used when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            services: ServiceConfig::default(),
            location: LocationConfig::default(),
            refresh: RefreshConfig::default(),
            news: NewsConfig::default(),
            crops: CropConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from the default path, creating it if it doesn't exist.
    /// API keys from the environment take precedence over the file.
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;
        let mut config = Self::load_from(&config_path)?;
        config.apply_overrides(|name| std::env::var(name).ok());
        Ok(config)
    }

    /// Load configuration from a specific file, writing defaults there if missing.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            let config = Self::default();
            config.save_to(path)?;
            tracing::info!("Wrote default configuration to {}", path.display());
            return Ok(config);
        }

        let contents = std::fs::read_to_string(path).context("Failed to read config file")?;

        let config: Config =
            toml::from_str(&contents).map_err(|e| ConfigError::ParseError(e.to_string()))?;

        Ok(config)
    }

    /// Load configuration and validate it
    ///
    /// Returns the config along with any validation warnings.
    /// Returns an error if validation fails with critical errors.
    pub fn load_validated() -> Result<(Self, ValidationResult)> {
        let config = Self::load()?;
        let validation = config.validate();

        if !validation.is_valid() {
            return Err(ConfigError::Invalid(validation.error_summary()).into());
        }

        for warning in &validation.warnings {
            tracing::warn!("Config warning: {}", warning);
        }

        Ok((config, validation))
    }

    /// Replace API keys with values from `lookup` (normally the process environment).
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(key) = lookup(WEATHER_API_KEY_ENV).filter(|k| !k.is_empty()) {
            self.services.weather_api_key = key;
        }
        if let Some(key) = lookup(NEWS_API_KEY_ENV).filter(|k| !k.is_empty()) {
            self.services.news_api_key = key;
        }
    }

    /// Validate the configuration
    ///
    /// Returns a ValidationResult containing any errors or warnings.
    pub fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::default();

        let services = &self.services;
        for (value, field) in [
            (&services.weather_api_url, "services.weather_api_url"),
            (&services.news_api_url, "services.news_api_url"),
            (&services.geocode_url, "services.geocode_url"),
            (&services.ip_location_url, "services.ip_location_url"),
            (&services.translate_url, "services.translate_url"),
        ] {
            self.validate_url(value, field, &mut result);
        }

        if !services.has_weather_key() {
            result.add_warning(
                "services.weather_api_key",
                "Weather API key not configured - weather advisories will show an error",
            );
        }
        if !services.has_news_key() {
            result.add_warning(
                "services.news_api_key",
                "News API key not configured - the news feed will be empty",
            );
        }

        // Refresh intervals
        if self.refresh.weather_minutes == 0 {
            result.add_warning("refresh.weather_minutes", "Weather refresh disabled (0 minutes)");
        } else if self.refresh.weather_minutes > 1440 {
            result.add_warning(
                "refresh.weather_minutes",
                "Weather refresh interval is more than 24 hours",
            );
        }
        if self.refresh.news_minutes == 0 {
            result.add_warning("refresh.news_minutes", "News refresh disabled (0 minutes)");
        }
        if self.refresh.clock_seconds == 0 {
            result.add_warning("refresh.clock_seconds", "Date line refresh disabled (0 seconds)");
        }

        // Location
        let fallback = &self.location.fallback;
        validate_coordinates(
            fallback.latitude,
            fallback.longitude,
            "location.fallback",
            &mut result,
        );
        if fallback.city.trim().is_empty() {
            result.add_error("location.fallback.city", "Fallback city must not be empty");
        }
        if let Some(device) = &self.location.device {
            validate_coordinates(
                device.latitude,
                device.longitude,
                "location.device",
                &mut result,
            );
        }
        if self.location.geolocation_timeout_secs == 0 {
            result.add_warning(
                "location.geolocation_timeout_secs",
                "Device geolocation will always time out (0 seconds)",
            );
        }

        // News
        if self.news.max_articles == 0 {
            result.add_error("news.max_articles", "At least one article must be kept");
        }
        if self.news.page_size == 0 {
            result.add_error("news.page_size", "Page size must be greater than 0");
        } else if self.news.page_size > 100 {
            result.add_warning("news.page_size", "Page size above 100 is capped by most providers");
        }

        // Crops
        if let Some(path) = &self.crops.data_file {
            if !path.is_file() {
                result.add_warning(
                    "crops.data_file",
                    format!("{} not found - built-in crop data will be used", path.display()),
                );
            }
        }

        result
    }

    /// Validate a URL field
    fn validate_url(&self, url_str: &str, field_name: &str, result: &mut ValidationResult) {
        match Url::parse(url_str) {
            Ok(url) => {
                if url.scheme() != "http" && url.scheme() != "https" {
                    result.add_error(
                        field_name,
                        format!("URL must use http or https scheme, got: {}", url.scheme()),
                    );
                }

                if url.host().is_none() {
                    result.add_error(field_name, "URL must have a host");
                }

                if let Some(port) = url.port() {
                    if port == 0 {
                        result.add_error(field_name, "Port cannot be 0");
                    }
                }
            }
            Err(e) => {
                result.add_error(field_name, format!("Invalid URL: {}", e));
            }
        }
    }

    /// Save configuration to a specific file
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;

        std::fs::write(path, contents).context("Failed to write config file")?;

        Ok(())
    }

    /// Get the path to the configuration file
    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Failed to get config directory")?
            .join("agrifeed");

        Ok(config_dir.join("config.toml"))
    }
}

fn validate_coordinates(lat: f64, lon: f64, field: &str, result: &mut ValidationResult) {
    if !(-90.0..=90.0).contains(&lat) {
        result.add_error(format!("{}.latitude", field), "Latitude must be within -90..90");
    }
    if !(-180.0..=180.0).contains(&lon) {
        result.add_error(format!("{}.longitude", field), "Longitude must be within -180..180");
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_valid_default_config() {
        let config = Config::default();
        let result = config.validate();
        // Default config should be valid (only warnings, no errors)
        assert!(result.is_valid(), "Default config should be valid: {:?}", result.errors);
    }

    #[test]
    fn test_default_refresh_intervals() {
        let config = Config::default();
        assert_eq!(config.refresh.weather_minutes, 10);
        assert_eq!(config.refresh.news_minutes, 30);
    }

    #[test]
    fn test_default_fallback_is_mumbai() {
        let fallback = FallbackLocation::default();
        assert_eq!(fallback.city, "Mumbai");
        assert_eq!(fallback.country, "India");
        assert!((fallback.latitude - 19.0760).abs() < 1e-9);
        assert!((fallback.longitude - 72.8777).abs() < 1e-9);
    }

    #[test]
    fn test_invalid_url() {
        let mut config = Config::default();
        config.services.news_api_url = "not-a-url".to_string();
        let result = config.validate();
        assert!(!result.is_valid());
        assert!(result.errors.iter().any(|e| e.field == "services.news_api_url"));
    }

    #[test]
    fn test_invalid_url_scheme() {
        let mut config = Config::default();
        config.services.weather_api_url = "ftp://localhost:8080".to_string();
        let result = config.validate();
        assert!(!result.is_valid());
        assert!(result.errors.iter().any(|e| e.message.contains("http or https")));
    }

    #[test]
    fn test_placeholder_keys_are_warnings() {
        let config = Config::default();
        let result = config.validate();
        assert!(result.is_valid());
        assert!(result.warnings.iter().any(|w| w.field == "services.weather_api_key"));
        assert!(result.warnings.iter().any(|w| w.field == "services.news_api_key"));
    }

    #[test]
    fn test_out_of_range_fallback_coordinates() {
        let mut config = Config::default();
        config.location.fallback.latitude = 123.0;
        let result = config.validate();
        assert!(!result.is_valid());
        assert!(result
            .errors
            .iter()
            .any(|e| e.field == "location.fallback.latitude"));
    }

    #[test]
    fn test_zero_max_articles_is_error() {
        let mut config = Config::default();
        config.news.max_articles = 0;
        let result = config.validate();
        assert!(!result.is_valid());
    }

    #[test]
    fn test_missing_crop_file_is_warning() {
        let mut config = Config::default();
        assert!(config.crops.data_file.is_none());

        config.crops.data_file = Some(PathBuf::from("/nonexistent/crops.json"));
        let result = config.validate();
        assert!(result.is_valid());
        assert!(result.warnings.iter().any(|w| w.field == "crops.data_file"));
    }

    #[test]
    fn test_env_overrides_replace_keys() {
        let mut config = Config::default();
        config.apply_overrides(|name| match name {
            WEATHER_API_KEY_ENV => Some("weather-secret".to_string()),
            NEWS_API_KEY_ENV => Some(String::new()),
            _ => None,
        });
        assert_eq!(config.services.weather_api_key, "weather-secret");
        // Empty values leave the file setting alone
        assert_eq!(config.services.news_api_key, "YOUR_NEWSAPI_KEY");
    }

    #[test]
    fn test_load_from_creates_default_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let config = Config::load_from(&path).unwrap();
        assert!(path.exists());
        assert_eq!(config.news.max_articles, 6);
    }

    #[test]
    fn test_unparseable_file_is_config_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[services\nweather_api_key = ").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ConfigError>(),
            Some(ConfigError::ParseError(_))
        ));
    }

    #[test]
    fn test_save_and_reload() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = Config::default();
        config.location.default_country = "Kenya".to_string();
        config.location.device = Some(DeviceCoordinates {
            latitude: -1.2921,
            longitude: 36.8219,
        });
        config.save_to(&path).unwrap();

        let reloaded = Config::load_from(&path).unwrap();
        assert_eq!(reloaded.location.default_country, "Kenya");
        assert_eq!(reloaded.location.device, config.location.device);
    }

    #[test]
    fn test_partial_file_uses_section_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        let toml = r#"
            [services]
            weather_api_url = "https://api.openweathermap.org"
            weather_api_key = "abc"
            news_api_url = "https://newsapi.org"
            news_api_key = "def"
            geocode_url = "https://nominatim.openstreetmap.org"
            ip_location_url = "https://ipapi.co"
            translate_url = "https://api.mymemory.translated.net"
        "#;
        std::fs::write(&path, toml).unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.refresh.news_minutes, 30);
        assert_eq!(config.location.fallback.city, "Mumbai");
        assert!(config.services.has_weather_key());
        assert!(config.services.user_agent.starts_with("AgriFeed/"));
    }

    #[test]
    fn test_stale_config_dir_key_is_ignored() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        let mut contents = toml::to_string_pretty(&Config::default()).unwrap();
        contents.insert_str(0, "config_dir = \"/somewhere/else\"\n");
        std::fs::write(&path, contents).unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.news.max_articles, 6);
        assert!(!toml::to_string_pretty(&config).unwrap().contains("config_dir"));
    }

    #[test]
    fn test_validation_result_error_summary() {
        let mut result = ValidationResult::default();
        result.add_error("field1", "error1");
        result.add_error("field2", "error2");
        let summary = result.error_summary();
        assert!(summary.contains("field1"));
        assert!(summary.contains("field2"));
    }
}
