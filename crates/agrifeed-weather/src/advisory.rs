//! Advisory rule table.
//!
//! Rules are tested top to bottom against the rounded reading; the first
//! match wins and the last rule always matches.

use crate::types::{Advisory, AdvisoryLevel, WeatherReading};

const HEAT_THRESHOLD_C: i64 = 35;
const COLD_THRESHOLD_C: i64 = 10;
const HUMIDITY_THRESHOLD_PCT: i64 = 80;
const WIND_THRESHOLD_KMH: i64 = 40;

struct AdvisoryRule {
    level: AdvisoryLevel,
    applies: fn(&WeatherReading) -> bool,
    message: fn(&WeatherReading) -> String,
}

static RULES: [AdvisoryRule; 6] = [
    AdvisoryRule {
        level: AdvisoryLevel::HighTemperature,
        applies: is_hot,
        message: heat_message,
    },
    AdvisoryRule {
        level: AdvisoryLevel::ColdWeather,
        applies: is_cold,
        message: cold_message,
    },
    AdvisoryRule {
        level: AdvisoryLevel::HighHumidity,
        applies: is_humid,
        message: humidity_message,
    },
    AdvisoryRule {
        level: AdvisoryLevel::StrongWinds,
        applies: is_windy,
        message: wind_message,
    },
    AdvisoryRule {
        level: AdvisoryLevel::RainfallAlert,
        applies: is_raining,
        message: rain_message,
    },
    AdvisoryRule {
        level: AdvisoryLevel::FavorableConditions,
        applies: always,
        message: favorable_message,
    },
];

fn is_hot(r: &WeatherReading) -> bool {
    r.temp > HEAT_THRESHOLD_C
}

fn is_cold(r: &WeatherReading) -> bool {
    r.temp < COLD_THRESHOLD_C
}

fn is_humid(r: &WeatherReading) -> bool {
    r.humidity > HUMIDITY_THRESHOLD_PCT
}

fn is_windy(r: &WeatherReading) -> bool {
    r.wind_speed_kmh > WIND_THRESHOLD_KMH
}

fn is_raining(r: &WeatherReading) -> bool {
    r.description.to_lowercase().contains("rain")
}

fn always(_: &WeatherReading) -> bool {
    true
}

fn heat_message(r: &WeatherReading) -> String {
    format!(
        "Temperature has reached {}°C. Ensure adequate irrigation for crops and monitor for heat stress. Consider scheduling activities for cooler hours.",
        r.temp
    )
}

fn cold_message(r: &WeatherReading) -> String {
    format!(
        "Temperature has dropped to {}°C. Protect sensitive crops from potential frost damage. Consider covering young plants and checking irrigation systems.",
        r.temp
    )
}

fn humidity_message(r: &WeatherReading) -> String {
    format!(
        "Humidity levels at {}%. Monitor crops closely for fungal diseases and ensure proper air circulation. Avoid overhead irrigation.",
        r.humidity
    )
}

fn wind_message(r: &WeatherReading) -> String {
    format!(
        "Wind speeds reaching {} km/h. Secure loose equipment, check structural integrity of greenhouses, and protect tall crops from wind damage.",
        r.wind_speed_kmh
    )
}

fn rain_message(_: &WeatherReading) -> String {
    "Rain detected in your area. Check drainage systems, postpone pesticide applications, and protect harvested crops. Plan indoor activities.".to_string()
}

fn favorable_message(r: &WeatherReading) -> String {
    format!(
        "Weather conditions are optimal for farming activities. Temperature is {}°C with {}. Good time for field operations and crop management.",
        r.temp, r.description
    )
}

/// Pick the advisory for a reading.
pub fn select_advisory(reading: &WeatherReading) -> Advisory {
    let rule = RULES
        .iter()
        .find(|rule| (rule.applies)(reading))
        .unwrap_or(&RULES[RULES.len() - 1]);

    Advisory {
        level: rule.level,
        message: (rule.message)(reading),
    }
}

/// Advisory shown instead of a weather rule when no reading is available.
pub fn error_advisory(summary: &str) -> Advisory {
    Advisory {
        level: AdvisoryLevel::Error,
        message: format!(
            "{}. Please check your internet connection and try again later.",
            summary
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reading(temp: i64, humidity: i64, wind_speed_kmh: i64, description: &str) -> WeatherReading {
        WeatherReading {
            temp,
            feels_like: temp,
            humidity,
            wind_speed_kmh,
            pressure: Some(1012),
            description: description.to_string(),
            location_name: "Test Farm".to_string(),
        }
    }

    #[test]
    fn test_heat_beats_humidity() {
        let advisory = select_advisory(&reading(36, 90, 0, "clear sky"));
        assert_eq!(advisory.level, AdvisoryLevel::HighTemperature);
        assert!(advisory.message.contains("36°C"));
    }

    #[test]
    fn test_thresholds_are_strict() {
        assert_eq!(
            select_advisory(&reading(35, 50, 10, "clear sky")).level,
            AdvisoryLevel::FavorableConditions
        );
        assert_eq!(
            select_advisory(&reading(10, 50, 10, "clear sky")).level,
            AdvisoryLevel::FavorableConditions
        );
        assert_eq!(
            select_advisory(&reading(25, 80, 40, "clear sky")).level,
            AdvisoryLevel::FavorableConditions
        );
    }

    #[test]
    fn test_cold_beats_humidity_and_wind() {
        let advisory = select_advisory(&reading(4, 95, 60, "light rain"));
        assert_eq!(advisory.level, AdvisoryLevel::ColdWeather);
        assert!(advisory.message.contains("4°C"));
    }

    #[test]
    fn test_humidity_beats_wind_and_rain() {
        let advisory = select_advisory(&reading(25, 85, 50, "moderate rain"));
        assert_eq!(advisory.level, AdvisoryLevel::HighHumidity);
        assert!(advisory.message.contains("85%"));
    }

    #[test]
    fn test_wind_from_twelve_metres_per_second() {
        // 12.0 m/s * 3.6 = 43.2 km/h, displayed as 43
        let wind_kmh = (12.0_f64 * crate::types::MS_TO_KMH).round() as i64;
        assert_eq!(wind_kmh, 43);

        let advisory = select_advisory(&reading(25, 50, wind_kmh, "light rain"));
        assert_eq!(advisory.level, AdvisoryLevel::StrongWinds);
        assert!(advisory.message.contains("43 km/h"));
    }

    #[test]
    fn test_rain_description() {
        let advisory = select_advisory(&reading(25, 60, 10, "light rain"));
        assert_eq!(advisory.level, AdvisoryLevel::RainfallAlert);
        assert_eq!(
            select_advisory(&reading(25, 60, 10, "Heavy Intensity Rain")).level,
            AdvisoryLevel::RainfallAlert
        );
    }

    #[test]
    fn test_favorable_interpolates_description() {
        let advisory = select_advisory(&reading(24, 55, 12, "few clouds"));
        assert_eq!(advisory.level, AdvisoryLevel::FavorableConditions);
        assert!(advisory.message.contains("24°C with few clouds"));
    }

    #[test]
    fn test_exactly_one_advisory_per_reading() {
        for temp in [-5, 9, 10, 20, 35, 36, 45] {
            for humidity in [20, 80, 81, 100] {
                for wind in [0, 40, 41, 90] {
                    for desc in ["clear sky", "light rain"] {
                        let matching = RULES
                            .iter()
                            .filter(|rule| (rule.applies)(&reading(temp, humidity, wind, desc)))
                            .count();
                        assert!(matching >= 1);
                        assert_ne!(
                            select_advisory(&reading(temp, humidity, wind, desc)).level,
                            AdvisoryLevel::Error
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn test_error_advisory() {
        let advisory = error_advisory("Weather service unavailable");
        assert!(advisory.is_error());
        assert_eq!(
            advisory.message,
            "Weather service unavailable. Please check your internet connection and try again later."
        );
    }
}
