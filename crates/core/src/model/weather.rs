//! Weather observations

use crate::model::Coordinate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Coarse weather category, as reported by OpenWeatherMap's `weather[].main`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WeatherCondition {
    Clear,
    Clouds,
    Rain,
    Drizzle,
    Thunderstorm,
    Snow,
    Extreme,
    #[serde(other)]
    Unknown,
}

impl WeatherCondition {
    /// Map a provider label onto a category. Labels without a category
    /// (e.g. "Mist", "Haze") become `Unknown`.
    pub fn parse(label: &str) -> Self {
        match label.trim() {
            "Clear" => WeatherCondition::Clear,
            "Clouds" => WeatherCondition::Clouds,
            "Rain" => WeatherCondition::Rain,
            "Drizzle" => WeatherCondition::Drizzle,
            "Thunderstorm" => WeatherCondition::Thunderstorm,
            "Snow" => WeatherCondition::Snow,
            "Extreme" => WeatherCondition::Extreme,
            _ => WeatherCondition::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            WeatherCondition::Clear => "Clear",
            WeatherCondition::Clouds => "Clouds",
            WeatherCondition::Rain => "Rain",
            WeatherCondition::Drizzle => "Drizzle",
            WeatherCondition::Thunderstorm => "Thunderstorm",
            WeatherCondition::Snow => "Snow",
            WeatherCondition::Extreme => "Extreme",
            WeatherCondition::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for WeatherCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a snapshot came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WeatherSource {
    OpenWeatherMap,
    MockData,
}

/// A single weather observation at the claim location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub condition: WeatherCondition,
    #[serde(rename = "temp")]
    pub temp_c: f64,
    #[serde(rename = "humidity")]
    pub humidity_pct: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wind_speed: Option<f64>,
    pub source: WeatherSource,
}

impl WeatherSnapshot {
    pub fn new(condition: WeatherCondition, temp_c: f64, humidity_pct: f64) -> Self {
        Self {
            condition,
            temp_c,
            humidity_pct,
            description: None,
            wind_speed: None,
            source: WeatherSource::OpenWeatherMap,
        }
    }

    /// Deterministic location-seeded stand-in for a live observation.
    ///
    /// Locations where `(lat + lon) mod 2 > 1` are dry and clear, all
    /// others get light rain.
    pub fn synthetic(at: Coordinate) -> Self {
        let is_dry = (at.lat + at.lon).rem_euclid(2.0) > 1.0;
        if is_dry {
            Self {
                condition: WeatherCondition::Clear,
                temp_c: 32.5,
                humidity_pct: 35.0,
                description: Some("clear sky".to_string()),
                wind_speed: Some(5.2),
                source: WeatherSource::MockData,
            }
        } else {
            Self {
                condition: WeatherCondition::Rain,
                temp_c: 24.0,
                humidity_pct: 75.0,
                description: Some("light rain".to_string()),
                wind_speed: Some(5.2),
                source: WeatherSource::MockData,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_condition() {
        assert_eq!(WeatherCondition::parse("Rain"), WeatherCondition::Rain);
        assert_eq!(WeatherCondition::parse("Mist"), WeatherCondition::Unknown);
    }

    #[test]
    fn test_synthetic_is_deterministic() {
        let at = Coordinate::new(12.9, 77.5).unwrap();
        assert_eq!(WeatherSnapshot::synthetic(at), WeatherSnapshot::synthetic(at));
        assert_eq!(WeatherSnapshot::synthetic(at).source, WeatherSource::MockData);
    }

    #[test]
    fn test_synthetic_dry_and_wet() {
        // 12.9 + 77.5 = 90.4 -> mod 2 = 0.4 -> wet
        let wet = WeatherSnapshot::synthetic(Coordinate::new(12.9, 77.5).unwrap());
        assert_eq!(wet.condition, WeatherCondition::Rain);
        assert_eq!(wet.humidity_pct, 75.0);

        // 13.0 + 78.5 = 91.5 -> mod 2 = 1.5 -> dry
        let dry = WeatherSnapshot::synthetic(Coordinate::new(13.0, 78.5).unwrap());
        assert_eq!(dry.condition, WeatherCondition::Clear);
        assert_eq!(dry.temp_c, 32.5);
    }

    #[test]
    fn test_synthetic_negative_coordinates() {
        // -0.5 + -1.0 = -1.5 -> floored mod 2 = 0.5 -> wet
        let s = WeatherSnapshot::synthetic(Coordinate::new(-0.5, -1.0).unwrap());
        assert_eq!(s.condition, WeatherCondition::Rain);
    }
}
