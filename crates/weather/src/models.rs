//! OpenWeatherMap current-weather response.
//!
//! Only the fields used for damage correlation are modelled; everything
//! else in the payload is ignored.

use agrisure_core::model::{WeatherCondition, WeatherSnapshot, WeatherSource};
use serde::Deserialize;

use crate::error::{Result, WeatherError};

/// Body of `GET /weather`.
#[derive(Debug, Clone, Deserialize)]
pub struct CurrentWeatherResponse {
    pub main: MainReadings,
    #[serde(default)]
    pub weather: Vec<ConditionEntry>,
    #[serde(default)]
    pub wind: Option<Wind>,
    /// Nearest named place
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MainReadings {
    /// °C with `units=metric`
    pub temp: f64,
    /// Relative humidity, %
    pub humidity: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ConditionEntry {
    /// Condition group, e.g. "Clear", "Rain"
    pub main: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Wind {
    /// m/s with `units=metric`
    pub speed: f64,
}

impl CurrentWeatherResponse {
    /// Convert to the engine's snapshot. The first condition entry is the
    /// primary one.
    pub fn into_snapshot(self) -> Result<WeatherSnapshot> {
        let primary = self.weather.into_iter().next().ok_or(WeatherError::NoCondition)?;

        let mut snapshot = WeatherSnapshot::new(
            WeatherCondition::parse(&primary.main),
            self.main.temp,
            self.main.humidity,
        );
        snapshot.description = primary.description;
        snapshot.wind_speed = self.wind.map(|w| w.speed);
        snapshot.source = WeatherSource::OpenWeatherMap;
        Ok(snapshot)
    }
}
