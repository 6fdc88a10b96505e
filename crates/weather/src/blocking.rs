//! Blocking weather provider.
//!
//! Wraps the async [`OpenWeatherClient`] with a single-threaded Tokio
//! runtime so the synchronous assessment pipeline can use it.

use agrisure_core::model::{Coordinate, WeatherSnapshot};
use agrisure_core::source::{SyntheticWeather, WeatherProvider};
use tracing::warn;

use crate::client::{OpenWeatherClient, OpenWeatherOptions};
use crate::error::{Result, WeatherError};

/// Blocking [`WeatherProvider`] backed by OpenWeatherMap.
pub struct OpenWeatherProvider {
    rt: tokio::runtime::Runtime,
    inner: OpenWeatherClient,
}

impl OpenWeatherProvider {
    /// Create a provider. Fails with `MissingCredential` for an unusable key.
    pub fn new(api_key: Option<&str>, options: OpenWeatherOptions) -> Result<Self> {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| WeatherError::Runtime(e.to_string()))?;

        let inner = OpenWeatherClient::new(api_key, options)?;
        Ok(Self { rt, inner })
    }

    /// Current weather at `at` (blocking).
    pub fn current(&self, at: Coordinate) -> Result<WeatherSnapshot> {
        self.rt.block_on(self.inner.current(at))
    }
}

impl WeatherProvider for OpenWeatherProvider {
    fn fetch(&self, at: Coordinate) -> agrisure_core::Result<WeatherSnapshot> {
        self.current(at).map_err(Into::into)
    }
}

/// Live provider when a usable key is available, synthetic weather otherwise.
pub fn weather_provider(api_key: Option<&str>, options: OpenWeatherOptions) -> Box<dyn WeatherProvider> {
    match OpenWeatherProvider::new(api_key, options) {
        Ok(provider) => Box::new(provider),
        Err(WeatherError::MissingCredential) => {
            warn!("Weather API key missing, using synthetic weather data");
            Box::new(SyntheticWeather)
        }
        Err(e) => {
            warn!("Weather client unavailable ({}), using synthetic weather data", e);
            Box::new(SyntheticWeather)
        }
    }
}
