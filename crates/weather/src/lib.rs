//! # agrisure weather
//!
//! Current-weather lookups from OpenWeatherMap for the weather correlation
//! check.
//!
//! - [`OpenWeatherClient`]: async client (`reqwest`)
//! - [`OpenWeatherProvider`]: blocking wrapper implementing
//!   [`agrisure_core::source::WeatherProvider`]
//! - [`weather_provider`]: picks the live provider or the synthetic fallback

pub mod blocking;
pub mod client;
pub mod error;
pub mod models;

pub use blocking::{weather_provider, OpenWeatherProvider};
pub use client::{
    resolve_api_key, OpenWeatherClient, OpenWeatherOptions, API_KEY_ENV, DEFAULT_BASE_URL,
    PLACEHOLDER_API_KEY,
};
pub use error::{Result, WeatherError};
pub use models::CurrentWeatherResponse;
