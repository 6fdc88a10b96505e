//! Error types for weather lookups.

use thiserror::Error;

/// Errors produced while fetching weather.
#[derive(Error, Debug)]
pub enum WeatherError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("weather API key missing or placeholder")]
    MissingCredential,

    #[error("weather API returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("parsing weather response: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("weather response has no condition entry")]
    NoCondition,

    #[error("runtime error: {0}")]
    Runtime(String),
}

/// Result alias for weather operations.
pub type Result<T> = std::result::Result<T, WeatherError>;

impl From<WeatherError> for agrisure_core::Error {
    fn from(e: WeatherError) -> Self {
        match e {
            WeatherError::MissingCredential => agrisure_core::Error::MissingCredential,
            other => agrisure_core::Error::Weather(other.to_string()),
        }
    }
}
