//! Async OpenWeatherMap client.

use std::time::Duration;

use agrisure_core::model::{Coordinate, WeatherSnapshot};
use tracing::debug;

use crate::error::{Result, WeatherError};
use crate::models::CurrentWeatherResponse;

/// OpenWeatherMap API root
pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";

/// Value shipped in sample configuration files; treated as no key at all.
pub const PLACEHOLDER_API_KEY: &str = "your_openweathermap_api_key_here";

/// Environment variable consulted for the key
pub const API_KEY_ENV: &str = "WEATHER_API_KEY";

/// Configuration for [`OpenWeatherClient`].
#[derive(Debug, Clone)]
pub struct OpenWeatherOptions {
    /// API root, without the `/weather` path
    pub base_url: String,
    /// Per-request timeout (default 5 s).
    pub request_timeout: Duration,
    /// Retries on transport errors and 5xx responses (default 1).
    pub max_retries: u32,
}

impl Default for OpenWeatherOptions {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout: Duration::from_secs(5),
            max_retries: 1,
        }
    }
}

/// Validate an API key. Empty and placeholder keys are missing credentials.
pub fn resolve_api_key(key: Option<&str>) -> Result<String> {
    match key.map(str::trim) {
        Some(k) if !k.is_empty() && k != PLACEHOLDER_API_KEY => Ok(k.to_string()),
        _ => Err(WeatherError::MissingCredential),
    }
}

/// Async client for the current-weather endpoint.
pub struct OpenWeatherClient {
    client: reqwest::Client,
    api_key: String,
    options: OpenWeatherOptions,
}

impl OpenWeatherClient {
    /// Create a client. Fails with `MissingCredential` for an unusable key.
    pub fn new(api_key: Option<&str>, options: OpenWeatherOptions) -> Result<Self> {
        let api_key = resolve_api_key(api_key)?;
        let client = reqwest::Client::builder()
            .timeout(options.request_timeout)
            .build()?;

        Ok(Self {
            client,
            api_key,
            options,
        })
    }

    /// Full URL of the current-weather endpoint.
    pub fn endpoint(&self) -> String {
        format!("{}/weather", self.options.base_url.trim_end_matches('/'))
    }

    /// Current weather at `at`, in metric units.
    pub async fn current(&self, at: Coordinate) -> Result<WeatherSnapshot> {
        let url = self.endpoint();
        let mut last_err = None;

        for attempt in 0..=self.options.max_retries {
            if attempt > 0 {
                // Exponential backoff: 500ms, 1s, 2s, ...
                let delay = Duration::from_millis(500 * (1 << (attempt - 1)));
                tokio::time::sleep(delay).await;
            }

            let resp = self
                .client
                .get(&url)
                .query(&[
                    ("lat", at.lat.to_string()),
                    ("lon", at.lon.to_string()),
                    ("appid", self.api_key.clone()),
                    ("units", "metric".to_string()),
                ])
                .send()
                .await;

            match resp {
                Ok(r) if r.status().is_success() => {
                    let body = r.text().await?;
                    let parsed: CurrentWeatherResponse = serde_json::from_str(&body)?;
                    let snapshot = parsed.into_snapshot()?;
                    debug!(
                        "Weather at ({:.4}, {:.4}): {} {}°C {}%",
                        at.lat, at.lon, snapshot.condition, snapshot.temp_c, snapshot.humidity_pct
                    );
                    return Ok(snapshot);
                }
                Ok(r) => {
                    let status = r.status();
                    let body = r.text().await.unwrap_or_default();
                    last_err = Some(WeatherError::Status {
                        status: status.as_u16(),
                        body: body.chars().take(200).collect(),
                    });
                    // Bad key or bad request will not improve on retry
                    if status.is_client_error() {
                        break;
                    }
                }
                Err(e) => {
                    last_err = Some(WeatherError::Http(e));
                }
            }
        }

        Err(last_err.unwrap_or_else(|| WeatherError::Runtime("weather request failed".into())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_api_key() {
        assert_eq!(resolve_api_key(Some(" abc123 ")).unwrap(), "abc123");
        assert!(matches!(resolve_api_key(None), Err(WeatherError::MissingCredential)));
        assert!(matches!(resolve_api_key(Some("")), Err(WeatherError::MissingCredential)));
        assert!(matches!(
            resolve_api_key(Some(PLACEHOLDER_API_KEY)),
            Err(WeatherError::MissingCredential)
        ));
    }

    #[test]
    fn test_endpoint() {
        let options = OpenWeatherOptions {
            base_url: "http://localhost:8080/data/2.5/".into(),
            ..Default::default()
        };
        let client = OpenWeatherClient::new(Some("k"), options).unwrap();
        assert_eq!(client.endpoint(), "http://localhost:8080/data/2.5/weather");
    }

    #[test]
    fn test_default_options() {
        let o = OpenWeatherOptions::default();
        assert_eq!(o.request_timeout, Duration::from_secs(5));
        assert_eq!(o.base_url, DEFAULT_BASE_URL);
    }
}
