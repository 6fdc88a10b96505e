//! Weather / damage-type correlation
//!
//! Checks whether the weather at the claim location is plausible for the
//! damage type seen in the photos (e.g. drought under heavy rain is not).

use agrisure_core::model::{
    round_to, DamageType, VerificationScore, VerificationStatus, WeatherCondition,
    WeatherSnapshot,
};
use serde::Serialize;
use tracing::debug;

use WeatherCondition::*;

/// Weather conditions that support or contradict a damage type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Correlation {
    pub supporting: &'static [WeatherCondition],
    pub contradicting: &'static [WeatherCondition],
}

/// Drought is supported above this temperature (°C)
pub const DROUGHT_HOT_C: f64 = 30.0;
/// Drought is contradicted below this temperature (°C)
pub const DROUGHT_COOL_C: f64 = 20.0;
/// Drought is supported below this relative humidity (%)
pub const DROUGHT_DRY_PCT: f64 = 40.0;
/// Drought is contradicted above this relative humidity (%)
pub const DROUGHT_HUMID_PCT: f64 = 80.0;

const MIN_SCORE: f64 = 0.1;
const MAX_SCORE: f64 = 0.99;

/// Static correlation table.
pub fn correlation(damage: DamageType) -> Correlation {
    match damage {
        DamageType::Drought => Correlation {
            supporting: &[Clear, Clouds],
            contradicting: &[Rain, Thunderstorm, Drizzle, Snow],
        },
        DamageType::NutrientDeficiency => Correlation {
            supporting: &[Rain, Extreme, Clear, Clouds],
            contradicting: &[],
        },
        DamageType::WeedDamage => Correlation {
            supporting: &[Rain, Clear, Clouds, Drizzle],
            contradicting: &[Snow, Extreme],
        },
        DamageType::Healthy => Correlation {
            supporting: &[Clear, Clouds, Rain],
            contradicting: &[Extreme],
        },
        DamageType::Other => Correlation {
            supporting: &[],
            contradicting: &[],
        },
    }
}

/// Weather verifier outcome, with the observation it was based on.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeatherReport {
    #[serde(flatten)]
    pub verification: VerificationScore,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weather_context: Option<WeatherSnapshot>,
}

impl WeatherReport {
    /// Neutral stand-in when no location is known.
    pub fn skipped(reason: impl Into<String>) -> Self {
        Self {
            verification: VerificationScore::skipped(reason),
            weather_context: None,
        }
    }

    pub fn confidence_score(&self) -> f64 {
        self.verification.score
    }

    pub fn status(&self) -> VerificationStatus {
        self.verification.status
    }
}

/// Score how well `weather` explains `damage`.
///
/// Starts neutral at 0.5; the result is clamped to [0.1, 0.99].
pub fn verify_weather(weather: &WeatherSnapshot, damage: DamageType) -> WeatherReport {
    let table = correlation(damage);
    let condition = weather.condition;
    let code = damage.code();

    let mut score: f64 = 0.5;
    let mut status = VerificationStatus::Neutral;
    let mut details = Vec::new();

    if table.supporting.contains(&condition) {
        score += 0.3;
        details.push(format!("Weather '{}' supports '{}'", condition, code));
    } else if table.contradicting.contains(&condition) {
        score -= 0.4;
        status = VerificationStatus::Mismatch;
        details.push(format!("Weather '{}' contradicts '{}'", condition, code));
    }

    if damage == DamageType::Drought {
        let temp = weather.temp_c;
        if temp > DROUGHT_HOT_C {
            score += 0.2;
            details.push(format!("High temp ({}°C) supports Drought", temp));
        } else if temp < DROUGHT_COOL_C {
            score -= 0.2;
            details.push(format!("Low temp ({}°C) contradicts Drought", temp));
        }

        let humidity = weather.humidity_pct;
        if humidity < DROUGHT_DRY_PCT {
            score += 0.1;
            details.push(format!("Low humidity ({}%) supports Drought", humidity));
        } else if humidity > DROUGHT_HUMID_PCT {
            score -= 0.3;
            status = VerificationStatus::Mismatch;
            details.push(format!("High humidity ({}%) contradicts Drought", humidity));
        }
    }

    let score = score.clamp(MIN_SCORE, MAX_SCORE);
    if score > 0.7 {
        status = VerificationStatus::Match;
    } else if score < 0.3 {
        status = VerificationStatus::Mismatch;
    }

    debug!("Weather {} vs {}: {:.2} ({})", condition, code, score, status);

    WeatherReport {
        verification: VerificationScore::new(round_to(score, 2), status, details),
        weather_context: Some(weather.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn snapshot(condition: WeatherCondition, temp: f64, humidity: f64) -> WeatherSnapshot {
        WeatherSnapshot::new(condition, temp, humidity)
    }

    #[test]
    fn test_hot_dry_clear_supports_drought() {
        let r = verify_weather(&snapshot(Clear, 33.0, 30.0), DamageType::Drought);
        assert_eq!(r.status(), VerificationStatus::Match);
        assert_relative_eq!(r.confidence_score(), 0.99);
        assert_eq!(r.verification.details.len(), 3);
    }

    #[test]
    fn test_rain_contradicts_drought() {
        let r = verify_weather(&snapshot(Rain, 24.0, 75.0), DamageType::Drought);
        // 0.5 - 0.4 = 0.1
        assert_eq!(r.status(), VerificationStatus::Mismatch);
        assert_relative_eq!(r.confidence_score(), 0.1);
    }

    #[test]
    fn test_humid_drought_forced_mismatch() {
        // Clear (+0.3), mild temp, humidity 85 (-0.3) -> 0.5 but MISMATCH
        let r = verify_weather(&snapshot(Clear, 25.0, 85.0), DamageType::Drought);
        assert_relative_eq!(r.confidence_score(), 0.5);
        assert_eq!(r.status(), VerificationStatus::Mismatch);
    }

    #[test]
    fn test_floor_clamp() {
        // Snow (-0.4), cold (-0.2), humid (-0.3) -> -0.4 -> 0.1
        let r = verify_weather(&snapshot(Snow, 5.0, 90.0), DamageType::Drought);
        assert_relative_eq!(r.confidence_score(), 0.1);
        assert_eq!(r.status(), VerificationStatus::Mismatch);
    }

    #[test]
    fn test_supporting_non_drought() {
        let r = verify_weather(&snapshot(Rain, 10.0, 95.0), DamageType::WeedDamage);
        // Temperature and humidity only matter for drought
        assert_relative_eq!(r.confidence_score(), 0.8);
        assert_eq!(r.status(), VerificationStatus::Match);
    }

    #[test]
    fn test_unrelated_condition_is_neutral() {
        let r = verify_weather(&snapshot(Unknown, 25.0, 50.0), DamageType::Other);
        assert_relative_eq!(r.confidence_score(), 0.5);
        assert_eq!(r.status(), VerificationStatus::Neutral);
        assert!(r.verification.details.is_empty());
    }

    #[test]
    fn test_score_always_in_band() {
        let conditions = [Clear, Clouds, Rain, Drizzle, Thunderstorm, Snow, Extreme, Unknown];
        for damage in DamageType::ALL {
            for condition in conditions {
                for (t, h) in [(5.0, 95.0), (25.0, 50.0), (40.0, 10.0)] {
                    let s = verify_weather(&snapshot(condition, t, h), damage).confidence_score();
                    assert!((0.1..=0.99).contains(&s), "{:?} {:?} -> {}", damage, condition, s);
                }
            }
        }
    }

    #[test]
    fn test_skipped_is_neutral() {
        let r = WeatherReport::skipped("No coordinates");
        assert_eq!(r.confidence_score(), 0.5);
        assert_eq!(r.status(), VerificationStatus::Skipped);
        assert!(r.weather_context.is_none());
    }
}
