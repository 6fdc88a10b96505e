//! Fraud risk composition
//!
//! Verifier outputs are confidences (1 = trustworthy). Here they are
//! inverted into risks and blended into one score with a level and an
//! auto-reject flag.

use agrisure_core::config::FraudParams;
use agrisure_core::model::{clamp_unit, round_to};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use tracing::debug;

/// Coarse fraud risk band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RiskLevel::Low => "LOW",
            RiskLevel::Medium => "MEDIUM",
            RiskLevel::High => "HIGH",
        })
    }
}

/// Confidence inputs to the composer, each in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FraudInputs {
    pub geolocation: f64,
    pub weather: f64,
    /// Timestamp plausibility score
    pub exif: f64,
    /// 1.0 when nothing suggests editing
    pub tampering: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FraudRiskResult {
    /// Composite risk, 2 decimals
    pub risk_score: f64,
    pub risk_level: RiskLevel,
    pub auto_reject: bool,
    /// Per-input risks, 2 decimals
    pub factors: BTreeMap<String, f64>,
}

/// Blend the four confidences into a fraud risk.
///
/// Level and auto-reject are decided on the unrounded composite; only the
/// reported figures are rounded.
pub fn compose_fraud_risk(inputs: &FraudInputs, params: &FraudParams) -> FraudRiskResult {
    let geo_risk = 1.0 - clamp_unit(inputs.geolocation);
    let weather_risk = 1.0 - clamp_unit(inputs.weather);
    let exif_risk = 1.0 - clamp_unit(inputs.exif);
    let tampering_risk = 1.0 - clamp_unit(inputs.tampering);

    let w = &params.weights;
    let risk = clamp_unit(
        w.geolocation * geo_risk
            + w.tampering * tampering_risk
            + w.weather * weather_risk
            + w.exif * exif_risk,
    );

    let risk_level = if risk >= params.high_threshold {
        RiskLevel::High
    } else if risk >= params.medium_threshold {
        RiskLevel::Medium
    } else {
        RiskLevel::Low
    };
    let auto_reject = risk >= params.auto_reject_threshold;

    debug!(
        "Fraud risk {:.4} ({}), auto_reject={}",
        risk, risk_level, auto_reject
    );

    let factors = [
        ("geolocation_risk", geo_risk),
        ("tampering_risk", tampering_risk),
        ("weather_risk", weather_risk),
        ("exif_risk", exif_risk),
    ]
    .into_iter()
    .map(|(name, r)| (name.to_string(), round_to(r, 2)))
    .collect();

    FraudRiskResult {
        risk_score: round_to(risk, 2),
        risk_level,
        auto_reject,
        factors,
    }
}

/// Software-tag tampering check.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TamperingReport {
    pub score: f64,
    pub traces: Vec<String>,
}

/// Penalise every image whose `Software` tag names a known editing tool.
///
/// `images` pairs a filename with its software tag, if any.
pub fn detect_metadata_tampering<'a, I>(images: I, params: &FraudParams) -> TamperingReport
where
    I: IntoIterator<Item = (&'a str, Option<&'a str>)>,
{
    let traces: Vec<String> = images
        .into_iter()
        .filter_map(|(filename, software)| {
            let software = software?.to_lowercase();
            params
                .editing_tools
                .iter()
                .any(|tool| software.contains(&tool.to_lowercase()))
                .then(|| format!("Image {} edited with {}", filename, software))
        })
        .collect();

    let score = (1.0 - traces.len() as f64 * params.edit_penalty).max(0.0);
    TamperingReport {
        score: round_to(score, 2),
        traces,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn inputs(geolocation: f64, weather: f64, exif: f64, tampering: f64) -> FraudInputs {
        FraudInputs {
            geolocation,
            weather,
            exif,
            tampering,
        }
    }

    fn params() -> FraudParams {
        FraudParams::default()
    }

    #[test]
    fn test_all_trustworthy_is_zero_risk() {
        let r = compose_fraud_risk(&inputs(1.0, 1.0, 1.0, 1.0), &params());
        assert_eq!(r.risk_score, 0.0);
        assert_eq!(r.risk_level, RiskLevel::Low);
        assert!(!r.auto_reject);
    }

    #[test]
    fn test_all_untrustworthy_auto_rejects() {
        let r = compose_fraud_risk(&inputs(0.0, 0.0, 0.0, 0.0), &params());
        assert_relative_eq!(r.risk_score, 1.0);
        assert_eq!(r.risk_level, RiskLevel::High);
        assert!(r.auto_reject);
    }

    #[test]
    fn test_weighted_blend() {
        // 0.35*0.8 + 0.25*0 + 0.25*0.01 + 0.15*0.2 = 0.3125
        let r = compose_fraud_risk(&inputs(0.2, 0.99, 0.8, 1.0), &params());
        assert_relative_eq!(r.risk_score, 0.31);
        assert_eq!(r.risk_level, RiskLevel::Low);
        assert_eq!(r.factors["geolocation_risk"], 0.8);
        assert_eq!(r.factors["tampering_risk"], 0.0);
        assert_eq!(r.factors["weather_risk"], 0.01);
        assert_eq!(r.factors["exif_risk"], 0.2);
    }

    #[test]
    fn test_levels() {
        // 0.35 + 0.25 + 0.25*0.2 = 0.65
        let r = compose_fraud_risk(&inputs(0.0, 0.8, 1.0, 0.0), &params());
        assert_eq!(r.risk_level, RiskLevel::Medium);
        // plus weather: 0.85
        let r = compose_fraud_risk(&inputs(0.0, 0.0, 1.0, 0.0), &params());
        assert_eq!(r.risk_level, RiskLevel::High);
        assert!(!r.auto_reject);
    }

    #[test]
    fn test_auto_reject_implies_high_score() {
        let steps = [0.0, 0.1, 0.3, 0.5, 0.7, 0.9, 1.0];
        for &g in &steps {
            for &w in &steps {
                for &e in &steps {
                    let r = compose_fraud_risk(&inputs(g, w, e, 0.0), &params());
                    assert!((0.0..=1.0).contains(&r.risk_score));
                    if r.auto_reject {
                        assert!(r.risk_score >= 0.9);
                        assert_eq!(r.risk_level, RiskLevel::High);
                    }
                }
            }
        }
    }

    #[test]
    fn test_tampering_clean() {
        let r = detect_metadata_tampering(
            [("a.jpg", None), ("b.jpg", Some("Camera v1.2"))],
            &params(),
        );
        assert_eq!(r.score, 1.0);
        assert!(r.traces.is_empty());
    }

    #[test]
    fn test_tampering_detected() {
        let r = detect_metadata_tampering(
            [
                ("a.jpg", Some("Adobe Photoshop CC 2019")),
                ("b.jpg", Some("GIMP 2.10")),
                ("c.jpg", Some("Camera v1.2")),
            ],
            &params(),
        );
        assert_eq!(r.score, 0.4);
        assert_eq!(r.traces.len(), 2);
        assert_eq!(r.traces[0], "Image a.jpg edited with adobe photoshop cc 2019");
    }

    #[test]
    fn test_tampering_floor() {
        let images = vec![("x.jpg", Some("Paint.NET")); 5];
        let r = detect_metadata_tampering(images, &params());
        assert_eq!(r.score, 0.0);
    }

    #[test]
    fn test_risk_level_serializes_upper() {
        assert_eq!(serde_json::to_string(&RiskLevel::Medium).unwrap(), "\"MEDIUM\"");
    }
}
