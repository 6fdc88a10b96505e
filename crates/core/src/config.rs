//! Assessment configuration
//!
//! All thresholds live in one explicit [`AssessmentConfig`] value handed to
//! each component when it is built. Every section deserializes with its
//! defaults filled in, so a config file only needs the values it changes.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Thresholds for the pixel-index damage analyzer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VegetationParams {
    /// Added to R+G+B before normalizing, keeps black pixels finite
    pub epsilon: f64,
    /// Luminance strictly above this may be soil
    pub soil_luma_min: f64,
    /// Luminance strictly below this may be soil
    pub soil_luma_max: f64,
    /// ExG above this is healthy vegetation
    pub healthy_exg: f64,
    /// ExR above this is stressed vegetation
    pub stress_exr: f64,
}

impl Default for VegetationParams {
    fn default() -> Self {
        Self {
            epsilon: 1e-6,
            soil_luma_min: 80.0,
            soil_luma_max: 180.0,
            healthy_exg: 0.05,
            stress_exr: 0.1,
        }
    }
}

/// Thresholds for the coordinate cluster check
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeolocationParams {
    pub fail_spread_km: f64,
    pub warning_spread_km: f64,
    pub earth_radius_km: f64,
    /// Outlier threshold in standard deviations from the mean distance
    pub outlier_sigma: f64,
    /// Outliers must also lie at least this far from the centroid
    pub outlier_min_km: f64,
    /// Outlier detection is skipped when the average spread is below this
    pub outlier_min_avg_km: f64,
    pub outlier_penalty: f64,
}

impl Default for GeolocationParams {
    fn default() -> Self {
        Self {
            fail_spread_km: 5.0,
            warning_spread_km: 2.0,
            earth_radius_km: 6371.0,
            outlier_sigma: 2.0,
            outlier_min_km: 0.5,
            outlier_min_avg_km: 0.01,
            outlier_penalty: 0.1,
        }
    }
}

/// Thresholds for capture-time plausibility
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimestampParams {
    /// Whole days before the claim after which an image is stale
    pub max_age_days: i64,
    /// An image dated more than this many days after the claim is impossible
    pub max_future_days: i64,
    pub issue_penalty: f64,
    /// Score when no image has a usable timestamp
    pub missing_score: f64,
}

impl Default for TimestampParams {
    fn default() -> Self {
        Self {
            max_age_days: 30,
            max_future_days: 1,
            issue_penalty: 0.2,
            missing_score: 0.8,
        }
    }
}

/// Relative weight of each sub-risk in the composite fraud risk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskWeights {
    pub geolocation: f64,
    pub tampering: f64,
    pub weather: f64,
    pub exif: f64,
}

impl Default for RiskWeights {
    fn default() -> Self {
        Self {
            geolocation: 0.35,
            tampering: 0.25,
            weather: 0.25,
            exif: 0.15,
        }
    }
}

/// Fraud risk composition thresholds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FraudParams {
    pub weights: RiskWeights,
    pub medium_threshold: f64,
    pub high_threshold: f64,
    pub auto_reject_threshold: f64,
    /// Tampering score lost per image edited with a known tool
    pub edit_penalty: f64,
    /// Lower-case substrings of `Software` tags that indicate editing
    pub editing_tools: Vec<String>,
}

impl Default for FraudParams {
    fn default() -> Self {
        Self {
            weights: RiskWeights::default(),
            medium_threshold: 0.6,
            high_threshold: 0.8,
            auto_reject_threshold: 0.9,
            edit_penalty: 0.3,
            editing_tools: ["photoshop", "gimp", "editor", "paint"]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}

/// Field area estimation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AreaParams {
    /// Ground coverage assumed per image without altitude data, m²
    pub default_coverage_m2: f64,
    /// Minimum coordinate spread before the GPS estimate is trusted
    pub gps_spread_min_km: f64,
    /// Camera field of view used for altitude-based coverage
    pub default_fov_degrees: f64,
    /// Relative uncertainty applied to damaged-area ranges
    pub variance_factor: f64,
    pub use_exif_altitude: bool,
}

impl Default for AreaParams {
    fn default() -> Self {
        Self {
            default_coverage_m2: 1500.0,
            gps_spread_min_km: 0.05,
            default_fov_degrees: 60.0,
            variance_factor: 0.15,
            use_exif_altitude: true,
        }
    }
}

/// Decision thresholds and fusion weights
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecisionParams {
    pub approve_threshold: f64,
    pub review_threshold: f64,
    pub geolocation_weight: f64,
    pub weather_weight: f64,
    pub fraud_weight: f64,
}

impl Default for DecisionParams {
    fn default() -> Self {
        Self {
            approve_threshold: 0.75,
            review_threshold: 0.40,
            geolocation_weight: 0.4,
            weather_weight: 0.4,
            fraud_weight: 0.2,
        }
    }
}

/// Which damage classifier labels images
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ClassifierKind {
    /// Closed-form ExG/ExR heuristics
    #[default]
    PixelHeuristic,
    /// Trained model loaded from disk
    Learned { model_path: PathBuf },
}

/// Complete configuration for one assessment run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssessmentConfig {
    pub vegetation: VegetationParams,
    pub geolocation: GeolocationParams,
    pub timestamps: TimestampParams,
    pub fraud: FraudParams,
    pub area: AreaParams,
    pub decision: DecisionParams,
    pub classifier: ClassifierKind,
    /// Currency label on payouts
    pub currency: String,
    /// Analyze images of one claim in parallel
    pub parallel: bool,
}

impl Default for AssessmentConfig {
    fn default() -> Self {
        Self {
            vegetation: VegetationParams::default(),
            geolocation: GeolocationParams::default(),
            timestamps: TimestampParams::default(),
            fraud: FraudParams::default(),
            area: AreaParams::default(),
            decision: DecisionParams::default(),
            classifier: ClassifierKind::default(),
            currency: "INR".to_string(),
            parallel: true,
        }
    }
}

impl AssessmentConfig {
    /// Reject configurations that would make scores meaningless.
    pub fn validate(&self) -> Result<()> {
        let v = &self.vegetation;
        if v.epsilon <= 0.0 {
            return Err(invalid("vegetation.epsilon", v.epsilon, "must be positive"));
        }
        if v.soil_luma_min >= v.soil_luma_max {
            return Err(invalid(
                "vegetation.soil_luma_min",
                v.soil_luma_min,
                "must be below soil_luma_max",
            ));
        }

        let g = &self.geolocation;
        if g.warning_spread_km > g.fail_spread_km {
            return Err(invalid(
                "geolocation.warning_spread_km",
                g.warning_spread_km,
                "must not exceed fail_spread_km",
            ));
        }
        if g.earth_radius_km <= 0.0 {
            return Err(invalid(
                "geolocation.earth_radius_km",
                g.earth_radius_km,
                "must be positive",
            ));
        }

        let f = &self.fraud;
        let w = &f.weights;
        let total = w.geolocation + w.tampering + w.weather + w.exif;
        if (total - 1.0).abs() > 1e-6 {
            return Err(invalid("fraud.weights", total, "must sum to 1"));
        }
        if !(f.medium_threshold <= f.high_threshold && f.high_threshold <= f.auto_reject_threshold)
        {
            return Err(invalid(
                "fraud.high_threshold",
                f.high_threshold,
                "thresholds must be ordered medium <= high <= auto_reject",
            ));
        }

        if self.area.default_coverage_m2 <= 0.0 {
            return Err(invalid(
                "area.default_coverage_m2",
                self.area.default_coverage_m2,
                "must be positive",
            ));
        }
        if !(0.0..180.0).contains(&self.area.default_fov_degrees) {
            return Err(invalid(
                "area.default_fov_degrees",
                self.area.default_fov_degrees,
                "must be in [0, 180)",
            ));
        }

        let d = &self.decision;
        if d.review_threshold > d.approve_threshold {
            return Err(invalid(
                "decision.review_threshold",
                d.review_threshold,
                "must not exceed approve_threshold",
            ));
        }
        let total = d.geolocation_weight + d.weather_weight + d.fraud_weight;
        if (total - 1.0).abs() > 1e-6 {
            return Err(invalid("decision weights", total, "must sum to 1"));
        }

        Ok(())
    }
}

fn invalid(name: &'static str, value: impl ToString, reason: &str) -> Error {
    Error::InvalidParameter {
        name,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}
