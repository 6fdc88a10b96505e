//! Assessment report
//!
//! The serialized shape of one claim assessment. Nested groups mirror what
//! downstream claim systems consume: `verification_results`,
//! `overall_assessment`, `payout_calculation` and `area_info`.

use crate::area::{AreaMethod, DamagedAreaRange};
use crate::decision::ClaimDecision;
use crate::fraud::{FraudRiskResult, RiskLevel, TamperingReport};
use crate::geolocation::GeolocationReport;
use crate::timestamps::TimestampReport;
use crate::weather::WeatherReport;
use agrisure_core::model::{DamageIndexResult, DamageType};
use chrono::NaiveDateTime;
use serde::Serialize;

/// Assessment id layout, derived from the claim time
pub const ASSESSMENT_ID_FORMAT: &str = "INS_%Y%m%d_%H%M%S";

/// Per-image analysis row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImageAnalysis {
    pub filename: String,
    #[serde(flatten)]
    pub damage: DamageIndexResult,
    pub damage_type_name: &'static str,
    /// `[rows, cols]`
    pub image_size: [usize; 2],
}

/// Mean damage percentage with a ±2σ band, 1 decimal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DamageRange {
    pub min: f64,
    pub mean: f64,
    pub max: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VerificationResults {
    pub geolocation: GeolocationReport,
    pub weather: WeatherReport,
    pub fraud_risk: FraudRiskResult,
    pub exif: TimestampReport,
    pub tampering: TamperingReport,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverallAssessment {
    pub final_decision: ClaimDecision,
    /// Verified confidence, 2 decimals
    pub confidence_score: f64,
    pub risk_level: RiskLevel,
    pub manual_review_required: bool,
    pub decision_reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PayoutCalculation {
    pub sum_insured: f64,
    pub damage_percent: f64,
    pub payout_amount: f64,
    pub currency: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AreaInfo {
    pub total_field_area_m2: f64,
    pub total_field_area_acres: f64,
    pub estimation_method: AreaMethod,
}

/// Complete outcome of one claim.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssessmentResult {
    pub assessment_id: String,
    /// Display name of the dominant damage type
    pub damage_type: &'static str,
    pub damage_type_code: DamageType,
    /// Mean over processed images, 1 decimal
    pub damage_percentage: f64,
    pub damage_percentage_range: DamageRange,
    /// 1 decimal
    pub damaged_area_m2: f64,
    pub damaged_area: DamagedAreaRange,
    pub verification_results: VerificationResults,
    pub overall_assessment: OverallAssessment,
    pub payout_calculation: PayoutCalculation,
    pub area_info: AreaInfo,
    pub images: Vec<ImageAnalysis>,
    pub images_processed: usize,
    pub images_attempted: usize,
    /// Claim submission time
    pub timestamp: NaiveDateTime,
}

impl AssessmentResult {
    pub fn decision(&self) -> ClaimDecision {
        self.overall_assessment.final_decision
    }

    pub fn payout_amount(&self) -> f64 {
        self.payout_calculation.payout_amount
    }
}

/// `INS_YYYYMMDD_HHMMSS`
pub fn assessment_id(claim_time: NaiveDateTime) -> String {
    claim_time.format(ASSESSMENT_ID_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_assessment_id() {
        let t = NaiveDate::from_ymd_opt(2024, 6, 5)
            .unwrap()
            .and_hms_opt(9, 7, 3)
            .unwrap();
        assert_eq!(assessment_id(t), "INS_20240605_090703");
    }

    #[test]
    fn test_image_row_flattens_damage() {
        let row = ImageAnalysis {
            filename: "a.jpg".into(),
            damage: DamageIndexResult {
                damage_percentage: 40.0,
                damage_type_code: DamageType::Drought,
                vegetation_index: -0.02,
                stress_index: 0.21,
            },
            damage_type_name: DamageType::Drought.name(),
            image_size: [480, 640],
        };
        let json = serde_json::to_value(&row).unwrap();
        assert_eq!(json["damage_type_code"], "DR");
        assert_eq!(json["damage_percentage"], 40.0);
        assert_eq!(json["damage_type_name"], "Drought");
        assert_eq!(json["image_size"][1], 640);
    }
}
