//! Claim decision and payout
//!
//! One terminal outcome per claim. The fraud auto-reject flag is checked
//! first and short-circuits everything else; otherwise the verified
//! confidence alone picks the outcome.

use crate::fraud::FraudRiskResult;
use agrisure_core::config::DecisionParams;
use agrisure_core::model::{clamp_unit, round_to};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClaimDecision {
    Approve,
    ManualReview,
    Reject,
}

impl fmt::Display for ClaimDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ClaimDecision::Approve => "APPROVE",
            ClaimDecision::ManualReview => "MANUAL_REVIEW",
            ClaimDecision::Reject => "REJECT",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Decision {
    pub decision: ClaimDecision,
    /// Weighted blend of geolocation, weather and inverted fraud risk
    pub verified_confidence: f64,
    pub reason: String,
}

impl Decision {
    pub fn requires_review(&self) -> bool {
        self.decision == ClaimDecision::ManualReview
    }
}

/// `geo_w·geo + weather_w·weather + fraud_w·(1 − risk)`
pub fn verified_confidence(
    geolocation_score: f64,
    weather_score: f64,
    fraud_risk_score: f64,
    params: &DecisionParams,
) -> f64 {
    clamp_unit(
        params.geolocation_weight * geolocation_score
            + params.weather_weight * weather_score
            + params.fraud_weight * (1.0 - fraud_risk_score),
    )
}

/// Decide the claim outcome.
pub fn decide(
    geolocation_score: f64,
    weather_score: f64,
    fraud: &FraudRiskResult,
    params: &DecisionParams,
) -> Decision {
    let confidence = verified_confidence(geolocation_score, weather_score, fraud.risk_score, params);

    let (decision, reason) = if fraud.auto_reject {
        (
            ClaimDecision::Reject,
            format!("High Fraud Risk ({}) - Auto Rejected", fraud.risk_score),
        )
    } else if confidence >= params.approve_threshold {
        (
            ClaimDecision::Approve,
            format!("High Verification Score ({:.2}) - Approved", confidence),
        )
    } else if confidence >= params.review_threshold {
        (
            ClaimDecision::ManualReview,
            format!("Moderate Verification Score ({:.2}) - Manual Review Required", confidence),
        )
    } else {
        (
            ClaimDecision::Reject,
            format!("Low Verification Score ({:.2}) - Rejected", confidence),
        )
    };

    info!("Decision: {} ({})", decision, reason);

    Decision {
        decision,
        verified_confidence: confidence,
        reason,
    }
}

/// Payout owed for `decision`, 2 decimals. Zero unless approved.
pub fn payout(decision: ClaimDecision, damage_percentage: f64, sum_insured: f64) -> f64 {
    match decision {
        ClaimDecision::Approve => round_to(damage_percentage / 100.0 * sum_insured, 2),
        ClaimDecision::ManualReview | ClaimDecision::Reject => 0.0,
    }
}
