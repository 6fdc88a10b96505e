//! Shared verifier output shape

use serde::{Deserialize, Serialize};
use std::fmt;

/// Outcome category of a verifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VerificationStatus {
    Pass,
    Warning,
    Fail,
    Neutral,
    Match,
    Mismatch,
    /// Verifier could not run; score is the neutral prior
    Skipped,
}

impl fmt::Display for VerificationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            VerificationStatus::Pass => "PASS",
            VerificationStatus::Warning => "WARNING",
            VerificationStatus::Fail => "FAIL",
            VerificationStatus::Neutral => "NEUTRAL",
            VerificationStatus::Match => "MATCH",
            VerificationStatus::Mismatch => "MISMATCH",
            VerificationStatus::Skipped => "SKIPPED",
        };
        f.write_str(s)
    }
}

/// A confidence score in [0, 1] with the findings that produced it.
///
/// Higher is more trustworthy; this is a confidence, not a risk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerificationScore {
    pub score: f64,
    pub status: VerificationStatus,
    pub details: Vec<String>,
}

impl VerificationScore {
    /// Build a score, clamping it to [0, 1].
    pub fn new(score: f64, status: VerificationStatus, details: Vec<String>) -> Self {
        Self {
            score: clamp_unit(score),
            status,
            details,
        }
    }

    /// Neutral 0.5 stand-in for a verifier that could not run.
    pub fn skipped(reason: impl Into<String>) -> Self {
        Self::new(0.5, VerificationStatus::Skipped, vec![reason.into()])
    }
}

/// Clamp to [0, 1]; NaN collapses to 0.
pub fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

/// Round half away from zero to `decimals` places.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_is_clamped() {
        let s = VerificationScore::new(1.4, VerificationStatus::Pass, vec![]);
        assert_eq!(s.score, 1.0);
        let s = VerificationScore::new(-0.3, VerificationStatus::Fail, vec![]);
        assert_eq!(s.score, 0.0);
    }

    #[test]
    fn test_skipped_is_neutral() {
        let s = VerificationScore::skipped("No coordinates");
        assert_eq!(s.score, 0.5);
        assert_eq!(s.status, VerificationStatus::Skipped);
    }

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(0.456, 2), 0.46);
        assert_eq!(round_to(34.25, 1), 34.3);
        assert_eq!(round_to(-0.1234, 3), -0.123);
    }

    #[test]
    fn test_status_serializes_upper() {
        assert_eq!(VerificationStatus::Mismatch.to_string(), "MISMATCH");
    }
}
