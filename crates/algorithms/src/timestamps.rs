//! Capture-time plausibility
//!
//! Evidence photographed long before the claim, or dated after it, is a
//! classic sign of recycled or doctored images.

use agrisure_core::config::TimestampParams;
use agrisure_core::model::{
    round_to, CaptureTimestamp, VerificationScore, VerificationStatus,
};
use chrono::{Duration, NaiveDateTime};
use serde::Serialize;
use tracing::debug;

/// Timestamp check outcome.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimestampReport {
    #[serde(flatten)]
    pub verification: VerificationScore,
    /// Images with a parsable capture time
    pub valid_count: usize,
}

impl TimestampReport {
    pub fn score(&self) -> f64 {
        self.verification.score
    }

    pub fn issues(&self) -> &[String] {
        &self.verification.details
    }
}

/// Compare each capture time against the claim submission time.
///
/// Ages are counted in whole days: an image 30 days and 23 hours old is
/// still within a 30-day window.
pub fn verify_timestamps(
    timestamps: &[CaptureTimestamp],
    claim_time: NaiveDateTime,
    params: &TimestampParams,
) -> TimestampReport {
    let future_limit = Duration::days(-params.max_future_days);
    let mut issues = Vec::new();
    let mut valid_count = 0;

    for ts in timestamps {
        let Some(captured_at) = ts.captured_at else {
            continue;
        };
        valid_count += 1;

        let age = claim_time - captured_at;
        if age.num_days() > params.max_age_days {
            issues.push(format!("Image {} is old ({} days)", ts.filename, age.num_days()));
        } else if age < future_limit {
            issues.push(format!("Image {} has future timestamp", ts.filename));
        }
    }

    let (score, status) = if valid_count == 0 {
        issues.push("No valid EXIF timestamps found".to_string());
        (params.missing_score, VerificationStatus::Warning)
    } else if issues.is_empty() {
        (1.0, VerificationStatus::Pass)
    } else {
        let penalty = issues.len() as f64 * params.issue_penalty;
        ((1.0 - penalty).max(0.0), VerificationStatus::Warning)
    };

    debug!(
        "Timestamps: {}/{} valid, {} issues, score {:.2}",
        valid_count,
        timestamps.len(),
        issues.len(),
        score
    );

    TimestampReport {
        verification: VerificationScore::new(round_to(score, 2), status, issues),
        valid_count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agrisure_core::model::parse_exif_datetime;

    fn at(s: &str) -> NaiveDateTime {
        parse_exif_datetime(s).unwrap()
    }

    fn ts(name: &str, s: &str) -> CaptureTimestamp {
        CaptureTimestamp::new(name, Some(at(s)))
    }

    fn claim() -> NaiveDateTime {
        at("2024:06:15 12:00:00")
    }

    #[test]
    fn test_recent_images_pass() {
        let r = verify_timestamps(
            &[ts("a.jpg", "2024:06:10 09:00:00"), ts("b.jpg", "2024:06:15 11:00:00")],
            claim(),
            &TimestampParams::default(),
        );
        assert_eq!(r.score(), 1.0);
        assert_eq!(r.verification.status, VerificationStatus::Pass);
        assert_eq!(r.valid_count, 2);
        assert!(r.issues().is_empty());
    }

    #[test]
    fn test_stale_image_flagged() {
        let r = verify_timestamps(
            &[ts("old.jpg", "2024:04:01 12:00:00")],
            claim(),
            &TimestampParams::default(),
        );
        assert_eq!(r.score(), 0.8);
        assert_eq!(r.issues(), ["Image old.jpg is old (75 days)"]);
    }

    #[test]
    fn test_whole_day_window() {
        // 30 days 23 hours is not yet stale
        let r = verify_timestamps(
            &[ts("edge.jpg", "2024:05:15 13:00:00")],
            claim(),
            &TimestampParams::default(),
        );
        assert_eq!(r.score(), 1.0);
    }

    #[test]
    fn test_future_image_flagged() {
        let r = verify_timestamps(
            &[
                ts("future.jpg", "2024:06:20 12:00:00"),
                // A few hours ahead is clock skew, not fraud
                ts("skew.jpg", "2024:06:15 20:00:00"),
            ],
            claim(),
            &TimestampParams::default(),
        );
        assert_eq!(r.issues(), ["Image future.jpg has future timestamp"]);
        assert_eq!(r.score(), 0.8);
    }

    #[test]
    fn test_penalty_floors_at_zero() {
        let stale: Vec<_> = (0..7)
            .map(|i| ts(&format!("{}.jpg", i), "2023:01:01 00:00:00"))
            .collect();
        let r = verify_timestamps(&stale, claim(), &TimestampParams::default());
        assert_eq!(r.score(), 0.0);
        assert_eq!(r.issues().len(), 7);
    }

    #[test]
    fn test_no_timestamps_mildly_suspicious() {
        let r = verify_timestamps(
            &[CaptureTimestamp::new("stripped.jpg", None)],
            claim(),
            &TimestampParams::default(),
        );
        assert_eq!(r.score(), 0.8);
        assert_eq!(r.valid_count, 0);
        assert_eq!(r.issues(), ["No valid EXIF timestamps found"]);

        let r = verify_timestamps(&[], claim(), &TimestampParams::default());
        assert_eq!(r.score(), 0.8);
    }
}
