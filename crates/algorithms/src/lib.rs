//! # agrisure algorithms
//!
//! Evidence analysis and decisioning for crop-damage insurance claims.
//!
//! ## Stages
//!
//! - **vegetation**: ExG/ExR indices, damage masks, per-image damage and type
//! - **geolocation**: capture-position clustering (haversine spread, outliers)
//! - **weather**: weather / damage-type correlation
//! - **timestamps**: capture-time plausibility
//! - **fraud**: composite fraud risk, software-tag tampering check
//! - **area**: field and damaged area estimation
//! - **decision**: approve / manual review / reject, payout
//! - **pipeline**: the full per-claim assessment

pub mod area;
pub mod decision;
pub mod fraud;
pub mod geolocation;
pub mod pipeline;
pub mod report;
pub mod timestamps;
pub mod vegetation;
pub mod weather;

pub(crate) mod maybe_rayon;

pub use pipeline::{ClaimAssessor, ClaimRequest};
pub use report::AssessmentResult;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::area::{
        acres_to_m2, damaged_area, damaged_area_range, estimate_area, ground_coverage_m2,
        m2_to_acres, AreaEstimate, AreaMethod, ImageFootprint, ACRE_M2,
    };
    pub use crate::decision::{decide, payout, ClaimDecision, Decision};
    pub use crate::fraud::{
        compose_fraud_risk, detect_metadata_tampering, FraudInputs, FraudRiskResult, RiskLevel,
    };
    pub use crate::geolocation::{haversine_km, verify_geolocation, GeolocationReport};
    pub use crate::pipeline::{ClaimAssessor, ClaimRequest};
    pub use crate::report::AssessmentResult;
    pub use crate::timestamps::{verify_timestamps, TimestampReport};
    pub use crate::vegetation::{
        analyze_damage, classifier_for, summarize_damage, DamageClassifier,
        PixelHeuristicClassifier,
    };
    pub use crate::weather::{verify_weather, WeatherReport};
    pub use agrisure_core::prelude::*;
}
