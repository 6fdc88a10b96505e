//! Vegetation damage analysis
//!
//! Closed-form damage estimation from RGB photographs:
//! - Chromaticity indices: ExG, ExR, luminance
//! - Masks: soil, healthy, stress, combined damage
//! - Per-image damage percentage and damage type
//! - Batch aggregation (mean, spread, dominant type)

mod analyzer;
mod classifier;
mod indices;

pub use analyzer::{
    analyze_damage, classify_damage_type, summarize_damage, DamageSummary, DROUGHT_AVG_EXR,
    HEALTHY_AVG_EXG, NUTRIENT_AVG_EXG, WEED_AVG_EXR,
};
pub use classifier::{classifier_for, DamageClassifier, PixelHeuristicClassifier};
pub use indices::{
    chromaticity, damage_mask, excess_green, excess_green_value, excess_red, excess_red_value,
    healthy_mask, luma, soil_mask, stress_mask, PixelIndices,
};
