//! Damage classification types

use serde::{Deserialize, Serialize};
use std::fmt;

/// Crop damage category inferred from an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DamageType {
    /// Drought (brown, dead vegetation)
    #[serde(rename = "DR")]
    Drought,
    /// Good / healthy crop
    #[serde(rename = "G")]
    Healthy,
    /// Nutrient deficiency (yellowing)
    #[serde(rename = "ND")]
    NutrientDeficiency,
    /// Weed damage (mixed patterns)
    #[serde(rename = "WD")]
    WeedDamage,
    #[serde(rename = "other")]
    Other,
}

impl DamageType {
    pub const ALL: [DamageType; 5] = [
        DamageType::Drought,
        DamageType::Healthy,
        DamageType::NutrientDeficiency,
        DamageType::WeedDamage,
        DamageType::Other,
    ];

    /// Short code used in reports ("DR", "G", "ND", "WD", "other")
    pub fn code(&self) -> &'static str {
        match self {
            DamageType::Drought => "DR",
            DamageType::Healthy => "G",
            DamageType::NutrientDeficiency => "ND",
            DamageType::WeedDamage => "WD",
            DamageType::Other => "other",
        }
    }

    /// Human-readable name
    pub fn name(&self) -> &'static str {
        match self {
            DamageType::Drought => "Drought",
            DamageType::Healthy => "Good/Healthy",
            DamageType::NutrientDeficiency => "Nutrient Deficiency",
            DamageType::WeedDamage => "Weed Damage",
            DamageType::Other => "Other Damage",
        }
    }

    /// Parse a report code. Unknown codes map to `None`.
    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.code() == code)
    }
}

impl fmt::Display for DamageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Per-image vegetation analysis output.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DamageIndexResult {
    /// Share of damaged pixels, 0-100, one decimal
    pub damage_percentage: f64,
    pub damage_type_code: DamageType,
    /// Image-average Excess Green index
    pub vegetation_index: f64,
    /// Image-average Excess Red index
    pub stress_index: f64,
}
