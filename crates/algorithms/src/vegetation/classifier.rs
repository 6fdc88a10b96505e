//! Damage classification capability

use super::analyzer::analyze_damage;
use agrisure_core::config::{ClassifierKind, VegetationParams};
use agrisure_core::model::DamageIndexResult;
use agrisure_core::{PixelSample, Result};
use tracing::warn;

/// Labels an image with a damage type and damage percentage.
pub trait DamageClassifier: Send + Sync {
    /// Short identifier used in logs
    fn name(&self) -> &'static str;

    fn classify(&self, sample: &PixelSample) -> Result<DamageIndexResult>;
}

/// ExG/ExR threshold classifier. Always available.
#[derive(Debug, Clone, Default)]
pub struct PixelHeuristicClassifier {
    params: VegetationParams,
}

impl PixelHeuristicClassifier {
    pub fn new(params: VegetationParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &VegetationParams {
        &self.params
    }
}

impl DamageClassifier for PixelHeuristicClassifier {
    fn name(&self) -> &'static str {
        "pixel-heuristic"
    }

    fn classify(&self, sample: &PixelSample) -> Result<DamageIndexResult> {
        analyze_damage(sample, &self.params)
    }
}

/// Build the classifier selected by configuration.
///
/// This build carries no model runtime, so a `Learned` selection falls back
/// to the pixel heuristics with a warning rather than failing the claim.
pub fn classifier_for(kind: &ClassifierKind, params: &VegetationParams) -> Box<dyn DamageClassifier> {
    match kind {
        ClassifierKind::PixelHeuristic => Box::new(PixelHeuristicClassifier::new(params.clone())),
        ClassifierKind::Learned { model_path } => {
            warn!(
                "Learned classifier ({}) not available in this build, using pixel heuristics",
                model_path.display()
            );
            Box::new(PixelHeuristicClassifier::new(params.clone()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agrisure_core::model::DamageType;
    use std::path::PathBuf;

    #[test]
    fn test_heuristic_classifier() {
        let c = PixelHeuristicClassifier::default();
        let r = c.classify(&PixelSample::uniform(4, 4, [150, 100, 50])).unwrap();
        assert_eq!(r.damage_type_code, DamageType::Drought);
        assert_eq!(c.name(), "pixel-heuristic");
    }

    #[test]
    fn test_learned_falls_back() {
        let kind = ClassifierKind::Learned {
            model_path: PathBuf::from("missing.onnx"),
        };
        let c = classifier_for(&kind, &VegetationParams::default());
        assert_eq!(c.name(), "pixel-heuristic");
    }
}
