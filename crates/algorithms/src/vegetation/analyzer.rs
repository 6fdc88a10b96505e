//! Per-image damage analysis and batch aggregation

use super::indices::PixelIndices;
use crate::maybe_rayon::*;
use agrisure_core::config::VegetationParams;
use agrisure_core::model::{round_to, DamageIndexResult, DamageType};
use agrisure_core::{Error, PixelSample, Result};
use serde::Serialize;

/// Image-average ExG above which the crop is healthy
pub const HEALTHY_AVG_EXG: f64 = 0.1;
/// Image-average ExR above which the crop is drought-damaged
pub const DROUGHT_AVG_EXR: f64 = 0.15;
/// Image-average ExG below which nutrient deficiency is assumed
pub const NUTRIENT_AVG_EXG: f64 = -0.1;
/// Minimum image-average ExR for weed damage
pub const WEED_AVG_EXR: f64 = 0.05;

#[derive(Debug, Clone, Copy, Default)]
struct Tally {
    exg: f64,
    exr: f64,
    damaged: usize,
}

impl Tally {
    fn merge(self, other: Tally) -> Tally {
        Tally {
            exg: self.exg + other.exg,
            exr: self.exr + other.exr,
            damaged: self.damaged + other.damaged,
        }
    }
}

/// Compute damage percentage, damage type and mean indices for one image.
///
/// Single pass over the pixels: rows are tallied independently and summed.
pub fn analyze_damage(sample: &PixelSample, params: &VegetationParams) -> Result<DamageIndexResult> {
    let (rows, cols) = sample.shape();
    if sample.is_empty() {
        return Err(Error::InvalidDimensions {
            width: cols,
            height: rows,
        });
    }

    let (red, green, blue) = (sample.red().view(), sample.green().view(), sample.blue().view());

    let row_tallies: Vec<Tally> = (0..rows)
        .into_par_iter()
        .map(|row| {
            let mut t = Tally::default();
            for col in 0..cols {
                let px = PixelIndices::compute(
                    [red[(row, col)], green[(row, col)], blue[(row, col)]],
                    params,
                );
                t.exg += px.exg;
                t.exr += px.exr;
                if px.damaged() {
                    t.damaged += 1;
                }
            }
            t
        })
        .collect();

    let total = row_tallies.into_iter().fold(Tally::default(), Tally::merge);
    let n = sample.len() as f64;
    let avg_exg = total.exg / n;
    let avg_exr = total.exr / n;
    let damage_percentage = (total.damaged as f64 / n * 100.0).clamp(0.0, 100.0);

    Ok(DamageIndexResult {
        damage_percentage: round_to(damage_percentage, 1),
        damage_type_code: classify_damage_type(avg_exg, avg_exr),
        vegetation_index: round_to(avg_exg, 3),
        stress_index: round_to(avg_exr, 3),
    })
}

/// Damage type from image-average ExG / ExR.
///
/// Rules are checked in order; the first match wins.
pub fn classify_damage_type(avg_exg: f64, avg_exr: f64) -> DamageType {
    if avg_exg > HEALTHY_AVG_EXG {
        DamageType::Healthy
    } else if avg_exr > DROUGHT_AVG_EXR {
        DamageType::Drought
    } else if avg_exg < NUTRIENT_AVG_EXG {
        DamageType::NutrientDeficiency
    } else if avg_exg > 0.0 && avg_exg < HEALTHY_AVG_EXG && avg_exr > WEED_AVG_EXR {
        DamageType::WeedDamage
    } else {
        DamageType::Other
    }
}

/// Claim-level view of the per-image results.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DamageSummary {
    /// Mean damage percentage over all images
    pub mean: f64,
    /// Population standard deviation of the damage percentages
    pub std_dev: f64,
    /// `max(0, mean - 2σ)`
    pub min: f64,
    /// `min(100, mean + 2σ)`
    pub max: f64,
    /// Most frequent damage type; ties go to the type seen first
    pub dominant_type: DamageType,
    /// Share of images agreeing with the dominant type
    pub type_consistency: f64,
    pub image_count: usize,
}

/// Reduce per-image results to claim-level figures. `None` for an empty batch.
pub fn summarize_damage(results: &[DamageIndexResult]) -> Option<DamageSummary> {
    if results.is_empty() {
        return None;
    }

    let n = results.len() as f64;
    let mean = results.iter().map(|r| r.damage_percentage).sum::<f64>() / n;
    let variance = results
        .iter()
        .map(|r| (r.damage_percentage - mean).powi(2))
        .sum::<f64>()
        / n;
    let std_dev = variance.sqrt();

    let (dominant_type, votes) = dominant_type(results.iter().map(|r| r.damage_type_code))?;

    Some(DamageSummary {
        mean,
        std_dev,
        min: (mean - 2.0 * std_dev).max(0.0),
        max: (mean + 2.0 * std_dev).min(100.0),
        dominant_type,
        type_consistency: votes as f64 / n,
        image_count: results.len(),
    })
}

/// Mode of a sequence of damage types, with its vote count.
fn dominant_type(types: impl Iterator<Item = DamageType>) -> Option<(DamageType, usize)> {
    // Counts kept in first-seen order so ties resolve to the earliest type.
    let mut counts: Vec<(DamageType, usize)> = Vec::new();
    for t in types {
        match counts.iter_mut().find(|(seen, _)| *seen == t) {
            Some((_, c)) => *c += 1,
            None => counts.push((t, 1)),
        }
    }

    counts
        .into_iter()
        .fold(None, |best: Option<(DamageType, usize)>, (t, c)| match best {
            Some((_, best_c)) if best_c >= c => best,
            _ => Some((t, c)),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use agrisure_core::Raster;

    fn params() -> VegetationParams {
        VegetationParams::default()
    }

    fn result(pct: f64, t: DamageType) -> DamageIndexResult {
        DamageIndexResult {
            damage_percentage: pct,
            damage_type_code: t,
            vegetation_index: 0.0,
            stress_index: 0.0,
        }
    }

    #[test]
    fn test_healthy_field() {
        let sample = PixelSample::uniform(8, 8, [40, 180, 30]);
        let r = analyze_damage(&sample, &params()).unwrap();
        assert_eq!(r.damage_type_code, DamageType::Healthy);
        assert_eq!(r.damage_percentage, 0.0);
        assert!(r.vegetation_index > 0.1);
    }

    #[test]
    fn test_drought_field() {
        // Brown canopy: ExR ≈ 0.367
        let sample = PixelSample::uniform(8, 8, [150, 100, 50]);
        let r = analyze_damage(&sample, &params()).unwrap();
        assert_eq!(r.damage_type_code, DamageType::Drought);
        assert_eq!(r.damage_percentage, 100.0);
    }

    #[test]
    fn test_half_damaged() {
        // Top half brown, bottom half green
        let rows = 4;
        let cols = 4;
        let mut red = Raster::new(rows, cols);
        let mut green = Raster::new(rows, cols);
        let mut blue = Raster::new(rows, cols);
        for row in 0..rows {
            for col in 0..cols {
                let px = if row < 2 { [150, 100, 50] } else { [40, 180, 30] };
                red.set(row, col, px[0]).unwrap();
                green.set(row, col, px[1]).unwrap();
                blue.set(row, col, px[2]).unwrap();
            }
        }
        let sample = PixelSample::new(red, green, blue).unwrap();
        let r = analyze_damage(&sample, &params()).unwrap();
        assert_eq!(r.damage_percentage, 50.0);
    }

    #[test]
    fn test_extreme_inputs_stay_in_range() {
        for rgb in [[0, 0, 0], [255, 255, 255], [255, 0, 0], [0, 0, 255]] {
            let r = analyze_damage(&PixelSample::uniform(5, 5, rgb), &params()).unwrap();
            assert!((0.0..=100.0).contains(&r.damage_percentage), "{:?}", rgb);
            assert!(r.vegetation_index.is_finite());
            assert!(r.stress_index.is_finite());
        }
    }

    #[test]
    fn test_all_black_is_other() {
        let r = analyze_damage(&PixelSample::uniform(5, 5, [0, 0, 0]), &params()).unwrap();
        assert_eq!(r.damage_percentage, 0.0);
        assert_eq!(r.damage_type_code, DamageType::Other);
    }

    #[test]
    fn test_empty_sample_rejected() {
        let sample = PixelSample::uniform(0, 0, [0, 0, 0]);
        assert!(analyze_damage(&sample, &params()).is_err());
    }

    #[test]
    fn test_classification_priority() {
        assert_eq!(classify_damage_type(0.2, 0.5), DamageType::Healthy);
        assert_eq!(classify_damage_type(0.05, 0.2), DamageType::Drought);
        assert_eq!(classify_damage_type(-0.2, 0.0), DamageType::NutrientDeficiency);
        assert_eq!(classify_damage_type(0.05, 0.08), DamageType::WeedDamage);
        assert_eq!(classify_damage_type(0.05, 0.01), DamageType::Other);
        assert_eq!(classify_damage_type(-0.05, 0.08), DamageType::Other);
        // Boundaries are exclusive
        assert_eq!(classify_damage_type(0.1, 0.08), DamageType::Other);
    }

    #[test]
    fn test_summary_mean_and_mode() {
        let results = vec![
            result(30.0, DamageType::Drought),
            result(40.0, DamageType::WeedDamage),
            result(50.0, DamageType::Drought),
        ];
        let s = summarize_damage(&results).unwrap();
        assert!((s.mean - 40.0).abs() < 1e-10);
        assert_eq!(s.dominant_type, DamageType::Drought);
        assert!((s.type_consistency - 2.0 / 3.0).abs() < 1e-10);
        // σ = sqrt(200/3) ≈ 8.165
        assert!((s.std_dev - (200.0f64 / 3.0).sqrt()).abs() < 1e-10);
        assert!(s.min < s.mean && s.max > s.mean);
    }

    #[test]
    fn test_mode_tie_goes_to_first_seen() {
        let results = vec![
            result(10.0, DamageType::WeedDamage),
            result(10.0, DamageType::Drought),
            result(10.0, DamageType::Drought),
            result(10.0, DamageType::WeedDamage),
        ];
        let s = summarize_damage(&results).unwrap();
        assert_eq!(s.dominant_type, DamageType::WeedDamage);
        assert_eq!(s.std_dev, 0.0);
    }

    #[test]
    fn test_range_is_clamped() {
        let results = vec![result(0.0, DamageType::Other), result(100.0, DamageType::Other)];
        let s = summarize_damage(&results).unwrap();
        assert_eq!(s.min, 0.0);
        assert_eq!(s.max, 100.0);
    }

    #[test]
    fn test_empty_summary() {
        assert!(summarize_damage(&[]).is_none());
    }
}
