//! Field and damaged area estimation
//!
//! Strategies, in priority order:
//! 1. `MANUAL`: a known field size supplied with the claim
//! 2. `GPS_SPREAD`: capture positions spread wider than a single spot
//! 3. `EXIF` / `HYBRID`: per-image ground footprint from flight altitude
//! 4. `ESTIMATED`: a fixed coverage per image

use agrisure_core::config::AreaParams;
use agrisure_core::model::round_to;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// Square metres per acre
pub const ACRE_M2: f64 = 4046.8564224;

pub fn acres_to_m2(acres: f64) -> f64 {
    acres * ACRE_M2
}

pub fn m2_to_acres(m2: f64) -> f64 {
    m2 / ACRE_M2
}

/// How the field area was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AreaMethod {
    Manual,
    GpsSpread,
    /// Every image had a usable altitude
    Exif,
    /// Some images had a usable altitude
    Hybrid,
    Estimated,
}

impl fmt::Display for AreaMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            AreaMethod::Manual => "MANUAL",
            AreaMethod::GpsSpread => "GPS_SPREAD",
            AreaMethod::Exif => "EXIF",
            AreaMethod::Hybrid => "HYBRID",
            AreaMethod::Estimated => "ESTIMATED",
        })
    }
}

/// What one image tells us about the ground it covers.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ImageFootprint {
    /// Height above ground, metres
    pub altitude_m: Option<f64>,
    /// Pixel (width, height)
    pub dimensions: Option<(u32, u32)>,
}

impl ImageFootprint {
    fn usable_altitude(&self) -> Option<f64> {
        self.altitude_m.filter(|a| a.is_finite() && *a > 0.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AreaEstimate {
    pub total_area_m2: f64,
    pub method: AreaMethod,
}

/// Ground area seen by a nadir camera at `altitude_m`.
///
/// `(2·h·tan(fov/2))²`, with the height side shortened by the aspect ratio
/// when the image dimensions are known.
pub fn ground_coverage_m2(altitude_m: f64, fov_degrees: f64, dimensions: Option<(u32, u32)>) -> f64 {
    let width_m = 2.0 * altitude_m * (fov_degrees.to_radians() / 2.0).tan();
    let height_m = match dimensions {
        Some((w, h)) if w > 0 && h > 0 => width_m / (f64::from(w) / f64::from(h)),
        _ => width_m,
    };
    width_m * height_m
}

/// Pick the best available strategy and estimate the total field area.
///
/// `max_spread_km` is the geolocation verifier's largest centroid distance
/// (0 when no coordinates were found).
pub fn estimate_area(
    manual_area_m2: Option<f64>,
    max_spread_km: f64,
    footprints: &[ImageFootprint],
    params: &AreaParams,
) -> AreaEstimate {
    let estimate = select_strategy(manual_area_m2, max_spread_km, footprints, params);
    debug!(
        "Field area {:.1} m² via {} ({} images)",
        estimate.total_area_m2,
        estimate.method,
        footprints.len()
    );
    estimate
}

fn select_strategy(
    manual_area_m2: Option<f64>,
    max_spread_km: f64,
    footprints: &[ImageFootprint],
    params: &AreaParams,
) -> AreaEstimate {
    if let Some(area) = manual_area_m2.filter(|a| a.is_finite() && *a > 0.0) {
        return AreaEstimate {
            total_area_m2: area,
            method: AreaMethod::Manual,
        };
    }

    if max_spread_km > params.gps_spread_min_km {
        // Max centroid distance taken as half the diagonal of a square field.
        // A rough order of magnitude, not a surveyed footprint.
        let spread_m = max_spread_km * 1000.0;
        return AreaEstimate {
            total_area_m2: spread_m * spread_m / 2.0,
            method: AreaMethod::GpsSpread,
        };
    }

    if params.use_exif_altitude {
        let with_altitude = footprints
            .iter()
            .filter(|f| f.usable_altitude().is_some())
            .count();
        if with_altitude > 0 {
            let total = footprints
                .iter()
                .map(|f| match f.usable_altitude() {
                    Some(alt) => ground_coverage_m2(alt, params.default_fov_degrees, f.dimensions),
                    None => params.default_coverage_m2,
                })
                .sum();
            let method = if with_altitude == footprints.len() {
                AreaMethod::Exif
            } else {
                AreaMethod::Hybrid
            };
            return AreaEstimate {
                total_area_m2: total,
                method,
            };
        }
    }

    AreaEstimate {
        total_area_m2: footprints.len() as f64 * params.default_coverage_m2,
        method: AreaMethod::Estimated,
    }
}

/// Share of the field that is damaged.
pub fn damaged_area(total_area_m2: f64, damage_percentage: f64) -> f64 {
    total_area_m2 * (damage_percentage / 100.0)
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AreaRange {
    pub min: f64,
    pub mean: f64,
    pub max: f64,
}

/// Damaged area with an uncertainty band, in m² and acres.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DamagedAreaRange {
    /// 1 decimal
    pub m2: AreaRange,
    /// 4 decimals
    pub acres: AreaRange,
}

/// `mean ± variance_factor` around the damaged area.
pub fn damaged_area_range(total_area_m2: f64, damage_percentage: f64, variance_factor: f64) -> DamagedAreaRange {
    let mean = damaged_area(total_area_m2, damage_percentage);
    let min = mean * (1.0 - variance_factor);
    let max = mean * (1.0 + variance_factor);

    DamagedAreaRange {
        m2: AreaRange {
            min: round_to(min, 1),
            mean: round_to(mean, 1),
            max: round_to(max, 1),
        },
        acres: AreaRange {
            min: round_to(m2_to_acres(min), 4),
            mean: round_to(m2_to_acres(mean), 4),
            max: round_to(m2_to_acres(max), 4),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn params() -> AreaParams {
        AreaParams::default()
    }

    fn at(alt: f64) -> ImageFootprint {
        ImageFootprint {
            altitude_m: Some(alt),
            dimensions: None,
        }
    }

    #[test]
    fn test_manual_overrides_everything() {
        let e = estimate_area(Some(5000.0), 3.0, &[at(50.0), at(50.0)], &params());
        assert_eq!(e.method, AreaMethod::Manual);
        assert_eq!(e.total_area_m2, 5000.0);
    }

    #[test]
    fn test_non_positive_manual_ignored() {
        let e = estimate_area(Some(0.0), 0.0, &[ImageFootprint::default()], &params());
        assert_eq!(e.method, AreaMethod::Estimated);
    }

    #[test]
    fn test_gps_spread() {
        // Known approximation: spread 0.1 km -> 100² / 2
        let e = estimate_area(None, 0.1, &[ImageFootprint::default(); 3], &params());
        assert_eq!(e.method, AreaMethod::GpsSpread);
        assert_relative_eq!(e.total_area_m2, 5000.0, epsilon = 1e-6);
    }

    #[test]
    fn test_spread_at_threshold_not_used() {
        let e = estimate_area(None, 0.05, &[ImageFootprint::default(); 2], &params());
        assert_eq!(e.method, AreaMethod::Estimated);
        assert_eq!(e.total_area_m2, 3000.0);
    }

    #[test]
    fn test_ground_coverage_square() {
        // fov 90°: width = 2h
        assert_relative_eq!(ground_coverage_m2(10.0, 90.0, None), 400.0, epsilon = 1e-9);
    }

    #[test]
    fn test_ground_coverage_aspect() {
        // 4:3 image: 20 m wide, 15 m tall
        assert_relative_eq!(
            ground_coverage_m2(10.0, 90.0, Some((4000, 3000))),
            300.0,
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_exif_and_hybrid() {
        let e = estimate_area(None, 0.0, &[at(50.0), at(50.0)], &params());
        assert_eq!(e.method, AreaMethod::Exif);
        let one = ground_coverage_m2(50.0, 60.0, None);
        assert_relative_eq!(e.total_area_m2, 2.0 * one, epsilon = 1e-9);

        let e = estimate_area(None, 0.0, &[at(50.0), ImageFootprint::default()], &params());
        assert_eq!(e.method, AreaMethod::Hybrid);
        assert_relative_eq!(e.total_area_m2, one + 1500.0, epsilon = 1e-9);
    }

    #[test]
    fn test_altitude_disabled() {
        let p = AreaParams {
            use_exif_altitude: false,
            ..params()
        };
        let e = estimate_area(None, 0.0, &[at(50.0)], &p);
        assert_eq!(e.method, AreaMethod::Estimated);
        assert_eq!(e.total_area_m2, 1500.0);
    }

    #[test]
    fn test_damaged_area_range() {
        let r = damaged_area_range(10_000.0, 40.0, 0.15);
        assert_eq!(r.m2.mean, 4000.0);
        assert_eq!(r.m2.min, 3400.0);
        assert_eq!(r.m2.max, 4600.0);
        assert_relative_eq!(r.acres.mean, 0.9884, epsilon = 1e-9);
    }

    #[test]
    fn test_acre_conversion() {
        assert_relative_eq!(acres_to_m2(1.0), 4046.8564224);
        assert_relative_eq!(m2_to_acres(acres_to_m2(2.5)), 2.5, epsilon = 1e-12);
    }
}
