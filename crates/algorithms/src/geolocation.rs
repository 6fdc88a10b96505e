//! Geolocation cluster verification
//!
//! Photos of one field should be taken close together. The verifier
//! measures how far each capture position lies from the cluster centroid
//! and flags spreads that no single field could explain.

use agrisure_core::config::GeolocationParams;
use agrisure_core::model::{round_to, Coordinate, VerificationScore, VerificationStatus};
use geo::{Centroid, MultiPoint, Point};
use serde::Serialize;
use tracing::debug;

/// Great-circle distance between two coordinates, in km.
pub fn haversine_km(a: Coordinate, b: Coordinate, earth_radius_km: f64) -> f64 {
    let (lat1, lat2) = (a.lat_radians(), b.lat_radians());
    let dlat = lat2 - lat1;
    let dlon = b.lon_radians() - a.lon_radians();

    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    earth_radius_km * c
}

/// Arithmetic mean of latitudes and longitudes.
///
/// Not geodesically exact, but adequate at field scale. `None` when empty.
pub fn centroid(coords: &[Coordinate]) -> Option<Coordinate> {
    let points: MultiPoint<f64> = coords.iter().map(|&c| Point::from(c)).collect();
    points.centroid().map(Coordinate::from)
}

/// Outcome of the cluster check.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeolocationReport {
    #[serde(flatten)]
    pub verification: VerificationScore,
    pub center: Option<Coordinate>,
    /// Largest centroid distance, km (2 decimals)
    pub max_spread_km: f64,
    /// Mean centroid distance, km (2 decimals)
    pub avg_spread_km: f64,
    pub outlier_count: usize,
}

impl GeolocationReport {
    pub fn score(&self) -> f64 {
        self.verification.score
    }

    pub fn status(&self) -> VerificationStatus {
        self.verification.status
    }
}

/// Score the spread of capture positions.
///
/// No coordinates is a neutral `WARNING` at 0.5: missing GPS alone is not
/// evidence of fraud.
pub fn verify_geolocation(coords: &[Coordinate], params: &GeolocationParams) -> GeolocationReport {
    let Some(center) = centroid(coords) else {
        return GeolocationReport {
            verification: VerificationScore::new(
                0.5,
                VerificationStatus::Warning,
                vec!["No coordinates provided".to_string()],
            ),
            center: None,
            max_spread_km: 0.0,
            avg_spread_km: 0.0,
            outlier_count: 0,
        };
    };

    let distances: Vec<f64> = coords
        .iter()
        .map(|&c| haversine_km(center, c, params.earth_radius_km))
        .collect();
    let max_dist = distances.iter().copied().fold(0.0, f64::max);
    let avg_dist = distances.iter().sum::<f64>() / distances.len() as f64;

    let mut details = Vec::new();
    let (status, mut score) = if max_dist > params.fail_spread_km {
        details.push(format!(
            "Extreme coordinate spread: {:.2}km (> {}km)",
            max_dist, params.fail_spread_km
        ));
        (VerificationStatus::Fail, 0.2)
    } else if max_dist > params.warning_spread_km {
        details.push(format!("Wide coordinate spread: {:.2}km", max_dist));
        (VerificationStatus::Warning, 0.6)
    } else {
        details.push(format!("Coordinates clustered within {:.2}km", max_dist));
        (VerificationStatus::Pass, 1.0)
    };

    let outlier_count = count_outliers(&distances, avg_dist, params);
    if outlier_count > 0 {
        score -= outlier_count as f64 * params.outlier_penalty;
        details.push(format!("Detected {} outlier locations", outlier_count));
    }

    debug!(
        "Geolocation: {} points, max {:.3}km, avg {:.3}km, {} outliers",
        coords.len(),
        max_dist,
        avg_dist,
        outlier_count
    );

    GeolocationReport {
        verification: VerificationScore::new(
            round_to(score.clamp(0.0, 1.0), 2),
            status,
            details,
        ),
        center: Some(center),
        max_spread_km: round_to(max_dist, 2),
        avg_spread_km: round_to(avg_dist, 2),
        outlier_count,
    }
}

/// Points more than `outlier_sigma` standard deviations from the mean
/// distance that are also farther than `outlier_min_km` from the centroid.
///
/// Needs at least three points and a non-trivial spread.
fn count_outliers(distances: &[f64], mean: f64, params: &GeolocationParams) -> usize {
    if distances.len() < 3 || mean <= params.outlier_min_avg_km {
        return 0;
    }

    // Sample standard deviation (n - 1)
    let variance = distances.iter().map(|d| (d - mean).powi(2)).sum::<f64>()
        / (distances.len() - 1) as f64;
    let std_dev = variance.sqrt();
    if std_dev <= 0.0 {
        return 0;
    }

    distances
        .iter()
        .filter(|&&d| (d - mean).abs() > params.outlier_sigma * std_dev && d > params.outlier_min_km)
        .count()
}
