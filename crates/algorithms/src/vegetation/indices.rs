//! RGB chromaticity indices and damage masks
//!
//! Visible-band counterparts of the multispectral vegetation indices, for
//! ordinary camera and drone photographs:
//! - ExG (Excess Green): `2g - r - b`, high over healthy canopy
//! - ExR (Excess Red): `1.4r - g`, high over stressed or brown canopy
//!
//! where `r, g, b` are chromatic fractions `R / (R + G + B + ε)`.

use crate::maybe_rayon::*;
use agrisure_core::config::VegetationParams;
use agrisure_core::{PixelSample, Raster, Result};

/// Chromatic fractions (r, g, b) of one pixel.
///
/// `epsilon` keeps pure black pixels finite: they map to (0, 0, 0).
#[inline]
pub fn chromaticity(rgb: [u8; 3], epsilon: f64) -> (f64, f64, f64) {
    let [r, g, b] = rgb.map(f64::from);
    let total = r + g + b + epsilon;
    (r / total, g / total, b / total)
}

/// Excess Green index of one pixel, in [-1, 2].
#[inline]
pub fn excess_green_value(rgb: [u8; 3], epsilon: f64) -> f64 {
    let (r, g, b) = chromaticity(rgb, epsilon);
    2.0 * g - r - b
}

/// Excess Red index of one pixel, in [-1, 1.4].
#[inline]
pub fn excess_red_value(rgb: [u8; 3], epsilon: f64) -> f64 {
    let (r, g, _) = chromaticity(rgb, epsilon);
    1.4 * r - g
}

/// 8-bit grayscale luminance (ITU-R BT.601 weights, rounded to an integer
/// level as an 8-bit grayscale conversion would store it).
#[inline]
pub fn luma(rgb: [u8; 3]) -> f64 {
    let [r, g, b] = rgb.map(f64::from);
    (0.299 * r + 0.587 * g + 0.114 * b).round()
}

/// Per-pixel classification shared by the mask functions and the analyzer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelIndices {
    pub exg: f64,
    pub exr: f64,
    pub soil: bool,
    pub healthy: bool,
    pub stressed: bool,
}

impl PixelIndices {
    #[inline]
    pub fn compute(rgb: [u8; 3], params: &VegetationParams) -> Self {
        let (r, g, b) = chromaticity(rgb, params.epsilon);
        let exg = 2.0 * g - r - b;
        let exr = 1.4 * r - g;
        let y = luma(rgb);
        Self {
            exg,
            exr,
            soil: y > params.soil_luma_min && y < params.soil_luma_max,
            healthy: exg > params.healthy_exg,
            stressed: exr > params.stress_exr,
        }
    }

    /// `clamp(stress + soil * (1 - healthy), 0, 1)`: soil only counts where
    /// no vegetation was detected.
    #[inline]
    pub fn damaged(&self) -> bool {
        self.stressed || (self.soil && !self.healthy)
    }
}

/// Excess Green index grid
pub fn excess_green(sample: &PixelSample, params: &VegetationParams) -> Result<Raster<f64>> {
    map_pixels(sample, |rgb| excess_green_value(rgb, params.epsilon))
}

/// Excess Red index grid
pub fn excess_red(sample: &PixelSample, params: &VegetationParams) -> Result<Raster<f64>> {
    map_pixels(sample, |rgb| excess_red_value(rgb, params.epsilon))
}

/// Bare-soil mask: 1 where luminance is strictly inside the soil band
pub fn soil_mask(sample: &PixelSample, params: &VegetationParams) -> Result<Raster<f64>> {
    map_pixels(sample, |rgb| flag(PixelIndices::compute(rgb, params).soil))
}

/// Healthy-vegetation mask: 1 where ExG exceeds the healthy threshold
pub fn healthy_mask(sample: &PixelSample, params: &VegetationParams) -> Result<Raster<f64>> {
    map_pixels(sample, |rgb| flag(PixelIndices::compute(rgb, params).healthy))
}

/// Stress mask: 1 where ExR exceeds the stress threshold
pub fn stress_mask(sample: &PixelSample, params: &VegetationParams) -> Result<Raster<f64>> {
    map_pixels(sample, |rgb| flag(PixelIndices::compute(rgb, params).stressed))
}

/// Combined damage mask (stress, plus soil not covered by vegetation)
pub fn damage_mask(sample: &PixelSample, params: &VegetationParams) -> Result<Raster<f64>> {
    map_pixels(sample, |rgb| flag(PixelIndices::compute(rgb, params).damaged()))
}

#[inline]
fn flag(b: bool) -> f64 {
    if b {
        1.0
    } else {
        0.0
    }
}

fn map_pixels<F>(sample: &PixelSample, f: F) -> Result<Raster<f64>>
where
    F: Fn([u8; 3]) -> f64 + Sync + Send,
{
    let (rows, cols) = sample.shape();
    let (red, green, blue) = (sample.red().view(), sample.green().view(), sample.blue().view());

    let data: Vec<f64> = (0..rows)
        .into_par_iter()
        .flat_map(|row| {
            (0..cols)
                .map(|col| f([red[(row, col)], green[(row, col)], blue[(row, col)]]))
                .collect::<Vec<f64>>()
        })
        .collect();

    Raster::from_vec(data, rows, cols)
}
