//! # agrisure core
//!
//! Shared types for crop-damage claim assessment.
//!
//! This crate provides:
//! - `PixelSample` / `Raster<T>`: decoded RGB channels and per-pixel grids
//! - The claim evidence model: coordinates, capture timestamps, weather
//!   snapshots, verifier scores
//! - `AssessmentConfig`: every threshold the engine uses, as one value
//! - Collaborator traits for image decoding, EXIF extraction and weather
//! - File-backed collaborators (`native` feature)

pub mod config;
pub mod error;
#[cfg(feature = "native")]
pub mod io;
pub mod model;
pub mod pixels;
pub mod raster;
pub mod source;

pub use config::AssessmentConfig;
pub use error::{Error, Result};
pub use pixels::PixelSample;
pub use raster::{Raster, RasterElement};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::config::AssessmentConfig;
    pub use crate::error::{Error, Result};
    pub use crate::model::{
        CaptureTimestamp, Coordinate, DamageIndexResult, DamageType, ImageMetadata,
        VerificationScore, VerificationStatus, WeatherCondition, WeatherSnapshot,
    };
    pub use crate::pixels::PixelSample;
    pub use crate::raster::{Raster, RasterElement};
    pub use crate::source::{ImageDecoder, MetadataExtractor, WeatherProvider};
}
