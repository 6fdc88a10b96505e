//! Collaborator interfaces
//!
//! The assessment engine never touches files or the network directly. It is
//! handed implementations of these traits, which lets tests substitute
//! in-memory evidence.

use crate::error::Result;
use crate::model::{Coordinate, ImageMetadata, WeatherSnapshot};
use crate::pixels::PixelSample;
use std::path::Path;

/// Turns an image file into RGB channels.
pub trait ImageDecoder: Send + Sync {
    /// Fails with [`Error::ImageUnreadable`](crate::Error::ImageUnreadable)
    /// when the file cannot be decoded.
    fn decode(&self, path: &Path) -> Result<PixelSample>;
}

/// Reads GPS, timestamp and software metadata from an image file.
pub trait MetadataExtractor: Send + Sync {
    /// Missing metadata is not an error; absent fields stay `None`.
    fn extract(&self, path: &Path) -> ImageMetadata;
}

/// Looks up current weather at a location.
pub trait WeatherProvider: Send + Sync {
    /// Errors here are never fatal to an assessment; the caller falls back
    /// to [`WeatherSnapshot::synthetic`].
    fn fetch(&self, at: Coordinate) -> Result<WeatherSnapshot>;
}

/// Provider that always answers with the deterministic synthetic snapshot.
#[derive(Debug, Clone, Copy, Default)]
pub struct SyntheticWeather;

impl WeatherProvider for SyntheticWeather {
    fn fetch(&self, at: Coordinate) -> Result<WeatherSnapshot> {
        Ok(WeatherSnapshot::synthetic(at))
    }
}

/// Extractor for sources that carry no metadata at all.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoMetadata;

impl MetadataExtractor for NoMetadata {
    fn extract(&self, _path: &Path) -> ImageMetadata {
        ImageMetadata::default()
    }
}
