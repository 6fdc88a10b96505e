//! Per-image metadata extracted from EXIF

use crate::error::{Error, Result};
use crate::model::Coordinate;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// EXIF `DateTimeOriginal` layout
pub const EXIF_DATETIME_FORMAT: &str = "%Y:%m:%d %H:%M:%S";

/// Capture time of one image. `captured_at` is `None` when the tag was
/// stripped, missing, or unparsable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptureTimestamp {
    pub filename: String,
    pub captured_at: Option<NaiveDateTime>,
}

impl CaptureTimestamp {
    pub fn new(filename: impl Into<String>, captured_at: Option<NaiveDateTime>) -> Self {
        Self {
            filename: filename.into(),
            captured_at,
        }
    }
}

/// Parse an EXIF timestamp such as `"2024:06:01 10:30:00"`.
///
/// NUL padding written by some cameras is ignored.
pub fn parse_exif_datetime(raw: &str) -> Result<NaiveDateTime> {
    let cleaned: String = raw.chars().filter(|&c| c != '\0').collect();
    NaiveDateTime::parse_from_str(cleaned.trim(), EXIF_DATETIME_FORMAT)
        .map_err(|_| Error::MalformedTimestamp(raw.to_string()))
}

/// Everything the EXIF extractor could find for a single image.
///
/// Every field is optional: stripped metadata is a common, valid outcome.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImageMetadata {
    pub coordinate: Option<Coordinate>,
    /// Raw `DateTimeOriginal` value
    pub timestamp: Option<String>,
    /// EXIF `GPSAltitude`, metres relative to sea level (negative below it).
    /// Area estimation treats it as the flight height over the field.
    pub altitude_m: Option<f64>,
    /// `Software` tag
    pub software: Option<String>,
    /// Pixel dimensions as (width, height)
    pub dimensions: Option<(u32, u32)>,
}

impl ImageMetadata {
    /// Parsed capture time. Malformed values are reported as errors so the
    /// caller can decide to skip them.
    pub fn captured_at(&self) -> Option<Result<NaiveDateTime>> {
        self.timestamp.as_deref().map(parse_exif_datetime)
    }
}
