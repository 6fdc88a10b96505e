//! EXIF metadata extraction via `kamadak-exif`

use crate::model::{Coordinate, ImageMetadata};
use crate::source::MetadataExtractor;
use exif::{Exif, In, Tag, Value};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::debug;

/// Reads GPS position, altitude, capture time and software tag from JPEG,
/// TIFF, PNG or WebP containers.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExifReader;

impl MetadataExtractor for ExifReader {
    fn extract(&self, path: &Path) -> ImageMetadata {
        let exif = match read_exif(path) {
            Ok(exif) => exif,
            Err(e) => {
                debug!("No EXIF in {}: {}", path.display(), e);
                return ImageMetadata::default();
            }
        };

        ImageMetadata {
            coordinate: gps_coordinate(&exif),
            timestamp: ascii(&exif, Tag::DateTimeOriginal),
            altitude_m: gps_altitude(&exif),
            software: ascii(&exif, Tag::Software),
            dimensions: None,
        }
    }
}

fn read_exif(path: &Path) -> std::result::Result<Exif, exif::Error> {
    let file = File::open(path)?;
    let mut reader = BufReader::new(file);
    exif::Reader::new().read_from_container(&mut reader)
}

fn gps_coordinate(exif: &Exif) -> Option<Coordinate> {
    let lat = dms_to_degrees(&rationals(exif, Tag::GPSLatitude)?)?;
    let lon = dms_to_degrees(&rationals(exif, Tag::GPSLongitude)?)?;

    let lat = match ascii(exif, Tag::GPSLatitudeRef).as_deref() {
        Some("S") => -lat,
        _ => lat,
    };
    let lon = match ascii(exif, Tag::GPSLongitudeRef).as_deref() {
        Some("W") => -lon,
        _ => lon,
    };

    match Coordinate::new(lat, lon) {
        Ok(c) => Some(c),
        Err(e) => {
            debug!("Dropping EXIF position: {}", e);
            None
        }
    }
}

fn gps_altitude(exif: &Exif) -> Option<f64> {
    let altitude = rationals(exif, Tag::GPSAltitude)?.first().copied()?;
    let reference = exif
        .get_field(Tag::GPSAltitudeRef, In::PRIMARY)
        .and_then(|f| match &f.value {
            Value::Byte(bytes) => bytes.first().copied(),
            _ => None,
        });
    Some(signed_altitude(altitude, reference))
}

/// Apply `GPSAltitudeRef`: 1 means the altitude is below sea level.
pub fn signed_altitude(altitude: f64, reference: Option<u8>) -> f64 {
    match reference {
        Some(1) => -altitude,
        _ => altitude,
    }
}

/// Convert (degrees, minutes, seconds) to decimal degrees.
pub fn dms_to_degrees(dms: &[f64]) -> Option<f64> {
    match dms {
        [d, m, s, ..] => Some(d + m / 60.0 + s / 3600.0),
        _ => None,
    }
}

fn ascii(exif: &Exif, tag: Tag) -> Option<String> {
    let field = exif.get_field(tag, In::PRIMARY)?;
    match &field.value {
        Value::Ascii(parts) => parts
            .first()
            .map(|bytes| String::from_utf8_lossy(bytes).trim_matches('\0').trim().to_string())
            .filter(|s| !s.is_empty()),
        _ => None,
    }
}

fn rationals(exif: &Exif, tag: Tag) -> Option<Vec<f64>> {
    let field = exif.get_field(tag, In::PRIMARY)?;
    match &field.value {
        Value::Rational(values) => values
            .iter()
            .map(|r| (r.denom != 0).then(|| r.num as f64 / r.denom as f64))
            .collect(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dms_to_degrees() {
        let deg = dms_to_degrees(&[12.0, 54.0, 36.0]).unwrap();
        assert!((deg - 12.91).abs() < 1e-10);
    }

    #[test]
    fn test_altitude_reference() {
        assert_eq!(signed_altitude(120.0, None), 120.0);
        assert_eq!(signed_altitude(120.0, Some(0)), 120.0);
        assert_eq!(signed_altitude(12.5, Some(1)), -12.5);
    }

    #[test]
    fn test_dms_too_short() {
        assert_eq!(dms_to_degrees(&[12.0, 54.0]), None);
    }

    #[test]
    fn test_missing_file_yields_empty_metadata() {
        let meta = ExifReader.extract(Path::new("/nonexistent/field.jpg"));
        assert_eq!(meta, ImageMetadata::default());
    }
}
