//! Error types for agrisure

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for agrisure operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Cannot read image {path}: {reason}")]
    ImageUnreadable { path: PathBuf, reason: String },

    #[error("No valid images could be processed ({attempted} attempted)")]
    NoValidImages { attempted: usize },

    #[error("Weather API credential missing")]
    MissingCredential,

    #[error("Malformed EXIF timestamp: {0:?}")]
    MalformedTimestamp(String),

    #[error("Invalid coordinate: ({lat}, {lon})")]
    InvalidCoordinate { lat: f64, lon: f64 },

    #[error("Invalid image dimensions: {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },

    #[error("Index out of bounds: ({row}, {col}) in grid of size ({rows}, {cols})")]
    IndexOutOfBounds {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },

    #[error("Channel size mismatch: expected ({er}, {ec}), got ({ar}, {ac})")]
    SizeMismatch { er: usize, ec: usize, ar: usize, ac: usize },

    #[error("Invalid parameter: {name} = {value} ({reason})")]
    InvalidParameter {
        name: &'static str,
        value: String,
        reason: String,
    },

    #[error("Weather error: {0}")]
    Weather(String),

    #[error("{0}")]
    Other(String),
}

/// Result type alias for agrisure operations
pub type Result<T> = std::result::Result<T, Error>;
