//! Claim evidence data model

mod coordinate;
mod damage;
mod metadata;
mod verification;
mod weather;

pub use coordinate::Coordinate;
pub use damage::{DamageIndexResult, DamageType};
pub use metadata::{parse_exif_datetime, CaptureTimestamp, ImageMetadata, EXIF_DATETIME_FORMAT};
pub use verification::{clamp_unit, round_to, VerificationScore, VerificationStatus};
pub use weather::{WeatherCondition, WeatherSnapshot, WeatherSource};
