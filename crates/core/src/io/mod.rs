//! File-backed collaborators: image decoding and EXIF extraction

mod decode;
mod exif_reader;

pub use decode::FileImageDecoder;
pub use exif_reader::{dms_to_degrees, signed_altitude, ExifReader};
