//! Image decoding via the `image` crate
//!
//! Supports the formats enabled on the `image` dependency (JPEG, PNG, TIFF,
//! WebP). Anything with an alpha channel or non-8-bit depth is converted to
//! 8-bit RGB first.

use crate::error::{Error, Result};
use crate::pixels::PixelSample;
use crate::source::ImageDecoder;
use std::path::Path;

/// Decodes image files from disk.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileImageDecoder;

impl FileImageDecoder {
    /// Decode an in-memory encoded image (format guessed from content).
    pub fn decode_bytes(&self, bytes: &[u8]) -> Result<PixelSample> {
        let img = image::load_from_memory(bytes).map_err(|e| Error::ImageUnreadable {
            path: "<memory>".into(),
            reason: e.to_string(),
        })?;
        to_sample(img)
    }
}

impl ImageDecoder for FileImageDecoder {
    fn decode(&self, path: &Path) -> Result<PixelSample> {
        let img = image::open(path).map_err(|e| Error::ImageUnreadable {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        to_sample(img)
    }
}

fn to_sample(img: image::DynamicImage) -> Result<PixelSample> {
    let rgb = img.to_rgb8();
    let (width, height) = rgb.dimensions();
    if width == 0 || height == 0 {
        return Err(Error::InvalidDimensions {
            width: width as usize,
            height: height as usize,
        });
    }
    PixelSample::from_interleaved(height as usize, width as usize, rgb.as_raw())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn encode_png(width: u32, height: u32, rgb: [u8; 3]) -> Vec<u8> {
        let img = image::RgbImage::from_pixel(width, height, image::Rgb(rgb));
        let mut buf = Cursor::new(Vec::new());
        img.write_to(&mut buf, image::ImageFormat::Png).unwrap();
        buf.into_inner()
    }

    #[test]
    fn test_decode_png_bytes() {
        let bytes = encode_png(4, 3, [10, 200, 30]);
        let sample = FileImageDecoder.decode_bytes(&bytes).unwrap();
        assert_eq!(sample.shape(), (3, 4));
        assert_eq!(sample.pixel(2, 3).unwrap(), [10, 200, 30]);
    }

    #[test]
    fn test_garbage_is_unreadable() {
        let err = FileImageDecoder.decode_bytes(b"not an image").unwrap_err();
        assert!(matches!(err, Error::ImageUnreadable { .. }));
    }

    #[test]
    fn test_missing_file_is_unreadable() {
        let err = FileImageDecoder
            .decode(Path::new("/nonexistent/field.jpg"))
            .unwrap_err();
        assert!(matches!(err, Error::ImageUnreadable { .. }));
    }
}
