//! Decoded RGB pixel samples

use crate::error::{Error, Result};
use crate::raster::Raster;

/// A decoded image as three equally sized 8-bit channel grids.
///
/// Owned by a single analysis call and dropped once the indices are computed.
#[derive(Debug, Clone)]
pub struct PixelSample {
    red: Raster<u8>,
    green: Raster<u8>,
    blue: Raster<u8>,
}

impl PixelSample {
    /// Build a sample from separate channels.
    pub fn new(red: Raster<u8>, green: Raster<u8>, blue: Raster<u8>) -> Result<Self> {
        for other in [&green, &blue] {
            if other.shape() != red.shape() {
                return Err(Error::SizeMismatch {
                    er: red.rows(),
                    ec: red.cols(),
                    ar: other.rows(),
                    ac: other.cols(),
                });
            }
        }
        Ok(Self { red, green, blue })
    }

    /// Build a sample from interleaved `RGBRGB...` bytes in row-major order.
    pub fn from_interleaved(rows: usize, cols: usize, rgb: &[u8]) -> Result<Self> {
        if rgb.len() != rows * cols * 3 {
            return Err(Error::InvalidDimensions {
                width: cols,
                height: rows,
            });
        }

        let mut red = Vec::with_capacity(rows * cols);
        let mut green = Vec::with_capacity(rows * cols);
        let mut blue = Vec::with_capacity(rows * cols);
        for px in rgb.chunks_exact(3) {
            red.push(px[0]);
            green.push(px[1]);
            blue.push(px[2]);
        }

        Self::new(
            Raster::from_vec(red, rows, cols)?,
            Raster::from_vec(green, rows, cols)?,
            Raster::from_vec(blue, rows, cols)?,
        )
    }

    /// A sample where every pixel has the same colour.
    pub fn uniform(rows: usize, cols: usize, rgb: [u8; 3]) -> Self {
        Self {
            red: Raster::filled(rows, cols, rgb[0]),
            green: Raster::filled(rows, cols, rgb[1]),
            blue: Raster::filled(rows, cols, rgb[2]),
        }
    }

    pub fn red(&self) -> &Raster<u8> {
        &self.red
    }

    pub fn green(&self) -> &Raster<u8> {
        &self.green
    }

    pub fn blue(&self) -> &Raster<u8> {
        &self.blue
    }

    /// Dimensions as (rows, cols)
    pub fn shape(&self) -> (usize, usize) {
        self.red.shape()
    }

    pub fn rows(&self) -> usize {
        self.red.rows()
    }

    pub fn cols(&self) -> usize {
        self.red.cols()
    }

    /// Number of pixels
    pub fn len(&self) -> usize {
        self.red.len()
    }

    pub fn is_empty(&self) -> bool {
        self.red.is_empty()
    }

    /// (R, G, B) at (row, col)
    pub fn pixel(&self, row: usize, col: usize) -> Result<[u8; 3]> {
        Ok([
            self.red.get(row, col)?,
            self.green.get(row, col)?,
            self.blue.get(row, col)?,
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_interleaved() {
        let bytes = [10, 20, 30, 40, 50, 60];
        let sample = PixelSample::from_interleaved(1, 2, &bytes).unwrap();
        assert_eq!(sample.shape(), (1, 2));
        assert_eq!(sample.pixel(0, 0).unwrap(), [10, 20, 30]);
        assert_eq!(sample.pixel(0, 1).unwrap(), [40, 50, 60]);
    }

    #[test]
    fn test_from_interleaved_wrong_length() {
        assert!(PixelSample::from_interleaved(2, 2, &[0; 11]).is_err());
    }

    #[test]
    fn test_channel_mismatch() {
        let result = PixelSample::new(Raster::new(2, 2), Raster::new(2, 3), Raster::new(2, 2));
        assert!(matches!(result, Err(Error::SizeMismatch { .. })));
    }
}
