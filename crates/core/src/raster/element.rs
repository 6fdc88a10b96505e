//! Cell value trait for grids

use num_traits::{NumCast, Zero};
use std::fmt::Debug;

/// Types that can be stored in a grid cell.
///
/// Channel grids hold `u8` samples; derived index grids and masks hold `f64`.
pub trait RasterElement:
    Copy + Debug + PartialOrd + NumCast + Zero + Send + Sync + 'static
{
    /// Widen to f64 for statistics
    fn to_f64(self) -> Option<f64> {
        NumCast::from(self)
    }
}

impl RasterElement for u8 {}
impl RasterElement for u16 {}
impl RasterElement for f32 {}
impl RasterElement for f64 {}
