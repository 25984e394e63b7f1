use serde::{Deserialize, Serialize};

use crate::RgbImageView;

/// Integer pixel coordinate, `(row, col)` with the origin at the top-left.
///
/// Signed so that neighbours of border pixels can be formed and then rejected
/// by [`RgbImageView::is_valid_coord`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PixelCoord {
    pub row: i32,
    pub col: i32,
}

impl PixelCoord {
    #[inline]
    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    #[inline]
    pub fn offset(self, d_row: i32, d_col: i32) -> Self {
        Self {
            row: self.row + d_row,
            col: self.col + d_col,
        }
    }
}

/// How a pixel's channels are reduced to one "brightness" number.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PixelNorm {
    /// `r² + g² + b²` on raw 0..255 samples; range `0..=195075`.
    SumOfSquares { threshold: f64 },
    /// `sqrt((r/255)² + (g/255)² + (b/255)²)`; range `0..=√3`.
    NormalizedEuclidean { threshold: f64 },
}

impl PixelNorm {
    /// Wire whiteness as calibrated on bonded-module photographs.
    pub const WIRE_WHITENESS: PixelNorm = PixelNorm::SumOfSquares { threshold: 90_000.0 };

    #[inline]
    pub fn value(&self, rgb: [u8; 3]) -> f64 {
        match self {
            PixelNorm::SumOfSquares { .. } => sum_of_squares(rgb),
            PixelNorm::NormalizedEuclidean { .. } => normalized_norm(rgb),
        }
    }

    #[inline]
    pub fn threshold(&self) -> f64 {
        match *self {
            PixelNorm::SumOfSquares { threshold } => threshold,
            PixelNorm::NormalizedEuclidean { threshold } => threshold,
        }
    }

    /// Strictly above the threshold counts as foreground.
    #[inline]
    pub fn is_foreground_rgb(&self, rgb: [u8; 3]) -> bool {
        self.value(rgb) > self.threshold()
    }
}

impl Default for PixelNorm {
    fn default() -> Self {
        Self::WIRE_WHITENESS
    }
}

#[inline]
pub fn sum_of_squares(rgb: [u8; 3]) -> f64 {
    rgb.iter().map(|&c| (c as f64) * (c as f64)).sum()
}

#[inline]
pub fn normalized_norm(rgb: [u8; 3]) -> f64 {
    rgb.iter()
        .map(|&c| {
            let v = c as f64 / 255.0;
            v * v
        })
        .sum::<f64>()
        .sqrt()
}

/// Foreground test for one pixel. Out-of-range coordinates are never foreground.
#[inline]
pub fn is_foreground(img: &RgbImageView<'_>, coord: PixelCoord, norm: &PixelNorm) -> bool {
    img.is_valid_coord(coord)
        && norm.is_foreground_rgb(img.pixel(coord.row as usize, coord.col as usize))
}
