//! Borrowed and owned raster views.
//!
//! All views are row-major with the origin at the top-left pixel. RGB views
//! store three interleaved channels in `R, G, B` order; callers decoding BGR
//! data must swap channels before building a view.

use crate::PixelCoord;

#[derive(Clone, Copy, Debug)]
pub struct GrayImageView<'a> {
    pub width: usize,
    pub height: usize,
    pub data: &'a [u8], // row-major, len = w*h
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GrayImage {
    pub width: usize,
    pub height: usize,
    pub data: Vec<u8>,
}

#[derive(Clone, Copy, Debug)]
pub struct RgbImageView<'a> {
    pub width: usize,
    pub height: usize,
    pub data: &'a [u8], // row-major, len = w*h*3
}

impl GrayImageView<'_> {
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> u8 {
        self.data[row * self.width + col]
    }

    /// Copy one column of rows `rows.start..rows.end`.
    pub fn column(&self, col: usize, rows: std::ops::Range<usize>) -> Vec<u8> {
        rows.map(|r| self.get(r, col)).collect()
    }

    /// Copy a rectangular window into an owned image. The window is clipped to the view.
    pub fn crop(&self, row0: usize, col0: usize, height: usize, width: usize) -> GrayImage {
        let row1 = (row0 + height).min(self.height);
        let col1 = (col0 + width).min(self.width);
        let row0 = row0.min(row1);
        let col0 = col0.min(col1);
        let mut data = Vec::with_capacity((row1 - row0) * (col1 - col0));
        for r in row0..row1 {
            let start = r * self.width;
            data.extend_from_slice(&self.data[start + col0..start + col1]);
        }
        GrayImage {
            width: col1 - col0,
            height: row1 - row0,
            data,
        }
    }
}

impl GrayImage {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            data: vec![0; width * height],
        }
    }

    pub fn view(&self) -> GrayImageView<'_> {
        GrayImageView {
            width: self.width,
            height: self.height,
            data: &self.data,
        }
    }
}

impl RgbImageView<'_> {
    /// Whether `coord` addresses a pixel inside the image.
    #[inline]
    pub fn is_valid_coord(&self, coord: PixelCoord) -> bool {
        coord.row >= 0
            && coord.col >= 0
            && (coord.row as usize) < self.height
            && (coord.col as usize) < self.width
    }

    /// Channels at `(row, col)`. Callers must check bounds first.
    #[inline]
    pub fn pixel(&self, row: usize, col: usize) -> [u8; 3] {
        let i = (row * self.width + col) * 3;
        [self.data[i], self.data[i + 1], self.data[i + 2]]
    }
}

/// BT.601 luma, the weighting the wire-height threshold was calibrated with.
#[inline]
pub fn luma(rgb: [u8; 3]) -> u8 {
    let y = 0.299 * rgb[0] as f32 + 0.587 * rgb[1] as f32 + 0.114 * rgb[2] as f32;
    y.round().clamp(0.0, 255.0) as u8
}

/// Convert an RGB view to grayscale.
pub fn gray_from_rgb(src: &RgbImageView<'_>) -> GrayImage {
    let data = src
        .data
        .chunks_exact(3)
        .map(|px| luma([px[0], px[1], px[2]]))
        .collect();
    GrayImage {
        width: src.width,
        height: src.height,
        data,
    }
}

/// Resolve a possibly negative index the way slice offsets "from the far edge" work:
/// `-100` on an axis of length 1000 is `900`. Returns `None` when still out of range.
#[inline]
pub fn resolve_axis_offset(offset: i64, len: usize) -> Option<usize> {
    let resolved = if offset < 0 {
        len as i64 + offset
    } else {
        offset
    };
    (0..=len as i64)
        .contains(&resolved)
        .then_some(resolved as usize)
}
