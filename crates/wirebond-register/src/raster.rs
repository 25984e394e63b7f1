//! Conversions from core RGB views to `image` buffers for `imageproc`.

use std::ops::Range;

use image::{GrayImage, Luma};
use wirebond_core::{luma, RgbImageView};

/// BT.601 gray copy of a window. Ranges must lie inside the view.
pub(crate) fn gray_window(img: &RgbImageView<'_>, rows: Range<usize>, cols: Range<usize>) -> GrayImage {
    GrayImage::from_fn(cols.len() as u32, rows.len() as u32, |x, y| {
        Luma([luma(img.pixel(rows.start + y as usize, cols.start + x as usize))])
    })
}

/// 255 where every channel lies in `lower..=upper`, 0 elsewhere, over all rows of `cols`.
pub(crate) fn in_range_mask(
    img: &RgbImageView<'_>,
    cols: Range<usize>,
    lower: [u8; 3],
    upper: [u8; 3],
) -> GrayImage {
    GrayImage::from_fn(cols.len() as u32, img.height as u32, |x, y| {
        let px = img.pixel(y as usize, cols.start + x as usize);
        let inside = (0..3).all(|c| lower[c] <= px[c] && px[c] <= upper[c]);
        Luma([if inside { 255 } else { 0 }])
    })
}
