//! Board crop: green solder-mask borders plus the reach of the wire stubs.
//!
//! Rows are cut at the first and last solder-mask rows. Columns are cut at
//! the outermost wire pixel found by flood-filling stubs in a window just
//! outside each lateral mask border; only the leading part of each row slice
//! is traced.

use std::collections::HashSet;
use std::ops::Range;

use log::{debug, info};
use serde::{Deserialize, Serialize};
use wirebond_core::{is_foreground, resolve_axis_offset, PixelCoord, PixelNorm, RgbImageView};

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::trace::trace_wire;
use crate::{BoardCropParams, Side, WireCheckError};

/// First and last solder-mask row and column, inclusive.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaskBorders {
    pub top: usize,
    pub bottom: usize,
    pub left: usize,
    pub right: usize,
}

/// Region of a board photograph holding the chip and every wire stub.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardCrop {
    pub borders: MaskBorders,
    pub rows: Range<usize>,
    pub cols: Range<usize>,
}

impl BoardCrop {
    /// Rows and columns of the `width`-column strip along the `side` edge of the crop.
    pub fn pad_strip(&self, side: Side, width: usize) -> (Range<usize>, Range<usize>) {
        let width = width.min(self.cols.len());
        let cols = match side {
            Side::Left => self.cols.start..self.cols.start + width,
            Side::Right => self.cols.end - width..self.cols.end,
        };
        (self.rows.clone(), cols)
    }
}

#[inline]
fn is_mask(rgb: [u8; 3], params: &BoardCropParams) -> bool {
    (0..3).all(|c| rgb[c] >= params.mask_lower[c] && rgb[c] <= params.mask_upper[c])
}

fn column_is_border(img: &RgbImageView<'_>, col: usize, params: &BoardCropParams) -> bool {
    let count = (0..img.height)
        .filter(|&row| is_mask(img.pixel(row, col), params))
        .count();
    count as f64 > params.min_mask_fraction * img.height as f64
}

fn row_is_border(img: &RgbImageView<'_>, row: usize, params: &BoardCropParams) -> bool {
    let count = (0..img.width)
        .filter(|&col| is_mask(img.pixel(row, col), params))
        .count();
    count as f64 > params.min_mask_fraction * img.width as f64
}

/// Scan inwards from every image edge for the first solder-mask row or column.
pub fn mask_borders(
    img: &RgbImageView<'_>,
    params: &BoardCropParams,
) -> Result<MaskBorders, WireCheckError> {
    let missing = |border| WireCheckError::MaskBorderNotFound { border };
    let top = (0..img.height)
        .find(|&r| row_is_border(img, r, params))
        .ok_or_else(|| missing("top"))?;
    let bottom = (0..img.height)
        .rev()
        .find(|&r| row_is_border(img, r, params))
        .ok_or_else(|| missing("bottom"))?;
    let left = (0..img.width)
        .find(|&c| column_is_border(img, c, params))
        .ok_or_else(|| missing("left"))?;
    let right = (0..img.width)
        .rev()
        .find(|&c| column_is_border(img, c, params))
        .ok_or_else(|| missing("right"))?;
    Ok(MaskBorders {
        top,
        bottom,
        left,
        right,
    })
}

/// Copy of `rows x cols`, so that tracing cannot leave the window.
fn window(img: &RgbImageView<'_>, rows: &Range<usize>, cols: &Range<usize>) -> Vec<u8> {
    let mut out = Vec::with_capacity(rows.len() * cols.len() * 3);
    for row in rows.clone() {
        let start = (row * img.width + cols.start) * 3;
        out.extend_from_slice(&img.data[start..start + cols.len() * 3]);
    }
    out
}

/// Outermost wire column reached from the seeds of one slice, in image coordinates.
fn slice_extent(
    img: &RgbImageView<'_>,
    rows: &Range<usize>,
    cols: &Range<usize>,
    side: Side,
    params: &BoardCropParams,
    norm: &PixelNorm,
) -> Result<Option<usize>, WireCheckError> {
    let data = window(img, rows, cols);
    let view = RgbImageView {
        width: cols.len(),
        height: rows.len(),
        data: &data,
    };
    let last = view.width - 1;
    let seed_col = match side {
        Side::Left => view.width.saturating_sub(params.seed_inset).min(last),
        Side::Right => params.seed_inset.min(last),
    };

    let mut covered: HashSet<PixelCoord> = HashSet::new();
    let mut extent: Option<usize> = None;
    for row in 0..view.height {
        let seed = PixelCoord::new(row as i32, seed_col as i32);
        if covered.contains(&seed) || !is_foreground(&view, seed, norm) {
            continue;
        }
        let wire = trace_wire(&view, seed, norm)?;
        if let Some(edges) = wire.edges() {
            let col = match side {
                Side::Left => edges.left.col,
                Side::Right => edges.right.col,
            } as usize;
            extent = Some(match (extent, side) {
                (None, _) => col,
                (Some(e), Side::Left) => e.min(col),
                (Some(e), Side::Right) => e.max(col),
            });
        }
        covered.extend(wire.pixels);
    }
    Ok(extent.map(|c| c + cols.start))
}

fn stub_window(
    img: &RgbImageView<'_>,
    borders: &MaskBorders,
    side: Side,
    params: &BoardCropParams,
) -> Result<(Range<usize>, Range<usize>), WireCheckError> {
    let [near, far] = params.stub_offsets.map(|o| o as i64);
    let (c0, c1) = match side {
        Side::Left => (borders.left as i64 - far, borders.left as i64 - near),
        Side::Right => (borders.right as i64 + near, borders.right as i64 + far),
    };
    let out_of_bounds = || WireCheckError::StubWindowOutOfBounds {
        side,
        rows: params.stub_rows,
        cols: [c0, c1],
        width: img.width,
        height: img.height,
    };
    let rows = resolve_axis_offset(params.stub_rows[0], img.height)
        .zip(resolve_axis_offset(params.stub_rows[1], img.height))
        .filter(|(a, b)| a < b)
        .ok_or_else(out_of_bounds)?;
    if c0 < 0 || c1 > img.width as i64 || c0 >= c1 {
        return Err(out_of_bounds());
    }
    Ok((rows.0..rows.1, c0 as usize..c1 as usize))
}

/// Outermost column the wire stubs of `side` reach.
pub fn stub_extent(
    img: &RgbImageView<'_>,
    borders: &MaskBorders,
    side: Side,
    params: &BoardCropParams,
    norm: &PixelNorm,
) -> Result<usize, WireCheckError> {
    let (rows, cols) = stub_window(img, borders, side, params)?;
    let slices = params.slices.max(1);
    let slice_rows = (rows.len() / slices).max(1);
    let traced = ((slice_rows as f64 * params.slice_fraction).round() as usize).clamp(1, slice_rows);

    let mut extent: Option<usize> = None;
    let mut used = 0;
    for k in 0..slices {
        let start = rows.start + k * slice_rows;
        if start >= rows.end {
            break;
        }
        let slice = start..(start + traced).min(rows.end);
        if let Some(col) = slice_extent(img, &slice, &cols, side, params, norm)? {
            used += 1;
            extent = Some(match (extent, side) {
                (None, _) => col,
                (Some(e), Side::Left) => e.min(col),
                (Some(e), Side::Right) => e.max(col),
            });
        }
    }
    debug!("{side}: {used} of {slices} slices hold wire stubs, extent {extent:?}");
    extent.ok_or(WireCheckError::NoWireStubs { side })
}

/// Crop a board photograph to its solder-mask rows and the reach of its wire stubs.
#[cfg_attr(
    feature = "tracing",
    instrument(level = "info", skip(img, params, norm), fields(width = img.width, height = img.height))
)]
pub fn crop_board(
    img: &RgbImageView<'_>,
    params: &BoardCropParams,
    norm: &PixelNorm,
) -> Result<BoardCrop, WireCheckError> {
    let borders = mask_borders(img, params)?;
    let left = stub_extent(img, &borders, Side::Left, params, norm)?;
    let right = stub_extent(img, &borders, Side::Right, params, norm)?;
    let crop = BoardCrop {
        borders,
        rows: borders.top..borders.bottom + 1,
        cols: left..right + 1,
    };
    info!("board crop rows {:?}, cols {:?}", crop.rows, crop.cols);
    Ok(crop)
}
