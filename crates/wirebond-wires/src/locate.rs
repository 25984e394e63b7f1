//! Seed discovery: one seed pixel per bonding wire.
//!
//! Each image half is handled separately. The rows of the wire zone are found
//! by walking inwards from the top and bottom until the green solder mask is
//! reached, then stepping past it by fixed margins. Inside that band, the
//! first column from the lateral edge that crosses enough intensity peaks cuts
//! through every wire; a column a fixed offset further in is sampled and each
//! of its peaks becomes a seed.

use std::ops::Range;

use log::{debug, info};
use serde::{Deserialize, Serialize};
use wirebond_core::{gray_from_rgb, GrayImageView, PixelCoord, RgbImageView};

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::peaks::{count_peaks, find_peaks};
use crate::{BandStrategy, LocatorParams, PeakParams, Side, WireCheckError};

/// Row range `[top, bottom)` holding the wires of one image half.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireBand {
    pub top: usize,
    pub bottom: usize,
}

impl WireBand {
    #[inline]
    pub fn rows(&self) -> Range<usize> {
        self.top..self.bottom
    }
}

/// Seeds of one image half: every seed shares `column`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SideSeeds {
    pub side: Side,
    pub band: WireBand,
    /// First column (from the lateral edge) crossing enough peaks.
    pub boundary_column: usize,
    /// Sampled column.
    pub column: usize,
    /// Absolute rows of the detected peaks, ascending.
    pub rows: Vec<usize>,
}

impl SideSeeds {
    pub fn seeds(&self) -> impl Iterator<Item = PixelCoord> + '_ {
        let col = self.column as i32;
        self.rows.iter().map(move |&r| PixelCoord::new(r as i32, col))
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireSeeds {
    pub left: SideSeeds,
    pub right: SideSeeds,
}

impl WireSeeds {
    /// Detected wire count.
    #[inline]
    pub fn count(&self) -> usize {
        self.left.rows.len() + self.right.rows.len()
    }

    /// Left seeds top to bottom, then right seeds top to bottom.
    pub fn iter(&self) -> impl Iterator<Item = (Side, PixelCoord)> + '_ {
        self.left
            .seeds()
            .map(|p| (Side::Left, p))
            .chain(self.right.seeds().map(|p| (Side::Right, p)))
    }
}

/// Finds wire seeds on a full module photograph.
#[derive(Clone, Debug, Default)]
pub struct WireLocator {
    params: LocatorParams,
}

impl WireLocator {
    pub fn new(params: LocatorParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &LocatorParams {
        &self.params
    }

    pub fn locate(&self, img: &RgbImageView<'_>) -> Result<WireSeeds, WireCheckError> {
        locate_wires(img, &self.params)
    }
}

/// Seeds for both image halves.
#[cfg_attr(
    feature = "tracing",
    instrument(level = "info", skip(img, params), fields(width = img.width, height = img.height))
)]
pub fn locate_wires(
    img: &RgbImageView<'_>,
    params: &LocatorParams,
) -> Result<WireSeeds, WireCheckError> {
    let gray = gray_from_rgb(img);
    let gray = gray.view();
    let half = img.width / 2;

    let left = locate_side(img, &gray, Side::Left, 0..half, params)?;
    let right = locate_side(img, &gray, Side::Right, half..img.width, params)?;
    info!(
        "located {} wires (left {} at col {}, right {} at col {})",
        left.rows.len() + right.rows.len(),
        left.rows.len(),
        left.column,
        right.rows.len(),
        right.column
    );
    Ok(WireSeeds { left, right })
}

fn locate_side(
    img: &RgbImageView<'_>,
    gray: &GrayImageView<'_>,
    side: Side,
    cols: Range<usize>,
    params: &LocatorParams,
) -> Result<SideSeeds, WireCheckError> {
    let band = wire_band(img, gray, cols, &params.band, side)?;
    let boundary_column = wire_boundary_column(gray, band, side, params)?;

    let column = match side {
        Side::Left => boundary_column as i64 + params.seed_offset as i64,
        Side::Right => boundary_column as i64 - params.seed_offset as i64,
    };
    if column < 0 || column >= gray.width as i64 {
        return Err(WireCheckError::SampleColumnOutOfBounds {
            side,
            column,
            width: gray.width,
        });
    }
    let column = column as usize;

    let rows = find_peaks(&gray.column(column, band.rows()), &params.peaks)
        .into_iter()
        .map(|r| r + band.top)
        .collect();
    debug!("{side}: band {band:?}, boundary col {boundary_column}, sampled col {column}");

    Ok(SideSeeds {
        side,
        band,
        boundary_column,
        column,
        rows,
    })
}

/// Isolate the wire rows of the half spanning `cols`.
pub fn wire_band(
    img: &RgbImageView<'_>,
    gray: &GrayImageView<'_>,
    cols: Range<usize>,
    strategy: &BandStrategy,
    side: Side,
) -> Result<WireBand, WireCheckError> {
    let profile = match *strategy {
        BandStrategy::GreenRatio { .. } => green_ratio_profile(img, cols),
        BandStrategy::GrayMean { binarize_at, .. } => gray_mean_profile(gray, cols, binarize_at),
    };
    let level = strategy.level();
    let (top_margin, bottom_margin) = strategy.margins();

    let n = profile.len();
    if n == 0 {
        return Err(WireCheckError::EmptyBand {
            side,
            top: 0,
            bottom: 0,
        });
    }

    let mut high = 0;
    while high < n / 2 && profile[high] <= level {
        high += 1;
    }
    let mut low = n - 1;
    while low > n / 2 && profile[low] <= level {
        low -= 1;
    }

    let top = high as i64 + top_margin;
    let bottom = (low as i64 - bottom_margin).min(n as i64);
    if top < 0 || top >= bottom {
        return Err(WireCheckError::EmptyBand { side, top, bottom });
    }
    Ok(WireBand {
        top: top as usize,
        bottom: bottom as usize,
    })
}

/// Per-row `sum(G) / (sum(R) + sum(B))` over `cols`.
fn green_ratio_profile(img: &RgbImageView<'_>, cols: Range<usize>) -> Vec<f64> {
    (0..img.height)
        .map(|row| {
            let (mut rb, mut g) = (0u64, 0u64);
            for col in cols.clone() {
                let [r, gg, b] = img.pixel(row, col);
                rb += r as u64 + b as u64;
                g += gg as u64;
            }
            match (rb, g) {
                (0, 0) => 0.0,
                (0, _) => f64::INFINITY,
                _ => g as f64 / rb as f64,
            }
        })
        .collect()
}

/// Per-row mean of the gray image binarized to 0/255 at `threshold`.
fn gray_mean_profile(gray: &GrayImageView<'_>, cols: Range<usize>, threshold: u8) -> Vec<f64> {
    let width = cols.len().max(1) as f64;
    (0..gray.height)
        .map(|row| {
            let bright = cols.clone().filter(|&c| gray.get(row, c) > threshold).count();
            255.0 * bright as f64 / width
        })
        .collect()
}

/// First column from the lateral edge whose band profile holds at least
/// `min_wires_per_column` peaks. Searches the full image width.
pub fn wire_boundary_column(
    gray: &GrayImageView<'_>,
    band: WireBand,
    side: Side,
    params: &LocatorParams,
) -> Result<usize, WireCheckError> {
    let crosses_all = |col: usize| {
        column_peak_count(gray, band, col, &params.peaks) >= params.min_wires_per_column
    };
    let found = match side {
        Side::Left => (0..gray.width).find(|&c| crosses_all(c)),
        Side::Right => (0..gray.width).rev().find(|&c| crosses_all(c)),
    };
    found.ok_or(WireCheckError::WireColumnNotFound {
        side,
        min_wires: params.min_wires_per_column,
    })
}

#[inline]
fn column_peak_count(
    gray: &GrayImageView<'_>,
    band: WireBand,
    col: usize,
    params: &PeakParams,
) -> usize {
    count_peaks(&gray.column(col, band.rows()), params)
}
