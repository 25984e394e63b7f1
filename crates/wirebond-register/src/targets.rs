//! Circular fiducials ("mires") inside fixed search windows.

use std::ops::Range;

use imageproc::filter::median_filter;
use log::{debug, info};
use nalgebra::Point2;
use serde::{Deserialize, Serialize};
use wirebond_core::{resolve_axis_offset, RgbImageView};

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::hough::hough_circles;
use crate::raster::gray_window;
use crate::{RegistrationError, TargetParams, TargetRegion};

/// A fiducial center in image coordinates (`x` = column); the radius is for drawing.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Target {
    pub center: Point2<f64>,
    pub radius: f64,
}

/// Pixel ranges of `region` on a `width` x `height` image.
pub fn resolve_region(
    region: &TargetRegion,
    width: usize,
    height: usize,
) -> Result<(Range<usize>, Range<usize>), RegistrationError> {
    let out_of_bounds = || RegistrationError::RegionOutOfBounds {
        row0: region.row0,
        row1: region.row1,
        col0: region.col0,
        col1: region.col1,
        width,
        height,
    };
    let rows = resolve_axis_offset(region.row0, height)
        .zip(resolve_axis_offset(region.row1, height))
        .filter(|(a, b)| a < b)
        .ok_or_else(out_of_bounds)?;
    let cols = resolve_axis_offset(region.col0, width)
        .zip(resolve_axis_offset(region.col1, width))
        .filter(|(a, b)| a < b)
        .ok_or_else(out_of_bounds)?;
    Ok((rows.0..rows.1, cols.0..cols.1))
}

/// Fiducials of every search window, in window order.
///
/// Each window contributes at most its `count` strongest circles, top to
/// bottom. Anything other than exactly `expected_total` fiducials is an error.
#[cfg_attr(
    feature = "tracing",
    instrument(level = "info", skip(img, params), fields(width = img.width, height = img.height))
)]
pub fn find_targets(
    img: &RgbImageView<'_>,
    params: &TargetParams,
) -> Result<Vec<Target>, RegistrationError> {
    let mut targets = Vec::with_capacity(params.expected_total);
    for region in &params.regions {
        let (rows, cols) = resolve_region(region, img.width, img.height)?;
        let (row0, col0) = (rows.start as f64, cols.start as f64);
        let gray = gray_window(img, rows, cols);
        let smoothed = median_filter(
            &gray,
            params.hough.median_radius,
            params.hough.median_radius,
        );
        let circles = hough_circles(&smoothed, &params.hough)?;
        debug!(
            "region {:?}: {} circles, keeping {}",
            region,
            circles.len(),
            region.count.min(circles.len())
        );
        let mut kept: Vec<Target> = circles
            .into_iter()
            .take(region.count)
            .map(|c| Target {
                center: Point2::new(c.center.x + col0, c.center.y + row0),
                radius: c.radius,
            })
            .collect();
        kept.sort_by(|a, b| a.center.y.total_cmp(&b.center.y));
        targets.extend(kept);
    }

    if targets.len() != params.expected_total {
        return Err(RegistrationError::TargetCountMismatch {
            expected: params.expected_total,
            found: targets.len(),
        });
    }
    info!("found {} targets", targets.len());
    Ok(targets)
}

/// Finds fiducials with fixed parameters.
#[derive(Clone, Debug, Default)]
pub struct TargetDetector {
    params: TargetParams,
}

impl TargetDetector {
    pub fn new(params: TargetParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &TargetParams {
        &self.params
    }

    pub fn detect(&self, img: &RgbImageView<'_>) -> Result<Vec<Target>, RegistrationError> {
        find_targets(img, &self.params)
    }
}
