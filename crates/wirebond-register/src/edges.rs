//! Board edges from the green solder mask and the central reference wire.

use std::ops::Range;

use imageproc::edges::canny;
use imageproc::filter::median_filter;
use log::debug;
use nalgebra::Point2;
use serde::{Deserialize, Serialize};
use wirebond_core::{fit_line, LineFit, RgbImageView};

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::hough::hough_lines;
use crate::raster::{gray_window, in_range_mask};
use crate::{CenterWireParams, EdgeParams, RegistrationError};

/// Top and bottom solder-mask boundaries, as `row = slope * col + intercept`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoardEdges {
    pub top: LineFit,
    pub bottom: LineFit,
    /// Mean `bottom - top` row distance over the sampled columns; the image's dilation.
    pub spacing: f64,
    /// Sampled contour points (`x` = column).
    pub top_contour: Vec<Point2<f64>>,
    pub bottom_contour: Vec<Point2<f64>>,
}

/// Fit both board edges.
///
/// Columns whose filtered mask is empty are skipped.
#[cfg_attr(
    feature = "tracing",
    instrument(level = "info", skip(img, params), fields(width = img.width, height = img.height))
)]
pub fn board_edges(
    img: &RgbImageView<'_>,
    params: &EdgeParams,
) -> Result<BoardEdges, RegistrationError> {
    let middle = (img.width / 2) as i64;
    let pad = params.median_radius as usize;
    let mut top_contour = Vec::new();
    let mut bottom_contour = Vec::new();

    for &[start, end] in &params.column_ranges {
        let cols = column_range(middle + start, middle + end, img.width)?;
        // Filter a slightly wider strip so the sampled columns see a full window.
        let strip = cols.start.saturating_sub(pad)..(cols.end + pad).min(img.width);
        let mask = in_range_mask(img, strip.clone(), params.green_lower, params.green_upper);
        let mask = median_filter(&mask, params.median_radius, params.median_radius);

        for col in cols {
            let x = (col - strip.start) as u32;
            let mut rows = (0..mask.height()).filter(|&y| mask.get_pixel(x, y)[0] == 255);
            let Some(first) = rows.next() else {
                continue;
            };
            let last = rows.last().unwrap_or(first);
            top_contour.push(Point2::new(col as f64, first as f64));
            bottom_contour.push(Point2::new(col as f64, last as f64));
        }
    }

    if top_contour.is_empty() {
        return Err(RegistrationError::EdgeContourEmpty);
    }
    let top = fit_line(&top_contour).ok_or(RegistrationError::DegenerateRegression("top"))?;
    let bottom =
        fit_line(&bottom_contour).ok_or(RegistrationError::DegenerateRegression("bottom"))?;
    let spacing = top_contour
        .iter()
        .zip(&bottom_contour)
        .map(|(t, b)| b.y - t.y)
        .sum::<f64>()
        / top_contour.len() as f64;
    debug!(
        "edges: top {:.4}x+{:.1}, bottom {:.4}x+{:.1}, spacing {:.1} over {} columns",
        top.slope,
        top.intercept,
        bottom.slope,
        bottom.intercept,
        spacing,
        top_contour.len()
    );

    Ok(BoardEdges {
        top,
        bottom,
        spacing,
        top_contour,
        bottom_contour,
    })
}

fn column_range(start: i64, end: i64, width: usize) -> Result<Range<usize>, RegistrationError> {
    if start < 0 || end > width as i64 || start >= end {
        return Err(RegistrationError::ColumnRangeOutOfBounds { start, end, width });
    }
    Ok(start as usize..end as usize)
}

/// Averaged Hough line of the central reference wire.
///
/// `rho` and `theta` are relative to the crop whose top-left pixel is `crop_origin`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CenterWire {
    pub rho: f64,
    pub theta: f64,
    pub crop_origin: Point2<f64>,
    pub lines_used: usize,
}

impl CenterWire {
    /// The wire as `col = p * row + q` in image coordinates.
    pub fn as_col_of_row(&self) -> (f64, f64) {
        let (alpha, beta) = (self.crop_origin.x, self.crop_origin.y);
        let (s, c) = self.theta.sin_cos();
        let tan = s / c;
        (-tan, alpha + self.rho / c + beta * tan)
    }
}

#[cfg_attr(
    feature = "tracing",
    instrument(level = "info", skip(img, params), fields(width = img.width, height = img.height))
)]
pub fn center_wire(
    img: &RgbImageView<'_>,
    params: &CenterWireParams,
) -> Result<CenterWire, RegistrationError> {
    let row0 = (img.height as f64 * params.row_fractions[0]).round() as usize;
    let row1 = ((img.height as f64 * params.row_fractions[1]).round() as usize).min(img.height);
    let middle = img.width / 2;
    let col0 = middle.saturating_sub(params.half_width);
    let col1 = (middle + params.half_width).min(img.width);
    if row0 >= row1 || col0 >= col1 {
        return Err(RegistrationError::CenterWireNotFound {
            threshold: params.vote_threshold,
        });
    }

    let gray = gray_window(img, row0..row1, col0..col1);
    let smoothed = median_filter(&gray, params.median_radius, params.median_radius);
    let edges = canny(&smoothed, params.canny_low, params.canny_high);
    let lines = hough_lines(&edges, params);
    let used = &lines[..lines.len().min(params.max_lines)];
    if used.is_empty() {
        return Err(RegistrationError::CenterWireNotFound {
            threshold: params.vote_threshold,
        });
    }

    let n = used.len() as f64;
    let wire = CenterWire {
        rho: used.iter().map(|l| l.rho).sum::<f64>() / n,
        theta: used.iter().map(|l| l.theta).sum::<f64>() / n,
        crop_origin: Point2::new(col0 as f64, row0 as f64),
        lines_used: used.len(),
    };
    debug!(
        "center wire: rho {:.2} theta {:.5} from {} lines",
        wire.rho, wire.theta, wire.lines_used
    );
    Ok(wire)
}
