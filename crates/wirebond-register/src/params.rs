use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use crate::RegistrationError;

/// Gradient Hough transform for circles.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CircleHoughParams {
    /// Median filter radius applied before edge detection (`2` is a 5x5 window).
    pub median_radius: u32,
    /// Upper Canny threshold; the lower one is half of it.
    pub canny_high: f32,
    /// A center needs strictly more votes than this inside its 7x7 centroid window.
    pub accumulator_threshold: u32,
    pub min_radius: u32,
    pub max_radius: u32,
    /// Minimum distance between two accepted centers.
    pub min_dist: f64,
}

impl Default for CircleHoughParams {
    fn default() -> Self {
        Self {
            median_radius: 2,
            canny_high: 50.0,
            accumulator_threshold: 100,
            min_radius: 20,
            max_radius: 30,
            min_dist: 100.0,
        }
    }
}

impl CircleHoughParams {
    /// Rejects radius ranges the accumulator cannot vote over.
    pub fn validate(&self) -> Result<(), RegistrationError> {
        if self.min_radius == 0 || self.min_radius > self.max_radius {
            return Err(RegistrationError::InvalidRadiusRange {
                min: self.min_radius,
                max: self.max_radius,
            });
        }
        Ok(())
    }
}

/// Rectangular search window for fiducials.
///
/// Bounds are half-open. Negative values count from the far edge.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetRegion {
    pub row0: i64,
    pub row1: i64,
    pub col0: i64,
    pub col1: i64,
    /// Fiducials expected inside the window.
    pub count: usize,
}

impl TargetRegion {
    pub const fn new(row0: i64, row1: i64, col0: i64, col1: i64, count: usize) -> Self {
        Self {
            row0,
            row1,
            col0,
            col1,
            count,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TargetParams {
    /// Windows in output order: left column top, bottom, middle; then right column.
    pub regions: Vec<TargetRegion>,
    pub hough: CircleHoughParams,
    /// Exact number of fiducials a board must show.
    pub expected_total: usize,
}

impl Default for TargetParams {
    fn default() -> Self {
        Self {
            regions: vec![
                TargetRegion::new(100, 400, 300, 600, 1),
                TargetRegion::new(-400, -100, 300, 600, 1),
                TargetRegion::new(3800, 4200, 500, 800, 2),
                TargetRegion::new(100, 400, -600, -300, 1),
                TargetRegion::new(-400, -100, -600, -300, 1),
                TargetRegion::new(3800, 4200, -800, -500, 2),
            ],
            hough: CircleHoughParams::default(),
            expected_total: 8,
        }
    }
}

/// Green solder-mask thresholding and contour sampling.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EdgeParams {
    /// Inclusive per-channel RGB range of solder-mask pixels.
    pub green_lower: [u8; 3],
    pub green_upper: [u8; 3],
    /// Median filter radius applied to the mask (`12` is a 25x25 window).
    pub median_radius: u32,
    /// Sampled column ranges `[start, end)`, as offsets from the image's middle column.
    pub column_ranges: Vec<[i64; 2]>,
}

impl Default for EdgeParams {
    fn default() -> Self {
        Self {
            green_lower: [0, 40, 0],
            green_upper: [110, 110, 40],
            median_radius: 12,
            column_ranges: vec![[-2000, -1500], [1500, 2000]],
        }
    }
}

/// Standard Hough transform for the central reference wire.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CenterWireParams {
    /// Crop rows as fractions of the image height.
    pub row_fractions: [f64; 2],
    /// Crop half-width around the middle column.
    pub half_width: usize,
    pub median_radius: u32,
    pub canny_low: f32,
    pub canny_high: f32,
    pub rho_step: f64,
    pub theta_step: f64,
    pub min_theta: f64,
    pub max_theta: f64,
    /// A line needs strictly more votes than this.
    pub vote_threshold: u32,
    /// Strongest lines averaged into the wire.
    pub max_lines: usize,
}

impl Default for CenterWireParams {
    fn default() -> Self {
        Self {
            row_fractions: [1.0 / 3.0, 0.5],
            half_width: 200,
            median_radius: 1,
            canny_low: 50.0,
            canny_high: 200.0,
            rho_step: 1.0,
            theta_step: PI / 360.0,
            min_theta: -PI / 8.0,
            max_theta: PI / 8.0,
            vote_threshold: 220,
            max_lines: 2,
        }
    }
}

/// Everything the registration side needs.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistrationParams {
    pub targets: TargetParams,
    pub edges: EdgeParams,
    pub center_wire: CenterWireParams,
    /// `|theta|` below this treats the center wire as exactly vertical.
    pub vertical_eps: f64,
}

impl Default for RegistrationParams {
    fn default() -> Self {
        Self {
            targets: TargetParams::default(),
            edges: EdgeParams::default(),
            center_wire: CenterWireParams::default(),
            vertical_eps: 1e-9,
        }
    }
}
