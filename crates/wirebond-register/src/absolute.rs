//! Absolute board frame from the eight mapped fiducials, and pad boxes.

use std::{fs, path::Path};

use nalgebra::{Matrix2, Point2, Vector2};
use serde::{Deserialize, Serialize};

use crate::RegistrationError;

/// Rotation, origin and scale of the board as seen through its fiducials.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct AbsoluteFrame {
    /// Mean of the fiducial centers.
    pub origin: Point2<f64>,
    /// Board-to-image rotation.
    pub rotation: Matrix2<f64>,
    /// Mean horizontal slope (row per column) across the fiducial pairs.
    pub slope: f64,
    /// Mean length of the two fiducial diagonals, in pixels.
    pub dilation: f64,
}

impl AbsoluteFrame {
    #[inline]
    pub fn to_image(&self, board: Point2<f64>, scale: f64) -> Point2<f64> {
        self.origin + self.rotation * (board.coords * scale)
    }
}

/// Build the absolute frame from fiducials in detection order.
///
/// Centers `i` and `i + 4` face each other across the board; `0`-`5` and
/// `1`-`4` are the diagonals.
pub fn absolute_frame(centers: &[Point2<f64>]) -> Result<AbsoluteFrame, RegistrationError> {
    if centers.len() != 8 {
        return Err(RegistrationError::TargetCountMismatch {
            expected: 8,
            found: centers.len(),
        });
    }
    let dilation =
        0.5 * ((centers[0] - centers[5]).norm() + (centers[1] - centers[4]).norm());

    let mut slope = 0.0;
    for i in 0..4 {
        let d: Vector2<f64> = centers[i + 4] - centers[i];
        if d.x == 0.0 {
            return Err(RegistrationError::DegenerateTargets(i));
        }
        slope += d.y / d.x;
    }
    slope /= 4.0;

    let origin = Point2::from(centers.iter().map(|c| c.coords).sum::<Vector2<f64>>() / 8.0);
    let rotation = Matrix2::new(1.0, -slope, slope, 1.0) / (slope * slope + 1.0).sqrt();

    Ok(AbsoluteFrame {
        origin,
        rotation,
        slope,
        dilation,
    })
}

/// Pad corners of the reference board, in its absolute frame.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PadLayout {
    /// Fiducial dilation measured on the reference board.
    pub reference_dilation: f64,
    /// Two opposite corners per pad, `[x, y]`.
    pub pads: Vec<[[f64; 2]; 2]>,
}

impl PadLayout {
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, RegistrationError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), RegistrationError> {
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }
}

/// Pad corners in image coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PadBox {
    pub corners: [Point2<f64>; 2],
}

impl PadBox {
    /// Axis-aligned `(min, max)` bounds of the two corners.
    pub fn bounds(&self) -> (Point2<f64>, Point2<f64>) {
        let [a, b] = self.corners;
        (
            Point2::new(a.x.min(b.x), a.y.min(b.y)),
            Point2::new(a.x.max(b.x), a.y.max(b.y)),
        )
    }
}

/// Place every pad of `layout` on the board seen through `frame`.
pub fn find_pads(
    frame: &AbsoluteFrame,
    layout: &PadLayout,
) -> Result<Vec<PadBox>, RegistrationError> {
    if layout.reference_dilation <= 0.0 {
        return Err(RegistrationError::InvalidDilation(layout.reference_dilation));
    }
    let scale = frame.dilation / layout.reference_dilation;
    Ok(layout
        .pads
        .iter()
        .map(|[a, b]| PadBox {
            corners: [
                frame.to_image(Point2::new(a[0], a[1]), scale),
                frame.to_image(Point2::new(b[0], b[1]), scale),
            ],
        })
        .collect())
}
