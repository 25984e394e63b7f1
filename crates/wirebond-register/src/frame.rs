//! Board-relative frame of one image and reference-to-photo mapping.
//!
//! The frame origin is where the central reference wire meets the bottom
//! board edge. Its basis columns are the unit bottom-edge direction
//! (towards increasing column) and the unit wire direction (towards
//! increasing row), so `image = origin + basis * board`.

use log::{debug, info};
use nalgebra::{Matrix2, Point2, Vector2};
use serde::{Deserialize, Serialize};
use wirebond_core::{normalize_or_keep, RgbImageView};

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::edges::{board_edges, center_wire, BoardEdges, CenterWire};
use crate::targets::{find_targets, Target};
use crate::{RegistrationError, RegistrationParams};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoardFrame {
    pub origin: Point2<f64>,
    /// Board-to-image linear part; columns are the horizontal and vertical axes.
    pub basis: Matrix2<f64>,
    /// Mean solder-mask height in pixels.
    pub dilation: f64,
}

impl BoardFrame {
    #[inline]
    pub fn to_image(&self, board: Point2<f64>) -> Point2<f64> {
        self.origin + self.basis * board.coords
    }

    pub fn to_board(&self, image: Point2<f64>) -> Result<Point2<f64>, RegistrationError> {
        let inv = self
            .basis
            .try_inverse()
            .ok_or(RegistrationError::SingularFrame)?;
        Ok(Point2::from(inv * (image - self.origin)))
    }
}

/// Assemble a frame from the fitted bottom edge and the center wire.
pub fn frame_from_parts(
    edges: &BoardEdges,
    wire: &CenterWire,
    vertical_eps: f64,
) -> Result<BoardFrame, RegistrationError> {
    let (c, d) = (edges.bottom.slope, edges.bottom.intercept);
    let (p, q) = if wire.theta.abs() < vertical_eps {
        (0.0, wire.crop_origin.x + wire.rho)
    } else {
        wire.as_col_of_row()
    };

    // col = p * row + q meets row = c * col + d.
    let denom = 1.0 - p * c;
    if denom.abs() < f64::EPSILON {
        return Err(RegistrationError::ParallelLines);
    }
    let x = (p * d + q) / denom;
    let origin = Point2::new(x, c * x + d);

    let horizontal = normalize_or_keep(Vector2::new(1.0, c));
    let vertical = normalize_or_keep(Vector2::new(p, 1.0));
    let basis = Matrix2::from_columns(&[horizontal, vertical]);
    if basis.determinant().abs() < f64::EPSILON {
        return Err(RegistrationError::SingularFrame);
    }

    Ok(BoardFrame {
        origin,
        basis,
        dilation: edges.spacing,
    })
}

/// Frame of one board photograph.
#[cfg_attr(
    feature = "tracing",
    instrument(level = "info", skip(img, params), fields(width = img.width, height = img.height))
)]
pub fn board_frame(
    img: &RgbImageView<'_>,
    params: &RegistrationParams,
) -> Result<BoardFrame, RegistrationError> {
    let edges = board_edges(img, &params.edges)?;
    let wire = center_wire(img, &params.center_wire)?;
    let frame = frame_from_parts(&edges, &wire, params.vertical_eps)?;
    debug!(
        "frame origin ({:.1}, {:.1}), dilation {:.2}",
        frame.origin.x, frame.origin.y, frame.dilation
    );
    Ok(frame)
}

/// Carry image points of the reference board onto the photographed board.
///
/// Each point is expressed in the reference frame, scaled by the photo to
/// reference dilation ratio and re-emitted through the photo frame.
pub fn map_reference_to_photo(
    reference: &BoardFrame,
    photo: &BoardFrame,
    points: &[Point2<f64>],
) -> Result<Vec<Point2<f64>>, RegistrationError> {
    if reference.dilation <= 0.0 {
        return Err(RegistrationError::InvalidDilation(reference.dilation));
    }
    let scale = photo.dilation / reference.dilation;
    points
        .iter()
        .map(|&p| {
            let board = reference.to_board(p)?;
            Ok(photo.to_image(Point2::from(board.coords * scale)))
        })
        .collect()
}

/// Reference fiducials carried onto a photographed board.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Registration {
    pub reference_frame: BoardFrame,
    pub photo_frame: BoardFrame,
    /// Photo dilation over reference dilation.
    pub relative_dilation: f64,
    pub reference_targets: Vec<Target>,
    /// Predicted fiducial centers on the photograph, in reference order.
    pub mapped_targets: Vec<Point2<f64>>,
}

/// Detect fiducials on the unwired `reference` and predict them on `photo`.
pub fn register(
    reference: &RgbImageView<'_>,
    photo: &RgbImageView<'_>,
    params: &RegistrationParams,
) -> Result<Registration, RegistrationError> {
    let reference_targets = find_targets(reference, &params.targets)?;
    let reference_frame = board_frame(reference, params)?;
    let photo_frame = board_frame(photo, params)?;
    let centers: Vec<_> = reference_targets.iter().map(|t| t.center).collect();
    let mapped_targets = map_reference_to_photo(&reference_frame, &photo_frame, &centers)?;
    let relative_dilation = photo_frame.dilation / reference_frame.dilation;
    info!(
        "mapped {} targets, relative dilation {:.4}",
        mapped_targets.len(),
        relative_dilation
    );
    Ok(Registration {
        reference_frame,
        photo_frame,
        relative_dilation,
        reference_targets,
        mapped_targets,
    })
}

/// Registration with fixed parameters.
#[derive(Clone, Debug, Default)]
pub struct CoordinateRegistrar {
    params: RegistrationParams,
}

impl CoordinateRegistrar {
    pub fn new(params: RegistrationParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &RegistrationParams {
        &self.params
    }

    pub fn frame(&self, img: &RgbImageView<'_>) -> Result<BoardFrame, RegistrationError> {
        board_frame(img, &self.params)
    }

    pub fn register(
        &self,
        reference: &RgbImageView<'_>,
        photo: &RgbImageView<'_>,
    ) -> Result<Registration, RegistrationError> {
        register(reference, photo, &self.params)
    }
}
