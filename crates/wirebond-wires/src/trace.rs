//! Breadth-first flood fill of one wire from a seed pixel.

use std::collections::{HashSet, VecDeque};

use log::warn;
use serde::{Deserialize, Serialize};
use wirebond_core::{is_foreground, PixelCoord, PixelNorm, RgbImageView};

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::WireCheckError;

/// Neighbour enumeration order, as `(d_row, d_col)`.
///
/// Only the discovery order of [`Wire::pixels`] depends on it.
pub const NEIGHBOUR_OFFSETS: [(i32, i32); 8] = [
    (1, 0),
    (-1, 0),
    (0, 1),
    (0, -1),
    (1, 1),
    (1, -1),
    (-1, 1),
    (-1, -1),
];

/// Foreground pixels 8-connected to one seed, in discovery order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Wire {
    pub pixels: Vec<PixelCoord>,
}

/// Leftmost and rightmost pixel of a wire.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireEdges {
    pub left: PixelCoord,
    pub right: PixelCoord,
}

impl Wire {
    #[inline]
    pub fn len(&self) -> usize {
        self.pixels.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    /// More pixels than `threshold` means several wires fused into one component.
    #[inline]
    pub fn is_touching(&self, threshold: usize) -> bool {
        self.len() > threshold
    }

    /// First-discovered pixel with the smallest column and first-discovered
    /// pixel with the largest column. `None` for an empty wire.
    pub fn edges(&self) -> Option<WireEdges> {
        let first = *self.pixels.first()?;
        let mut left = first;
        let mut right = first;
        for &p in &self.pixels[1..] {
            if p.col < left.col {
                left = p;
            }
            if p.col > right.col {
                right = p;
            }
        }
        Some(WireEdges { left, right })
    }
}

/// Trace the wire containing `seed`.
///
/// A background seed yields an empty wire; a seed outside the image is an error.
#[cfg_attr(
    feature = "tracing",
    instrument(level = "debug", skip(img, norm), fields(width = img.width, height = img.height))
)]
pub fn trace_wire(
    img: &RgbImageView<'_>,
    seed: PixelCoord,
    norm: &PixelNorm,
) -> Result<Wire, WireCheckError> {
    if !img.is_valid_coord(seed) {
        return Err(WireCheckError::SeedOutOfBounds {
            row: seed.row,
            col: seed.col,
            width: img.width,
            height: img.height,
        });
    }
    if !is_foreground(img, seed, norm) {
        warn!("seed ({}, {}) is not a wire pixel", seed.row, seed.col);
        return Ok(Wire::default());
    }

    let mut seen = HashSet::new();
    let mut queue = VecDeque::new();
    let mut pixels = Vec::new();
    seen.insert(seed);
    queue.push_back(seed);

    while let Some(current) = queue.pop_front() {
        pixels.push(current);
        for (dr, dc) in NEIGHBOUR_OFFSETS {
            let next = current.offset(dr, dc);
            if is_foreground(img, next, norm) && seen.insert(next) {
                queue.push_back(next);
            }
        }
    }

    Ok(Wire { pixels })
}
