//! Pad-strip segmentation and per-pad wiring status.

use serde::{Deserialize, Serialize};
use wirebond_core::{normalized_norm, RgbImageView};

use crate::{PadStripParams, WireCheckError};

/// Rows `[row_start, row_end)` of one pad, relative to the strip.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PadZone {
    pub row_start: usize,
    pub row_end: usize,
}

impl PadZone {
    #[inline]
    pub fn contains_row(&self, row: i64) -> bool {
        row >= self.row_start as i64 && row < self.row_end as i64
    }
}

/// Mean normalized norm of every strip row, in `0..=√3`.
pub fn row_brightness(strip: &RgbImageView<'_>) -> Vec<f64> {
    let width = strip.width.max(1) as f64;
    (0..strip.height)
        .map(|row| {
            (0..strip.width)
                .map(|col| normalized_norm(strip.pixel(row, col)))
                .sum::<f64>()
                / width
        })
        .collect()
}

/// Split a strip holding only the chip pad column into pads, top to bottom.
pub fn segment_pads(strip: &RgbImageView<'_>, params: &PadStripParams) -> Vec<PadZone> {
    segment_profile(&row_brightness(strip), params)
}

fn segment_profile(profile: &[f64], params: &PadStripParams) -> Vec<PadZone> {
    let mut zones = Vec::new();
    let mut checkpoint = 0;
    let mut i = 0;
    while i < profile.len() {
        if profile[i] < params.separator_level && i.abs_diff(checkpoint) > params.min_pad_rows {
            zones.push(PadZone {
                row_start: checkpoint,
                row_end: i,
            });
            match (i + 1..profile.len()).find(|&r| profile[r] > params.resume_level) {
                Some(next) => {
                    checkpoint = next;
                    i = next;
                }
                None => break,
            }
        } else {
            i += 1;
        }
    }
    zones
}

/// Wiring status per pad.
///
/// `wire_rows` are the rows (strip-relative, ascending) of the left edge of
/// each wire landing on the strip. Pads and wires are walked together: a pad
/// is wired when the next unconsumed wire lies inside it. Wires left over once
/// every pad is visited are an error.
pub fn pad_occupancy(zones: &[PadZone], wire_rows: &[i64]) -> Result<Vec<bool>, WireCheckError> {
    let mut next = 0;
    let wired = zones
        .iter()
        .map(|zone| {
            let hit = wire_rows.get(next).is_some_and(|&r| zone.contains_row(r));
            if hit {
                next += 1;
            }
            hit
        })
        .collect();
    if next != wire_rows.len() {
        return Err(WireCheckError::PadOccupancyMismatch {
            unmatched: wire_rows.len() - next,
        });
    }
    Ok(wired)
}
