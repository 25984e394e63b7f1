use serde::{Deserialize, Serialize};
use wirebond_core::PixelNorm;

/// Flood-fill and touching-wire parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TraceParams {
    /// Whiteness predicate for wire pixels.
    pub norm: PixelNorm,
    /// A traced component with more pixels than this is two or more fused wires.
    pub touching_threshold: usize,
}

impl Default for TraceParams {
    fn default() -> Self {
        Self {
            norm: PixelNorm::WIRE_WHITENESS,
            touching_threshold: 2900,
        }
    }
}

/// Acceptance rules for 1-D intensity peaks along a column.
///
/// Defaults were calibrated on full-resolution module photographs.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PeakParams {
    /// Minimum sample distance between two kept peaks.
    pub min_distance: usize,
    pub min_prominence: f64,
    pub min_height: f64,
    /// Maximum width measured at `rel_height` of the prominence.
    pub max_width: f64,
    pub rel_height: f64,
}

impl Default for PeakParams {
    fn default() -> Self {
        Self {
            min_distance: 3,
            min_prominence: 50.0,
            min_height: 190.0,
            max_width: 9.0,
            rel_height: 0.5,
        }
    }
}

/// How the rows of the wire zone are isolated from the green solder mask.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BandStrategy {
    /// Per-row `sum(G) / (sum(R) + sum(B))`; rows at or below `level` are off the board.
    GreenRatio {
        level: f64,
        top_margin: i64,
        bottom_margin: i64,
    },
    /// Per-row mean of the gray image binarized at `binarize_at`.
    GrayMean {
        level: f64,
        binarize_at: u8,
        top_margin: i64,
        bottom_margin: i64,
    },
}

impl BandStrategy {
    pub fn green_ratio() -> Self {
        BandStrategy::GreenRatio {
            level: 0.55,
            top_margin: 25,
            bottom_margin: 22,
        }
    }

    pub fn gray_mean() -> Self {
        BandStrategy::GrayMean {
            level: 150.0,
            binarize_at: 127,
            top_margin: 20,
            bottom_margin: 30,
        }
    }

    pub(crate) fn level(&self) -> f64 {
        match *self {
            BandStrategy::GreenRatio { level, .. } | BandStrategy::GrayMean { level, .. } => level,
        }
    }

    pub(crate) fn margins(&self) -> (i64, i64) {
        match *self {
            BandStrategy::GreenRatio {
                top_margin,
                bottom_margin,
                ..
            }
            | BandStrategy::GrayMean {
                top_margin,
                bottom_margin,
                ..
            } => (top_margin, bottom_margin),
        }
    }
}

impl Default for BandStrategy {
    fn default() -> Self {
        Self::green_ratio()
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocatorParams {
    pub band: BandStrategy,
    pub peaks: PeakParams,
    /// A column crossing at least this many peaks cuts through every wire.
    pub min_wires_per_column: usize,
    /// Step from the first full column to the sampled one, towards the image center.
    pub seed_offset: usize,
}

impl Default for LocatorParams {
    fn default() -> Self {
        Self {
            band: BandStrategy::default(),
            peaks: PeakParams::default(),
            min_wires_per_column: 100,
            seed_offset: 35,
        }
    }
}

/// Expected-count model: `base_count + sum(per_trim[trim_i])`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WireCountParams {
    pub serial_prefix: String,
    /// Wires present regardless of the trim configuration.
    pub base_count: u32,
    pub per_trim: [u32; 16],
}

impl Default for WireCountParams {
    fn default() -> Self {
        Self {
            serial_prefix: "20UPGM".to_string(),
            base_count: 693,
            per_trim: [4, 3, 3, 2, 3, 2, 2, 1, 3, 2, 2, 1, 2, 1, 1, 0],
        }
    }
}

/// Row-profile thresholds for splitting a chip pad strip into pads.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PadStripParams {
    /// Row means of the normalized norm below this separate two pads.
    pub separator_level: f64,
    /// Row means above this start the next pad.
    pub resume_level: f64,
    /// A pad spans more rows than this; shorter dark runs are dim pads, not gaps.
    pub min_pad_rows: usize,
    /// Columns of a board crop, from its lateral edge inwards, that form the strip.
    pub strip_width: usize,
}

impl Default for PadStripParams {
    fn default() -> Self {
        Self {
            separator_level: 0.8,
            resume_level: 0.55,
            min_pad_rows: 8,
            strip_width: 120,
        }
    }
}

/// Solder-mask border scan and wire-stub search for [`crate::crop_board`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardCropParams {
    /// Inclusive per-channel RGB range of solder-mask pixels.
    pub mask_lower: [u8; 3],
    pub mask_upper: [u8; 3],
    /// A row or column is a border once strictly more than this fraction of it is mask.
    pub min_mask_fraction: f64,
    /// Rows `[start, end)` searched for stubs; negative values count from the bottom.
    pub stub_rows: [i64; 2],
    /// Stub window `[near, far)` as distances outwards from a lateral mask border.
    pub stub_offsets: [usize; 2],
    /// Equal row slices of the stub window.
    pub slices: usize,
    /// Leading fraction of each slice that is traced.
    pub slice_fraction: f64,
    /// Seed column distance from the window side facing the mask border.
    pub seed_inset: usize,
}

impl Default for BoardCropParams {
    fn default() -> Self {
        Self {
            mask_lower: [31, 31, 0],
            mask_upper: [99, 99, 19],
            min_mask_fraction: 0.1,
            stub_rows: [1000, 5000],
            stub_offsets: [50, 300],
            slices: 10,
            slice_fraction: 0.2,
            seed_inset: 10,
        }
    }
}

/// Everything the wire-counting side needs.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WireCheckParams {
    pub locator: LocatorParams,
    pub trace: TraceParams,
    pub count: WireCountParams,
    pub pads: PadStripParams,
    pub crop: BoardCropParams,
}
