use serde::{Deserialize, Serialize};

/// Image half a wire column belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Left,
    Right,
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Left => f.write_str("left"),
            Side::Right => f.write_str("right"),
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum WireCheckError {
    #[error("{side} wire band is empty (rows {top}..{bottom})")]
    EmptyBand {
        side: Side,
        top: i64,
        bottom: i64,
    },
    #[error("no {side} column crosses at least {min_wires} wires")]
    WireColumnNotFound { side: Side, min_wires: usize },
    #[error("{side} sample column {column} is outside the image (width {width})")]
    SampleColumnOutOfBounds {
        side: Side,
        column: i64,
        width: usize,
    },
    #[error("seed ({row}, {col}) lies outside the {width}x{height} image")]
    SeedOutOfBounds {
        row: i32,
        col: i32,
        width: usize,
        height: usize,
    },
    #[error("no {border} solder-mask border")]
    MaskBorderNotFound { border: &'static str },
    #[error("{side} stub window rows {rows:?}, cols {cols:?} does not fit a {width}x{height} image")]
    StubWindowOutOfBounds {
        side: Side,
        rows: [i64; 2],
        cols: [i64; 2],
        width: usize,
        height: usize,
    },
    #[error("no {side} wire stub reached from the sampled slices")]
    NoWireStubs { side: Side },
    #[error("no serial number containing {prefix:?} in {name:?}")]
    SerialNumberNotFound { name: String, prefix: String },
    #[error("serial number {0:?} not found in the module table")]
    ModuleNotFound(String),
    #[error("serial number {serial:?} appears {count} times in the module table")]
    DuplicateModule { serial: String, count: usize },
    #[error("module {serial:?} has trim index {index} outside 0..{table_len}")]
    InvalidTrimIndex {
        serial: String,
        index: u32,
        table_len: usize,
    },
    #[error("{unmatched} wire points do not fall inside any remaining pad")]
    PadOccupancyMismatch { unmatched: usize },
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
