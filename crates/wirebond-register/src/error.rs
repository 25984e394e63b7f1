#[derive(thiserror::Error, Debug)]
pub enum RegistrationError {
    #[error("region rows {row0}..{row1}, cols {col0}..{col1} does not fit a {width}x{height} image")]
    RegionOutOfBounds {
        row0: i64,
        row1: i64,
        col0: i64,
        col1: i64,
        width: usize,
        height: usize,
    },
    #[error("circle radius range {min}..={max} is empty or starts at zero")]
    InvalidRadiusRange { min: u32, max: u32 },
    #[error("expected {expected} targets, found {found}")]
    TargetCountMismatch { expected: usize, found: usize },
    #[error("edge columns {start}..{end} fall outside the image (width {width})")]
    ColumnRangeOutOfBounds { start: i64, end: i64, width: usize },
    #[error("no solder-mask pixels in the sampled columns")]
    EdgeContourEmpty,
    #[error("{0} board edge cannot be fitted with a line")]
    DegenerateRegression(&'static str),
    #[error("no near-vertical line above {threshold} votes in the center crop")]
    CenterWireNotFound { threshold: u32 },
    #[error("center wire is parallel to the bottom edge")]
    ParallelLines,
    #[error("board frame basis is singular")]
    SingularFrame,
    #[error("target pair {0} shares a column; the horizontal slope is undefined")]
    DegenerateTargets(usize),
    #[error("reference dilation must be positive, got {0}")]
    InvalidDilation(f64),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
