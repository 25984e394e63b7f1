//! Coordinate registration of wire-bonded board photographs.
//!
//! Two frames are involved:
//! - [`BoardFrame`]: per image, anchored where the central reference wire
//!   ([`center_wire`]) crosses the bottom solder-mask edge ([`board_edges`]),
//!   scaled by the solder-mask height. [`map_reference_to_photo`] moves
//!   reference-board points (e.g. the fiducials from [`find_targets`]) onto
//!   a photographed board.
//! - [`AbsoluteFrame`]: built from the eight mapped fiducials; [`find_pads`]
//!   places a reference [`PadLayout`] on the photograph with it.
//!
//! All coordinates are image pixels with `x` = column and `y` = row.

mod absolute;
mod edges;
mod error;
mod frame;
mod hough;
mod pairing;
mod params;
mod raster;
mod targets;

pub use absolute::{absolute_frame, find_pads, AbsoluteFrame, PadBox, PadLayout};
pub use edges::{board_edges, center_wire, BoardEdges, CenterWire};
pub use error::RegistrationError;
pub use frame::{
    board_frame, frame_from_parts, map_reference_to_photo, register, BoardFrame,
    CoordinateRegistrar, Registration,
};
pub use hough::{hough_circles, hough_lines, Circle, PolarLine};
pub use pairing::{find_pair, PairMarkers};
pub use params::{
    CenterWireParams, CircleHoughParams, EdgeParams, RegistrationParams, TargetParams,
    TargetRegion,
};
pub use targets::{find_targets, resolve_region, Target, TargetDetector};
