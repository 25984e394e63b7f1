//! Wire counting and touching-wire detection for wire-bonded modules.
//!
//! Pipeline on one RGB photograph:
//! 1. [`locate_wires`] isolates the wire rows of each image half and samples
//!    one column that crosses every wire; each intensity peak is a seed.
//! 2. [`analyse_wires`] flood-fills every seed ([`trace_wire`]) and flags
//!    components larger than a single wire can be as touching.
//! 3. [`WireCountOracle`] turns the module's trim configuration into the
//!    expected count; [`WireCountCheck`] compares it with the seed count.
//!
//! [`crop_board`] cuts a photograph down to its solder-mask rows and the reach
//! of the wire stubs; the pad strips along its edges feed [`segment_pads`].
//!
//! ```
//! use wirebond_wires::{ModuleTable, WireCountOracle, WireCountParams};
//!
//! let table = ModuleTable::from_json_str(
//!     r#"[{"serialNumber": "20UPGM22110037",
//!          "IREF_TRIM_1": 0, "IREF_TRIM_2": 0, "IREF_TRIM_3": 0, "IREF_TRIM_4": 0}]"#,
//! )
//! .unwrap();
//! let oracle = WireCountOracle::new(table, WireCountParams::default());
//! let (serial, expected) = oracle
//!     .expected_for_file("20UPGM22110037_AfterBonding.jpg")
//!     .unwrap();
//! assert_eq!(serial, "20UPGM22110037");
//! assert_eq!(expected, 709);
//! ```

mod analysis;
mod crop;
mod error;
mod locate;
mod oracle;
mod pads;
mod params;
mod peaks;
mod trace;

pub use analysis::{analyse_wires, check_wiring, TracedWire, WireAnalysis};
pub use crop::{crop_board, mask_borders, stub_extent, BoardCrop, MaskBorders};
pub use error::{Side, WireCheckError};
pub use locate::{
    locate_wires, wire_band, wire_boundary_column, SideSeeds, WireBand, WireLocator, WireSeeds,
};
pub use oracle::{
    expected_for_record, expected_wire_count, extract_serial_number, ModuleRecord, ModuleTable,
    WireCountCheck, WireCountOracle,
};
pub use pads::{pad_occupancy, row_brightness, segment_pads, PadZone};
pub use params::{
    BandStrategy, BoardCropParams, LocatorParams, PadStripParams, PeakParams, TraceParams,
    WireCheckParams, WireCountParams,
};
pub use peaks::{count_peaks, find_peaks};
pub use trace::{trace_wire, Wire, WireEdges, NEIGHBOUR_OFFSETS};
