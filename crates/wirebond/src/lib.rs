//! High-level facade crate for the `wirebond-*` workspace.
//!
//! This crate provides:
//! - re-exports of the underlying inspection crates
//! - JSON configuration and report types shared by the CLI and callers
//! - (feature-gated) end-to-end helpers on `image::RgbImage` and annotated
//!   image export
//!
//! ## Quickstart
//!
//! ```no_run
//! use wirebond::inspect;
//! use wirebond::wires::{ModuleTable, WireCheckParams};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let table = ModuleTable::load_json("modules.json")?;
//! let (_, report) = inspect::inspect_wiring_file(
//!     "20UPGM22110037_AfterBonding.jpg".as_ref(),
//!     &table,
//!     &WireCheckParams::default(),
//! )?;
//! println!(
//!     "{}: {} of {} wires, {} touching",
//!     report.serial, report.check.detected, report.check.expected, report.touching
//! );
//! # Ok(())
//! # }
//! ```
//!
//! ## API map
//! - `wirebond::core`: image views, pixel predicate, line fit, logger.
//! - `wirebond::wires`: wire location, tracing, counting and pad occupancy.
//! - `wirebond::register`: fiducials, board edges, frames and pad placement.
//! - `wirebond::inspect` (feature `image`): pipelines on `image::RgbImage`.
//! - `wirebond::annotate` (feature `image`): drawn overlays.

pub use wirebond_core as core;
pub use wirebond_register as register;
pub use wirebond_wires as wires;

pub use wirebond_register::{Registration, RegistrationParams};
pub use wirebond_wires::{WireAnalysis, WireCheckParams, WireCountCheck};

mod error;
pub mod io;

pub use error::InspectError;
pub use io::{InspectConfig, RegistrationReport, WiringReport};

#[cfg(feature = "image")]
pub mod annotate;
#[cfg(feature = "image")]
pub mod inspect;
