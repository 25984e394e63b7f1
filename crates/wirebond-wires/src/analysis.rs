//! Per-wire tracing over a seed list and the wire-count check.

use std::collections::HashMap;

use log::{info, warn};
use serde::{Deserialize, Serialize};
use wirebond_core::{PixelCoord, RgbImageView};

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::locate::locate_wires;
use crate::oracle::{expected_wire_count, ModuleTable, WireCountCheck};
use crate::trace::{trace_wire, Wire, WireEdges};
use crate::{Side, TraceParams, WireCheckError, WireCheckParams, WireSeeds};

/// Outcome of tracing one seed.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TracedWire {
    pub side: Side,
    pub seed: PixelCoord,
    /// Traced pixels. Empty when the seed is background or when the seed
    /// fell on a component already traced from `shared_with`.
    #[serde(skip)]
    pub wire: Wire,
    pub pixel_count: usize,
    pub touching: bool,
    pub edges: Option<WireEdges>,
    /// Index of the earlier seed whose trace already covered this one.
    pub shared_with: Option<usize>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct WireAnalysis {
    pub wires: Vec<TracedWire>,
}

impl WireAnalysis {
    pub fn touching_count(&self) -> usize {
        self.wires.iter().filter(|w| w.touching).count()
    }

    /// Seeds that did not land on a wire pixel.
    pub fn empty_count(&self) -> usize {
        self.wires.iter().filter(|w| w.pixel_count == 0).count()
    }

    /// Pixel sets actually traced; shared seeds are not repeated.
    pub fn components(&self) -> impl Iterator<Item = &TracedWire> {
        self.wires
            .iter()
            .filter(|w| w.shared_with.is_none() && w.pixel_count > 0)
    }
}

/// Trace every seed and classify the resulting components.
///
/// A seed lying on a component traced earlier in the pass reuses that trace,
/// so reported pixel sets never overlap. A seed outside the image aborts the pass.
#[cfg_attr(
    feature = "tracing",
    instrument(level = "info", skip(img, seeds, params), fields(seeds = seeds.count()))
)]
pub fn analyse_wires(
    img: &RgbImageView<'_>,
    seeds: &WireSeeds,
    params: &TraceParams,
) -> Result<WireAnalysis, WireCheckError> {
    let mut owner: HashMap<PixelCoord, usize> = HashMap::new();
    let mut wires: Vec<TracedWire> = Vec::with_capacity(seeds.count());

    for (side, seed) in seeds.iter() {
        let idx = wires.len();
        if let Some(&prev) = owner.get(&seed) {
            let (pixel_count, touching, edges) = {
                let first = &wires[prev];
                (first.pixel_count, first.touching, first.edges)
            };
            wires.push(TracedWire {
                side,
                seed,
                wire: Wire::default(),
                pixel_count,
                touching,
                edges,
                shared_with: Some(prev),
            });
            continue;
        }

        let wire = trace_wire(img, seed, &params.norm)?;
        for &p in &wire.pixels {
            owner.insert(p, idx);
        }
        let touching = wire.is_touching(params.touching_threshold);
        if touching {
            warn!(
                "{side} wire at ({}, {}) has {} pixels: touching",
                seed.row,
                seed.col,
                wire.len()
            );
        }
        wires.push(TracedWire {
            side,
            seed,
            pixel_count: wire.len(),
            touching,
            edges: wire.edges(),
            wire,
            shared_with: None,
        });
    }

    let analysis = WireAnalysis { wires };
    info!(
        "traced {} seeds: {} touching, {} empty",
        analysis.wires.len(),
        analysis.touching_count(),
        analysis.empty_count()
    );
    Ok(analysis)
}

/// Compare the detected wire count of `img` with the count expected for module `serial`.
pub fn check_wiring(
    img: &RgbImageView<'_>,
    serial: &str,
    table: &ModuleTable,
    params: &WireCheckParams,
) -> Result<WireCountCheck, WireCheckError> {
    let expected = expected_wire_count(serial, table, &params.count)?;
    let seeds = locate_wires(img, &params.locator)?;
    Ok(WireCountCheck::new(expected, seeds.count() as u32))
}
