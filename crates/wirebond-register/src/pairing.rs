//! Pairing of unwired (reference) and wired photographs of the same module.

use std::{
    fs,
    path::{Path, PathBuf},
};

use log::warn;
use serde::{Deserialize, Serialize};

/// File-name markers of the two photographs of a module.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PairMarkers {
    /// Marker of the wired photograph.
    pub wired: String,
    /// Marker of the unwired reference photograph.
    pub reference: String,
}

impl Default for PairMarkers {
    fn default() -> Self {
        Self {
            wired: "AfterBonding".to_string(),
            reference: "Reception".to_string(),
        }
    }
}

/// Prefix of `name` up to `marker`, when the marker is present.
fn stem_before<'a>(name: &'a str, marker: &str) -> Option<&'a str> {
    name.find(marker).map(|i| &name[..i])
}

/// The sibling of `file` in `dir`: same name prefix, opposite marker.
///
/// `Ok(None)` when `file` carries neither marker or no sibling exists.
/// Directory entries are scanned in name order.
pub fn find_pair(
    file: &Path,
    dir: &Path,
    markers: &PairMarkers,
) -> Result<Option<PathBuf>, std::io::Error> {
    let Some(name) = file.file_name().and_then(|n| n.to_str()) else {
        return Ok(None);
    };
    let (stem, other) = if let Some(stem) = stem_before(name, &markers.wired) {
        (stem, markers.reference.as_str())
    } else if let Some(stem) = stem_before(name, &markers.reference) {
        (stem, markers.wired.as_str())
    } else {
        warn!("{name} carries neither pairing marker");
        return Ok(None);
    };

    let mut entries: Vec<PathBuf> = fs::read_dir(dir)?
        .map(|e| e.map(|e| e.path()))
        .collect::<Result<_, _>>()?;
    entries.sort();

    let found = entries.into_iter().find(|p| {
        p.file_name()
            .and_then(|n| n.to_str())
            .and_then(|n| stem_before(n, other))
            == Some(stem)
    });
    if found.is_none() {
        warn!("no {other} counterpart for {name} in {}", dir.display());
    }
    Ok(found)
}
