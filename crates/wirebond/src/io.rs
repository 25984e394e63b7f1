//! JSON configuration, reports and file lookup.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use wirebond_register::{
    find_pair, AbsoluteFrame, PadBox, PairMarkers, Registration, RegistrationParams,
};
use wirebond_wires::{WireAnalysis, WireCheckParams, WireCountCheck, WireSeeds};

use crate::InspectError;

/// Everything a run needs besides the images themselves.
///
/// Every section falls back to its defaults, so `{}` is a valid config.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InspectConfig {
    pub wiring: WireCheckParams,
    pub registration: RegistrationParams,
    pub pairing: PairMarkers,
    /// Module table used when the command line names none.
    pub module_table: Option<PathBuf>,
    /// Reference pad layout used when the command line names none.
    pub pad_layout: Option<PathBuf>,
}

impl InspectConfig {
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, InspectError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), InspectError> {
        write_json(self, path)
    }
}

/// Result of the wiring check on one photograph.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WiringReport {
    pub serial: String,
    pub check: WireCountCheck,
    pub touching: usize,
    pub seeds: WireSeeds,
    pub analysis: WireAnalysis,
}

impl WiringReport {
    pub fn new(
        serial: String,
        check: WireCountCheck,
        seeds: WireSeeds,
        analysis: WireAnalysis,
    ) -> Self {
        Self {
            serial,
            check,
            touching: analysis.touching_count(),
            seeds,
            analysis,
        }
    }
}

/// Reference fiducials on the photograph plus the pads placed from them.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RegistrationReport {
    pub registration: Registration,
    pub absolute: AbsoluteFrame,
    /// Empty when no pad layout was supplied.
    pub pads: Vec<PadBox>,
}

/// Serialize `value` as pretty JSON.
pub fn write_json<T: Serialize + ?Sized>(
    value: &T,
    path: impl AsRef<Path>,
) -> Result<(), InspectError> {
    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json)?;
    Ok(())
}

/// Directory holding `file`, `.` for a bare file name.
pub fn parent_dir(file: &Path) -> &Path {
    match file.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    }
}

/// Counterpart of `file` in `dir` (default: the directory of `file`).
pub fn find_pair_near(
    file: &Path,
    dir: Option<&Path>,
    markers: &PairMarkers,
) -> Result<Option<PathBuf>, InspectError> {
    let dir = dir.unwrap_or_else(|| parent_dir(file));
    Ok(find_pair(file, dir, markers)?)
}

/// Reference image for a photographed board; a missing counterpart is an error.
pub fn reference_for(
    photo: &Path,
    dir: Option<&Path>,
    markers: &PairMarkers,
) -> Result<PathBuf, InspectError> {
    find_pair_near(photo, dir, markers)?.ok_or_else(|| InspectError::NoReference(photo.into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;

    #[test]
    fn empty_config_is_default() {
        let cfg: InspectConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(cfg, InspectConfig::default());
        assert!(cfg.module_table.is_none());
    }

    #[test]
    fn config_sections_override_independently() {
        let cfg: InspectConfig = serde_json::from_str(
            r#"{"wiring": {"count": {"base_count": 215}},
                "pairing": {"wired": "Bonded"},
                "module_table": "modules.json"}"#,
        )
        .unwrap();
        assert_eq!(cfg.wiring.count.base_count, 215);
        assert_eq!(cfg.wiring.count.serial_prefix, "20UPGM");
        assert_eq!(cfg.pairing.wired, "Bonded");
        assert_eq!(cfg.pairing.reference, "Reception");
        assert_eq!(cfg.module_table, Some(PathBuf::from("modules.json")));
        assert_eq!(cfg.registration, RegistrationParams::default());
    }

    #[test]
    fn config_survives_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        let mut cfg = InspectConfig::default();
        cfg.wiring.trace.touching_threshold = 4000;
        cfg.pad_layout = Some(PathBuf::from("pads.json"));
        cfg.write_json(&path).unwrap();
        assert_eq!(InspectConfig::load_json(&path).unwrap(), cfg);
    }

    #[test]
    fn reference_is_found_beside_the_photo() {
        let dir = tempfile::tempdir().unwrap();
        let photo = dir.path().join("20UPGM22110037_AfterBonding.png");
        let reference = dir.path().join("20UPGM22110037_Reception.png");
        File::create(&photo).unwrap();
        File::create(&reference).unwrap();
        File::create(dir.path().join("20UPGM22110099_Reception.png")).unwrap();

        let found = reference_for(&photo, None, &PairMarkers::default()).unwrap();
        assert_eq!(found, reference);
    }

    #[test]
    fn missing_reference_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let photo = dir.path().join("20UPGM22110037_AfterBonding.png");
        File::create(&photo).unwrap();
        let err = reference_for(&photo, Some(dir.path()), &PairMarkers::default()).unwrap_err();
        assert!(matches!(err, InspectError::NoReference(_)));
        assert!(find_pair_near(&photo, None, &PairMarkers::default())
            .unwrap()
            .is_none());
    }

    #[test]
    fn bare_file_name_searches_current_dir() {
        assert_eq!(parent_dir(Path::new("a.png")), Path::new("."));
        assert_eq!(parent_dir(Path::new("x/a.png")), Path::new("x"));
    }
}
