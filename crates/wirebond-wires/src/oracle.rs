//! Expected wire count from a module's trim configuration.

use std::{fs, path::Path};

use log::debug;
use serde::{Deserialize, Serialize};

use crate::{WireCheckError, WireCountParams};

/// One entry of the module configuration table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleRecord {
    #[serde(rename = "serialNumber")]
    pub serial_number: String,
    #[serde(rename = "IREF_TRIM_1")]
    pub iref_trim_1: u32,
    #[serde(rename = "IREF_TRIM_2")]
    pub iref_trim_2: u32,
    #[serde(rename = "IREF_TRIM_3")]
    pub iref_trim_3: u32,
    #[serde(rename = "IREF_TRIM_4")]
    pub iref_trim_4: u32,
}

impl ModuleRecord {
    #[inline]
    pub fn trims(&self) -> [u32; 4] {
        [
            self.iref_trim_1,
            self.iref_trim_2,
            self.iref_trim_3,
            self.iref_trim_4,
        ]
    }
}

/// Module configuration table, read-only once loaded.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModuleTable {
    pub records: Vec<ModuleRecord>,
}

impl ModuleTable {
    pub fn new(records: Vec<ModuleRecord>) -> Self {
        Self { records }
    }

    pub fn from_json_str(json: &str) -> Result<Self, WireCheckError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a table from a JSON file.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, WireCheckError> {
        let raw = fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    /// The single record carrying `serial`.
    pub fn lookup(&self, serial: &str) -> Result<&ModuleRecord, WireCheckError> {
        let mut matches = self.records.iter().filter(|r| r.serial_number == serial);
        let first = matches
            .next()
            .ok_or_else(|| WireCheckError::ModuleNotFound(serial.to_string()))?;
        let extra = matches.count();
        if extra > 0 {
            return Err(WireCheckError::DuplicateModule {
                serial: serial.to_string(),
                count: extra + 1,
            });
        }
        Ok(first)
    }
}

/// Serial number embedded in a file name.
///
/// The name is split on `_`; the first piece containing `prefix` is the
/// serial number, stripped of anything up to its last `/`.
pub fn extract_serial_number(file_name: &str, prefix: &str) -> Result<String, WireCheckError> {
    file_name
        .split('_')
        .find(|piece| piece.contains(prefix))
        .map(|piece| piece.rsplit('/').next().unwrap_or(piece).to_string())
        .ok_or_else(|| WireCheckError::SerialNumberNotFound {
            name: file_name.to_string(),
            prefix: prefix.to_string(),
        })
}

/// Expected count for one record.
pub fn expected_for_record(
    record: &ModuleRecord,
    params: &WireCountParams,
) -> Result<u32, WireCheckError> {
    record.trims().iter().try_fold(params.base_count, |acc, &t| {
        params
            .per_trim
            .get(t as usize)
            .map(|n| acc + n)
            .ok_or_else(|| WireCheckError::InvalidTrimIndex {
                serial: record.serial_number.clone(),
                index: t,
                table_len: params.per_trim.len(),
            })
    })
}

/// Expected wire count of module `serial`.
pub fn expected_wire_count(
    serial: &str,
    table: &ModuleTable,
    params: &WireCountParams,
) -> Result<u32, WireCheckError> {
    let record = table.lookup(serial)?;
    let expected = expected_for_record(record, params)?;
    debug!("module {serial}: trims {:?} -> {expected} wires", record.trims());
    Ok(expected)
}

/// Expected-versus-detected outcome. A mismatch is a result, not an error.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireCountCheck {
    pub passed: bool,
    pub expected: u32,
    pub detected: u32,
}

impl WireCountCheck {
    pub fn new(expected: u32, detected: u32) -> Self {
        Self {
            passed: expected == detected,
            expected,
            detected,
        }
    }
}

/// Owns the module table and the count model.
#[derive(Clone, Debug)]
pub struct WireCountOracle {
    table: ModuleTable,
    params: WireCountParams,
}

impl WireCountOracle {
    pub fn new(table: ModuleTable, params: WireCountParams) -> Self {
        Self { table, params }
    }

    pub fn table(&self) -> &ModuleTable {
        &self.table
    }

    pub fn params(&self) -> &WireCountParams {
        &self.params
    }

    pub fn expected_for_serial(&self, serial: &str) -> Result<u32, WireCheckError> {
        expected_wire_count(serial, &self.table, &self.params)
    }

    /// Extract the serial number from `file_name` and look up its expected count.
    pub fn expected_for_file(&self, file_name: &str) -> Result<(String, u32), WireCheckError> {
        let serial = extract_serial_number(file_name, &self.params.serial_prefix)?;
        let expected = self.expected_for_serial(&serial)?;
        Ok((serial, expected))
    }
}
