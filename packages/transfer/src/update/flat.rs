//! Flat JSON sources: `{ "/config/product/svc/timeout": "30", ... }`.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::Path;

use super::{Assignment, UpdateSource};
use crate::TransferError;

/// Read a JSON object of path to string value.
///
/// Any other shape, including a non-string value, fails the whole read.
pub fn read_flat(path: &Path) -> Result<UpdateSource, TransferError> {
    let file = fs::File::open(path).map_err(|e| TransferError::io(path, e))?;
    let map: BTreeMap<String, String> = serde_json::from_reader(io::BufReader::new(file))?;
    Ok(from_map(map))
}

pub fn flat_source_from_str(s: &str) -> Result<UpdateSource, TransferError> {
    let map: BTreeMap<String, String> = serde_json::from_str(s)?;
    Ok(from_map(map))
}

fn from_map(map: BTreeMap<String, String>) -> UpdateSource {
    UpdateSource {
        assignments: map
            .into_iter()
            .map(|(path, value)| Assignment::new(path, value))
            .collect(),
        rejected: Vec::new(),
    }
}
