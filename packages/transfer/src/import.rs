//! Restore a subtree from an export document.

use std::collections::BTreeMap;
use std::fs;
use std::io::{self, Read};
use std::path::Path;

use serde::Deserialize;
use zktool_tree_store::TreeClient;

use crate::upsert::{apply, WritePolicy};
use crate::{Report, Scope, TransferError};

/// The part of an exported node that import uses.
///
/// `stat` and any other fields are accepted and ignored.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct ImportRecord {
    pub data: String,
}

/// A decoded import document.
///
/// Decoding is all-or-nothing for the records: one without a string `data`
/// field rejects the whole document before anything is written. Keys are
/// kept as raw strings and only checked against the scope at import time.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct ImportDocument {
    nodes: BTreeMap<String, ImportRecord>,
}

impl ImportDocument {
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, TransferError> {
        Ok(serde_json::from_reader(reader)?)
    }

    pub fn parse(s: &str) -> Result<Self, TransferError> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn load(path: &Path) -> Result<Self, TransferError> {
        let file = fs::File::open(path).map_err(|e| TransferError::io(path, e))?;
        let document = Self::from_reader(io::BufReader::new(file))?;
        log::info!("loaded {} nodes from {}", document.len(), path.display());
        Ok(document)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ImportRecord)> {
        self.nodes.iter().map(|(path, record)| (path.as_str(), record))
    }
}

/// Upsert every in-scope node of `document`.
///
/// Nodes are written parents first. Keys outside the prefix and keys that
/// are not valid node paths are counted as skipped; store failures are
/// recorded and do not stop the import.
pub fn import<C: TreeClient + ?Sized>(
    client: &mut C,
    document: &ImportDocument,
    scope: &Scope,
    policy: WritePolicy,
    report: &mut Report,
) {
    log::info!(
        "importing {} nodes into {} ({})",
        document.len(),
        scope.root(),
        policy
    );
    for (raw, record) in document.iter() {
        match scope.admit(raw) {
            Ok(Some(path)) => apply(client, path, record.data.clone(), policy, report),
            Ok(None) => report.skip(raw, "outside the configuration prefix"),
            Err(e) => {
                log::warn!("skipping {:?}: {}", raw, e);
                report.skip(raw, "invalid node path");
            }
        }
    }
}
