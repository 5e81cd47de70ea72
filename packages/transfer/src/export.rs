//! Subtree dump.

use std::collections::BTreeMap;
use std::fs;
use std::io::{self, Write};
use std::path::Path;

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use zktool_tree_store::{NodePath, NodeStat, TreeClient};

use crate::TransferError;

/// One exported node: its payload rendered as text plus its metadata.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeRecord {
    pub data: String,
    pub stat: NodeStat,
}

impl NodeRecord {
    /// Invalid UTF-8 in the payload is replaced with U+FFFD.
    pub fn new(payload: &Bytes, stat: NodeStat) -> Self {
        NodeRecord {
            data: String::from_utf8_lossy(payload).into_owned(),
            stat,
        }
    }
}

/// Every exported node keyed by path.
///
/// Serializes as a JSON object sorted by path.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExportDocument {
    nodes: BTreeMap<NodePath, NodeRecord>,
}

impl ExportDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, path: NodePath, record: NodeRecord) {
        self.nodes.insert(path, record);
    }

    pub fn get(&self, path: &NodePath) -> Option<&NodeRecord> {
        self.nodes.get(path)
    }

    pub fn contains(&self, path: &NodePath) -> bool {
        self.nodes.contains_key(path)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&NodePath, &NodeRecord)> {
        self.nodes.iter()
    }

    /// Pretty JSON with two-space indentation and a trailing newline.
    pub fn write_to<W: Write>(&self, mut writer: W) -> Result<(), TransferError> {
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer
            .write_all(b"\n")
            .and_then(|_| writer.flush())
            .map_err(|e| TransferError::io("<export writer>", e))
    }

    pub fn save(&self, path: &Path) -> Result<(), TransferError> {
        let file = fs::File::create(path).map_err(|e| TransferError::io(path, e))?;
        self.write_to(io::BufWriter::new(file))
            .map_err(|e| match e {
                TransferError::Io { error, .. } => TransferError::io(path, error),
                other => other,
            })
    }
}

/// Walk the subtree at `root` depth-first and collect every readable node.
///
/// Children are visited in the order the store lists them. A node whose
/// children cannot be listed is dropped together with its whole subtree; a
/// node whose payload cannot be read is dropped but its children are still
/// visited. Neither case is an error.
pub fn export<C: TreeClient + ?Sized>(client: &mut C, root: &NodePath) -> ExportDocument {
    log::info!("exporting subtree {}", root);
    let mut document = ExportDocument::new();
    visit(client, root, &mut document);
    log::info!("exported {} nodes from {}", document.len(), root);
    document
}

fn visit<C: TreeClient + ?Sized>(client: &mut C, path: &NodePath, document: &mut ExportDocument) {
    let children = match client.children(path) {
        Ok(children) => children,
        Err(e) => {
            log::warn!("skipping subtree {}: {}", path, e);
            return;
        }
    };

    match client.get(path) {
        Ok((payload, stat)) => {
            log::debug!("exported {} ({} bytes)", path, payload.len());
            document.insert(path.clone(), NodeRecord::new(&payload, stat));
        }
        Err(e) => log::warn!("skipping node {}: {}", path, e),
    }

    for child in children {
        match path.join(&child) {
            Ok(child_path) => visit(client, &child_path, document),
            Err(e) => log::warn!("skipping child {:?} of {}: {}", child, path, e),
        }
    }
}
