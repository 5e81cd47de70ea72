//! In-memory tree store.

use std::collections::{BTreeMap, BTreeSet};

use bytes::Bytes;

use crate::{Error, NodePath, NodeStat, TreeClient};

#[derive(Clone, Debug)]
struct MemoryNode {
    data: Bytes,
    stat: NodeStat,
    // Creation order, which is the order `children` reports.
    children: Vec<String>,
}

impl MemoryNode {
    fn new(data: Bytes, mtime: i64) -> Self {
        MemoryNode {
            stat: NodeStat {
                version: 0,
                mtime,
                num_children: 0,
                data_length: data.len() as i32,
                ephemeral_owner: 0,
            },
            data,
            children: Vec::new(),
        }
    }
}

/// Operations that can be made to fail at a chosen path.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Fault {
    Children,
    Get,
    Write,
}

/// A tree store held in memory, with the same structural rules as ZooKeeper.
///
/// The root `/` always exists, `create` requires an existing parent, `set`
/// bumps the version, and children are listed in creation order. Each
/// mutation advances a logical clock that is reported as `mtime`.
///
/// Faults can be injected per path to exercise error handling in callers.
///
/// # Example
///
/// ```rust
/// use zktool_tree_store::{MemoryTree, NodePath, TreeClient};
/// use bytes::Bytes;
///
/// let mut tree = MemoryTree::new();
/// let path = NodePath::parse("/config").unwrap();
/// tree.create(&path, Bytes::from_static(b"hello")).unwrap();
///
/// let (data, stat) = tree.get(&path).unwrap();
/// assert_eq!(data, Bytes::from_static(b"hello"));
/// assert_eq!(stat.version, 0);
/// ```
#[derive(Clone, Debug)]
pub struct MemoryTree {
    nodes: BTreeMap<NodePath, MemoryNode>,
    clock: i64,
    faults: BTreeSet<(Fault, NodePath)>,
}

impl MemoryTree {
    /// Create a tree containing only the root.
    pub fn new() -> Self {
        let mut nodes = BTreeMap::new();
        nodes.insert(NodePath::root(), MemoryNode::new(Bytes::new(), 0));
        MemoryTree {
            nodes,
            clock: 0,
            faults: BTreeSet::new(),
        }
    }

    /// Store `data` at `path`, creating missing ancestors with empty payloads.
    ///
    /// Bypasses injected faults; meant for seeding fixtures.
    pub fn put(&mut self, path: &NodePath, data: impl Into<Bytes>) {
        for ancestor in path.ancestors() {
            if !self.nodes.contains_key(&ancestor) {
                self.insert_node(&ancestor, Bytes::new());
            }
        }

        let data = data.into();
        if self.nodes.contains_key(path) {
            self.overwrite(path, data);
        } else {
            self.insert_node(path, data);
        }
    }

    /// Make `fault` fail for `path` until cleared.
    pub fn inject(&mut self, fault: Fault, path: &NodePath) {
        self.faults.insert((fault, path.clone()));
    }

    pub fn clear_faults(&mut self) {
        self.faults.clear();
    }

    /// Payload at `path`, if the node exists.
    pub fn data(&self, path: &NodePath) -> Option<&Bytes> {
        self.nodes.get(path).map(|node| &node.data)
    }

    pub fn contains(&self, path: &NodePath) -> bool {
        self.nodes.contains_key(path)
    }

    /// Number of nodes, including the root.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.len() == 1
    }

    /// Every node's payload, keyed by path.
    pub fn snapshot(&self) -> BTreeMap<NodePath, Bytes> {
        self.nodes
            .iter()
            .map(|(path, node)| (path.clone(), node.data.clone()))
            .collect()
    }

    fn check_fault(&self, fault: Fault, path: &NodePath) -> Result<(), Error> {
        if self.faults.contains(&(fault, path.clone())) {
            return Err(Error::Store {
                path: path.clone(),
                message: format!("injected {:?} failure", fault),
            });
        }
        Ok(())
    }

    fn tick(&mut self) -> i64 {
        self.clock += 1;
        self.clock
    }

    // Caller guarantees the parent exists and the node does not.
    fn insert_node(&mut self, path: &NodePath, data: Bytes) {
        let mtime = self.tick();
        if let (Some(parent), Some(name)) = (path.parent(), path.name()) {
            if let Some(parent_node) = self.nodes.get_mut(&parent) {
                parent_node.children.push(name.to_string());
                parent_node.stat.num_children += 1;
            }
        }
        self.nodes.insert(path.clone(), MemoryNode::new(data, mtime));
    }

    fn overwrite(&mut self, path: &NodePath, data: Bytes) -> Option<NodeStat> {
        let mtime = self.tick();
        let node = self.nodes.get_mut(path)?;
        node.stat.version += 1;
        node.stat.mtime = mtime;
        node.stat.data_length = data.len() as i32;
        node.data = data;
        Some(node.stat)
    }
}

impl Default for MemoryTree {
    fn default() -> Self {
        Self::new()
    }
}

impl TreeClient for MemoryTree {
    fn exists(&mut self, path: &NodePath) -> Result<Option<NodeStat>, Error> {
        Ok(self.nodes.get(path).map(|node| node.stat))
    }

    fn get(&mut self, path: &NodePath) -> Result<(Bytes, NodeStat), Error> {
        self.check_fault(Fault::Get, path)?;
        self.nodes
            .get(path)
            .map(|node| (node.data.clone(), node.stat))
            .ok_or_else(|| Error::NoNode { path: path.clone() })
    }

    fn set(
        &mut self,
        path: &NodePath,
        payload: Bytes,
        expected_version: Option<i32>,
    ) -> Result<NodeStat, Error> {
        self.check_fault(Fault::Write, path)?;
        let current = self
            .nodes
            .get(path)
            .map(|node| node.stat.version)
            .ok_or_else(|| Error::NoNode { path: path.clone() })?;

        if let Some(expected) = expected_version {
            if expected != current {
                return Err(Error::BadVersion {
                    path: path.clone(),
                    expected,
                });
            }
        }

        self.overwrite(path, payload)
            .ok_or_else(|| Error::NoNode { path: path.clone() })
    }

    fn create(&mut self, path: &NodePath, payload: Bytes) -> Result<NodePath, Error> {
        self.check_fault(Fault::Write, path)?;
        if self.nodes.contains_key(path) {
            return Err(Error::NodeExists { path: path.clone() });
        }

        let parent = path
            .parent()
            .ok_or_else(|| Error::NodeExists { path: path.clone() })?;
        if !self.nodes.contains_key(&parent) {
            return Err(Error::NoNode { path: parent });
        }

        self.insert_node(path, payload);
        Ok(path.clone())
    }

    fn children(&mut self, path: &NodePath) -> Result<Vec<String>, Error> {
        self.check_fault(Fault::Children, path)?;
        self.nodes
            .get(path)
            .map(|node| node.children.clone())
            .ok_or_else(|| Error::NoNode { path: path.clone() })
    }
}
