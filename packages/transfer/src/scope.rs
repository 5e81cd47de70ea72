//! The configuration subtree that every write is confined to.

use zktool_tree_store::{NodePath, PathError};

/// Prefix of the configuration subtree the tool manages.
pub const CONFIG_PREFIX: &str = "/config/product";

/// A write scope: every path whose text starts with the prefix.
///
/// The match is on the raw path string, so `/config/productX/a` is in scope
/// of `/config/product` just as `/config/product/a` is.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Scope {
    root: NodePath,
    prefix: String,
}

impl Scope {
    pub fn new(root: NodePath) -> Self {
        let prefix = root.to_string();
        Scope { root, prefix }
    }

    /// The scope rooted at [`CONFIG_PREFIX`].
    pub fn config() -> Self {
        Scope::new(NodePath::parse(CONFIG_PREFIX).unwrap_or_else(|_| NodePath::root()))
    }

    /// The node an export of this scope starts from.
    pub fn root(&self) -> &NodePath {
        &self.root
    }

    pub fn contains(&self, path: &NodePath) -> bool {
        self.contains_raw(&path.to_string())
    }

    fn contains_raw(&self, raw: &str) -> bool {
        raw.starts_with(&self.prefix)
    }

    /// Keep `raw` only if it starts with the prefix, then parse it.
    ///
    /// `Ok(None)` means the path is out of scope; it is not parsed at all.
    /// `Err` means it is in scope but not a valid node path.
    pub fn admit(&self, raw: &str) -> Result<Option<NodePath>, PathError> {
        if !self.contains_raw(raw) {
            return Ok(None);
        }
        NodePath::parse(raw).map(Some)
    }
}

impl Default for Scope {
    fn default() -> Self {
        Scope::config()
    }
}
