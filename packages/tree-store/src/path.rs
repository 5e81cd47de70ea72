//! Absolute, slash-delimited node paths.

use std::fmt;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Errors related to node path parsing and validation.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PathError {
    #[error("node path {path:?} must start with '/'")]
    Relative { path: String },

    #[error("node path {path:?} has an empty component at position {position}")]
    EmptyComponent { path: String, position: usize },

    #[error("node path {path:?} has invalid component {component:?}: {message}")]
    InvalidComponent {
        path: String,
        component: String,
        message: String,
    },
}

/// A validated, absolute path to a node in the tree store.
///
/// The root is `/`. Every other path is a sequence of non-empty components,
/// each written with a leading `/`: `/config/product/svc`. Trailing and
/// doubled slashes are rejected rather than normalized, since the store
/// itself rejects them.
///
/// Paths order component-wise, so a parent always sorts before its
/// descendants.
#[derive(Clone, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct NodePath {
    components: Vec<String>,
}

#[macro_export]
macro_rules! node_path {
    ($path_string:expr) => {
        $crate::NodePath::parse($path_string).unwrap()
    };
    ($($args:tt),*) => {
        compile_error!("Expected 1 argument, got something else")
    };
}

impl NodePath {
    /// Parse a path string.
    ///
    /// ```rust
    /// use zktool_tree_store::NodePath;
    ///
    /// let path = NodePath::parse("/config/product/svc").unwrap();
    /// assert_eq!(path.len(), 3);
    /// assert_eq!(path.to_string(), "/config/product/svc");
    ///
    /// assert!(NodePath::parse("config/product").is_err());
    /// assert!(NodePath::parse("/config/product/").is_err());
    /// ```
    pub fn parse(s: &str) -> Result<Self, PathError> {
        let rest = s.strip_prefix('/').ok_or_else(|| PathError::Relative {
            path: s.to_string(),
        })?;

        if rest.is_empty() {
            return Ok(Self::root());
        }

        let mut components = Vec::new();
        for (position, component) in rest.split('/').enumerate() {
            validate_component(s, component, position)?;
            components.push(component.to_string());
        }

        Ok(NodePath { components })
    }

    /// The root path, `/`.
    pub fn root() -> Self {
        NodePath {
            components: Vec::new(),
        }
    }

    pub fn is_root(&self) -> bool {
        self.components.is_empty()
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    pub fn components(&self) -> &[String] {
        &self.components
    }

    /// The last component, or `None` for the root.
    pub fn name(&self) -> Option<&str> {
        self.components.last().map(String::as_str)
    }

    /// The parent path, or `None` for the root.
    pub fn parent(&self) -> Option<NodePath> {
        if self.is_root() {
            return None;
        }
        Some(NodePath {
            components: self.components[..self.components.len() - 1].to_vec(),
        })
    }

    /// Append a single child name.
    ///
    /// `name` must be one valid component; slashes are rejected.
    pub fn join(&self, name: &str) -> Result<NodePath, PathError> {
        let position = self.components.len();
        let rendered = format!("{}/{}", self.as_prefix(), name);
        if name.contains('/') {
            return Err(PathError::InvalidComponent {
                path: rendered,
                component: name.to_string(),
                message: "child name contains '/'".to_string(),
            });
        }
        validate_component(&rendered, name, position)?;

        let mut components = self.components.clone();
        components.push(name.to_string());
        Ok(NodePath { components })
    }

    /// Every proper ancestor except the root, shallowest first.
    ///
    /// For `/a/b/c` this yields `/a` then `/a/b`.
    pub fn ancestors(&self) -> Vec<NodePath> {
        (1..self.components.len())
            .map(|end| NodePath {
                components: self.components[..end].to_vec(),
            })
            .collect()
    }

    // "" for the root so that joining never produces "//".
    fn as_prefix(&self) -> String {
        if self.is_root() {
            String::new()
        } else {
            self.to_string()
        }
    }
}

fn validate_component(path: &str, component: &str, position: usize) -> Result<(), PathError> {
    if component.is_empty() {
        return Err(PathError::EmptyComponent {
            path: path.to_string(),
            position,
        });
    }

    if component == "." || component == ".." {
        return Err(PathError::InvalidComponent {
            path: path.to_string(),
            component: component.to_string(),
            message: "relative components are not allowed".to_string(),
        });
    }

    if component.contains('\0') {
        return Err(PathError::InvalidComponent {
            path: path.to_string(),
            component: component.escape_debug().to_string(),
            message: "NUL characters are not allowed".to_string(),
        });
    }

    Ok(())
}

impl fmt::Display for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_root() {
            return write!(f, "/");
        }
        for component in &self.components {
            write!(f, "/{}", component)?;
        }
        Ok(())
    }
}

impl std::str::FromStr for NodePath {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NodePath::parse(s)
    }
}

impl Serialize for NodePath {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for NodePath {
    fn deserialize<D>(deserializer: D) -> Result<NodePath, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s: String = Deserialize::deserialize(deserializer)?;
        NodePath::parse(&s).map_err(D::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_root() {
        let root = NodePath::parse("/").unwrap();
        assert!(root.is_root());
        assert_eq!(root.to_string(), "/");
        assert_eq!(root, NodePath::root());
    }

    #[test]
    fn parse_and_display_round_trip() {
        let path = NodePath::parse("/config/product/svc").unwrap();
        assert_eq!(path.components(), &["config", "product", "svc"]);
        assert_eq!(path.to_string(), "/config/product/svc");
    }

    #[test]
    fn parse_rejects_relative() {
        assert!(matches!(
            NodePath::parse("config/product"),
            Err(PathError::Relative { .. })
        ));
        assert!(matches!(NodePath::parse(""), Err(PathError::Relative { .. })));
    }

    #[test]
    fn parse_rejects_empty_components() {
        assert_eq!(
            NodePath::parse("/config//product"),
            Err(PathError::EmptyComponent {
                path: "/config//product".to_string(),
                position: 1,
            })
        );
        assert!(matches!(
            NodePath::parse("/config/product/"),
            Err(PathError::EmptyComponent { position: 2, .. })
        ));
    }

    #[test]
    fn parse_rejects_dot_components() {
        assert!(NodePath::parse("/config/./product").is_err());
        assert!(NodePath::parse("/config/../product").is_err());
        // Dots inside a name are fine
        assert!(NodePath::parse("/config/app.yaml").is_ok());
    }

    #[test]
    fn unicode_components_are_allowed() {
        let path = NodePath::parse("/config/product/参数").unwrap();
        assert_eq!(path.name(), Some("参数"));
    }

    #[test]
    fn parent_and_name() {
        let path = node_path!("/config/product/svc");
        assert_eq!(path.name(), Some("svc"));
        assert_eq!(path.parent(), Some(node_path!("/config/product")));
        assert_eq!(node_path!("/config").parent(), Some(NodePath::root()));
        assert_eq!(NodePath::root().parent(), None);
        assert_eq!(NodePath::root().name(), None);
    }

    #[test]
    fn join_child() {
        let path = node_path!("/config").join("product").unwrap();
        assert_eq!(path, node_path!("/config/product"));

        let from_root = NodePath::root().join("config").unwrap();
        assert_eq!(from_root.to_string(), "/config");
    }

    #[test]
    fn join_rejects_nested_or_empty_names() {
        assert!(node_path!("/config").join("a/b").is_err());
        assert!(node_path!("/config").join("").is_err());
        assert!(node_path!("/config").join("..").is_err());
    }

    #[test]
    fn ancestors_are_shallowest_first() {
        let ancestors = node_path!("/config/product/a/b/c").ancestors();
        let rendered: Vec<String> = ancestors.iter().map(|p| p.to_string()).collect();
        assert_eq!(
            rendered,
            vec![
                "/config",
                "/config/product",
                "/config/product/a",
                "/config/product/a/b"
            ]
        );
        assert!(node_path!("/config").ancestors().is_empty());
        assert!(NodePath::root().ancestors().is_empty());
    }

    #[test]
    fn ordering_puts_parents_first() {
        let mut paths = vec![
            node_path!("/config/product/b"),
            node_path!("/config/product/a/x"),
            node_path!("/config/product"),
            node_path!("/config/product/a"),
        ];
        paths.sort();
        assert_eq!(paths[0], node_path!("/config/product"));
        assert_eq!(paths[1], node_path!("/config/product/a"));
        assert_eq!(paths[2], node_path!("/config/product/a/x"));
    }

    #[test]
    fn serde_as_string() {
        let path = node_path!("/config/product");
        let json = serde_json::to_string(&path).unwrap();
        assert_eq!(json, "\"/config/product\"");

        let back: NodePath = serde_json::from_str(&json).unwrap();
        assert_eq!(back, path);

        let bad: Result<NodePath, _> = serde_json::from_str("\"relative\"");
        assert!(bad.is_err());
    }

    #[test]
    fn from_str_parses() {
        let path: NodePath = "/config".parse().unwrap();
        assert_eq!(path.len(), 1);
    }
}
