//! Tree store client layer.
//!
//! This crate is the only place that talks to the coordination service. It
//! provides:
//! - `NodePath`: a validated absolute path such as `/config/product/svc`
//! - `NodeStat`: the read-only metadata the store keeps per node
//! - `TreeClient`: the synchronous exists/get/set/create/children surface
//! - `ZkTreeClient`: a `TreeClient` over one ZooKeeper session
//! - `MemoryTree`: an in-memory `TreeClient` with fault injection, for tests
//!
//! # Example
//!
//! ```rust
//! use zktool_tree_store::{MemoryTree, NodePath, TreeClient};
//!
//! fn list(client: &mut dyn TreeClient, path: &str) -> Vec<String> {
//!     let path = NodePath::parse(path).unwrap();
//!     client.children(&path).unwrap_or_default()
//! }
//!
//! let mut tree = MemoryTree::new();
//! tree.put(&NodePath::parse("/config/product").unwrap(), "");
//! assert_eq!(list(&mut tree, "/config"), vec!["product".to_string()]);
//! ```

pub use bytes::Bytes;

mod client;
mod error;
mod memory;
mod path;
mod stat;
mod zk;

pub use client::TreeClient;
pub use error::Error;
pub use memory::{Fault, MemoryTree};
pub use path::{NodePath, PathError};
pub use stat::NodeStat;
pub use zk::{ZkTreeClient, DEFAULT_CONNECT_TIMEOUT};
