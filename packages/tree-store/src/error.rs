//! Error types for tree store operations.

use zookeeper::ZkError;

use crate::path::{NodePath, PathError};

/// Errors returned by [`TreeClient`](crate::TreeClient) operations.
///
/// The common store conditions get their own variants so callers can tell a
/// missing node from a version conflict; everything else is carried as a
/// message from the backend.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("{0}")]
    Path(#[from] PathError),

    #[error("could not connect to {endpoints}: {message}")]
    Connect { endpoints: String, message: String },

    #[error("no node at {path}")]
    NoNode { path: NodePath },

    #[error("node {path} already exists")]
    NodeExists { path: NodePath },

    #[error("version conflict at {path}: expected version {expected}")]
    BadVersion { path: NodePath, expected: i32 },

    #[error("store error at {path}: {message}")]
    Store { path: NodePath, message: String },
}

impl Error {
    pub(crate) fn from_zk(error: ZkError, path: &NodePath, expected: Option<i32>) -> Self {
        match error {
            ZkError::NoNode => Error::NoNode { path: path.clone() },
            ZkError::NodeExists => Error::NodeExists { path: path.clone() },
            ZkError::BadVersion => Error::BadVersion {
                path: path.clone(),
                expected: expected.unwrap_or(-1),
            },
            other => Error::Store {
                path: path.clone(),
                message: other.to_string(),
            },
        }
    }
}
