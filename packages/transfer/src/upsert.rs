//! Create-or-overwrite for a single node.

use std::fmt;
use std::str::FromStr;

use bytes::Bytes;
use zktool_tree_store::{NodePath, NodeStat, TreeClient};

use crate::report::{Outcome, Report};

/// How an existing node is overwritten.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum WritePolicy {
    /// Overwrite whatever is there, ignoring concurrent modification.
    #[default]
    LastWriterWins,
    /// Overwrite only if the node is still at the version seen by the
    /// existence check; otherwise the write fails with a version conflict.
    MatchVersion,
}

impl WritePolicy {
    fn expected_version(self, stat: &NodeStat) -> Option<i32> {
        match self {
            WritePolicy::LastWriterWins => None,
            WritePolicy::MatchVersion => Some(stat.version),
        }
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown write policy {0:?} (expected last-writer-wins or match-version)")]
pub struct UnknownPolicy(pub String);

impl FromStr for WritePolicy {
    type Err = UnknownPolicy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "last-writer-wins" => Ok(WritePolicy::LastWriterWins),
            "match-version" => Ok(WritePolicy::MatchVersion),
            _ => Err(UnknownPolicy(s.to_string())),
        }
    }
}

impl fmt::Display for WritePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WritePolicy::LastWriterWins => write!(f, "last-writer-wins"),
            WritePolicy::MatchVersion => write!(f, "match-version"),
        }
    }
}

/// Write `payload` to `path`, creating the node and any missing ancestors
/// if it does not exist yet.
///
/// Never returns an error: store failures come back as
/// [`Outcome::Failed`] so a batch can keep going.
pub fn upsert<C: TreeClient + ?Sized>(
    client: &mut C,
    path: &NodePath,
    payload: Bytes,
    policy: WritePolicy,
) -> Outcome {
    match client.exists(path) {
        Ok(Some(stat)) => match client.set(path, payload, policy.expected_version(&stat)) {
            Ok(_) => Outcome::Updated,
            Err(error) => Outcome::Failed(error),
        },
        Ok(None) => {
            ensure_ancestors(client, path);
            match client.create(path, payload) {
                Ok(_) => Outcome::Created,
                Err(error) => Outcome::Failed(error),
            }
        }
        Err(error) => Outcome::Failed(error),
    }
}

/// Create every missing ancestor of `path` with an empty payload, walking
/// down from the top.
///
/// Errors are ignored here; if an ancestor really could not be created the
/// following create of `path` reports it.
pub fn ensure_ancestors<C: TreeClient + ?Sized>(client: &mut C, path: &NodePath) {
    for ancestor in path.ancestors() {
        if let Ok(Some(_)) = client.exists(&ancestor) {
            continue;
        }
        match client.create(&ancestor, Bytes::new()) {
            Ok(_) => log::debug!("created ancestor {}", ancestor),
            Err(e) => log::debug!("ignoring ancestor create failure at {}: {}", ancestor, e),
        }
    }
}

/// Upsert `value` at `path` and record the outcome.
pub(crate) fn apply<C: TreeClient + ?Sized>(
    client: &mut C,
    path: NodePath,
    value: String,
    policy: WritePolicy,
    report: &mut Report,
) {
    let outcome = upsert(client, &path, Bytes::from(value.clone()), policy);
    report.record(path, value, outcome);
}
