//! Node metadata as reported by the store.

use serde::{Deserialize, Serialize};

/// Read-only metadata the store attaches to every node.
///
/// Field names serialize in camelCase to match the export file layout:
/// `version`, `mtime`, `numChildren`, `dataLength`, `ephemeralOwner`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeStat {
    /// Number of changes to the node's payload.
    pub version: i32,
    /// Last modification time, milliseconds since the epoch.
    pub mtime: i64,
    pub num_children: i32,
    pub data_length: i32,
    /// Session id of the owner if the node is ephemeral, otherwise 0.
    pub ephemeral_owner: i64,
}

impl From<zookeeper::Stat> for NodeStat {
    fn from(stat: zookeeper::Stat) -> Self {
        NodeStat {
            version: stat.version,
            mtime: stat.mtime,
            num_children: stat.num_children,
            data_length: stat.data_length,
            ephemeral_owner: stat.ephemeral_owner,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_export_field_names() {
        let stat = NodeStat {
            version: 3,
            mtime: 1_700_000_000_000,
            num_children: 2,
            data_length: 5,
            ephemeral_owner: 0,
        };
        let json = serde_json::to_value(stat).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "version": 3,
                "mtime": 1_700_000_000_000_i64,
                "numChildren": 2,
                "dataLength": 5,
                "ephemeralOwner": 0
            })
        );
    }

    #[test]
    fn deserializes_export_field_names() {
        let stat: NodeStat = serde_json::from_str(
            r#"{"version":1,"mtime":10,"numChildren":0,"dataLength":4,"ephemeralOwner":7}"#,
        )
        .unwrap();
        assert_eq!(stat.version, 1);
        assert_eq!(stat.ephemeral_owner, 7);
    }
}
