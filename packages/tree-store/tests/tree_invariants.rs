use proptest::prelude::*;

use zktool_tree_store::{Bytes, MemoryTree, NodePath, TreeClient};

fn node_paths() -> impl Strategy<Value = NodePath> {
    prop::collection::vec("[a-c]{1,2}", 1..5).prop_map(|components| {
        NodePath::parse(&format!("/{}", components.join("/"))).unwrap()
    })
}

proptest! {
    #[test]
    fn every_node_has_a_parent_and_matching_child_count(
        paths in prop::collection::vec(node_paths(), 1..20)
    ) {
        let mut tree = MemoryTree::new();
        for path in &paths {
            tree.put(path, Bytes::from(path.to_string()));
        }

        for path in tree.snapshot().keys() {
            if let Some(parent) = path.parent() {
                prop_assert!(tree.contains(&parent), "{} has no parent", path);
            }

            let children = tree.children(path).unwrap();
            let (_, stat) = tree.get(path).unwrap();
            prop_assert_eq!(stat.num_children as usize, children.len());
            for child in children {
                prop_assert!(tree.contains(&path.join(&child).unwrap()));
            }
        }
    }

    #[test]
    fn last_put_wins(path in node_paths(), first in ".*", second in ".*") {
        let mut tree = MemoryTree::new();
        tree.put(&path, Bytes::from(first));
        tree.put(&path, Bytes::from(second.clone()));
        prop_assert_eq!(tree.data(&path), Some(&Bytes::from(second)));
    }
}

#[test]
fn create_then_read_through_trait_object() {
    let mut tree = MemoryTree::new();
    let client: &mut dyn TreeClient = &mut tree;

    let config = NodePath::parse("/config").unwrap();
    client.create(&config, Bytes::new()).unwrap();
    client
        .create(&config.join("product").unwrap(), Bytes::from_static(b"p"))
        .unwrap();

    assert_eq!(client.children(&config).unwrap(), vec!["product".to_string()]);
    let stat = client.exists(&config).unwrap().unwrap();
    assert_eq!(stat.num_children, 1);
}
