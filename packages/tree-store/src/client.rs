//! The `TreeClient` trait.

use bytes::Bytes;

use crate::{Error, NodePath, NodeStat};

/// Synchronous access to a hierarchical tree store.
///
/// This is the whole surface the transfer flows need: existence checks,
/// reads with metadata, unconditional or versioned writes, node creation and
/// child listing. Every call blocks on the store.
///
/// # Object Safety
///
/// This trait is object-safe: you can use `Box<dyn TreeClient>`.
pub trait TreeClient {
    /// Check whether a node exists.
    ///
    /// # Returns
    ///
    /// * `Ok(None)` - The node does not exist (not an error condition).
    /// * `Ok(Some(stat))` - The node's current metadata.
    /// * `Err(Error)` - The store could not answer.
    fn exists(&mut self, path: &NodePath) -> Result<Option<NodeStat>, Error>;

    /// Read a node's payload together with its metadata.
    fn get(&mut self, path: &NodePath) -> Result<(Bytes, NodeStat), Error>;

    /// Overwrite a node's payload.
    ///
    /// With `expected_version` of `None` the write always applies. With
    /// `Some(v)` it fails with [`Error::BadVersion`] unless the node is still
    /// at version `v`.
    fn set(
        &mut self,
        path: &NodePath,
        payload: Bytes,
        expected_version: Option<i32>,
    ) -> Result<NodeStat, Error>;

    /// Create a persistent node with an open ACL.
    ///
    /// The parent must already exist. Returns the path of the created node.
    fn create(&mut self, path: &NodePath, payload: Bytes) -> Result<NodePath, Error>;

    /// List the names of a node's direct children, in store order.
    fn children(&mut self, path: &NodePath) -> Result<Vec<String>, Error>;
}

// Blanket implementations for references and boxes

impl<T: TreeClient + ?Sized> TreeClient for &mut T {
    fn exists(&mut self, path: &NodePath) -> Result<Option<NodeStat>, Error> {
        (*self).exists(path)
    }

    fn get(&mut self, path: &NodePath) -> Result<(Bytes, NodeStat), Error> {
        (*self).get(path)
    }

    fn set(
        &mut self,
        path: &NodePath,
        payload: Bytes,
        expected_version: Option<i32>,
    ) -> Result<NodeStat, Error> {
        (*self).set(path, payload, expected_version)
    }

    fn create(&mut self, path: &NodePath, payload: Bytes) -> Result<NodePath, Error> {
        (*self).create(path, payload)
    }

    fn children(&mut self, path: &NodePath) -> Result<Vec<String>, Error> {
        (*self).children(path)
    }
}

impl<T: TreeClient + ?Sized> TreeClient for Box<T> {
    fn exists(&mut self, path: &NodePath) -> Result<Option<NodeStat>, Error> {
        self.as_mut().exists(path)
    }

    fn get(&mut self, path: &NodePath) -> Result<(Bytes, NodeStat), Error> {
        self.as_mut().get(path)
    }

    fn set(
        &mut self,
        path: &NodePath,
        payload: Bytes,
        expected_version: Option<i32>,
    ) -> Result<NodeStat, Error> {
        self.as_mut().set(path, payload, expected_version)
    }

    fn create(&mut self, path: &NodePath, payload: Bytes) -> Result<NodePath, Error> {
        self.as_mut().create(path, payload)
    }

    fn children(&mut self, path: &NodePath) -> Result<Vec<String>, Error> {
        self.as_mut().children(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{node_path, MemoryTree};

    fn write_through(client: &mut dyn TreeClient) {
        client
            .create(&node_path!("/config"), Bytes::from_static(b"v1"))
            .unwrap();
        client
            .set(&node_path!("/config"), Bytes::from_static(b"v2"), None)
            .unwrap();
    }

    #[test]
    fn object_safety_works() {
        let mut tree = MemoryTree::new();
        write_through(&mut tree);

        let (data, stat) = tree.get(&node_path!("/config")).unwrap();
        assert_eq!(data, Bytes::from_static(b"v2"));
        assert_eq!(stat.version, 1);
    }

    #[test]
    fn mut_ref_blanket_impl_works() {
        fn create_in<C: TreeClient>(mut client: C) {
            client
                .create(&node_path!("/ref"), Bytes::from_static(b"data"))
                .unwrap();
        }

        let mut tree = MemoryTree::new();
        create_in(&mut tree);
        assert!(tree.exists(&node_path!("/ref")).unwrap().is_some());
    }

    #[test]
    fn box_dyn_works() {
        let mut boxed: Box<dyn TreeClient> = Box::new(MemoryTree::new());

        boxed
            .create(&node_path!("/boxed"), Bytes::from_static(b"data"))
            .unwrap();
        assert_eq!(
            boxed.children(&NodePath::root()).unwrap(),
            vec!["boxed".to_string()]
        );
    }
}
