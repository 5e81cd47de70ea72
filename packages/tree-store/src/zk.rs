//! ZooKeeper-backed tree client.

use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::time::{Duration, Instant};

use bytes::Bytes;
use zookeeper::{Acl, CreateMode, KeeperState, WatchedEvent, Watcher, ZkState, ZooKeeper};

use crate::{Error, NodePath, NodeStat, TreeClient};

/// Handshake timeout used when none is configured.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

// Session events only; no node watches are ever set. The watcher is
// installed before the client starts, so it also sees a handshake that
// completes before a state listener can be added.
struct SessionWatcher {
    states: Sender<ZkState>,
}

impl Watcher for SessionWatcher {
    fn handle(&self, event: WatchedEvent) {
        log::debug!("zookeeper session event: {:?}", event);
        let state = match event.keeper_state {
            KeeperState::SyncConnected => ZkState::Connected,
            KeeperState::AuthFailed => ZkState::AuthFailed,
            KeeperState::Expired => ZkState::Closed,
            _ => return,
        };
        let _ = self.states.send(state);
    }
}

/// A [`TreeClient`] over a single ZooKeeper session.
///
/// The session is established by [`ZkTreeClient::connect`] and closed when
/// the client is dropped.
pub struct ZkTreeClient {
    zk: ZooKeeper,
    endpoints: String,
}

impl ZkTreeClient {
    /// Connect to an ensemble.
    ///
    /// `endpoints` are `host:port` strings; blanks are ignored. Returns
    /// once the session is established, or [`Error::Connect`] if that does
    /// not happen within `timeout`. Later calls are not bounded.
    pub fn connect<S: AsRef<str>>(endpoints: &[S], timeout: Duration) -> Result<Self, Error> {
        let endpoints = join_endpoints(endpoints);
        if endpoints.is_empty() {
            return Err(Error::Connect {
                endpoints,
                message: "no endpoints given".to_string(),
            });
        }

        log::info!("connecting to {} (timeout {:?})", endpoints, timeout);
        let (sender, states) = mpsc::channel();
        let watcher = SessionWatcher {
            states: sender.clone(),
        };
        let zk = ZooKeeper::connect(&endpoints, timeout, watcher).map_err(|e| Error::Connect {
            endpoints: endpoints.clone(),
            message: e.to_string(),
        })?;

        // The handshake runs on the client's own thread; wait for its outcome.
        let subscription = zk.add_listener(move |state| {
            let _ = sender.send(state);
        });
        let session = wait_for_session(&states, timeout);
        zk.remove_listener(subscription);

        // Dropping the client closes the session on the failure path too.
        let client = ZkTreeClient { zk, endpoints };
        match session {
            Ok(()) => {
                log::debug!("session established with {}", client.endpoints);
                Ok(client)
            }
            Err(message) => Err(Error::Connect {
                endpoints: client.endpoints.clone(),
                message,
            }),
        }
    }
}

/// Block until `states` reports a usable session.
///
/// Fails when the session is closed or refused, or when `timeout` passes
/// first.
fn wait_for_session(states: &Receiver<ZkState>, timeout: Duration) -> Result<(), String> {
    let deadline = Instant::now() + timeout;
    loop {
        let remaining = deadline.saturating_duration_since(Instant::now());
        match states.recv_timeout(remaining) {
            Ok(ZkState::Connected) | Ok(ZkState::ConnectedReadOnly) => return Ok(()),
            Ok(ZkState::AuthFailed) => return Err("authentication failed".to_string()),
            Ok(ZkState::Closed) => return Err("session closed during handshake".to_string()),
            Ok(state) => log::debug!("session state {:?}", state),
            Err(RecvTimeoutError::Timeout) => {
                return Err(format!("no session established within {:?}", timeout))
            }
            Err(RecvTimeoutError::Disconnected) => {
                return Err("client stopped before a session was established".to_string())
            }
        }
    }
}

fn join_endpoints<S: AsRef<str>>(endpoints: &[S]) -> String {
    endpoints
        .iter()
        .map(|e| e.as_ref().trim())
        .filter(|e| !e.is_empty())
        .collect::<Vec<_>>()
        .join(",")
}

impl Drop for ZkTreeClient {
    fn drop(&mut self) {
        log::debug!("closing session to {}", self.endpoints);
        if let Err(e) = self.zk.close() {
            log::debug!("error closing session to {}: {}", self.endpoints, e);
        }
    }
}

impl TreeClient for ZkTreeClient {
    fn exists(&mut self, path: &NodePath) -> Result<Option<NodeStat>, Error> {
        self.zk
            .exists(&path.to_string(), false)
            .map(|stat| stat.map(NodeStat::from))
            .map_err(|e| Error::from_zk(e, path, None))
    }

    fn get(&mut self, path: &NodePath) -> Result<(Bytes, NodeStat), Error> {
        self.zk
            .get_data(&path.to_string(), false)
            .map(|(data, stat)| (Bytes::from(data), NodeStat::from(stat)))
            .map_err(|e| Error::from_zk(e, path, None))
    }

    fn set(
        &mut self,
        path: &NodePath,
        payload: Bytes,
        expected_version: Option<i32>,
    ) -> Result<NodeStat, Error> {
        self.zk
            .set_data(&path.to_string(), payload.to_vec(), expected_version)
            .map(NodeStat::from)
            .map_err(|e| Error::from_zk(e, path, expected_version))
    }

    fn create(&mut self, path: &NodePath, payload: Bytes) -> Result<NodePath, Error> {
        let created = self
            .zk
            .create(
                &path.to_string(),
                payload.to_vec(),
                Acl::open_unsafe().clone(),
                CreateMode::Persistent,
            )
            .map_err(|e| Error::from_zk(e, path, None))?;
        Ok(NodePath::parse(&created)?)
    }

    fn children(&mut self, path: &NodePath) -> Result<Vec<String>, Error> {
        self.zk
            .get_children(&path.to_string(), false)
            .map_err(|e| Error::from_zk(e, path, None))
    }
}
