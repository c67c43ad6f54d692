//! Shared connection membership.
//!
//! [`ConnectionRegistry`] is the publisher's single shared mutable resource.
//! A connection is a member exactly while its transport is open or closing;
//! the first `Closed` transition removes it, so no fan-out snapshot taken
//! afterwards can observe a dead handle.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use super::ConnectionId;
use super::connection::ClientConnection;

/// Central set of currently connected clients.
///
/// Uses a `RwLock<HashMap<...>>`: fan-out snapshots take the read lock and
/// proceed in parallel, membership mutations serialize on the write lock.
#[derive(Debug)]
pub struct ConnectionRegistry {
    connections: RwLock<HashMap<ConnectionId, Arc<ClientConnection>>>,
}

impl ConnectionRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            connections: RwLock::new(HashMap::new()),
        }
    }

    /// Inserts a connection. No-op if the id is already present.
    pub async fn add(&self, connection: Arc<ClientConnection>) {
        let id = connection.id();
        let mut map = self.connections.write().await;
        if map.contains_key(&id) {
            return;
        }
        let _ = map.insert(id, connection);
    }

    /// Removes a connection by id. No-op if absent.
    pub async fn remove(&self, id: ConnectionId) {
        let mut map = self.connections.write().await;
        let _ = map.remove(&id);
    }

    /// Snapshots the current membership minus `excluded`, in no particular
    /// order.
    ///
    /// Fan-out iterates the snapshot outside the lock, so membership changes
    /// triggered mid-iteration (a failed send removing its own target)
    /// neither skip a live connection nor revisit a removed one.
    pub async fn snapshot_except(&self, excluded: ConnectionId) -> Vec<Arc<ClientConnection>> {
        let map = self.connections.read().await;
        map.values()
            .filter(|conn| conn.id() != excluded)
            .map(Arc::clone)
            .collect()
    }

    /// Number of registered connections.
    pub async fn len(&self) -> usize {
        self.connections.read().await.len()
    }

    /// Returns `true` if no client is connected.
    pub async fn is_empty(&self) -> bool {
        self.connections.read().await.is_empty()
    }
}

impl Default for ConnectionRegistry {
    fn default() -> Self {
        Self::new()
    }
}
