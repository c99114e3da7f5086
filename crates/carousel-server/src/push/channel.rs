//! Connection registry and the two-message push protocol.

use std::net::SocketAddr;
use std::sync::Arc;

use carousel_core::protocol::{Inbound, Outbound};
use carousel_core::{ConnectionId, SecretGate};
use dashmap::DashMap;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use super::connection::ViewerConnection;

/// Registry of open viewer connections.
///
/// A connection is present exactly while it is open: `register` on upgrade,
/// `unregister` when its session task ends for any reason.
pub struct NotificationChannel {
    connections: DashMap<ConnectionId, Arc<ViewerConnection>>,
    gate: SecretGate,
    share_key: bool,
    max_send_queue: usize,
}

impl NotificationChannel {
    pub fn new(gate: SecretGate, share_key: bool, max_send_queue: usize) -> Self {
        Self {
            connections: DashMap::new(),
            gate,
            share_key,
            max_send_queue,
        }
    }

    /// Add a new Open connection and hand back its outbound queue.
    pub fn register(&self, remote_addr: SocketAddr) -> (Arc<ViewerConnection>, mpsc::Receiver<String>) {
        let (tx, rx) = mpsc::channel(self.max_send_queue);
        let conn = Arc::new(ViewerConnection::new(remote_addr, tx));
        let _ = self.connections.insert(conn.id.clone(), Arc::clone(&conn));
        info!(conn_id = %conn.id, "Client connected : {remote_addr}");
        (conn, rx)
    }

    /// Close and drop a connection. Unknown ids are ignored.
    pub fn unregister(&self, id: &ConnectionId) {
        if let Some((_, conn)) = self.connections.remove(id) {
            conn.close();
            info!(
                conn_id = %id,
                connected_secs = conn.connected_at.elapsed().as_secs(),
                dropped = conn.drop_count(),
                "Client disconnected"
            );
        }
    }

    /// Handles registered right now. Later registrations or removals do not
    /// affect the returned list.
    pub fn snapshot(&self) -> Vec<Arc<ViewerConnection>> {
        self.connections
            .iter()
            .map(|entry| Arc::clone(entry.value()))
            .collect()
    }

    /// Send `Images updated` to every connection open at call time.
    ///
    /// Best effort: closed connections and full queues are skipped without
    /// error or retry. Returns how many connections accepted the message.
    pub fn broadcast_update(&self) -> usize {
        let message = Outbound::ImagesUpdated.render();
        let mut delivered = 0;
        for conn in self.snapshot() {
            if conn.send(message.clone()) {
                delivered += 1;
            } else {
                debug!(conn_id = %conn.id, "skipping connection during broadcast");
            }
        }
        delivered
    }

    /// React to one inbound text frame from `conn`.
    pub fn handle_inbound(&self, conn: &ViewerConnection, text: &str) {
        match Inbound::parse(text) {
            Inbound::GetKey if self.share_key => {
                if conn.send(Outbound::Key(self.gate.reveal()).render()) {
                    info!(conn_id = %conn.id, "Key sent to client");
                }
            }
            Inbound::GetKey => {
                warn!(conn_id = %conn.id, "key request refused, key sharing is disabled");
            }
            Inbound::Other => {
                debug!(conn_id = %conn.id, len = text.len(), "ignoring inbound message");
            }
        }
    }

    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    pub fn contains(&self, id: &ConnectionId) -> bool {
        self.connections.contains_key(id)
    }
}
