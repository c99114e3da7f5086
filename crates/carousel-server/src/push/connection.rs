//! Server-side handle of one viewer connection.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::{Duration, Instant};

use carousel_core::ConnectionId;
use parking_lot::Mutex;
use tokio::sync::mpsc;

/// One open push connection.
///
/// Outbound frames go through a bounded queue drained by the connection's
/// writer task. Once closed, every send is refused.
pub struct ViewerConnection {
    pub id: ConnectionId,
    /// Diagnostic only.
    pub remote_addr: SocketAddr,
    tx: mpsc::Sender<String>,
    open: AtomicBool,
    pub connected_at: Instant,
    last_seen: Mutex<Instant>,
    dropped_messages: AtomicU64,
}

impl ViewerConnection {
    pub fn new(remote_addr: SocketAddr, tx: mpsc::Sender<String>) -> Self {
        let now = Instant::now();
        Self {
            id: ConnectionId::new(),
            remote_addr,
            tx,
            open: AtomicBool::new(true),
            connected_at: now,
            last_seen: Mutex::new(now),
            dropped_messages: AtomicU64::new(0),
        }
    }

    /// Open until [`close`](Self::close) or until the writer side goes away.
    pub fn is_open(&self) -> bool {
        self.open.load(Ordering::Acquire) && !self.tx.is_closed()
    }

    pub fn close(&self) {
        self.open.store(false, Ordering::Release);
    }

    /// Queue a text frame. Returns `false` when closed or when the queue is full.
    pub fn send(&self, message: String) -> bool {
        if !self.is_open() {
            return false;
        }
        if self.tx.try_send(message).is_ok() {
            true
        } else {
            let _ = self.dropped_messages.fetch_add(1, Ordering::Relaxed);
            false
        }
    }

    pub fn drop_count(&self) -> u64 {
        self.dropped_messages.load(Ordering::Relaxed)
    }

    /// Record inbound traffic (any frame, including Pong).
    pub fn mark_alive(&self) {
        *self.last_seen.lock() = Instant::now();
    }

    pub fn idle_for(&self) -> Duration {
        self.last_seen.lock().elapsed()
    }
}
