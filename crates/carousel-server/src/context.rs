//! Application context shared by both listeners.

use std::sync::Arc;
use std::time::Instant;

use carousel_core::SecretGate;
use carousel_store::LinkStore;

use crate::config::{Heartbeat, ServerConfig};
use crate::push::NotificationChannel;
use crate::shutdown::ShutdownCoordinator;

/// Everything a request or push session needs, built once at startup.
#[derive(Clone)]
pub struct AppContext {
    pub gate: Arc<SecretGate>,
    pub store: Arc<dyn LinkStore>,
    pub channel: Arc<NotificationChannel>,
    pub shutdown: Arc<ShutdownCoordinator>,
    pub heartbeat: Heartbeat,
    pub started_at: Instant,
}

impl AppContext {
    pub fn new(config: &ServerConfig, gate: SecretGate, store: Arc<dyn LinkStore>) -> Self {
        let channel = NotificationChannel::new(gate.clone(), config.share_key, config.max_send_queue);
        Self {
            gate: Arc::new(gate),
            store,
            channel: Arc::new(channel),
            shutdown: Arc::new(ShutdownCoordinator::new()),
            heartbeat: config.heartbeat,
            started_at: Instant::now(),
        }
    }
}
