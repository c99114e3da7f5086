//! Server configuration.

use std::path::PathBuf;
use std::time::Duration;

/// Listener and push-channel settings for [`crate::start`].
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Host to bind both listeners on.
    pub host: String,
    /// HTTP application port (`0` to auto-assign).
    pub app_port: u16,
    /// Push channel port (`0` to auto-assign).
    pub ws_port: u16,
    /// Directory with `main.html` and the viewer assets.
    pub static_dir: PathBuf,
    /// Reply to `get_key` with the shared secret.
    pub share_key: bool,
    pub heartbeat: Heartbeat,
    /// Outbound queue capacity per push connection.
    pub max_send_queue: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".into(),
            app_port: 0,
            ws_port: 0,
            static_dir: PathBuf::from("static"),
            share_key: true,
            heartbeat: Heartbeat::default(),
            max_send_queue: 256,
        }
    }
}

/// Ping cadence for push connections.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Heartbeat {
    /// Time between server Ping frames.
    pub interval: Duration,
    /// Silence after which a connection is dropped.
    pub timeout: Duration,
}

impl Default for Heartbeat {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(30),
            timeout: Duration::from_secs(90),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_ports_are_ephemeral() {
        let cfg = ServerConfig::default();
        assert_eq!(cfg.app_port, 0);
        assert_eq!(cfg.ws_port, 0);
        assert_eq!(cfg.host, "127.0.0.1");
    }

    #[test]
    fn default_heartbeat() {
        let hb = Heartbeat::default();
        assert_eq!(hb.interval, Duration::from_secs(30));
        assert_eq!(hb.timeout, Duration::from_secs(90));
    }

    #[test]
    fn key_sharing_on_by_default() {
        assert!(ServerConfig::default().share_key);
    }
}
