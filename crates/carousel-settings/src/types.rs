//! Settings types and their compiled defaults.

use std::path::PathBuf;

use carousel_core::SecretGate;
use secrecy::{ExposeSecret, SecretString};

use crate::errors::{Result, SettingsError};

/// Top-level settings for the carousel process.
#[derive(Clone, Debug, Default)]
pub struct CarouselSettings {
    pub server: ServerSettings,
    pub store: StoreSettings,
    pub logging: LoggingSettings,
    /// Shared secret gating ingest and query. Required.
    pub secret: Option<SecretString>,
}

/// HTTP and push-channel listener settings.
#[derive(Clone, Debug)]
pub struct ServerSettings {
    pub host: String,
    /// Port of the HTTP application.
    pub app_port: u16,
    /// Port of the push channel. Must differ from `app_port`.
    pub ws_port: u16,
    /// Directory holding `main.html` and the viewer assets.
    pub static_dir: PathBuf,
    /// Answer `get_key` on the push channel.
    pub share_key: bool,
    pub heartbeat_interval_secs: u64,
    pub heartbeat_timeout_secs: u64,
    /// Per-connection outbound queue capacity.
    pub max_send_queue: usize,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            app_port: 3000,
            ws_port: 9000,
            static_dir: PathBuf::from("static"),
            share_key: true,
            heartbeat_interval_secs: 30,
            heartbeat_timeout_secs: 90,
            max_send_queue: 256,
        }
    }
}

/// Link store location.
#[derive(Clone, Debug)]
pub struct StoreSettings {
    pub data_dir: PathBuf,
    /// Database name; selects `<data_dir>/<db_name>.db`.
    pub db_name: String,
    /// Collection (table) holding the link records.
    pub collection: String,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            db_name: "carousal_app".into(),
            collection: "carousal_app_image_link".into(),
        }
    }
}

impl StoreSettings {
    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join(format!("{}.db", self.db_name))
    }
}

/// Log sink settings.
#[derive(Clone, Debug)]
pub struct LoggingSettings {
    /// Mirror log lines to the console and lower the default level to debug.
    pub debug: bool,
    pub log_file: PathBuf,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            debug: false,
            log_file: PathBuf::from("app.log"),
        }
    }
}

impl CarouselSettings {
    /// Check cross-field constraints. Call once before serving.
    pub fn validate(&self) -> Result<()> {
        match &self.secret {
            Some(s) if !s.expose_secret().is_empty() => {}
            _ => return Err(SettingsError::MissingSecret),
        }
        if self.server.app_port != 0 && self.server.app_port == self.server.ws_port {
            return Err(SettingsError::InvalidValue(format!(
                "app port and push port are both {}",
                self.server.app_port
            )));
        }
        if self.server.heartbeat_interval_secs == 0 {
            return Err(SettingsError::InvalidValue(
                "heartbeat interval must be at least 1 second".into(),
            ));
        }
        if self.server.heartbeat_timeout_secs <= self.server.heartbeat_interval_secs {
            return Err(SettingsError::InvalidValue(format!(
                "heartbeat timeout ({}s) must exceed the heartbeat interval ({}s)",
                self.server.heartbeat_timeout_secs, self.server.heartbeat_interval_secs
            )));
        }
        Ok(())
    }

    /// Build the gate for the configured secret.
    pub fn secret_gate(&self) -> Result<SecretGate> {
        self.secret
            .clone()
            .filter(|s| !s.expose_secret().is_empty())
            .map(SecretGate::new)
            .ok_or(SettingsError::MissingSecret)
    }
}
