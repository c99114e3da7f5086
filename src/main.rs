//! # carousel
//!
//! Image-link broadcast service binary: loads settings, opens the link store
//! and serves the HTTP application plus the push channel until Ctrl-C.

#![deny(unsafe_code)]

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use carousel_server::{AppContext, Heartbeat, ServerConfig};
use carousel_settings::CarouselSettings;
use carousel_store::{Database, LinkRepo, SqliteLinkStore};
use carousel_telemetry::{init_telemetry, TelemetryConfig};
use clap::Parser;

/// Image-link broadcast service.
///
/// Every flag falls back to its `CAROUSEL_*` environment variable.
#[derive(Parser, Debug)]
#[command(name = "carousel", about = "Image-link broadcast service")]
struct Cli {
    /// Host to bind both listeners on.
    #[arg(long)]
    host: Option<String>,

    /// HTTP application port.
    #[arg(long)]
    app_port: Option<u16>,

    /// Push channel port.
    #[arg(long)]
    ws_port: Option<u16>,

    /// Directory holding the SQLite database.
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Directory with `main.html` and the viewer script.
    #[arg(long)]
    static_dir: Option<PathBuf>,

    /// Log file path.
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Mirror logs to the console at debug level.
    #[arg(long)]
    debug: bool,

    /// Refuse `get_key` requests on the push channel.
    #[arg(long)]
    no_share_key: bool,
}

impl Cli {
    fn apply(self, settings: &mut CarouselSettings) {
        if let Some(host) = self.host {
            settings.server.host = host;
        }
        if let Some(port) = self.app_port {
            settings.server.app_port = port;
        }
        if let Some(port) = self.ws_port {
            settings.server.ws_port = port;
        }
        if let Some(dir) = self.data_dir {
            settings.store.data_dir = dir;
        }
        if let Some(dir) = self.static_dir {
            settings.server.static_dir = dir;
        }
        if let Some(path) = self.log_file {
            settings.logging.log_file = path;
        }
        if self.debug {
            settings.logging.debug = true;
        }
        if self.no_share_key {
            settings.server.share_key = false;
        }
    }
}

fn server_config(settings: &CarouselSettings) -> ServerConfig {
    let server = &settings.server;
    ServerConfig {
        host: server.host.clone(),
        app_port: server.app_port,
        ws_port: server.ws_port,
        static_dir: server.static_dir.clone(),
        share_key: server.share_key,
        heartbeat: Heartbeat {
            interval: Duration::from_secs(server.heartbeat_interval_secs),
            timeout: Duration::from_secs(server.heartbeat_timeout_secs),
        },
        max_send_queue: server.max_send_queue,
    }
}

fn open_store(settings: &CarouselSettings) -> Result<SqliteLinkStore> {
    let db_path = settings.store.db_path();
    let db = Database::open(&db_path)
        .with_context(|| format!("failed to open database {}", db_path.display()))?;
    let repo = LinkRepo::new(db, &settings.store.collection)
        .with_context(|| format!("failed to prepare collection {}", settings.store.collection))?;
    let existing = repo.count()?;
    tracing::info!(
        path = %db_path.display(),
        collection = repo.collection(),
        records = existing,
        "Connected to link store"
    );
    Ok(SqliteLinkStore::new(repo))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let (mut settings, rejected) = carousel_settings::load_settings();
    cli.apply(&mut settings);

    let _telemetry = init_telemetry(&TelemetryConfig {
        log_file: settings.logging.log_file.clone(),
        debug: settings.logging.debug,
        ..TelemetryConfig::default()
    });

    for var in &rejected {
        tracing::warn!(
            key = var.key,
            value = %var.value,
            expected = %var.expected,
            "invalid env var, keeping default"
        );
    }

    if let Err(e) = settings.validate() {
        tracing::error!(error = %e, "invalid settings");
        return Err(e).context("invalid settings");
    }
    let gate = settings.secret_gate()?;

    let store = match open_store(&settings) {
        Ok(store) => store,
        Err(e) => {
            tracing::error!(error = %format!("{e:#}"), "Failed to connect to link store");
            return Err(e);
        }
    };

    let config = server_config(&settings);
    if config.share_key {
        tracing::warn!(
            "key sharing is enabled: any client reaching the push port can obtain the shared secret"
        );
    }

    let ctx = AppContext::new(&config, gate, Arc::new(store));
    let handle = carousel_server::start(&config, ctx)
        .await
        .context("failed to bind listeners")?;

    tokio::signal::ctrl_c()
        .await
        .context("failed to listen for ctrl+c")?;

    tracing::info!("Shutting down");
    handle.shutdown(None).await;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_flags_override_settings() {
        let cli = Cli::parse_from([
            "carousel",
            "--app-port",
            "8080",
            "--ws-port",
            "8081",
            "--static-dir",
            "/srv/static",
            "--debug",
            "--no-share-key",
        ]);
        let mut settings = CarouselSettings::default();
        cli.apply(&mut settings);
        assert_eq!(settings.server.app_port, 8080);
        assert_eq!(settings.server.ws_port, 8081);
        assert_eq!(settings.server.static_dir, PathBuf::from("/srv/static"));
        assert!(settings.logging.debug);
        assert!(!settings.server.share_key);
    }

    #[test]
    fn absent_flags_keep_settings() {
        let cli = Cli::parse_from(["carousel"]);
        let mut settings = CarouselSettings::default();
        settings.server.app_port = 4000;
        cli.apply(&mut settings);
        assert_eq!(settings.server.app_port, 4000);
        assert!(settings.server.share_key);
        assert!(!settings.logging.debug);
    }

    #[test]
    fn server_config_carries_heartbeat() {
        let mut settings = CarouselSettings::default();
        settings.server.heartbeat_interval_secs = 5;
        settings.server.heartbeat_timeout_secs = 15;
        let config = server_config(&settings);
        assert_eq!(config.heartbeat.interval, Duration::from_secs(5));
        assert_eq!(config.heartbeat.timeout, Duration::from_secs(15));
        assert_eq!(config.app_port, 3000);
        assert_eq!(config.ws_port, 9000);
    }

    #[test]
    fn open_store_creates_database_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut settings = CarouselSettings::default();
        settings.store.data_dir = dir.path().join("nested");
        assert!(open_store(&settings).is_ok());
        assert!(dir.path().join("nested").join("carousal_app.db").exists());
    }

    #[test]
    fn open_store_rejects_bad_collection() {
        let dir = tempfile::tempdir().unwrap();
        let mut settings = CarouselSettings::default();
        settings.store.data_dir = dir.path().to_path_buf();
        settings.store.collection = "drop table;".into();
        assert!(open_store(&settings).is_err());
    }
}
