mod logging;

pub use logging::{format_line, FileLogLayer, FileLogSink};

use std::path::PathBuf;
use std::sync::Arc;

use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Configuration for the telemetry subsystem.
#[derive(Clone, Debug)]
pub struct TelemetryConfig {
    /// File receiving `[timestamp] LEVEL message` lines.
    pub log_file: PathBuf,
    /// Mirror every line to stdout and default to DEBUG.
    pub debug: bool,
    /// Default level when RUST_LOG is unset and `debug` is off.
    pub log_level: Level,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_file: PathBuf::from("app.log"),
            debug: false,
            log_level: Level::INFO,
        }
    }
}

impl TelemetryConfig {
    fn default_filter(&self) -> String {
        let level = if self.debug { Level::DEBUG } else { self.log_level };
        level.to_string().to_lowercase()
    }
}

/// Keeps the file sink alive for the life of the process.
pub struct TelemetryGuard {
    sink: Option<Arc<FileLogSink>>,
}

impl TelemetryGuard {
    /// The log file sink, if it could be opened.
    pub fn sink(&self) -> Option<&FileLogSink> {
        self.sink.as_deref()
    }
}

impl Drop for TelemetryGuard {
    fn drop(&mut self) {
        if let Some(sink) = &self.sink {
            sink.flush();
        }
    }
}

/// Initialize the telemetry subsystem. Call once at startup.
///
/// A log file that cannot be opened is reported on stderr and the process
/// keeps running with whatever console output `debug` enables.
pub fn init_telemetry(config: &TelemetryConfig) -> TelemetryGuard {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(config.default_filter()));

    let sink = match FileLogSink::open(&config.log_file) {
        Ok(sink) => Some(Arc::new(sink)),
        Err(e) => {
            eprintln!(
                "carousel-telemetry: failed to open log file {}: {e}",
                config.log_file.display()
            );
            None
        }
    };
    let file_layer = sink.clone().map(FileLogLayer::new);

    // Console mirror only in debug mode
    let console_layer = config
        .debug
        .then(|| tracing_subscriber::fmt::layer().with_target(true));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(console_layer)
        .init();

    TelemetryGuard { sink }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_filter_follows_debug_flag() {
        let mut config = TelemetryConfig::default();
        assert_eq!(config.default_filter(), "info");
        config.debug = true;
        assert_eq!(config.default_filter(), "debug");
    }

    #[test]
    fn default_config_logs_to_app_log() {
        let config = TelemetryConfig::default();
        assert_eq!(config.log_file, PathBuf::from("app.log"));
        assert!(!config.debug);
    }
}
