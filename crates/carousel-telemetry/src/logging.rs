use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{SecondsFormat, Utc};
use parking_lot::Mutex;
use tracing::field::{Field, Visit};
use tracing_subscriber::layer::Context;
use tracing_subscriber::Layer;

/// Append-only log file.
///
/// Every write is one complete line. Write failures are reported on stderr
/// and otherwise swallowed: logging never fails the caller.
pub struct FileLogSink {
    file: Mutex<File>,
    path: PathBuf,
}

impl FileLogSink {
    pub fn open(path: &Path) -> std::io::Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            file: Mutex::new(file),
            path: path.to_owned(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn write_line(&self, line: &str) {
        let mut file = self.file.lock();
        if let Err(e) = file.write_all(line.as_bytes()) {
            eprintln!("Failed to write to log file: {e}");
        }
    }

    pub fn flush(&self) {
        let _ = self.file.lock().flush();
    }
}

/// `[2026-01-01T00:00:00.000Z] INFO message\n`
pub fn format_line(timestamp: &str, level: &str, message: &str) -> String {
    format!("[{timestamp}] {level} {message}\n")
}

/// tracing Layer that appends every enabled event to a [`FileLogSink`].
pub struct FileLogLayer {
    sink: Arc<FileLogSink>,
}

impl FileLogLayer {
    pub fn new(sink: Arc<FileLogSink>) -> Self {
        Self { sink }
    }
}

/// Collects the message and any structured fields of an event.
struct LineVisitor {
    message: String,
    fields: Vec<(String, String)>,
}

impl LineVisitor {
    fn new() -> Self {
        Self {
            message: String::new(),
            fields: Vec::new(),
        }
    }

    /// Message followed by `key=value` pairs in emission order.
    fn render(self) -> String {
        let mut out = self.message;
        for (name, value) in self.fields {
            if !out.is_empty() {
                out.push(' ');
            }
            out.push_str(&name);
            out.push('=');
            out.push_str(&value);
        }
        out
    }
}

impl Visit for LineVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        let val = format!("{value:?}");
        if field.name() == "message" {
            self.message = val;
        } else {
            self.fields.push((field.name().to_string(), val));
        }
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message = value.to_string();
        } else {
            self.fields.push((field.name().to_string(), value.to_string()));
        }
    }
}

impl<S> Layer<S> for FileLogLayer
where
    S: tracing::Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
{
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        let mut visitor = LineVisitor::new();
        event.record(&mut visitor);

        let timestamp = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
        let level = event.metadata().level().to_string();
        self.sink
            .write_line(&format_line(&timestamp, &level, &visitor.render()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_subscriber::layer::SubscriberExt;

    fn read(path: &Path) -> String {
        std::fs::read_to_string(path).unwrap()
    }

    #[test]
    fn format_line_shape() {
        assert_eq!(
            format_line("2026-02-14T12:00:00.000Z", "ERROR", "Unauthorized request"),
            "[2026-02-14T12:00:00.000Z] ERROR Unauthorized request\n"
        );
    }

    #[test]
    fn sink_appends_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("app.log");
        let sink = FileLogSink::open(&path).unwrap();
        sink.write_line("one\n");
        sink.write_line("two\n");
        sink.flush();
        assert_eq!(read(&path), "one\ntwo\n");
    }

    #[test]
    fn sink_reopen_keeps_existing_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("app.log");
        FileLogSink::open(&path).unwrap().write_line("first\n");
        FileLogSink::open(&path).unwrap().write_line("second\n");
        assert_eq!(read(&path), "first\nsecond\n");
    }

    #[test]
    fn sink_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/logs/app.log");
        let sink = FileLogSink::open(&path).unwrap();
        assert_eq!(sink.path(), path.as_path());
        assert!(path.exists());
    }

    #[test]
    fn layer_writes_level_and_message() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("app.log");
        let sink = Arc::new(FileLogSink::open(&path).unwrap());
        let subscriber = tracing_subscriber::registry().with(FileLogLayer::new(sink.clone()));

        tracing::subscriber::with_default(subscriber, || {
            tracing::info!("Image link saved successfully");
            tracing::error!("Unauthorized request");
        });
        sink.flush();

        let content = read(&path);
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with('['));
        assert!(lines[0].ends_with("] INFO Image link saved successfully"));
        assert!(lines[1].ends_with("] ERROR Unauthorized request"));
    }

    #[test]
    fn layer_appends_structured_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("app.log");
        let sink = Arc::new(FileLogSink::open(&path).unwrap());
        let subscriber = tracing_subscriber::registry().with(FileLogLayer::new(sink.clone()));

        tracing::subscriber::with_default(subscriber, || {
            tracing::info!(recipients = 2, "Images updated");
        });
        sink.flush();

        assert!(read(&path).trim_end().ends_with("INFO Images updated recipients=2"));
    }

    #[test]
    fn timestamp_is_utc_millis() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("app.log");
        let sink = Arc::new(FileLogSink::open(&path).unwrap());
        let subscriber = tracing_subscriber::registry().with(FileLogLayer::new(sink.clone()));

        tracing::subscriber::with_default(subscriber, || tracing::warn!("x"));
        sink.flush();

        let content = read(&path);
        let stamp = &content[1..content.find(']').unwrap()];
        assert!(stamp.ends_with('Z'), "got: {stamp}");
        assert!(chrono::DateTime::parse_from_rfc3339(stamp).is_ok());
    }
}
