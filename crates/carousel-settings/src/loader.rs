//! Settings loading with environment variable overrides.
//!
//! Each env var has strict parsing rules:
//! - Integers must be valid and within the specified range
//! - Booleans accept: `true`/`1`/`yes`/`on` or `false`/`0`/`no`/`off`
//! - Invalid values are ignored (the default is kept) and reported back as
//!   [`RejectedVar`]s, so the caller can warn once logging is up
//! - Empty values count as unset

use std::cell::RefCell;
use std::path::PathBuf;

use secrecy::SecretString;

use crate::types::CarouselSettings;

/// An environment variable whose value could not be used.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RejectedVar {
    pub key: &'static str,
    pub value: String,
    /// What the variable accepts, e.g. `"u16 in 0..=65535"`.
    pub expected: String,
}

/// Load settings from defaults plus the process environment.
///
/// Not validated: callers layer CLI overrides on top first, then call
/// [`CarouselSettings::validate`]. Rejected variables are returned rather
/// than logged because this usually runs before telemetry is initialized.
pub fn load_settings() -> (CarouselSettings, Vec<RejectedVar>) {
    let mut settings = CarouselSettings::default();
    let rejected = apply_env_overrides(&mut settings);
    (settings, rejected)
}

/// Apply `CAROUSEL_*` overrides from the process environment.
pub fn apply_env_overrides(settings: &mut CarouselSettings) -> Vec<RejectedVar> {
    apply_overrides(settings, &|name| std::env::var(name).ok())
}

/// Apply overrides from an arbitrary variable lookup.
pub fn apply_overrides(
    settings: &mut CarouselSettings,
    lookup: &dyn Fn(&str) -> Option<String>,
) -> Vec<RejectedVar> {
    let env = Env {
        lookup,
        rejected: RefCell::new(Vec::new()),
    };

    // ── Server ──────────────────────────────────────────────────────
    if let Some(v) = env.read_string("CAROUSEL_HOST") {
        settings.server.host = v;
    }
    if let Some(v) = env.read_u16("CAROUSEL_APP_PORT", 0, 65535) {
        settings.server.app_port = v;
    }
    if let Some(v) = env.read_u16("CAROUSEL_WS_PORT", 0, 65535) {
        settings.server.ws_port = v;
    }
    if let Some(v) = env.read_string("CAROUSEL_STATIC_DIR") {
        settings.server.static_dir = PathBuf::from(v);
    }
    if let Some(v) = env.read_bool("CAROUSEL_SHARE_KEY") {
        settings.server.share_key = v;
    }
    if let Some(v) = env.read_u64("CAROUSEL_HEARTBEAT_INTERVAL", 1, 3600) {
        settings.server.heartbeat_interval_secs = v;
    }
    if let Some(v) = env.read_u64("CAROUSEL_HEARTBEAT_TIMEOUT", 1, 86_400) {
        settings.server.heartbeat_timeout_secs = v;
    }
    if let Some(v) = env.read_usize("CAROUSEL_MAX_SEND_QUEUE", 1, 65_536) {
        settings.server.max_send_queue = v;
    }

    // ── Store ───────────────────────────────────────────────────────
    if let Some(v) = env.read_string("CAROUSEL_DATA_DIR") {
        settings.store.data_dir = PathBuf::from(v);
    }
    if let Some(v) = env.read_string("CAROUSEL_DB_NAME") {
        settings.store.db_name = v;
    }
    if let Some(v) = env.read_string("CAROUSEL_DB_COLLECTION") {
        settings.store.collection = v;
    }

    // ── Logging ─────────────────────────────────────────────────────
    if let Some(v) = env.read_bool("CAROUSEL_DEBUG") {
        settings.logging.debug = v;
    }
    if let Some(v) = env.read_string("CAROUSEL_LOG_FILE") {
        settings.logging.log_file = PathBuf::from(v);
    }

    // ── Secret ──────────────────────────────────────────────────────
    if let Some(v) = env.read_string("CAROUSEL_KEY") {
        settings.secret = Some(SecretString::from(v));
    }

    env.rejected.into_inner()
}

struct Env<'a> {
    lookup: &'a dyn Fn(&str) -> Option<String>,
    rejected: RefCell<Vec<RejectedVar>>,
}

impl Env<'_> {
    fn read_string(&self, name: &str) -> Option<String> {
        (self.lookup)(name).filter(|v| !v.is_empty())
    }

    fn reject(&self, key: &'static str, value: String, expected: String) {
        self.rejected.borrow_mut().push(RejectedVar { key, value, expected });
    }

    fn read_bool(&self, name: &'static str) -> Option<bool> {
        let val = self.read_string(name)?;
        let result = parse_bool(&val);
        if result.is_none() {
            self.reject(name, val, "boolean".into());
        }
        result
    }

    fn read_u16(&self, name: &'static str, min: u16, max: u16) -> Option<u16> {
        let val = self.read_string(name)?;
        let result = val.trim().parse::<u16>().ok().filter(|v| (min..=max).contains(v));
        if result.is_none() {
            self.reject(name, val, format!("u16 in {min}..={max}"));
        }
        result
    }

    fn read_u64(&self, name: &'static str, min: u64, max: u64) -> Option<u64> {
        let val = self.read_string(name)?;
        let result = val.trim().parse::<u64>().ok().filter(|v| (min..=max).contains(v));
        if result.is_none() {
            self.reject(name, val, format!("u64 in {min}..={max}"));
        }
        result
    }

    fn read_usize(&self, name: &'static str, min: usize, max: usize) -> Option<usize> {
        let val = self.read_string(name)?;
        let result = val.trim().parse::<usize>().ok().filter(|v| (min..=max).contains(v));
        if result.is_none() {
            self.reject(name, val, format!("usize in {min}..={max}"));
        }
        result
    }
}

fn parse_bool(val: &str) -> Option<bool> {
    match val.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}
