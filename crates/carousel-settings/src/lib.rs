//! # carousel-settings
//!
//! Process configuration, read once from the environment at startup.
//!
//! Loading flow:
//! 1. Start with compiled [`CarouselSettings::default()`]
//! 2. Apply `CAROUSEL_*` environment overrides
//! 3. Apply command-line overrides (in the binary)
//! 4. [`CarouselSettings::validate`] before anything is served

pub mod errors;
pub mod loader;
pub mod types;

pub use errors::{Result, SettingsError};
pub use loader::{apply_env_overrides, apply_overrides, load_settings, RejectedVar};
pub use types::{CarouselSettings, LoggingSettings, ServerSettings, StoreSettings};
