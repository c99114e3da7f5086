//! Settings error types.

use thiserror::Error;

/// Errors that can occur when loading or validating settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// No shared secret was configured (or it was empty).
    #[error("shared secret is not configured (set CAROUSEL_KEY)")]
    MissingSecret,
    /// A settings value was invalid (e.g., conflicting ports).
    #[error("invalid settings value: {0}")]
    InvalidValue(String),
}

/// Result type for settings operations.
pub type Result<T> = std::result::Result<T, SettingsError>;
