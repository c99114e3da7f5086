//! Shared types for the carousel image-link service.
//!
//! - [`gate::SecretGate`]: shared-secret check used by every gated surface
//! - [`links::LinkRecord`]: a persisted image link
//! - [`protocol`]: the text messages spoken on the push channel
//! - [`ids::ConnectionId`]: branded identifier for push connections

pub mod gate;
pub mod ids;
pub mod links;
pub mod protocol;

pub use gate::SecretGate;
pub use ids::ConnectionId;
pub use links::{LinkRecord, NewLink};
