//! # carousel-server
//!
//! Axum HTTP application plus the `WebSocket` push channel.
//!
//! - HTTP: viewer page, `POST /save-image`, `GET /get-images`, health, static assets
//! - Push channel (own port): connection registry, `get_key` replies,
//!   `Images updated` fan-out after every ingest
//! - Graceful shutdown via `CancellationToken`

pub mod config;
pub mod context;
pub mod error;
pub mod handlers;
pub mod push;
pub mod server;
pub mod shutdown;

pub use config::{Heartbeat, ServerConfig};
pub use context::AppContext;
pub use error::ApiError;
pub use push::NotificationChannel;
pub use server::{app_router, push_router, start, ServerHandle};
pub use shutdown::ShutdownCoordinator;
