//! Push channel: connection registry, key replies, update fan-out.

pub mod channel;
pub mod connection;
pub mod session;

pub use channel::NotificationChannel;
pub use connection::ViewerConnection;
