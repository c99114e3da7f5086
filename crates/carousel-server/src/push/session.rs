//! Push session lifecycle: one viewer from upgrade through disconnect.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket};
use futures::{SinkExt, StreamExt};
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument, warn};

use super::channel::NotificationChannel;
use crate::config::Heartbeat;

/// Run a push session for a freshly upgraded socket.
///
/// 1. Registers the connection (Open)
/// 2. Spawns a writer draining the outbound queue, with periodic Pings
/// 3. Feeds inbound text frames to [`NotificationChannel::handle_inbound`]
/// 4. Unregisters on close, error, heartbeat timeout or shutdown
#[instrument(skip_all, fields(remote = %remote_addr))]
pub async fn run_viewer_session(
    socket: WebSocket,
    remote_addr: SocketAddr,
    channel: Arc<NotificationChannel>,
    heartbeat: Heartbeat,
    shutdown: CancellationToken,
) {
    let (mut ws_tx, mut ws_rx) = socket.split();
    let (conn, mut send_rx) = channel.register(remote_addr);

    let writer_conn = Arc::clone(&conn);
    let mut writer = tokio::spawn(async move {
        let mut ping_interval = tokio::time::interval(heartbeat.interval);
        // Skip the immediate first tick
        let _ = ping_interval.tick().await;

        loop {
            tokio::select! {
                msg = send_rx.recv() => {
                    let Some(text) = msg else { break };
                    if ws_tx.send(Message::Text(text.into())).await.is_err() {
                        break;
                    }
                }
                _ = ping_interval.tick() => {
                    if writer_conn.idle_for() > heartbeat.timeout {
                        warn!(conn_id = %writer_conn.id, "client unresponsive for {:?}, disconnecting", heartbeat.timeout);
                        break;
                    }
                    if ws_tx.send(Message::Ping(Vec::new().into())).await.is_err() {
                        break;
                    }
                }
            }
        }
        let _ = ws_tx.close().await;
    });

    let reader = async {
        while let Some(frame) = ws_rx.next().await {
            let msg = match frame {
                Ok(msg) => msg,
                Err(e) => {
                    debug!(conn_id = %conn.id, error = %e, "push socket error");
                    break;
                }
            };
            conn.mark_alive();
            match msg {
                Message::Text(text) => channel.handle_inbound(&conn, text.as_str()),
                Message::Binary(data) => match std::str::from_utf8(&data) {
                    Ok(text) => channel.handle_inbound(&conn, text),
                    Err(_) => debug!(conn_id = %conn.id, len = data.len(), "ignoring non-UTF8 binary frame"),
                },
                Message::Close(_) => break,
                Message::Ping(_) | Message::Pong(_) => {}
            }
        }
    };

    tokio::select! {
        () = reader => {}
        _ = &mut writer => {}
        () = shutdown.cancelled() => {
            debug!(conn_id = %conn.id, "closing push session for shutdown");
        }
    }

    channel.unregister(&conn.id);
    writer.abort();
}
