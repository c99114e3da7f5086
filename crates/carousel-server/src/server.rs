//! Router construction and listener startup.

use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::ws::WebSocketUpgrade;
use axum::extract::{ConnectInfo, State};
use axum::response::Response;
use axum::routing::{get, post};
use axum::Router;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tower_http::cors::CorsLayer;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::config::ServerConfig;
use crate::context::AppContext;
use crate::handlers;
use crate::push::session::run_viewer_session;

/// HTTP application: viewer page, ingest/query endpoints, health, static assets.
pub fn app_router(ctx: AppContext, static_dir: &Path) -> Router {
    Router::new()
        .route_service("/", ServeFile::new(static_dir.join("main.html")))
        .route("/save-image", post(handlers::save_image))
        .route("/get-images", get(handlers::get_images))
        .route("/health", get(handlers::health))
        .fallback_service(ServeDir::new(static_dir))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(ctx)
}

/// Push channel: a single WebSocket upgrade route.
///
/// Must be served with `into_make_service_with_connect_info::<SocketAddr>()`.
pub fn push_router(ctx: AppContext) -> Router {
    Router::new().route("/", get(push_upgrade)).with_state(ctx)
}

async fn push_upgrade(
    ws: WebSocketUpgrade,
    State(ctx): State<AppContext>,
    ConnectInfo(remote_addr): ConnectInfo<SocketAddr>,
) -> Response {
    let channel = Arc::clone(&ctx.channel);
    let heartbeat = ctx.heartbeat;
    let token = ctx.shutdown.token();
    ws.on_upgrade(move |socket| run_viewer_session(socket, remote_addr, channel, heartbeat, token))
}

/// Running listeners returned by [`start`].
pub struct ServerHandle {
    pub app_addr: SocketAddr,
    pub push_addr: SocketAddr,
    ctx: AppContext,
    tasks: Vec<JoinHandle<()>>,
}

impl ServerHandle {
    pub fn context(&self) -> &AppContext {
        &self.ctx
    }

    /// Cancel both listeners and every push session, then wait for the
    /// listener tasks to drain.
    pub async fn shutdown(self, timeout: Option<Duration>) {
        self.ctx.shutdown.graceful_shutdown(self.tasks, timeout).await;
    }
}

/// Bind both ports and serve until the context's shutdown token fires.
pub async fn start(config: &ServerConfig, ctx: AppContext) -> std::io::Result<ServerHandle> {
    let app_listener = TcpListener::bind((config.host.as_str(), config.app_port)).await?;
    let push_listener = TcpListener::bind((config.host.as_str(), config.ws_port)).await?;
    let app_addr = app_listener.local_addr()?;
    let push_addr = push_listener.local_addr()?;

    let app = app_router(ctx.clone(), &config.static_dir);
    let app_token = ctx.shutdown.token();
    let app_task = tokio::spawn(async move {
        if let Err(e) = axum::serve(app_listener, app)
            .with_graceful_shutdown(app_token.cancelled_owned())
            .await
        {
            error!(error = %e, "application server stopped with error");
        }
    });

    let push = push_router(ctx.clone()).into_make_service_with_connect_info::<SocketAddr>();
    let push_token = ctx.shutdown.token();
    let push_task = tokio::spawn(async move {
        if let Err(e) = axum::serve(push_listener, push)
            .with_graceful_shutdown(push_token.cancelled_owned())
            .await
        {
            error!(error = %e, "push server stopped with error");
        }
    });

    info!("Server is running on port {}", app_addr.port());
    info!("Push channel is listening on port {}", push_addr.port());

    Ok(ServerHandle {
        app_addr,
        push_addr,
        ctx,
        tasks: vec![app_task, push_task],
    })
}
