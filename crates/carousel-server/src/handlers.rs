//! HTTP endpoint handlers.

use axum::extract::{Query, State};
use axum::Json;
use carousel_core::{LinkRecord, NewLink};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::context::AppContext;
use crate::error::{ApiError, MessageBody};

/// `?key=<token>` on gated endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct KeyQuery {
    pub key: Option<String>,
}

/// Body of `GET /get-images`.
#[derive(Debug, Serialize)]
pub struct ImagesBody {
    pub images: Vec<LinkRecord>,
}

/// Body of `GET /health`.
#[derive(Debug, Serialize)]
pub struct HealthBody {
    pub status: &'static str,
    pub connections: usize,
    pub uptime_secs: u64,
}

fn authorize(ctx: &AppContext, query: &KeyQuery) -> Result<(), ApiError> {
    if ctx.gate.check_opt(query.key.as_deref()) {
        Ok(())
    } else {
        error!("Unauthorized request");
        Err(ApiError::Unauthorized)
    }
}

/// POST /save-image
///
/// The insert is awaited before the broadcast goes out, so a viewer reacting
/// to `Images updated` always finds the new link.
pub async fn save_image(
    State(ctx): State<AppContext>,
    Query(query): Query<KeyQuery>,
    Json(body): Json<NewLink>,
) -> Result<Json<MessageBody>, ApiError> {
    authorize(&ctx, &query)?;

    let record = ctx.store.insert(&body.link).await?;
    info!(id = record.id, "Image link saved successfully");

    let recipients = ctx.channel.broadcast_update();
    info!(recipients, "Images updated");

    Ok(Json(MessageBody::new("Image link saved successfully")))
}

/// GET /get-images
pub async fn get_images(
    State(ctx): State<AppContext>,
    Query(query): Query<KeyQuery>,
) -> Result<Json<ImagesBody>, ApiError> {
    authorize(&ctx, &query)?;

    let images = ctx.store.list_newest_first().await?;
    info!(count = images.len(), "Images fetched successfully");

    Ok(Json(ImagesBody { images }))
}

/// GET /health
pub async fn health(State(ctx): State<AppContext>) -> Json<HealthBody> {
    Json(HealthBody {
        status: "ok",
        connections: ctx.channel.connection_count(),
        uptime_secs: ctx.started_at.elapsed().as_secs(),
    })
}
