//! HTTP error mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use carousel_store::StoreError;
use serde::Serialize;
use thiserror::Error;

/// Failures surfaced by the HTTP endpoints.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Token did not match the shared secret.
    #[error("Unauthorized")]
    Unauthorized,

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// `{"message": ...}`, the only body shape this service returns.
#[derive(Debug, Serialize)]
pub struct MessageBody {
    pub message: String,
}

impl MessageBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::Store(e) => {
                tracing::error!(error = %e, "link store failure");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        (status, Json(MessageBody::new(self.to_string()))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_json(resp: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(resp.into_body(), 10_000).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn unauthorized_is_401_with_fixed_message() {
        let resp = ApiError::Unauthorized.into_response();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_json(resp).await["message"], "Unauthorized");
    }

    #[tokio::test]
    async fn store_error_is_500() {
        let resp = ApiError::from(StoreError::Database("disk I/O error".into())).into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(resp).await;
        assert!(body["message"].as_str().unwrap().contains("disk I/O error"));
    }
}
