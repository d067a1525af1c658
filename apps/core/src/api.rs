//! HTTP transport: `POST /chat` and `GET /health`.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info_span, Instrument};
use uuid::Uuid;

use crate::engine::ChatEngine;
use crate::error::AppError;
use crate::models::{ChatResponse, Message};

/// Message returned to callers instead of internal error details.
pub const GENERIC_ERROR_DETAIL: &str = "Failed to process message";

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<ChatEngine>,
}

impl AppState {
    pub fn new(engine: ChatEngine) -> Self {
        Self {
            engine: Arc::new(engine),
        }
    }
}

/// Error body of the chat endpoint: `{"detail": "..."}`.
#[derive(Debug)]
pub struct ApiError {
    status_code: StatusCode,
    detail: String,
}

impl From<AppError> for ApiError {
    fn from(_: AppError) -> Self {
        Self {
            status_code: StatusCode::INTERNAL_SERVER_ERROR,
            detail: GENERIC_ERROR_DETAIL.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status_code, Json(json!({ "detail": self.detail }))).into_response()
    }
}

/// Create the router with all endpoints
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/chat", post(chat))
        .route("/health", get(health_check))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Process a chat message and return a reply
async fn chat(
    State(state): State<AppState>,
    Json(message): Json<Message>,
) -> Result<Json<ChatResponse>, ApiError> {
    let span = info_span!(
        "chat",
        request_id = %Uuid::new_v4(),
        user_id = message.user_id.as_deref().unwrap_or("-"),
    );

    async {
        state.engine.respond(&message).await.map(Json).map_err(|e| {
            error!("Chat request failed: {}", e);
            ApiError::from(e)
        })
    }
    .instrument(span)
    .await
}

/// Health check endpoint. Does not look at models or the response table.
async fn health_check() -> Json<serde_json::Value> {
    Json(json!({ "status": "healthy" }))
}
