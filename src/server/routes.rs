//! HTTP route handlers for the ChatUI API.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use tower_http::services::ServeDir;

use crate::chat::ChatError;

use super::state::AppState;

/// Create the API router with all routes.
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/chat/completions/{thread_id}", post(completions))
        .route("/chat/threads", post(threads))
        .route("/chat/info", get(info))
        .fallback_service(ServeDir::new("static"))
        .with_state(state)
}

/// Health check endpoint.
async fn health_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "chatui",
        "agent": state.agent_name,
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Complete one prompt against an existing conversation.
///
/// The body is the raw prompt text. The conversation id is taken from the
/// route as-is; mapping the caller's identity to its own conversation id is
/// deliberately out of scope here.
// TODO: [security] do not trust the client-supplied thread id; map the
// authenticated caller to its own thread in a server-side store.
async fn completions(
    State(state): State<Arc<AppState>>,
    Path(thread_id): Path<String>,
    prompt: String,
) -> Response {
    match state.proxy.complete(&thread_id, &prompt).await {
        Ok(reply) => Json(serde_json::json!({ "data": reply })).into_response(),
        Err(err) => {
            tracing::error!(
                thread_id = %thread_id,
                prompt = %prompt,
                error = %err,
                "completion failed"
            );
            error_response(&err).into_response()
        }
    }
}

/// Allocate a fresh conversation thread.
async fn threads(State(state): State<Arc<AppState>>) -> Response {
    match state.proxy.start_conversation().await {
        Ok(id) => Json(serde_json::json!({ "id": id })).into_response(),
        Err(err) => {
            tracing::error!(error = %err, "thread creation failed");
            error_response(&err).into_response()
        }
    }
}

/// Report static build metadata.
async fn info(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let build_info = state.proxy.info();
    tracing::info!(
        build_number = %build_info.build_number,
        build_date = %build_info.build_date,
        "info requested"
    );
    Json(serde_json::json!({ "data": build_info }))
}

/// Map a proxy error onto an HTTP response.
///
/// Remote rejections pass the remote status code through; invalid input maps
/// to 400, a poll deadline to 504, everything else to 500.
fn error_response(err: &ChatError) -> (StatusCode, Json<serde_json::Value>) {
    let status = match err {
        ChatError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
        ChatError::Service { status, .. } => {
            StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
        }
        ChatError::RunTimedOut(_) => StatusCode::GATEWAY_TIMEOUT,
        ChatError::EmptyReply | ChatError::Unexpected(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    let message = match err {
        ChatError::Service { message, .. } => message.clone(),
        other => other.to_string(),
    };
    (status, Json(serde_json::json!({ "error": message })))
}
