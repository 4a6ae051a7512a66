//! Routes for the agent workflow API.
//!
//! - `POST /v1/agent-workflow/query` → `{result, agent_used}` + `x-workflow-state-id`
//! - `GET /v1/agent-workflow/states/:state_id` → latest-found snapshot or 404
//! - `DELETE /v1/agent-workflow/states/:state_id` → 204
//! - `GET /health`

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    extract::{Path, State},
    http::{HeaderValue, Request, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use queryflow::{AgentError, AgentWorkflow, StoreError};
use serde::Deserialize;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info_span;

/// Response header carrying the state id the query's snapshots were saved under.
pub const STATE_ID_HEADER: &str = "x-workflow-state-id";

/// Max request body size to buffer for logging (bytes). Larger requests return 413.
const LOG_BODY_LIMIT: usize = 1024 * 1024;

/// Shared state for all routes.
pub struct AppState {
    pub workflow: AgentWorkflow,
}

#[derive(Debug, Deserialize)]
pub struct QueryRequest {
    pub query: String,
    /// Reuse a caller-chosen id instead of generating one.
    #[serde(default)]
    pub state_id: Option<String>,
}

/// Builds the router with CORS and per-request tracing.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/v1/agent-workflow/query", post(process_query))
        .route(
            "/v1/agent-workflow/states/:state_id",
            get(get_state).delete(delete_state),
        )
        .layer(middleware::from_fn(log_request_body))
        .layer(
            TraceLayer::new_for_http().make_span_with(|req: &Request<Body>| {
                info_span!("request", method = %req.method(), uri = %req.uri())
            }),
        )
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Middleware that logs method, URI and body size at debug, then forwards the request.
async fn log_request_body(request: Request<Body>, next: Next) -> Result<Response, Response> {
    let (parts, body) = request.into_parts();
    let bytes = to_bytes(body, LOG_BODY_LIMIT)
        .await
        .map_err(|e| (StatusCode::PAYLOAD_TOO_LARGE, e.to_string()).into_response())?;
    tracing::debug!(method = %parts.method, uri = %parts.uri, body_len = bytes.len(), "request");
    Ok(next.run(Request::from_parts(parts, Body::from(bytes))).await)
}

async fn health() -> &'static str {
    "ok"
}

async fn process_query(
    State(state): State<Arc<AppState>>,
    Json(req): Json<QueryRequest>,
) -> Result<Response, ServerError> {
    let state_id = req
        .state_id
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
    let header = HeaderValue::from_str(&state_id)
        .map_err(|_| ServerError::BadRequest(format!("invalid state_id: {:?}", state_id)))?;
    let response = state
        .workflow
        .process_query_with_id(&req.query, &state_id)
        .await
        .map_err(ServerError::Processing)?;

    let mut res = Json(response).into_response();
    res.headers_mut().insert(STATE_ID_HEADER, header);
    Ok(res)
}

async fn get_state(
    State(state): State<Arc<AppState>>,
    Path(state_id): Path<String>,
) -> Result<Response, ServerError> {
    match state.workflow.load_state(&state_id).await? {
        Some(snapshot) => Ok(Json(snapshot).into_response()),
        None => Err(ServerError::NotFound(format!("state {} not found", state_id))),
    }
}

async fn delete_state(
    State(state): State<Arc<AppState>>,
    Path(state_id): Path<String>,
) -> Result<StatusCode, ServerError> {
    state.workflow.delete_state(&state_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Error body is always `{"error": {"message": ...}}`.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("Error processing query: {0}")]
    Processing(AgentError),
    #[error("state store error: {0}")]
    Store(#[from] StoreError),
    #[error("not found: {0}")]
    NotFound(String),
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = match &self {
            ServerError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ServerError::NotFound(_) => StatusCode::NOT_FOUND,
            ServerError::Processing(_) | ServerError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        (
            status,
            Json(serde_json::json!({ "error": { "message": self.to_string() } })),
        )
            .into_response()
    }
}
