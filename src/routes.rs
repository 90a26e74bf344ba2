use axum::{
    body::Bytes,
    extract::{DefaultBodyLimit, State},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::error::PipelineError;
use crate::pipeline::QueryResponse;
use crate::state::AppState;

pub fn create_routes() -> Router<AppState> {
    Router::new()
        // Full voice query
        .route("/query", post(process_query))

        // Single stages
        .route("/stt", post(speech_to_text))
        .route("/alpha", post(question_answering))
        .route("/tts", post(text_to_speech))

        // Health check
        .route("/api/health", get(health_check))
}

/// Router with middleware and state, as served by the binary
pub fn app(state: AppState) -> Router {
    let body_limit = state.config.system_config.max_request_bytes;

    Router::new()
        .merge(create_routes())
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn process_query(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<QueryResponse, PipelineError> {
    state.pipeline.process_query(&body).await
}

async fn speech_to_text(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<QueryResponse, PipelineError> {
    state.pipeline.transcribe(&body).await
}

async fn question_answering(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<QueryResponse, PipelineError> {
    state.pipeline.answer(&body).await
}

async fn text_to_speech(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<QueryResponse, PipelineError> {
    state.pipeline.synthesize(&body).await
}

async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION")
    }))
}
