use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

/// Success envelope. Errors are encoded by [`crate::error::PipelineError`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QueryResponse {
    /// `{"speech": "<base64 WAV>"}`
    Speech { speech: String },
    /// `{"text": "..."}`, single-stage mode
    Text { text: String },
}

impl IntoResponse for QueryResponse {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}
