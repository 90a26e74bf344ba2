use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use std::fmt;
use thiserror::Error;

/// Downstream stage that produced an error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    SpeechToText,
    QuestionAnswering,
    TextToSpeech,
}

impl Stage {
    pub fn name(&self) -> &'static str {
        match self {
            Stage::SpeechToText => "speech-to-text",
            Stage::QuestionAnswering => "question-answering",
            Stage::TextToSpeech => "text-to-speech",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Outward-facing error taxonomy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Body is not JSON, or a required field is absent or not a string
    ValidationError,
    /// Audio does not carry the base64 WAV signature
    InvalidAudioFormat,
    /// Audio field is not valid base64
    DecodeError,
    /// Downstream unreachable, timed out, or the request could not be built
    TransportError,
    /// Downstream answered with a non-OK status
    ProviderRejected,
    /// Speech-to-text answered OK but its recognition status is not `Success`
    RecognitionFailure,
    /// Downstream answered OK with a payload missing an expected field
    UpstreamContractError,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::ValidationError => "validation_error",
            ErrorKind::InvalidAudioFormat => "invalid_audio_format",
            ErrorKind::DecodeError => "decode_error",
            ErrorKind::TransportError => "transport_error",
            ErrorKind::ProviderRejected => "provider_rejected",
            ErrorKind::RecognitionFailure => "recognition_failure",
            ErrorKind::UpstreamContractError => "upstream_contract_error",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A terminal pipeline failure: one status code and one message.
///
/// `stage` is `None` for failures detected before any network call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct PipelineError {
    pub kind: ErrorKind,
    pub status: u16,
    pub message: String,
    pub stage: Option<Stage>,
}

impl PipelineError {
    fn new(kind: ErrorKind, status: u16, message: impl Into<String>, stage: Option<Stage>) -> Self {
        Self {
            kind,
            status,
            message: message.into(),
            stage,
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ValidationError, 400, message, None)
    }

    pub fn invalid_audio(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidAudioFormat, 400, message, None)
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::DecodeError, 400, message, None)
    }

    pub fn transport(stage: Stage, status: u16, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::TransportError, status, message, Some(stage))
    }

    pub fn provider_rejected(stage: Stage, status: u16, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ProviderRejected, status, message, Some(stage))
    }

    /// Always 500: the provider answered 200 but the result is unusable.
    pub fn recognition_failure(message: impl Into<String>) -> Self {
        Self::new(
            ErrorKind::RecognitionFailure,
            500,
            message,
            Some(Stage::SpeechToText),
        )
    }

    pub fn upstream_contract(stage: Stage, status: u16, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::UpstreamContractError, status, message, Some(stage))
    }

    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }
}

impl IntoResponse for PipelineError {
    fn into_response(self) -> Response {
        (
            self.status_code(),
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            self.message,
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pre_network_errors_have_no_stage() {
        for err in [
            PipelineError::validation("x"),
            PipelineError::invalid_audio("x"),
            PipelineError::decode("x"),
        ] {
            assert_eq!(err.status, 400);
            assert!(err.stage.is_none());
        }
    }

    #[test]
    fn test_recognition_failure_is_forced_to_500() {
        let err = PipelineError::recognition_failure("no match");
        assert_eq!(err.status, 500);
        assert_eq!(err.stage, Some(Stage::SpeechToText));
        assert_eq!(err.kind, ErrorKind::RecognitionFailure);
    }

    #[test]
    fn test_out_of_range_status_falls_back_to_500() {
        let err = PipelineError::provider_rejected(Stage::TextToSpeech, 42, "odd");
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_error_response_is_plain_text() {
        let response =
            PipelineError::provider_rejected(Stage::QuestionAnswering, 429, "slow down")
                .into_response();
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "text/plain; charset=utf-8"
        );
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&body[..], b"slow down");
    }
}
