use std::sync::Arc;
use tracing::{debug, info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::agent::QuestionAnswering;
use crate::asr::SpeechToText;
use crate::error::PipelineError;
use crate::pipeline::response::QueryResponse;
use crate::tts::TextToSpeech;
use crate::utils::audio::encode_audio;
use crate::validation::{decode_speech_request, decode_text_request};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Idle,
    Validating,
    Recognizing,
    Answering,
    Synthesizing,
    Encoding,
    Responded,
    Failed,
}

/// Tracks one request through the state machine. Dropping it before a
/// terminal state means the request future was cancelled.
struct Run {
    state: PipelineState,
}

impl Run {
    fn new() -> Self {
        Self {
            state: PipelineState::Idle,
        }
    }

    fn advance(&mut self, next: PipelineState) {
        debug!(from = ?self.state, to = ?next, "Pipeline transition");
        self.state = next;
    }

    fn fail(&mut self, err: PipelineError) -> PipelineError {
        warn!(
            state = ?self.state,
            stage = err.stage.map(|s| s.name()).unwrap_or("gateway"),
            kind = %err.kind,
            status = err.status,
            "Pipeline failed: {}",
            err.message
        );
        self.state = PipelineState::Failed;
        err
    }
}

impl Drop for Run {
    fn drop(&mut self) {
        if !matches!(
            self.state,
            PipelineState::Idle | PipelineState::Responded | PipelineState::Failed
        ) {
            warn!(state = ?self.state, "Pipeline cancelled before responding");
        }
    }
}

/// Sequences speech-to-text, question answering and text-to-speech.
///
/// Strictly sequential and fail-fast: the first stage error ends the run and
/// no later stage is called.
#[derive(Clone)]
pub struct PipelineOrchestrator {
    stt: Arc<dyn SpeechToText>,
    qa: Arc<dyn QuestionAnswering>,
    tts: Arc<dyn TextToSpeech>,
}

impl PipelineOrchestrator {
    pub fn new(
        stt: Arc<dyn SpeechToText>,
        qa: Arc<dyn QuestionAnswering>,
        tts: Arc<dyn TextToSpeech>,
    ) -> Self {
        Self { stt, qa, tts }
    }

    /// Full pipeline: `{"speech"}` in, `{"speech"}` out
    pub async fn process_query(&self, body: &[u8]) -> Result<QueryResponse, PipelineError> {
        let span = info_span!("pipeline", request_id = %Uuid::new_v4(), mode = "query");
        self.run_query(body).instrument(span).await
    }

    async fn run_query(&self, body: &[u8]) -> Result<QueryResponse, PipelineError> {
        let mut run = Run::new();

        run.advance(PipelineState::Validating);
        let question_audio = decode_speech_request(body).map_err(|e| run.fail(e))?;

        run.advance(PipelineState::Recognizing);
        let question = self
            .stt
            .recognize(&question_audio)
            .await
            .map_err(|e| run.fail(e))?;

        run.advance(PipelineState::Answering);
        let answer = self.qa.answer(&question).await.map_err(|e| run.fail(e))?;

        run.advance(PipelineState::Synthesizing);
        let answer_audio = self.tts.synthesize(&answer).await.map_err(|e| run.fail(e))?;

        run.advance(PipelineState::Encoding);
        let response = QueryResponse::Speech {
            speech: encode_audio(&answer_audio),
        };

        run.advance(PipelineState::Responded);
        info!(
            question = %question,
            answer = %answer,
            audio_bytes = answer_audio.len(),
            "Query answered"
        );
        Ok(response)
    }

    /// Speech-to-text only: `{"speech"}` in, `{"text"}` out
    pub async fn transcribe(&self, body: &[u8]) -> Result<QueryResponse, PipelineError> {
        let span = info_span!("pipeline", request_id = %Uuid::new_v4(), mode = "stt");
        self.run_transcribe(body).instrument(span).await
    }

    async fn run_transcribe(&self, body: &[u8]) -> Result<QueryResponse, PipelineError> {
        let mut run = Run::new();

        run.advance(PipelineState::Validating);
        let audio = decode_speech_request(body).map_err(|e| run.fail(e))?;

        run.advance(PipelineState::Recognizing);
        let text = self.stt.recognize(&audio).await.map_err(|e| run.fail(e))?;

        run.advance(PipelineState::Encoding);
        let response = QueryResponse::Text { text };
        run.advance(PipelineState::Responded);
        Ok(response)
    }

    /// Question answering only: `{"text"}` in, `{"text"}` out
    pub async fn answer(&self, body: &[u8]) -> Result<QueryResponse, PipelineError> {
        let span = info_span!("pipeline", request_id = %Uuid::new_v4(), mode = "qa");
        self.run_answer(body).instrument(span).await
    }

    async fn run_answer(&self, body: &[u8]) -> Result<QueryResponse, PipelineError> {
        let mut run = Run::new();

        run.advance(PipelineState::Validating);
        let question = decode_text_request(body).map_err(|e| run.fail(e))?;

        run.advance(PipelineState::Answering);
        let text = self.qa.answer(&question).await.map_err(|e| run.fail(e))?;

        run.advance(PipelineState::Encoding);
        let response = QueryResponse::Text { text };
        run.advance(PipelineState::Responded);
        Ok(response)
    }

    /// Text-to-speech only: `{"text"}` in, `{"speech"}` out
    pub async fn synthesize(&self, body: &[u8]) -> Result<QueryResponse, PipelineError> {
        let span = info_span!("pipeline", request_id = %Uuid::new_v4(), mode = "tts");
        self.run_synthesize(body).instrument(span).await
    }

    async fn run_synthesize(&self, body: &[u8]) -> Result<QueryResponse, PipelineError> {
        let mut run = Run::new();

        run.advance(PipelineState::Validating);
        let text = decode_text_request(body).map_err(|e| run.fail(e))?;

        run.advance(PipelineState::Synthesizing);
        let audio = self.tts.synthesize(&text).await.map_err(|e| run.fail(e))?;

        run.advance(PipelineState::Encoding);
        let response = QueryResponse::Speech {
            speech: encode_audio(&audio),
        };
        run.advance(PipelineState::Responded);
        Ok(response)
    }
}
