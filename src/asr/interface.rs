use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;

use crate::error::PipelineError;

/// Result body returned by the speech-to-text provider on HTTP 200
#[derive(Debug, Clone, Deserialize)]
pub struct RecognitionResult {
    #[serde(rename = "RecognitionStatus")]
    pub recognition_status: Option<String>,
    #[serde(rename = "DisplayText")]
    pub display_text: Option<Value>,
}

/// Speech-to-text stage
#[async_trait]
pub trait SpeechToText: Send + Sync {
    /// Recognize the question spoken in a WAV file
    ///
    /// # Arguments
    /// * `audio` - Raw WAV bytes
    ///
    /// # Returns
    /// The recognized question text
    async fn recognize(&self, audio: &[u8]) -> Result<String, PipelineError>;
}
