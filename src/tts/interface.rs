use async_trait::async_trait;

use crate::error::PipelineError;

/// TTS interface
#[async_trait]
pub trait TextToSpeech: Send + Sync {
    /// Synthesize speech for an answer
    ///
    /// # Arguments
    /// * `text` - The answer text to speak
    ///
    /// # Returns
    /// Raw WAV bytes
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>, PipelineError>;
}
