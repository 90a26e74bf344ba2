use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use super::interface::TextToSpeech;
use super::ssml::build_ssml;
use crate::asr::client::SUBSCRIPTION_KEY_HEADER;
use crate::config::{TtsConfig, VoiceSettings};
use crate::error::{PipelineError, Stage};
use crate::stage::{StageInvoker, StageRequest};

pub const OUTPUT_FORMAT_HEADER: &str = "X-Microsoft-OutputFormat";

/// TTS client for the Azure speech REST API
pub struct AzureTextToSpeech {
    invoker: StageInvoker,
    endpoint: String,
    subscription_key: String,
    output_format: String,
    voice: VoiceSettings,
}

impl AzureTextToSpeech {
    /// Create a new TTS client
    pub fn new(client: Client, config: &TtsConfig) -> Self {
        Self {
            invoker: StageInvoker::new(client, Stage::TextToSpeech, config.timeout()),
            endpoint: config.endpoint_url(),
            subscription_key: config.subscription_key.clone(),
            output_format: config.output_format.clone(),
            voice: config.voice.clone(),
        }
    }
}

#[async_trait]
impl TextToSpeech for AzureTextToSpeech {
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>, PipelineError> {
        let ssml = build_ssml(text, &self.voice);
        debug!("Sending TTS request: voice={}, ssml_bytes={}", self.voice.name, ssml.len());

        let request = StageRequest::post(&self.endpoint)
            .content_type("application/ssml+xml")
            .header(SUBSCRIPTION_KEY_HEADER, &self.subscription_key)
            .header(OUTPUT_FORMAT_HEADER, &self.output_format)
            .body(ssml);

        let audio = self.invoker.invoke(request).await?;
        if audio.is_empty() {
            return Err(PipelineError::upstream_contract(
                Stage::TextToSpeech,
                500,
                format!("{}: the service returned no audio", Stage::TextToSpeech),
            ));
        }
        debug!("TTS synthesis successful: {} bytes", audio.len());
        Ok(audio)
    }
}
