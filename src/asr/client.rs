use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::debug;

use super::interface::{RecognitionResult, SpeechToText};
use crate::config::SttConfig;
use crate::error::{PipelineError, Stage};
use crate::stage::{classify_recognition, StageInvoker, StageRequest};

pub const STT_CONTENT_TYPE: &str = "audio/wav;codecs=audio/pcm;samplerate=16000";
pub const SUBSCRIPTION_KEY_HEADER: &str = "Ocp-Apim-Subscription-Key";

/// Speech-to-text over the Azure speech REST API
pub struct AzureSpeechToText {
    invoker: StageInvoker,
    endpoint: String,
    subscription_key: String,
}

impl AzureSpeechToText {
    pub fn new(client: Client, config: &SttConfig) -> Self {
        Self {
            invoker: StageInvoker::new(client, Stage::SpeechToText, config.timeout()),
            endpoint: config.endpoint_url(),
            subscription_key: config.subscription_key.clone(),
        }
    }
}

/// Unpack a 200 body: the domain status first, then the display text.
/// A body that does not carry both fields breaks the provider contract.
pub fn parse_recognition(body: &[u8]) -> Result<String, PipelineError> {
    let result: RecognitionResult = serde_json::from_slice(body).map_err(|e| {
        PipelineError::upstream_contract(
            Stage::SpeechToText,
            400,
            format!("{}: response is not a recognition result: {}", Stage::SpeechToText, e),
        )
    })?;

    let status = result.recognition_status.ok_or_else(|| {
        PipelineError::upstream_contract(
            Stage::SpeechToText,
            400,
            "Object contains no field 'RecognitionStatus'",
        )
    })?;

    if let Some(err) = classify_recognition(&status) {
        return Err(err);
    }

    match result.display_text {
        Some(Value::String(text)) => Ok(text),
        Some(_) => Err(PipelineError::upstream_contract(
            Stage::SpeechToText,
            400,
            "Field 'DisplayText' is not a string",
        )),
        None => Err(PipelineError::upstream_contract(
            Stage::SpeechToText,
            400,
            "Object contains no field 'DisplayText'",
        )),
    }
}

#[async_trait]
impl SpeechToText for AzureSpeechToText {
    async fn recognize(&self, audio: &[u8]) -> Result<String, PipelineError> {
        let request = StageRequest::post(&self.endpoint)
            .content_type(STT_CONTENT_TYPE)
            .header(SUBSCRIPTION_KEY_HEADER, &self.subscription_key)
            .body(audio.to_vec());

        let body = self.invoker.invoke(request).await?;
        let text = parse_recognition(&body)?;
        debug!("Recognized question: {}", text);
        Ok(text)
    }
}
