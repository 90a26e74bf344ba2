//! Inbound payload decoding. Nothing here touches the network.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::error::Category;

use crate::error::PipelineError;
use crate::utils::audio::{decode_audio, has_wav_signature};

/// Body of `POST /query` and `POST /stt`
#[derive(Debug, Deserialize)]
pub struct SpeechRequest {
    pub speech: String,
}

/// Body of `POST /alpha` and `POST /tts`
#[derive(Debug, Deserialize)]
pub struct TextRequest {
    pub text: String,
}

fn decode_json<T: DeserializeOwned>(body: &[u8], field: &str) -> Result<T, PipelineError> {
    serde_json::from_slice(body).map_err(|e| match e.classify() {
        Category::Syntax | Category::Eof | Category::Io => {
            PipelineError::validation(format!("Request body is not valid JSON: {}", e))
        }
        Category::Data => PipelineError::validation(format!(
            "Object contains no string field '{}': {}",
            field, e
        )),
    })
}

/// Decode `{"speech": "<base64 WAV>"}` into raw WAV bytes
pub fn decode_speech_request(body: &[u8]) -> Result<Vec<u8>, PipelineError> {
    let request: SpeechRequest = decode_json(body, "speech")?;

    if !has_wav_signature(&request.speech) {
        return Err(PipelineError::invalid_audio("Not a valid wav audio encoding!"));
    }

    decode_audio(&request.speech)
        .map_err(|e| PipelineError::decode(format!("Could not decode base64 speech: {}", e)))
}

/// Decode `{"text": "..."}`
pub fn decode_text_request(body: &[u8]) -> Result<String, PipelineError> {
    let request: TextRequest = decode_json(body, "text")?;
    Ok(request.text)
}
