use base64::{engine::general_purpose::STANDARD, Engine as _};

/// Base64 of the `RIFF` magic that opens every WAV container
pub const WAV_BASE64_PREFIX: &str = "UklGR";

/// Check that a base64 string starts with the WAV container signature
pub fn has_wav_signature(encoded: &str) -> bool {
    encoded.starts_with(WAV_BASE64_PREFIX)
}

/// Encode audio bytes for transport in a JSON payload
pub fn encode_audio(audio: &[u8]) -> String {
    STANDARD.encode(audio)
}

/// Decode transported audio. Line breaks from wrapped encoders are skipped.
pub fn decode_audio(encoded: &str) -> Result<Vec<u8>, base64::DecodeError> {
    if encoded.contains(|c: char| matches!(c, '\r' | '\n')) {
        let unwrapped: String = encoded
            .chars()
            .filter(|c| !matches!(c, '\r' | '\n'))
            .collect();
        return STANDARD.decode(unwrapped);
    }
    STANDARD.decode(encoded)
}
