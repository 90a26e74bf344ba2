//! Maps downstream failure signals onto [`PipelineError`].
//!
//! Two independent tables: the HTTP status returned by any stage, and the
//! `RecognitionStatus` field the speech-to-text provider embeds in a 200 body.

use crate::error::{PipelineError, Stage};

/// Domain status the speech-to-text provider reports for a usable result
pub const RECOGNITION_SUCCESS: &str = "Success";

fn status_description(status: u16) -> Option<&'static str> {
    let description = match status {
        400 => {
            "Bad request - a required parameter is missing, empty or invalid, \
             or the submitted input (for example the audio) is malformed."
        }
        401 => {
            "Unauthorized - the subscription key or authorization token is invalid \
             in the specified region, or the endpoint is invalid."
        }
        403 => {
            "Forbidden - the subscription key or app id is missing, \
             or the quota for this subscription has been used up."
        }
        429 => {
            "Too many requests - the rate limit or quota of requests allowed \
             for this subscription has been exceeded."
        }
        501 => {
            "Not implemented - no result could be produced for this input. \
             It may be misspelled, poorly formatted or unintelligible, \
             or no sufficiently short result exists."
        }
        502 => {
            "Bad gateway - there is a network or server-side problem upstream. \
             This may also indicate invalid headers."
        }
        _ => return None,
    };
    Some(description)
}

/// Classify a non-OK HTTP status returned by `stage`. The status is passed
/// through unchanged.
pub fn classify_status(stage: Stage, status: u16) -> PipelineError {
    let message = match status_description(status) {
        Some(description) => format!("{}: {}", stage, description),
        None => format!(
            "{}: the service rejected the request (status {})",
            stage, status
        ),
    };
    PipelineError::provider_rejected(stage, status, message)
}

fn recognition_description(recognition_status: &str) -> &'static str {
    match recognition_status {
        "NoMatch" => {
            "Speech was detected in the audio stream, but no words from the target \
             language were matched. The recognition language is probably different \
             from the language being spoken."
        }
        "InitialSilenceTimeout" => {
            "The start of the audio stream contained only silence, \
             and the service timed out while waiting for speech."
        }
        "BabbleTimeout" => {
            "The start of the audio stream contained only noise, \
             and the service timed out while waiting for speech."
        }
        "Error" => {
            "The recognition service encountered an internal error and could not continue."
        }
        _ => "The recognition service could not determine the text.",
    }
}

/// Classify the speech-to-text domain status. `None` means the result is usable.
pub fn classify_recognition(recognition_status: &str) -> Option<PipelineError> {
    if recognition_status == RECOGNITION_SUCCESS {
        return None;
    }
    Some(PipelineError::recognition_failure(format!(
        "{}: {} (RecognitionStatus: {})",
        Stage::SpeechToText,
        recognition_description(recognition_status),
        recognition_status
    )))
}
