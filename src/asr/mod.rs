pub mod client;
pub mod interface;

pub use client::AzureSpeechToText;
pub use interface::{RecognitionResult, SpeechToText};
