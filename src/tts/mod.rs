pub mod client;
pub mod interface;
pub mod ssml;

pub use client::AzureTextToSpeech;
pub use interface::TextToSpeech;
pub use ssml::build_ssml;
