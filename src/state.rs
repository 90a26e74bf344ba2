use std::sync::Arc;

use crate::agent::QaFactory;
use crate::asr::AzureSpeechToText;
use crate::config::Config;
use crate::pipeline::PipelineOrchestrator;
use crate::tts::AzureTextToSpeech;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub pipeline: Arc<PipelineOrchestrator>,
}

impl AppState {
    /// Build the stage clients from configuration over one shared
    /// connection pool
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;

        let stt = Arc::new(AzureSpeechToText::new(client.clone(), &config.stt_config));
        let qa = QaFactory::create(&config.qa_config, client.clone());
        let tts = Arc::new(AzureTextToSpeech::new(client, &config.tts_config));

        Ok(Self::with_pipeline(
            config,
            PipelineOrchestrator::new(stt, qa, tts),
        ))
    }

    pub fn with_pipeline(config: Config, pipeline: PipelineOrchestrator) -> Self {
        Self {
            config: Arc::new(config),
            pipeline: Arc::new(pipeline),
        }
    }
}
