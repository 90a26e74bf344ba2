use reqwest::Client;
use std::sync::Arc;
use tracing::info;

use super::client::{JsonQuestionAnswering, ShortAnswersQuestionAnswering};
use super::interface::QuestionAnswering;
use crate::config::{QaConfig, QaProvider};

/// Factory for question-answering clients
pub struct QaFactory;

impl QaFactory {
    /// Create the client for the configured provider
    ///
    /// # Arguments
    /// * `config` - Question-answering section of the configuration
    /// * `client` - Shared HTTP connection pool
    pub fn create(config: &QaConfig, client: Client) -> Arc<dyn QuestionAnswering> {
        info!(
            "Initializing question answering: provider={:?}, endpoint={}",
            config.provider,
            config.endpoint_url()
        );

        match config.provider {
            QaProvider::Json => Arc::new(JsonQuestionAnswering::new(client, config)),
            QaProvider::ShortAnswers => {
                Arc::new(ShortAnswersQuestionAnswering::new(client, config))
            }
        }
    }
}
