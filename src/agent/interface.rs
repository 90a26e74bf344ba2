//! Question answering interface

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::PipelineError;

/// Body sent to a JSON answering service, and the shape it may answer with
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnswerPayload {
    pub text: String,
}

#[async_trait]
pub trait QuestionAnswering: Send + Sync {
    /// Produce a short textual answer for a recognized question
    async fn answer(&self, question: &str) -> Result<String, PipelineError>;
}
