use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use super::interface::{AnswerPayload, QuestionAnswering};
use crate::config::QaConfig;
use crate::error::{PipelineError, Stage};
use crate::stage::{StageInvoker, StageRequest};

/// Read the answer out of a 200 body.
///
/// The payload is provider-defined: a `{"text": ...}` object is unwrapped,
/// anything else is taken as plain UTF-8 text.
pub fn parse_answer(body: &[u8]) -> Result<String, PipelineError> {
    let text = std::str::from_utf8(body).map_err(|e| {
        PipelineError::upstream_contract(
            Stage::QuestionAnswering,
            500,
            format!("{}: answer is not valid UTF-8: {}", Stage::QuestionAnswering, e),
        )
    })?;

    let answer = match serde_json::from_str::<AnswerPayload>(text) {
        Ok(payload) => payload.text,
        Err(_) => text.to_string(),
    };

    let answer = answer.trim();
    if answer.is_empty() {
        return Err(PipelineError::upstream_contract(
            Stage::QuestionAnswering,
            500,
            format!("{}: the service returned an empty answer", Stage::QuestionAnswering),
        ));
    }
    Ok(answer.to_string())
}

/// POSTs `{"text": question}` to an answering service
pub struct JsonQuestionAnswering {
    invoker: StageInvoker,
    endpoint: String,
}

impl JsonQuestionAnswering {
    pub fn new(client: Client, config: &QaConfig) -> Self {
        Self {
            invoker: StageInvoker::new(client, Stage::QuestionAnswering, config.timeout()),
            endpoint: config.endpoint_url(),
        }
    }
}

#[async_trait]
impl QuestionAnswering for JsonQuestionAnswering {
    async fn answer(&self, question: &str) -> Result<String, PipelineError> {
        let payload = AnswerPayload {
            text: question.to_string(),
        };
        let body = serde_json::to_vec(&payload).map_err(|e| {
            PipelineError::transport(
                Stage::QuestionAnswering,
                500,
                format!("{}: could not encode the question: {}", Stage::QuestionAnswering, e),
            )
        })?;

        let request = StageRequest::post(&self.endpoint)
            .content_type("application/json")
            .body(body);

        let answer = parse_answer(&self.invoker.invoke(request).await?)?;
        debug!("Answer: {}", answer);
        Ok(answer)
    }
}

/// Queries a short-answers API with `appid` and `i` parameters
pub struct ShortAnswersQuestionAnswering {
    invoker: StageInvoker,
    endpoint: String,
    app_id: String,
}

impl ShortAnswersQuestionAnswering {
    pub fn new(client: Client, config: &QaConfig) -> Self {
        Self {
            invoker: StageInvoker::new(client, Stage::QuestionAnswering, config.timeout()),
            endpoint: config.endpoint_url(),
            app_id: config.app_id.clone(),
        }
    }
}

#[async_trait]
impl QuestionAnswering for ShortAnswersQuestionAnswering {
    async fn answer(&self, question: &str) -> Result<String, PipelineError> {
        let request = StageRequest::get(&self.endpoint)
            .query("appid", &self.app_id)
            .query("i", question);

        let answer = parse_answer(&self.invoker.invoke(request).await?)?;
        debug!("Short answer: {}", answer);
        Ok(answer)
    }
}
