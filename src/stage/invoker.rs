use reqwest::{header::CONTENT_TYPE, Client, Method, Response, StatusCode};
use std::time::Duration;
use tracing::debug;

use super::classifier::classify_status;
use crate::error::{PipelineError, Stage};

/// One outbound call to a downstream stage
#[derive(Debug, Clone)]
pub struct StageRequest {
    pub method: Method,
    pub url: String,
    pub query: Vec<(String, String)>,
    pub content_type: Option<String>,
    pub headers: Vec<(&'static str, String)>,
    pub body: Option<Vec<u8>>,
}

impl StageRequest {
    pub fn post(url: impl Into<String>) -> Self {
        Self::new(Method::POST, url)
    }

    pub fn get(url: impl Into<String>) -> Self {
        Self::new(Method::GET, url)
    }

    fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            query: Vec::new(),
            content_type: None,
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    pub fn header(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.headers.push((name, value.into()));
        self
    }

    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    pub fn body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = Some(body.into());
        self
    }
}

/// Upper bound on how much of a non-OK body is read before it is discarded
pub const MAX_ERROR_BODY_BYTES: usize = 64 * 1024;

/// Performs a single call for one stage over a shared connection pool.
///
/// The response body is consumed before returning so the connection can be
/// reused. A non-OK body is read up to [`MAX_ERROR_BODY_BYTES`]; past that the
/// connection is dropped instead.
#[derive(Debug, Clone)]
pub struct StageInvoker {
    client: Client,
    stage: Stage,
    timeout: Duration,
}

impl StageInvoker {
    pub fn new(client: Client, stage: Stage, timeout: Duration) -> Self {
        Self {
            client,
            stage,
            timeout,
        }
    }

    /// Perform the call and return the raw body of a 200 response
    pub async fn invoke(&self, request: StageRequest) -> Result<Vec<u8>, PipelineError> {
        let url = reqwest::Url::parse(&request.url).map_err(|e| {
            PipelineError::transport(
                self.stage,
                500,
                format!("{}: invalid endpoint '{}': {}", self.stage, request.url, e),
            )
        })?;

        let mut builder = self
            .client
            .request(request.method, url)
            .timeout(self.timeout);
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(content_type) = request.content_type {
            builder = builder.header(CONTENT_TYPE, content_type);
        }
        for (name, value) in request.headers {
            builder = builder.header(name, value);
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        debug!(stage = %self.stage, url = %request.url, "Calling downstream stage");

        let response = builder
            .send()
            .await
            .map_err(|e| self.transport_error(&e))?;
        let status = response.status();

        if status != StatusCode::OK {
            self.drain(response).await;
            return Err(classify_status(self.stage, status.as_u16()));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| self.transport_error(&e))?;
        debug!(stage = %self.stage, bytes = body.len(), "Downstream stage responded");
        Ok(body.to_vec())
    }

    async fn drain(&self, mut response: Response) {
        let mut drained = 0usize;
        loop {
            match response.chunk().await {
                Ok(Some(chunk)) => {
                    drained += chunk.len();
                    if drained > MAX_ERROR_BODY_BYTES {
                        debug!(stage = %self.stage, "Error body too large, dropping connection");
                        return;
                    }
                }
                Ok(None) => return,
                Err(e) => {
                    debug!(stage = %self.stage, "Failed to drain error body: {}", e);
                    return;
                }
            }
        }
    }

    fn transport_error(&self, e: &reqwest::Error) -> PipelineError {
        let (status, reason) = if e.is_timeout() {
            (
                504,
                format!("timed out after {}ms", self.timeout.as_millis()),
            )
        } else if e.is_connect() {
            (502, format!("could not connect: {}", e))
        } else if e.is_builder() {
            (500, format!("could not build the request: {}", e))
        } else {
            (502, format!("request failed: {}", e))
        };
        PipelineError::transport(self.stage, status, format!("{}: {}", self.stage, reason))
    }
}
