//! Stub downstream services bound to an ephemeral local port.

#![allow(dead_code)]

use axum::{
    body::{Body, Bytes},
    extract::{Query, State},
    http::{HeaderMap, Request, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tower::ServiceExt; // for oneshot

use voice_gateway::config::QaProvider;
use voice_gateway::{app, AppState, Config};

/// Bytes of a tiny but well-formed WAV container
pub fn wav_bytes(tag: &[u8]) -> Vec<u8> {
    let mut wav = Vec::new();
    wav.extend_from_slice(b"RIFF");
    wav.extend_from_slice(&((36 + tag.len()) as u32).to_le_bytes());
    wav.extend_from_slice(b"WAVE");
    wav.extend_from_slice(b"fmt ");
    wav.extend_from_slice(&16u32.to_le_bytes());
    wav.extend_from_slice(&1u16.to_le_bytes()); // PCM
    wav.extend_from_slice(&1u16.to_le_bytes()); // mono
    wav.extend_from_slice(&16000u32.to_le_bytes());
    wav.extend_from_slice(&32000u32.to_le_bytes());
    wav.extend_from_slice(&2u16.to_le_bytes());
    wav.extend_from_slice(&16u16.to_le_bytes());
    wav.extend_from_slice(b"data");
    wav.extend_from_slice(&(tag.len() as u32).to_le_bytes());
    wav.extend_from_slice(tag);
    wav
}

#[derive(Clone)]
pub struct Reply {
    pub status: u16,
    pub body: Vec<u8>,
    pub delay: Option<Duration>,
}

impl Reply {
    pub fn ok(body: impl Into<Vec<u8>>) -> Self {
        Self {
            status: 200,
            body: body.into(),
            delay: None,
        }
    }

    pub fn status(status: u16) -> Self {
        Self {
            status,
            body: b"downstream error".to_vec(),
            delay: None,
        }
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    async fn respond(self) -> Response {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        let status = StatusCode::from_u16(self.status).unwrap();
        (status, self.body).into_response()
    }
}

#[derive(Debug, Clone)]
pub struct Recorded {
    pub headers: HeaderMap,
    pub query: HashMap<String, String>,
    pub body: Vec<u8>,
}

pub struct StubStage {
    reply: Mutex<Reply>,
    calls: AtomicUsize,
    last: Mutex<Option<Recorded>>,
}

impl StubStage {
    fn new(reply: Reply) -> Self {
        Self {
            reply: Mutex::new(reply),
            calls: AtomicUsize::new(0),
            last: Mutex::new(None),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last(&self) -> Recorded {
        self.last.lock().unwrap().clone().expect("stage was never called")
    }

    pub fn set_reply(&self, reply: Reply) {
        *self.reply.lock().unwrap() = reply;
    }

    async fn handle(&self, headers: HeaderMap, query: HashMap<String, String>, body: Bytes) -> Response {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last.lock().unwrap() = Some(Recorded {
            headers,
            query,
            body: body.to_vec(),
        });
        let reply = self.reply.lock().unwrap().clone();
        reply.respond().await
    }
}

pub struct Downstream {
    pub base_url: String,
    pub stt: StubStage,
    pub qa: StubStage,
    pub tts: StubStage,
}

async fn stt_handler(
    State(stub): State<Arc<Downstream>>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    stub.stt.handle(headers, query, body).await
}

async fn qa_handler(
    State(stub): State<Arc<Downstream>>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    stub.qa.handle(headers, query, body).await
}

async fn tts_handler(
    State(stub): State<Arc<Downstream>>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    stub.tts.handle(headers, query, body).await
}

pub const QUESTION: &str = "What is two plus two?";
pub const ANSWER: &str = "4";

pub fn recognition_body(status: &str, text: Option<&str>) -> Vec<u8> {
    let mut body = serde_json::json!({ "RecognitionStatus": status, "Offset": 0, "Duration": 12300000 });
    if let Some(text) = text {
        body["DisplayText"] = serde_json::Value::String(text.to_string());
    }
    body.to_string().into_bytes()
}

impl Downstream {
    /// Every stage answers successfully
    pub async fn happy() -> Arc<Self> {
        Self::start(
            Reply::ok(recognition_body("Success", Some(QUESTION))),
            Reply::ok(serde_json::json!({ "text": ANSWER }).to_string()),
            Reply::ok(wav_bytes(b"answer")),
        )
        .await
    }

    pub async fn start(stt: Reply, qa: Reply, tts: Reply) -> Arc<Self> {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let stub = Arc::new(Self {
            base_url: format!("http://{}", addr),
            stt: StubStage::new(stt),
            qa: StubStage::new(qa),
            tts: StubStage::new(tts),
        });

        let router = Router::new()
            .route("/stt", post(stt_handler))
            .route("/qa", post(qa_handler))
            .route("/v1/result", get(qa_handler))
            .route("/tts", post(tts_handler))
            .with_state(stub.clone());

        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        stub
    }

    /// Gateway configuration pointing every stage at this stub
    pub fn config(&self) -> Config {
        let mut config = Config::default();
        config.stt_config.endpoint = Some(format!("{}/stt", self.base_url));
        config.stt_config.subscription_key = "stt-key".to_string();
        config.qa_config.endpoint = Some(format!("{}/qa", self.base_url));
        config.tts_config.endpoint = Some(format!("{}/tts", self.base_url));
        config.tts_config.subscription_key = "tts-key".to_string();
        config
    }

    pub fn short_answers_config(&self) -> Config {
        let mut config = self.config();
        config.qa_config.provider = QaProvider::ShortAnswers;
        config.qa_config.endpoint = Some(format!("{}/v1/result", self.base_url));
        config.qa_config.app_id = "app-123".to_string();
        config
    }

    pub fn total_calls(&self) -> usize {
        self.stt.calls() + self.qa.calls() + self.tts.calls()
    }
}

pub fn gateway(config: Config) -> Router {
    app(AppState::new(config).unwrap())
}

/// Send one POST through the gateway router and return status, content type
/// and body
pub async fn post_json(app: &Router, uri: &str, body: impl Into<Body>) -> (StatusCode, String, Bytes) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(body.into())
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let content_type = response
        .headers()
        .get("content-type")
        .map(|v| v.to_str().unwrap().to_string())
        .unwrap_or_default();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, content_type, body)
}
