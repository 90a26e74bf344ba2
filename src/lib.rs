pub mod agent;
pub mod asr;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod routes;
pub mod stage;
pub mod state;
pub mod tts;
pub mod utils;
pub mod validation;

pub use config::Config;
pub use error::{ErrorKind, PipelineError, Stage};
pub use pipeline::{PipelineOrchestrator, QueryResponse};
pub use routes::app;
pub use state::AppState;
