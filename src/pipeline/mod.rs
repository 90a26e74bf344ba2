pub mod orchestrator;
pub mod response;

pub use orchestrator::{PipelineOrchestrator, PipelineState};
pub use response::QueryResponse;
