pub mod classifier;
pub mod invoker;

pub use classifier::{classify_recognition, classify_status, RECOGNITION_SUCCESS};
pub use invoker::{StageInvoker, StageRequest};
