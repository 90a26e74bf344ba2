pub mod agent_factory;
pub mod client;
pub mod interface;

pub use agent_factory::QaFactory;
pub use client::{JsonQuestionAnswering, ShortAnswersQuestionAnswering};
pub use interface::{AnswerPayload, QuestionAnswering};
