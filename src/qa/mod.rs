//! Question answering over extracted document text.
//!
//! Two interchangeable strategies implement [`AnswerProvider`]: the
//! deterministic [`RuleBasedEngine`] and the remote
//! [`crate::llm::CompletionClient`]. Callers pick one via configuration.

mod engine;
mod matcher;
mod value;

use async_trait::async_trait;

pub use engine::RuleBasedEngine;
pub use matcher::{classify_token, find_matching_line, LineMatch, TokenClass};
pub use value::extract_value;

/// Fixed refusal returned when no line satisfies the question's constraints.
pub const NO_ANSWER_MESSAGE: &str = "The image does not contain this information.";

/// An answer strategy: text in, answer out.
///
/// Implementations never surface raw errors; every failure mode maps to a
/// fixed user-facing string.
#[async_trait]
pub trait AnswerProvider: Send + Sync {
    /// Answer a question based only on the provided document text.
    async fn answer(&self, text: &str, question: &str) -> String;
}
