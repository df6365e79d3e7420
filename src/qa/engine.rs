//! Rule-based answer engine: the free, offline answer path.

use async_trait::async_trait;
use tracing::debug;

use super::matcher::find_matching_line;
use super::value::extract_value;
use super::{AnswerProvider, NO_ANSWER_MESSAGE};

/// Deterministic question answering over extracted text.
///
/// Pure composition of line matching and value extraction: no I/O, no
/// external error modes. Refuses to answer rather than guess.
#[derive(Debug, Clone, Copy, Default)]
pub struct RuleBasedEngine;

impl RuleBasedEngine {
    pub fn new() -> Self {
        Self
    }

    /// Answer a question based only on the extracted text.
    pub fn answer_text(&self, text: &str, question: &str) -> String {
        if text.trim().is_empty() {
            return NO_ANSWER_MESSAGE.to_string();
        }

        let lines: Vec<String> = text
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(str::to_string)
            .collect();

        match find_matching_line(&lines, question) {
            Some(m) => {
                debug!("best matching line (score {}): {}", m.score, m.line);
                extract_value(m.line, question)
            }
            None => NO_ANSWER_MESSAGE.to_string(),
        }
    }
}

#[async_trait]
impl AnswerProvider for RuleBasedEngine {
    async fn answer(&self, text: &str, question: &str) -> String {
        self.answer_text(text, question)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_text_refuses() {
        let engine = RuleBasedEngine::new();
        assert_eq!(engine.answer_text("", "What is Revenue?"), NO_ANSWER_MESSAGE);
        assert_eq!(engine.answer_text("  \n \t ", "What is Revenue?"), NO_ANSWER_MESSAGE);
    }

    #[test]
    fn test_no_match_refuses() {
        let engine = RuleBasedEngine::new();
        let text = "Q1 Revenue: 100\nQ2 Revenue: 200";
        assert_eq!(engine.answer_text(text, "What is Q3 Revenue?"), NO_ANSWER_MESSAGE);
    }

    #[test]
    fn test_extracts_value_from_matched_line() {
        let engine = RuleBasedEngine::new();
        let text = "Q1 Revenue: 100\nQ3 Revenue: 300";
        assert_eq!(engine.answer_text(text, "What is Q3 Revenue?"), "300");
    }

    #[tokio::test]
    async fn test_provider_contract() {
        let engine = RuleBasedEngine::new();
        let answer = engine.answer("Revenue: $500,000", "What is the Revenue?").await;
        assert_eq!(answer, "$500,000");
    }
}
