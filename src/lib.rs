//! ReportQA - grounded question answering over OCR-extracted report text.
//!
//! Two interchangeable answer strategies share one contract: a deterministic
//! rule-based engine that refuses to answer rather than guess, and a remote
//! completion client with exponential backoff and a mock fallback when no
//! API key is configured.

pub mod analysis;
pub mod cli;
pub mod config;
pub mod llm;
pub mod ocr;
pub mod qa;

pub use analysis::{extract_hints, StructuredHints, WordData};
pub use config::{AnswerMode, Settings};
pub use llm::{CompletionClient, CompletionConfig};
pub use qa::{AnswerProvider, RuleBasedEngine};
