//! Remote completion client for grounded question answering.
//!
//! Sends the OCR context and question to a generative-text API, retries on
//! rate limiting with exponential backoff, and degrades to a clearly-labeled
//! mock answer when no API key is configured.

mod client;
mod config;
mod prompts;

pub use client::{
    CompletionClient, CompletionError, GeminiBackend, GenerativeBackend, GENERIC_FAILURE_MESSAGE,
    INSUFFICIENT_TEXT_MESSAGE, SERVICE_BUSY_MESSAGE,
};
pub use config::CompletionConfig;
pub use prompts::build_prompt;
