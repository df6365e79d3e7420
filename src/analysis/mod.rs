//! Layout analysis of raw OCR text.

mod hints;

pub use hints::{extract_hints, StructuredHints, WordData};
