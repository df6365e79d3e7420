//! OCR collaborator: text extraction from report images.

mod extractor;

pub use extractor::{ExtractionError, ExtractionResult, TextExtractor};
