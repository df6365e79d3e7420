//! Text extraction from images using the system Tesseract binary.
//!
//! This is I/O plumbing for the CLI; the answer engines consume only the
//! extracted text and never call into this module.

use std::path::Path;
use std::process::Command;

use thiserror::Error;
use tracing::debug;

use crate::analysis::WordData;

/// Errors that can occur during text extraction.
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("Unsupported file type: {0}")]
    UnsupportedFileType(String),

    #[error("External tool not found: {0}")]
    ToolNotFound(String),

    #[error("Extraction failed: {0}")]
    ExtractionFailed(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result of text extraction.
#[derive(Debug)]
pub struct ExtractionResult {
    /// Extracted text content.
    pub text: String,
    /// Per-word recognition data, when TSV output was requested.
    pub words: Option<WordData>,
}

/// Handle command output, extracting stdout on success or returning appropriate error.
fn handle_cmd_output(
    result: std::io::Result<std::process::Output>,
    tool_name: &str,
    error_prefix: &str,
) -> Result<String, ExtractionError> {
    match result {
        Ok(output) => {
            if output.status.success() {
                Ok(String::from_utf8_lossy(&output.stdout).to_string())
            } else {
                let stderr = String::from_utf8_lossy(&output.stderr);
                Err(ExtractionError::ExtractionFailed(format!(
                    "{}: {}",
                    error_prefix, stderr
                )))
            }
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(ExtractionError::ToolNotFound(tool_name.to_string()))
        }
        Err(e) => Err(ExtractionError::Io(e)),
    }
}

/// Text extractor that shells out to Tesseract.
pub struct TextExtractor {
    /// Tesseract language setting.
    tesseract_lang: String,
}

impl Default for TextExtractor {
    fn default() -> Self {
        Self {
            tesseract_lang: "eng".to_string(),
        }
    }
}

impl TextExtractor {
    /// Create a new text extractor.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set Tesseract language.
    pub fn with_language(mut self, lang: &str) -> Self {
        self.tesseract_lang = lang.to_string();
        self
    }

    /// Whether the path looks like a supported image.
    pub fn is_supported_image(path: &Path) -> bool {
        matches!(
            path.extension().and_then(|e| e.to_str()).map(str::to_lowercase).as_deref(),
            Some("png") | Some("jpg") | Some("jpeg") | Some("tiff") | Some("bmp")
        )
    }

    /// Extract text and per-word data from an image file.
    pub fn extract_image(&self, file_path: &Path) -> Result<ExtractionResult, ExtractionError> {
        if !Self::is_supported_image(file_path) {
            return Err(ExtractionError::UnsupportedFileType(
                file_path.to_string_lossy().to_string(),
            ));
        }

        let text = self.run_tesseract(file_path)?;

        // Word-level data is best-effort; plain text already succeeded.
        let words = match self.run_tesseract_tsv(file_path) {
            Ok(tsv) => Some(parse_word_tsv(&tsv)),
            Err(e) => {
                debug!("tesseract TSV output unavailable: {}", e);
                None
            }
        };

        Ok(ExtractionResult { text, words })
    }

    /// Run Tesseract OCR on an image.
    fn run_tesseract(&self, image_path: &Path) -> Result<String, ExtractionError> {
        let output = Command::new("tesseract")
            .arg(image_path)
            .arg("stdout")
            .args(["-l", &self.tesseract_lang, "--psm", "6"])
            .output();

        handle_cmd_output(output, "tesseract (install tesseract-ocr)", "tesseract failed")
    }

    /// Run Tesseract in TSV mode for per-word boxes and confidences.
    fn run_tesseract_tsv(&self, image_path: &Path) -> Result<String, ExtractionError> {
        let output = Command::new("tesseract")
            .arg(image_path)
            .arg("stdout")
            .args(["-l", &self.tesseract_lang, "--psm", "6", "tsv"])
            .output();

        handle_cmd_output(output, "tesseract (install tesseract-ocr)", "tesseract tsv failed")
    }

    /// Check if required tools are available.
    pub fn check_tools() -> Vec<(String, bool)> {
        ["tesseract"]
            .iter()
            .map(|tool| (tool.to_string(), which::which(tool).is_ok()))
            .collect()
    }
}

/// Parse Tesseract TSV output into word-level data.
///
/// Word rows carry a non-negative confidence in column 11 and the word text
/// in column 12; structural rows (pages, blocks, lines) have confidence -1.
fn parse_word_tsv(tsv: &str) -> WordData {
    let mut data = WordData::default();

    for line in tsv.lines().skip(1) {
        let fields: Vec<&str> = line.split('\t').collect();
        if fields.len() < 12 {
            continue;
        }
        let conf: f32 = match fields[10].parse() {
            Ok(c) => c,
            Err(_) => continue,
        };
        if conf < 0.0 {
            continue;
        }
        let word = fields[11].trim();
        if word.is_empty() {
            continue;
        }
        data.words.push(word.to_string());
        data.confidences.push(conf);
    }

    data
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_supported_image_extensions() {
        assert!(TextExtractor::is_supported_image(Path::new("scan.PNG")));
        assert!(TextExtractor::is_supported_image(Path::new("a/b/report.jpeg")));
        assert!(!TextExtractor::is_supported_image(Path::new("notes.txt")));
        assert!(!TextExtractor::is_supported_image(Path::new("archive")));
    }

    #[test]
    fn test_parse_word_tsv() {
        let tsv = "level\tpage_num\tblock_num\tpar_num\tline_num\tword_num\tleft\ttop\twidth\theight\tconf\ttext\n\
                   1\t1\t0\t0\t0\t0\t0\t0\t640\t480\t-1\t\n\
                   5\t1\t1\t1\t1\t1\t10\t10\t80\t20\t96.5\tRevenue\n\
                   5\t1\t1\t1\t1\t2\t100\t10\t60\t20\t91\t500\n\
                   5\t1\t1\t1\t1\t3\t170\t10\t10\t20\t95\t \n";
        let data = parse_word_tsv(tsv);
        assert_eq!(data.words, vec!["Revenue", "500"]);
        assert_eq!(data.confidences, vec![96.5, 91.0]);
        assert_eq!(data.word_count(), 2);
    }

    #[test]
    fn test_check_tools() {
        let tools = TextExtractor::check_tools();
        assert_eq!(tools.len(), 1);
        assert_eq!(tools[0].0, "tesseract");
    }
}
