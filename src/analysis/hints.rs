//! Structured hint extraction from raw OCR text.
//!
//! Cheap layout heuristics only: line splitting, numeric and label token
//! scans, and a table-likelihood flag. False positives are acceptable;
//! downstream consumers treat these as hints, not guarantees.

use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;

/// Maximum numeric tokens retained in the hints.
const MAX_NUMBERS: usize = 20;
/// Maximum label tokens retained in the hints.
const MAX_LABELS: usize = 20;

fn number_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\b\d[\d,]*(?:\.\d+)?\b").expect("valid regex"))
}

fn label_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\b[A-Z][a-zA-Z]+(?: [A-Z][a-zA-Z]+)*\b").expect("valid regex"))
}

/// Per-word recognition data from the OCR collaborator.
///
/// Parallel arrays: `confidences[i]` belongs to `words[i]`. Only the word
/// list is consulted here (for the word count); confidences are carried for
/// callers that want them.
#[derive(Debug, Clone, Default)]
pub struct WordData {
    pub words: Vec<String>,
    pub confidences: Vec<f32>,
}

impl WordData {
    /// Count of non-blank recognized words.
    pub fn word_count(&self) -> usize {
        self.words.iter().filter(|w| !w.trim().is_empty()).count()
    }
}

/// Derived summary of an OCR document's layout signals.
///
/// Immutable once produced; derived exactly once per OCR result.
#[derive(Debug, Clone, Default, Serialize)]
pub struct StructuredHints {
    /// Number of non-blank words.
    pub word_count: usize,
    /// Trimmed, non-blank lines in original order.
    pub lines: Vec<String>,
    /// Whether the text looks like it contains a table.
    pub possible_table: bool,
    /// Numeric tokens in scan order, duplicates retained, capped.
    pub numbers: Vec<String>,
    /// Label tokens (capitalized word runs), deduplicated, capped.
    pub labels: Vec<String>,
}

/// Extract structured hints from raw OCR text.
///
/// Pure function of its input. Word-level data, when available, is used only
/// for the word count; otherwise whitespace tokens of the raw text are
/// counted. Empty or whitespace-only input yields the all-empty record.
pub fn extract_hints(raw_text: &str, words: Option<&WordData>) -> StructuredHints {
    let word_count = match words {
        Some(data) => data.word_count(),
        None => raw_text.split_whitespace().count(),
    };

    let lines: Vec<String> = raw_text
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect();

    // Explicit delimiters are the strongest table signal; failing that,
    // several lines with 3+ columns of whitespace-separated tokens.
    let possible_table = lines.iter().any(|l| l.contains('|') || l.contains('\t'))
        || lines
            .iter()
            .filter(|l| l.split_whitespace().count() >= 3)
            .count()
            >= 3;

    let numbers: Vec<String> = number_re()
        .find_iter(raw_text)
        .take(MAX_NUMBERS)
        .map(|m| m.as_str().to_string())
        .collect();

    let mut labels: Vec<String> = Vec::new();
    for m in label_re().find_iter(raw_text) {
        let label = m.as_str();
        if !labels.iter().any(|l| l == label) {
            labels.push(label.to_string());
            if labels.len() >= MAX_LABELS {
                break;
            }
        }
    }

    StructuredHints {
        word_count,
        lines,
        possible_table,
        numbers,
        labels,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input() {
        let hints = extract_hints("", None);
        assert_eq!(hints.word_count, 0);
        assert!(hints.lines.is_empty());
        assert!(!hints.possible_table);
        assert!(hints.numbers.is_empty());
        assert!(hints.labels.is_empty());

        let hints = extract_hints("   \n\n  \t \n", None);
        assert!(hints.lines.is_empty());
    }

    #[test]
    fn test_lines_trimmed_and_ordered() {
        let hints = extract_hints("  first line  \n\n second \nthird", None);
        assert_eq!(hints.lines, vec!["first line", "second", "third"]);
    }

    #[test]
    fn test_word_count_from_text() {
        let hints = extract_hints("Revenue grew 12 percent\nin Q3", None);
        assert_eq!(hints.word_count, 6);
    }

    #[test]
    fn test_word_count_prefers_word_data() {
        let data = WordData {
            words: vec!["Revenue".into(), "".into(), "  ".into(), "500".into()],
            confidences: vec![96.0, -1.0, -1.0, 91.5],
        };
        let hints = extract_hints("Revenue 500", Some(&data));
        assert_eq!(hints.word_count, 2);
    }

    #[test]
    fn test_table_flag_from_delimiters() {
        assert!(extract_hints("a | b", None).possible_table);
        assert!(extract_hints("a\tb", None).possible_table);
        assert!(!extract_hints("a b", None).possible_table);
    }

    #[test]
    fn test_table_flag_from_aligned_columns() {
        // Three lines with three or more tokens each, no delimiters.
        let text = "Q1 Revenue 100\nQ2 Revenue 200\nQ3 Revenue 300";
        assert!(extract_hints(text, None).possible_table);

        let text = "Q1 Revenue 100\nQ2 Revenue 200\nshort line";
        assert!(!extract_hints(text, None).possible_table);
    }

    #[test]
    fn test_numbers_in_order_with_duplicates() {
        let hints = extract_hints("100 then 2,500.75 then 100 again", None);
        assert_eq!(hints.numbers, vec!["100", "2,500.75", "100"]);
    }

    #[test]
    fn test_numbers_capped() {
        let text = (0..30).map(|i| i.to_string()).collect::<Vec<_>>().join(" ");
        let hints = extract_hints(&text, None);
        assert_eq!(hints.numbers.len(), 20);
        assert_eq!(hints.numbers[0], "0");
    }

    #[test]
    fn test_labels_deduplicated_and_capped() {
        let hints = extract_hints("Total Revenue was up. Total Revenue again. Expenses too.", None);
        assert_eq!(hints.labels, vec!["Total Revenue", "Expenses"]);

        let text = (0..26u8)
            .map(|i| format!("Word{}x lower", (b'A' + i) as char))
            .collect::<Vec<_>>()
            .join(" ");
        let hints = extract_hints(&text, None);
        assert_eq!(hints.labels.len(), 20);
    }
}
