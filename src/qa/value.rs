//! Literal value extraction from a matched line.

use std::sync::OnceLock;

use regex::Regex;

/// Key-value separators, tried in order. Three consecutive spaces covers
/// column-aligned OCR output.
const SEPARATORS: &[&str] = &[":", "-", "|", "   ", "\t"];

fn value_number_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"[$£€]?\d{1,3}(?:,\d{3})*(?:\.\d+)?%?").expect("valid regex")
    })
}

/// Isolate the literal answer substring from a matched line.
///
/// Strategies in order, first success wins: separator split (most reliable
/// for key-value lines), last-number extraction (totals and current-period
/// values tend to trail in a row), then the whole line so the caller keeps
/// context rather than nothing.
pub fn extract_value(line: &str, question: &str) -> String {
    let question_lower = question.to_lowercase();

    for sep in SEPARATORS {
        if line.contains(sep) {
            if let Some(candidate) = line.split(sep).last().map(str::trim) {
                // Reject candidates that merely echo the question's label.
                if !candidate.is_empty() && !question_lower.contains(&candidate.to_lowercase()) {
                    return candidate.to_string();
                }
            }
        }
    }

    if let Some(m) = value_number_re().find_iter(line).last() {
        return m.as_str().to_string();
    }

    line.to_string()
}
