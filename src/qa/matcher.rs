//! Line matching under strict critical-token constraints.
//!
//! Token-overlap ranking alone picks the wrong row in tabular documents
//! where rows share most words except the discriminating entity (a quarter,
//! a year, a named category). Critical tokens are a hard filter, not a
//! scoring penalty: a line missing any of them is disqualified outright.

use tracing::debug;

/// Question tokens with no discriminating power.
const STOP_WORDS: &[&str] = &[
    "what", "is", "are", "the", "a", "an", "of", "in", "for", "how", "much", "many", "does", "do",
    "show", "tell", "me", "find", "get", "value", "amount", "total",
];

fn is_stop_word(token: &str) -> bool {
    let lower = token.to_lowercase();
    STOP_WORDS.contains(&lower.as_str())
}

/// Classification of a question token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenClass {
    /// Quarter code such as "Q3".
    Quarter,
    /// Four-digit year such as "2024".
    Year,
    /// Capitalized word, likely a named entity or column header.
    Label,
    /// Anything else.
    Ordinary,
}

impl TokenClass {
    /// Whether this class must appear verbatim in a candidate line.
    pub fn is_critical(self) -> bool {
        !matches!(self, TokenClass::Ordinary)
    }
}

/// Classify a single question token.
///
/// Heuristic proxy for "named entity that disambiguates otherwise-similar
/// rows": quarter codes, years, and capitalized words all qualify.
pub fn classify_token(token: &str) -> TokenClass {
    let mut chars = token.chars();
    let first = match chars.next() {
        Some(c) => c,
        None => return TokenClass::Ordinary,
    };

    if token.len() == 2 && (first == 'Q' || first == 'q') && chars.as_str().chars().all(|c| c.is_ascii_digit()) {
        return TokenClass::Quarter;
    }
    if token.len() == 4 && token.chars().all(|c| c.is_ascii_digit()) {
        return TokenClass::Year;
    }
    if first.is_uppercase() {
        return TokenClass::Label;
    }
    TokenClass::Ordinary
}

/// A matched line with its keyword-overlap score.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineMatch<'a> {
    /// The matched line, verbatim.
    pub line: &'a str,
    /// Count of question tokens present in the line.
    pub score: usize,
}

/// Tokenize a question: strip `?` and `:`, split on whitespace, drop stop words.
fn question_tokens(question: &str) -> Vec<String> {
    question
        .replace(['?', ':'], "")
        .split_whitespace()
        .filter(|t| !is_stop_word(t))
        .map(str::to_string)
        .collect()
}

/// Find the line that best answers the question, or `None` when no line
/// satisfies every critical token.
///
/// Ties are broken by first occurrence: later lines with an equal score
/// never replace an earlier winner.
pub fn find_matching_line<'a>(lines: &'a [String], question: &str) -> Option<LineMatch<'a>> {
    let tokens = question_tokens(question);

    let mut critical: Vec<String> = tokens
        .iter()
        .filter(|t| classify_token(t).is_critical())
        .map(|t| t.to_lowercase())
        .collect();

    // Never let the constraint go vacuous while the question still has
    // content words.
    if critical.is_empty() {
        critical = tokens.iter().map(|t| t.to_lowercase()).collect();
    }

    debug!("critical tokens for {:?}: {:?}", question, critical);

    let mut best: Option<LineMatch<'a>> = None;

    for line in lines {
        let line_lower = line.to_lowercase();

        // Hard constraint: every critical token must appear in the line.
        // This prevents a "Q1 Revenue" row from answering a Q3 question.
        if critical.iter().any(|t| !line_lower.contains(t.as_str())) {
            continue;
        }

        let score = tokens
            .iter()
            .filter(|t| line_lower.contains(&t.to_lowercase()))
            .count();

        if best.as_ref().map_or(true, |b| score > b.score) {
            best = Some(LineMatch { line, score });
        }
    }

    best
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_classify_token() {
        assert_eq!(classify_token("Q3"), TokenClass::Quarter);
        assert_eq!(classify_token("q1"), TokenClass::Quarter);
        assert_eq!(classify_token("2024"), TokenClass::Year);
        assert_eq!(classify_token("Revenue"), TokenClass::Label);
        assert_eq!(classify_token("revenue"), TokenClass::Ordinary);
        assert_eq!(classify_token("Q33"), TokenClass::Label);
        assert_eq!(classify_token("123"), TokenClass::Ordinary);
        assert_eq!(classify_token(""), TokenClass::Ordinary);
    }

    #[test]
    fn test_critical_token_exclusivity() {
        let lines = lines(&["Q1 Revenue: 100", "Q3 Revenue: 300"]);
        let m = find_matching_line(&lines, "What is Q3 Revenue?").expect("match");
        assert_eq!(m.line, "Q3 Revenue: 300");
    }

    #[test]
    fn test_missing_critical_token_refuses() {
        let lines = lines(&["Q1 Revenue: 100", "Q2 Revenue: 200"]);
        assert!(find_matching_line(&lines, "What is Q4 Revenue?").is_none());
    }

    #[test]
    fn test_tie_break_first_line_wins() {
        let lines = lines(&["Revenue total 100", "Revenue total 200"]);
        for _ in 0..3 {
            let m = find_matching_line(&lines, "What is the Revenue?").expect("match");
            assert_eq!(m.line, "Revenue total 100");
        }
    }

    #[test]
    fn test_fallback_to_all_tokens_when_none_critical() {
        // All tokens lowercase and non-numeric: fallback makes them critical.
        let lines = lines(&["gross margin 40%", "net margin 20%"]);
        let m = find_matching_line(&lines, "what is net margin").expect("match");
        assert_eq!(m.line, "net margin 20%");
    }

    #[test]
    fn test_year_is_critical() {
        let lines = lines(&["Revenue 2023: 1,000", "Revenue 2024: 1,200"]);
        let m = find_matching_line(&lines, "revenue for 2024").expect("match");
        assert_eq!(m.line, "Revenue 2024: 1,200");
    }

    #[test]
    fn test_no_lines_returns_none() {
        assert!(find_matching_line(&[], "What is Revenue?").is_none());
    }
}
