//! Fixed instruction template for grounded answering.

/// Grounding prompt. Uses `{context}` and `{question}` placeholders.
///
/// Constrains the model to answer strictly from the OCR context, to state
/// explicitly when information is absent, to interpret tabular layouts, and
/// to return concise literal values.
pub const GROUNDING_PROMPT: &str = r#"You are a helpful assistant that answers questions based STRICTLY on the provided text extracted from an image (OCR).
Your goal is to be accurate and concise.

CONTEXT (OCR TEXT):
"""
{context}
"""

QUESTION:
{question}

INSTRUCTIONS:
1. Answer the question using ONLY the information in the CONTEXT above.
2. Do NOT use outside knowledge or guess.
3. If the answer is not in the text, say "The image does not contain this information."
4. If the text contains tables, interpret the rows and columns correctly to answer questions about specific cells, totals, or comparisons.
5. If the user asks for a specific value (e.g., "Revenue for 2024"), extract the exact number/text.
6. Provide direct answers. No fluff.

ANSWER:"#;

/// Build the outbound prompt from context and question.
pub fn build_prompt(context: &str, question: &str) -> String {
    GROUNDING_PROMPT
        .replace("{context}", context)
        .replace("{question}", question)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_embeds_context_and_question() {
        let prompt = build_prompt("Q3 Revenue: 300", "What is Q3 Revenue?");
        assert!(prompt.contains("Q3 Revenue: 300"));
        assert!(prompt.contains("What is Q3 Revenue?"));
        assert!(!prompt.contains("{context}"));
        assert!(!prompt.contains("{question}"));
        assert!(prompt.contains("ONLY the information in the CONTEXT"));
    }
}
