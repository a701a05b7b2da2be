//! Grounded prompt assembly.
//!
//! [`PromptAssembler`] turns retrieved chunks plus the user's question into
//! a single prompt under a fixed instruction template. Pure string
//! formatting: no retries, no side effects, and the instruction text is
//! intact no matter how many or how large the retrieved chunks are,
//! because context is down-selected to a character budget first.

use crate::document::SearchResult;

/// Instruction template interpolated with `{context}` and `{question}`.
const ANSWER_TEMPLATE: &str = "\
You are Sage, a patient computer-science tutor. You answer from the
provided study materials, explaining with clarity, intuition, and
real-world analogies.

Rules:
1. Answer only if the context contains enough information. If it does
   not, say: \"I don't know based on my materials.\"
2. Never invent facts. Stay grounded in the context.
3. Structure your response when it applies:
   - Concept explanation: a simple, intuitive breakdown.
   - Analogy or visualization: a memorable mental image.
   - Why it matters: a practical use case or performance insight.
   - Code: in the language the user asked for (default: Python), clean
     and commented.
4. If the user asks for code in a specific language, translate the
   algorithm accurately to that language using its standard idioms.
5. Keep explanations concise but thorough.

Context:
{context}

Question:
{question}

Answer:
";

/// Default character budget for the context block.
///
/// Sized to fit a 4096-token generation window with room for the
/// instruction text and the answer.
const DEFAULT_MAX_CONTEXT_CHARS: usize = 6000;

/// Assembles retrieved chunks and a question into one grounded prompt.
#[derive(Debug, Clone)]
pub struct PromptAssembler {
    max_context_chars: usize,
}

impl Default for PromptAssembler {
    fn default() -> Self {
        Self { max_context_chars: DEFAULT_MAX_CONTEXT_CHARS }
    }
}

impl PromptAssembler {
    /// Create an assembler with a custom context character budget.
    pub fn new(max_context_chars: usize) -> Self {
        Self { max_context_chars }
    }

    /// Build the final prompt from the question and retrieved chunks.
    ///
    /// Chunk texts are concatenated in retrieval order (most similar
    /// first) and trimmed to the context budget; the most similar chunk is
    /// always represented, truncated on a char boundary if it alone
    /// exceeds the budget. An empty result set yields an empty context
    /// block, which the template's grounding rule turns into an explicit
    /// "I don't know" answer.
    pub fn assemble(&self, question: &str, results: &[SearchResult]) -> String {
        let context = self.build_context(results);
        ANSWER_TEMPLATE.replace("{context}", &context).replace("{question}", question)
    }

    /// Concatenate chunk texts up to the character budget.
    fn build_context(&self, results: &[SearchResult]) -> String {
        let mut context = String::new();
        for (i, result) in results.iter().enumerate() {
            let text = result.chunk.text.trim();
            if text.is_empty() {
                continue;
            }
            let separator_len = if context.is_empty() { 0 } else { 2 };
            let used = context.chars().count();
            let incoming = text.chars().count();

            if used + separator_len + incoming > self.max_context_chars {
                if i == 0 {
                    // The single best chunk gets truncated rather than dropped.
                    context.extend(text.chars().take(self.max_context_chars));
                }
                break;
            }
            if !context.is_empty() {
                context.push_str("\n\n");
            }
            context.push_str(text);
        }
        context
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Chunk;

    fn result(text: &str) -> SearchResult {
        SearchResult {
            chunk: Chunk {
                text: text.to_string(),
                source: "notes.txt".to_string(),
                page: None,
                sequence: 0,
                embedding: Vec::new(),
            },
            score: 1.0,
        }
    }

    #[test]
    fn interpolates_question_and_context_in_order() {
        let assembler = PromptAssembler::default();
        let prompt =
            assembler.assemble("what is x?", &[result("first chunk"), result("second chunk")]);

        assert!(prompt.contains("first chunk\n\nsecond chunk"));
        assert!(prompt.contains("Question:\nwhat is x?"));
        assert!(prompt.find("first chunk").unwrap() < prompt.find("second chunk").unwrap());
    }

    #[test]
    fn instruction_text_survives_oversized_context() {
        let assembler = PromptAssembler::new(50);
        let big = "x".repeat(500);
        let prompt = assembler.assemble("q", &[result(&big), result(&big)]);

        assert!(prompt.starts_with("You are Sage"));
        assert!(prompt.contains("Answer:"));
        // Context was truncated to the budget, not the template.
        assert!(prompt.contains(&"x".repeat(50)));
        assert!(!prompt.contains(&"x".repeat(51)));
    }

    #[test]
    fn drops_later_chunks_past_the_budget() {
        let assembler = PromptAssembler::new(25);
        let prompt = assembler.assemble("q", &[result("twenty chars of text"), result("more")]);

        assert!(prompt.contains("twenty chars of text"));
        assert!(!prompt.contains("more"));
    }

    #[test]
    fn empty_results_leave_context_blank() {
        let assembler = PromptAssembler::default();
        let prompt = assembler.assemble("q", &[]);
        assert!(prompt.contains("Context:\n\n"));
    }
}
