//! Grounding prompt construction

use crate::generation::citation::spans_multiple_pages;
use crate::index::ScoredChunk;

/// Fixed refusal string the model is instructed to emit when the answer is
/// not present in the supplied context.
pub const REFUSAL_ANSWER: &str = "The answer to this question is not found in the document.";

/// Prompt builder for grounded question answering
pub struct PromptBuilder;

impl PromptBuilder {
    /// Build the context block from retrieved chunks, in relevance order
    ///
    /// Page prefixes appear only when the retrieved set spans more than one
    /// distinct page, mirroring the citation policy.
    pub fn build_context(retrieved: &[ScoredChunk]) -> String {
        let show_pages = spans_multiple_pages(retrieved);
        let mut context = String::new();

        for (i, scored) in retrieved.iter().enumerate() {
            if show_pages {
                context.push_str(&format!("[Page {}]\n", scored.chunk.page_index + 1));
            }
            context.push_str(scored.chunk.text.trim());
            if i + 1 < retrieved.len() {
                context.push_str("\n\n---\n\n");
            }
        }

        context
    }

    /// Build the full grounding prompt
    ///
    /// The grounding rules are instructions to the model, not programmatic
    /// guarantees: the pipeline validates prompt wiring, not factuality.
    pub fn build_grounded_prompt(question: &str, context: &str) -> String {
        format!(
            r#"You are a document analysis assistant. Answer the question using ONLY the context below.

RULES:
1. Use only information explicitly stated in the CONTEXT. Never use outside knowledge.
2. If the answer is not in the context, respond with exactly: "{refusal}"
3. Never invent names, numbers, dates, or organizations that do not appear in the context.
4. Answer in the same language the question is asked in.
5. Keep the answer concise and factual.

CONTEXT:
{context}

QUESTION: {question}

ANSWER:"#,
            refusal = REFUSAL_ANSWER,
            context = context,
            question = question
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Chunk;

    fn scored(text: &str, page_index: u32) -> ScoredChunk {
        ScoredChunk {
            chunk: Chunk::new(text, page_index, 0),
            score: 0.9,
        }
    }

    #[test]
    fn context_concatenates_in_relevance_order() {
        let retrieved = vec![scored("most relevant", 0), scored("less relevant", 0)];
        let context = PromptBuilder::build_context(&retrieved);

        let first = context.find("most relevant").unwrap();
        let second = context.find("less relevant").unwrap();
        assert!(first < second);
        // Single page set: no page markers.
        assert!(!context.contains("[Page"));
    }

    #[test]
    fn context_marks_pages_for_multi_page_sets() {
        let retrieved = vec![scored("from page one", 0), scored("from page two", 1)];
        let context = PromptBuilder::build_context(&retrieved);

        assert!(context.contains("[Page 1]\nfrom page one"));
        assert!(context.contains("[Page 2]\nfrom page two"));
    }

    #[test]
    fn prompt_wires_question_context_and_refusal() {
        let prompt =
            PromptBuilder::build_grounded_prompt("When does it expire?", "The contract expires in 2025.");

        assert!(prompt.contains("When does it expire?"));
        assert!(prompt.contains("The contract expires in 2025."));
        assert!(prompt.contains(REFUSAL_ANSWER));
        assert!(prompt.contains("same language"));
    }
}
