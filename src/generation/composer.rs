//! Answer composition: grounded prompt in, answer plus citations out

use std::sync::Arc;

use crate::error::Result;
use crate::generation::citation::format_citations;
use crate::generation::prompt::PromptBuilder;
use crate::index::ScoredChunk;
use crate::providers::LanguageModelProvider;
use crate::types::AnswerResult;

/// Fixed answer returned when no document has been ingested yet
pub const NO_DOCUMENT_ANSWER: &str =
    "No document is available yet. Upload a document before asking questions.";

/// Builds a grounded prompt from retrieved chunks, invokes the language
/// model, and formats the citation list.
pub struct AnswerComposer {
    llm: Arc<dyn LanguageModelProvider>,
}

impl AnswerComposer {
    pub fn new(llm: Arc<dyn LanguageModelProvider>) -> Self {
        Self { llm }
    }

    /// Compose an answer from the question and its retrieved context
    ///
    /// An empty retrieval (no document ingested) short-circuits to the
    /// fixed no-document answer without invoking the language model.
    pub async fn compose(&self, question: &str, retrieved: &[ScoredChunk]) -> Result<AnswerResult> {
        if retrieved.is_empty() {
            return Ok(AnswerResult::new(NO_DOCUMENT_ANSWER, Vec::new()));
        }

        let context = PromptBuilder::build_context(retrieved);
        let prompt = PromptBuilder::build_grounded_prompt(question, &context);

        tracing::debug!(
            "Generating answer with {} ({} context chunks)",
            self.llm.model(),
            retrieved.len()
        );

        let answer = self.llm.complete(&prompt).await?;
        let sources = format_citations(retrieved);

        Ok(AnswerResult::new(answer.trim().to_string(), sources))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Error, Result};
    use crate::types::Chunk;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct RecordingLlm {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl LanguageModelProvider for RecordingLlm {
        async fn complete(&self, prompt: &str) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(format!("echo: {}", prompt.len()))
        }

        fn name(&self) -> &str {
            "recording"
        }

        fn model(&self) -> &str {
            "stub"
        }
    }

    struct FailingLlm;

    #[async_trait]
    impl LanguageModelProvider for FailingLlm {
        async fn complete(&self, _prompt: &str) -> Result<String> {
            Err(Error::answer("model unreachable"))
        }

        fn name(&self) -> &str {
            "failing"
        }

        fn model(&self) -> &str {
            "stub"
        }
    }

    fn scored(text: &str, page_index: u32) -> ScoredChunk {
        ScoredChunk {
            chunk: Chunk::new(text, page_index, 0),
            score: 0.8,
        }
    }

    #[tokio::test]
    async fn empty_retrieval_skips_the_model() {
        let llm = Arc::new(RecordingLlm {
            calls: AtomicUsize::new(0),
        });
        let composer = AnswerComposer::new(llm.clone());

        let result = composer.compose("anything?", &[]).await.unwrap();

        assert_eq!(result.answer, NO_DOCUMENT_ANSWER);
        assert!(result.sources.is_empty());
        assert_eq!(llm.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn compose_returns_answer_and_citations() {
        let llm = Arc::new(RecordingLlm {
            calls: AtomicUsize::new(0),
        });
        let composer = AnswerComposer::new(llm.clone());

        let retrieved = vec![scored("fact one", 0), scored("fact two", 1)];
        let result = composer.compose("question?", &retrieved).await.unwrap();

        assert!(result.answer.starts_with("echo:"));
        assert_eq!(result.sources.len(), 2);
        assert!(result.sources[0].contains("fact one"));
        assert_eq!(llm.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn model_failure_propagates_as_answer_error() {
        let composer = AnswerComposer::new(Arc::new(FailingLlm));
        let result = composer.compose("question?", &[scored("fact", 0)]).await;
        assert!(matches!(result, Err(Error::Answer(_))));
    }
}
