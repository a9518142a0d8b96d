//! Retrieval: embed a question, query the index

use std::sync::Arc;

use crate::error::Result;
use crate::index::{ScoredChunk, VectorIndex};
use crate::providers::EmbeddingProvider;

/// Thin composition of the embedder and the vector index
pub struct Retriever {
    embedder: Arc<dyn EmbeddingProvider>,
    index: Arc<VectorIndex>,
}

impl Retriever {
    pub fn new(embedder: Arc<dyn EmbeddingProvider>, index: Arc<VectorIndex>) -> Self {
        Self { embedder, index }
    }

    /// Return the top-k chunks most similar to the question
    ///
    /// An empty index yields an empty result without calling the embedding
    /// provider at all.
    pub async fn retrieve(&self, question: &str, k: usize) -> Result<Vec<ScoredChunk>> {
        if self.index.is_empty() {
            return Ok(Vec::new());
        }

        let vectors = self.embedder.embed(&[question.to_string()]).await?;
        let query_vector = vectors
            .into_iter()
            .next()
            .ok_or_else(|| crate::error::Error::embedding("Embedder returned no vector"))?;

        self.index.query(&query_vector, k)
    }
}
