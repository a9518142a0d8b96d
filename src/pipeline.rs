//! Pipeline orchestration: ingest and ask
//!
//! Owns the index lifecycle. One document generation is live at a time;
//! ingest builds the replacement generation completely before publishing
//! it, and a second concurrent ingest is rejected rather than interleaved.

use parking_lot::RwLock;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::timeout;

use crate::config::RagConfig;
use crate::error::{Error, Result};
use crate::generation::AnswerComposer;
use crate::index::{IndexEntry, VectorIndex};
use crate::ingestion::{DocumentParser, TextChunker};
use crate::providers::{EmbeddingProvider, LanguageModelProvider};
use crate::retrieval::Retriever;
use crate::types::{AnswerResult, Document, IngestReport};

/// Orchestrates extraction, chunking, embedding, indexing, retrieval, and
/// answer composition over injected providers.
pub struct RagPipeline {
    config: RagConfig,
    parser: Arc<dyn DocumentParser>,
    embedder: Arc<dyn EmbeddingProvider>,
    index: Arc<VectorIndex>,
    retriever: Retriever,
    composer: AnswerComposer,
    /// Document backing the current index generation
    current_document: RwLock<Option<Document>>,
    /// Serializes ingests; a held lock means one is in flight
    ingest_lock: Mutex<()>,
}

impl RagPipeline {
    /// Create a pipeline from configuration and providers
    pub fn new(
        config: RagConfig,
        parser: Arc<dyn DocumentParser>,
        embedder: Arc<dyn EmbeddingProvider>,
        llm: Arc<dyn LanguageModelProvider>,
    ) -> Self {
        let index = Arc::new(VectorIndex::new());

        Self {
            retriever: Retriever::new(Arc::clone(&embedder), Arc::clone(&index)),
            composer: AnswerComposer::new(llm),
            config,
            parser,
            embedder,
            index,
            current_document: RwLock::new(None),
            ingest_lock: Mutex::new(()),
        }
    }

    /// Time budget for one provider operation, covering every retry
    /// attempt plus backoff between them.
    fn call_budget(&self) -> Duration {
        let p = &self.config.provider;
        let attempts = u64::from(p.max_retries) + 1;
        let backoff: u64 = (0..p.max_retries).map(|a| 2u64.pow(a)).sum();
        Duration::from_secs(p.timeout_secs * attempts + backoff)
    }

    /// Ingest a document: extract, chunk, embed, and atomically replace the
    /// current index generation.
    ///
    /// A second ingest issued while one is running fails with
    /// [`Error::IngestBusy`]. Any failure before the index swap leaves the
    /// previous generation authoritative.
    pub async fn ingest(&self, filename: &str, data: &[u8]) -> Result<IngestReport> {
        let _guard = self.ingest_lock.try_lock().map_err(|_| Error::IngestBusy)?;

        tracing::info!("Ingesting '{}' ({} bytes)", filename, data.len());

        let parsed = self.parser.parse(filename, data)?;

        let chunker = TextChunker::new(
            self.config.chunking.chunk_size,
            self.config.chunking.chunk_overlap,
        );
        let chunks = chunker.split(&parsed.pages);

        if chunks.is_empty() {
            tracing::warn!("'{}' produced no chunks", filename);
            if !self.config.ingest.keep_previous_on_empty {
                self.index.clear();
                *self.current_document.write() = None;
            }
            return Ok(IngestReport::empty());
        }

        let texts: Vec<String> = chunks.iter().map(|c| c.text.clone()).collect();
        let embeddings = timeout(self.call_budget(), self.embedder.embed(&texts))
            .await
            .map_err(|_| Error::embedding("Embedding call timed out"))??;

        if embeddings.len() != chunks.len() {
            return Err(Error::embedding(format!(
                "Embedder returned {} vectors for {} chunks",
                embeddings.len(),
                chunks.len()
            )));
        }

        let entries: Vec<IndexEntry> = chunks
            .into_iter()
            .zip(embeddings)
            .map(|(chunk, embedding)| IndexEntry::new(chunk, embedding))
            .collect();
        let chunk_count = entries.len();

        // Everything is built; publish the new generation in one swap.
        self.index.replace(entries)?;
        *self.current_document.write() = Some(Document::new(filename, parsed.total_pages));

        tracing::info!(
            "Indexed '{}': {} pages, {} chunks",
            filename,
            parsed.total_pages,
            chunk_count
        );

        Ok(IngestReport::success(chunk_count))
    }

    /// Answer a question against the current document
    ///
    /// Before any successful ingest the retrieval is empty and the composer
    /// returns the fixed no-document answer without a language-model call.
    pub async fn ask(&self, question: &str) -> Result<AnswerResult> {
        tracing::info!("Question: \"{}\"", question);

        let retrieved = timeout(
            self.call_budget(),
            self.retriever.retrieve(question, self.config.retrieval.top_k),
        )
        .await
        .map_err(|_| Error::embedding("Query embedding timed out"))??;

        let result = timeout(
            self.call_budget(),
            self.composer.compose(question, &retrieved),
        )
        .await
        .map_err(|_| Error::answer("Answer generation timed out"))??;

        tracing::info!(
            "Answered with {} source(s), {} chunks retrieved",
            result.sources.len(),
            retrieved.len()
        );

        Ok(result)
    }

    /// Document backing the current index generation, if any
    pub fn current_document(&self) -> Option<Document> {
        self.current_document.read().clone()
    }

    /// Number of chunks in the current generation
    pub fn chunk_count(&self) -> usize {
        self.index.len()
    }

    /// Configuration in use
    pub fn config(&self) -> &RagConfig {
        &self.config
    }
}
