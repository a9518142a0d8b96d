//! End-to-end pipeline tests with deterministic stub providers

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::Semaphore;

use documate::config::RagConfig;
use documate::error::{Error, Result};
use documate::generation::composer::NO_DOCUMENT_ANSWER;
use documate::ingestion::{DocumentParser, ParsedDocument};
use documate::pipeline::RagPipeline;
use documate::providers::{EmbeddingProvider, LanguageModelProvider};
use documate::types::{IngestStatus, PageText};

/// Parser stub returning canned pages regardless of input bytes
struct StubParser {
    pages: Vec<PageText>,
}

impl StubParser {
    fn new(pages: Vec<PageText>) -> Self {
        Self { pages }
    }
}

impl DocumentParser for StubParser {
    /// Empty input bytes stand in for a scanned document with no text layer.
    fn parse(&self, _filename: &str, data: &[u8]) -> Result<ParsedDocument> {
        let pages = if data.is_empty() {
            Vec::new()
        } else {
            self.pages.clone()
        };
        Ok(ParsedDocument {
            total_pages: pages.len() as u32,
            pages,
        })
    }
}

/// Parser stub that always fails extraction
struct FailingParser;

impl DocumentParser for FailingParser {
    fn parse(&self, filename: &str, _data: &[u8]) -> Result<ParsedDocument> {
        Err(Error::extraction(filename, "corrupt file"))
    }
}

/// Deterministic embedder: each dimension counts occurrences of one
/// vocabulary term as a lowercase substring. Same text, same vector.
struct KeywordEmbedder {
    vocab: Vec<&'static str>,
    calls: AtomicUsize,
}

impl KeywordEmbedder {
    fn new() -> Self {
        Self {
            vocab: vec!["contract", "expire", "2025", "vendor", "acme", "when"],
            calls: AtomicUsize::new(0),
        }
    }

    fn embed_one(&self, text: &str) -> Vec<f32> {
        let lower = text.to_lowercase();
        self.vocab
            .iter()
            .map(|term| lower.matches(term).count() as f32)
            .collect()
    }
}

#[async_trait]
impl EmbeddingProvider for KeywordEmbedder {
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(texts.iter().map(|t| self.embed_one(t)).collect())
    }

    fn name(&self) -> &str {
        "keyword-stub"
    }
}

/// Embedder stub that always fails
struct FailingEmbedder;

#[async_trait]
impl EmbeddingProvider for FailingEmbedder {
    async fn embed(&self, _texts: &[String]) -> Result<Vec<Vec<f32>>> {
        Err(Error::embedding("provider unreachable"))
    }

    fn name(&self) -> &str {
        "failing-stub"
    }
}

/// Embedder stub that blocks until released, for concurrency tests
struct GatedEmbedder {
    inner: KeywordEmbedder,
    entered: Arc<Semaphore>,
    release: Arc<Semaphore>,
}

#[async_trait]
impl EmbeddingProvider for GatedEmbedder {
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        self.entered.add_permits(1);
        let _permit = self
            .release
            .acquire()
            .await
            .map_err(|_| Error::embedding("gate closed"))?;
        self.inner.embed(texts).await
    }

    fn name(&self) -> &str {
        "gated-stub"
    }
}

/// Language model stub that records prompts and returns a fixed answer
struct RecordingLlm {
    prompts: Mutex<Vec<String>>,
    answer: String,
}

impl RecordingLlm {
    fn new(answer: &str) -> Self {
        Self {
            prompts: Mutex::new(Vec::new()),
            answer: answer.to_string(),
        }
    }

    fn call_count(&self) -> usize {
        self.prompts.lock().len()
    }
}

#[async_trait]
impl LanguageModelProvider for RecordingLlm {
    async fn complete(&self, prompt: &str) -> Result<String> {
        self.prompts.lock().push(prompt.to_string());
        Ok(self.answer.clone())
    }

    fn name(&self) -> &str {
        "recording-stub"
    }

    fn model(&self) -> &str {
        "stub-model"
    }
}

/// Language model stub that always fails
struct FailingLlm;

#[async_trait]
impl LanguageModelProvider for FailingLlm {
    async fn complete(&self, _prompt: &str) -> Result<String> {
        Err(Error::answer("model unreachable"))
    }

    fn name(&self) -> &str {
        "failing-stub"
    }

    fn model(&self) -> &str {
        "stub-model"
    }
}

fn contract_pages() -> Vec<PageText> {
    vec![
        PageText::new(0, "The contract expires in 2025."),
        PageText::new(1, "The vendor is Acme Corp."),
    ]
}

/// Config with chunking small enough to keep the two test pages in
/// separate chunks.
fn small_chunk_config() -> RagConfig {
    let mut config = RagConfig::default();
    config.chunking.chunk_size = 30;
    config.chunking.chunk_overlap = 5;
    config
}

fn pipeline_with(
    config: RagConfig,
    parser: Arc<dyn DocumentParser>,
    embedder: Arc<dyn EmbeddingProvider>,
    llm: Arc<dyn LanguageModelProvider>,
) -> RagPipeline {
    RagPipeline::new(config, parser, embedder, llm)
}

#[tokio::test]
async fn ask_before_ingest_returns_no_document_answer() {
    let embedder = Arc::new(KeywordEmbedder::new());
    let llm = Arc::new(RecordingLlm::new("should not be called"));
    let pipeline = pipeline_with(
        RagConfig::default(),
        Arc::new(StubParser::new(contract_pages())),
        embedder.clone(),
        llm.clone(),
    );

    let result = pipeline.ask("When does the contract expire?").await.unwrap();

    assert_eq!(result.answer, NO_DOCUMENT_ANSWER);
    assert!(result.sources.is_empty());
    assert_eq!(llm.call_count(), 0);
    assert_eq!(embedder.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn ingest_reports_success_and_chunk_count() {
    let pipeline = pipeline_with(
        RagConfig::default(),
        Arc::new(StubParser::new(contract_pages())),
        Arc::new(KeywordEmbedder::new()),
        Arc::new(RecordingLlm::new("ok")),
    );

    let report = pipeline.ingest("contract.pdf", b"bytes").await.unwrap();

    assert_eq!(report.status, IngestStatus::Success);
    assert!(report.chunk_count > 0);
    assert_eq!(pipeline.chunk_count(), report.chunk_count);

    let doc = pipeline.current_document().unwrap();
    assert_eq!(doc.filename, "contract.pdf");
    assert_eq!(doc.page_count, 2);
}

#[tokio::test]
async fn reingesting_the_same_document_is_idempotent() {
    let pipeline = pipeline_with(
        small_chunk_config(),
        Arc::new(StubParser::new(contract_pages())),
        Arc::new(KeywordEmbedder::new()),
        Arc::new(RecordingLlm::new("The contract expires in 2025.")),
    );

    let first = pipeline.ingest("contract.pdf", b"bytes").await.unwrap();
    let ask_first = pipeline.ask("When does the contract expire?").await.unwrap();

    let second = pipeline.ingest("contract.pdf", b"bytes").await.unwrap();
    let ask_second = pipeline.ask("When does the contract expire?").await.unwrap();

    assert_eq!(first.chunk_count, second.chunk_count);
    assert_eq!(ask_first.sources, ask_second.sources);
}

#[tokio::test]
async fn empty_document_keeps_previous_index_by_default() {
    let pipeline = pipeline_with(
        RagConfig::default(),
        Arc::new(StubParser::new(contract_pages())),
        Arc::new(KeywordEmbedder::new()),
        Arc::new(RecordingLlm::new("The contract expires in 2025.")),
    );

    pipeline.ingest("contract.pdf", b"bytes").await.unwrap();
    let indexed_chunks = pipeline.chunk_count();

    let report = pipeline.ingest("scanned.pdf", b"").await.unwrap();
    assert_eq!(report.status, IngestStatus::Empty);
    assert_eq!(report.chunk_count, 0);

    // The previous document stays authoritative.
    assert_eq!(pipeline.chunk_count(), indexed_chunks);
    assert_eq!(pipeline.current_document().unwrap().filename, "contract.pdf");
    let answer = pipeline.ask("When does the contract expire?").await.unwrap();
    assert_ne!(answer.answer, NO_DOCUMENT_ANSWER);
}

#[tokio::test]
async fn empty_document_clears_index_when_configured() {
    let mut config = RagConfig::default();
    config.ingest.keep_previous_on_empty = false;

    let pipeline = pipeline_with(
        config,
        Arc::new(StubParser::new(contract_pages())),
        Arc::new(KeywordEmbedder::new()),
        Arc::new(RecordingLlm::new("ok")),
    );

    pipeline.ingest("contract.pdf", b"bytes").await.unwrap();
    let report = pipeline.ingest("scanned.pdf", b"").await.unwrap();

    assert_eq!(report.status, IngestStatus::Empty);
    assert_eq!(pipeline.chunk_count(), 0);
    assert!(pipeline.current_document().is_none());

    let answer = pipeline.ask("When does the contract expire?").await.unwrap();
    assert_eq!(answer.answer, NO_DOCUMENT_ANSWER);
}

#[tokio::test]
async fn extraction_failure_is_typed_and_leaves_index_alone() {
    let pipeline = pipeline_with(
        RagConfig::default(),
        Arc::new(FailingParser),
        Arc::new(KeywordEmbedder::new()),
        Arc::new(RecordingLlm::new("ok")),
    );

    let result = pipeline.ingest("broken.pdf", b"junk").await;
    assert!(matches!(result, Err(Error::Extraction { .. })));
    assert_eq!(pipeline.chunk_count(), 0);
}

#[tokio::test]
async fn embedding_failure_fails_the_ingest() {
    let pipeline = pipeline_with(
        RagConfig::default(),
        Arc::new(StubParser::new(contract_pages())),
        Arc::new(FailingEmbedder),
        Arc::new(RecordingLlm::new("ok")),
    );

    let result = pipeline.ingest("contract.pdf", b"bytes").await;
    assert!(matches!(result, Err(Error::Embedding(_))));
    assert_eq!(pipeline.chunk_count(), 0);
    assert!(pipeline.current_document().is_none());
}

#[tokio::test]
async fn answer_failure_is_typed_and_index_survives() {
    let pipeline = pipeline_with(
        RagConfig::default(),
        Arc::new(StubParser::new(contract_pages())),
        Arc::new(KeywordEmbedder::new()),
        Arc::new(FailingLlm),
    );

    pipeline.ingest("contract.pdf", b"bytes").await.unwrap();
    let chunks_before = pipeline.chunk_count();

    let result = pipeline.ask("When does the contract expire?").await;
    assert!(matches!(result, Err(Error::Answer(_))));
    assert_eq!(pipeline.chunk_count(), chunks_before);
}

#[tokio::test]
async fn contract_question_retrieves_page_one_with_top_score() {
    let llm = Arc::new(RecordingLlm::new("The contract expires in 2025."));
    let pipeline = pipeline_with(
        small_chunk_config(),
        Arc::new(StubParser::new(contract_pages())),
        Arc::new(KeywordEmbedder::new()),
        llm.clone(),
    );

    let report = pipeline.ingest("contract.pdf", b"bytes").await.unwrap();
    assert!(report.chunk_count >= 2, "pages should land in separate chunks");

    let result = pipeline.ask("When does the contract expire?").await.unwrap();

    // The language model saw the page-1 chunk as the top context entry.
    let prompts = llm.prompts.lock();
    let prompt = prompts.last().unwrap();
    let contract_pos = prompt.find("contract expires").unwrap();
    let vendor_pos = prompt.find("vendor").unwrap_or(usize::MAX);
    assert!(contract_pos < vendor_pos);

    // Citations span both pages, so page prefixes are shown (1-based).
    assert!(!result.sources.is_empty());
    assert!(result.sources[0].starts_with("Page 1: "));
    assert!(result.sources[0].contains("contract expires"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn concurrent_ingest_is_rejected_as_busy() {
    let entered = Arc::new(Semaphore::new(0));
    let release = Arc::new(Semaphore::new(0));

    let pipeline = Arc::new(pipeline_with(
        RagConfig::default(),
        Arc::new(StubParser::new(contract_pages())),
        Arc::new(GatedEmbedder {
            inner: KeywordEmbedder::new(),
            entered: entered.clone(),
            release: release.clone(),
        }),
        Arc::new(RecordingLlm::new("ok")),
    ));

    let background = {
        let pipeline = pipeline.clone();
        tokio::spawn(async move { pipeline.ingest("first.pdf", b"bytes").await })
    };

    // Wait until the first ingest is inside its embedding call.
    let permit = entered.acquire().await.unwrap();
    permit.forget();

    let second = pipeline.ingest("second.pdf", b"bytes").await;
    assert!(matches!(second, Err(Error::IngestBusy)));

    // Let the first ingest finish; it must still succeed.
    release.add_permits(1);
    let first = background.await.unwrap().unwrap();
    assert_eq!(first.status, IngestStatus::Success);
}
