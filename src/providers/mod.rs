//! Provider abstractions for embeddings and answer generation
//!
//! Narrow capability traits so the concrete backend (OpenAI, DeepSeek, a
//! local gateway) is selected at configuration time and stubbed in tests.

pub mod openai;

pub use openai::OpenAiClient;

use async_trait::async_trait;

use crate::error::Result;

/// Maps text to fixed-dimension dense vectors
///
/// The result is order-preserving with one vector per input string, and
/// deterministic for a fixed model. Dimensionality is constant for the
/// lifetime of one provider instance.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Generate embeddings for a batch of texts
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;

    /// Provider name for logging
    fn name(&self) -> &str;
}

/// Generates free text from a prompt
#[async_trait]
pub trait LanguageModelProvider: Send + Sync {
    /// Complete the given prompt
    async fn complete(&self, prompt: &str) -> Result<String>;

    /// Provider name for logging
    fn name(&self) -> &str;

    /// Model being used
    fn model(&self) -> &str;
}
