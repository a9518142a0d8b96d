//! Configuration for the Q&A pipeline

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{Error, Result};

/// Main configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RagConfig {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Embedding/LLM provider configuration
    #[serde(default)]
    pub provider: ProviderConfig,
    /// Chunking configuration
    #[serde(default)]
    pub chunking: ChunkingConfig,
    /// Retrieval configuration
    #[serde(default)]
    pub retrieval: RetrievalConfig,
    /// Ingest behavior configuration
    #[serde(default)]
    pub ingest: IngestConfig,
}

impl RagConfig {
    /// Load configuration from a TOML file, falling back to defaults when
    /// the file does not exist.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::info!("No config file at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content)
            .map_err(|e| Error::Config(format!("Failed to parse {}: {}", path.display(), e)))
    }
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host address
    pub host: String,
    /// Port number
    pub port: u16,
    /// Enable CORS
    pub enable_cors: bool,
    /// Maximum upload size in bytes (default: 50MB)
    pub max_upload_size: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            enable_cors: true,
            max_upload_size: 50 * 1024 * 1024, // 50MB
        }
    }
}

/// Embedding and language model provider configuration
///
/// Points at any OpenAI-compatible endpoint (OpenAI, DeepSeek, a local
/// gateway). Both the embedding model and the chat model are served from
/// the same base URL.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Base URL of the OpenAI-compatible API (e.g. "https://api.deepseek.com/v1")
    pub base_url: String,
    /// API key (sent as a Bearer token when non-empty)
    #[serde(default)]
    pub api_key: String,
    /// Embedding model name
    pub embed_model: String,
    /// Chat/completion model name
    pub chat_model: String,
    /// Temperature for generation (low for factual answers)
    pub temperature: f32,
    /// Request timeout in seconds (applies to each provider call)
    pub timeout_secs: u64,
    /// Number of retries for failed requests
    pub max_retries: u32,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: std::env::var("OPENAI_API_BASE")
                .unwrap_or_else(|_| "https://api.openai.com/v1".to_string()),
            api_key: std::env::var("OPENAI_API_KEY").unwrap_or_default(),
            embed_model: "text-embedding-3-small".to_string(),
            chat_model: std::env::var("LLM_MODEL")
                .unwrap_or_else(|_| "deepseek-chat".to_string()),
            temperature: 0.1,
            timeout_secs: 120,
            max_retries: 2,
        }
    }
}

/// Text chunking configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkingConfig {
    /// Maximum chunk size in characters
    pub chunk_size: usize,
    /// Overlap between consecutive chunks in characters
    pub chunk_overlap: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_size: 1000,
            chunk_overlap: 100,
        }
    }
}

/// Retrieval configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalConfig {
    /// Number of chunks to retrieve per question
    pub top_k: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self { top_k: 6 }
    }
}

/// Ingest behavior configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestConfig {
    /// When an ingested document yields zero chunks, keep the previously
    /// indexed document instead of clearing the index.
    pub keep_previous_on_empty: bool,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            keep_previous_on_empty: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = RagConfig::default();
        assert_eq!(config.chunking.chunk_size, 1000);
        assert_eq!(config.chunking.chunk_overlap, 100);
        assert_eq!(config.retrieval.top_k, 6);
        assert!(config.ingest.keep_previous_on_empty);
    }

    #[test]
    fn partial_toml_fills_in_defaults() {
        let config: RagConfig = toml::from_str(
            r#"
            [chunking]
            chunk_size = 500
            chunk_overlap = 50
            "#,
        )
        .unwrap();

        assert_eq!(config.chunking.chunk_size, 500);
        assert_eq!(config.retrieval.top_k, 6);
        assert_eq!(config.server.port, 8080);
    }
}
