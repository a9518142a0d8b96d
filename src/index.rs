//! In-memory vector index with atomic generation replacement
//!
//! The index holds exactly one document generation at a time. `replace`
//! builds the new generation off to the side and publishes it with a single
//! pointer swap; a query that already took a snapshot keeps reading the old
//! generation until it completes, so readers never observe a mixture of two
//! generations.

use parking_lot::RwLock;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::types::Chunk;

/// A chunk paired with its embedding vector
#[derive(Debug, Clone)]
pub struct IndexEntry {
    /// The stored chunk
    pub chunk: Chunk,
    /// Embedding vector for the chunk text
    pub embedding: Vec<f32>,
}

impl IndexEntry {
    pub fn new(chunk: Chunk, embedding: Vec<f32>) -> Self {
        Self { chunk, embedding }
    }
}

/// A retrieved chunk with its similarity score
#[derive(Debug, Clone)]
pub struct ScoredChunk {
    /// The retrieved chunk
    pub chunk: Chunk,
    /// Cosine similarity to the query vector (higher is more similar)
    pub score: f32,
}

/// One complete, immutable version of the document index
#[derive(Debug)]
pub struct Generation {
    /// Monotonic generation counter, for diagnostics
    pub sequence: u64,
    /// Entries in insertion order
    pub entries: Vec<IndexEntry>,
}

/// Vector index over one document generation
pub struct VectorIndex {
    current: RwLock<Arc<Generation>>,
}

impl VectorIndex {
    /// Create an empty index
    pub fn new() -> Self {
        Self {
            current: RwLock::new(Arc::new(Generation {
                sequence: 0,
                entries: Vec::new(),
            })),
        }
    }

    /// Atomically replace all entries with a new generation
    ///
    /// All entries must share one embedding dimensionality. In-flight
    /// queries holding the previous generation continue against it; queries
    /// issued after this returns see only the new one.
    pub fn replace(&self, entries: Vec<IndexEntry>) -> Result<()> {
        if let Some(first) = entries.first() {
            let dims = first.embedding.len();
            if dims == 0 {
                return Err(Error::embedding("Entry has an empty embedding"));
            }
            if let Some(bad) = entries.iter().find(|e| e.embedding.len() != dims) {
                return Err(Error::embedding(format!(
                    "Embedding dimension mismatch: expected {}, got {}",
                    dims,
                    bad.embedding.len()
                )));
            }
        }

        let mut current = self.current.write();
        let generation = Arc::new(Generation {
            sequence: current.sequence + 1,
            entries,
        });
        tracing::debug!(
            "Published index generation {} with {} entries",
            generation.sequence,
            generation.entries.len()
        );
        *current = generation;
        Ok(())
    }

    /// Discard all entries, publishing an empty generation
    pub fn clear(&self) {
        let mut current = self.current.write();
        *current = Arc::new(Generation {
            sequence: current.sequence + 1,
            entries: Vec::new(),
        });
    }

    /// Take a consistent snapshot of the current generation
    pub fn snapshot(&self) -> Arc<Generation> {
        Arc::clone(&self.current.read())
    }

    /// Number of entries in the current generation
    pub fn len(&self) -> usize {
        self.current.read().entries.len()
    }

    /// True when no document is indexed
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Return the top-k entries by cosine similarity, descending
    ///
    /// Ties keep insertion order. k is clamped to the number of entries; an
    /// empty index returns an empty result rather than an error.
    pub fn query(&self, vector: &[f32], k: usize) -> Result<Vec<ScoredChunk>> {
        let generation = self.snapshot();

        if generation.entries.is_empty() || k == 0 {
            return Ok(Vec::new());
        }

        if let Some(first) = generation.entries.first() {
            if first.embedding.len() != vector.len() {
                return Err(Error::embedding(format!(
                    "Query vector has {} dimensions, index has {}",
                    vector.len(),
                    first.embedding.len()
                )));
            }
        }

        let mut scored: Vec<ScoredChunk> = generation
            .entries
            .iter()
            .map(|entry| ScoredChunk {
                chunk: entry.chunk.clone(),
                score: cosine_similarity(vector, &entry.embedding),
            })
            .collect();

        // Stable sort keeps insertion order for equal scores.
        scored.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        scored.truncate(k);

        Ok(scored)
    }
}

impl Default for VectorIndex {
    fn default() -> Self {
        Self::new()
    }
}

/// Cosine similarity between two equal-length vectors
///
/// Zero vectors score 0.0 rather than NaN.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let mut dot = 0.0f32;
    let mut norm_a = 0.0f32;
    let mut norm_b = 0.0f32;

    for (x, y) in a.iter().zip(b.iter()) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    let denom = norm_a.sqrt() * norm_b.sqrt();
    if denom == 0.0 {
        0.0
    } else {
        dot / denom
    }
}
