//! Core types: documents, chunks, and operation results

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Text extracted from a single page of a document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageText {
    /// Page index (0-based)
    pub page_index: u32,
    /// Text content of the page
    pub text: String,
}

impl PageText {
    pub fn new(page_index: u32, text: impl Into<String>) -> Self {
        Self {
            page_index,
            text: text.into(),
        }
    }
}

/// A document that has been ingested
///
/// At most one document is indexed at a time; a new ingest supersedes the
/// previous document rather than merging with it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// Unique document ID, fresh per ingest
    pub id: Uuid,
    /// Original filename as uploaded
    pub filename: String,
    /// Number of pages with extracted text
    pub page_count: u32,
}

impl Document {
    pub fn new(filename: impl Into<String>, page_count: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            filename: filename.into(),
            page_count,
        }
    }
}

/// A contiguous span of extracted text, the unit of retrieval
///
/// Immutable once created. Owned by the index entry that stores it and
/// discarded when the index is rebuilt for a new document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Chunk {
    /// Text content (non-empty, at most `chunk_size` characters)
    pub text: String,
    /// Page index the majority of this chunk's text came from (0-based)
    pub page_index: u32,
    /// Character offset of this chunk in the concatenated document text
    pub source_offset: usize,
}

impl Chunk {
    pub fn new(text: impl Into<String>, page_index: u32, source_offset: usize) -> Self {
        Self {
            text: text.into(),
            page_index,
            source_offset,
        }
    }
}

/// Outcome of an ingest call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IngestStatus {
    /// Document was extracted, chunked, embedded, and indexed
    Success,
    /// Document contained no extractable text; nothing was indexed
    Empty,
    /// Ingest failed; see message
    Error,
}

/// Report returned by `ingest`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestReport {
    /// Outcome status
    pub status: IngestStatus,
    /// Number of chunks indexed
    pub chunk_count: usize,
    /// Error message when status is `Error`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl IngestReport {
    /// Successful ingest with the given chunk count
    pub fn success(chunk_count: usize) -> Self {
        Self {
            status: IngestStatus::Success,
            chunk_count,
            message: None,
        }
    }

    /// Empty-document outcome (distinct from an error)
    pub fn empty() -> Self {
        Self {
            status: IngestStatus::Empty,
            chunk_count: 0,
            message: None,
        }
    }

    /// Failed ingest with a message
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: IngestStatus::Error,
            chunk_count: 0,
            message: Some(message.into()),
        }
    }
}

/// Result of an `ask` call: the answer plus formatted citations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnswerResult {
    /// Answer text (may be the fixed no-document or refusal sentinel)
    pub answer: String,
    /// Formatted citation strings in relevance order, at most k entries
    pub sources: Vec<String>,
}

impl AnswerResult {
    pub fn new(answer: impl Into<String>, sources: Vec<String>) -> Self {
        Self {
            answer: answer.into(),
            sources,
        }
    }
}
