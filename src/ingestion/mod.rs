//! Document ingestion: text extraction and chunking

pub mod chunker;
pub mod pdf;

pub use chunker::TextChunker;
pub use pdf::PdfParser;

use crate::error::Result;
use crate::types::PageText;

/// Text extracted from a document, one entry per page in page order
#[derive(Debug, Clone)]
pub struct ParsedDocument {
    /// Per-page text (pages with no extractable text are omitted)
    pub pages: Vec<PageText>,
    /// Total pages in the source file, including ones without text
    pub total_pages: u32,
}

impl ParsedDocument {
    /// True when no page produced any text
    pub fn is_empty(&self) -> bool {
        self.pages.iter().all(|p| p.text.trim().is_empty())
    }
}

/// Extracts per-page text from a document's raw bytes
///
/// The production implementation is [`PdfParser`]; tests substitute a stub
/// that returns canned pages.
pub trait DocumentParser: Send + Sync {
    /// Extract per-page text from the file bytes
    fn parse(&self, filename: &str, data: &[u8]) -> Result<ParsedDocument>;
}
