//! PDF text extraction with per-page output
//!
//! Primary path is pdf-extract's page-wise API; lopdf is used for the page
//! count and as a last-resort text source when pdf-extract chokes on a file.

use crate::error::{Error, Result};
use crate::ingestion::{DocumentParser, ParsedDocument};
use crate::types::PageText;

/// PDF parser producing per-page text
pub struct PdfParser;

impl PdfParser {
    pub fn new() -> Self {
        Self
    }

    /// Extract per-page text via pdf-extract
    fn extract_pages(filename: &str, data: &[u8]) -> Result<Vec<String>> {
        pdf_extract::extract_text_from_mem_by_pages(data)
            .map_err(|e| Error::extraction(filename, e.to_string()))
    }

    /// Fallback: whole-document extraction, reported as a single page
    fn extract_whole(filename: &str, data: &[u8]) -> Result<Vec<String>> {
        let text = pdf_extract::extract_text_from_mem(data)
            .map_err(|e| Error::extraction(filename, e.to_string()))?;
        Ok(vec![text])
    }

    /// Normalize extracted page text: strip null bytes, trim lines, drop
    /// blank lines left behind by the layout pass.
    fn cleanup(text: &str) -> String {
        text.replace('\0', "")
            .lines()
            .map(|l| l.trim())
            .filter(|l| !l.is_empty())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Default for PdfParser {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentParser for PdfParser {
    fn parse(&self, filename: &str, data: &[u8]) -> Result<ParsedDocument> {
        let raw_pages = match Self::extract_pages(filename, data) {
            Ok(pages) => pages,
            Err(e) => {
                tracing::warn!("Page-wise extraction failed ({}), trying whole-document", e);
                Self::extract_whole(filename, data)?
            }
        };

        let total_pages = match lopdf::Document::load_mem(data) {
            Ok(doc) => doc.get_pages().len() as u32,
            Err(_) => raw_pages.len() as u32,
        };

        let pages: Vec<PageText> = raw_pages
            .iter()
            .enumerate()
            .filter_map(|(i, text)| {
                let cleaned = Self::cleanup(text);
                if cleaned.is_empty() {
                    None
                } else {
                    Some(PageText::new(i as u32, cleaned))
                }
            })
            .collect();

        tracing::debug!(
            "Extracted {} text pages of {} from '{}'",
            pages.len(),
            total_pages,
            filename
        );

        Ok(ParsedDocument { pages, total_pages })
    }
}
