//! Citation string formatting
//!
//! Each retrieved chunk becomes a single-line, quote-wrapped preview. The
//! page prefix is shown only when the retrieved set spans more than one
//! distinct page; a single-page result set reads cleaner without it.

use unicode_segmentation::UnicodeSegmentation;

use crate::index::ScoredChunk;
use crate::types::Chunk;

/// Maximum preview length in characters
pub const MAX_PREVIEW_LEN: usize = 250;

/// Format citations for a retrieved set, in relevance order
pub fn format_citations(retrieved: &[ScoredChunk]) -> Vec<String> {
    let show_pages = spans_multiple_pages(retrieved);

    retrieved
        .iter()
        .map(|scored| format_citation(&scored.chunk, show_pages))
        .collect()
}

/// True when the retrieved chunks come from more than one distinct page
pub fn spans_multiple_pages(retrieved: &[ScoredChunk]) -> bool {
    let mut first_page = None;
    for scored in retrieved {
        match first_page {
            None => first_page = Some(scored.chunk.page_index),
            Some(p) if p != scored.chunk.page_index => return true,
            Some(_) => {}
        }
    }
    false
}

/// Format one chunk as a citation string
pub fn format_citation(chunk: &Chunk, show_page: bool) -> String {
    let preview = clean_preview(&chunk.text);

    if show_page {
        // Pages are 0-indexed internally, 1-indexed for display.
        format!("Page {}: {}", chunk.page_index + 1, preview)
    } else {
        preview
    }
}

/// Collapse whitespace runs to single spaces, trim, truncate, quote-wrap
fn clean_preview(text: &str) -> String {
    let collapsed: String = text.split_whitespace().collect::<Vec<_>>().join(" ");

    let graphemes: Vec<&str> = collapsed.graphemes(true).collect();
    if graphemes.len() > MAX_PREVIEW_LEN {
        let truncated: String = graphemes[..MAX_PREVIEW_LEN].concat();
        format!("\u{201C}{}\u{2026}\u{201D}", truncated)
    } else {
        format!("\u{201C}{}\u{201D}", collapsed)
    }
}
