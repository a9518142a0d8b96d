//! Text chunking with page attribution
//!
//! Splits per-page document text into overlapping, size-bounded chunks.
//! The size and overlap invariants are exact; the split point itself is a
//! soft preference for whitespace so facts are less likely to straddle a
//! chunk boundary mid-word.

use std::collections::HashMap;

use crate::types::{Chunk, PageText};

/// Text chunker with configurable size and overlap
pub struct TextChunker {
    /// Maximum chunk size in characters
    chunk_size: usize,
    /// Characters of look-back between consecutive chunks
    overlap: usize,
}

impl TextChunker {
    /// Create a new chunker
    ///
    /// The overlap is clamped below the chunk size so the window always
    /// makes forward progress.
    pub fn new(chunk_size: usize, overlap: usize) -> Self {
        let chunk_size = chunk_size.max(1);
        let overlap = if overlap >= chunk_size {
            tracing::warn!(
                "chunk_overlap {} >= chunk_size {}, clamping",
                overlap,
                chunk_size
            );
            chunk_size - 1
        } else {
            overlap
        };

        Self {
            chunk_size,
            overlap,
        }
    }

    /// Split per-page text into chunks
    ///
    /// Pages are concatenated with their boundaries retained as metadata;
    /// each emitted chunk records the page index of the majority of its
    /// source text. An empty document yields zero chunks.
    pub fn split(&self, pages: &[PageText]) -> Vec<Chunk> {
        // Concatenate page text, tracking the source page of every character.
        let mut chars: Vec<char> = Vec::new();
        let mut page_of: Vec<u32> = Vec::new();

        for page in pages {
            if page.text.trim().is_empty() {
                continue;
            }
            // Separate pages with a newline, attributed to the earlier page.
            if !chars.is_empty() {
                chars.push('\n');
                page_of.push(page_of[page_of.len() - 1]);
            }
            for c in page.text.chars() {
                chars.push(c);
                page_of.push(page.page_index);
            }
        }

        if chars.is_empty() {
            return Vec::new();
        }

        let mut chunks = Vec::new();
        let mut start = 0usize;

        loop {
            let remaining = chars.len() - start;

            if remaining <= self.chunk_size {
                self.push_chunk(&mut chunks, &chars, &page_of, start, chars.len());
                break;
            }

            let hard_end = start + self.chunk_size;
            let end = self.soft_break(&chars, start, hard_end);
            self.push_chunk(&mut chunks, &chars, &page_of, start, end);

            // Slide the window back by the overlap so consecutive chunks
            // share exactly `overlap` characters.
            start = end - self.overlap;
        }

        chunks
    }

    /// Prefer to end the chunk just after a whitespace character
    ///
    /// Searches backwards from `hard_end`, but never past the point where
    /// the next window would stop advancing.
    fn soft_break(&self, chars: &[char], start: usize, hard_end: usize) -> usize {
        let floor = start + self.overlap + 1;

        for pos in (floor..=hard_end).rev() {
            if chars[pos - 1].is_whitespace() {
                return pos;
            }
        }

        hard_end
    }

    fn push_chunk(
        &self,
        chunks: &mut Vec<Chunk>,
        chars: &[char],
        page_of: &[u32],
        start: usize,
        end: usize,
    ) {
        let text: String = chars[start..end].iter().collect();
        if text.trim().is_empty() {
            return;
        }

        chunks.push(Chunk::new(
            text,
            majority_page(&page_of[start..end]),
            start,
        ));
    }
}

/// Page index covering the most characters of the span, lower page on ties
fn majority_page(pages: &[u32]) -> u32 {
    let mut counts: HashMap<u32, usize> = HashMap::new();
    for &p in pages {
        *counts.entry(p).or_insert(0) += 1;
    }

    counts
        .into_iter()
        .max_by(|a, b| a.1.cmp(&b.1).then(b.0.cmp(&a.0)))
        .map(|(page, _)| page)
        .unwrap_or(0)
}
