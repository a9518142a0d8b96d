//! documate: document Q&A with retrieval-augmented, citation-backed answers
//!
//! Upload a PDF, ask natural-language questions about it, and get answers
//! grounded in the document's text together with citations to the supporting
//! passages. The crate holds one document at a time: each ingest builds a
//! fresh index generation and atomically replaces the previous one.

pub mod config;
pub mod error;
pub mod generation;
pub mod index;
pub mod ingestion;
pub mod pipeline;
pub mod providers;
pub mod retrieval;
pub mod server;
pub mod types;

pub use config::RagConfig;
pub use error::{Error, Result};
pub use pipeline::RagPipeline;
pub use types::{AnswerResult, Chunk, Document, IngestReport, IngestStatus, PageText};
