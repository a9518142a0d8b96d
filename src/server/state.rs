//! Application state for the HTTP server

use std::sync::Arc;

use crate::pipeline::RagPipeline;

/// Shared application state: the pipeline behind the two operations
#[derive(Clone)]
pub struct AppState {
    pipeline: Arc<RagPipeline>,
}

impl AppState {
    pub fn new(pipeline: Arc<RagPipeline>) -> Self {
        Self { pipeline }
    }

    pub fn pipeline(&self) -> &RagPipeline {
        &self.pipeline
    }
}
