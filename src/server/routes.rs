//! HTTP routes carrying the two pipeline operations

use axum::{
    extract::{Multipart, State},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::server::state::AppState;
use crate::types::{AnswerResult, IngestReport};

/// POST /ingest - Upload and index a document
///
/// Pipeline failures are reported in-band as `status: "error"` so the UI
/// shell can key its message off the outcome rather than transport codes.
pub async fn ingest(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<IngestReport>> {
    let mut file: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| Error::Internal(format!("Failed to read multipart field: {}", e)))?
    {
        let filename = field
            .file_name()
            .map(|s| s.to_string())
            .unwrap_or_else(|| format!("upload_{}.pdf", Uuid::new_v4()));

        let data = field
            .bytes()
            .await
            .map_err(|e| Error::Internal(format!("Failed to read file: {}", e)))?;

        file = Some((filename, data.to_vec()));
    }

    let (filename, data) =
        file.ok_or_else(|| Error::Internal("No file in upload".to_string()))?;

    match state.pipeline().ingest(&filename, &data).await {
        Ok(report) => Ok(Json(report)),
        Err(Error::IngestBusy) => Err(Error::IngestBusy),
        Err(e) => {
            tracing::error!("Ingest of '{}' failed: {}", filename, e);
            Ok(Json(IngestReport::error(e.to_string())))
        }
    }
}

/// Request body for /ask
#[derive(Debug, Deserialize)]
pub struct AskRequest {
    /// The question to answer ("query" accepted for older clients)
    #[serde(alias = "query")]
    pub question: String,
}

/// Response body for /ask
#[derive(Debug, Serialize)]
pub struct AskResponse {
    pub answer: String,
    pub sources: Vec<String>,
}

impl From<AnswerResult> for AskResponse {
    fn from(result: AnswerResult) -> Self {
        Self {
            answer: result.answer,
            sources: result.sources,
        }
    }
}

/// POST /ask - Answer a question about the current document
pub async fn ask(
    State(state): State<AppState>,
    Json(request): Json<AskRequest>,
) -> Result<Json<AskResponse>> {
    let result = state.pipeline().ask(&request.question).await?;
    Ok(Json(result.into()))
}

/// GET /status - Current document and chunk count
pub async fn status(State(state): State<AppState>) -> Json<serde_json::Value> {
    let document = state.pipeline().current_document();
    Json(serde_json::json!({
        "document": document,
        "chunk_count": state.pipeline().chunk_count(),
    }))
}
