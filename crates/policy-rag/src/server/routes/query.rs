//! Batch query endpoint

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};

use crate::error::{Error, Result};
use crate::server::state::AppState;
use crate::types::{BatchRequest, BatchResult};

/// POST /api/query (also /hackrx/run) - Answer questions about one document
pub async fn run_batch(
    State(state): State<AppState>,
    payload: std::result::Result<Json<BatchRequest>, JsonRejection>,
) -> Result<Json<BatchResult>> {
    let Json(request) = payload.map_err(|rejection| {
        Error::invalid_input(format!("Invalid request body: {}", rejection.body_text()))
    })?;

    let questions = match request.questions {
        Some(questions) if !questions.is_empty() => questions,
        _ => {
            return Err(Error::invalid_input(
                "Missing required field: questions must be a non-empty array",
            ))
        }
    };

    let document_text = resolve_document(&state, request.document_text, request.documents).await?;

    tracing::info!("Batch request with {} questions", questions.len());

    let result = state.pipeline().run(&document_text, &questions).await?;
    Ok(Json(result))
}

/// Inline text wins over a document URL
async fn resolve_document(
    state: &AppState,
    document_text: Option<String>,
    url: Option<String>,
) -> Result<String> {
    if let Some(text) = document_text.filter(|t| !t.trim().is_empty()) {
        return Ok(text);
    }

    match url.filter(|u| !u.trim().is_empty()) {
        Some(url) => state.fetcher().fetch_text(url.trim()).await,
        None => Err(Error::invalid_input(
            "Missing required field: provide documents (URL) or document_text",
        )),
    }
}
