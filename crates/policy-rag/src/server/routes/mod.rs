//! API routes for the policy Q&A server

pub mod query;

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};

use crate::server::state::AppState;

/// Build all API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/query", post(query::run_batch))
        .route("/info", get(info))
}

/// API info endpoint
async fn info(State(state): State<AppState>) -> Json<serde_json::Value> {
    let llm = state.pipeline().llm();

    Json(serde_json::json!({
        "name": "policy-rag",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Document Q&A with sentence-aware chunking and structured answers",
        "backend": llm.name(),
        "model": llm.model(),
        "system_version": state.config().pipeline.system_version,
        "endpoints": {
            "POST /api/query": "Answer a batch of questions about one document",
            "POST /hackrx/run": "Alias of POST /api/query",
            "GET /api/info": "Service information",
            "GET /health": "Liveness check",
            "GET /ready": "Model backend readiness"
        }
    }))
}
