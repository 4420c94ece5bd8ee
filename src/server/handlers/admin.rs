use std::sync::Arc;

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::core::errors::{ApiError, RagError};
use crate::rag::IndexOutcome;
use crate::state::AppState;

#[derive(Deserialize, Default)]
pub struct ReindexRequest {
    #[serde(default)]
    pub force: bool,
}

fn outcome_json(result: Result<IndexOutcome, RagError>) -> Value {
    match result {
        Ok(outcome) => serde_json::to_value(outcome).unwrap_or_else(|_| json!({})),
        Err(err) => json!({ "status": "failed", "error": err.to_string() }),
    }
}

/// Operator-triggered rebuild of the vector index. Embedding every document
/// costs one remote call per document, so this never runs implicitly.
pub async fn reindex(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ReindexRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if !state.retriever.is_enabled() {
        return Err(ApiError::from(RagError::ConfigurationMissing));
    }

    let faqs = outcome_json(state.indexer.index_faqs(request.force).await);
    let funds = outcome_json(state.indexer.index_funds(request.force).await);

    Ok(Json(json!({ "faqs": faqs, "funds": funds })))
}
