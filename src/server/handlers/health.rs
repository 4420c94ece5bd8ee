use std::sync::Arc;

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;

use crate::core::errors::ApiError;
use crate::rag::{Collection, VectorStore};
use crate::state::AppState;

pub async fn health(State(_state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

pub async fn get_status(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse, ApiError> {
    let stats = state.records.stats().await?;
    let indexed_faqs = state.vector_index.count(Collection::Faqs).await?;
    let indexed_funds = state.vector_index.count(Collection::Funds).await?;

    Ok(Json(json!({
        "rag_enabled": state.retriever.is_enabled(),
        "ai_enabled": state.advisor.is_enabled(),
        "funds": stats.funds,
        "faqs": stats.faqs,
        "indexed_faqs": indexed_faqs,
        "indexed_funds": indexed_funds,
    })))
}
