use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;

use crate::core::errors::ApiError;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct SearchParams {
    pub q: String,
}

pub async fn list_funds(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse, ApiError> {
    let funds = state.records.list_funds().await?;
    Ok(Json(funds))
}

pub async fn fund_detail(
    State(state): State<Arc<AppState>>,
    Path(fund_id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let detail = state
        .records
        .fund_detail(fund_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("fund {fund_id} not found")))?;
    Ok(Json(detail))
}

pub async fn search_funds(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> Result<impl IntoResponse, ApiError> {
    if params.q.trim().is_empty() {
        return Err(ApiError::BadRequest("query must not be empty".to_string()));
    }
    let funds = state.records.search_funds(&params.q).await?;
    Ok(Json(funds))
}

pub async fn search_faqs(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> Result<impl IntoResponse, ApiError> {
    if params.q.trim().is_empty() {
        return Err(ApiError::BadRequest("query must not be empty".to_string()));
    }
    let faqs = state.records.search_faqs_text(&params.q).await?;
    Ok(Json(faqs))
}

pub async fn stats(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse, ApiError> {
    let stats = state.records.stats().await?;
    Ok(Json(stats))
}
