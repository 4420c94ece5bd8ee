use std::sync::Arc;

use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;

use crate::core::errors::ApiError;
use crate::state::AppState;

fn default_true() -> bool {
    true
}

#[derive(Deserialize)]
pub struct AskRequest {
    pub question: String,
    #[serde(default = "default_true")]
    pub use_context: bool,
    #[serde(default = "default_true")]
    pub use_rag: bool,
}

pub async fn ask(
    State(state): State<Arc<AppState>>,
    Json(request): Json<AskRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if request.question.trim().is_empty() {
        return Err(ApiError::BadRequest("question must not be empty".to_string()));
    }

    let answer = state
        .advisor
        .answer_question(&request.question, request.use_context, request.use_rag)
        .await;
    Ok(Json(answer))
}

#[derive(Deserialize)]
pub struct CompareParams {
    /// Comma-separated fund names.
    pub funds: String,
}

pub async fn compare(
    State(state): State<Arc<AppState>>,
    Query(params): Query<CompareParams>,
) -> Result<impl IntoResponse, ApiError> {
    let fund_names: Vec<String> = params
        .funds
        .split(',')
        .map(|name| name.trim().to_string())
        .filter(|name| !name.is_empty())
        .collect();
    if fund_names.len() < 2 {
        return Err(ApiError::BadRequest(
            "provide at least two fund names, comma-separated".to_string(),
        ));
    }

    let comparison = state.advisor.compare_funds(&fund_names).await;
    Ok(Json(comparison))
}

#[derive(Deserialize)]
pub struct AdviceRequest {
    pub amount: i64,
    pub risk_appetite: String,
    pub duration: String,
}

pub async fn advice(
    State(state): State<Arc<AppState>>,
    Json(request): Json<AdviceRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if request.amount <= 0 {
        return Err(ApiError::BadRequest("amount must be positive".to_string()));
    }

    let advice = state
        .advisor
        .get_investment_advice(request.amount, &request.risk_appetite, &request.duration)
        .await;
    Ok(Json(advice))
}

#[derive(Deserialize)]
pub struct ExplainParams {
    pub term: String,
}

pub async fn explain(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ExplainParams>,
) -> Result<impl IntoResponse, ApiError> {
    if params.term.trim().is_empty() {
        return Err(ApiError::BadRequest("term must not be empty".to_string()));
    }

    let explanation = state.advisor.explain_term(&params.term).await;
    Ok(Json(explanation))
}
