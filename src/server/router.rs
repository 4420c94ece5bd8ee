use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::server::handlers::{admin, ai, funds, health};
use crate::state::AppState;

/// Main application router: CORS + trace middleware, fund data endpoints,
/// the AI operations and the operator-only reindex trigger.
pub fn router(state: Arc<AppState>) -> Router {
    let cors_layer = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health::health))
        .route("/api/status", get(health::get_status))
        .route("/api/funds", get(funds::list_funds))
        .route("/api/funds/:fund_id", get(funds::fund_detail))
        .route("/api/search", get(funds::search_funds))
        .route("/api/faq", get(funds::search_faqs))
        .route("/api/stats", get(funds::stats))
        .route("/api/ai/ask", post(ai::ask))
        .route("/api/ai/compare", get(ai::compare))
        .route("/api/ai/advice", post(ai::advice))
        .route("/api/ai/explain", get(ai::explain))
        .route("/api/admin/reindex", post(admin::reindex))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer)
        .with_state(state)
}
