use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use thiserror::Error;

/// Failure kinds for the retrieval, indexing and generation pipelines.
///
/// Callers match on the variant rather than string contents; the payload is
/// only the underlying cause, kept for logs and API bodies.
#[derive(Debug, Error)]
pub enum RagError {
    /// No embedding/generation credentials are configured. Degrade, don't crash.
    #[error("embedding service not configured")]
    ConfigurationMissing,
    /// A single embedding call failed (network, auth, rate limit, bad input).
    #[error("embedding request failed: {0}")]
    Embedding(String),
    /// The vector index could not be read or written. Fatal to the current
    /// operation, not to the process.
    #[error("vector index unavailable: {0}")]
    IndexUnavailable(String),
    /// The generation call failed (timeout, quota, malformed response).
    #[error("generation request failed: {0}")]
    Generation(String),
    /// A record store query failed.
    #[error("record store query failed: {0}")]
    Storage(String),
    /// An indexing run produced zero documents.
    #[error("no documents were indexed")]
    NothingIndexed,
}

impl RagError {
    pub fn embedding<E: std::fmt::Display>(err: E) -> Self {
        RagError::Embedding(err.to_string())
    }

    pub fn index<E: std::fmt::Display>(err: E) -> Self {
        RagError::IndexUnavailable(err.to_string())
    }

    pub fn generation<E: std::fmt::Display>(err: E) -> Self {
        RagError::Generation(err.to_string())
    }

    pub fn storage<E: std::fmt::Display>(err: E) -> Self {
        RagError::Storage(err.to_string())
    }
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("service unavailable: {0}")]
    ServiceUnavailable(String),
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn internal<E: std::fmt::Display>(err: E) -> Self {
        ApiError::Internal(err.to_string())
    }
}

impl From<RagError> for ApiError {
    fn from(err: RagError) -> Self {
        match err {
            RagError::ConfigurationMissing => {
                ApiError::ServiceUnavailable("embedding service not configured".to_string())
            }
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match &self {
            ApiError::ServiceUnavailable(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg.clone()),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
        };

        let body = Json(json!({ "error": message }));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configuration_missing_maps_to_service_unavailable() {
        let api: ApiError = RagError::ConfigurationMissing.into();
        assert!(matches!(api, ApiError::ServiceUnavailable(_)));
    }

    #[test]
    fn other_rag_errors_map_to_internal() {
        let api: ApiError = RagError::Embedding("rate limited".to_string()).into();
        match api {
            ApiError::Internal(msg) => assert!(msg.contains("rate limited")),
            other => panic!("unexpected mapping: {other:?}"),
        }
    }
}
