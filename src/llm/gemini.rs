//! Gemini API client implementing both gateway traits.
//!
//! Talks to the generativelanguage REST API with a plain reqwest client.
//! The request timeout configured here is the effective bound for every
//! pipeline call; the pipelines themselves impose none.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};

use super::provider::{EmbeddingKind, EmbeddingProvider, GenerationProvider};
use crate::core::errors::RagError;

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

impl EmbeddingKind {
    fn task_type(self) -> &'static str {
        match self {
            EmbeddingKind::Document => "RETRIEVAL_DOCUMENT",
            EmbeddingKind::Query => "RETRIEVAL_QUERY",
        }
    }
}

#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    base_url: String,
    api_key: String,
    generation_model: String,
    embedding_model: String,
}

impl GeminiClient {
    pub fn new(api_key: String, generation_model: String, embedding_model: String) -> Self {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_default();

        Self {
            client,
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key,
            generation_model,
            embedding_model,
        }
    }

    #[cfg(test)]
    pub(crate) fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    async fn post_json(&self, url: &str, body: &Value) -> Result<Value, reqwest::Error> {
        let res = self
            .client
            .post(url)
            .header("x-goog-api-key", &self.api_key)
            .json(body)
            .send()
            .await?
            .error_for_status()?;
        res.json().await
    }
}

#[async_trait]
impl EmbeddingProvider for GeminiClient {
    fn model_id(&self) -> &str {
        &self.embedding_model
    }

    async fn embed(&self, text: &str, kind: EmbeddingKind) -> Result<Vec<f32>, RagError> {
        if text.trim().is_empty() {
            return Err(RagError::Embedding("empty input text".to_string()));
        }

        let url = format!(
            "{}/models/{}:embedContent",
            self.base_url, self.embedding_model
        );
        let body = json!({
            "model": format!("models/{}", self.embedding_model),
            "content": { "parts": [{ "text": text }] },
            "taskType": kind.task_type(),
        });

        let payload = self
            .post_json(&url, &body)
            .await
            .map_err(RagError::embedding)?;

        extract_embedding(&payload)
            .ok_or_else(|| RagError::Embedding("response carried no embedding values".to_string()))
    }
}

#[async_trait]
impl GenerationProvider for GeminiClient {
    fn model_id(&self) -> &str {
        &self.generation_model
    }

    async fn generate(&self, prompt: &str) -> Result<String, RagError> {
        if prompt.trim().is_empty() {
            return Err(RagError::Generation("empty prompt".to_string()));
        }

        let url = format!(
            "{}/models/{}:generateContent",
            self.base_url, self.generation_model
        );
        let body = json!({
            "contents": [{ "parts": [{ "text": prompt }] }],
        });

        let payload = self
            .post_json(&url, &body)
            .await
            .map_err(RagError::generation)?;

        extract_text(&payload)
            .ok_or_else(|| RagError::Generation("response carried no candidate text".to_string()))
    }
}

fn extract_embedding(payload: &Value) -> Option<Vec<f32>> {
    let values = payload["embedding"]["values"].as_array()?;
    let embedding: Vec<f32> = values
        .iter()
        .filter_map(|v| v.as_f64().map(|f| f as f32))
        .collect();
    if embedding.is_empty() {
        None
    } else {
        Some(embedding)
    }
}

fn extract_text(payload: &Value) -> Option<String> {
    let text = payload["candidates"][0]["content"]["parts"][0]["text"].as_str()?;
    let text = text.trim();
    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_client() -> GeminiClient {
        GeminiClient::new(
            "test-key".to_string(),
            "gemini-2.0-flash".to_string(),
            "text-embedding-004".to_string(),
        )
        // unroutable address so an accidental network call fails fast
        .with_base_url("http://127.0.0.1:1".to_string())
    }

    #[tokio::test]
    async fn embed_rejects_empty_input_without_network() {
        let client = test_client();
        let err = client.embed("   ", EmbeddingKind::Document).await.unwrap_err();
        assert!(matches!(err, RagError::Embedding(_)));
    }

    #[tokio::test]
    async fn generate_rejects_empty_prompt_without_network() {
        let client = test_client();
        let err = client.generate("").await.unwrap_err();
        assert!(matches!(err, RagError::Generation(_)));
    }

    #[test]
    fn extract_embedding_reads_values() {
        let payload = serde_json::json!({
            "embedding": { "values": [0.25, -0.5, 1.0] }
        });
        let embedding = extract_embedding(&payload).unwrap();
        assert_eq!(embedding, vec![0.25, -0.5, 1.0]);
    }

    #[test]
    fn extract_embedding_rejects_missing_values() {
        let payload = serde_json::json!({ "embedding": {} });
        assert!(extract_embedding(&payload).is_none());
    }

    #[test]
    fn extract_text_reads_first_candidate() {
        let payload = serde_json::json!({
            "candidates": [{
                "content": { "parts": [{ "text": "  an answer  " }] }
            }]
        });
        assert_eq!(extract_text(&payload).unwrap(), "an answer");
    }

    #[test]
    fn extract_text_rejects_empty_candidates() {
        let payload = serde_json::json!({ "candidates": [] });
        assert!(extract_text(&payload).is_none());
    }
}
