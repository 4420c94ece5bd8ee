use async_trait::async_trait;

use crate::core::errors::RagError;

/// Which side of an asymmetric embedding model a text is embedded for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmbeddingKind {
    Document,
    Query,
}

#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// model identifier, for logging and response tagging
    fn model_id(&self) -> &str;

    /// embed a non-empty text; the text is sent as-is, never truncated, so
    /// callers trim long inputs themselves. All transport and provider
    /// failures surface as `RagError::Embedding`
    async fn embed(&self, text: &str, kind: EmbeddingKind) -> Result<Vec<f32>, RagError>;

    async fn embed_document(&self, text: &str) -> Result<Vec<f32>, RagError> {
        self.embed(text, EmbeddingKind::Document).await
    }

    async fn embed_query(&self, text: &str) -> Result<Vec<f32>, RagError> {
        self.embed(text, EmbeddingKind::Query).await
    }
}

#[async_trait]
pub trait GenerationProvider: Send + Sync {
    fn model_id(&self) -> &str;

    /// single-shot completion for a fully assembled prompt
    async fn generate(&self, prompt: &str) -> Result<String, RagError>;
}
