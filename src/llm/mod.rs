//! Gateways to the hosted embedding and generation models.

pub mod gemini;
pub mod provider;

pub use gemini::GeminiClient;
pub use provider::{EmbeddingKind, EmbeddingProvider, GenerationProvider};
