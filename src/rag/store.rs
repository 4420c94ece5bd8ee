//! VectorStore trait, the abstract interface over the vector index.
//!
//! Two logical collections, each mapping a document id to its canonical
//! text, embedding and metadata. Collections are durable: they survive
//! process restarts and are only rebuilt on explicit request.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::core::errors::RagError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collection {
    Faqs,
    Funds,
}

impl Collection {
    pub fn as_str(self) -> &'static str {
        match self {
            Collection::Faqs => "faqs",
            Collection::Funds => "funds",
        }
    }
}

impl std::fmt::Display for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The unit stored in the vector index.
///
/// `doc_id` is a deterministic function of the source row's primary key, so
/// re-indexing the same entity overwrites instead of duplicating.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexedDocument {
    pub doc_id: String,
    pub content: String,
    pub metadata: serde_json::Value,
}

/// One similarity-search hit. `score` is cosine similarity pinned to [0, 1].
#[derive(Debug, Clone)]
pub struct SearchHit {
    pub document: IndexedDocument,
    pub score: f32,
}

#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Insert or replace the document under its id. Safe to call repeatedly
    /// with the same id.
    async fn upsert(
        &self,
        collection: Collection,
        document: IndexedDocument,
        embedding: Vec<f32>,
    ) -> Result<(), RagError>;

    /// Upsert several documents in one transaction.
    async fn upsert_batch(
        &self,
        collection: Collection,
        items: Vec<(IndexedDocument, Vec<f32>)>,
    ) -> Result<(), RagError>;

    /// Up to `limit` nearest documents by cosine similarity. Asking for more
    /// documents than exist returns all of them, never an error.
    async fn search(
        &self,
        collection: Collection,
        query_embedding: &[f32],
        limit: usize,
    ) -> Result<Vec<SearchHit>, RagError>;

    async fn count(&self, collection: Collection) -> Result<usize, RagError>;

    /// Drop every document in the collection. Only used for forced rebuilds.
    async fn clear(&self, collection: Collection) -> Result<usize, RagError>;
}
