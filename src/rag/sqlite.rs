//! Sqlite-backed vector index.
//!
//! In-process store using sqlite for documents and brute-force cosine
//! similarity for search. Collections share one table, namespaced by the
//! `collection` column; the file persists across restarts.

use std::path::PathBuf;

use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::{Row, SqlitePool};

use super::store::{Collection, IndexedDocument, SearchHit, VectorStore};
use crate::core::config::AppPaths;
use crate::core::errors::RagError;

pub struct SqliteVectorStore {
    pool: SqlitePool,
}

impl SqliteVectorStore {
    pub async fn new(paths: &AppPaths) -> Result<Self, RagError> {
        Self::with_path(paths.vector_db_path.clone()).await
    }

    pub async fn with_path(db_path: PathBuf) -> Result<Self, RagError> {
        let options = SqliteConnectOptions::new()
            .filename(&db_path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal);

        let pool = SqlitePoolOptions::new()
            .min_connections(1)
            .max_connections(4)
            .connect_with(options)
            .await
            .map_err(RagError::index)?;

        let store = Self { pool };
        store.init_schema().await?;
        Ok(store)
    }

    async fn init_schema(&self) -> Result<(), RagError> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS vector_documents (
                collection TEXT NOT NULL,
                doc_id TEXT NOT NULL,
                content TEXT NOT NULL,
                metadata TEXT NOT NULL DEFAULT '{}',
                embedding BLOB NOT NULL,
                created_at TEXT NOT NULL DEFAULT (STRFTIME('%Y-%m-%dT%H:%M:%fZ', 'now')),
                PRIMARY KEY (collection, doc_id)
            )",
        )
        .execute(&self.pool)
        .await
        .map_err(RagError::index)?;

        Ok(())
    }

    fn serialize_embedding(embedding: &[f32]) -> Vec<u8> {
        embedding.iter().flat_map(|f| f.to_le_bytes()).collect()
    }

    fn deserialize_embedding(bytes: &[u8]) -> Vec<f32> {
        bytes
            .chunks_exact(4)
            .map(|chunk| f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
            .collect()
    }

    /// Cosine similarity floored at zero. The metric is pinned here so
    /// relevance scores stay in [0, 1] and are comparable across runs no
    /// matter which backend produced the vectors.
    fn relevance(a: &[f32], b: &[f32]) -> f32 {
        if a.len() != b.len() || a.is_empty() {
            return 0.0;
        }

        let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
        let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
        let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
        let denom = norm_a * norm_b;

        if denom <= f32::EPSILON {
            0.0
        } else {
            (dot / denom).clamp(0.0, 1.0)
        }
    }

    fn row_to_document(row: &sqlx::sqlite::SqliteRow) -> IndexedDocument {
        let metadata_str: String = row.get("metadata");
        let metadata = serde_json::from_str(&metadata_str)
            .unwrap_or(serde_json::Value::Object(Default::default()));

        IndexedDocument {
            doc_id: row.get("doc_id"),
            content: row.get("content"),
            metadata,
        }
    }

    async fn write_one(
        &self,
        executor: &mut sqlx::SqliteConnection,
        collection: Collection,
        document: &IndexedDocument,
        embedding: &[f32],
    ) -> Result<(), RagError> {
        let blob = Self::serialize_embedding(embedding);
        let metadata_str =
            serde_json::to_string(&document.metadata).unwrap_or_else(|_| "{}".to_string());

        sqlx::query(
            "INSERT OR REPLACE INTO vector_documents (collection, doc_id, content, metadata, embedding)
             VALUES (?1, ?2, ?3, ?4, ?5)",
        )
        .bind(collection.as_str())
        .bind(&document.doc_id)
        .bind(&document.content)
        .bind(&metadata_str)
        .bind(&blob)
        .execute(executor)
        .await
        .map_err(RagError::index)?;

        Ok(())
    }
}

#[async_trait]
impl VectorStore for SqliteVectorStore {
    async fn upsert(
        &self,
        collection: Collection,
        document: IndexedDocument,
        embedding: Vec<f32>,
    ) -> Result<(), RagError> {
        let mut conn = self.pool.acquire().await.map_err(RagError::index)?;
        self.write_one(&mut *conn, collection, &document, &embedding)
            .await
    }

    async fn upsert_batch(
        &self,
        collection: Collection,
        items: Vec<(IndexedDocument, Vec<f32>)>,
    ) -> Result<(), RagError> {
        if items.is_empty() {
            return Ok(());
        }

        let mut tx = self.pool.begin().await.map_err(RagError::index)?;
        for (document, embedding) in &items {
            self.write_one(&mut *tx, collection, document, embedding)
                .await?;
        }
        tx.commit().await.map_err(RagError::index)?;

        Ok(())
    }

    async fn search(
        &self,
        collection: Collection,
        query_embedding: &[f32],
        limit: usize,
    ) -> Result<Vec<SearchHit>, RagError> {
        if limit == 0 {
            return Ok(Vec::new());
        }

        let rows = sqlx::query(
            "SELECT doc_id, content, metadata, embedding
             FROM vector_documents
             WHERE collection = ?1",
        )
        .bind(collection.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(RagError::index)?;

        let mut scored: Vec<SearchHit> = rows
            .iter()
            .map(|row| {
                let embedding_bytes: Vec<u8> = row.get("embedding");
                let stored = Self::deserialize_embedding(&embedding_bytes);
                SearchHit {
                    document: Self::row_to_document(row),
                    score: Self::relevance(query_embedding, &stored),
                }
            })
            .collect();

        // Descending score; exact ties break by doc id so repeated searches
        // return the same order.
        scored.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.document.doc_id.cmp(&b.document.doc_id))
        });
        scored.truncate(limit);

        Ok(scored)
    }

    async fn count(&self, collection: Collection) -> Result<usize, RagError> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM vector_documents WHERE collection = ?1")
                .bind(collection.as_str())
                .fetch_one(&self.pool)
                .await
                .map_err(RagError::index)?;

        Ok(count as usize)
    }

    async fn clear(&self, collection: Collection) -> Result<usize, RagError> {
        let result = sqlx::query("DELETE FROM vector_documents WHERE collection = ?1")
            .bind(collection.as_str())
            .execute(&self.pool)
            .await
            .map_err(RagError::index)?;

        Ok(result.rows_affected() as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn test_store() -> (SqliteVectorStore, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let store = SqliteVectorStore::with_path(dir.path().join("vectors.db"))
            .await
            .unwrap();
        (store, dir)
    }

    fn doc(id: &str, content: &str) -> IndexedDocument {
        IndexedDocument {
            doc_id: id.to_string(),
            content: content.to_string(),
            metadata: serde_json::json!({ "type": "faq" }),
        }
    }

    #[tokio::test]
    async fn upsert_is_idempotent_overwrite() {
        let (store, _dir) = test_store().await;

        store
            .upsert(Collection::Faqs, doc("faq_1", "first"), vec![1.0, 0.0])
            .await
            .unwrap();
        store
            .upsert(Collection::Faqs, doc("faq_1", "second"), vec![0.0, 1.0])
            .await
            .unwrap();

        assert_eq!(store.count(Collection::Faqs).await.unwrap(), 1);
        let hits = store
            .search(Collection::Faqs, &[0.0, 1.0], 5)
            .await
            .unwrap();
        assert_eq!(hits[0].document.content, "second");
    }

    #[tokio::test]
    async fn search_ranks_by_similarity_and_clamps_limit() {
        let (store, _dir) = test_store().await;

        store
            .upsert_batch(
                Collection::Faqs,
                vec![
                    (doc("faq_1", "far"), vec![0.0, 1.0]),
                    (doc("faq_2", "near"), vec![1.0, 0.1]),
                    (doc("faq_3", "mid"), vec![0.7, 0.7]),
                ],
            )
            .await
            .unwrap();

        let hits = store
            .search(Collection::Faqs, &[1.0, 0.0], 10)
            .await
            .unwrap();

        assert_eq!(hits.len(), 3);
        assert_eq!(hits[0].document.doc_id, "faq_2");
        assert_eq!(hits[1].document.doc_id, "faq_3");
        for hit in &hits {
            assert!(hit.score >= 0.0 && hit.score <= 1.0);
        }
    }

    #[tokio::test]
    async fn search_ties_break_by_doc_id() {
        let (store, _dir) = test_store().await;

        // Identical vectors, so identical scores.
        store
            .upsert_batch(
                Collection::Funds,
                vec![
                    (doc("fund_2", "b"), vec![1.0, 0.0]),
                    (doc("fund_1", "a"), vec![1.0, 0.0]),
                    (doc("fund_3", "c"), vec![1.0, 0.0]),
                ],
            )
            .await
            .unwrap();

        for _ in 0..3 {
            let hits = store
                .search(Collection::Funds, &[1.0, 0.0], 10)
                .await
                .unwrap();
            let ids: Vec<&str> = hits.iter().map(|h| h.document.doc_id.as_str()).collect();
            assert_eq!(ids, vec!["fund_1", "fund_2", "fund_3"]);
        }
    }

    #[tokio::test]
    async fn empty_collection_search_returns_empty() {
        let (store, _dir) = test_store().await;

        let hits = store
            .search(Collection::Funds, &[1.0, 0.0, 0.0], 5)
            .await
            .unwrap();
        assert!(hits.is_empty());
    }

    #[tokio::test]
    async fn collections_are_independent() {
        let (store, _dir) = test_store().await;

        store
            .upsert(Collection::Faqs, doc("faq_1", "faq"), vec![1.0])
            .await
            .unwrap();
        store
            .upsert(Collection::Funds, doc("fund_1", "fund"), vec![1.0])
            .await
            .unwrap();

        assert_eq!(store.count(Collection::Faqs).await.unwrap(), 1);
        assert_eq!(store.count(Collection::Funds).await.unwrap(), 1);

        let cleared = store.clear(Collection::Faqs).await.unwrap();
        assert_eq!(cleared, 1);
        assert_eq!(store.count(Collection::Faqs).await.unwrap(), 0);
        assert_eq!(store.count(Collection::Funds).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn opposed_vectors_floor_at_zero() {
        let (store, _dir) = test_store().await;

        store
            .upsert(Collection::Faqs, doc("faq_1", "opposite"), vec![-1.0, 0.0])
            .await
            .unwrap();

        let hits = store
            .search(Collection::Faqs, &[1.0, 0.0], 1)
            .await
            .unwrap();
        assert_eq!(hits[0].score, 0.0);
    }
}
