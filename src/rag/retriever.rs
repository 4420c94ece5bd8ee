//! Retrieval pipeline: free-text query -> ranked hits -> bounded context.
//!
//! FAQ and fund searches embed the query and fail independently; a failure
//! on either side yields an empty group, never an error to the caller.

use std::sync::Arc;

use serde::Serialize;

use super::store::{Collection, IndexedDocument, VectorStore};
use crate::llm::EmbeddingProvider;

/// Fixed sentinel returned when retrieval is disabled or nothing matched.
/// Callers treat this as a valid outcome and fall back to another context
/// source.
pub const NO_CONTEXT_SENTINEL: &str = "No relevant context found.";

#[derive(Debug, Clone, Serialize)]
pub struct FaqHit {
    pub fund_name: String,
    pub question: String,
    pub answer: String,
    pub relevance_score: f32,
}

#[derive(Debug, Clone, Serialize)]
pub struct FundHit {
    pub fund_name: String,
    pub fund_manager: String,
    pub expense_ratio: String,
    pub riskometer: String,
    pub benchmark: String,
    pub relevance_score: f32,
}

pub struct Retriever {
    embedder: Option<Arc<dyn EmbeddingProvider>>,
    index: Arc<dyn VectorStore>,
}

impl Retriever {
    pub fn new(embedder: Option<Arc<dyn EmbeddingProvider>>, index: Arc<dyn VectorStore>) -> Self {
        Self { embedder, index }
    }

    /// Whether semantic retrieval is available at all (credentials present).
    pub fn is_enabled(&self) -> bool {
        self.embedder.is_some()
    }

    async fn query_vector(&self, query: &str) -> Option<Vec<f32>> {
        let embedder = self.embedder.as_ref()?;
        match embedder.embed_query(query).await {
            Ok(vector) => Some(vector),
            Err(err) => {
                tracing::warn!("Query embedding failed: {err}");
                None
            }
        }
    }

    async fn search(&self, collection: Collection, query: &str, n_results: usize) -> Vec<(IndexedDocument, f32)> {
        let Some(vector) = self.query_vector(query).await else {
            return Vec::new();
        };

        match self.index.search(collection, &vector, n_results).await {
            Ok(hits) => hits
                .into_iter()
                .map(|hit| (hit.document, hit.score))
                .collect(),
            Err(err) => {
                tracing::warn!("Search in {collection} failed: {err}");
                Vec::new()
            }
        }
    }

    pub async fn search_faqs(&self, query: &str, n_results: usize) -> Vec<FaqHit> {
        self.search(Collection::Faqs, query, n_results)
            .await
            .into_iter()
            .map(|(document, score)| FaqHit {
                fund_name: meta_str(&document, "fund_name"),
                question: meta_str(&document, "question"),
                answer: meta_str(&document, "answer"),
                relevance_score: score,
            })
            .collect()
    }

    pub async fn search_funds(&self, query: &str, n_results: usize) -> Vec<FundHit> {
        self.search(Collection::Funds, query, n_results)
            .await
            .into_iter()
            .map(|(document, score)| FundHit {
                fund_name: meta_str(&document, "fund_name"),
                fund_manager: meta_str(&document, "fund_manager"),
                expense_ratio: meta_str(&document, "expense_ratio"),
                riskometer: meta_str(&document, "riskometer"),
                benchmark: meta_str(&document, "benchmark"),
                relevance_score: score,
            })
            .collect()
    }

    /// Assemble the context block for a query: FAQ hits first (they are
    /// higher-precision evidence than raw fund attributes), then fund hits,
    /// each group in descending similarity. Empty groups are omitted; if
    /// both are empty the fixed sentinel is returned.
    pub async fn get_relevant_context(&self, query: &str, n_faqs: usize, n_funds: usize) -> String {
        let faqs = self.search_faqs(query, n_faqs).await;
        let funds = self.search_funds(query, n_funds).await;

        let mut parts: Vec<String> = Vec::new();

        if !faqs.is_empty() {
            parts.push("Relevant FAQs:".to_string());
            for (i, faq) in faqs.iter().enumerate() {
                parts.push(format!("\n{}. Fund: {}", i + 1, faq.fund_name));
                parts.push(format!("   Q: {}", faq.question));
                parts.push(format!("   A: {}", faq.answer));
            }
        }

        if !funds.is_empty() {
            if !parts.is_empty() {
                parts.push("\n".to_string());
            }
            parts.push("Relevant Funds:".to_string());
            for (i, fund) in funds.iter().enumerate() {
                parts.push(format!("\n{}. {}", i + 1, fund.fund_name));
                parts.push(format!("   Manager: {}", fund.fund_manager));
                parts.push(format!("   Expense Ratio: {}", fund.expense_ratio));
                parts.push(format!("   Risk: {}", fund.riskometer));
            }
        }

        if parts.is_empty() {
            NO_CONTEXT_SENTINEL.to_string()
        } else {
            parts.join("\n")
        }
    }
}

fn meta_str(document: &IndexedDocument, key: &str) -> String {
    document
        .metadata
        .get(key)
        .and_then(|v| v.as_str())
        .unwrap_or_default()
        .to_string()
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use serde_json::json;

    use super::*;
    use crate::core::errors::RagError;
    use crate::llm::EmbeddingKind;
    use crate::rag::sqlite::SqliteVectorStore;

    /// Maps known texts to fixed unit vectors so ranking is predictable.
    struct KeywordEmbedder;

    fn vector_for(text: &str) -> Vec<f32> {
        let lower = text.to_lowercase();
        if lower.contains("sip") || lower.contains("monthly") {
            vec![1.0, 0.0, 0.0]
        } else if lower.contains("expense") {
            vec![0.0, 1.0, 0.0]
        } else {
            vec![0.0, 0.0, 1.0]
        }
    }

    #[async_trait]
    impl EmbeddingProvider for KeywordEmbedder {
        fn model_id(&self) -> &str {
            "keyword-embedder"
        }

        async fn embed(&self, text: &str, _kind: EmbeddingKind) -> Result<Vec<f32>, RagError> {
            Ok(vector_for(text))
        }
    }

    struct FailingEmbedder;

    #[async_trait]
    impl EmbeddingProvider for FailingEmbedder {
        fn model_id(&self) -> &str {
            "failing-embedder"
        }

        async fn embed(&self, _text: &str, _kind: EmbeddingKind) -> Result<Vec<f32>, RagError> {
            Err(RagError::Embedding("stub failure".to_string()))
        }
    }

    fn faq_doc(id: &str, fund: &str, question: &str, answer: &str) -> IndexedDocument {
        IndexedDocument {
            doc_id: id.to_string(),
            content: format!("Question: {question}\nAnswer: {answer}"),
            metadata: json!({
                "fund_name": fund,
                "question": question,
                "answer": answer,
                "type": "faq",
            }),
        }
    }

    fn fund_doc(id: &str, fund: &str) -> IndexedDocument {
        IndexedDocument {
            doc_id: id.to_string(),
            content: format!("Fund Name: {fund}"),
            metadata: json!({
                "fund_name": fund,
                "fund_manager": "A. Manager",
                "expense_ratio": "0.75%",
                "riskometer": "Very High",
                "benchmark": "Nifty Midcap 150 TRI",
                "type": "fund",
            }),
        }
    }

    async fn seeded_index() -> (Arc<SqliteVectorStore>, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let index = Arc::new(
            SqliteVectorStore::with_path(dir.path().join("vectors.db"))
                .await
                .unwrap(),
        );

        let sip = faq_doc(
            "faq_1",
            "Mid Cap Fund",
            "What is the minimum SIP amount?",
            "The minimum SIP amount is ₹500 per month.",
        );
        let expense = faq_doc(
            "faq_2",
            "Mid Cap Fund",
            "What is the expense ratio?",
            "The expense ratio is 0.75%.",
        );
        let exit = faq_doc(
            "faq_3",
            "Small Cap Fund",
            "What is the exit load?",
            "1% if redeemed within 1 year.",
        );

        for doc in [sip, expense, exit] {
            let embedding = vector_for(&doc.content);
            index
                .upsert(Collection::Faqs, doc, embedding)
                .await
                .unwrap();
        }

        let fund = fund_doc("fund_1", "Mid Cap Fund");
        let embedding = vector_for(&fund.content);
        index
            .upsert(Collection::Funds, fund, embedding)
            .await
            .unwrap();

        (index, dir)
    }

    #[tokio::test]
    async fn sip_question_ranks_sip_faq_first() {
        let (index, _dir) = seeded_index().await;
        let retriever = Retriever::new(Some(Arc::new(KeywordEmbedder)), index);

        let hits = retriever
            .search_faqs("How much do I need to invest monthly?", 3)
            .await;

        assert_eq!(hits.len(), 3);
        assert!(hits[0].question.contains("SIP"));
        assert!(hits[0].relevance_score >= hits[1].relevance_score);
        for hit in &hits {
            assert!(hit.relevance_score >= 0.0 && hit.relevance_score <= 1.0);
        }
    }

    #[tokio::test]
    async fn context_renders_faqs_before_funds() {
        let (index, _dir) = seeded_index().await;
        let retriever = Retriever::new(Some(Arc::new(KeywordEmbedder)), index);

        let context = retriever
            .get_relevant_context("What is the minimum SIP amount?", 2, 1)
            .await;

        let faq_pos = context.find("Relevant FAQs:").unwrap();
        let fund_pos = context.find("Relevant Funds:").unwrap();
        assert!(faq_pos < fund_pos);
        assert!(context.contains("Q: What is the minimum SIP amount?"));
        assert!(context.contains("Manager: A. Manager"));
    }

    #[tokio::test]
    async fn disabled_retrieval_returns_sentinel() {
        let dir = tempfile::tempdir().unwrap();
        let index = Arc::new(
            SqliteVectorStore::with_path(dir.path().join("vectors.db"))
                .await
                .unwrap(),
        );
        let retriever = Retriever::new(None, index);

        assert!(!retriever.is_enabled());
        let context = retriever.get_relevant_context("anything", 3, 2).await;
        assert_eq!(context, NO_CONTEXT_SENTINEL);
    }

    #[tokio::test]
    async fn embedding_failure_yields_empty_groups_and_sentinel() {
        let (index, _dir) = seeded_index().await;
        let retriever = Retriever::new(Some(Arc::new(FailingEmbedder)), index);

        assert!(retriever.search_faqs("anything", 3).await.is_empty());
        let context = retriever.get_relevant_context("anything", 3, 2).await;
        assert_eq!(context, NO_CONTEXT_SENTINEL);
    }

    #[tokio::test]
    async fn empty_index_returns_sentinel_not_error() {
        let dir = tempfile::tempdir().unwrap();
        let index = Arc::new(
            SqliteVectorStore::with_path(dir.path().join("vectors.db"))
                .await
                .unwrap(),
        );
        let retriever = Retriever::new(Some(Arc::new(KeywordEmbedder)), index);

        let context = retriever.get_relevant_context("anything", 3, 2).await;
        assert_eq!(context, NO_CONTEXT_SENTINEL);
    }
}
