//! Indexing pipeline: record store -> canonical text -> embedding -> index.
//!
//! Both entry points are idempotent and restartable. An already-populated
//! collection is left alone unless a forced rebuild is requested, because
//! every document costs one remote embedding call.

use std::sync::Arc;

use serde::Serialize;
use serde_json::json;

use super::store::{Collection, IndexedDocument, VectorStore};
use crate::core::errors::RagError;
use crate::llm::EmbeddingProvider;
use crate::storage::{FundStore, FundTextRow};

/// Result of one pipeline run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum IndexOutcome {
    /// Collection already populated and no rebuild was forced.
    AlreadyIndexed { existing: usize },
    /// Documents written this run; `skipped` counts entities whose
    /// embedding failed and were left out.
    Indexed { indexed: usize, skipped: usize },
}

pub struct IndexingPipeline {
    embedder: Option<Arc<dyn EmbeddingProvider>>,
    index: Arc<dyn VectorStore>,
    records: FundStore,
}

impl IndexingPipeline {
    pub fn new(
        embedder: Option<Arc<dyn EmbeddingProvider>>,
        index: Arc<dyn VectorStore>,
        records: FundStore,
    ) -> Self {
        Self {
            embedder,
            index,
            records,
        }
    }

    pub async fn index_faqs(&self, force_reindex: bool) -> Result<IndexOutcome, RagError> {
        let embedder = self
            .embedder
            .as_ref()
            .ok_or(RagError::ConfigurationMissing)?;

        let existing = self.index.count(Collection::Faqs).await?;
        if existing > 0 && !force_reindex {
            tracing::info!("FAQs already indexed ({existing} documents)");
            return Ok(IndexOutcome::AlreadyIndexed { existing });
        }
        if force_reindex && existing > 0 {
            let cleared = self.index.clear(Collection::Faqs).await?;
            tracing::info!("Cleared {cleared} FAQ documents for re-indexing");
        }

        let rows = self.records.faq_rows().await.map_err(RagError::storage)?;

        let mut items = Vec::with_capacity(rows.len());
        let mut skipped = 0usize;
        for row in &rows {
            let text = render_faq_text(&row.question, &row.answer);
            let embedding = match embedder.embed_document(&text).await {
                Ok(embedding) => embedding,
                Err(err) => {
                    tracing::warn!("Skipping FAQ {}: {err}", row.faq_id);
                    skipped += 1;
                    continue;
                }
            };

            items.push((
                IndexedDocument {
                    doc_id: format!("faq_{}", row.faq_id),
                    content: text,
                    metadata: json!({
                        "fund_name": row.fund_name,
                        "question": row.question,
                        "answer": row.answer,
                        "type": "faq",
                    }),
                },
                embedding,
            ));
        }

        if items.is_empty() {
            tracing::warn!("No FAQs indexed ({} rows read, {skipped} skipped)", rows.len());
            return Err(RagError::NothingIndexed);
        }

        let indexed = items.len();
        self.index.upsert_batch(Collection::Faqs, items).await?;
        tracing::info!("Indexed {indexed} FAQs ({skipped} skipped)");

        Ok(IndexOutcome::Indexed { indexed, skipped })
    }

    pub async fn index_funds(&self, force_reindex: bool) -> Result<IndexOutcome, RagError> {
        let embedder = self
            .embedder
            .as_ref()
            .ok_or(RagError::ConfigurationMissing)?;

        let existing = self.index.count(Collection::Funds).await?;
        if existing > 0 && !force_reindex {
            tracing::info!("Funds already indexed ({existing} documents)");
            return Ok(IndexOutcome::AlreadyIndexed { existing });
        }
        if force_reindex && existing > 0 {
            let cleared = self.index.clear(Collection::Funds).await?;
            tracing::info!("Cleared {cleared} fund documents for re-indexing");
        }

        let rows = self
            .records
            .fund_text_rows()
            .await
            .map_err(RagError::storage)?;

        let mut items = Vec::with_capacity(rows.len());
        let mut skipped = 0usize;
        for row in &rows {
            let text = render_fund_text(row);
            let embedding = match embedder.embed_document(&text).await {
                Ok(embedding) => embedding,
                Err(err) => {
                    tracing::warn!("Skipping fund {}: {err}", row.fund_id);
                    skipped += 1;
                    continue;
                }
            };

            items.push((
                IndexedDocument {
                    doc_id: format!("fund_{}", row.fund_id),
                    content: text,
                    metadata: json!({
                        "fund_name": row.fund_name,
                        "fund_manager": row.fund_manager.clone().unwrap_or_default(),
                        "expense_ratio": row.expense_ratio.clone().unwrap_or_default(),
                        "riskometer": row.riskometer.clone().unwrap_or_default(),
                        "benchmark": row.benchmark.clone().unwrap_or_default(),
                        "type": "fund",
                    }),
                },
                embedding,
            ));
        }

        if items.is_empty() {
            tracing::warn!("No funds indexed ({} rows read, {skipped} skipped)", rows.len());
            return Err(RagError::NothingIndexed);
        }

        let indexed = items.len();
        self.index.upsert_batch(Collection::Funds, items).await?;
        tracing::info!("Indexed {indexed} funds ({skipped} skipped)");

        Ok(IndexOutcome::Indexed { indexed, skipped })
    }
}

/// Canonical text for one FAQ entry; the same entry always renders to the
/// same text, and thus the same vector, until the row changes.
pub(crate) fn render_faq_text(question: &str, answer: &str) -> String {
    format!("Question: {question}\nAnswer: {answer}")
}

/// Canonical line-per-attribute text for one fund; absent values drop the
/// whole line.
pub(crate) fn render_fund_text(fund: &FundTextRow) -> String {
    let mut parts = vec![format!("Fund Name: {}", fund.fund_name)];

    if let Some(fund_manager) = &fund.fund_manager {
        parts.push(format!("Fund Manager: {fund_manager}"));
    }
    if let Some(expense_ratio) = &fund.expense_ratio {
        parts.push(format!("Expense Ratio: {expense_ratio}"));
    }
    if let Some(riskometer) = &fund.riskometer {
        parts.push(format!("Risk Level: {riskometer}"));
    }
    if let Some(returns_text) = &fund.returns_text {
        parts.push(format!("Returns: {returns_text}"));
    }
    if let Some(aum) = &fund.aum {
        parts.push(format!("AUM: {aum}"));
    }
    if let Some(benchmark) = &fund.benchmark {
        parts.push(format!("Benchmark: {benchmark}"));
    }
    if let Some(minimum_sip) = &fund.minimum_sip {
        parts.push(format!("Minimum SIP: {minimum_sip}"));
    }
    if let Some(minimum_lumpsum) = &fund.minimum_lumpsum {
        parts.push(format!("Minimum Lumpsum: {minimum_lumpsum}"));
    }

    parts.join("\n")
}
