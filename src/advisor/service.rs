//! Advisor service wrapping the generation gateway.
//!
//! Every public operation returns a structured value, in failure too; the
//! HTTP layer never needs exception handling beyond reading the tags.

use std::sync::Arc;

use serde::Serialize;

use super::prompt;
use crate::llm::GenerationProvider;
use crate::rag::Retriever;
use crate::storage::{FundSource, FundStore};

/// How the context for a generation call was produced.
///
/// `Semantic` is the RAG path; `FullScan` is the degraded fallback that
/// dumps the whole record store, bounded only by database size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextStrategy {
    Semantic,
    FullScan,
}

impl ContextStrategy {
    pub fn as_str(self) -> &'static str {
        match self {
            ContextStrategy::Semantic => "rag",
            ContextStrategy::FullScan => "full_context",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Answer {
    pub answer: String,
    pub source: String,
    pub confidence: String,
    pub model: String,
    pub retrieval_method: String,
    pub fund_sources: Vec<FundSource>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Comparison {
    pub comparison: String,
    pub source: String,
    pub model: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Advice {
    pub advice: String,
    pub source: String,
    pub model: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Explanation {
    pub explanation: String,
    pub term: String,
    pub source: String,
    pub model: String,
}

const NOT_CONFIGURED: &str =
    "The AI assistant is not configured. Set GEMINI_API_KEY in the environment to enable it.";

pub struct AdvisorService {
    generator: Option<Arc<dyn GenerationProvider>>,
    retriever: Arc<Retriever>,
    records: FundStore,
}

impl AdvisorService {
    pub fn new(
        generator: Option<Arc<dyn GenerationProvider>>,
        retriever: Arc<Retriever>,
        records: FundStore,
    ) -> Self {
        Self {
            generator,
            retriever,
            records,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.generator.is_some()
    }

    fn select_strategy(&self, use_rag: bool) -> ContextStrategy {
        if use_rag && self.retriever.is_enabled() {
            ContextStrategy::Semantic
        } else {
            ContextStrategy::FullScan
        }
    }

    /// Build the fund context for a query under the selected strategy.
    async fn build_context(&self, query: &str, use_rag: bool) -> (String, ContextStrategy) {
        let strategy = self.select_strategy(use_rag);
        let context = match strategy {
            ContextStrategy::Semantic => self.retriever.get_relevant_context(query, 3, 2).await,
            ContextStrategy::FullScan => match self.records.full_context().await {
                Ok(context) => context,
                Err(err) => {
                    tracing::warn!("Full-scan context failed: {err}");
                    String::new()
                }
            },
        };
        (context, strategy)
    }

    /// Funds whose names appear in the supplied context, with source URLs.
    async fn extract_fund_sources(&self, context: &str) -> Vec<FundSource> {
        let sources = match self.records.fund_sources().await {
            Ok(sources) => sources,
            Err(err) => {
                tracing::warn!("Source extraction failed: {err}");
                return Vec::new();
            }
        };

        let context_lower = context.to_lowercase();
        sources
            .into_iter()
            .filter(|source| context_lower.contains(&source.fund_name.to_lowercase()))
            .collect()
    }

    pub async fn answer_question(
        &self,
        question: &str,
        use_context: bool,
        use_rag: bool,
    ) -> Answer {
        let Some(generator) = self.generator.as_ref() else {
            return Answer {
                answer: NOT_CONFIGURED.to_string(),
                source: "error".to_string(),
                confidence: "low".to_string(),
                model: "none".to_string(),
                retrieval_method: "none".to_string(),
                fund_sources: Vec::new(),
            };
        };

        let (prompt, retrieval_method, context) = if use_context {
            let (context, strategy) = self.build_context(question, use_rag).await;
            (
                prompt::answer_prompt(&context, question),
                strategy.as_str().to_string(),
                context,
            )
        } else {
            (
                prompt::generic_prompt(question),
                "none".to_string(),
                String::new(),
            )
        };

        match generator.generate(&prompt).await {
            Ok(answer) => {
                let fund_sources = self.extract_fund_sources(&context).await;
                Answer {
                    answer,
                    source: generator.model_id().to_string(),
                    confidence: "high".to_string(),
                    model: generator.model_id().to_string(),
                    retrieval_method,
                    fund_sources,
                }
            }
            Err(err) => {
                tracing::warn!("Answer generation failed: {err}");
                Answer {
                    answer: format!("Error generating answer: {err}"),
                    source: "error".to_string(),
                    confidence: "low".to_string(),
                    model: "none".to_string(),
                    retrieval_method: "error".to_string(),
                    fund_sources: Vec::new(),
                }
            }
        }
    }

    pub async fn compare_funds(&self, fund_names: &[String]) -> Comparison {
        let Some(generator) = self.generator.as_ref() else {
            return Comparison {
                comparison: NOT_CONFIGURED.to_string(),
                source: "error".to_string(),
                model: "none".to_string(),
            };
        };

        let query = fund_names.join(" ");
        let (context, _strategy) = self.build_context(&query, true).await;
        let prompt = prompt::compare_prompt(&context, &fund_names.join(", "));

        match generator.generate(&prompt).await {
            Ok(comparison) => Comparison {
                comparison,
                source: generator.model_id().to_string(),
                model: generator.model_id().to_string(),
            },
            Err(err) => {
                tracing::warn!("Comparison generation failed: {err}");
                Comparison {
                    comparison: format!("Error generating comparison: {err}"),
                    source: "error".to_string(),
                    model: "none".to_string(),
                }
            }
        }
    }

    pub async fn get_investment_advice(
        &self,
        amount: i64,
        risk_appetite: &str,
        duration: &str,
    ) -> Advice {
        let Some(generator) = self.generator.as_ref() else {
            return Advice {
                advice: NOT_CONFIGURED.to_string(),
                source: "error".to_string(),
                model: "none".to_string(),
            };
        };

        let query = format!("investment advice {risk_appetite} risk {duration} duration");
        let (context, _strategy) = self.build_context(&query, true).await;
        let prompt = prompt::advice_prompt(&context, amount, risk_appetite, duration);

        match generator.generate(&prompt).await {
            Ok(advice) => Advice {
                advice,
                source: generator.model_id().to_string(),
                model: generator.model_id().to_string(),
            },
            Err(err) => {
                tracing::warn!("Advice generation failed: {err}");
                Advice {
                    advice: format!("Error generating advice: {err}"),
                    source: "error".to_string(),
                    model: "none".to_string(),
                }
            }
        }
    }

    pub async fn explain_term(&self, term: &str) -> Explanation {
        let Some(generator) = self.generator.as_ref() else {
            return Explanation {
                explanation: NOT_CONFIGURED.to_string(),
                term: term.to_string(),
                source: "error".to_string(),
                model: "none".to_string(),
            };
        };

        let prompt = prompt::explain_prompt(term);
        match generator.generate(&prompt).await {
            Ok(explanation) => Explanation {
                explanation,
                term: term.to_string(),
                source: generator.model_id().to_string(),
                model: generator.model_id().to_string(),
            },
            Err(err) => {
                tracing::warn!("Term explanation failed: {err}");
                Explanation {
                    explanation: format!("Error generating explanation: {err}"),
                    term: term.to_string(),
                    source: "error".to_string(),
                    model: "none".to_string(),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use async_trait::async_trait;

    use super::*;
    use crate::core::errors::RagError;
    use crate::rag::SqliteVectorStore;
    use crate::storage::{FaqRecord, FundUpsert};

    struct StubGenerator;

    #[async_trait]
    impl GenerationProvider for StubGenerator {
        fn model_id(&self) -> &str {
            "stub-model"
        }

        async fn generate(&self, _prompt: &str) -> Result<String, RagError> {
            Ok("A helpful answer.".to_string())
        }
    }

    struct TimeoutGenerator;

    #[async_trait]
    impl GenerationProvider for TimeoutGenerator {
        fn model_id(&self) -> &str {
            "stub-model"
        }

        async fn generate(&self, _prompt: &str) -> Result<String, RagError> {
            Err(RagError::Generation("deadline exceeded".to_string()))
        }
    }

    async fn seeded_records(dir: &tempfile::TempDir) -> FundStore {
        let records = FundStore::with_path(dir.path().join("funds.db"))
            .await
            .unwrap();
        records
            .save_fund(&FundUpsert {
                fund_name: "Mid Cap Fund".to_string(),
                source_url: "https://example.com/mid-cap".to_string(),
                expense_ratio: Some("0.75%".to_string()),
                returns: BTreeMap::from([("1Y".to_string(), "28.5%".to_string())]),
                faqs: vec![FaqRecord {
                    question: "What is the minimum SIP amount?".to_string(),
                    answer: "₹500 per month.".to_string(),
                }],
                ..Default::default()
            })
            .await
            .unwrap();
        records
    }

    async fn advisor_with(
        generator: Option<Arc<dyn GenerationProvider>>,
        dir: &tempfile::TempDir,
    ) -> AdvisorService {
        let records = seeded_records(dir).await;
        let index = Arc::new(
            SqliteVectorStore::with_path(dir.path().join("vectors.db"))
                .await
                .unwrap(),
        );
        // Retrieval disabled; the advisor falls back to the full dump.
        let retriever = Arc::new(Retriever::new(None, index));
        AdvisorService::new(generator, retriever, records)
    }

    #[tokio::test]
    async fn unconfigured_advisor_returns_fixed_low_confidence_answer() {
        let dir = tempfile::tempdir().unwrap();
        let advisor = advisor_with(None, &dir).await;

        let answer = advisor.answer_question("What is SIP?", true, true).await;
        assert_eq!(answer.source, "error");
        assert_eq!(answer.confidence, "low");
        assert_eq!(answer.retrieval_method, "none");
        assert!(!answer.answer.is_empty());
    }

    #[tokio::test]
    async fn disabled_retrieval_selects_full_scan() {
        let dir = tempfile::tempdir().unwrap();
        let advisor = advisor_with(Some(Arc::new(StubGenerator)), &dir).await;

        let answer = advisor.answer_question("What is SIP?", true, true).await;
        assert_eq!(answer.retrieval_method, "full_context");
        assert_eq!(answer.confidence, "high");
        assert_eq!(answer.model, "stub-model");
        // The full dump names the seeded fund, so it is cited as a source.
        assert_eq!(answer.fund_sources.len(), 1);
        assert_eq!(answer.fund_sources[0].fund_name, "Mid Cap Fund");
    }

    #[tokio::test]
    async fn no_context_mode_skips_retrieval() {
        let dir = tempfile::tempdir().unwrap();
        let advisor = advisor_with(Some(Arc::new(StubGenerator)), &dir).await;

        let answer = advisor.answer_question("What is SIP?", false, true).await;
        assert_eq!(answer.retrieval_method, "none");
        assert!(answer.fund_sources.is_empty());
    }

    #[tokio::test]
    async fn generation_timeout_becomes_error_tagged_answer() {
        let dir = tempfile::tempdir().unwrap();
        let advisor = advisor_with(Some(Arc::new(TimeoutGenerator)), &dir).await;

        let answer = advisor.answer_question("What is SIP?", true, true).await;
        assert_eq!(answer.source, "error");
        assert_eq!(answer.confidence, "low");
        assert!(answer.answer.contains("deadline exceeded"));
    }

    #[tokio::test]
    async fn sibling_operations_wrap_failures_uniformly() {
        let dir = tempfile::tempdir().unwrap();
        let advisor = advisor_with(Some(Arc::new(TimeoutGenerator)), &dir).await;

        let comparison = advisor
            .compare_funds(&["Mid Cap Fund".to_string(), "Small Cap Fund".to_string()])
            .await;
        assert_eq!(comparison.source, "error");

        let advice = advisor.get_investment_advice(10000, "moderate", "long").await;
        assert_eq!(advice.source, "error");

        let explanation = advisor.explain_term("NAV").await;
        assert_eq!(explanation.source, "error");
        assert_eq!(explanation.term, "NAV");
    }
}
