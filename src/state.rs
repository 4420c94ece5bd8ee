use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::advisor::AdvisorService;
use crate::core::config::{AppPaths, Settings};
use crate::llm::{EmbeddingProvider, GenerationProvider, GeminiClient};
use crate::rag::{IndexingPipeline, Retriever, SqliteVectorStore, VectorStore};
use crate::storage::FundStore;

/// Shared application state, constructed once at startup and handed to the
/// HTTP layer. Services receive their collaborators here, so tests can
/// build them with fakes instead of touching process-wide state.
pub struct AppState {
    pub paths: Arc<AppPaths>,
    pub settings: Settings,
    pub records: FundStore,
    pub vector_index: Arc<dyn VectorStore>,
    pub retriever: Arc<Retriever>,
    pub indexer: IndexingPipeline,
    pub advisor: AdvisorService,
    #[allow(dead_code)]
    pub started_at: DateTime<Utc>,
}

impl AppState {
    pub async fn initialize() -> anyhow::Result<Arc<Self>> {
        let settings = Settings::from_env();
        let paths = Arc::new(AppPaths::new());

        let records = FundStore::new(&paths).await?;
        let vector_index: Arc<dyn VectorStore> = Arc::new(SqliteVectorStore::new(&paths).await?);

        let gemini = settings.gemini_api_key.clone().map(|api_key| {
            Arc::new(GeminiClient::new(
                api_key,
                settings.generation_model.clone(),
                settings.embedding_model.clone(),
            ))
        });
        if gemini.is_none() {
            tracing::warn!("GEMINI_API_KEY not set; semantic retrieval and AI answers disabled");
        }

        let embedder: Option<Arc<dyn EmbeddingProvider>> =
            gemini.clone().map(|client| client as Arc<dyn EmbeddingProvider>);
        let generator: Option<Arc<dyn GenerationProvider>> =
            gemini.map(|client| client as Arc<dyn GenerationProvider>);

        let retriever = Arc::new(Retriever::new(embedder.clone(), vector_index.clone()));
        let indexer = IndexingPipeline::new(embedder, vector_index.clone(), records.clone());
        let advisor = AdvisorService::new(generator, retriever.clone(), records.clone());
        let started_at = Utc::now();

        Ok(Arc::new(AppState {
            paths,
            settings,
            records,
            vector_index,
            retriever,
            indexer,
            advisor,
            started_at,
        }))
    }
}
