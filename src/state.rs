use std::sync::Arc;

use thiserror::Error;

use crate::catalog::{Catalog, CatalogError};
use crate::chain::{AnswerChain, ChainConfig};
use crate::core::config::{AppConfig, AppPaths, ConfigService};
use crate::core::errors::ApiError;
use crate::history::ConversationLog;
use crate::llm::{LlmProvider, OpenAiCompatProvider};
use crate::query::QueryHandler;
use crate::rag::{self, ChunkerConfig, SqliteVectorStore, VectorStore};

#[derive(Debug, Error)]
pub enum InitializationError {
    #[error("Error loading configuration: {0}")]
    Config(ApiError),
    #[error("Error loading dataset: {0}")]
    Catalog(#[from] CatalogError),
    #[error("Error initializing model provider: {0}")]
    Llm(String),
    #[error("Error setting up RAG pipeline: {0}")]
    Index(ApiError),
}

/// Global application state shared across all routes.
///
/// Contains:
/// - Configuration and paths
/// - The loaded catalog and its vector index
/// - The LLM provider and query handler
/// - The shared conversation log (process lifetime, no per-user isolation)
pub struct AppState {
    pub paths: Arc<AppPaths>,
    pub config: AppConfig,
    pub config_service: ConfigService,
    pub catalog: Arc<Catalog>,
    pub store: Arc<dyn VectorStore>,
    pub provider: Arc<dyn LlmProvider>,
    pub history: ConversationLog,
    pub query_handler: QueryHandler,
}

impl AppState {
    /// Initializes the application state.
    ///
    /// 1. Load configuration and secrets
    /// 2. Load and validate the catalog CSV (fatal on bad prices)
    /// 3. Open the index store and rebuild it wholesale
    /// 4. Wire the answer chain and query handler
    pub async fn initialize(paths: Arc<AppPaths>) -> Result<Arc<Self>, InitializationError> {
        let config_service = ConfigService::new(paths.clone());
        let config = config_service.load().map_err(InitializationError::Config)?;

        let csv_path = if config.dataset.csv_path.is_absolute() {
            config.dataset.csv_path.clone()
        } else {
            paths.project_root.join(&config.dataset.csv_path)
        };
        let catalog = Arc::new(Catalog::load(&csv_path)?);
        tracing::info!("Loaded {} catalog rows from {}", catalog.len(), csv_path.display());

        let api_key = config.llm.api_key.clone().ok_or_else(|| {
            InitializationError::Llm(
                "missing API key: set GROQ_API_KEY or add llm.api_key to secrets.yaml".to_string(),
            )
        })?;
        let provider: Arc<dyn LlmProvider> = Arc::new(OpenAiCompatProvider::new(
            "groq",
            config.llm.base_url.clone(),
            api_key,
        ));

        let store: Arc<dyn VectorStore> = Arc::new(
            SqliteVectorStore::new(&paths)
                .await
                .map_err(InitializationError::Index)?,
        );

        let chunker = ChunkerConfig {
            chunk_size: config.rag.chunk_size,
            chunk_overlap: config.rag.chunk_overlap,
        };
        rag::rebuild_index(
            store.as_ref(),
            provider.as_ref(),
            &catalog,
            chunker,
            &config.llm.embedding_model,
        )
        .await
        .map_err(InitializationError::Index)?;

        let history = ConversationLog::new();
        let chain = AnswerChain::new(
            store.clone(),
            provider.clone(),
            ChainConfig {
                chat_model: config.llm.chat_model.clone(),
                embedding_model: config.llm.embedding_model.clone(),
                top_k: config.rag.top_k,
                temperature: config.llm.temperature,
                max_tokens: config.llm.max_tokens,
            },
        );
        let query_handler = QueryHandler::new(catalog.clone(), chain, history.clone());

        Ok(Arc::new(AppState {
            paths,
            config,
            config_service,
            catalog,
            store,
            provider,
            history,
            query_handler,
        }))
    }
}
