//! End-to-end flow over the real SQLite index with a mocked provider:
//! load CSV → rebuild index → answer queries → fallback and history checks.

use std::io::Write;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;

use laprec_backend::catalog::Catalog;
use laprec_backend::chain::{AnswerChain, ChainConfig};
use laprec_backend::core::errors::ApiError;
use laprec_backend::history::ConversationLog;
use laprec_backend::llm::{ChatRequest, LlmProvider};
use laprec_backend::query::QueryHandler;
use laprec_backend::rag::{self, ChunkerConfig, SqliteVectorStore, VectorStore};

const CSV: &str = "\
Product Name,Specification,Price
Asus Vivobook,Intel i3 8 GB RAM 512 GB SSD,38990
HP Pavilion,Intel i5 16 GB RAM 1 TB HDD,55990
Dell Inspiron,Ryzen 5 16 GB RAM 512 GB SSD,61990
Lenovo Legion,Intel i7 16 GB RAM 1 TB SSD,69990
";

const REFUSAL: &str = "Sorry, no laptops found matching your criteria in the dataset.";

struct ScriptedProvider {
    reply: String,
    chat_calls: AtomicUsize,
    embed_calls: AtomicUsize,
}

impl ScriptedProvider {
    fn new(reply: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: reply.to_string(),
            chat_calls: AtomicUsize::new(0),
            embed_calls: AtomicUsize::new(0),
        })
    }
}

#[async_trait]
impl LlmProvider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn health_check(&self) -> Result<bool, ApiError> {
        Ok(true)
    }

    async fn chat(&self, _request: ChatRequest, _model_id: &str) -> Result<String, ApiError> {
        self.chat_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.reply.clone())
    }

    async fn embed(&self, inputs: &[String], _model_id: &str) -> Result<Vec<Vec<f32>>, ApiError> {
        self.embed_calls.fetch_add(1, Ordering::SeqCst);
        // Deterministic toy embedding: character-class counts.
        Ok(inputs
            .iter()
            .map(|text| {
                let digits = text.chars().filter(|c| c.is_ascii_digit()).count() as f32;
                let alpha = text.chars().filter(|c| c.is_alphabetic()).count() as f32;
                let len = text.chars().count() as f32;
                vec![digits + 1.0, alpha + 1.0, len + 1.0]
            })
            .collect())
    }
}

fn load_catalog() -> Arc<Catalog> {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(CSV.as_bytes()).unwrap();
    let catalog = Catalog::load(file.path()).unwrap();
    Arc::new(catalog)
}

async fn temp_store() -> Arc<SqliteVectorStore> {
    let db = std::env::temp_dir().join(format!("laprec-flow-{}.db", uuid::Uuid::new_v4()));
    Arc::new(SqliteVectorStore::with_path(db).await.unwrap())
}

async fn build_handler(
    provider: Arc<ScriptedProvider>,
) -> (QueryHandler, ConversationLog, Arc<SqliteVectorStore>) {
    let catalog = load_catalog();
    let store = temp_store().await;

    let indexed = rag::rebuild_index(
        store.as_ref(),
        provider.as_ref(),
        &catalog,
        ChunkerConfig::default(),
        "test-embed",
    )
    .await
    .unwrap();
    assert_eq!(indexed, catalog.len());

    let history = ConversationLog::new();
    let chain = AnswerChain::new(
        store.clone(),
        provider.clone(),
        ChainConfig {
            chat_model: "test-model".to_string(),
            embedding_model: "test-embed".to_string(),
            top_k: 5,
            temperature: 0.0,
            max_tokens: 500,
        },
    );
    let handler = QueryHandler::new(catalog, chain, history.clone());
    (handler, history, store)
}

#[tokio::test]
async fn index_is_rebuilt_wholesale_from_the_csv() {
    let provider = ScriptedProvider::new("ok");
    let (_handler, _history, store) = build_handler(provider.clone()).await;

    assert_eq!(store.count().await.unwrap(), 4);
    assert!(provider.embed_calls.load(Ordering::SeqCst) >= 1);

    // A second rebuild starts from a clean slate rather than accumulating.
    let catalog = load_catalog();
    rag::rebuild_index(
        store.as_ref(),
        provider.as_ref(),
        &catalog,
        ChunkerConfig::default(),
        "test-embed",
    )
    .await
    .unwrap();
    assert_eq!(store.count().await.unwrap(), 4);
}

#[tokio::test]
async fn model_answer_flows_through_and_lands_in_history() {
    let provider = ScriptedProvider::new("HP Pavilion fits your budget.");
    let (handler, history, _store) = build_handler(provider.clone()).await;

    let response = handler.handle("best laptop below 60000 Rs").await.unwrap();
    assert_eq!(response, "HP Pavilion fits your budget.");
    assert_eq!(provider.chat_calls.load(Ordering::SeqCst), 1);

    let turns = history.snapshot();
    assert_eq!(turns.len(), 1);
    assert_eq!(turns[0].question, "best laptop below 60000 Rs");
    assert_eq!(turns[0].response, "HP Pavilion fits your budget.");
}

#[tokio::test]
async fn refusal_falls_back_to_the_catalog_without_a_second_model_call() {
    let provider = ScriptedProvider::new(REFUSAL);
    let (handler, history, _store) = build_handler(provider.clone()).await;

    let response = handler.handle("laptops 50000 to 70000").await.unwrap();

    assert!(response.starts_with("Recommended laptops between ₹50000.00 and ₹70000.00:"));
    let lines: Vec<&str> = response.lines().skip(1).collect();
    assert_eq!(
        lines,
        vec![
            "HP Pavilion | Intel i5 16 GB RAM 1 TB HDD | ₹55990.00",
            "Dell Inspiron | Ryzen 5 16 GB RAM 512 GB SSD | ₹61990.00",
            "Lenovo Legion | Intel i7 16 GB RAM 1 TB SSD | ₹69990.00",
        ]
    );
    assert_eq!(provider.chat_calls.load(Ordering::SeqCst), 1);
    assert_eq!(history.len(), 1);
}

#[tokio::test]
async fn history_grows_by_one_entry_per_query_in_order() {
    let provider = ScriptedProvider::new("Noted.");
    let (handler, history, _store) = build_handler(provider.clone()).await;

    for (i, query) in ["first", "second", "third"].iter().enumerate() {
        handler.handle(query).await.unwrap();
        assert_eq!(history.len(), i + 1);
    }

    let questions: Vec<String> = history
        .snapshot()
        .into_iter()
        .map(|t| t.question)
        .collect();
    assert_eq!(questions, vec!["first", "second", "third"]);
}
