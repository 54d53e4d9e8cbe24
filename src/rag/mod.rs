//! RAG (Retrieval-Augmented Generation) module.
//!
//! This module provides:
//! - `chunker`: catalog rows → fixed-size overlapping text chunks
//! - `VectorStore` / `SqliteVectorStore`: persisted embedding index
//! - `rebuild_index`: the startup pipeline that wipes and rebuilds the index

pub mod chunker;
mod sqlite;
mod store;

pub use chunker::{chunk_catalog, ChunkerConfig};
pub use sqlite::SqliteVectorStore;
pub use store::{ChunkSearchResult, StoredChunk, VectorStore};

use crate::catalog::Catalog;
use crate::core::errors::ApiError;
use crate::llm::LlmProvider;

const EMBED_BATCH: usize = 64;

/// Wipe the store and rebuild it from the catalog.
///
/// Runs once at startup; the index is read-only afterwards. Returns the
/// number of chunks indexed.
pub async fn rebuild_index(
    store: &dyn VectorStore,
    provider: &dyn LlmProvider,
    catalog: &Catalog,
    config: ChunkerConfig,
    embedding_model: &str,
) -> Result<usize, ApiError> {
    let chunks = chunk_catalog(catalog, config);
    store.reset(embedding_model).await?;

    let total = chunks.len();
    for batch in chunks.chunks(EMBED_BATCH) {
        let texts: Vec<String> = batch.iter().map(|c| c.content.clone()).collect();
        let embeddings = provider.embed(&texts, embedding_model).await?;

        let items: Vec<(StoredChunk, Vec<f32>)> =
            batch.iter().cloned().zip(embeddings).collect();
        store.insert_batch(items).await?;
    }

    tracing::info!("Indexed {} chunks from {} catalog rows", total, catalog.len());
    Ok(total)
}
