//! VectorStore trait - abstract interface for the chunk index.
//!
//! The primary implementation is `SqliteVectorStore` in the `sqlite` module.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::core::errors::ApiError;

/// An indexed chunk of catalog text with its source fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredChunk {
    /// Unique chunk identifier.
    pub chunk_id: String,
    /// The text content of the chunk.
    pub content: String,
    /// Price of the catalog row the chunk came from.
    pub price: f64,
    /// Raw specification text of the source row.
    pub specification: String,
}

/// Result of a similarity search.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkSearchResult {
    pub chunk: StoredChunk,
    /// Similarity score (higher = better).
    pub score: f32,
}

/// Abstract trait for the vector index.
///
/// The index is write-once: it is wiped and rebuilt wholesale at startup and
/// only read afterwards.
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Insert chunks with their embedding vectors in one transaction.
    async fn insert_batch(&self, items: Vec<(StoredChunk, Vec<f32>)>) -> Result<(), ApiError>;

    /// Search for chunks similar to the query embedding.
    async fn search(
        &self,
        query_embedding: &[f32],
        limit: usize,
    ) -> Result<Vec<ChunkSearchResult>, ApiError>;

    /// Total number of indexed chunks.
    async fn count(&self) -> Result<usize, ApiError>;

    /// Drop all chunks and record the embedding model the next build uses.
    async fn reset(&self, embedding_model: &str) -> Result<(), ApiError>;
}
