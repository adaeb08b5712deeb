//! Vector store: chunk storage and similarity search
//!
//! The pipeline depends only on the [`VectorSearch`] trait. The concrete
//! [`VectorStore`] keeps chunks and their embeddings in a JSON-persisted
//! local file and searches them with cosine similarity.

pub mod chunker;
pub mod vector_store;

use std::collections::HashMap;

use async_trait::async_trait;
use thiserror::Error;

pub use vector_store::StoreStats;
pub use vector_store::VectorStore;

/// A stored text chunk returned by similarity search
#[derive(Debug, Clone, PartialEq)]
pub struct RetrievedChunk {
    pub text: String,
    pub score: f32,
    pub source_id: String,
    pub metadata: HashMap<String, String>,
}

/// Failures of the retrieval service
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

/// Similarity search seam used by the retrieval step and the indexer
#[async_trait]
pub trait VectorSearch: Send + Sync {
    /// Return the top-k most similar chunks, ordered by descending score.
    /// An empty or uninitialized store yields an empty sequence.
    async fn search(&self, query: &str, k: usize) -> Result<Vec<RetrievedChunk>, StoreError>;

    /// Chunk, embed and store a document; returns the number of chunks added
    async fn add(
        &self,
        source_id: &str,
        text: &str,
        metadata: HashMap<String, String>,
    ) -> Result<usize, StoreError>;

    /// Remove all stored chunks
    async fn clear(&self) -> Result<(), StoreError>;

    /// Number of stored chunks
    async fn count(&self) -> Result<usize, StoreError>;
}
