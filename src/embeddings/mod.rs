//! Text embedding generation
//!
//! Embeddings are delegated to an external service; the store only depends
//! on the [`Embedder`] trait so tests can substitute a deterministic one.

pub mod client;

use async_trait::async_trait;

pub use client::EmbeddingClient;
pub use client::EmbeddingProvider;

use crate::errors::Result;

/// Seam for converting text into vectors
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Generate an embedding for a single text
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Generate embeddings for multiple texts
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;

    /// Dimensionality of produced embeddings
    fn dimension(&self) -> usize;
}
