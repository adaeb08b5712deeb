//! JSON-persisted local vector store with cosine similarity search

use std::collections::HashMap;
use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde::Serialize;
use tokio::sync::RwLock;
use tracing::debug;
use tracing::info;

use crate::config::AppConfig;
use crate::embeddings::Embedder;
use crate::store::chunker::chunk_text;
use crate::store::RetrievedChunk;
use crate::store::StoreError;
use crate::store::VectorSearch;

/// One chunk as persisted on disk
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredChunk {
    id: String,
    source_id: String,
    text: String,
    metadata: HashMap<String, String>,
    embedding: Vec<f32>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreData {
    chunks: Vec<StoredChunk>,
}

/// Summary of the store contents
#[derive(Debug, Clone)]
pub struct StoreStats {
    pub total_chunks: usize,
    pub path: PathBuf,
    pub embedding_dimension: usize,
}

/// Local vector store backed by a JSON file
///
/// Writes happen out-of-band (the `index` command); query serving only
/// takes the read lock, so concurrent request pipelines never contend.
pub struct VectorStore {
    path: PathBuf,
    chunk_size: usize,
    chunk_overlap: usize,
    embedder: Arc<dyn Embedder>,
    inner: RwLock<StoreData>,
}

impl VectorStore {
    /// Open the store at the configured path, loading any persisted chunks
    pub fn open(config: &AppConfig, embedder: Arc<dyn Embedder>) -> Result<Self, StoreError> {
        let path = PathBuf::from(&config.store.path);
        let data = Self::load_data(&path)?;

        info!(
            "Vector store ready at {} with {} chunks",
            path.display(),
            data.chunks.len()
        );

        Ok(Self {
            path,
            chunk_size: config.store.chunk_size,
            chunk_overlap: config.store.chunk_overlap,
            embedder,
            inner: RwLock::new(data),
        })
    }

    fn load_data(path: &Path) -> Result<StoreData, StoreError> {
        if !path.exists() {
            // No index yet is a valid, expected state
            return Ok(StoreData::default());
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| StoreError::Unavailable(format!("failed to read {}: {e}", path.display())))?;
        serde_json::from_str(&content)
            .map_err(|e| StoreError::Unavailable(format!("corrupt store file {}: {e}", path.display())))
    }

    fn persist(&self, data: &StoreData) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    StoreError::Unavailable(format!("failed to create {}: {e}", parent.display()))
                })?;
            }
        }

        let content = serde_json::to_string(data)
            .map_err(|e| StoreError::Unavailable(format!("failed to serialize store: {e}")))?;
        std::fs::write(&self.path, content).map_err(|e| {
            StoreError::Unavailable(format!("failed to write {}: {e}", self.path.display()))
        })
    }

    /// Get a summary of the store contents
    pub async fn stats(&self) -> StoreStats {
        let data = self.inner.read().await;
        StoreStats {
            total_chunks: data.chunks.len(),
            path: self.path.clone(),
            embedding_dimension: self.embedder.dimension(),
        }
    }
}

#[async_trait]
impl VectorSearch for VectorStore {
    async fn search(&self, query: &str, k: usize) -> Result<Vec<RetrievedChunk>, StoreError> {
        if k == 0 {
            return Err(StoreError::InvalidArgument(
                "k must be a positive integer".to_string(),
            ));
        }

        let data = self.inner.read().await;
        if data.chunks.is_empty() {
            return Ok(Vec::new());
        }

        let query_embedding = self
            .embedder
            .embed(query)
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;

        let mut scored: Vec<(f32, &StoredChunk)> = data
            .chunks
            .iter()
            .map(|chunk| (cosine_similarity(&query_embedding, &chunk.embedding), chunk))
            .collect();

        scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));

        let results = scored
            .into_iter()
            .take(k.min(data.chunks.len()))
            .map(|(score, chunk)| RetrievedChunk {
                text: chunk.text.clone(),
                score,
                source_id: chunk.source_id.clone(),
                metadata: chunk.metadata.clone(),
            })
            .collect();

        Ok(results)
    }

    async fn add(
        &self,
        source_id: &str,
        text: &str,
        metadata: HashMap<String, String>,
    ) -> Result<usize, StoreError> {
        if source_id.trim().is_empty() {
            return Err(StoreError::InvalidArgument(
                "source_id must be non-empty".to_string(),
            ));
        }

        let chunks = chunk_text(text, self.chunk_size, self.chunk_overlap);
        if chunks.is_empty() {
            debug!("Document {} produced no chunks, skipping", source_id);
            return Ok(0);
        }

        let embeddings = self
            .embedder
            .embed_batch(&chunks)
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;

        let added = chunks.len();
        let mut data = self.inner.write().await;
        for (i, (chunk, embedding)) in chunks.into_iter().zip(embeddings).enumerate() {
            let mut chunk_metadata = metadata.clone();
            chunk_metadata.insert("doc_id".to_string(), source_id.to_string());

            data.chunks.push(StoredChunk {
                id: format!("{source_id}_{i}"),
                source_id: source_id.to_string(),
                text: chunk,
                metadata: chunk_metadata,
                embedding,
            });
        }

        self.persist(&data)?;

        debug!("Indexed {} into {} chunks", source_id, added);
        Ok(added)
    }

    async fn clear(&self) -> Result<(), StoreError> {
        let mut data = self.inner.write().await;
        data.chunks.clear();
        self.persist(&data)?;
        info!("Vector store cleared");
        Ok(())
    }

    async fn count(&self) -> Result<usize, StoreError> {
        let data = self.inner.read().await;
        Ok(data.chunks.len())
    }
}

/// Cosine similarity between two vectors, 0.0 when either has zero norm
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot / (norm_a * norm_b)
}
