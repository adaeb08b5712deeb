//! Retrieval step: top-k similarity search with optional score filtering

use std::sync::Arc;

use tracing::debug;

use crate::store::RetrievedChunk;
use crate::store::StoreError;
use crate::store::VectorSearch;

/// Wraps the vector search backend with the configured fan-out and the
/// optional acceptability threshold. Applies no re-ranking; results keep
/// the backend's descending-score order.
pub struct RetrievalStep {
    store: Arc<dyn VectorSearch>,
    top_k: usize,
    score_threshold: Option<f32>,
}

impl RetrievalStep {
    /// `top_k > 0` is enforced by config validation at startup.
    pub fn new(store: Arc<dyn VectorSearch>, top_k: usize, score_threshold: Option<f32>) -> Self {
        Self {
            store,
            top_k,
            score_threshold,
        }
    }

    /// Retrieve the most similar chunks for the query.
    ///
    /// An empty store yields an empty sequence; connection failures
    /// propagate as [`StoreError::Unavailable`] for the orchestrator to
    /// absorb.
    pub async fn retrieve(&self, query: &str) -> Result<Vec<RetrievedChunk>, StoreError> {
        let results = self.store.search(query, self.top_k).await?;
        debug!("Retrieved {} chunks", results.len());

        let Some(threshold) = self.score_threshold else {
            return Ok(results);
        };

        let filtered: Vec<RetrievedChunk> = results
            .into_iter()
            .filter(|chunk| chunk.score >= threshold)
            .collect();
        debug!(
            "{} chunks remain after threshold {:.2}",
            filtered.len(),
            threshold
        );

        Ok(filtered)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::atomic::AtomicUsize;
    use std::sync::atomic::Ordering;

    use async_trait::async_trait;

    use super::*;

    struct FixedStore {
        chunks: Vec<RetrievedChunk>,
        search_calls: AtomicUsize,
        fail: bool,
    }

    impl FixedStore {
        fn with_scores(scores: &[f32]) -> Self {
            let chunks = scores
                .iter()
                .enumerate()
                .map(|(i, &score)| RetrievedChunk {
                    text: format!("chunk {i}"),
                    score,
                    source_id: format!("doc{i}"),
                    metadata: HashMap::new(),
                })
                .collect();
            Self {
                chunks,
                search_calls: AtomicUsize::new(0),
                fail: false,
            }
        }
    }

    #[async_trait]
    impl VectorSearch for FixedStore {
        async fn search(&self, _query: &str, k: usize) -> Result<Vec<RetrievedChunk>, StoreError> {
            self.search_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(StoreError::Unavailable("connection refused".to_string()));
            }
            Ok(self.chunks.iter().take(k).cloned().collect())
        }

        async fn add(
            &self,
            _source_id: &str,
            _text: &str,
            _metadata: HashMap<String, String>,
        ) -> Result<usize, StoreError> {
            unimplemented!("not used in these tests")
        }

        async fn clear(&self) -> Result<(), StoreError> {
            Ok(())
        }

        async fn count(&self) -> Result<usize, StoreError> {
            Ok(self.chunks.len())
        }
    }

    #[tokio::test]
    async fn test_no_threshold_keeps_backend_order() {
        let store = Arc::new(FixedStore::with_scores(&[0.9, 0.8, 0.7]));
        let step = RetrievalStep::new(store, 3, None);
        let results = step.retrieve("q").await.unwrap();
        let scores: Vec<f32> = results.iter().map(|c| c.score).collect();
        assert_eq!(scores, vec![0.9, 0.8, 0.7]);
    }

    #[tokio::test]
    async fn test_threshold_drops_low_scores() {
        let store = Arc::new(FixedStore::with_scores(&[0.9, 0.5, 0.1]));
        let step = RetrievalStep::new(store, 3, Some(0.4));
        let results = step.retrieve("q").await.unwrap();
        assert_eq!(results.len(), 2);
        assert!(results.iter().all(|c| c.score >= 0.4));
    }

    #[tokio::test]
    async fn test_top_k_limits_results() {
        let store = Arc::new(FixedStore::with_scores(&[0.9, 0.8, 0.7, 0.6]));
        let step = RetrievalStep::new(store, 2, None);
        let results = step.retrieve("q").await.unwrap();
        assert_eq!(results.len(), 2);
    }

    #[tokio::test]
    async fn test_unavailable_store_propagates() {
        let mut store = FixedStore::with_scores(&[]);
        store.fail = true;
        let step = RetrievalStep::new(Arc::new(store), 3, None);
        assert!(matches!(
            step.retrieve("q").await,
            Err(StoreError::Unavailable(_))
        ));
    }
}
