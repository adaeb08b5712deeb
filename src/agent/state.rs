//! Per-request state threaded through the pipeline

use std::time::Duration;

use crate::agent::classifier::ClassificationDecision;
use crate::store::RetrievedChunk;

/// Transient record created at request start, mutated additively by each
/// stage and discarded once the response is produced. There is no
/// cross-request persistence; concurrent pipelines each own their state.
#[derive(Debug, Clone)]
pub struct AgentState {
    pub query: String,
    pub classification: Option<ClassificationDecision>,
    pub retrieved_chunks: Vec<RetrievedChunk>,
    pub answer: Option<String>,
    pub used_rag: bool,
    pub sources: Vec<String>,
    pub warnings: Vec<String>,
}

impl AgentState {
    /// Create the initial state for a new query
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            classification: None,
            retrieved_chunks: Vec::new(),
            answer: None,
            used_rag: false,
            sources: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Finalize into the caller-facing response
    pub fn into_response(self, elapsed: Duration) -> AgentResponse {
        AgentResponse {
            answer: self.answer.unwrap_or_default(),
            used_rag: self.used_rag,
            sources: self.sources,
            warnings: self.warnings,
            classification: self.classification.unwrap_or(ClassificationDecision::Direct),
            elapsed,
        }
    }
}

/// Caller-facing result record
#[derive(Debug, Clone)]
pub struct AgentResponse {
    pub answer: String,
    pub used_rag: bool,
    pub sources: Vec<String>,
    pub warnings: Vec<String>,
    pub classification: ClassificationDecision,
    pub elapsed: Duration,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state_is_empty() {
        let state = AgentState::new("hello");
        assert_eq!(state.query, "hello");
        assert!(state.classification.is_none());
        assert!(state.retrieved_chunks.is_empty());
        assert!(!state.used_rag);
        assert!(state.warnings.is_empty());
    }

    #[test]
    fn test_into_response_defaults() {
        let response = AgentState::new("q").into_response(Duration::from_millis(5));
        assert_eq!(response.answer, "");
        assert_eq!(response.classification, ClassificationDecision::Direct);
    }
}
