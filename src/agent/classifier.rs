//! Query classification: does this query need document retrieval?

use std::sync::Arc;

use tracing::debug;
use tracing::warn;

use crate::agent::prompts::build_classification_prompt;
use crate::errors::DocRagError;
use crate::llm::LanguageModel;

/// Classification temperature is pinned low; the label choice should not
/// depend on sampling noise.
const CLASSIFICATION_TEMPERATURE: f32 = 0.0;

/// Whether a query should go down the retrieval path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassificationDecision {
    NeedsRetrieval,
    Direct,
}

/// Outcome of classification; `degraded` carries the non-fatal error when
/// the model call failed and the decision fell back to the direct default.
#[derive(Debug)]
pub struct ClassificationOutcome {
    pub decision: ClassificationDecision,
    pub degraded: Option<DocRagError>,
}

/// LLM-backed query classifier
pub struct QueryClassifier {
    llm: Arc<dyn LanguageModel>,
}

impl QueryClassifier {
    pub fn new(llm: Arc<dyn LanguageModel>) -> Self {
        Self { llm }
    }

    /// Classify a query. Never fails: an unusable or missing model reply
    /// degrades to [`ClassificationDecision::Direct`] with a warning.
    ///
    /// The caller guarantees the query is non-empty after trimming.
    pub async fn classify(&self, query: &str) -> ClassificationOutcome {
        let prompt = build_classification_prompt(query);

        match self.llm.generate(&prompt, CLASSIFICATION_TEMPERATURE).await {
            Ok(raw) => {
                let decision = parse_decision(&raw);
                debug!("Classified query as {:?} (raw: {:?})", decision, raw.trim());
                ClassificationOutcome {
                    decision,
                    degraded: None,
                }
            }
            Err(e) => {
                warn!("Classification call failed, defaulting to direct answer: {e}");
                ClassificationOutcome {
                    decision: ClassificationDecision::Direct,
                    degraded: Some(DocRagError::ClassificationDegraded(e.to_string())),
                }
            }
        }
    }
}

/// Map a raw model reply onto a decision.
///
/// Any reply containing the retrieval label counts as a retrieval request;
/// everything else, including unrecognized output, maps to direct (fail
/// open - never block answering because classification was ambiguous).
pub fn parse_decision(raw: &str) -> ClassificationDecision {
    let normalized = raw.trim().to_uppercase();
    if normalized.contains("RAG") {
        ClassificationDecision::NeedsRetrieval
    } else {
        ClassificationDecision::Direct
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_exact_labels() {
        assert_eq!(parse_decision("RAG"), ClassificationDecision::NeedsRetrieval);
        assert_eq!(parse_decision("DIRECT"), ClassificationDecision::Direct);
    }

    #[test]
    fn test_parse_normalizes_case_and_whitespace() {
        assert_eq!(
            parse_decision("  rag\n"),
            ClassificationDecision::NeedsRetrieval
        );
        assert_eq!(parse_decision(" direct "), ClassificationDecision::Direct);
    }

    #[test]
    fn test_parse_accepts_label_within_sentence() {
        assert_eq!(
            parse_decision("The answer is: RAG."),
            ClassificationDecision::NeedsRetrieval
        );
    }

    #[test]
    fn test_unrecognized_output_fails_open_to_direct() {
        assert_eq!(parse_decision("MAYBE?"), ClassificationDecision::Direct);
        assert_eq!(parse_decision(""), ClassificationDecision::Direct);
    }
}
