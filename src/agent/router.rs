//! Query router: the two-branch state machine sequencing
//! classification, retrieval and synthesis
//!
//! ```text
//! Start -> Classifying -> Retrieving -> SynthesizingRag -> Done
//!                      \
//!                       -> SynthesizingDirect ------------> Done
//! ```
//!
//! There is no terminal error state. Component failures are absorbed per
//! stage policy and the machine always reaches `Done` with either a real
//! answer or the unavailable marker plus a recorded warning. The only
//! error the router returns is an empty query, rejected before the machine
//! starts.

use std::sync::Arc;
use std::time::Instant;

use tracing::debug;
use tracing::info;
use tracing::warn;

use crate::agent::classifier::ClassificationDecision;
use crate::agent::classifier::QueryClassifier;
use crate::agent::retrieval::RetrievalStep;
use crate::agent::state::AgentState;
use crate::agent::synthesizer::AnswerSynthesizer;
use crate::config::AppConfig;
use crate::errors::DocRagError;
use crate::errors::Result;
use crate::llm::LanguageModel;
use crate::store::VectorSearch;

pub use crate::agent::state::AgentResponse;

/// Answer text returned when synthesis itself failed
pub const ANSWER_UNAVAILABLE: &str =
    "Sorry, I could not generate an answer for this request. Please try again.";

/// States of the per-request machine; linear with one branch point after
/// classification and one fallback edge out of retrieval.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RouterState {
    Classifying,
    Retrieving,
    SynthesizingRag,
    SynthesizingDirect,
    Done,
}

/// The document QA agent: classifier, retrieval step and synthesizer over
/// caller-owned service handles. One instance serves concurrent requests;
/// each `query` call owns its state.
pub struct RagAgent {
    classifier: QueryClassifier,
    retrieval: RetrievalStep,
    synthesizer: AnswerSynthesizer,
}

impl RagAgent {
    /// Wire the pipeline from service handles and configuration
    pub fn new(
        llm: Arc<dyn LanguageModel>,
        store: Arc<dyn VectorSearch>,
        config: &AppConfig,
    ) -> Self {
        let classifier = QueryClassifier::new(Arc::clone(&llm));
        let retrieval = RetrievalStep::new(store, config.top_k(), config.score_threshold());
        let synthesizer = AnswerSynthesizer::new(llm, config.temperature());

        Self {
            classifier,
            retrieval,
            synthesizer,
        }
    }

    /// Answer a user query.
    ///
    /// Returns `Err` only for an empty query; every other failure is
    /// absorbed into the response's `warnings` with a degraded answer at
    /// worst.
    pub async fn query(&self, query: &str) -> Result<AgentResponse> {
        let query = query.trim();
        if query.is_empty() {
            return Err(DocRagError::InvalidInput(
                "query must be non-empty".to_string(),
            ));
        }

        let started = Instant::now();
        let mut state = AgentState::new(query);
        let mut machine = RouterState::Classifying;

        while machine != RouterState::Done {
            machine = match machine {
                RouterState::Classifying => self.run_classification(&mut state).await,
                RouterState::Retrieving => self.run_retrieval(&mut state).await,
                RouterState::SynthesizingRag | RouterState::SynthesizingDirect => {
                    self.run_synthesis(&mut state).await
                }
                RouterState::Done => RouterState::Done,
            };
            debug!("Router transitioned to {:?}", machine);
        }

        let response = state.into_response(started.elapsed());
        info!(
            "Query answered in {:?} (used_rag: {}, sources: {}, warnings: {})",
            response.elapsed,
            response.used_rag,
            response.sources.len(),
            response.warnings.len()
        );
        Ok(response)
    }

    async fn run_classification(&self, state: &mut AgentState) -> RouterState {
        let outcome = self.classifier.classify(&state.query).await;
        state.classification = Some(outcome.decision);
        if let Some(warning) = outcome.degraded {
            state.warnings.push(warning.to_string());
        }

        match outcome.decision {
            ClassificationDecision::NeedsRetrieval => RouterState::Retrieving,
            ClassificationDecision::Direct => RouterState::SynthesizingDirect,
        }
    }

    async fn run_retrieval(&self, state: &mut AgentState) -> RouterState {
        match self.retrieval.retrieve(&state.query).await {
            Ok(chunks) => {
                // Zero chunks still counts as retrieval having run; the
                // synthesizer then behaves as if context were empty
                state.used_rag = true;
                state.retrieved_chunks = chunks;
                RouterState::SynthesizingRag
            }
            Err(e) => {
                warn!("Retrieval unavailable, falling back to direct answer: {e}");
                state.warnings.push(format!(
                    "{}; answering without document context",
                    DocRagError::RetrievalUnavailable(e.to_string())
                ));
                RouterState::SynthesizingDirect
            }
        }
    }

    async fn run_synthesis(&self, state: &mut AgentState) -> RouterState {
        let chunks = std::mem::take(&mut state.retrieved_chunks);
        match self.synthesizer.synthesize(&state.query, &chunks).await {
            Ok(synthesized) => {
                state.answer = Some(synthesized.answer);
                state.sources = synthesized.sources;
            }
            Err(e) => {
                warn!("Answer generation failed: {e}");
                state.answer = Some(ANSWER_UNAVAILABLE.to_string());
                state
                    .warnings
                    .push(DocRagError::Generation(e.to_string()).to_string());
            }
        }
        RouterState::Done
    }
}
