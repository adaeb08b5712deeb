//! Query routing and answer pipeline
//!
//! A fixed two-branch pipeline per request: classify the query, optionally
//! retrieve document chunks, then synthesize an answer. The router absorbs
//! every component failure except the final generation call, which degrades
//! to an explicit unavailable answer.
//!
//! # Examples
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use docrag::agent::RagAgent;
//! use docrag::config::AppConfig;
//! use docrag::embeddings::EmbeddingClient;
//! use docrag::llm::ChatClient;
//! use docrag::store::VectorStore;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = AppConfig::load()?;
//!     let embedder = Arc::new(EmbeddingClient::from_config(&config)?);
//!     let store = Arc::new(VectorStore::open(&config, embedder)?);
//!     let llm = Arc::new(ChatClient::from_config(&config)?);
//!
//!     let agent = RagAgent::new(llm, store, &config);
//!     let response = agent.query("What does the manual say about setup?").await?;
//!     println!("{}", response.answer);
//!
//!     Ok(())
//! }
//! ```

pub mod classifier;
pub mod prompts;
pub mod retrieval;
pub mod router;
pub mod state;
pub mod synthesizer;

pub use classifier::ClassificationDecision;
pub use classifier::QueryClassifier;
pub use retrieval::RetrievalStep;
pub use router::AgentResponse;
pub use router::RagAgent;
pub use router::ANSWER_UNAVAILABLE;
pub use state::AgentState;
pub use synthesizer::AnswerSynthesizer;
pub use synthesizer::SynthesizedAnswer;
