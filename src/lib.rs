pub mod agent;
pub mod cli;
pub mod config;
pub mod documents;
pub mod embeddings;
pub mod errors;
pub mod llm;
pub mod logging;
pub mod remote;
pub mod store;

pub use agent::AgentResponse;
pub use agent::RagAgent;
pub use config::AppConfig;
pub use errors::*;
