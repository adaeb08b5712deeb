use thiserror::Error;

#[derive(Error, Debug)]
pub enum DocRagError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("retrieval unavailable: {0}")]
    RetrievalUnavailable(String),

    #[error("classification degraded: {0}")]
    ClassificationDegraded(String),

    #[error("generation failed: {0}")]
    Generation(String),

    #[error("embedding error: {0}")]
    Embedding(String),

    #[error("remote service unavailable: {0}")]
    RemoteUnavailable(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("document error: {0}")]
    Document(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("TOML parsing error: {0}")]
    TomlParsing(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, DocRagError>;
