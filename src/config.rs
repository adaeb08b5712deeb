use std::path::Path;

use serde::Deserialize;
use serde::Serialize;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub backtrace: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    pub endpoint: String,
    pub api_key: String,
    #[serde(default = "default_llm_model")]
    pub model: String,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: usize,
}

fn default_llm_model() -> String {
    "gemma3:27b".to_string()
}

fn default_temperature() -> f32 {
    0.7
}

fn default_max_tokens() -> usize {
    2048
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingsConfig {
    /// Embedding provider: "openai" or "ollama"
    pub provider: String,
    pub endpoint: String,
    #[serde(default)]
    pub api_key: Option<String>,
    pub model: String,
    pub dimension: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalConfig {
    /// Number of chunks to retrieve per query
    #[serde(default = "default_top_k")]
    pub top_k: usize,
    /// Optional minimum similarity score; chunks below it are dropped
    #[serde(default)]
    pub score_threshold: Option<f32>,
}

fn default_top_k() -> usize {
    3
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            top_k: default_top_k(),
            score_threshold: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Path of the persisted vector store file
    #[serde(default = "default_store_path")]
    pub path: String,
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
    #[serde(default = "default_chunk_overlap")]
    pub chunk_overlap: usize,
}

fn default_store_path() -> String {
    "data/vector_store.json".to_string()
}

fn default_chunk_size() -> usize {
    800
}

fn default_chunk_overlap() -> usize {
    150
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: default_store_path(),
            chunk_size: default_chunk_size(),
            chunk_overlap: default_chunk_overlap(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentsConfig {
    /// Directory scanned by the `index` command
    #[serde(default = "default_documents_dir")]
    pub dir: String,
}

fn default_documents_dir() -> String {
    "documents".to_string()
}

impl Default for DocumentsConfig {
    fn default() -> Self {
        Self {
            dir: default_documents_dir(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub logging: LoggingConfig,
    pub llm: LlmConfig,
    pub embeddings: EmbeddingsConfig,
    #[serde(default)]
    pub retrieval: RetrievalConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub documents: DocumentsConfig,
}

impl AppConfig {
    /// Load configuration from a TOML file and validate it
    pub fn from_file<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path).map_err(crate::DocRagError::Io)?;

        let config: AppConfig =
            toml::from_str(&content).map_err(crate::DocRagError::TomlParsing)?;
        config.validate()?;

        Ok(config)
    }

    /// Load configuration from default config file path
    pub fn load() -> crate::Result<Self> {
        // Try to load from config.toml first, then fall back to config.example.toml
        if Path::new("config.toml").exists() {
            Self::from_file("config.toml")
        } else if Path::new("config.example.toml").exists() {
            println!(
                "Warning: Using config.example.toml. Please create config.toml for production use."
            );
            Self::from_file("config.example.toml")
        } else {
            Err(crate::DocRagError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "No config file found. Please create config.toml or config.example.toml",
            )))
        }
    }

    /// Validate configuration values that must be rejected at startup,
    /// not per request
    pub fn validate(&self) -> crate::Result<()> {
        if self.retrieval.top_k == 0 {
            return Err(crate::DocRagError::Config(
                "retrieval.top_k must be a positive integer".to_string(),
            ));
        }
        if !(0.0..=2.0).contains(&self.llm.temperature) {
            return Err(crate::DocRagError::Config(format!(
                "llm.temperature must be in [0.0, 2.0], got {}",
                self.llm.temperature
            )));
        }
        if self.store.chunk_size == 0 {
            return Err(crate::DocRagError::Config(
                "store.chunk_size must be a positive integer".to_string(),
            ));
        }
        if self.store.chunk_overlap >= self.store.chunk_size {
            return Err(crate::DocRagError::Config(format!(
                "store.chunk_overlap ({}) must be smaller than store.chunk_size ({})",
                self.store.chunk_overlap, self.store.chunk_size
            )));
        }
        if let Some(threshold) = self.retrieval.score_threshold {
            if !(-1.0..=1.0).contains(&threshold) {
                return Err(crate::DocRagError::Config(format!(
                    "retrieval.score_threshold must be in [-1.0, 1.0], got {threshold}"
                )));
            }
        }
        Ok(())
    }

    /// Get retrieval fan-out
    pub fn top_k(&self) -> usize {
        self.retrieval.top_k
    }

    /// Get the optional similarity score threshold
    pub fn score_threshold(&self) -> Option<f32> {
        self.retrieval.score_threshold
    }

    /// Get generation temperature
    pub fn temperature(&self) -> f32 {
        self.llm.temperature
    }

    /// Get embedding model name
    pub fn embedding_model(&self) -> &str {
        &self.embeddings.model
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            logging: LoggingConfig {
                level: "info".to_string(),
                backtrace: true,
            },
            llm: LlmConfig {
                endpoint: "http://localhost:11434".to_string(),
                api_key: "ollama".to_string(),
                model: default_llm_model(),
                temperature: default_temperature(),
                max_tokens: default_max_tokens(),
            },
            embeddings: EmbeddingsConfig {
                provider: "ollama".to_string(),
                endpoint: "http://localhost:11434".to_string(),
                api_key: None,
                model: "nomic-embed-text".to_string(),
                dimension: 768,
            },
            retrieval: RetrievalConfig::default(),
            store: StoreConfig::default(),
            documents: DocumentsConfig::default(),
        }
    }
}
