//! CLI command handlers

use std::io::BufRead;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use tracing::info;

use crate::agent::RagAgent;
use crate::cli::output::print_error;
use crate::cli::output::print_info;
use crate::cli::output::print_response;
use crate::cli::output::print_warning;
use crate::config::AppConfig;
use crate::documents;
use crate::embeddings::EmbeddingClient;
use crate::errors::DocRagError;
use crate::llm::ChatClient;
use crate::store::VectorSearch;
use crate::store::VectorStore;
use crate::Result;

/// Build the vector store from configuration
fn open_store(config: &AppConfig) -> Result<Arc<VectorStore>> {
    let embedder = Arc::new(EmbeddingClient::from_config(config)?);
    let store = VectorStore::open(config, embedder)
        .map_err(|e| DocRagError::RetrievalUnavailable(e.to_string()))?;
    Ok(Arc::new(store))
}

/// Build the full agent pipeline from configuration
fn build_agent(config: &AppConfig) -> Result<(RagAgent, Arc<VectorStore>)> {
    let store = open_store(config)?;
    let llm = Arc::new(
        ChatClient::from_config(config).map_err(|e| DocRagError::Http(e.to_string()))?,
    );
    let agent = RagAgent::new(llm, Arc::clone(&store) as Arc<dyn VectorSearch>, config);
    Ok((agent, store))
}

/// Answer a single question
pub async fn handle_ask(config: &AppConfig, question: &str, show_sources: bool) -> Result<()> {
    let (agent, store) = build_agent(config)?;

    if store.stats().await.total_chunks == 0 {
        print_warning("No documents indexed yet. Run: docrag index");
    }

    let response = agent.query(question).await?;
    print_response(&response, show_sources);
    Ok(())
}

/// Interactive chat loop; `exit` or `quit` ends the session
pub async fn handle_chat(config: &AppConfig) -> Result<()> {
    let (agent, store) = build_agent(config)?;

    let stats = store.stats().await;
    if stats.total_chunks == 0 {
        print_warning("No documents indexed yet. Run: docrag index");
    } else {
        print_info(&format!("📚 Loaded index ({} chunks)", stats.total_chunks));
    }

    print_info("💬 Chat started. Type 'exit' or 'quit' to stop.");

    let stdin = std::io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        print!("\n🧑 User: ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next() else { break };
        let question = line?.trim().to_string();

        if question.is_empty() {
            continue;
        }
        if matches!(question.to_lowercase().as_str(), "exit" | "quit") {
            print_info("👋 Goodbye!");
            break;
        }

        match agent.query(&question).await {
            Ok(response) => {
                println!("\n🤖 Assistant:");
                print_response(&response, false);
            }
            Err(e) => print_error(&e.to_string()),
        }
    }

    Ok(())
}

/// Load, chunk, embed and store all supported documents under a directory
pub async fn handle_index(
    config: &AppConfig,
    dir: Option<PathBuf>,
    reset: bool,
    recursive: bool,
) -> Result<()> {
    let store = open_store(config)?;
    let dir = dir.unwrap_or_else(|| PathBuf::from(&config.documents.dir));

    if reset {
        print_info("🧹 Clearing existing vector index...");
        store
            .clear()
            .await
            .map_err(|e| DocRagError::RetrievalUnavailable(e.to_string()))?;
    }

    print_info(&format!("📄 Loading documents from {}...", dir.display()));
    let docs = documents::load_directory(&dir, recursive)?;

    if docs.is_empty() {
        print_warning("No documents found. Index not updated.");
        return Ok(());
    }
    print_info(&format!("✓ Loaded {} documents", docs.len()));

    let mut successful = 0usize;
    let mut total_chunks = 0usize;
    for doc in docs {
        match store.add(&doc.id, &doc.text, doc.metadata).await {
            Ok(chunks) => {
                successful += 1;
                total_chunks += chunks;
                info!("Indexed {} ({} chunks)", doc.id, chunks);
            }
            Err(e) => print_warning(&format!("Failed to index {}: {e}", doc.id)),
        }
    }

    print_info("\n✅ Indexing complete");
    print_info(&format!("Documents indexed : {successful}"));
    print_info(&format!("Total chunks      : {total_chunks}"));

    let stats = store.stats().await;
    print_info(&format!("Store now holds   : {} chunks", stats.total_chunks));
    Ok(())
}

/// Print vector store statistics
pub async fn handle_stats(config: &AppConfig) -> Result<()> {
    let store = open_store(config)?;
    let stats = store.stats().await;

    print_info("📊 Vector Store Stats");
    print_info(&format!("  path             : {}", stats.path.display()));
    print_info(&format!("  total_chunks     : {}", stats.total_chunks));
    print_info(&format!("  embedding_dim    : {}", stats.embedding_dimension));
    print_info(&format!("  embedding_model  : {}", config.embedding_model()));
    Ok(())
}

/// Clear the vector store
pub async fn handle_reset(config: &AppConfig, force: bool) -> Result<()> {
    if !force {
        print!("This will delete all indexed chunks. Continue? [y/N] ");
        std::io::stdout().flush()?;
        let mut answer = String::new();
        std::io::stdin().read_line(&mut answer)?;
        if !matches!(answer.trim().to_lowercase().as_str(), "y" | "yes") {
            print_info("Aborted.");
            return Ok(());
        }
    }

    let store = open_store(config)?;
    store
        .clear()
        .await
        .map_err(|e| DocRagError::RetrievalUnavailable(e.to_string()))?;
    print_info("✓ Vector store fully reset");
    Ok(())
}
