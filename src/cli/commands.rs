//! CLI command definitions and argument parsing

use std::path::PathBuf;

use clap::Parser;
use clap::Subcommand;

#[derive(Parser)]
#[command(name = "docrag")]
#[command(about = "Document question-answering CLI with RAG query routing")]
#[command(version)]
pub struct Cli {
    /// Enable verbose debug logging (default: info level)
    #[arg(short, long)]
    pub verbose: bool,

    /// Path to a config file (default: config.toml, config.example.toml)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Ask a single question and print the answer
    Ask {
        /// The question to answer
        question: String,
        /// Show retrieved sources and warnings
        #[arg(long)]
        show_sources: bool,
    },
    /// Start an interactive chat loop
    Chat,
    /// Load, chunk, embed and store documents from a directory
    Index {
        /// Directory to index (default: documents dir from config)
        #[arg(short, long)]
        dir: Option<PathBuf>,
        /// Clear the existing index before indexing
        #[arg(long)]
        reset: bool,
        /// Do not descend into subdirectories
        #[arg(long)]
        no_recursive: bool,
    },
    /// Show vector store statistics
    Stats,
    /// Clear the vector store
    Reset {
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },
}
