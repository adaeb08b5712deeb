use clap::Parser;
use docrag::cli::commands::Cli;
use docrag::cli::commands::Commands;
use docrag::cli::handlers;
use docrag::config::AppConfig;
use docrag::Result;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => AppConfig::from_file(path)?,
        None => AppConfig::load()?,
    };

    if cli.verbose {
        docrag::logging::init_logging_with_level("debug")?;
    } else {
        docrag::logging::init_logging_with_config(Some(&config))?;
    }

    match cli.command {
        Commands::Ask {
            question,
            show_sources,
        } => handlers::handle_ask(&config, &question, show_sources).await,
        Commands::Chat => handlers::handle_chat(&config).await,
        Commands::Index {
            dir,
            reset,
            no_recursive,
        } => handlers::handle_index(&config, dir, reset, !no_recursive).await,
        Commands::Stats => handlers::handle_stats(&config).await,
        Commands::Reset { force } => handlers::handle_reset(&config, force).await,
    }
}
