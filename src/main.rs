mod cli;
mod config;
mod ollama_client;
#[cfg(test)]
mod test_buffer;

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use dotenv::dotenv;
use eyre::{Result, WrapErr};
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use crate::cli::chat::input_source::InputSource;
use crate::cli::chat::{ChatContext, Memory};
use crate::config::{ChatConfig, Overrides};
use crate::ollama_client::OllamaClient;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Ollama model to chat with
    #[arg(short, long, global = true)]
    model: Option<String>,

    /// Base URL of the Ollama server
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Chat without memory: every turn stands alone
    Bot,
    /// Chat with memory and save the conversation on exit
    Memory {
        /// Where to write the conversation log
        #[arg(short, long)]
        transcript: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // Load environment variables from .env file
    dotenv().ok();

    let cli = Cli::parse();

    let log_level = if cli.verbose { Level::DEBUG } else { Level::INFO };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .wrap_err("Failed to set tracing subscriber")?;

    let (memory, transcript_path) = match cli.command {
        Some(Commands::Memory { transcript }) => (Memory::Stateful, transcript),
        Some(Commands::Bot) | None => (Memory::Stateless, None),
    };

    let config = ChatConfig::from_env(Overrides {
        model: cli.model,
        base_url: cli.base_url,
        transcript_path,
    });

    if config.tracing.enabled && config.tracing.api_key.is_none() {
        warn!("LANGCHAIN_TRACING_V2 is set but LANGCHAIN_API_KEY is missing");
    }

    let client = match OllamaClient::new(&config) {
        Ok(client) => client,
        Err(e) => {
            eprintln!("Failed to initialize Ollama client: {}", e);
            return Ok(ExitCode::FAILURE);
        }
    };

    info!("Using model {} at {}", config.model, client.endpoint());

    let mut chat_context = ChatContext::new(
        Box::new(io::stdout()),
        InputSource::new()?,
        memory,
        Box::new(client),
        config,
    );
    chat_context.run().await
}
