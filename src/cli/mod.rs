//! CLI module for the ops knowledge QA gateway
//!
//! Subcommands:
//! - `ask`: answer a question against the knowledge base
//! - `probe`: check connectivity of the configured LLM provider
//! - `status`: count stored documents per knowledge-base partition

pub mod ask;
pub mod probe;
pub mod status;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::config::AppConfig;
use crate::infrastructure::llm::ProviderOverrides;
use crate::infrastructure::logging;

/// Ops knowledge QA - retrieval-augmented answers over an operations knowledge base
#[derive(Parser)]
#[command(name = "ops-kb-qa")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Extra configuration file, layered over config/default, config/local and config.*
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Answer a question and print the result as JSON
    Ask(ask::AskArgs),

    /// Send one embedding and one chat request to the configured provider
    Probe(probe::ProbeArgs),

    /// Show how many documents each knowledge-base partition holds
    Status,
}

/// Provider overrides shared by commands that talk to the LLM
#[derive(Args, Debug, Clone, Default)]
pub struct ProviderArgs {
    /// Provider id (zhipu, openai, ollama, mock)
    #[arg(long)]
    pub provider: Option<String>,

    /// Chat model
    #[arg(long)]
    pub model: Option<String>,

    /// Embedding model
    #[arg(long)]
    pub embedding_model: Option<String>,

    /// Base URL for chat requests
    #[arg(long)]
    pub chat_base_url: Option<String>,

    /// Base URL for embedding requests
    #[arg(long)]
    pub embedding_base_url: Option<String>,
}

impl From<ProviderArgs> for ProviderOverrides {
    fn from(args: ProviderArgs) -> Self {
        Self {
            provider: args.provider,
            api_key: None,
            chat_base_url: args.chat_base_url,
            embedding_base_url: args.embedding_base_url,
            chat_model: args.model,
            embedding_model: args.embedding_model,
        }
    }
}

/// Load `.env` and configuration, then start logging
pub fn bootstrap(config_path: Option<&std::path::Path>) -> anyhow::Result<AppConfig> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load(config_path)?;
    logging::init_logging(&config.logging);

    Ok(config)
}
