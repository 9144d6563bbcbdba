//! Probe command - verifies the configured provider end to end

use clap::Args;

use super::ProviderArgs;
use crate::config::{AppConfig, ProcessEnv};
use crate::domain::{ChatClient, ChatRequest, EmbeddingClient};
use crate::infrastructure::llm::{
    ClientFactory, EndpointResolver, ProviderConfig, ProviderKind,
};

#[derive(Args, Debug, Clone)]
pub struct ProbeArgs {
    /// Text to embed
    #[arg(long, default_value = "测试文本")]
    pub text: String,

    /// Chat message to send
    #[arg(long, default_value = "你好")]
    pub message: String,

    #[command(flatten)]
    pub provider: ProviderArgs,
}

pub async fn run(config: &AppConfig, args: ProbeArgs) -> anyhow::Result<()> {
    let provider_config =
        ProviderConfig::resolve(&config.llm, &args.provider.into(), &ProcessEnv)?;

    println!("Provider:        {}", provider_config.kind);
    println!("Chat model:      {}", provider_config.chat_model);
    println!("Embedding model: {}", provider_config.embedding_model);
    print_urls(&provider_config);

    let client = ClientFactory::create(&provider_config);
    let mut failed = false;

    match client.embed(&args.text).await {
        Ok(vector) => println!("Embedding:       ok, {} dimensions", vector.len()),
        Err(e) => {
            failed = true;
            println!("Embedding:       FAILED - {}", e);
        }
    }

    let request = ChatRequest::builder().user(args.message).build();
    match client.chat(request).await {
        Ok(reply) => println!("Chat:            ok - {}", reply.trim()),
        Err(e) => {
            failed = true;
            println!("Chat:            FAILED - {}", e);
        }
    }

    if failed {
        anyhow::bail!("provider {} is not fully reachable", provider_config.kind);
    }

    Ok(())
}

fn print_urls(config: &ProviderConfig) {
    match config.kind {
        ProviderKind::Mock => println!("Endpoints:       none (offline)"),
        ProviderKind::Zhipu => {
            println!("Chat URL:        {}/chat/completions", config.chat_base_url);
            println!("Embedding URL:   {}/embeddings", config.embedding_base_url);
        }
        ProviderKind::OpenAiCompatible | ProviderKind::Ollama => {
            let chat = EndpointResolver::new(&config.chat_base_url);
            let embedding = EndpointResolver::new(&config.embedding_base_url);

            println!("Chat candidates:");
            for url in chat.chat_candidates() {
                println!("  {}", url);
            }
            println!("Embedding URL:   {}", embedding.embeddings_url());
        }
    }
}
