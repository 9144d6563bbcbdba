//! Ask command - runs the answer pipeline once

use std::sync::Arc;

use clap::Args;

use super::ProviderArgs;
use crate::config::{AppConfig, ProcessEnv};
use crate::domain::KnowledgeBasePartition;
use crate::infrastructure::knowledge_base::{PgvectorConfig, PgvectorDocumentStore};
use crate::infrastructure::llm::ClientFactory;
use crate::infrastructure::rag::{AnswerPipeline, Retriever};

#[derive(Args, Debug, Clone)]
pub struct AskArgs {
    /// The question to answer
    pub question: String,

    /// Image URL or data URI to send along with the question
    #[arg(long)]
    pub image: Option<String>,

    /// Knowledge-base partition, or "all" to search everything
    #[arg(long = "kb")]
    pub partition: Option<String>,

    /// Number of documents to retrieve
    #[arg(long)]
    pub top_k: Option<usize>,

    #[command(flatten)]
    pub provider: ProviderArgs,
}

pub async fn run(config: &AppConfig, args: AskArgs) -> anyhow::Result<()> {
    let env = ProcessEnv;

    let client = Arc::new(ClientFactory::from_settings(
        &config.llm,
        &args.provider.into(),
        &env,
    )?);

    let store_config = PgvectorConfig::resolve(&config.database, &env)?;
    let store = Arc::new(PgvectorDocumentStore::connect(&store_config).await?);

    let partition: KnowledgeBasePartition = args
        .partition
        .as_deref()
        .unwrap_or(&config.retrieval.default_partition)
        .parse()?;
    let top_k = args.top_k.unwrap_or(config.retrieval.top_k);

    let retriever = Retriever::new(client.clone(), store);
    let pipeline = AnswerPipeline::new(retriever, client).with_top_k(top_k);

    let result = pipeline
        .answer(&args.question, args.image.as_deref(), &partition)
        .await?;

    println!("{}", serde_json::to_string_pretty(&result)?);

    Ok(())
}
