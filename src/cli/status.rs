//! Status command - document counts per knowledge-base partition

use crate::config::{AppConfig, ProcessEnv};
use crate::domain::DocumentStore;
use crate::infrastructure::knowledge_base::{PgvectorConfig, PgvectorDocumentStore};

pub async fn run(config: &AppConfig) -> anyhow::Result<()> {
    let store_config = PgvectorConfig::resolve(&config.database, &ProcessEnv)?;
    let store = PgvectorDocumentStore::connect(&store_config).await?;

    let counts = store.partition_counts().await?;
    let total: u64 = counts.iter().map(|c| c.documents).sum();

    println!("Table: {}", store_config.table);
    for count in &counts {
        let partition = count.partition.as_deref().unwrap_or("(untagged)");
        println!("  {:<16} {}", partition, count.documents);
    }
    println!("Total: {}", total);

    Ok(())
}
