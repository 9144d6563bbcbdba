//! pgvector document store

use std::fmt::{self, Debug};
use std::time::Duration;

use async_trait::async_trait;
use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions};
use sqlx::Row;

use crate::config::layered::{resolve, resolve_opt};
use crate::config::{DatabaseSettings, EnvSource};
use crate::domain::knowledge_base::PARTITION_KEY;
use crate::domain::{
    DocumentStore, DomainError, KnowledgeBasePartition, PartitionCount, RetrievedCandidate,
};

pub const DEFAULT_TABLE: &str = "documents";
const DEFAULT_MAX_CONNECTIONS: u32 = 5;
const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(10);

/// Where to connect, resolved from the config file and `DATABASE_URL` / `DB_*`
#[derive(Clone, PartialEq, Eq)]
pub struct PgvectorConfig {
    pub url: Option<String>,
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: Option<String>,
    pub database: String,
    pub table: String,
    pub max_connections: u32,
}

impl Debug for PgvectorConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PgvectorConfig")
            .field("url", &self.url.as_ref().map(|_| "<redacted>"))
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("database", &self.database)
            .field("table", &self.table)
            .field("max_connections", &self.max_connections)
            .finish()
    }
}

impl PgvectorConfig {
    /// File settings first, then the environment, then local defaults
    pub fn resolve(settings: &DatabaseSettings, env: &dyn EnvSource) -> Result<Self, DomainError> {
        let port = settings.port.map(|p| p.to_string());
        let port = resolve(&[port.as_deref()], env, &["DB_PORT"], "5432");
        let port = port
            .parse::<u16>()
            .map_err(|_| DomainError::configuration(format!("invalid database port '{}'", port)))?;

        let table = settings
            .table
            .clone()
            .unwrap_or_else(|| DEFAULT_TABLE.to_string());
        validate_identifier(&table)?;

        Ok(Self {
            url: resolve_opt(&[settings.url.as_deref()], env, &["DATABASE_URL"]),
            host: resolve(&[settings.host.as_deref()], env, &["DB_HOST"], "localhost"),
            port,
            user: resolve(&[settings.user.as_deref()], env, &["DB_USER"], "postgres"),
            password: resolve_opt(&[settings.password.as_deref()], env, &["DB_PASSWORD"]),
            database: resolve(&[settings.name.as_deref()], env, &["DB_NAME"], "postgres"),
            table,
            max_connections: settings.max_connections.unwrap_or(DEFAULT_MAX_CONNECTIONS),
        })
    }

    fn connect_options(&self) -> Result<PgConnectOptions, DomainError> {
        if let Some(url) = &self.url {
            return url
                .parse::<PgConnectOptions>()
                .map_err(|e| DomainError::configuration(format!("invalid DATABASE_URL: {}", e)));
        }

        let mut options = PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user)
            .database(&self.database);
        if let Some(password) = &self.password {
            options = options.password(password);
        }
        Ok(options)
    }
}

/// Table names are interpolated into SQL, so only plain identifiers pass
fn validate_identifier(name: &str) -> Result<(), DomainError> {
    let valid = !name.is_empty()
        && name
            .split('.')
            .all(|part| !part.is_empty() && part.chars().all(|c| c.is_ascii_alphanumeric() || c == '_'));

    if valid {
        Ok(())
    } else {
        Err(DomainError::configuration(format!("invalid table name '{}'", name)))
    }
}

/// Render a vector in pgvector's text format
fn to_pgvector(embedding: &[f32]) -> String {
    let values: Vec<String> = embedding.iter().map(|v| v.to_string()).collect();
    format!("[{}]", values.join(","))
}

/// Reads from a `documents(id, content, metadata jsonb, embedding vector)` table
pub struct PgvectorDocumentStore {
    pool: PgPool,
    table: String,
}

impl Debug for PgvectorDocumentStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PgvectorDocumentStore")
            .field("table", &self.table)
            .finish()
    }
}

impl PgvectorDocumentStore {
    pub fn new(pool: PgPool, table: impl Into<String>) -> Result<Self, DomainError> {
        let table = table.into();
        validate_identifier(&table)?;
        Ok(Self { pool, table })
    }

    /// Open a connection pool and wrap it
    pub async fn connect(config: &PgvectorConfig) -> Result<Self, DomainError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(ACQUIRE_TIMEOUT)
            .connect_with(config.connect_options()?)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to connect to PostgreSQL: {}", e)))?;

        tracing::info!(
            host = %config.host,
            database = %config.database,
            table = %config.table,
            "Connected to document store"
        );

        Self::new(pool, config.table.clone())
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

/// Nearest-neighbour query; a filtered query admits the `$3` partition or
/// untagged rows
fn search_sql(table: &str, filtered: bool) -> String {
    let filter = if filtered {
        format!(
            "WHERE metadata->>'{key}' = $3 OR metadata->>'{key}' IS NULL",
            key = PARTITION_KEY
        )
    } else {
        String::new()
    };

    format!(
        r#"
        SELECT id::text AS id, content, metadata, embedding <-> $1::vector AS distance
        FROM {}
        {}
        ORDER BY distance ASC
        LIMIT $2
        "#,
        table, filter
    )
}

#[async_trait]
impl DocumentStore for PgvectorDocumentStore {
    fn store_type(&self) -> &'static str {
        "pgvector"
    }

    async fn similarity_search(
        &self,
        query: &[f32],
        partition: &KnowledgeBasePartition,
        limit: usize,
    ) -> Result<Vec<RetrievedCandidate>, DomainError> {
        let tag = partition.filter_tag();
        let sql = search_sql(&self.table, tag.is_some());

        tracing::debug!(
            table = %self.table,
            partition = %partition,
            limit,
            dimensions = query.len(),
            "Running similarity search"
        );

        let mut statement = sqlx::query(&sql)
            .bind(to_pgvector(query))
            .bind(i64::try_from(limit).unwrap_or(i64::MAX));
        if let Some(tag) = tag {
            statement = statement.bind(tag.to_string());
        }

        let rows = statement.fetch_all(&self.pool).await.map_err(|e| {
            tracing::error!(table = %self.table, error = %e, "Similarity search failed");
            DomainError::storage(format!("Similarity search failed: {}", e))
        })?;

        let mut candidates = Vec::with_capacity(rows.len());
        for row in rows {
            let id: String = row
                .try_get("id")
                .map_err(|e| DomainError::storage(format!("Invalid id column: {}", e)))?;
            let content: Option<String> = row
                .try_get("content")
                .map_err(|e| DomainError::storage(format!("Invalid content column: {}", e)))?;
            let metadata: Option<serde_json::Value> = row
                .try_get("metadata")
                .map_err(|e| DomainError::storage(format!("Invalid metadata column: {}", e)))?;
            let distance: f64 = row
                .try_get("distance")
                .map_err(|e| DomainError::storage(format!("Invalid distance column: {}", e)))?;

            let metadata = match metadata {
                Some(serde_json::Value::Object(map)) => map,
                _ => serde_json::Map::new(),
            };

            candidates.push(
                RetrievedCandidate::new(id, content.unwrap_or_default(), distance)
                    .with_all_metadata(metadata),
            );
        }

        tracing::debug!(results = candidates.len(), "Similarity search completed");

        Ok(candidates)
    }

    async fn partition_counts(&self) -> Result<Vec<PartitionCount>, DomainError> {
        let sql = format!(
            "SELECT metadata->>'{}' AS partition, COUNT(*) AS documents FROM {} GROUP BY 1 ORDER BY 1 NULLS FIRST",
            PARTITION_KEY, self.table
        );

        let rows = sqlx::query(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to count documents: {}", e)))?;

        rows.into_iter()
            .map(|row| {
                let partition: Option<String> = row
                    .try_get("partition")
                    .map_err(|e| DomainError::storage(e.to_string()))?;
                let documents: i64 = row
                    .try_get("documents")
                    .map_err(|e| DomainError::storage(e.to_string()))?;
                Ok(PartitionCount {
                    partition,
                    documents: u64::try_from(documents).unwrap_or_default(),
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn squash(sql: &str) -> String {
        sql.split_whitespace().collect::<Vec<_>>().join(" ")
    }

    #[test]
    fn test_unfiltered_search_has_no_where_clause() {
        let sql = squash(&search_sql("documents", false));

        assert!(!sql.contains("WHERE"));
        assert!(!sql.contains("$3"));
        assert!(sql.contains("embedding <-> $1::vector AS distance FROM documents"));
        assert!(sql.ends_with("ORDER BY distance ASC LIMIT $2"));
    }

    #[test]
    fn test_filtered_search_admits_tag_or_untagged() {
        let sql = squash(&search_sql("documents", true));

        assert!(sql.contains(
            "FROM documents WHERE metadata->>'kb_type' = $3 OR metadata->>'kb_type' IS NULL"
        ));
        assert!(sql.ends_with("ORDER BY distance ASC LIMIT $2"));
    }

    #[test]
    fn test_filter_follows_partition() {
        assert!(KnowledgeBasePartition::All.filter_tag().is_none());
        assert_eq!(KnowledgeBasePartition::named("ops").filter_tag(), Some("ops"));
    }

    #[test]
    fn test_resolve_prefers_file_over_environment() {
        let settings = DatabaseSettings {
            host: Some("db.internal".into()),
            name: Some("knowledge".into()),
            ..Default::default()
        };
        let env = env(&[("DB_HOST", "env-host"), ("DB_USER", "rag"), ("DB_PORT", "5433")]);

        let config = PgvectorConfig::resolve(&settings, &env).unwrap();

        assert_eq!(config.host, "db.internal");
        assert_eq!(config.user, "rag");
        assert_eq!(config.port, 5433);
        assert_eq!(config.database, "knowledge");
        assert_eq!(config.table, DEFAULT_TABLE);
        assert_eq!(config.url, None);
    }

    #[test]
    fn test_resolve_rejects_bad_port_and_table() {
        let bad_port = PgvectorConfig::resolve(
            &DatabaseSettings::default(),
            &env(&[("DB_PORT", "fifty")]),
        );
        assert!(matches!(bad_port, Err(DomainError::Configuration { .. })));

        let bad_table = PgvectorConfig::resolve(
            &DatabaseSettings {
                table: Some("documents; DROP TABLE x".into()),
                ..Default::default()
            },
            &env(&[]),
        );
        assert!(matches!(bad_table, Err(DomainError::Configuration { .. })));
    }

    #[test]
    fn test_debug_hides_url() {
        let config = PgvectorConfig::resolve(
            &DatabaseSettings::default(),
            &env(&[("DATABASE_URL", "postgres://rag:secret@db/knowledge")]),
        )
        .unwrap();

        assert!(!format!("{:?}", config).contains("secret"));
        assert!(config.connect_options().is_ok());
    }

    #[test]
    fn test_identifier_validation() {
        assert!(validate_identifier("documents").is_ok());
        assert!(validate_identifier("ops.documents_v2").is_ok());
        assert!(validate_identifier("").is_err());
        assert!(validate_identifier("docs\"").is_err());
    }

    #[test]
    fn test_pgvector_literal() {
        assert_eq!(to_pgvector(&[0.5, -1.0, 2.25]), "[0.5,-1,2.25]");
    }
}
