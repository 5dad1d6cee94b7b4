use async_trait::async_trait;
use chrono::Utc;
use deadpool_postgres::{Config, ManagerConfig, Pool, RecyclingMethod, Runtime};
use tokio_postgres::NoTls;
use uuid::Uuid;

use super::backend::{ApiTokenInfo, DocumentStore};
use crate::types::Document;

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS documents (
    id UUID PRIMARY KEY,
    user_id VARCHAR(255) NOT NULL,
    title TEXT NOT NULL,
    description TEXT NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);
CREATE INDEX IF NOT EXISTS idx_documents_user ON documents(user_id, updated_at DESC);

CREATE TABLE IF NOT EXISTS api_tokens (
    id UUID PRIMARY KEY,
    user_id VARCHAR(255) NOT NULL,
    name VARCHAR(255) NOT NULL UNIQUE,
    token_hash VARCHAR(64) NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);
CREATE INDEX IF NOT EXISTS idx_api_tokens_hash ON api_tokens(token_hash);
"#;

pub struct PostgresStore {
  pool: Pool,
}

impl PostgresStore {
  pub fn new(url: &str, _max_connections: usize) -> Result<Self, anyhow::Error> {
    let mut cfg = Config::new();
    cfg.url = Some(url.into());
    cfg.manager = Some(ManagerConfig {
      recycling_method: RecyclingMethod::Fast,
    });
    let pool = cfg.create_pool(Some(Runtime::Tokio1), NoTls)?;
    Ok(Self { pool })
  }
}

#[async_trait]
impl DocumentStore for PostgresStore {
  async fn init_schema(&self) -> Result<(), anyhow::Error> {
    self.pool.get().await?.batch_execute(SCHEMA).await?;
    tracing::info!("PostgreSQL schema initialized");
    Ok(())
  }

  async fn drop_schema(&self) -> Result<(), anyhow::Error> {
    self
      .pool
      .get()
      .await?
      .batch_execute("DROP TABLE IF EXISTS documents; DROP TABLE IF EXISTS api_tokens;")
      .await?;
    Ok(())
  }

  async fn create_document(
    &self,
    user_id: &str,
    title: &str,
    description: &str,
  ) -> Result<Document, anyhow::Error> {
    let id = Uuid::new_v4();
    let now = Utc::now();
    self.pool.get().await?.execute(
      "INSERT INTO documents (id, user_id, title, description, created_at, updated_at) VALUES ($1, $2, $3, $4, $5, $6)",
      &[&id, &user_id, &title, &description, &now, &now],
    ).await?;
    Ok(Document {
      id,
      user_id: user_id.into(),
      title: title.into(),
      description: description.into(),
      created_at: now,
      updated_at: now,
    })
  }

  async fn get_document(
    &self,
    id: Uuid,
    user_id: &str,
  ) -> Result<Option<Document>, anyhow::Error> {
    let row = self.pool.get().await?.query_opt(
      "SELECT id, user_id, title, description, created_at, updated_at FROM documents WHERE id = $1 AND user_id = $2",
      &[&id, &user_id],
    ).await?;
    Ok(row.map(row_to_doc))
  }

  async fn update_document(
    &self,
    id: Uuid,
    user_id: &str,
    title: &str,
    description: &str,
  ) -> Result<Option<Document>, anyhow::Error> {
    let now = Utc::now();
    let row = self.pool.get().await?.query_opt(
      "UPDATE documents SET title = $1, description = $2, updated_at = $3 WHERE id = $4 AND user_id = $5 RETURNING id, user_id, title, description, created_at, updated_at",
      &[&title, &description, &now, &id, &user_id],
    ).await?;
    Ok(row.map(row_to_doc))
  }

  async fn delete_document(
    &self,
    id: Uuid,
    user_id: &str,
  ) -> Result<Option<Document>, anyhow::Error> {
    let row = self.pool.get().await?.query_opt(
      "DELETE FROM documents WHERE id = $1 AND user_id = $2 RETURNING id, user_id, title, description, created_at, updated_at",
      &[&id, &user_id],
    ).await?;
    Ok(row.map(row_to_doc))
  }

  async fn list_recent(
    &self,
    user_id: &str,
    limit: usize,
  ) -> Result<Vec<Document>, anyhow::Error> {
    let limit = limit as i64;
    let rows = self.pool.get().await?.query(
      "SELECT id, user_id, title, description, created_at, updated_at FROM documents WHERE user_id = $1 ORDER BY updated_at DESC LIMIT $2",
      &[&user_id, &limit],
    ).await?;
    Ok(rows.into_iter().map(row_to_doc).collect())
  }

  async fn create_token(
    &self,
    user_id: &str,
    name: &str,
    token_hash: &str,
  ) -> Result<ApiTokenInfo, anyhow::Error> {
    let id = Uuid::new_v4();
    let now = Utc::now();
    self
      .pool
      .get()
      .await?
      .execute(
        "INSERT INTO api_tokens (id, user_id, name, token_hash, created_at) VALUES ($1, $2, $3, $4, $5)",
        &[&id, &user_id, &name, &token_hash, &now],
      )
      .await?;
    Ok(ApiTokenInfo {
      id,
      user_id: user_id.into(),
      name: name.into(),
      created_at: now,
    })
  }

  async fn delete_token(&self, id: Uuid) -> Result<bool, anyhow::Error> {
    let n = self
      .pool
      .get()
      .await?
      .execute("DELETE FROM api_tokens WHERE id = $1", &[&id])
      .await?;
    Ok(n > 0)
  }

  async fn list_tokens(&self) -> Result<Vec<ApiTokenInfo>, anyhow::Error> {
    let rows = self
      .pool
      .get()
      .await?
      .query(
        "SELECT id, user_id, name, created_at FROM api_tokens ORDER BY created_at DESC",
        &[],
      )
      .await?;
    Ok(
      rows
        .into_iter()
        .map(|r| ApiTokenInfo {
          id: r.get(0),
          user_id: r.get(1),
          name: r.get(2),
          created_at: r.get(3),
        })
        .collect(),
    )
  }

  async fn resolve_token(&self, token_hash: &str) -> Result<Option<String>, anyhow::Error> {
    let row = self
      .pool
      .get()
      .await?
      .query_opt(
        "SELECT user_id FROM api_tokens WHERE token_hash = $1",
        &[&token_hash],
      )
      .await?;
    Ok(row.map(|r| r.get(0)))
  }
}

fn row_to_doc(r: tokio_postgres::Row) -> Document {
  Document {
    id: r.get(0),
    user_id: r.get(1),
    title: r.get(2),
    description: r.get(3),
    created_at: r.get(4),
    updated_at: r.get(5),
  }
}
