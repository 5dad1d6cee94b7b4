use async_trait::async_trait;
use chrono::Utc;
use rusqlite::params;
use tokio_rusqlite::Connection;
use uuid::Uuid;

use super::backend::{ApiTokenInfo, DocumentStore};
use crate::types::Document;

const PRAGMAS: &str = r#"
PRAGMA journal_mode = WAL;
PRAGMA synchronous = NORMAL;
PRAGMA cache_size = -64000;
PRAGMA temp_store = MEMORY;
"#;

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS documents (
    id TEXT PRIMARY KEY,
    user_id TEXT NOT NULL,
    title TEXT NOT NULL,
    description TEXT NOT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
) WITHOUT ROWID;
CREATE INDEX IF NOT EXISTS idx_documents_user ON documents(user_id, updated_at);

CREATE TABLE IF NOT EXISTS api_tokens (
    id TEXT PRIMARY KEY,
    user_id TEXT NOT NULL,
    name TEXT NOT NULL UNIQUE,
    token_hash TEXT NOT NULL,
    created_at TEXT NOT NULL
) WITHOUT ROWID;
CREATE INDEX IF NOT EXISTS idx_api_tokens_hash ON api_tokens(token_hash);
"#;

pub struct SqliteStore {
  conn: Connection,
}

impl SqliteStore {
  pub async fn new(path: &str) -> Result<Self, anyhow::Error> {
    let conn = if path == ":memory:" {
      Connection::open_in_memory().await?
    } else {
      Connection::open(path).await?
    };

    // Apply performance pragmas
    conn
      .call(|conn| conn.execute_batch(PRAGMAS).map_err(|e| e.into()))
      .await?;

    Ok(Self { conn })
  }

  pub async fn in_memory() -> Result<Self, anyhow::Error> {
    Self::new(":memory:").await
  }
}

#[async_trait]
impl DocumentStore for SqliteStore {
  async fn init_schema(&self) -> Result<(), anyhow::Error> {
    self
      .conn
      .call(|conn| conn.execute_batch(SCHEMA).map_err(|e| e.into()))
      .await?;
    tracing::info!("SQLite schema initialized");
    Ok(())
  }

  async fn drop_schema(&self) -> Result<(), anyhow::Error> {
    self
      .conn
      .call(|conn| {
        conn
          .execute_batch("DROP TABLE IF EXISTS documents; DROP TABLE IF EXISTS api_tokens;")
          .map_err(|e| e.into())
      })
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
    let id_str = id.to_string();
    let now_str = now.to_rfc3339();
    let user = user_id.to_string();
    let title_owned = title.to_string();
    let desc_owned = description.to_string();

    self.conn.call(move |conn| {
      conn.execute(
        "INSERT INTO documents (id, user_id, title, description, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![id_str, user, title_owned, desc_owned, now_str, now_str],
      ).map_err(|e| e.into())
    }).await?;

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
    let id_str = id.to_string();
    let user = user_id.to_string();

    self.conn.call(move |conn| {
      let mut stmt = conn.prepare_cached(
        "SELECT id, user_id, title, description, created_at, updated_at FROM documents WHERE id = ?1 AND user_id = ?2",
      )?;
      let mut rows = stmt.query(params![id_str, user])?;
      if let Some(row) = rows.next()? {
        Ok(Some(row_to_doc(row)?))
      } else {
        Ok(None)
      }
    }).await.map_err(|e| anyhow::anyhow!("{}", e))
  }

  async fn update_document(
    &self,
    id: Uuid,
    user_id: &str,
    title: &str,
    description: &str,
  ) -> Result<Option<Document>, anyhow::Error> {
    let id_str = id.to_string();
    let user = user_id.to_string();
    let title_owned = title.to_string();
    let desc_owned = description.to_string();
    let now_str = Utc::now().to_rfc3339();

    self
      .conn
      .call(move |conn| {
        let changed = conn.execute(
          "UPDATE documents SET title = ?1, description = ?2, updated_at = ?3 WHERE id = ?4 AND user_id = ?5",
          params![title_owned, desc_owned, now_str, id_str, user],
        )?;
        if changed == 0 {
          return Ok(None);
        }

        let mut stmt = conn.prepare_cached(
          "SELECT id, user_id, title, description, created_at, updated_at FROM documents WHERE id = ?1",
        )?;
        let mut rows = stmt.query(params![id_str])?;
        if let Some(row) = rows.next()? {
          Ok(Some(row_to_doc(row)?))
        } else {
          Ok(None)
        }
      })
      .await
      .map_err(|e| anyhow::anyhow!("{}", e))
  }

  async fn delete_document(
    &self,
    id: Uuid,
    user_id: &str,
  ) -> Result<Option<Document>, anyhow::Error> {
    let id_str = id.to_string();
    let user = user_id.to_string();

    self.conn.call(move |conn| {
      let mut stmt = conn.prepare_cached(
        "SELECT id, user_id, title, description, created_at, updated_at FROM documents WHERE id = ?1 AND user_id = ?2",
      )?;
      let mut rows = stmt.query(params![id_str.clone(), user.clone()])?;
      let doc = if let Some(row) = rows.next()? { Some(row_to_doc(row)?) } else { return Ok(None) };
      drop(rows);
      drop(stmt);
      conn.execute(
        "DELETE FROM documents WHERE id = ?1 AND user_id = ?2",
        params![id_str, user],
      )?;
      Ok(doc)
    }).await.map_err(|e| anyhow::anyhow!("{}", e))
  }

  async fn list_recent(
    &self,
    user_id: &str,
    limit: usize,
  ) -> Result<Vec<Document>, anyhow::Error> {
    let user = user_id.to_string();
    let limit = limit as i64;

    self.conn.call(move |conn| {
      let mut stmt = conn.prepare_cached(
        "SELECT id, user_id, title, description, created_at, updated_at FROM documents WHERE user_id = ?1 ORDER BY updated_at DESC LIMIT ?2",
      )?;
      let mut rows = stmt.query(params![user, limit])?;
      let mut docs = Vec::new();
      while let Some(row) = rows.next()? {
        docs.push(row_to_doc(row)?);
      }
      Ok(docs)
    }).await.map_err(|e| anyhow::anyhow!("{}", e))
  }

  async fn create_token(
    &self,
    user_id: &str,
    name: &str,
    token_hash: &str,
  ) -> Result<ApiTokenInfo, anyhow::Error> {
    let id = Uuid::new_v4();
    let now = Utc::now();
    let id_str = id.to_string();
    let now_str = now.to_rfc3339();
    let user = user_id.to_string();
    let name_owned = name.to_string();
    let hash_owned = token_hash.to_string();

    self
      .conn
      .call(move |conn| {
        conn
          .execute(
            "INSERT INTO api_tokens (id, user_id, name, token_hash, created_at) VALUES (?1, ?2, ?3, ?4, ?5)",
            params![id_str, user, name_owned, hash_owned, now_str],
          )
          .map_err(|e| e.into())
      })
      .await?;

    Ok(ApiTokenInfo {
      id,
      user_id: user_id.into(),
      name: name.into(),
      created_at: now,
    })
  }

  async fn delete_token(&self, id: Uuid) -> Result<bool, anyhow::Error> {
    let id_str = id.to_string();
    let result: usize = self
      .conn
      .call(move |conn| {
        conn
          .execute("DELETE FROM api_tokens WHERE id = ?1", params![id_str])
          .map_err(|e| e.into())
      })
      .await?;
    Ok(result > 0)
  }

  async fn list_tokens(&self) -> Result<Vec<ApiTokenInfo>, anyhow::Error> {
    self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare_cached(
          "SELECT id, user_id, name, created_at FROM api_tokens ORDER BY created_at DESC",
        )?;
        let mut rows = stmt.query([])?;
        let mut tokens = Vec::new();
        while let Some(row) = rows.next()? {
          let id_str: String = row.get(0)?;
          let created_str: String = row.get(3)?;
          tokens.push(ApiTokenInfo {
            id: id_str.parse().unwrap_or_default(),
            user_id: row.get(1)?,
            name: row.get(2)?,
            created_at: chrono::DateTime::parse_from_rfc3339(&created_str)
              .map(|d| d.with_timezone(&Utc))
              .unwrap_or_else(|_| Utc::now()),
          });
        }
        Ok(tokens)
      })
      .await
      .map_err(|e| anyhow::anyhow!("{}", e))
  }

  async fn resolve_token(&self, token_hash: &str) -> Result<Option<String>, anyhow::Error> {
    let hash_owned = token_hash.to_string();
    self
      .conn
      .call(move |conn| {
        let mut stmt =
          conn.prepare_cached("SELECT user_id FROM api_tokens WHERE token_hash = ?1")?;
        let mut rows = stmt.query(params![hash_owned])?;
        if let Some(row) = rows.next()? {
          Ok(Some(row.get(0)?))
        } else {
          Ok(None)
        }
      })
      .await
      .map_err(|e| anyhow::anyhow!("{}", e))
  }
}

#[inline]
fn row_to_doc(row: &rusqlite::Row) -> Result<Document, rusqlite::Error> {
  let id_str: String = row.get(0)?;
  let created_str: String = row.get(4)?;
  let updated_str: String = row.get(5)?;
  Ok(Document {
    id: id_str.parse().unwrap_or_default(),
    user_id: row.get(1)?,
    title: row.get(2)?,
    description: row.get(3)?,
    created_at: chrono::DateTime::parse_from_rfc3339(&created_str)
      .map(|d| d.with_timezone(&Utc))
      .unwrap_or_else(|_| Utc::now()),
    updated_at: chrono::DateTime::parse_from_rfc3339(&updated_str)
      .map(|d| d.with_timezone(&Utc))
      .unwrap_or_else(|_| Utc::now()),
  })
}
