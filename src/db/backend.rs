use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::Document;

/// API token metadata (without the actual secret)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiTokenInfo {
  pub id: Uuid,
  pub user_id: String,
  pub name: String,
  pub created_at: DateTime<Utc>,
}

/// Abstract document store.
///
/// Ownership is enforced inside the store: every mutating statement carries
/// the full `(id, user_id)` predicate, never a separate existence check
/// followed by a write.
#[async_trait]
pub trait DocumentStore: Send + Sync {
  async fn init_schema(&self) -> Result<(), anyhow::Error>;
  async fn drop_schema(&self) -> Result<(), anyhow::Error>;

  /// Insert a new document owned by `user_id`.
  async fn create_document(
    &self,
    user_id: &str,
    title: &str,
    description: &str,
  ) -> Result<Document, anyhow::Error>;

  /// Fetch a document, scoped to its owner. Absent and not-owned are
  /// indistinguishable: both return `None`.
  async fn get_document(&self, id: Uuid, user_id: &str)
    -> Result<Option<Document>, anyhow::Error>;

  /// Replace title/description where `(id, user_id)` matches, returning the
  /// updated row. A predicate miss returns `None`.
  async fn update_document(
    &self,
    id: Uuid,
    user_id: &str,
    title: &str,
    description: &str,
  ) -> Result<Option<Document>, anyhow::Error>;

  /// Delete where `(id, user_id)` matches, returning the removed row.
  /// Deleting an absent or foreign id yields `None`, not an error.
  async fn delete_document(
    &self,
    id: Uuid,
    user_id: &str,
  ) -> Result<Option<Document>, anyhow::Error>;

  /// Most recently updated documents for one owner, newest first.
  async fn list_recent(&self, user_id: &str, limit: usize)
    -> Result<Vec<Document>, anyhow::Error>;

  // Token management methods
  async fn create_token(
    &self,
    user_id: &str,
    name: &str,
    token_hash: &str,
  ) -> Result<ApiTokenInfo, anyhow::Error>;
  async fn delete_token(&self, id: Uuid) -> Result<bool, anyhow::Error>;
  async fn list_tokens(&self) -> Result<Vec<ApiTokenInfo>, anyhow::Error>;

  /// Resolve a token hash to the user id it authenticates, if any.
  async fn resolve_token(&self, token_hash: &str) -> Result<Option<String>, anyhow::Error>;
}
