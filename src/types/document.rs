use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A stored note. `user_id` is the opaque identity of the owner and is
/// fixed at creation; every mutation is scoped by `(id, user_id)`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
  pub id: Uuid,
  pub user_id: String,
  pub title: String,
  pub description: String,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}
