use rand::distributions::Alphanumeric;
use rand::Rng;
use sha2::{Digest, Sha256};

use crate::db::DocumentStore;

/// The authenticated caller of a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
  pub user_id: String,
}

/// Hash a bearer token for storage and lookup. Only the digest ever touches
/// the database.
pub fn hash_token(token: &str) -> String {
  let mut hasher = Sha256::new();
  hasher.update(token.as_bytes());
  format!("{:x}", hasher.finalize())
}

/// Generate a fresh token secret. Printed once at issuance, never stored.
pub fn generate_token() -> String {
  let secret: String = rand::thread_rng()
    .sample_iter(&Alphanumeric)
    .take(40)
    .map(char::from)
    .collect();
  format!("jot_{}", secret)
}

/// Resolve a bearer token to the identity it authenticates, or `None`.
pub async fn authenticate(
  store: &dyn DocumentStore,
  token: &str,
) -> Result<Option<Identity>, anyhow::Error> {
  let user = store.resolve_token(&hash_token(token)).await?;
  Ok(user.map(|user_id| Identity { user_id }))
}
