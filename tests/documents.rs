//! Document store tests - CRUD, ownership scoping, recent listing

use jotter::db::{DocumentStore, SqliteStore};

const ALICE: &str = "user_alice";
const BOB: &str = "user_bob";

async fn store() -> SqliteStore {
  let store = SqliteStore::in_memory().await.unwrap();
  store.init_schema().await.unwrap();
  store
}

// =============================================================================
// Create Operations
// =============================================================================

#[tokio::test]
async fn test_create_document() {
  let store = store().await;

  let doc = store
    .create_document(ALICE, "Groceries", "milk, eggs, coffee")
    .await
    .unwrap();

  assert!(!doc.id.is_nil());
  assert_eq!(doc.user_id, ALICE);
  assert_eq!(doc.title, "Groceries");
  assert_eq!(doc.description, "milk, eggs, coffee");
}

#[tokio::test]
async fn test_create_assigns_distinct_ids() {
  let store = store().await;

  let a = store.create_document(ALICE, "First", "one").await.unwrap();
  let b = store.create_document(ALICE, "Second", "two").await.unwrap();

  assert_ne!(a.id, b.id);
}

#[tokio::test]
async fn test_create_sets_timestamps() {
  let store = store().await;

  let doc = store.create_document(ALICE, "Notes", "some text").await.unwrap();

  let now = chrono::Utc::now();
  assert!((now - doc.created_at).num_seconds() < 60);
  assert_eq!(doc.created_at, doc.updated_at);
}

#[tokio::test]
async fn test_create_preserves_special_characters() {
  let store = store().await;

  let doc = store
    .create_document(ALICE, "O'Brien's \"plan\"", "日本語テスト 🦀")
    .await
    .unwrap();

  let fetched = store.get_document(doc.id, ALICE).await.unwrap().unwrap();
  assert_eq!(fetched.title, "O'Brien's \"plan\"");
  assert_eq!(fetched.description, "日本語テスト 🦀");
}

// =============================================================================
// Get Operations
// =============================================================================

#[tokio::test]
async fn test_get_existing_document() {
  let store = store().await;

  let doc = store.create_document(ALICE, "Notes", "text").await.unwrap();
  let fetched = store.get_document(doc.id, ALICE).await.unwrap();

  assert!(fetched.is_some());
  let fetched = fetched.unwrap();
  assert_eq!(fetched.id, doc.id);
  assert_eq!(fetched.title, "Notes");
}

#[tokio::test]
async fn test_get_nonexistent_document() {
  let store = store().await;

  let result = store
    .get_document(uuid::Uuid::new_v4(), ALICE)
    .await
    .unwrap();
  assert!(result.is_none());
}

#[tokio::test]
async fn test_get_is_owner_scoped() {
  let store = store().await;

  let doc = store.create_document(ALICE, "Private", "text").await.unwrap();

  // Another identity cannot read it through the owner-scoped path.
  let result = store.get_document(doc.id, BOB).await.unwrap();
  assert!(result.is_none());
}

// =============================================================================
// Update Operations
// =============================================================================

#[tokio::test]
async fn test_update_document() {
  let store = store().await;

  let doc = store.create_document(ALICE, "Draft", "v1").await.unwrap();
  let updated = store
    .update_document(doc.id, ALICE, "Final", "v2")
    .await
    .unwrap()
    .unwrap();

  assert_eq!(updated.id, doc.id);
  assert_eq!(updated.title, "Final");
  assert_eq!(updated.description, "v2");
}

#[tokio::test]
async fn test_update_timestamps() {
  let store = store().await;

  let doc = store.create_document(ALICE, "Draft", "v1").await.unwrap();

  // Small delay to ensure timestamp difference
  tokio::time::sleep(tokio::time::Duration::from_millis(10)).await;

  let updated = store
    .update_document(doc.id, ALICE, "Draft", "v2")
    .await
    .unwrap()
    .unwrap();

  assert_eq!(updated.created_at, doc.created_at);
  assert!(updated.updated_at > doc.updated_at);
}

#[tokio::test]
async fn test_update_nonexistent_document() {
  let store = store().await;

  let result = store
    .update_document(uuid::Uuid::new_v4(), ALICE, "Nobody", "nothing")
    .await
    .unwrap();
  assert!(result.is_none());
}

#[tokio::test]
async fn test_update_by_non_owner_is_a_miss() {
  let store = store().await;

  let doc = store.create_document(ALICE, "Mine", "original").await.unwrap();

  let result = store
    .update_document(doc.id, BOB, "Hijacked", "tampered")
    .await
    .unwrap();
  assert!(result.is_none());

  // The row is untouched.
  let fetched = store.get_document(doc.id, ALICE).await.unwrap().unwrap();
  assert_eq!(fetched.title, "Mine");
  assert_eq!(fetched.description, "original");
}

// =============================================================================
// Delete Operations
// =============================================================================

#[tokio::test]
async fn test_delete_document() {
  let store = store().await;

  let doc = store.create_document(ALICE, "Old", "text").await.unwrap();
  let deleted = store.delete_document(doc.id, ALICE).await.unwrap();

  assert!(deleted.is_some());
  assert_eq!(deleted.unwrap().id, doc.id);

  let gone = store.get_document(doc.id, ALICE).await.unwrap();
  assert!(gone.is_none());
}

#[tokio::test]
async fn test_delete_nonexistent_document() {
  let store = store().await;

  let result = store
    .delete_document(uuid::Uuid::new_v4(), ALICE)
    .await
    .unwrap();
  assert!(result.is_none());
}

#[tokio::test]
async fn test_delete_twice() {
  let store = store().await;

  let doc = store.create_document(ALICE, "Old", "text").await.unwrap();

  let first = store.delete_document(doc.id, ALICE).await.unwrap();
  assert!(first.is_some());

  let second = store.delete_document(doc.id, ALICE).await.unwrap();
  assert!(second.is_none());
}

#[tokio::test]
async fn test_delete_by_non_owner_is_a_miss() {
  let store = store().await;

  let doc = store.create_document(ALICE, "Mine", "text").await.unwrap();

  let result = store.delete_document(doc.id, BOB).await.unwrap();
  assert!(result.is_none());

  // Original should still exist
  let still_there = store.get_document(doc.id, ALICE).await.unwrap();
  assert!(still_there.is_some());
}

// =============================================================================
// Recent Listing
// =============================================================================

#[tokio::test]
async fn test_list_recent_only_own_documents() {
  let store = store().await;

  store.create_document(ALICE, "A1", "text").await.unwrap();
  store.create_document(ALICE, "A2", "text").await.unwrap();
  store.create_document(BOB, "B1", "text").await.unwrap();

  let docs = store.list_recent(ALICE, 10).await.unwrap();
  assert_eq!(docs.len(), 2);
  assert!(docs.iter().all(|d| d.user_id == ALICE));
}

#[tokio::test]
async fn test_list_recent_newest_first() {
  let store = store().await;

  store.create_document(ALICE, "Oldest", "text").await.unwrap();
  tokio::time::sleep(tokio::time::Duration::from_millis(10)).await;
  store.create_document(ALICE, "Middle", "text").await.unwrap();
  tokio::time::sleep(tokio::time::Duration::from_millis(10)).await;
  let newest = store.create_document(ALICE, "Newest", "text").await.unwrap();

  let docs = store.list_recent(ALICE, 10).await.unwrap();
  assert_eq!(docs[0].id, newest.id);
  assert_eq!(docs[2].title, "Oldest");
}

#[tokio::test]
async fn test_list_recent_updated_document_moves_up() {
  let store = store().await;

  let first = store.create_document(ALICE, "First", "text").await.unwrap();
  tokio::time::sleep(tokio::time::Duration::from_millis(10)).await;
  store.create_document(ALICE, "Second", "text").await.unwrap();
  tokio::time::sleep(tokio::time::Duration::from_millis(10)).await;

  store
    .update_document(first.id, ALICE, "First", "revised")
    .await
    .unwrap()
    .unwrap();

  let docs = store.list_recent(ALICE, 10).await.unwrap();
  assert_eq!(docs[0].id, first.id);
}

#[tokio::test]
async fn test_list_recent_respects_limit() {
  let store = store().await;

  for i in 0..5 {
    store
      .create_document(ALICE, &format!("Doc {}", i), "text")
      .await
      .unwrap();
  }

  let docs = store.list_recent(ALICE, 3).await.unwrap();
  assert_eq!(docs.len(), 3);
}

#[tokio::test]
async fn test_list_recent_empty() {
  let store = store().await;

  let docs = store.list_recent(ALICE, 10).await.unwrap();
  assert!(docs.is_empty());
}

// =============================================================================
// On-disk Persistence
// =============================================================================

#[tokio::test]
async fn test_documents_survive_reopen() {
  let dir = tempfile::tempdir().unwrap();
  let path = dir.path().join("jotter.db");
  let path = path.to_str().unwrap();

  let id = {
    let store = SqliteStore::new(path).await.unwrap();
    store.init_schema().await.unwrap();
    store
      .create_document(ALICE, "Persistent", "still here")
      .await
      .unwrap()
      .id
  };

  let store = SqliteStore::new(path).await.unwrap();
  store.init_schema().await.unwrap();
  let doc = store.get_document(id, ALICE).await.unwrap().unwrap();
  assert_eq!(doc.title, "Persistent");
}
