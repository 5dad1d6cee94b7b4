use axum::{
  extract::{Path, State},
  http::{header, HeaderMap, StatusCode},
  response::{IntoResponse, Response},
  routing::{delete, get, post, put},
  Json, Router,
};
use std::sync::Arc;
use uuid::Uuid;

use super::error::ApiError;
use crate::auth::{self, Identity};
use crate::cache::{PageCache, Revalidator};
use crate::db::DocumentStore;
use crate::types::DocumentPayload;

/// Logical path of the recent-documents listing view.
pub const LISTING_PATH: &str = "/document";
/// Logical path of the home view.
pub const HOME_PATH: &str = "/";

/// Shared state for the document API handlers.
pub struct AppState {
  pub store: Arc<dyn DocumentStore>,
  pub cache: Arc<PageCache>,
  pub revalidator: Revalidator,
  pub recent_limit: usize,
}

/// Build the document API router
pub fn build_router(state: Arc<AppState>) -> Router {
  Router::new()
    .route("/", get(service_info))
    .route("/document", get(list_documents))
    .route("/document/new", post(create_document))
    .route("/document/{document_id}", get(get_document))
    .route("/document/{document_id}", put(update_document))
    .route("/document/{document_id}", delete(delete_document))
    .with_state(state)
}

/// GET / - unauthenticated service banner
async fn service_info() -> Json<serde_json::Value> {
  Json(serde_json::json!({
    "name": "jotter",
    "version": env!("CARGO_PKG_VERSION"),
    "status": "ok",
  }))
}

/// Resolve the caller's bearer token before anything touches storage.
async fn authenticate(state: &AppState, headers: &HeaderMap) -> Result<Identity, ApiError> {
  let token = headers
    .get(header::AUTHORIZATION)
    .and_then(|v| v.to_str().ok())
    .and_then(|v| v.strip_prefix("Bearer "))
    .ok_or(ApiError::Unauthenticated)?;
  auth::authenticate(state.store.as_ref(), token)
    .await?
    .ok_or(ApiError::Unauthenticated)
}

/// POST /document/new - create a document owned by the caller
async fn create_document(
  State(state): State<Arc<AppState>>,
  headers: HeaderMap,
  Json(payload): Json<DocumentPayload>,
) -> Result<Response, ApiError> {
  let identity = authenticate(&state, &headers).await?;
  payload.validate().map_err(ApiError::Validation)?;

  let doc = state
    .store
    .create_document(&identity.user_id, &payload.title, &payload.description)
    .await?;

  state.revalidator.request(LISTING_PATH);
  tracing::info!("Document {} created by {}", doc.id, identity.user_id);

  Ok(Json(doc).into_response())
}

/// PUT /document/{document_id} - update title/description, owner only
async fn update_document(
  State(state): State<Arc<AppState>>,
  Path(document_id): Path<Uuid>,
  headers: HeaderMap,
  Json(payload): Json<DocumentPayload>,
) -> Result<Response, ApiError> {
  let identity = authenticate(&state, &headers).await?;
  payload.validate().map_err(ApiError::Validation)?;

  // Ownership is part of the update predicate itself; a miss means the
  // document is absent or belongs to someone else, and we don't say which.
  state
    .store
    .update_document(
      document_id,
      &identity.user_id,
      &payload.title,
      &payload.description,
    )
    .await?
    .ok_or(ApiError::NotFound)?;

  state.revalidator.request(LISTING_PATH);

  Ok((StatusCode::OK, "document updated").into_response())
}

/// DELETE /document/{document_id} - delete, owner only
async fn delete_document(
  State(state): State<Arc<AppState>>,
  Path(document_id): Path<Uuid>,
  headers: HeaderMap,
) -> Result<Response, ApiError> {
  let identity = authenticate(&state, &headers).await?;

  let doc = state
    .store
    .delete_document(document_id, &identity.user_id)
    .await?
    .ok_or(ApiError::NotFound)?;

  state.revalidator.request(LISTING_PATH);
  state.revalidator.request(HOME_PATH);
  tracing::info!("Document {} ({:?}) deleted by {}", doc.id, doc.title, identity.user_id);

  Ok((StatusCode::OK, "document deleted").into_response())
}

/// GET /document/{document_id} - owner-scoped read, cache-backed
async fn get_document(
  State(state): State<Arc<AppState>>,
  Path(document_id): Path<Uuid>,
  headers: HeaderMap,
) -> Result<Response, ApiError> {
  let identity = authenticate(&state, &headers).await?;
  let path = format!("/document/{}", document_id);

  if let Some(body) = state.cache.get(&path, &identity.user_id) {
    return Ok(Json(body).into_response());
  }

  let doc = state
    .store
    .get_document(document_id, &identity.user_id)
    .await?
    .ok_or(ApiError::NotFound)?;

  let body = serde_json::to_value(&doc).map_err(|e| ApiError::Internal(e.into()))?;
  state.cache.put(&path, &identity.user_id, body.clone());
  Ok(Json(body).into_response())
}

/// GET /document - the caller's recent documents, cache-backed
async fn list_documents(
  State(state): State<Arc<AppState>>,
  headers: HeaderMap,
) -> Result<Response, ApiError> {
  let identity = authenticate(&state, &headers).await?;

  if let Some(body) = state.cache.get(LISTING_PATH, &identity.user_id) {
    return Ok(Json(body).into_response());
  }

  let docs = state
    .store
    .list_recent(&identity.user_id, state.recent_limit)
    .await?;
  let body = serde_json::to_value(&docs).map_err(|e| ApiError::Internal(e.into()))?;
  state.cache.put(LISTING_PATH, &identity.user_id, body.clone());
  Ok(Json(body).into_response())
}
