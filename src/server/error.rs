use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::types::FieldError;

/// Typed API failure, rendered at the HTTP boundary.
///
/// Callers can distinguish authentication failure, a missed ownership
/// predicate, a rejected payload, and infrastructure failure by status code
/// and the `error` field of the JSON body. Infrastructure detail is logged
/// server-side and never leaked to the caller.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
  #[error("user not authenticated")]
  Unauthenticated,
  #[error("document not found")]
  NotFound,
  #[error("invalid payload")]
  Validation(Vec<FieldError>),
  #[error(transparent)]
  Internal(#[from] anyhow::Error),
}

impl ApiError {
  pub fn code(&self) -> &'static str {
    match self {
      Self::Unauthenticated => "unauthenticated",
      Self::NotFound => "not_found",
      Self::Validation(_) => "validation",
      Self::Internal(_) => "internal",
    }
  }

  pub fn status(&self) -> StatusCode {
    match self {
      Self::Unauthenticated => StatusCode::UNAUTHORIZED,
      Self::NotFound => StatusCode::NOT_FOUND,
      Self::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
      Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let status = self.status();
    let body = match &self {
      Self::Validation(fields) => json!({
        "error": self.code(),
        "message": self.to_string(),
        "fields": fields,
      }),
      Self::Internal(e) => {
        tracing::error!("API request failed: {:#}", e);
        json!({
          "error": self.code(),
          "message": "internal error",
        })
      }
      _ => json!({
        "error": self.code(),
        "message": self.to_string(),
      }),
    };
    (status, Json(body)).into_response()
  }
}
