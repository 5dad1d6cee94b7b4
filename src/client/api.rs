use reqwest::StatusCode;
use std::time::Duration;
use uuid::Uuid;

use crate::types::{Document, DocumentPayload, FieldError};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Failure modes of a document API call, mapped from the response status so
/// callers can react without string matching.
#[derive(Debug, thiserror::Error)]
pub enum ApiClientError {
  #[error("the server rejected the token")]
  Unauthenticated,
  #[error("document not found")]
  NotFound,
  #[error("payload rejected by the server")]
  Invalid(Vec<FieldError>),
  #[error("server error: HTTP {0}")]
  Server(u16),
  #[error("request failed: {0}")]
  Transport(#[from] reqwest::Error),
}

/// HTTP client for the document API.
pub struct ApiClient {
  http: reqwest::Client,
  base_url: String,
  token: String,
}

impl ApiClient {
  pub fn new(base_url: &str, token: &str) -> Result<Self, ApiClientError> {
    let http = reqwest::Client::builder()
      .timeout(REQUEST_TIMEOUT)
      .build()?;
    Ok(Self {
      http,
      base_url: base_url.trim_end_matches('/').to_string(),
      token: token.to_string(),
    })
  }

  fn url(&self, path: &str) -> String {
    format!("{}{}", self.base_url, path)
  }

  pub async fn create(&self, payload: &DocumentPayload) -> Result<Document, ApiClientError> {
    let resp = self
      .http
      .post(self.url("/document/new"))
      .bearer_auth(&self.token)
      .json(payload)
      .send()
      .await?;
    Ok(check(resp).await?.json().await?)
  }

  pub async fn update(&self, id: Uuid, payload: &DocumentPayload) -> Result<(), ApiClientError> {
    let resp = self
      .http
      .put(self.url(&format!("/document/{}", id)))
      .bearer_auth(&self.token)
      .json(payload)
      .send()
      .await?;
    check(resp).await?;
    Ok(())
  }

  pub async fn delete(&self, id: Uuid) -> Result<(), ApiClientError> {
    let resp = self
      .http
      .delete(self.url(&format!("/document/{}", id)))
      .bearer_auth(&self.token)
      .send()
      .await?;
    check(resp).await?;
    Ok(())
  }

  pub async fn get(&self, id: Uuid) -> Result<Document, ApiClientError> {
    let resp = self
      .http
      .get(self.url(&format!("/document/{}", id)))
      .bearer_auth(&self.token)
      .send()
      .await?;
    Ok(check(resp).await?.json().await?)
  }

  pub async fn list_recent(&self) -> Result<Vec<Document>, ApiClientError> {
    let resp = self
      .http
      .get(self.url("/document"))
      .bearer_auth(&self.token)
      .send()
      .await?;
    Ok(check(resp).await?.json().await?)
  }
}

/// Map an error response onto the typed failure set.
async fn check(resp: reqwest::Response) -> Result<reqwest::Response, ApiClientError> {
  match resp.status() {
    s if s.is_success() => Ok(resp),
    StatusCode::UNAUTHORIZED => Err(ApiClientError::Unauthenticated),
    StatusCode::NOT_FOUND => Err(ApiClientError::NotFound),
    StatusCode::UNPROCESSABLE_ENTITY => {
      #[derive(serde::Deserialize)]
      struct ValidationBody {
        #[serde(default)]
        fields: Vec<FieldError>,
      }
      let fields = match resp.json::<ValidationBody>().await {
        Ok(body) => body.fields,
        Err(_) => Vec::new(),
      };
      Err(ApiClientError::Invalid(fields))
    }
    s => Err(ApiClientError::Server(s.as_u16())),
  }
}
