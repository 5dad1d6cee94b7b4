use serde::Deserialize;
use std::time::Duration;

/// Shown when the wizard is activated with nothing to work from.
pub const EMPTY_DESCRIPTION_PROMPT: &str = "Please provide a valid description!";
/// Shown when the generate call fails for any reason.
pub const FAILURE_FALLBACK: &str = "Oops! Something went wrong. Please try again.";
/// Shown while no suggestion has arrived yet.
pub const SUGGESTION_PLACEHOLDER: &str = "Your suggestion will appear here!";

/// Handle tying a settled generate call back to the activation that issued
/// it. Responses from a superseded activation are discarded.
#[derive(Debug, Clone, Copy)]
pub struct RequestTicket {
  generation: u64,
}

/// Suggestion panel state. Closing only toggles visibility; it neither
/// cancels an in-flight request nor discards its eventual response. Only a
/// newer activation does that, via the generation counter.
#[derive(Debug, Default)]
pub struct WizardPanel {
  open: bool,
  loading: bool,
  suggestion: String,
  generation: u64,
}

impl WizardPanel {
  pub fn new() -> Self {
    Self::default()
  }

  /// Open the panel and decide whether a generate call is needed. A blank
  /// description short-circuits to the fixed prompt with no ticket, so the
  /// caller makes no network call at all.
  pub fn activate(&mut self, description: &str) -> Option<RequestTicket> {
    self.open = true;
    if description.trim().is_empty() {
      self.suggestion = EMPTY_DESCRIPTION_PROMPT.into();
      self.loading = false;
      return None;
    }
    self.generation += 1;
    self.loading = true;
    Some(RequestTicket {
      generation: self.generation,
    })
  }

  /// Apply a settled generate call. Stale tickets are ignored entirely,
  /// loading flag included; that flag belongs to the newer activation.
  pub fn settle(&mut self, ticket: RequestTicket, outcome: Result<String, GenerateError>) {
    if ticket.generation != self.generation {
      return;
    }
    self.loading = false;
    self.suggestion = match outcome {
      Ok(output) => output,
      Err(_) => FAILURE_FALLBACK.into(),
    };
  }

  pub fn close(&mut self) {
    self.open = false;
  }

  pub fn is_open(&self) -> bool {
    self.open
  }

  pub fn is_loading(&self) -> bool {
    self.loading
  }

  pub fn suggestion(&self) -> &str {
    if self.suggestion.is_empty() {
      SUGGESTION_PLACEHOLDER
    } else {
      &self.suggestion
    }
  }
}

#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
  #[error("generation endpoint returned HTTP {0}")]
  Status(u16),
  #[error("generation request failed: {0}")]
  Transport(#[from] reqwest::Error),
}

#[derive(Deserialize)]
struct GenerateResponse {
  output: String,
}

/// Client for the external text-generation endpoint.
pub struct GenerateClient {
  http: reqwest::Client,
  url: String,
}

impl GenerateClient {
  pub fn new(url: &str) -> Result<Self, GenerateError> {
    let http = reqwest::Client::builder()
      .timeout(Duration::from_secs(30))
      .build()?;
    Ok(Self {
      http,
      url: url.to_string(),
    })
  }

  /// POST the description and return the suggestion text.
  pub async fn suggest(&self, description: &str) -> Result<String, GenerateError> {
    let resp = self
      .http
      .post(&self.url)
      .json(&serde_json::json!({ "body": description }))
      .send()
      .await?;
    if !resp.status().is_success() {
      return Err(GenerateError::Status(resp.status().as_u16()));
    }
    let data: GenerateResponse = resp.json().await?;
    Ok(data.output)
  }
}
