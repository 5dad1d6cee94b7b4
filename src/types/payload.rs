use serde::{Deserialize, Serialize};

pub const TITLE_MIN: usize = 2;
pub const TITLE_MAX: usize = 50;
pub const DESCRIPTION_MIN: usize = 2;

/// Per-field validation failure, keyed by payload field name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
  pub field: String,
  pub message: String,
}

impl FieldError {
  fn new(field: &str, message: &str) -> Self {
    Self {
      field: field.into(),
      message: message.into(),
    }
  }
}

/// Create/update request body. Missing fields deserialize to empty strings
/// and are caught by validation rather than failing deserialization.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocumentPayload {
  #[serde(default)]
  pub title: String,
  #[serde(default)]
  pub description: String,
}

impl DocumentPayload {
  pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
    Self {
      title: title.into(),
      description: description.into(),
    }
  }

  /// Check field lengths. Both fields are trimmed before counting, and
  /// lengths are measured in characters, not bytes.
  pub fn validate(&self) -> Result<(), Vec<FieldError>> {
    let mut errors = Vec::new();

    let title_len = self.title.trim().chars().count();
    if title_len < TITLE_MIN || title_len > TITLE_MAX {
      errors.push(FieldError::new(
        "title",
        "Title must be between 2 and 50 characters.",
      ));
    }

    if self.description.trim().chars().count() < DESCRIPTION_MIN {
      errors.push(FieldError::new(
        "description",
        "Description must be at least 2 characters.",
      ));
    }

    if errors.is_empty() {
      Ok(())
    } else {
      Err(errors)
    }
  }
}
