use colored::Colorize;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::collections::HashMap;
use uuid::Uuid;

use super::api::{ApiClient, ApiClientError};
use super::dashboard::{render_document, render_workspace};
use super::wizard::{GenerateClient, WizardPanel};
use crate::types::{Document, DocumentPayload};

/// What the editor should do after a save attempt.
#[derive(Debug, PartialEq, Eq)]
pub enum SubmitOutcome {
  /// Navigate to the detail view and show a success notification.
  Saved,
  /// Stay put; per-field errors were populated and nothing was sent.
  Rejected,
  /// Stay put with edits intact; the request failed.
  Failed(String),
}

/// What the editor should do after a delete attempt.
#[derive(Debug, PartialEq, Eq)]
pub enum DeleteOutcome {
  /// Navigate to the listing view and show a success notification.
  Deleted,
  /// Stay put; the request failed.
  Failed(String),
}

/// Local edit state for one document.
#[derive(Debug, Default)]
pub struct EditorForm {
  pub title: String,
  pub description: String,
  pub errors: HashMap<String, String>,
}

impl EditorForm {
  pub fn from_document(doc: &Document) -> Self {
    Self {
      title: doc.title.clone(),
      description: doc.description.clone(),
      errors: HashMap::new(),
    }
  }

  pub fn payload(&self) -> DocumentPayload {
    DocumentPayload::new(self.title.clone(), self.description.clone())
  }

  /// Run client-side validation, populating `errors` per field.
  pub fn validate(&mut self) -> bool {
    self.errors.clear();
    if let Err(fields) = self.payload().validate() {
      for f in fields {
        self.errors.insert(f.field, f.message);
      }
    }
    self.errors.is_empty()
  }

  /// Validate and, only if clean, send the update. Validation failure
  /// aborts before any network call.
  pub async fn submit(&mut self, api: &ApiClient, id: Uuid) -> SubmitOutcome {
    if !self.validate() {
      return SubmitOutcome::Rejected;
    }
    match api.update(id, &self.payload()).await {
      Ok(()) => SubmitOutcome::Saved,
      Err(ApiClientError::Invalid(fields)) => {
        // The server saw something client-side validation missed.
        for f in fields {
          self.errors.insert(f.field, f.message);
        }
        SubmitOutcome::Rejected
      }
      Err(e) => SubmitOutcome::Failed(e.to_string()),
    }
  }

  pub async fn delete(&self, api: &ApiClient, id: Uuid) -> DeleteOutcome {
    match api.delete(id).await {
      Ok(()) => DeleteOutcome::Deleted,
      Err(e) => DeleteOutcome::Failed(e.to_string()),
    }
  }
}

/// Interactive editor session for an existing document.
pub async fn run_editor(
  api: &ApiClient,
  generate: Option<&GenerateClient>,
  doc: Document,
) -> Result<(), anyhow::Error> {
  let mut form = EditorForm::from_document(&doc);
  let mut wizard = WizardPanel::new();
  let mut editor = DefaultEditor::new()?;

  println!("{}", render_document(&doc));
  println!("Type {} for help\n", ".help".cyan());

  loop {
    match editor.readline(&format!("{} ", "edit>".green())) {
      Ok(line) => {
        let line = line.trim();
        if line.is_empty() {
          continue;
        }
        let _ = editor.add_history_entry(line);

        let (cmd, rest) = match line.split_once(char::is_whitespace) {
          Some((c, r)) => (c, r.trim()),
          None => (line, ""),
        };
        match cmd {
          ".help" => println!(
            "Commands: .title <text>, .desc <text>, .show, .save, .delete, .wizard, .close, .quit"
          ),
          ".title" => form.title = rest.to_string(),
          ".desc" => form.description = rest.to_string(),
          ".show" => {
            println!("Title:       {}", form.title);
            println!("Description: {}", form.description);
          }
          ".save" => match form.submit(api, doc.id).await {
            SubmitOutcome::Saved => {
              println!("{}", "Document Successfully Updated".green());
              if let Ok(updated) = api.get(doc.id).await {
                println!("{}", render_document(&updated));
              }
              return Ok(());
            }
            SubmitOutcome::Rejected => {
              for (field, message) in &form.errors {
                eprintln!("{}: {}", field.red(), message);
              }
            }
            SubmitOutcome::Failed(reason) => {
              eprintln!("{}", "Error updating document. Please try again later.".red());
              tracing::debug!("Update failed: {}", reason);
            }
          },
          ".delete" => match form.delete(api, doc.id).await {
            DeleteOutcome::Deleted => {
              println!("{}", "Document Successfully Deleted".green());
              if let Ok(recent) = api.list_recent().await {
                println!("{}", render_workspace(&recent));
              }
              return Ok(());
            }
            DeleteOutcome::Failed(reason) => {
              eprintln!("{}", "Error deleting document. Please try again later.".red());
              tracing::debug!("Delete failed: {}", reason);
            }
          },
          ".wizard" => run_wizard(&mut wizard, generate, &form.description).await,
          ".close" => wizard.close(),
          ".quit" | ".exit" => return Ok(()),
          _ => eprintln!("Unknown command"),
        }
      }
      Err(ReadlineError::Interrupted | ReadlineError::Eof) => return Ok(()),
      Err(e) => {
        eprintln!("Error: {:?}", e);
        return Ok(());
      }
    }
  }
}

/// Interactive create flow.
pub async fn run_new(api: &ApiClient) -> Result<(), anyhow::Error> {
  let mut editor = DefaultEditor::new()?;
  let title = editor.readline("Title: ")?;
  let description = editor.readline("Description: ")?;

  let mut form = EditorForm {
    title: title.trim().to_string(),
    description: description.trim().to_string(),
    errors: HashMap::new(),
  };
  if !form.validate() {
    for (field, message) in &form.errors {
      eprintln!("{}: {}", field.red(), message);
    }
    return Ok(());
  }

  match api.create(&form.payload()).await {
    Ok(doc) => {
      println!("{}", "Document Successfully Created".green());
      println!("{}", render_document(&doc));
    }
    Err(e) => {
      eprintln!("{}", "Error creating document. Please try again later.".red());
      tracing::debug!("Create failed: {}", e);
    }
  }
  Ok(())
}

async fn run_wizard(
  wizard: &mut WizardPanel,
  generate: Option<&GenerateClient>,
  description: &str,
) {
  let Some(ticket) = wizard.activate(description) else {
    println!("{}", wizard.suggestion().yellow());
    return;
  };

  let Some(client) = generate else {
    wizard.close();
    eprintln!("{}", "No generation endpoint configured (--generate-url)".yellow());
    return;
  };

  println!("{}", "Asking the wizard...".cyan());
  let outcome = client.suggest(description).await;
  wizard.settle(ticket, outcome);
  println!("🧙 {}", wizard.suggestion());
}
