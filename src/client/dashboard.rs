use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};

use crate::types::Document;

/// Top-level composition: the landing view for anonymous callers, the
/// workspace (new-document affordance plus recent listing) for
/// authenticated ones. No state beyond the identity check.
#[derive(Debug)]
pub enum DashboardView {
  Landing,
  Workspace { recent: Vec<Document> },
}

impl DashboardView {
  pub fn resolve(identity_present: bool, recent: Vec<Document>) -> Self {
    if identity_present {
      Self::Workspace { recent }
    } else {
      Self::Landing
    }
  }

  pub fn render(&self) -> String {
    match self {
      Self::Landing => render_landing(),
      Self::Workspace { recent } => render_workspace(recent),
    }
  }
}

pub fn render_landing() -> String {
  format!(
    "{}\n\nNotes with a wizard at hand. Sign in with {} (or {}) to see your documents.\n",
    "Jotter".green().bold(),
    "--token".cyan(),
    "JOTTER_TOKEN".cyan(),
  )
}

pub fn render_workspace(recent: &[Document]) -> String {
  let mut out = format!(
    "{}  run {} to start a document\n\n{}\n",
    "+ New".green().bold(),
    "jot new".cyan(),
    "Recent documents".bold(),
  );

  if recent.is_empty() {
    out.push_str("(nothing yet)\n");
    return out;
  }

  let mut table = Table::new();
  table
    .load_preset(UTF8_FULL)
    .set_content_arrangement(ContentArrangement::Dynamic)
    .set_header(vec!["ID", "Title", "Updated"]);
  for doc in recent {
    table.add_row(vec![
      doc.id.to_string(),
      doc.title.clone(),
      doc.updated_at.format("%Y-%m-%d %H:%M").to_string(),
    ]);
  }
  out.push_str(&table.to_string());
  out.push('\n');
  out
}

pub fn render_document(doc: &Document) -> String {
  format!(
    "{}\n{}\n\n{}\n\nCreated {}  ·  Updated {}",
    doc.title.bold(),
    doc.id.to_string().dimmed(),
    doc.description,
    doc.created_at.format("%Y-%m-%d %H:%M"),
    doc.updated_at.format("%Y-%m-%d %H:%M"),
  )
}
