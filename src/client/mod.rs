mod api;
mod commands;
mod dashboard;
mod editor;
mod wizard;

pub use api::{ApiClient, ApiClientError};
pub use commands::{run_init, run_token, BackendArgs, ClientArgs, Commands, TokenAction};
pub use dashboard::{render_document, render_landing, render_workspace, DashboardView};
pub use editor::{run_editor, run_new, DeleteOutcome, EditorForm, SubmitOutcome};
pub use wizard::{
  GenerateClient, GenerateError, RequestTicket, WizardPanel, EMPTY_DESCRIPTION_PROMPT,
  FAILURE_FALLBACK, SUGGESTION_PLACEHOLDER,
};
