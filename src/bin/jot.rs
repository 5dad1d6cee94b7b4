use clap::Parser;
use jotter::client::{
  run_editor, run_init, run_new, run_token, ApiClient, ApiClientError, ClientArgs, Commands,
  DashboardView, GenerateClient,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
  let args = ClientArgs::parse();

  tracing_subscriber::registry()
    .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
    .with(tracing_subscriber::fmt::layer())
    .init();

  match &args.subcommand {
    Some(Commands::Init { backend }) => return run_init(backend).await,
    Some(Commands::Token { action }) => return run_token(action).await,
    Some(Commands::New) => {
      let api = require_api(&args)?;
      return run_new(&api).await;
    }
    Some(Commands::Open { document_id }) => {
      let api = require_api(&args)?;
      let generate = match &args.generate_url {
        Some(url) => Some(GenerateClient::new(url)?),
        None => None,
      };
      let doc = match api.get(*document_id).await {
        Ok(doc) => doc,
        Err(ApiClientError::NotFound) => {
          eprintln!("No such document");
          return Ok(());
        }
        Err(e) => return Err(e.into()),
      };
      return run_editor(&api, generate.as_ref(), doc).await;
    }
    None => {}
  }

  // Dashboard: landing view without an identity, workspace with one.
  let view = match &args.token {
    None => DashboardView::resolve(false, Vec::new()),
    Some(token) => {
      let api = ApiClient::new(&args.host, token)?;
      match api.list_recent().await {
        Ok(recent) => DashboardView::resolve(true, recent),
        Err(ApiClientError::Unauthenticated) => DashboardView::resolve(false, Vec::new()),
        Err(e) => return Err(e.into()),
      }
    }
  };
  println!("{}", view.render());
  Ok(())
}

fn require_api(args: &ClientArgs) -> Result<ApiClient, anyhow::Error> {
  let token = args
    .token
    .as_deref()
    .ok_or_else(|| anyhow::anyhow!("An API token is required (--token or JOTTER_TOKEN)"))?;
  Ok(ApiClient::new(&args.host, token)?)
}
