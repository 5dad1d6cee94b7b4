use chrono::Utc;
use clap::{Args, Parser, Subcommand};
use uuid::Uuid;

use crate::auth;
use crate::db::{DocumentStore, PostgresStore, SqliteStore};

#[derive(Parser)]
#[command(name = "jot", about = "Jotter client", version)]
pub struct ClientArgs {
  /// Base URL of the jotd API
  #[arg(short = 'H', long, default_value = "http://localhost:8080", env = "JOTTER_URL")]
  pub host: String,

  /// API token authenticating the caller
  #[arg(short, long, env = "JOTTER_TOKEN")]
  pub token: Option<String>,

  /// URL of the external text-generation endpoint used by the wizard
  #[arg(long, env = "JOTTER_GENERATE_URL")]
  pub generate_url: Option<String>,

  #[command(subcommand)]
  pub subcommand: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
  /// Initialize the database schema
  Init {
    #[command(flatten)]
    backend: BackendArgs,
  },
  /// Manage API tokens
  Token {
    #[command(subcommand)]
    action: TokenAction,
  },
  /// Create a new document
  New,
  /// Open a document in the editor
  Open {
    /// Document id
    document_id: Uuid,
  },
}

#[derive(Args)]
pub struct BackendArgs {
  #[arg(long, env = "JOTTER_PG_URL")]
  pub pg_url: Option<String>,
  #[arg(long, env = "JOTTER_SQLITE_PATH")]
  pub sqlite: Option<String>,
}

#[derive(Subcommand)]
pub enum TokenAction {
  /// Issue a token for a user; the secret is printed once
  Add {
    /// The identity the token authenticates
    user_id: String,
    /// Label for the token (unique)
    #[arg(short, long)]
    name: Option<String>,
    #[command(flatten)]
    backend: BackendArgs,
  },
  /// List issued tokens
  List {
    #[command(flatten)]
    backend: BackendArgs,
  },
  /// Revoke a token by id
  Remove {
    /// Token id
    id: Uuid,
    #[command(flatten)]
    backend: BackendArgs,
  },
}

async fn open_store(args: &BackendArgs) -> Result<Box<dyn DocumentStore>, anyhow::Error> {
  if let Some(path) = &args.sqlite {
    Ok(Box::new(SqliteStore::new(path).await?))
  } else if let Some(url) = &args.pg_url {
    Ok(Box::new(PostgresStore::new(url, 5)?))
  } else {
    Err(anyhow::anyhow!("Either --pg-url or --sqlite is required"))
  }
}

pub async fn run_init(backend: &BackendArgs) -> Result<(), anyhow::Error> {
  let store = open_store(backend).await?;
  store.init_schema().await?;
  println!("Schema initialized");
  Ok(())
}

pub async fn run_token(action: &TokenAction) -> Result<(), anyhow::Error> {
  match action {
    TokenAction::Add {
      user_id,
      name,
      backend,
    } => {
      let store = open_store(backend).await?;
      let name = name
        .clone()
        .unwrap_or_else(|| format!("{}-{}", user_id, Utc::now().format("%Y%m%d%H%M%S")));
      let secret = auth::generate_token();
      let info = store
        .create_token(user_id, &name, &auth::hash_token(&secret))
        .await?;
      println!("Token {} ({}) issued for {}", info.id, info.name, info.user_id);
      println!("Secret (save it now, it is not stored): {}", secret);
    }
    TokenAction::List { backend } => {
      let store = open_store(backend).await?;
      for t in store.list_tokens().await? {
        println!("{}  {}  {}  {}", t.id, t.user_id, t.name, t.created_at);
      }
    }
    TokenAction::Remove { id, backend } => {
      let store = open_store(backend).await?;
      if store.delete_token(*id).await? {
        println!("Token {} revoked", id);
      } else {
        println!("No such token");
      }
    }
  }
  Ok(())
}
