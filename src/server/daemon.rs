use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

use super::routes::{build_router, AppState};
use super::ServerConfig;
use crate::cache::{PageCache, Revalidator};
use crate::db::DocumentStore;

pub struct Daemon {
  config: ServerConfig,
  store: Arc<dyn DocumentStore>,
  shutdown_tx: broadcast::Sender<()>,
}

impl Daemon {
  pub fn new(config: ServerConfig, store: Arc<dyn DocumentStore>) -> Self {
    let (shutdown_tx, _) = broadcast::channel(1);
    Self {
      config,
      store,
      shutdown_tx,
    }
  }

  /// Trigger graceful shutdown of the HTTP server
  pub fn shutdown(&self) {
    tracing::info!("Initiating graceful shutdown...");
    let _ = self.shutdown_tx.send(());
  }

  pub async fn run(&self) -> Result<(), anyhow::Error> {
    tracing::info!("Initializing database schema...");
    self.store.init_schema().await?;

    let cache = Arc::new(PageCache::new(self.config.cache.max_pages));
    let revalidator = Revalidator::new(cache.clone());

    let state = Arc::new(AppState {
      store: self.store.clone(),
      cache,
      revalidator,
      recent_limit: self.config.cache.recent_limit,
    });

    let app = build_router(state).layer(cors_layer(&self.config.server.cors_origins));

    let addr = self.config.address();
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("Jotter API listening on {}", addr);

    let mut shutdown_rx = self.shutdown_tx.subscribe();
    axum::serve(listener, app)
      .with_graceful_shutdown(async move {
        let _ = shutdown_rx.recv().await;
      })
      .await?;

    tracing::info!("Jotter API stopped");
    Ok(())
  }
}

fn cors_layer(origins: &[String]) -> CorsLayer {
  if origins.iter().any(|o| o == "*") {
    CorsLayer::new()
      .allow_origin(Any)
      .allow_methods(Any)
      .allow_headers(Any)
  } else {
    let parsed: Vec<axum::http::HeaderValue> =
      origins.iter().filter_map(|o| o.parse().ok()).collect();
    CorsLayer::new()
      .allow_origin(AllowOrigin::list(parsed))
      .allow_methods(Any)
      .allow_headers(Any)
  }
}
