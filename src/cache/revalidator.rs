use std::sync::Arc;
use tokio::sync::mpsc;

use super::pages::PageCache;

/// Best-effort revalidation queue. Mutation handlers hand a logical path to
/// [`request`](Revalidator::request) and move on; a worker task marks the
/// path stale. A failed enqueue is logged, never propagated: invalidation
/// must not gate or fail the mutation that triggered it.
#[derive(Clone)]
pub struct Revalidator {
  tx: mpsc::UnboundedSender<String>,
}

impl Revalidator {
  /// Spawn the worker task draining revalidation requests into `cache`.
  pub fn new(cache: Arc<PageCache>) -> Self {
    let (tx, mut rx) = mpsc::unbounded_channel::<String>();
    tokio::spawn(async move {
      while let Some(path) = rx.recv().await {
        cache.invalidate(&path);
        tracing::debug!("Revalidated {}", path);
      }
    });
    Self { tx }
  }

  /// Queue a path for revalidation. Fire-and-forget.
  pub fn request(&self, path: impl Into<String>) {
    let path = path.into();
    if self.tx.send(path).is_err() {
      tracing::warn!("Revalidation worker gone; request dropped");
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;
  use std::time::Duration;

  async fn settle() {
    // The worker runs on the same runtime; give it a beat to drain.
    tokio::time::sleep(Duration::from_millis(20)).await;
  }

  #[tokio::test]
  async fn queued_request_marks_path_stale() {
    let cache = Arc::new(PageCache::new(16));
    let revalidator = Revalidator::new(cache.clone());

    cache.put("/document", "u", json!(["cached"]));
    revalidator.request("/document");
    settle().await;

    assert_eq!(cache.get("/document", "u"), None);
  }

  #[tokio::test]
  async fn request_never_fails_the_caller() {
    let cache = Arc::new(PageCache::new(16));
    let revalidator = Revalidator::new(cache);

    // Even a flood of requests is accepted without error.
    for _ in 0..1000 {
      revalidator.request("/document");
    }
  }
}
