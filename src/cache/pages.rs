use lru::LruCache;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::num::NonZeroUsize;

/// Cached rendering of one page variant.
#[derive(Clone)]
struct CachedPage {
  body: serde_json::Value,
  revision: u64,
}

/// In-process rendered-page cache keyed by logical path plus a per-caller
/// variant. Invalidation is revision-based: each path prefix carries a
/// revision counter, and an entry is only served while the combined revision
/// of its path's prefixes matches the revision it was rendered under. This
/// makes invalidating "/document" also cover "/document/{id}".
pub struct PageCache {
  entries: Mutex<LruCache<(String, String), CachedPage>>,
  revisions: Mutex<HashMap<String, u64>>,
}

impl PageCache {
  pub fn new(capacity: usize) -> Self {
    let capacity = NonZeroUsize::new(capacity.max(1)).expect("nonzero capacity");
    Self {
      entries: Mutex::new(LruCache::new(capacity)),
      revisions: Mutex::new(HashMap::new()),
    }
  }

  /// Combined revision of every '/'-delimited prefix of `path`.
  fn current_revision(&self, path: &str) -> u64 {
    let revisions = self.revisions.lock();
    prefixes(path)
      .map(|p| revisions.get(p).copied().unwrap_or(0))
      .sum()
  }

  /// Serve a cached rendering if it is still current.
  pub fn get(&self, path: &str, variant: &str) -> Option<serde_json::Value> {
    let current = self.current_revision(path);
    let key = (path.to_string(), variant.to_string());
    let mut entries = self.entries.lock();
    let stale = match entries.get(&key) {
      Some(page) => {
        if page.revision == current {
          return Some(page.body.clone());
        }
        true
      }
      None => false,
    };
    if stale {
      // Drop it so the slot frees up before the refill.
      entries.pop(&key);
    }
    None
  }

  /// Store a rendering under the path's current revision.
  pub fn put(&self, path: &str, variant: &str, body: serde_json::Value) {
    let revision = self.current_revision(path);
    self.entries.lock().put(
      (path.to_string(), variant.to_string()),
      CachedPage { body, revision },
    );
  }

  /// Mark `path` and everything nested beneath it stale.
  pub fn invalidate(&self, path: &str) {
    let mut revisions = self.revisions.lock();
    *revisions.entry(path.to_string()).or_insert(0) += 1;
  }
}

/// "/a/b" → "/", "/a", "/a/b"
fn prefixes(path: &str) -> impl Iterator<Item = &str> {
  std::iter::once("/")
    .chain(path.match_indices('/').skip(1).map(move |(i, _)| &path[..i]))
    .chain(std::iter::once(path).filter(|p| *p != "/"))
}
