use moka::sync::Cache;
use sha2::{Digest, Sha256};
use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use vitrine::Controller;
use vitrine::storage::{FileStore, KeyValueStore, MemoryStore};

use crate::middleware::VisitorId;

/// A visitor's local storage.
pub type BrowserStore = Box<dyn KeyValueStore + Send>;

pub type VisitorController = Controller<BrowserStore>;

pub const DEFAULT_MAX_VISITORS: u64 = 10_000;
pub const DEFAULT_VISITOR_IDLE: Duration = Duration::from_secs(30 * 60);

// One controller per visitor, created on first request. Idle visitors and
// the least used ones past capacity are dropped; file-backed visitors are
// reloaded from disk on their next request.
#[derive(Clone)]
pub struct VisitorRegistry {
    controllers: Cache<String, Arc<Mutex<VisitorController>>>,
    data_dir: Option<PathBuf>,
}

fn build_cache(max_visitors: u64, idle: Duration) -> Cache<String, Arc<Mutex<VisitorController>>> {
    Cache::builder()
        .max_capacity(max_visitors)
        .time_to_idle(idle)
        .eviction_listener(|key: Arc<String>, _, cause| {
            let short: String = key.chars().take(8).collect();
            tracing::debug!("Dropped visitor {} ({:?})", short, cause);
        })
        .build()
}

impl VisitorRegistry {
    /// Visitors keep their storage in memory until they are dropped.
    pub fn in_memory() -> Self {
        Self {
            controllers: build_cache(DEFAULT_MAX_VISITORS, DEFAULT_VISITOR_IDLE),
            data_dir: None,
        }
    }

    /// Visitors keep their storage in one JSON file each under `data_dir`.
    pub fn with_data_dir(data_dir: PathBuf) -> Self {
        Self {
            controllers: build_cache(DEFAULT_MAX_VISITORS, DEFAULT_VISITOR_IDLE),
            data_dir: Some(data_dir),
        }
    }

    /// Caps how many visitors are held and how long an idle one is kept.
    pub fn with_limits(mut self, max_visitors: u64, idle: Duration) -> Self {
        self.controllers = build_cache(max_visitors, idle);
        self
    }

    // Hash the visitor id so the cookie value never reaches the filesystem
    fn storage_file_name(visitor: &VisitorId) -> String {
        let mut hasher = Sha256::new();
        hasher.update(visitor.as_str().as_bytes());
        format!("{}.json", hex::encode(hasher.finalize()))
    }

    fn open_store(&self, visitor: &VisitorId) -> BrowserStore {
        let Some(dir) = &self.data_dir else {
            return Box::new(MemoryStore::new());
        };
        let path = dir.join(Self::storage_file_name(visitor));
        match FileStore::open(&path) {
            Ok(store) => Box::new(store),
            Err(e) => {
                // Behave like a browser with storage disabled
                tracing::error!("Cannot open store {}: {}", path.display(), e);
                Box::new(MemoryStore::blocked())
            }
        }
    }

    /// Runs `f` against the visitor's controller while holding that
    /// visitor's lock, so intents from one visitor never interleave.
    pub fn with_visitor<R>(
        &self,
        visitor: &VisitorId,
        f: impl FnOnce(&mut VisitorController) -> R,
    ) -> R {
        let controller = self.controllers.get_with(visitor.as_str().to_string(), || {
            tracing::debug!("New visitor {}", visitor.short());
            Arc::new(Mutex::new(Controller::new(self.open_store(visitor))))
        });
        let mut controller = controller.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut controller)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visitors_are_isolated() {
        let registry = VisitorRegistry::in_memory();
        let ana = VisitorId::generate();
        let bob = VisitorId::generate();

        registry
            .with_visitor(&ana, |c| c.register("ana@example.com", "pw", "").map(|_| ()))
            .unwrap();

        assert!(registry.with_visitor(&ana, |c| c.session().is_some()));
        assert!(registry.with_visitor(&bob, |c| c.session().is_none()));

        // Each visitor has its own account list
        registry
            .with_visitor(&bob, |c| c.register("ana@example.com", "pw", "").map(|_| ()))
            .unwrap();
    }

    #[test]
    fn test_file_backed_visitor_survives_restart() {
        let dir = tempfile::tempdir().unwrap();
        let visitor = VisitorId::generate();

        let registry = VisitorRegistry::with_data_dir(dir.path().to_path_buf());
        registry
            .with_visitor(&visitor, |c| c.register("ana@example.com", "pw", "").map(|_| ()))
            .unwrap();

        let restarted = VisitorRegistry::with_data_dir(dir.path().to_path_buf());
        let email = restarted.with_visitor(&visitor, |c| c.session().map(|s| s.email.clone()));
        assert_eq!(email.as_deref(), Some("ana@example.com"));
    }

    #[test]
    fn test_storage_file_name_is_hashed() {
        let visitor = VisitorId::generate();
        let name = VisitorRegistry::storage_file_name(&visitor);
        assert_eq!(name.len(), 64 + ".json".len());
        assert!(!name.contains(visitor.as_str()));
    }

    #[test]
    fn test_registry_drops_visitors_past_capacity() {
        let registry = VisitorRegistry::in_memory().with_limits(100, Duration::from_secs(3600));
        for _ in 0..1_000 {
            registry.with_visitor(&VisitorId::generate(), |c| c.route());
        }

        registry.controllers.run_pending_tasks();
        assert!(registry.controllers.entry_count() <= 100);
    }

    #[test]
    fn test_dropped_file_visitor_is_reloaded() {
        let dir = tempfile::tempdir().unwrap();
        let registry = VisitorRegistry::with_data_dir(dir.path().to_path_buf())
            .with_limits(10, Duration::from_secs(3600));
        let ana = VisitorId::generate();
        registry
            .with_visitor(&ana, |c| c.register("ana@example.com", "pw", "").map(|_| ()))
            .unwrap();

        registry.controllers.invalidate(ana.as_str());
        registry.controllers.run_pending_tasks();

        let email = registry.with_visitor(&ana, |c| c.session().map(|s| s.email.clone()));
        assert_eq!(email.as_deref(), Some("ana@example.com"));
    }
}
