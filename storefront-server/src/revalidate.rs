//! Path revalidation for server-rendered listings
//!
//! Writes bump a per-path revision. Listing responses derive a weak ETag from
//! that revision plus the query string, so clients holding a page rendered
//! before the write miss the cache and refetch.
//!
//! Revisions live in memory, so every tag also carries the revalidator's
//! epoch. Tags issued before a restart never match after it.

use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{PoisonError, RwLock};
use std::time::{SystemTime, UNIX_EPOCH};

/// Distinguishes revalidators created within the same clock tick.
static INSTANCES: AtomicU64 = AtomicU64::new(0);

/// Per-path revision counters
#[derive(Debug)]
pub struct Revalidator {
    epoch: u64,
    revisions: RwLock<HashMap<String, u64>>,
}

impl Default for Revalidator {
    fn default() -> Self {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or_default();
        let instance = INSTANCES.fetch_add(1, Ordering::Relaxed);
        Self::with_epoch(nanos.wrapping_add(instance))
    }
}

impl Revalidator {
    /// Revalidator whose tags are stamped with `epoch`.
    pub fn with_epoch(epoch: u64) -> Self {
        Self {
            epoch,
            revisions: RwLock::new(HashMap::new()),
        }
    }

    /// Mark everything rendered under `path` stale. Returns the new revision.
    pub fn revalidate_path(&self, path: &str) -> u64 {
        let mut revisions = self.revisions.write().unwrap_or_else(PoisonError::into_inner);
        let revision = revisions.entry(path.to_owned()).or_insert(0);
        *revision += 1;
        tracing::debug!(path, revision = *revision, "path revalidated");
        *revision
    }

    /// Current revision of `path` (0 until first revalidated).
    pub fn revision(&self, path: &str) -> u64 {
        self.revisions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(path)
            .copied()
            .unwrap_or(0)
    }

    /// Weak ETag for `path` rendered with `query`.
    pub fn etag(&self, path: &str, query: &str) -> String {
        let mut hasher = DefaultHasher::new();
        path.hash(&mut hasher);
        query.hash(&mut hasher);
        format!(
            "W/\"{:x}.{:x}-{:016x}\"",
            self.epoch,
            self.revision(path),
            hasher.finish()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn revisions_start_at_zero_and_increase() {
        let revalidator = Revalidator::default();
        assert_eq!(revalidator.revision("/products"), 0);
        assert_eq!(revalidator.revalidate_path("/products"), 1);
        assert_eq!(revalidator.revalidate_path("/products"), 2);
        assert_eq!(revalidator.revision("/brands"), 0);
    }

    #[test]
    fn etag_changes_on_revalidate() {
        let revalidator = Revalidator::default();
        let before = revalidator.etag("/products", "page=1");
        assert_eq!(before, revalidator.etag("/products", "page=1"));

        revalidator.revalidate_path("/products");
        assert_ne!(before, revalidator.etag("/products", "page=1"));
    }

    #[test]
    fn etag_from_previous_process_never_matches() {
        let before_restart = Revalidator::default();
        let stale = before_restart.etag("/products", "page=1");
        before_restart.revalidate_path("/products");

        let after_restart = Revalidator::default();
        assert_eq!(after_restart.revision("/products"), 0);
        assert_ne!(stale, after_restart.etag("/products", "page=1"));
    }

    #[test]
    fn same_epoch_and_revision_give_same_tag() {
        let a = Revalidator::with_epoch(7);
        let b = Revalidator::with_epoch(7);
        assert_eq!(a.etag("/products", "page=1"), b.etag("/products", "page=1"));
        assert!(a.etag("/products", "page=1").starts_with("W/\"7.0-"));
    }

    #[test]
    fn etag_depends_on_query() {
        let revalidator = Revalidator::default();
        assert_ne!(
            revalidator.etag("/products", "page=1"),
            revalidator.etag("/products", "page=2")
        );
    }
}
