use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

struct CacheEntry<V> {
    stored_at: Instant,
    values: BTreeMap<String, V>,
}

/// Listing cache keyed by exact prefix path.
///
/// A lookup for `/torc/dev/api` never consults `/torc/dev`; each path is its
/// own entry. Entries live until `clear`/`invalidate`, or until the optional
/// TTL elapses. Reads hand out owned copies.
pub struct PathCache<V> {
    entries: Mutex<HashMap<String, CacheEntry<V>>>,
    ttl: Option<Duration>,
}

impl<V: Clone> Default for PathCache<V> {
    fn default() -> Self {
        Self::new(None)
    }
}

impl<V: Clone> PathCache<V> {
    /// `None` keeps entries for the life of the cache
    pub fn new(ttl: Option<Duration>) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            ttl,
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, CacheEntry<V>>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn is_fresh(&self, entry: &CacheEntry<V>) -> bool {
        match self.ttl {
            Some(ttl) => entry.stored_at.elapsed() < ttl,
            None => true,
        }
    }

    pub fn get(&self, path: &str) -> Option<BTreeMap<String, V>> {
        let mut entries = self.lock();
        match entries.get(path) {
            Some(entry) if self.is_fresh(entry) => Some(entry.values.clone()),
            Some(_) => {
                entries.remove(path);
                None
            }
            None => None,
        }
    }

    pub fn insert(&self, path: impl Into<String>, values: BTreeMap<String, V>) {
        self.lock().insert(
            path.into(),
            CacheEntry {
                stored_at: Instant::now(),
                values,
            },
        );
    }

    /// Drop one path. Returns whether it was cached.
    pub fn invalidate(&self, path: &str) -> bool {
        self.lock().remove(path).is_some()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listing(pairs: &[(&str, i32)]) -> BTreeMap<String, i32> {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn test_exact_path_lookup() {
        let cache = PathCache::default();
        cache.insert("/torc/dev", listing(&[("a", 1)]));

        assert_eq!(cache.get("/torc/dev"), Some(listing(&[("a", 1)])));
        assert_eq!(cache.get("/torc/dev/api"), None);
        assert_eq!(cache.get("/torc"), None);
    }

    #[test]
    fn test_invalidate_and_clear() {
        let cache = PathCache::default();
        cache.insert("/torc/dev/api", listing(&[("a", 1)]));
        cache.insert("/torc/dev/web", listing(&[("b", 2)]));

        assert!(cache.invalidate("/torc/dev/api"));
        assert!(!cache.invalidate("/torc/dev/api"));
        assert_eq!(cache.len(), 1);

        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn test_zero_ttl_expires_immediately() {
        let cache = PathCache::new(Some(Duration::ZERO));
        cache.insert("/torc/dev/api", listing(&[("a", 1)]));

        assert_eq!(cache.get("/torc/dev/api"), None);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_reads_are_copies() {
        let cache = PathCache::default();
        cache.insert("/torc/dev/api", listing(&[("a", 1)]));

        let mut first = cache.get("/torc/dev/api").unwrap();
        first.insert("b".to_string(), 2);

        assert_eq!(cache.get("/torc/dev/api"), Some(listing(&[("a", 1)])));
    }
}
