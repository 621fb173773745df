//! Memoization of constructed formatters
//!
//! Each formatter kind owns its own process-wide [`FormatCache`], so keys of
//! different kinds never collide even when their option shapes overlap.
//! Caches are unbounded unless [`configure_format_caches`](super::configure_format_caches)
//! switches them to an LRU bound.

use std::collections::HashMap;
use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use lru::LruCache;
use serde::Serialize;

use crate::utils::errors::Result;
use crate::utils::logging;

/// The formatter families that get a separate cache namespace
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum FormatterKind {
    Currency,
    Number,
    DateTime,
    RelativeTime,
    PluralRules,
}

impl FormatterKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FormatterKind::Currency => "currency",
            FormatterKind::Number => "number",
            FormatterKind::DateTime => "dateTime",
            FormatterKind::RelativeTime => "relativeTime",
            FormatterKind::PluralRules => "pluralRules",
        }
    }
}

/// Snapshot of one cache's counters
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub kind: FormatterKind,
    pub entries: usize,
    pub hits: u64,
    pub misses: u64,
    pub capacity: Option<usize>,
}

enum Store<F> {
    Unbounded(HashMap<String, Arc<F>>),
    Bounded(LruCache<String, Arc<F>>),
}

impl<F> Store<F> {
    fn new(capacity: Option<usize>) -> Self {
        match capacity.and_then(NonZeroUsize::new) {
            Some(cap) => Store::Bounded(LruCache::new(cap)),
            None => Store::Unbounded(HashMap::new()),
        }
    }

    fn get(&mut self, key: &str) -> Option<Arc<F>> {
        match self {
            Store::Unbounded(map) => map.get(key).cloned(),
            Store::Bounded(lru) => lru.get(key).cloned(),
        }
    }

    fn insert(&mut self, key: String, value: Arc<F>) {
        match self {
            Store::Unbounded(map) => {
                map.insert(key, value);
            }
            Store::Bounded(lru) => {
                lru.put(key, value);
            }
        }
    }

    fn len(&self) -> usize {
        match self {
            Store::Unbounded(map) => map.len(),
            Store::Bounded(lru) => lru.len(),
        }
    }

    fn capacity(&self) -> Option<usize> {
        match self {
            Store::Unbounded(_) => None,
            Store::Bounded(lru) => Some(lru.cap().get()),
        }
    }
}

/// A keyed store of shared formatter instances
pub struct FormatCache<F> {
    kind: FormatterKind,
    store: Mutex<Store<F>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl<F> FormatCache<F> {
    /// Create an unbounded cache
    pub fn new(kind: FormatterKind) -> Self {
        Self::with_capacity(kind, None)
    }

    /// Create a cache; `Some(n)` bounds it to the `n` most recently used entries
    pub fn with_capacity(kind: FormatterKind, capacity: Option<usize>) -> Self {
        Self {
            kind,
            store: Mutex::new(Store::new(capacity)),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    pub fn kind(&self) -> FormatterKind {
        self.kind
    }

    fn lock(&self) -> MutexGuard<'_, Store<F>> {
        // A panic inside `build` never happens under the lock, so a poisoned
        // store is still consistent.
        self.store.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Return the formatter stored under `key`, building it on a miss
    ///
    /// The builder runs outside the lock. If two callers miss concurrently the
    /// first insert wins and both receive the same instance.
    pub fn get_or_insert_with<B>(&self, key: String, build: B) -> Result<Arc<F>>
    where
        B: FnOnce() -> Result<F>,
    {
        if let Some(found) = self.lock().get(&key) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return Ok(found);
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        logging::log_format_cache_miss(self.kind.as_str(), &key);
        let built = Arc::new(build()?);

        let mut store = self.lock();
        if let Some(existing) = store.get(&key) {
            return Ok(existing);
        }
        store.insert(key, Arc::clone(&built));
        Ok(built)
    }

    /// Derive the key from `(locale, options)` and look it up
    pub fn get_or_create<O, B>(&self, locale: &str, options: &O, build: B) -> Result<Arc<F>>
    where
        O: Serialize + ?Sized,
        B: FnOnce() -> Result<F>,
    {
        let key = make_cache_key(locale, options)?;
        self.get_or_insert_with(key, build)
    }

    /// Drop every entry and switch to the given bound
    pub fn reconfigure(&self, capacity: Option<usize>) {
        *self.lock() = Store::new(capacity);
        self.hits.store(0, Ordering::Relaxed);
        self.misses.store(0, Ordering::Relaxed);
    }

    /// Drop every entry, keeping the current bound
    pub fn clear(&self) {
        let capacity = self.lock().capacity();
        self.reconfigure(capacity);
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn stats(&self) -> CacheStats {
        let store = self.lock();
        CacheStats {
            kind: self.kind,
            entries: store.len(),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            capacity: store.capacity(),
        }
    }
}

/// Build a stable cache key from a locale and an options value
///
/// Options are typed structs with a fixed field order and `None` fields
/// skipped, so structurally equal options always serialize identically.
pub fn make_cache_key<O>(locale: &str, options: &O) -> Result<String>
where
    O: Serialize + ?Sized,
{
    Ok(format!("{}::{}", locale, serde_json::to_string(options)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    #[serde(rename_all = "camelCase")]
    struct Opts {
        #[serde(skip_serializing_if = "Option::is_none")]
        minimum_fraction_digits: Option<u8>,
        #[serde(skip_serializing_if = "Option::is_none")]
        maximum_fraction_digits: Option<u8>,
    }

    #[test]
    fn test_key_is_stable_for_equal_options() {
        let a = Opts { minimum_fraction_digits: Some(1), maximum_fraction_digits: None };
        let b = Opts { minimum_fraction_digits: Some(1), maximum_fraction_digits: None };
        assert_eq!(make_cache_key("en", &a).unwrap(), make_cache_key("en", &b).unwrap());
        assert_eq!(make_cache_key("en", &a).unwrap(), "en::{\"minimumFractionDigits\":1}");

        let c = Opts { minimum_fraction_digits: None, maximum_fraction_digits: Some(1) };
        assert_ne!(make_cache_key("en", &a).unwrap(), make_cache_key("en", &c).unwrap());
        assert_ne!(make_cache_key("en", &a).unwrap(), make_cache_key("es", &a).unwrap());
    }

    #[test]
    fn test_reuses_instances_and_counts() {
        let cache: FormatCache<String> = FormatCache::new(FormatterKind::Number);
        let first = cache.get_or_insert_with("k".into(), || Ok("v".to_string())).unwrap();
        let second = cache
            .get_or_insert_with("k".into(), || panic!("must not rebuild"))
            .unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        let stats = cache.stats();
        assert_eq!((stats.entries, stats.hits, stats.misses), (1, 1, 1));
        assert_eq!(stats.capacity, None);
    }

    #[test]
    fn test_build_errors_are_not_cached() {
        let cache: FormatCache<String> = FormatCache::new(FormatterKind::DateTime);
        let result = cache.get_or_insert_with("bad".into(), || {
            Err(crate::utils::errors::I18nError::InvalidOptions("nope".into()))
        });
        assert!(result.is_err());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_bounded_cache_evicts_least_recently_used() {
        let cache: FormatCache<u32> = FormatCache::with_capacity(FormatterKind::Number, Some(2));
        cache.get_or_insert_with("a".into(), || Ok(1)).unwrap();
        cache.get_or_insert_with("b".into(), || Ok(2)).unwrap();
        // touch "a" so "b" becomes the eviction candidate
        cache.get_or_insert_with("a".into(), || Ok(10)).unwrap();
        cache.get_or_insert_with("c".into(), || Ok(3)).unwrap();

        assert_eq!(cache.len(), 2);
        assert_eq!(*cache.get_or_insert_with("a".into(), || Ok(100)).unwrap(), 1);
        assert_eq!(*cache.get_or_insert_with("b".into(), || Ok(200)).unwrap(), 200);
        assert_eq!(cache.stats().capacity, Some(2));
    }

    #[test]
    fn test_clear_keeps_bound() {
        let cache: FormatCache<u32> = FormatCache::with_capacity(FormatterKind::Number, Some(4));
        cache.get_or_insert_with("a".into(), || Ok(1)).unwrap();
        cache.clear();
        assert!(cache.is_empty());
        assert_eq!(cache.stats().capacity, Some(4));
        assert_eq!(cache.stats().misses, 0);
    }
}
