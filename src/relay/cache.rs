//! In-memory response cache for the relay
//!
//! Keys come from [`cache_key`], a 32-bit rolling hash. It is not a content
//! hash: two different inputs can share a key, in which case the second one
//! is answered with the first one's result. The cache only saves quota, so
//! that is tolerated.

use std::sync::Mutex;

use indexmap::IndexMap;

use crate::ai::GenerationResult;

/// Default number of entries kept before evicting the least recently used
pub const DEFAULT_CACHE_CAPACITY: usize = 1000;

/// Rolling hash over `commits.join("") + diff`, rendered as a signed decimal
///
/// Iterates UTF-16 code units with `h = h * 31 + unit` in wrapping 32-bit
/// arithmetic, so keys match those produced by the browser extension.
pub fn cache_key(commits: &[String], diff: &str) -> String {
    let hash = commits
        .iter()
        .map(String::as_str)
        .chain(std::iter::once(diff))
        .flat_map(str::encode_utf16)
        .fold(0i32, |hash, unit| {
            hash.wrapping_shl(5)
                .wrapping_sub(hash)
                .wrapping_add(i32::from(unit))
        });
    hash.to_string()
}

/// Process-wide cache of generation results, least-recently-used eviction
#[derive(Debug)]
pub struct ResponseCache {
    entries: Mutex<IndexMap<String, GenerationResult>>,
    /// 0 means unbounded
    capacity: usize,
}

impl Default for ResponseCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_CAPACITY)
    }
}

impl ResponseCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: Mutex::new(IndexMap::new()),
            capacity,
        }
    }

    /// Look up `key`, marking it as most recently used
    pub fn get(&self, key: &str) -> Option<GenerationResult> {
        let mut entries = self.entries.lock().ok()?;
        let index = entries.get_index_of(key)?;
        let last = entries.len() - 1;
        entries.move_index(index, last);
        entries.get_index(last).map(|(_, value)| value.clone())
    }

    /// Store `value` under `key`, evicting the oldest entry when full
    pub fn put(&self, key: String, value: GenerationResult) {
        let Ok(mut entries) = self.entries.lock() else {
            return;
        };

        entries.shift_remove(&key);
        entries.insert(key, value);

        if self.capacity > 0 {
            while entries.len() > self.capacity {
                if let Some((evicted, _)) = entries.shift_remove_index(0) {
                    tracing::debug!(key = %evicted, "Evicted cache entry");
                }
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.lock().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(title: &str) -> GenerationResult {
        GenerationResult {
            title: title.to_string(),
            description: format!("{title} body"),
        }
    }

    #[test]
    fn test_cache_key_matches_reference_values() {
        // h("a") = 97, h("ab") = 97 * 31 + 98
        assert_eq!(cache_key(&[], ""), "0");
        assert_eq!(cache_key(&["a".to_string()], ""), "97");
        assert_eq!(cache_key(&["a".to_string()], "b"), "3105");
        // "hello" is the classic 32-bit string hash
        assert_eq!(cache_key(&[], "hello"), "99162322");
    }

    #[test]
    fn test_cache_key_wraps_to_negative() {
        let key = cache_key(&[], "the quick brown fox jumps over the lazy dog");
        assert!(key.parse::<i32>().is_ok());
        assert_eq!(cache_key(&[], "polygenelubricants"), "-2147483648");
    }

    #[test]
    fn test_cache_key_ignores_commit_boundaries() {
        let split = cache_key(&["ab".to_string(), "c".to_string()], "d");
        let joined = cache_key(&["a".to_string(), "bc".to_string()], "d");
        assert_eq!(split, joined);
    }

    #[test]
    fn test_get_after_put() {
        let cache = ResponseCache::new(10);
        assert!(cache.get("k").is_none());
        cache.put("k".to_string(), result("a"));
        assert_eq!(cache.get("k"), Some(result("a")));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_least_recently_used_is_evicted() {
        let cache = ResponseCache::new(2);
        cache.put("a".to_string(), result("a"));
        cache.put("b".to_string(), result("b"));
        cache.get("a");
        cache.put("c".to_string(), result("c"));

        assert!(cache.get("b").is_none());
        assert!(cache.get("a").is_some());
        assert!(cache.get("c").is_some());
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_zero_capacity_is_unbounded() {
        let cache = ResponseCache::new(0);
        for i in 0..50 {
            cache.put(i.to_string(), result("x"));
        }
        assert_eq!(cache.len(), 50);
    }

    #[test]
    fn test_put_replaces_existing_value() {
        let cache = ResponseCache::new(5);
        cache.put("k".to_string(), result("old"));
        cache.put("k".to_string(), result("new"));
        assert_eq!(cache.get("k"), Some(result("new")));
        assert_eq!(cache.len(), 1);
    }
}
