//! Header classification cache.
//!
//! One `HeaderCache` is constructed at process start, shared by every
//! in-flight parse behind an `Arc`, and optionally flushed to disk on
//! shutdown. Keys are normalized header candidates.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;
use std::sync::RwLock;

use tracing::{debug, info};

use crate::errors::AppError;
use crate::models::resume::CanonicalSection;

#[derive(Debug, Default)]
pub struct HeaderCache {
    entries: RwLock<HashMap<String, CanonicalSection>>,
}

impl HeaderCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a previously persisted cache. A missing file yields an empty cache.
    pub fn load(path: &Path) -> Result<Self, AppError> {
        if !path.exists() {
            debug!("No header cache at {}, starting empty", path.display());
            return Ok(Self::new());
        }
        let raw = fs::read_to_string(path).map_err(|e| AppError::io(path, e))?;
        let entries: HashMap<String, CanonicalSection> = serde_json::from_str(&raw)?;
        info!(
            "Loaded {} cached header classifications from {}",
            entries.len(),
            path.display()
        );
        Ok(Self {
            entries: RwLock::new(entries),
        })
    }

    /// Writes the cache as pretty JSON with sorted keys, so repeated flushes
    /// of the same contents are byte-identical.
    pub fn persist(&self, path: &Path) -> Result<(), AppError> {
        let sorted: BTreeMap<String, CanonicalSection> = self
            .read()
            .iter()
            .map(|(k, v)| (k.clone(), *v))
            .collect();
        let json = serde_json::to_string_pretty(&sorted)?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| AppError::io(parent, e))?;
        }
        fs::write(path, json).map_err(|e| AppError::io(path, e))?;
        info!(
            "Persisted {} header classifications to {}",
            sorted.len(),
            path.display()
        );
        Ok(())
    }

    pub fn get(&self, normalized: &str) -> Option<CanonicalSection> {
        self.read().get(normalized).copied()
    }

    pub fn insert(&self, normalized: String, section: CanonicalSection) {
        self.entries
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(normalized, section);
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, HashMap<String, CanonicalSection>> {
        // Writers only insert whole entries; a poisoned map is still consistent.
        self.entries
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_insert_and_get() {
        let cache = HeaderCache::new();
        assert!(cache.is_empty());
        cache.insert("volunteer work".to_string(), CanonicalSection::Projects);
        assert_eq!(cache.get("volunteer work"), Some(CanonicalSection::Projects));
        assert_eq!(cache.get("hobbies"), None);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_load_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let cache = HeaderCache::load(&dir.path().join("absent.json")).unwrap();
        assert!(cache.is_empty());
    }

    #[test]
    fn test_persist_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("headers.json");

        let cache = HeaderCache::new();
        cache.insert("volunteer work".to_string(), CanonicalSection::Projects);
        cache.insert("hobbies".to_string(), CanonicalSection::Other);
        cache.persist(&path).unwrap();

        let reloaded = HeaderCache::load(&path).unwrap();
        assert_eq!(reloaded.len(), 2);
        assert_eq!(reloaded.get("hobbies"), Some(CanonicalSection::Other));
    }

    #[test]
    fn test_persist_is_byte_stable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("headers.json");
        let cache = HeaderCache::new();
        for (key, section) in [
            ("zeta", CanonicalSection::Awards),
            ("alpha", CanonicalSection::Skills),
            ("mid", CanonicalSection::Other),
        ] {
            cache.insert(key.to_string(), section);
        }
        cache.persist(&path).unwrap();
        let first = fs::read_to_string(&path).unwrap();
        cache.persist(&path).unwrap();
        let second = fs::read_to_string(&path).unwrap();
        assert_eq!(first, second);
        assert!(first.find("alpha").unwrap() < first.find("zeta").unwrap());
    }

    #[test]
    fn test_load_corrupt_file_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("headers.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(
            HeaderCache::load(&path),
            Err(AppError::CacheFormat(_))
        ));
    }

    #[test]
    fn test_concurrent_inserts() {
        let cache = Arc::new(HeaderCache::new());
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let cache = Arc::clone(&cache);
                thread::spawn(move || {
                    cache.insert(format!("header {i}"), CanonicalSection::Other);
                    cache.get(&format!("header {i}"))
                })
            })
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), Some(CanonicalSection::Other));
        }
        assert_eq!(cache.len(), 8);
    }
}
