//! Diff cache for repeated commit-detail queries.
//!
//! Only the per-file changes of a commit are cached, keyed by
//! `(repository path, commit id)`. A commit id fixes both its tree and its
//! parents, so the first-parent diff can never go stale. Tags and
//! branch membership are mutable and are recomputed on every request.
//!
//! The cache is bounded; the oldest entry is evicted first.
//!
//! Used by: `GitRepository::get_commit_details()` in details.rs

use git2::Oid;
use std::collections::{HashMap, VecDeque};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Instant;

use crate::models::FileChange;

type CacheKey = (PathBuf, Oid);

struct CacheInner {
    entries: HashMap<CacheKey, Vec<FileChange>>,
    /// Insertion order, oldest first
    order: VecDeque<CacheKey>,
    hits: u64,
    misses: u64,
}

pub struct DiffCache {
    capacity: usize,
    inner: Mutex<CacheInner>,
    created_at: Instant,
}

impl DiffCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            inner: Mutex::new(CacheInner {
                entries: HashMap::new(),
                order: VecDeque::new(),
                hits: 0,
                misses: 0,
            }),
            created_at: Instant::now(),
        }
    }

    pub fn get(&self, repo_path: &Path, oid: Oid) -> Option<Vec<FileChange>> {
        let mut inner = self.inner.lock().ok()?;
        let found = inner.entries.get(&(repo_path.to_path_buf(), oid)).cloned();
        if found.is_some() {
            inner.hits += 1;
        } else {
            inner.misses += 1;
        }
        found
    }

    pub fn insert(&self, repo_path: &Path, oid: Oid, changes: Vec<FileChange>) {
        if self.capacity == 0 {
            return;
        }
        let Ok(mut inner) = self.inner.lock() else {
            return;
        };

        let key = (repo_path.to_path_buf(), oid);
        if inner.entries.insert(key.clone(), changes).is_none() {
            inner.order.push_back(key);
        }

        while inner.entries.len() > self.capacity {
            match inner.order.pop_front() {
                Some(oldest) => {
                    inner.entries.remove(&oldest);
                }
                None => break,
            }
        }
    }

    pub fn len(&self) -> usize {
        self.inner.lock().map(|inner| inner.entries.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Get cache statistics for debugging
    pub fn stats(&self) -> CacheStats {
        let (entries, hits, misses) = self
            .inner
            .lock()
            .map(|inner| (inner.entries.len(), inner.hits, inner.misses))
            .unwrap_or((0, 0, 0));
        CacheStats {
            entries,
            capacity: self.capacity,
            hits,
            misses,
            age_secs: self.created_at.elapsed().as_secs(),
        }
    }
}

#[derive(Debug)]
pub struct CacheStats {
    pub entries: usize,
    pub capacity: usize,
    pub hits: u64,
    pub misses: u64,
    pub age_secs: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ChangeStatus;

    fn change(path: &str) -> Vec<FileChange> {
        vec![FileChange {
            file_path: path.to_string(),
            status: ChangeStatus::Modified,
            lines_added: 1,
            lines_removed: 0,
            diff_snippet: String::new(),
        }]
    }

    fn oid(n: u8) -> Oid {
        Oid::from_bytes(&[n; 20]).unwrap()
    }

    #[test]
    fn evicts_oldest_entry_first() {
        let cache = DiffCache::new(2);
        let repo = Path::new("/repos/a");
        cache.insert(repo, oid(1), change("one"));
        cache.insert(repo, oid(2), change("two"));
        cache.insert(repo, oid(3), change("three"));

        assert_eq!(cache.len(), 2);
        assert!(cache.get(repo, oid(1)).is_none());
        assert_eq!(cache.get(repo, oid(3)).unwrap()[0].file_path, "three");
    }

    #[test]
    fn keys_include_repository_path() {
        let cache = DiffCache::new(8);
        cache.insert(Path::new("/repos/a"), oid(1), change("a"));
        assert!(cache.get(Path::new("/repos/b"), oid(1)).is_none());

        let stats = cache.stats();
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.entries, 1);
    }

    #[test]
    fn zero_capacity_disables_caching() {
        let cache = DiffCache::new(0);
        cache.insert(Path::new("/repos/a"), oid(1), change("a"));
        assert!(cache.is_empty());
    }
}
