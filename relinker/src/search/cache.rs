//! Session cache of directories that produced a match.

use std::path::{Path, PathBuf};

use tracing::trace;

use super::config::CacheStrategy;
use crate::pattern::NamePredicate;

/// Ordered, append-only set of directories that yielded a match during the
/// current pass.
///
/// Lookups check the most recently added directory first. The cache is
/// never pruned and never persisted.
#[derive(Debug, Clone, Default)]
pub struct LocationCache {
    dirs: Vec<PathBuf>,
}

impl LocationCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a directory. Directories already present are not duplicated.
    pub fn insert(&mut self, dir: impl Into<PathBuf>) -> bool {
        let dir = dir.into();
        if self.dirs.contains(&dir) {
            return false;
        }
        self.dirs.push(dir);
        true
    }

    /// Whether the directory has been recorded.
    pub fn contains(&self, dir: &Path) -> bool {
        self.dirs.iter().any(|d| d == dir)
    }

    /// Number of recorded directories.
    pub fn len(&self) -> usize {
        self.dirs.len()
    }

    /// Whether nothing has been recorded yet.
    pub fn is_empty(&self) -> bool {
        self.dirs.is_empty()
    }

    /// Recorded directories, most recent first.
    pub fn recent(&self) -> impl Iterator<Item = &Path> {
        self.dirs.iter().rev().map(PathBuf::as_path)
    }

    /// Look for the desired entry in the cached directories.
    ///
    /// Does not mutate the cache.
    pub fn try_resolve(
        &self,
        predicate: &NamePredicate,
        strategy: CacheStrategy,
        accept_directory: bool,
        sort_entries: bool,
    ) -> Option<PathBuf> {
        for dir in self.recent() {
            let hit = match strategy {
                CacheStrategy::ExactName => {
                    probe_exact(dir, predicate.desired_name(), accept_directory)
                }
                CacheStrategy::Predicate => {
                    probe_listing(dir, predicate, accept_directory, sort_entries)
                }
            };
            if let Some(path) = hit {
                trace!(dir = %dir.display(), "Location cache hit");
                return Some(path);
            }
        }
        None
    }
}

fn probe_exact(dir: &Path, name: &str, accept_directory: bool) -> Option<PathBuf> {
    let candidate = dir.join(name);
    let found = if accept_directory {
        candidate.exists()
    } else {
        candidate.is_file()
    };
    found.then_some(candidate)
}

fn probe_listing(
    dir: &Path,
    predicate: &NamePredicate,
    accept_directory: bool,
    sort_entries: bool,
) -> Option<PathBuf> {
    let entries = std::fs::read_dir(dir).ok()?;
    let mut names: Vec<(String, PathBuf)> = entries
        .flatten()
        .filter_map(|entry| {
            let path = entry.path();
            let name = entry.file_name().to_str()?.to_string();
            let acceptable = path.is_file() || (accept_directory && path.is_dir());
            acceptable.then_some((name, path))
        })
        .collect();

    if sort_entries {
        names.sort_by(|a, b| a.0.cmp(&b.0));
    }

    names
        .into_iter()
        .find(|(name, _)| predicate.matches(name))
        .map(|(_, path)| path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pattern::PatternKind;
    use tempfile::TempDir;

    #[test]
    fn test_insert_is_deduplicated() {
        let mut cache = LocationCache::new();
        assert!(cache.insert("/a"));
        assert!(cache.insert("/b"));
        assert!(!cache.insert("/a"));
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_recent_is_reverse_insertion_order() {
        let mut cache = LocationCache::new();
        cache.insert("/a");
        cache.insert("/b");
        cache.insert("/c");
        let order: Vec<_> = cache.recent().map(Path::to_path_buf).collect();
        assert_eq!(
            order,
            vec![PathBuf::from("/c"), PathBuf::from("/b"), PathBuf::from("/a")]
        );
    }

    #[test]
    fn test_empty_cache_misses() {
        let cache = LocationCache::new();
        let predicate = NamePredicate::compile("a.png", PatternKind::None);
        assert!(cache
            .try_resolve(&predicate, CacheStrategy::ExactName, false, false)
            .is_none());
    }

    #[test]
    fn test_exact_hit() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("a.png"), b"png").unwrap();

        let mut cache = LocationCache::new();
        cache.insert(temp.path());

        let predicate = NamePredicate::compile("a.png", PatternKind::None);
        let hit = cache.try_resolve(&predicate, CacheStrategy::ExactName, false, false);
        assert_eq!(hit, Some(temp.path().join("a.png")));
    }

    #[test]
    fn test_exact_strategy_misses_patterns() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("tex.1001.png"), b"png").unwrap();

        let mut cache = LocationCache::new();
        cache.insert(temp.path());

        let predicate = NamePredicate::compile("tex.<UDIM>.png", PatternKind::Udim);
        assert!(cache
            .try_resolve(&predicate, CacheStrategy::ExactName, false, false)
            .is_none());
    }

    #[test]
    fn test_predicate_strategy_hits_patterns() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("tex.1001.png"), b"png").unwrap();

        let mut cache = LocationCache::new();
        cache.insert(temp.path());

        let predicate = NamePredicate::compile("tex.<UDIM>.png", PatternKind::Udim);
        let hit = cache.try_resolve(&predicate, CacheStrategy::Predicate, false, false);
        assert_eq!(hit, Some(temp.path().join("tex.1001.png")));
    }

    #[test]
    fn test_exact_hit_ignores_directories_for_file_requests() {
        let temp = TempDir::new().unwrap();
        std::fs::create_dir(temp.path().join("maps")).unwrap();

        let mut cache = LocationCache::new();
        cache.insert(temp.path());

        let predicate = NamePredicate::compile("maps", PatternKind::None);
        assert!(cache
            .try_resolve(&predicate, CacheStrategy::ExactName, false, false)
            .is_none());
        assert_eq!(
            cache.try_resolve(&predicate, CacheStrategy::ExactName, true, false),
            Some(temp.path().join("maps"))
        );
    }

    #[test]
    fn test_most_recent_directory_wins() {
        let temp = TempDir::new().unwrap();
        let older = temp.path().join("older");
        let newer = temp.path().join("newer");
        std::fs::create_dir_all(&older).unwrap();
        std::fs::create_dir_all(&newer).unwrap();
        std::fs::write(older.join("a.png"), b"1").unwrap();
        std::fs::write(newer.join("a.png"), b"2").unwrap();

        let mut cache = LocationCache::new();
        cache.insert(&older);
        cache.insert(&newer);

        let predicate = NamePredicate::compile("a.png", PatternKind::None);
        let hit = cache.try_resolve(&predicate, CacheStrategy::ExactName, false, false);
        assert_eq!(hit, Some(newer.join("a.png")));
    }
}
