//! Cache-first directory search engine.

use std::path::{Path, PathBuf};

use tracing::{debug, trace, warn};

use super::cache::LocationCache;
use super::config::SearchConfig;
use super::error::{SearchError, SearchResult};
use super::progress::SearchObserver;
use super::request::SearchRequest;
use crate::pattern::NamePredicate;

/// Counters for one engine's lifetime.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Requests answered from the location cache.
    pub cache_hits: usize,
    /// Full walks performed.
    pub full_walks: usize,
    /// Directories visited across all walks.
    pub directories_visited: usize,
}

/// Resolves search requests against a directory tree.
///
/// Owns the [`LocationCache`] for the lifetime of one repair pass. Not
/// thread-safe; requests are resolved one at a time so each one benefits
/// from directories found by the previous ones.
#[derive(Debug)]
pub struct SearchEngine {
    config: SearchConfig,
    cache: LocationCache,
    stats: SearchStats,
}

struct PendingDir {
    path: PathBuf,
    depth: usize,
}

impl SearchEngine {
    /// Create an engine with an empty cache.
    pub fn new(config: SearchConfig) -> Self {
        Self {
            config,
            cache: LocationCache::new(),
            stats: SearchStats::default(),
        }
    }

    /// The engine's configuration.
    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// The location cache.
    pub fn cache(&self) -> &LocationCache {
        &self.cache
    }

    /// Counters so far.
    pub fn stats(&self) -> SearchStats {
        self.stats
    }

    /// Check that the configured search root is an existing directory.
    pub fn validate_root(&self) -> SearchResult<()> {
        validate_root(&self.config.search_root)
    }

    /// Resolve a request: location cache first, then one full walk.
    ///
    /// Returns `Ok(None)` when the walk completes without a match. The
    /// cache is only updated after a successful walk.
    pub fn resolve(
        &mut self,
        request: &SearchRequest,
        observer: &mut dyn SearchObserver,
    ) -> SearchResult<Option<PathBuf>> {
        validate_root(&request.search_root)?;

        let predicate = request.predicate();

        if let Some(hit) = self.cache.try_resolve(
            &predicate,
            self.config.cache_strategy,
            request.accept_directory,
            self.config.sort_entries,
        ) {
            self.stats.cache_hits += 1;
            debug!(
                name = %request.desired_name,
                path = %hit.display(),
                "Resolved from location cache"
            );
            return Ok(Some(hit));
        }

        self.stats.full_walks += 1;
        let found = self.walk(request, &predicate, observer)?;

        match &found {
            Some(path) => {
                if let Some(dir) = path.parent() {
                    self.cache.insert(dir);
                }
                debug!(
                    name = %request.desired_name,
                    path = %path.display(),
                    "Resolved by directory walk"
                );
            }
            None => {
                debug!(
                    name = %request.desired_name,
                    root = %request.search_root.display(),
                    "No match under search root"
                );
            }
        }

        Ok(found)
    }

    /// Pre-order walk of the search root, stopping at the first match.
    fn walk(
        &mut self,
        request: &SearchRequest,
        predicate: &NamePredicate,
        observer: &mut dyn SearchObserver,
    ) -> SearchResult<Option<PathBuf>> {
        let mut stack = vec![PendingDir {
            path: request.search_root.clone(),
            depth: 0,
        }];
        let mut visited = 0;

        while let Some(dir) = stack.pop() {
            if observer.is_cancelled() {
                debug!(visited, "Directory walk cancelled");
                return Err(SearchError::Cancelled);
            }

            let entries = match read_entries(&dir.path, self.config.sort_entries) {
                Ok(entries) => entries,
                Err(source) if dir.depth == 0 => {
                    return Err(SearchError::Io {
                        path: dir.path,
                        source,
                    });
                }
                Err(e) => {
                    warn!(
                        path = %dir.path.display(),
                        error = %e,
                        "Failed to read directory, skipping"
                    );
                    continue;
                }
            };

            visited += 1;
            self.stats.directories_visited += 1;
            observer.on_directory(&dir.path, visited);
            trace!(path = %dir.path.display(), entries = entries.len(), "Visiting directory");

            let mut subdirs = Vec::new();
            for entry in entries {
                let acceptable = entry.is_file || (entry.is_dir && request.accept_directory);
                if acceptable && predicate.matches(&entry.name) {
                    return Ok(Some(dir.path.join(&entry.name)));
                }
                if entry.is_dir && entry.descend && self.should_descend(&entry.name, dir.depth) {
                    subdirs.push(PendingDir {
                        path: dir.path.join(&entry.name),
                        depth: dir.depth + 1,
                    });
                }
            }

            // Reverse so the first subdirectory is visited next.
            stack.extend(subdirs.into_iter().rev());
        }

        Ok(None)
    }

    fn should_descend(&self, name: &str, depth: usize) -> bool {
        if self.config.skip_hidden && name.starts_with('.') {
            return false;
        }
        match self.config.max_depth {
            Some(max) => depth < max,
            None => true,
        }
    }
}

fn validate_root(root: &Path) -> SearchResult<()> {
    if root.is_dir() {
        Ok(())
    } else {
        Err(SearchError::InvalidSearchRoot(root.to_path_buf()))
    }
}

struct DirEntryInfo {
    name: String,
    is_file: bool,
    is_dir: bool,
    /// Real directories only; symlinked directories are matched but not
    /// descended into to avoid cycles.
    descend: bool,
}

fn read_entries(dir: &Path, sort: bool) -> std::io::Result<Vec<DirEntryInfo>> {
    let mut entries = Vec::new();

    for entry in std::fs::read_dir(dir)? {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                trace!(path = %dir.display(), error = %e, "Skipping unreadable entry");
                continue;
            }
        };

        // Names that are not valid UTF-8 cannot match a document path.
        let Some(name) = entry.file_name().to_str().map(str::to_string) else {
            continue;
        };

        let file_type = match entry.file_type() {
            Ok(ft) => ft,
            Err(_) => continue,
        };

        let (is_file, is_dir, descend) = if file_type.is_symlink() {
            match std::fs::metadata(entry.path()) {
                Ok(target) => (target.is_file(), target.is_dir(), false),
                Err(e) => {
                    trace!(path = %entry.path().display(), error = %e, "Skipping dangling symlink");
                    continue;
                }
            }
        } else {
            (file_type.is_file(), file_type.is_dir(), file_type.is_dir())
        };

        entries.push(DirEntryInfo {
            name,
            is_file,
            is_dir,
            descend,
        });
    }

    if sort {
        entries.sort_by(|a, b| a.name.cmp(&b.name));
    }

    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pattern::PatternKind;
    use crate::search::{CacheStrategy, CancellationFlag, CallbackObserver, NoopObserver};
    use std::cell::Cell;
    use std::rc::Rc;
    use tempfile::TempDir;

    fn touch(path: &Path) {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(path, b"data").unwrap();
    }

    fn counting_observer() -> (CallbackObserver, Rc<Cell<usize>>) {
        let count = Rc::new(Cell::new(0));
        let count_clone = Rc::clone(&count);
        let observer = CallbackObserver::new(CancellationFlag::new())
            .with_callback(move |_, _| count_clone.set(count_clone.get() + 1));
        (observer, count)
    }

    fn udim_request(name: &str, root: &Path) -> SearchRequest {
        SearchRequest {
            desired_name: name.to_string(),
            pattern: PatternKind::Udim,
            accept_directory: false,
            search_root: root.to_path_buf(),
        }
    }

    #[test]
    fn test_invalid_root_is_rejected() {
        let mut engine = SearchEngine::new(SearchConfig::new("/nonexistent/root"));
        let req = SearchRequest::exact("a.png", "/nonexistent/root");
        let err = engine.resolve(&req, &mut NoopObserver).unwrap_err();
        assert!(matches!(err, SearchError::InvalidSearchRoot(_)));
        assert!(engine.validate_root().is_err());
    }

    #[test]
    fn test_root_that_is_a_file_is_rejected() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("file.txt");
        touch(&file);

        let mut engine = SearchEngine::new(SearchConfig::new(&file));
        let req = SearchRequest::exact("a.png", &file);
        assert!(matches!(
            engine.resolve(&req, &mut NoopObserver),
            Err(SearchError::InvalidSearchRoot(_))
        ));
    }

    #[test]
    fn test_finds_nested_file() {
        let temp = TempDir::new().unwrap();
        touch(&temp.path().join("a/b/c/wood.png"));

        let mut engine = SearchEngine::new(SearchConfig::new(temp.path()));
        let req = SearchRequest::exact("wood.png", temp.path());
        let found = engine.resolve(&req, &mut NoopObserver).unwrap();

        assert_eq!(found, Some(temp.path().join("a/b/c/wood.png")));
        assert!(engine.cache().contains(&temp.path().join("a/b/c")));
    }

    #[test]
    fn test_empty_root_yields_none() {
        let temp = TempDir::new().unwrap();
        let mut engine = SearchEngine::new(SearchConfig::new(temp.path()));
        let req = SearchRequest::exact("wood.png", temp.path());

        assert_eq!(engine.resolve(&req, &mut NoopObserver).unwrap(), None);
        assert!(engine.cache().is_empty());
    }

    #[test]
    fn test_udim_match_and_five_digit_rejection() {
        let temp = TempDir::new().unwrap();
        touch(&temp.path().join("other/tex.10011.png"));
        touch(&temp.path().join("textures/tex.1001.png"));

        let mut engine = SearchEngine::new(SearchConfig::new(temp.path()));
        let found = engine
            .resolve(&udim_request("tex.<UDIM>.png", temp.path()), &mut NoopObserver)
            .unwrap();
        assert_eq!(found, Some(temp.path().join("textures/tex.1001.png")));
    }

    #[test]
    fn test_five_digit_tile_alone_does_not_match() {
        let temp = TempDir::new().unwrap();
        touch(&temp.path().join("tex.10011.png"));

        let mut engine = SearchEngine::new(SearchConfig::new(temp.path()));
        let found = engine
            .resolve(&udim_request("tex.<UDIM>.png", temp.path()), &mut NoopObserver)
            .unwrap();
        assert_eq!(found, None);
    }

    #[test]
    fn test_directory_only_matches_when_accepted() {
        let temp = TempDir::new().unwrap();
        std::fs::create_dir_all(temp.path().join("proj/palette")).unwrap();

        let mut engine = SearchEngine::new(SearchConfig::new(temp.path()));
        let file_req = SearchRequest::exact("palette", temp.path());
        assert_eq!(engine.resolve(&file_req, &mut NoopObserver).unwrap(), None);

        let dir_req = SearchRequest {
            accept_directory: true,
            ..file_req
        };
        assert_eq!(
            engine.resolve(&dir_req, &mut NoopObserver).unwrap(),
            Some(temp.path().join("proj/palette"))
        );
    }

    #[test]
    fn test_second_lookup_in_same_directory_uses_cache() {
        let temp = TempDir::new().unwrap();
        touch(&temp.path().join("deep/one/a.png"));
        touch(&temp.path().join("deep/one/b.png"));
        touch(&temp.path().join("noise/x.txt"));

        let mut engine = SearchEngine::new(SearchConfig::new(temp.path()));
        let (mut observer, visits) = counting_observer();

        engine
            .resolve(&SearchRequest::exact("a.png", temp.path()), &mut observer)
            .unwrap()
            .unwrap();
        let after_first = visits.get();
        assert!(after_first > 0);

        let second = engine
            .resolve(&SearchRequest::exact("b.png", temp.path()), &mut observer)
            .unwrap();
        assert_eq!(second, Some(temp.path().join("deep/one/b.png")));
        assert_eq!(visits.get(), after_first);

        let stats = engine.stats();
        assert_eq!(stats.full_walks, 1);
        assert_eq!(stats.cache_hits, 1);
    }

    #[test]
    fn test_predicate_cache_strategy_reuses_directory_for_tiles() {
        let temp = TempDir::new().unwrap();
        touch(&temp.path().join("maps/skin.1001.exr"));
        touch(&temp.path().join("maps/eyes.1001.exr"));

        let config = SearchConfig::new(temp.path()).with_cache_strategy(CacheStrategy::Predicate);
        let mut engine = SearchEngine::new(config);
        let (mut observer, visits) = counting_observer();

        engine
            .resolve(&udim_request("skin.<UDIM>.exr", temp.path()), &mut observer)
            .unwrap();
        let after_first = visits.get();

        let found = engine
            .resolve(&udim_request("eyes.<UDIM>.exr", temp.path()), &mut observer)
            .unwrap();
        assert_eq!(found, Some(temp.path().join("maps/eyes.1001.exr")));
        assert_eq!(visits.get(), after_first);
    }

    #[test]
    fn test_exact_cache_strategy_walks_again_for_tiles() {
        let temp = TempDir::new().unwrap();
        touch(&temp.path().join("maps/skin.1001.exr"));
        touch(&temp.path().join("maps/eyes.1001.exr"));

        let mut engine = SearchEngine::new(SearchConfig::new(temp.path()));
        engine
            .resolve(&udim_request("skin.<UDIM>.exr", temp.path()), &mut NoopObserver)
            .unwrap();
        engine
            .resolve(&udim_request("eyes.<UDIM>.exr", temp.path()), &mut NoopObserver)
            .unwrap();

        assert_eq!(engine.stats().full_walks, 2);
        assert_eq!(engine.stats().cache_hits, 0);
    }

    #[test]
    fn test_cancellation_stops_walk() {
        let temp = TempDir::new().unwrap();
        for i in 0..5 {
            std::fs::create_dir_all(temp.path().join(format!("d{}", i))).unwrap();
        }

        let flag = CancellationFlag::new();
        let trigger = flag.clone();
        let visits = Rc::new(Cell::new(0));
        let visits_clone = Rc::clone(&visits);
        let mut observer = CallbackObserver::new(flag).with_callback(move |_, visited| {
            visits_clone.set(visited);
            if visited == 2 {
                trigger.cancel();
            }
        });

        let mut engine = SearchEngine::new(SearchConfig::new(temp.path()));
        let err = engine
            .resolve(&SearchRequest::exact("missing.png", temp.path()), &mut observer)
            .unwrap_err();

        assert!(matches!(err, SearchError::Cancelled));
        assert_eq!(visits.get(), 2);
        assert!(engine.cache().is_empty());
    }

    #[test]
    fn test_hidden_directories_walked_by_default() {
        let temp = TempDir::new().unwrap();
        touch(&temp.path().join(".assets/wood.png"));

        let req = SearchRequest::exact("wood.png", temp.path());
        let mut engine = SearchEngine::new(SearchConfig::new(temp.path()));
        assert_eq!(
            engine.resolve(&req, &mut NoopObserver).unwrap(),
            Some(temp.path().join(".assets/wood.png"))
        );

        let mut engine = SearchEngine::new(SearchConfig::new(temp.path()).with_skip_hidden(true));
        assert_eq!(engine.resolve(&req, &mut NoopObserver).unwrap(), None);
    }

    #[cfg(unix)]
    #[test]
    fn test_dangling_symlink_is_not_a_match() {
        let temp = TempDir::new().unwrap();
        std::fs::create_dir_all(temp.path().join("a")).unwrap();
        std::os::unix::fs::symlink("/nonexistent/wood.png", temp.path().join("a/wood.png")).unwrap();
        touch(&temp.path().join("b/wood.png"));

        let config = SearchConfig::new(temp.path()).with_sorted_entries(true);
        let mut engine = SearchEngine::new(config);
        let req = SearchRequest::exact("wood.png", temp.path());
        assert_eq!(
            engine.resolve(&req, &mut NoopObserver).unwrap(),
            Some(temp.path().join("b/wood.png"))
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinked_file_is_a_match() {
        let temp = TempDir::new().unwrap();
        touch(&temp.path().join("store/wood.png"));
        std::fs::create_dir_all(temp.path().join("a")).unwrap();
        std::os::unix::fs::symlink(temp.path().join("store/wood.png"), temp.path().join("a/wood.png"))
            .unwrap();

        let config = SearchConfig::new(temp.path()).with_sorted_entries(true);
        let mut engine = SearchEngine::new(config);
        let req = SearchRequest::exact("wood.png", temp.path());
        assert_eq!(
            engine.resolve(&req, &mut NoopObserver).unwrap(),
            Some(temp.path().join("a/wood.png"))
        );
    }

    #[test]
    fn test_max_depth_limits_walk() {
        let temp = TempDir::new().unwrap();
        touch(&temp.path().join("a/b/wood.png"));

        let req = SearchRequest::exact("wood.png", temp.path());

        let mut shallow = SearchEngine::new(SearchConfig::new(temp.path()).with_max_depth(Some(1)));
        assert_eq!(shallow.resolve(&req, &mut NoopObserver).unwrap(), None);

        let mut deep = SearchEngine::new(SearchConfig::new(temp.path()).with_max_depth(Some(2)));
        assert!(deep.resolve(&req, &mut NoopObserver).unwrap().is_some());
    }

    #[test]
    fn test_sorted_entries_pick_lowest_tile() {
        let temp = TempDir::new().unwrap();
        for tile in ["1003", "1001", "1002"] {
            touch(&temp.path().join(format!("maps/tex.{}.png", tile)));
        }

        let config = SearchConfig::new(temp.path()).with_sorted_entries(true);
        let mut engine = SearchEngine::new(config);
        let found = engine
            .resolve(&udim_request("tex.<UDIM>.png", temp.path()), &mut NoopObserver)
            .unwrap();
        assert_eq!(found, Some(temp.path().join("maps/tex.1001.png")));
    }

    #[test]
    fn test_sequence_match() {
        let temp = TempDir::new().unwrap();
        touch(&temp.path().join("render.exr"));
        touch(&temp.path().join("shots/render.42.exr"));

        let req = SearchRequest {
            desired_name: "render.<f>.exr".to_string(),
            pattern: PatternKind::Sequence,
            accept_directory: false,
            search_root: temp.path().to_path_buf(),
        };
        let mut engine = SearchEngine::new(SearchConfig::new(temp.path()));
        assert_eq!(
            engine.resolve(&req, &mut NoopObserver).unwrap(),
            Some(temp.path().join("shots/render.42.exr"))
        );
    }
}
