//! Progress reporting and cooperative cancellation.

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Receives walk progress and answers cancellation queries.
///
/// Both methods are called once per visited directory during a full walk:
/// `is_cancelled` before the directory is read, `on_directory` after.
pub trait SearchObserver {
    /// A directory was visited. `visited` counts directories visited so far
    /// during the current walk.
    fn on_directory(&mut self, _dir: &Path, _visited: usize) {}

    /// Whether the walk should stop.
    fn is_cancelled(&self) -> bool {
        false
    }
}

/// Observer that ignores progress and never cancels.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl SearchObserver for NoopObserver {}

/// Shared cancellation flag.
///
/// Cloning yields a handle to the same flag, so it can be set from a
/// signal handler while the walk polls it.
#[derive(Debug, Clone, Default)]
pub struct CancellationFlag {
    cancelled: Arc<AtomicBool>,
}

impl CancellationFlag {
    /// Create a flag in the not-cancelled state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    /// Whether cancellation was requested.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// Progress callback for directory walks.
///
/// # Arguments
///
/// * `dir` - Directory just visited
/// * `visited` - Directories visited so far in the current walk
pub type DirectoryCallback = Box<dyn FnMut(&Path, usize)>;

/// Observer built from a cancellation flag and an optional callback.
pub struct CallbackObserver {
    flag: CancellationFlag,
    callback: Option<DirectoryCallback>,
}

impl CallbackObserver {
    /// Create an observer that only polls the flag.
    pub fn new(flag: CancellationFlag) -> Self {
        Self {
            flag,
            callback: None,
        }
    }

    /// Attach a progress callback.
    pub fn with_callback(mut self, callback: impl FnMut(&Path, usize) + 'static) -> Self {
        self.callback = Some(Box::new(callback));
        self
    }

    /// The flag this observer polls.
    pub fn flag(&self) -> &CancellationFlag {
        &self.flag
    }
}

impl SearchObserver for CallbackObserver {
    fn on_directory(&mut self, dir: &Path, visited: usize) {
        if let Some(callback) = self.callback.as_mut() {
            callback(dir, visited);
        }
    }

    fn is_cancelled(&self) -> bool {
        self.flag.is_cancelled()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn test_flag_clones_share_state() {
        let flag = CancellationFlag::new();
        let handle = flag.clone();
        assert!(!flag.is_cancelled());

        handle.cancel();
        assert!(flag.is_cancelled());
    }

    #[test]
    fn test_callback_observer_forwards_progress() {
        let seen = Rc::new(Cell::new(0));
        let seen_clone = Rc::clone(&seen);
        let mut observer = CallbackObserver::new(CancellationFlag::new())
            .with_callback(move |_, visited| seen_clone.set(visited));

        observer.on_directory(Path::new("/a"), 1);
        observer.on_directory(Path::new("/a/b"), 2);
        assert_eq!(seen.get(), 2);
    }

    #[test]
    fn test_callback_observer_reports_cancellation() {
        let flag = CancellationFlag::new();
        let observer = CallbackObserver::new(flag.clone());
        assert!(!observer.is_cancelled());

        flag.cancel();
        assert!(observer.is_cancelled());
    }
}
