//! Directory search for missing references.
//!
//! [`SearchEngine`] resolves one [`SearchRequest`] at a time. It checks the
//! session [`LocationCache`] first and falls back to a full recursive walk
//! of the search root, stopping on the first matching entry. Successful
//! walks record the matching directory so later requests can skip the walk.
//!
//! The walk is strictly sequential. Progress is reported and cancellation
//! polled once per visited directory through a [`SearchObserver`].

mod cache;
mod config;
mod engine;
mod error;
mod progress;
mod request;

pub use cache::LocationCache;
pub use config::{CacheStrategy, SearchConfig};
pub use engine::{SearchEngine, SearchStats};
pub use error::{SearchError, SearchResult};
pub use progress::{CallbackObserver, CancellationFlag, NoopObserver, SearchObserver};
pub use request::SearchRequest;
