//! Token-aware file name matching.
//!
//! Paths may carry a UDIM tile token (`<UDIM>`) or a frame sequence token
//! (`<f>` / `<F>`). [`classify`] decides which pattern a reference uses
//! and extracts the leaf name to search for; [`NamePredicate`] turns that
//! leaf into a matcher for directory entry names.
//!
//! Missing tokens never fail: the pattern silently degrades to exact name
//! matching.

mod classify;
mod compile;

pub use classify::{classify, leaf_name, Classification, PatternKind, SEQUENCE_TOKENS, UDIM_TOKEN};
pub use compile::NamePredicate;
