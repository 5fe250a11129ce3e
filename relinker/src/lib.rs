//! Relinker - broken file reference repair for scene documents.
//!
//! This library finds path-bearing nodes in a host document (texture maps,
//! caches, proxies, audio, references, image sequences, UDIM tile-sets),
//! decides which of them point to missing files, and re-resolves them by
//! searching a directory tree.
//!
//! # Architecture
//!
//! ```text
//! HostDocument ──► build_catalog ──► [PathEntry]
//!                                        │ (invalid entries only)
//!                                        ▼
//!                  classify ──► NamePredicate ──► SearchEngine::resolve
//!                                                   │  LocationCache first,
//!                                                   │  then full walk
//!                                                   ▼
//!                                         WriteBackApplier::apply
//! ```
//!
//! The [`repair::RepairPass`] type drives the whole flow and also exposes
//! the simpler search-and-replace mode.

pub mod config;
pub mod document;
pub mod logging;
pub mod node;
pub mod pattern;
pub mod repair;
pub mod search;
pub mod writeback;

/// Version string of the library, taken from the crate manifest.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
