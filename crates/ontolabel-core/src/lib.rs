//! Core types and trait definitions for the ontolabel label cache.
//!
//! This crate is deliberately free of filesystem and HTTP dependencies.
//! All other crates depend on it; it depends on nothing heavier than
//! `chrono` and `serde`.

pub mod client;
pub mod curie;
pub mod entry;
pub mod error;
pub mod store;

pub use curie::Curie;
pub use entry::CacheEntry;
pub use error::{LookupError, Result};
