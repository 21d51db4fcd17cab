//! Flat-file CSV backend for the ontolabel label cache.
//!
//! One delimited table per ontology namespace:
//! `<root>/<namespace>/terms.csv`, header `curie,label,retrieved_at`.
//! All writes are pure appends; a table is never rewritten. Consistency
//! across processes sharing a cache root is best-effort; it is strict
//! only within one process.

mod encode;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::{CsvStore, CsvStoreConfig};

#[cfg(test)]
mod tests;
