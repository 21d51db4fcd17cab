//! In-process label resolution with request coalescing.
//!
//! The [`Resolver`] is the single path through which validation code
//! obtains term labels. It hides whether an answer came from the
//! in-memory index, the persistent store, or an external ontology query,
//! and guarantees at most one outstanding external query per CURIE per
//! process: concurrent callers for the same unresolved CURIE are merged
//! into one query plus N-1 waiters.

mod index;
mod resolver;

pub use index::MemoryIndex;
pub use resolver::{Resolver, ResolverConfig};
