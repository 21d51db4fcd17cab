//! Error types surfaced to callers of `resolve`.

use thiserror::Error;

/// Failure to resolve a CURIE against the external ontology source.
///
/// Cloneable so one leader's outcome can be fanned out to every waiter
/// coalesced onto the same in-flight lookup. Outcomes carrying these are
/// never cached; a later `resolve` for the same CURIE retries.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
  #[error("term not found: {curie}")]
  NotFound { curie: String },

  #[error("ambiguous match for {curie}")]
  Ambiguous { curie: String },

  #[error("ontology source unavailable: {message}")]
  Unavailable { message: String },

  #[error("lookup timed out for {curie}")]
  Timeout { curie: String },
}

pub type Result<T, E = LookupError> = std::result::Result<T, E>;
