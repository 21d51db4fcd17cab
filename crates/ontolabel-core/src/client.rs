//! The [`OntologyClient`] trait, the external ontology query seam.

use std::future::Future;

use crate::{curie::Curie, error::LookupError};

/// A collaborator that resolves a CURIE to its canonical label.
///
/// The caching layer makes no assumption about the underlying query
/// mechanism (local database, remote service) beyond this signature, and
/// treats every failure uniformly: surfaced, never cached.
pub trait OntologyClient: Send + Sync {
  /// Resolve `curie` to its canonical human-readable label.
  fn lookup<'a>(
    &'a self,
    curie: &'a Curie,
  ) -> impl Future<Output = Result<String, LookupError>> + Send + 'a;
}
