//! The [`LabelStore`] trait, the persistence seam.
//!
//! Implemented by storage backends (e.g. `ontolabel-store-csv`). The
//! resolver depends on this abstraction, not on any concrete backend.

use std::future::Future;

use crate::entry::CacheEntry;

/// Abstraction over a persistent, namespace-partitioned label table.
///
/// Backends are append-only: an entry is written once, on first
/// resolution, and never rewritten. Staleness is resolved only by
/// external deletion of the backing table (an operator action), never by
/// internal expiry.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes.
pub trait LabelStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Read every entry persisted for `namespace`.
  ///
  /// A missing table yields an empty vec. Individually malformed rows
  /// are skipped by the implementation, not surfaced here; a corrupt
  /// table degrades to "missing those rows".
  fn load<'a>(
    &'a self,
    namespace: &'a str,
  ) -> impl Future<Output = Result<Vec<CacheEntry>, Self::Error>> + Send + 'a;

  /// Append one entry to its namespace's table, creating the table (and
  /// its header) on first write. Safe to call many times in sequence
  /// without rewriting prior rows.
  fn append<'a>(
    &'a self,
    entry: &'a CacheEntry,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;
}
