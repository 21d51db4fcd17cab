//! The persisted cache unit: one resolved CURIE → label pair.

use chrono::{DateTime, Timelike, Utc};
use serde::{Deserialize, Serialize};

use crate::curie::Curie;

/// `retrieved_at` format in persisted tables: ISO-8601, second precision.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// One resolved label, as written to (and read back from) a namespace
/// table. Immutable once persisted: `retrieved_at` is set on first
/// resolution and never updated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheEntry {
  pub curie:        Curie,
  pub label:        String,
  pub retrieved_at: DateTime<Utc>,
}

impl CacheEntry {
  /// Build an entry stamped with the current time, truncated to whole
  /// seconds so a persistence round-trip is lossless.
  pub fn new(curie: Curie, label: impl Into<String>) -> Self {
    let now = Utc::now();
    let retrieved_at = now.with_nanosecond(0).unwrap_or(now);
    Self {
      curie,
      label: label.into(),
      retrieved_at,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn new_truncates_subseconds() {
    let entry = CacheEntry::new(Curie::new("GO:0008150"), "biological_process");
    assert_eq!(entry.retrieved_at.nanosecond(), 0);
  }

  #[test]
  fn timestamp_format_is_second_precision() {
    let entry = CacheEntry::new(Curie::new("GO:0008150"), "biological_process");
    let rendered = entry.retrieved_at.format(TIMESTAMP_FORMAT).to_string();
    assert_eq!(rendered.len(), "2025-11-15T10:30:00".len());
  }
}
