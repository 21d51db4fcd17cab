//! [`MemoryIndex`], the process-lifetime CURIE to label map.

use std::collections::{HashMap, HashSet, hash_map::Entry};

use ontolabel_core::{CacheEntry, Curie};

/// Per-process deduplication map, seeded lazily from the persistent
/// store one namespace at a time and extended as lookups resolve.
///
/// Not internally synchronised; the [`Resolver`](crate::Resolver) guards
/// it together with the pending-lookup map so every mutation is a single
/// atomic step with respect to other callers.
#[derive(Debug, Default)]
pub struct MemoryIndex {
  labels: HashMap<String, String>,
  loaded: HashSet<String>,
}

impl MemoryIndex {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn get(&self, curie: &Curie) -> Option<&str> {
    self.labels.get(curie.as_str()).map(String::as_str)
  }

  /// Insert a label unless one is already present. First writer wins;
  /// returns whether this call inserted.
  pub fn put(&mut self, curie: &Curie, label: impl Into<String>) -> bool {
    match self.labels.entry(curie.as_str().to_owned()) {
      Entry::Vacant(slot) => {
        slot.insert(label.into());
        true
      }
      Entry::Occupied(_) => false,
    }
  }

  /// Merge entries loaded from the persistent store. First writer wins
  /// row-by-row, so duplicate rows keep the earliest label.
  pub fn merge(&mut self, entries: Vec<CacheEntry>) {
    for entry in entries {
      self.put(&entry.curie, entry.label);
    }
  }

  pub fn is_loaded(&self, namespace: &str) -> bool {
    self.loaded.contains(namespace)
  }

  pub fn mark_loaded(&mut self, namespace: impl Into<String>) {
    self.loaded.insert(namespace.into());
  }

  pub fn len(&self) -> usize {
    self.labels.len()
  }

  pub fn is_empty(&self) -> bool {
    self.labels.is_empty()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn put_is_first_writer_wins() {
    let mut index = MemoryIndex::new();
    let curie = Curie::new("GO:0008150");

    assert!(index.put(&curie, "biological_process"));
    assert!(!index.put(&curie, "something else"));
    assert_eq!(index.get(&curie), Some("biological_process"));
  }

  #[test]
  fn merge_keeps_earliest_duplicate() {
    let mut index = MemoryIndex::new();
    index.merge(vec![
      CacheEntry::new(Curie::new("GO:1"), "first"),
      CacheEntry::new(Curie::new("GO:1"), "second"),
      CacheEntry::new(Curie::new("GO:2"), "other"),
    ]);

    assert_eq!(index.len(), 2);
    assert_eq!(index.get(&Curie::new("GO:1")), Some("first"));
  }

  #[test]
  fn loaded_bookkeeping() {
    let mut index = MemoryIndex::new();
    assert!(!index.is_loaded("go"));
    index.mark_loaded("go");
    assert!(index.is_loaded("go"));
    assert!(!index.is_loaded("chebi"));
  }
}
