//! Integration tests for `CsvStore` against a temporary cache root.

use ontolabel_core::{CacheEntry, Curie, store::LabelStore};
use tempfile::TempDir;

use crate::{CsvStore, CsvStoreConfig};

fn store_at(root: &TempDir) -> CsvStore {
  CsvStore::new(CsvStoreConfig {
    root:    root.path().to_path_buf(),
    enabled: true,
  })
}

fn entry(curie: &str, label: &str) -> CacheEntry {
  CacheEntry::new(Curie::new(curie), label)
}

// ─── Round trips ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn append_then_load_roundtrips() {
  let root = TempDir::new().unwrap();
  let s = store_at(&root);

  let written = entry("GO:0008150", "biological_process");
  s.append(&written).await.unwrap();

  let loaded = s.load("go").await.unwrap();
  assert_eq!(loaded.len(), 1);
  assert_eq!(loaded[0], written);
}

#[tokio::test]
async fn awkward_labels_roundtrip() {
  let root = TempDir::new().unwrap();
  let s = store_at(&root);

  let labels = [
    "water, liquid",
    "a \"quoted\" term",
    "τ-cell differentiation, αβ",
    "both, \"at once\"",
  ];
  for (i, label) in labels.iter().enumerate() {
    s.append(&entry(&format!("CHEBI:{i}"), label)).await.unwrap();
  }

  let loaded = s.load("chebi").await.unwrap();
  assert_eq!(loaded.len(), labels.len());
  for (i, label) in labels.iter().enumerate() {
    assert_eq!(loaded[i].curie.as_str(), format!("CHEBI:{i}"));
    assert_eq!(loaded[i].label, *label);
  }
}

#[tokio::test]
async fn load_missing_namespace_is_empty() {
  let root = TempDir::new().unwrap();
  let s = store_at(&root);
  assert!(s.load("uberon").await.unwrap().is_empty());
}

// ─── File layout ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn table_lives_under_lowercased_namespace() {
  let root = TempDir::new().unwrap();
  let s = store_at(&root);

  s.append(&entry("GO:0008150", "biological_process")).await.unwrap();

  let path = root.path().join("go").join("terms.csv");
  assert!(path.is_file(), "expected {path:?}");
}

#[tokio::test]
async fn header_is_written_exactly_once() {
  let root = TempDir::new().unwrap();
  let s = store_at(&root);

  s.append(&entry("GO:0000001", "one")).await.unwrap();
  s.append(&entry("GO:0000002", "two")).await.unwrap();

  let content =
    std::fs::read_to_string(root.path().join("go").join("terms.csv")).unwrap();
  let headers = content
    .lines()
    .filter(|l| *l == "curie,label,retrieved_at")
    .count();
  assert_eq!(headers, 1, "content:\n{content}");
  assert_eq!(content.lines().count(), 3);
}

#[tokio::test]
async fn appends_do_not_rewrite_prior_rows() {
  let root = TempDir::new().unwrap();
  let s = store_at(&root);

  s.append(&entry("GO:0000001", "one")).await.unwrap();
  let before =
    std::fs::read_to_string(root.path().join("go").join("terms.csv")).unwrap();

  s.append(&entry("GO:0000002", "two")).await.unwrap();
  let after =
    std::fs::read_to_string(root.path().join("go").join("terms.csv")).unwrap();

  assert!(after.starts_with(&before), "prior rows were rewritten");
}

// ─── Corruption tolerance ────────────────────────────────────────────────────

#[tokio::test]
async fn malformed_rows_are_skipped_not_fatal() {
  let root = TempDir::new().unwrap();
  let dir = root.path().join("go");
  std::fs::create_dir_all(&dir).unwrap();
  std::fs::write(
    dir.join("terms.csv"),
    "curie,label,retrieved_at\n\
     GO:0008150,biological_process,2025-11-15T10:30:00\n\
     GO:0000001,missing-timestamp\n\
     GO:0000002,bad time,not-a-timestamp\n\
     GO:0003674,molecular_function,2025-11-15T10:31:00\n",
  )
  .unwrap();

  let s = store_at(&root);
  let loaded = s.load("go").await.unwrap();
  assert_eq!(loaded.len(), 2);
  assert_eq!(loaded[0].label, "biological_process");
  assert_eq!(loaded[1].label, "molecular_function");
}

// ─── Disabled mode ───────────────────────────────────────────────────────────

#[tokio::test]
async fn disabled_store_touches_no_files() {
  let root = TempDir::new().unwrap();
  let s = CsvStore::new(CsvStoreConfig {
    root:    root.path().to_path_buf(),
    enabled: false,
  });

  s.append(&entry("GO:0008150", "biological_process")).await.unwrap();
  assert!(s.load("go").await.unwrap().is_empty());

  let children = std::fs::read_dir(root.path()).unwrap().count();
  assert_eq!(children, 0, "disabled store created files");
}

#[tokio::test]
async fn disabled_store_ignores_existing_tables() {
  let root = TempDir::new().unwrap();
  let dir = root.path().join("go");
  std::fs::create_dir_all(&dir).unwrap();
  std::fs::write(
    dir.join("terms.csv"),
    "curie,label,retrieved_at\nGO:0008150,biological_process,2025-11-15T10:30:00\n",
  )
  .unwrap();

  let s = CsvStore::new(CsvStoreConfig {
    root:    root.path().to_path_buf(),
    enabled: false,
  });
  assert!(s.load("go").await.unwrap().is_empty());
}
