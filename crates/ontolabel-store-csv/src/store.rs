//! [`CsvStore`], the flat-file implementation of [`LabelStore`].

use std::path::PathBuf;

use ontolabel_core::{CacheEntry, store::LabelStore};
use serde::Deserialize;
use tokio::{fs, io::AsyncWriteExt as _, sync::Mutex};
use tracing::{debug, warn};

use crate::{
  encode::{self, HEADER},
  error::{Error, Result},
};

const TABLE_FILE: &str = "terms.csv";

// ─── Configuration ───────────────────────────────────────────────────────────

/// Settings for the file-backed label cache.
#[derive(Debug, Clone, Deserialize)]
pub struct CsvStoreConfig {
  /// Root directory holding one subdirectory per namespace.
  #[serde(default = "default_root")]
  pub root:    PathBuf,
  /// When false the store performs no filesystem access at all: loads
  /// are empty and appends are no-ops.
  #[serde(default = "default_enabled")]
  pub enabled: bool,
}

fn default_root() -> PathBuf {
  PathBuf::from("./cache")
}

fn default_enabled() -> bool {
  true
}

impl Default for CsvStoreConfig {
  fn default() -> Self {
    Self {
      root:    default_root(),
      enabled: default_enabled(),
    }
  }
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// A label store backed by one `terms.csv` per namespace.
pub struct CsvStore {
  config: CsvStoreConfig,
  /// Serializes appends so rows from one process cannot interleave.
  /// Cross-process writers are best-effort: each append is a single
  /// buffered write, so at worst whole rows interleave, and duplicates
  /// collapse first-writer-wins on load.
  write_lock: Mutex<()>,
}

impl CsvStore {
  pub fn new(config: CsvStoreConfig) -> Self {
    Self {
      config,
      write_lock: Mutex::new(()),
    }
  }

  /// A store with file caching switched off. Upstream in-memory
  /// deduplication behaves identically either way.
  pub fn disabled() -> Self {
    Self::new(CsvStoreConfig {
      root:    PathBuf::new(),
      enabled: false,
    })
  }

  fn namespace_dir(&self, namespace: &str) -> PathBuf {
    self.config.root.join(namespace)
  }
}

impl LabelStore for CsvStore {
  type Error = Error;

  async fn load(&self, namespace: &str) -> Result<Vec<CacheEntry>> {
    if !self.config.enabled {
      return Ok(Vec::new());
    }

    let path = self.namespace_dir(namespace).join(TABLE_FILE);
    let content = match fs::read_to_string(&path).await {
      Ok(content) => content,
      Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
      Err(err) => return Err(Error::Io { path, source: err }),
    };

    let mut entries = Vec::new();
    let mut skipped = 0usize;
    for record in encode::split_records(&content) {
      if record.is_empty() || record == HEADER {
        continue;
      }
      match encode::parse_row(record) {
        Ok(entry) => entries.push(entry),
        Err(err) => {
          skipped += 1;
          debug!(namespace, ?err, record, "rejected cache row");
        }
      }
    }

    if skipped > 0 {
      warn!(
        namespace,
        skipped,
        path = %path.display(),
        "skipped malformed label cache rows"
      );
    }
    debug!(namespace, count = entries.len(), "loaded label cache table");
    Ok(entries)
  }

  async fn append(&self, entry: &CacheEntry) -> Result<()> {
    if !self.config.enabled {
      return Ok(());
    }

    let _guard = self.write_lock.lock().await;

    let dir = self.namespace_dir(&entry.curie.namespace());
    let path = dir.join(TABLE_FILE);
    fs::create_dir_all(&dir).await.map_err(|err| Error::Io {
      path:   dir.clone(),
      source: err,
    })?;

    // Header plus row go out in one write, so a reader never observes a
    // torn record from this process.
    let mut chunk = String::new();
    let exists = fs::try_exists(&path).await.map_err(|err| Error::Io {
      path:   path.clone(),
      source: err,
    })?;
    if !exists {
      chunk.push_str(HEADER);
      chunk.push('\n');
    }
    chunk.push_str(&encode::encode_row(entry));
    chunk.push('\n');

    let mut file = fs::OpenOptions::new()
      .create(true)
      .append(true)
      .open(&path)
      .await
      .map_err(|err| Error::Io {
        path:   path.clone(),
        source: err,
      })?;
    file
      .write_all(chunk.as_bytes())
      .await
      .map_err(|err| Error::Io {
        path:   path.clone(),
        source: err,
      })?;
    // tokio's `File` buffers writes; flush before returning so the row is
    // on disk for readers the moment the append completes.
    file
      .flush()
      .await
      .map_err(|err| Error::Io { path, source: err })?;

    Ok(())
  }
}
