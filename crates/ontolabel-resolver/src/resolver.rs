//! [`Resolver`], the coalescing lookup protocol.

use std::{
  collections::HashMap,
  sync::{Arc, Mutex, MutexGuard, PoisonError},
  time::Duration,
};

use ontolabel_core::{
  CacheEntry, Curie, LookupError, client::OntologyClient, store::LabelStore,
};
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::index::MemoryIndex;

type Outcome = Result<String, LookupError>;
type FlightRx = watch::Receiver<Option<Outcome>>;
type FlightTx = watch::Sender<Option<Outcome>>;

// ─── Configuration ───────────────────────────────────────────────────────────

/// Tuning knobs for a [`Resolver`].
#[derive(Debug, Clone, Default)]
pub struct ResolverConfig {
  /// Deadline applied to each external lookup. `None` waits indefinitely.
  pub timeout: Option<Duration>,
}

// ─── Resolver ────────────────────────────────────────────────────────────────

/// The single entry point through which labels are obtained.
///
/// Construct one per validation run and drop it at the end; all state is
/// instance-scoped, so runs in the same process cannot cross-contaminate.
pub struct Resolver<S, C> {
  store:  Arc<S>,
  client: Arc<C>,
  config: ResolverConfig,
  /// Index plus pending-lookup map. A std mutex, never held across an
  /// await: every mutation is one atomic step from other callers' point
  /// of view.
  state: Mutex<State>,
  /// Serialises first-touch namespace loads so each table is read from
  /// disk at most once per process.
  load_lock: tokio::sync::Mutex<()>,
}

#[derive(Default)]
struct State {
  index:   MemoryIndex,
  pending: HashMap<String, FlightRx>,
}

/// How a caller participates in resolving a CURIE, decided under one
/// state-lock acquisition.
enum Role {
  /// Already in the index.
  Hit(String),
  /// Another caller's lookup is in flight; adopt its outcome.
  Waiter(FlightRx),
  /// This caller issues the external query for everyone.
  Leader(FlightTx),
}

impl<S, C> Resolver<S, C>
where
  S: LabelStore,
  C: OntologyClient,
{
  pub fn new(store: Arc<S>, client: Arc<C>, config: ResolverConfig) -> Self {
    Self {
      store,
      client,
      config,
      state: Mutex::new(State::default()),
      load_lock: tokio::sync::Mutex::new(()),
    }
  }

  /// Resolve `curie` to its canonical label.
  ///
  /// Memory first, then the persistent store (seeded lazily per
  /// namespace), then one coalesced external query. Failures are
  /// surfaced and never cached: the next call for the same CURIE
  /// retries.
  pub async fn resolve(&self, curie: &Curie) -> Result<String, LookupError> {
    self.ensure_loaded(&curie.namespace()).await;

    let role = {
      let mut state = self.state();
      if let Some(label) = state.index.get(curie) {
        Role::Hit(label.to_owned())
      } else if let Some(rx) = state.pending.get(curie.as_str()) {
        Role::Waiter(rx.clone())
      } else {
        let (tx, rx) = watch::channel(None);
        state.pending.insert(curie.as_str().to_owned(), rx);
        Role::Leader(tx)
      }
    };

    match role {
      Role::Hit(label) => Ok(label),
      Role::Waiter(rx) => self.wait(curie, rx).await,
      Role::Leader(tx) => self.lead(curie, tx).await,
    }
  }

  /// Number of labels resolved so far in this run (memory plus anything
  /// seeded from disk).
  pub fn resolved_len(&self) -> usize {
    self.state().index.len()
  }

  fn state(&self) -> MutexGuard<'_, State> {
    self.state.lock().unwrap_or_else(PoisonError::into_inner)
  }

  /// Seed the index from the persistent store the first time any CURIE
  /// in `namespace` is requested. Later calls are a map lookup.
  async fn ensure_loaded(&self, namespace: &str) {
    if self.state().index.is_loaded(namespace) {
      return;
    }

    // Serialise loads and re-check, so concurrent first touches read the
    // table from disk exactly once.
    let _guard = self.load_lock.lock().await;
    if self.state().index.is_loaded(namespace) {
      return;
    }

    let entries = match self.store.load(namespace).await {
      Ok(entries) => entries,
      Err(err) => {
        // A broken table degrades to an empty one; resolution proceeds
        // through the external client.
        warn!(namespace, error = %err, "failed to load label cache table");
        Vec::new()
      }
    };

    let mut state = self.state();
    debug!(namespace, count = entries.len(), "seeded label index");
    state.index.merge(entries);
    state.index.mark_loaded(namespace);
  }

  /// Attach to another caller's in-flight lookup and adopt its outcome.
  async fn wait(&self, curie: &Curie, mut rx: FlightRx) -> Outcome {
    loop {
      let published = rx.borrow_and_update().as_ref().cloned();
      if let Some(outcome) = published {
        return outcome;
      }
      if rx.changed().await.is_err() {
        // Leader dropped without publishing (cancelled mid-flight). Its
        // guard has already cleared the pending entry, so a retry is
        // possible immediately.
        return Err(LookupError::Unavailable {
          message: format!("in-flight lookup for {curie} was abandoned"),
        });
      }
    }
  }

  /// Issue the external query on behalf of every coalesced caller.
  async fn lead(&self, curie: &Curie, tx: FlightTx) -> Outcome {
    // Clears the pending entry even if this future is dropped
    // mid-query, so a CURIE can never be left permanently in-flight.
    let guard = FlightGuard {
      state: &self.state,
      key:   curie.as_str().to_owned(),
    };

    debug!(curie = curie.as_str(), "issuing external ontology lookup");
    let looked_up = match self.config.timeout {
      Some(deadline) => {
        match tokio::time::timeout(deadline, self.client.lookup(curie)).await {
          Ok(result) => result,
          Err(_) => Err(LookupError::Timeout {
            curie: curie.as_str().to_owned(),
          }),
        }
      }
      None => self.client.lookup(curie).await,
    };

    let outcome = match looked_up {
      Ok(label) => {
        // First writer wins: under a forced race the earliest label is
        // the one kept in memory and the only one appended.
        let (stored, inserted) = {
          let mut state = self.state();
          let inserted = state.index.put(curie, label.clone());
          let stored = state.index.get(curie).map(str::to_owned).unwrap_or(label);
          (stored, inserted)
        };

        if inserted {
          // Append happens before the outcome is published. A write
          // failure costs durability only; the label still serves the
          // rest of this process from memory.
          let entry = CacheEntry::new(curie.clone(), stored.clone());
          if let Err(err) = self.store.append(&entry).await {
            warn!(
              curie = curie.as_str(),
              error = %err,
              "failed to persist label cache entry"
            );
          }
        }
        Ok(stored)
      }
      Err(err) => Err(err),
    };

    // Deregister before publishing so no new caller can attach to a
    // completed flight, then fan the outcome out to the waiters.
    drop(guard);
    let _ = tx.send(Some(outcome.clone()));
    outcome
  }
}

/// Removes a pending-lookup entry when dropped.
struct FlightGuard<'a> {
  state: &'a Mutex<State>,
  key:   String,
}

impl Drop for FlightGuard<'_> {
  fn drop(&mut self) {
    let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
    state.pending.remove(&self.key);
  }
}
