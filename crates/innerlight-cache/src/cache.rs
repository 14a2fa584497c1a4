//! [`QueryCache`] — per-key snapshots with single-flight fetches and
//! mutation-driven invalidation.

use std::{
  any::Any,
  collections::HashMap,
  sync::{Arc, Mutex},
};

use innerlight_core::{
  entity::{Entity, Stored},
  store::EntityStore,
};
use tokio::sync::watch;
use tracing::{debug, trace, warn};
use uuid::Uuid;

use crate::{
  error::{Error, Result},
  key::CollectionKey,
  snapshot::{Freshness, Snapshot},
};

// ─── Slot ────────────────────────────────────────────────────────────────────

/// Cached state for one key. `records` holds an `Arc<Vec<Stored<E>>>`
/// behind `Any`; the key's collection pins which `E` that is.
struct Slot {
  records:    Option<Arc<dyn Any + Send + Sync>>,
  freshness:  Freshness,
  last_error: Option<String>,
  /// Completion signal of the in-flight fetch, when one exists.
  inflight:   Option<watch::Receiver<bool>>,
  /// Set when a mutation lands while a fetch is in flight; the fetch
  /// result is then installed stale instead of fresh.
  dirty:      bool,
}

impl Slot {
  fn cold() -> Self {
    Self {
      records:    None,
      freshness:  Freshness::Stale,
      last_error: None,
      inflight:   None,
      dirty:      false,
    }
  }
}

/// Outcome of examining a slot under the lock.
enum Claim<E> {
  /// Serve this snapshot as-is.
  Hit(Snapshot<E>),
  /// Another caller is fetching; wait for its completion signal.
  Wait(watch::Receiver<bool>),
  /// This caller owns the fetch and signals completion through the sender.
  Fetch(watch::Sender<bool>),
}

// ─── Cache ───────────────────────────────────────────────────────────────────

/// The single authority translating view reads and writes into entity
/// store calls.
///
/// Snapshots are advisory copies: the store is the source of truth, and a
/// snapshot is discarded wholesale whenever an invalidation touches it.
pub struct QueryCache<S> {
  store: S,
  slots: Mutex<HashMap<CollectionKey, Slot>>,
}

impl<S: EntityStore + 'static> QueryCache<S> {
  pub fn new(store: S) -> Arc<Self> {
    Arc::new(Self { store, slots: Mutex::new(HashMap::new()) })
  }

  /// The underlying store, for callers that need to bypass the cache.
  pub fn store(&self) -> &S {
    &self.store
  }

  // ── Reads ─────────────────────────────────────────────────────────────

  /// Resolve `key` to a snapshot.
  ///
  /// A fresh snapshot returns without a store call. A cold or stale key
  /// triggers exactly one fetch no matter how many callers arrive
  /// concurrently; the others wait on the same completion signal. A failed
  /// fetch keeps the previous records visible and surfaces the error on
  /// the snapshot instead of discarding data.
  pub async fn read<E: Entity>(
    self: &Arc<Self>,
    key: CollectionKey,
  ) -> Snapshot<E> {
    debug_assert_eq!(key.collection, E::COLLECTION);

    // A failed snapshot is retried once per read call: the entry claim
    // treats `Error` as fetchable, while waiters resuming after a fetch
    // settle for whatever state it produced.
    let mut retry_errors = true;
    loop {
      match self.claim::<E>(&key, retry_errors) {
        Claim::Hit(snapshot) => return snapshot,
        Claim::Wait(mut done) => {
          let _ = done.changed().await;
          retry_errors = false;
        }
        Claim::Fetch(done) => return self.fetch_into::<E>(&key, done).await,
      }
    }
  }

  fn claim<E: Entity>(
    &self,
    key: &CollectionKey,
    retry_errors: bool,
  ) -> Claim<E> {
    let mut slots = self.slots.lock().expect("slot table lock");
    let slot = slots.entry(key.clone()).or_insert_with(Slot::cold);

    match slot.freshness {
      Freshness::Fresh => {
        trace!(%key, "cache hit");
        return Claim::Hit(Self::snapshot_of::<E>(slot));
      }
      Freshness::Error if !retry_errors => {
        return Claim::Hit(Self::snapshot_of::<E>(slot));
      }
      Freshness::Loading => {
        // Join the in-flight fetch unless its owner was dropped mid-way,
        // in which case the slot is reclaimed below.
        if let Some(done) = &slot.inflight
          && done.has_changed().is_ok()
        {
          trace!(%key, "joining in-flight fetch");
          return Claim::Wait(done.clone());
        }
      }
      Freshness::Stale | Freshness::Error => {}
    }

    let (tx, rx) = watch::channel(false);
    slot.freshness = Freshness::Loading;
    slot.inflight = Some(rx);
    debug!(%key, "fetching");
    Claim::Fetch(tx)
  }

  async fn fetch_into<E: Entity>(
    self: &Arc<Self>,
    key: &CollectionKey,
    done: watch::Sender<bool>,
  ) -> Snapshot<E> {
    let result = self.store.list::<E>(&key.query).await;

    let snapshot = {
      let mut slots = self.slots.lock().expect("slot table lock");
      let slot = slots.entry(key.clone()).or_insert_with(Slot::cold);

      match result {
        Ok(records) => {
          debug!(%key, count = records.len(), "fetch complete");
          slot.records =
            Some(Arc::new(records) as Arc<dyn Any + Send + Sync>);
          slot.freshness = if slot.dirty {
            // A mutation landed while this fetch was in flight; force the
            // next read to fetch again rather than serving this result as
            // current.
            Freshness::Stale
          } else {
            Freshness::Fresh
          };
          slot.last_error = None;
        }
        Err(e) => {
          warn!(%key, error = %e, "fetch failed; keeping stale records");
          slot.freshness = Freshness::Error;
          slot.last_error = Some(e.to_string());
        }
      }

      slot.dirty = false;
      slot.inflight = None;
      Self::snapshot_of::<E>(slot)
    };

    let _ = done.send(true);
    snapshot
  }

  fn snapshot_of<E: Entity>(slot: &Slot) -> Snapshot<E> {
    let records = slot
      .records
      .as_ref()
      .and_then(|r| Arc::clone(r).downcast::<Vec<Stored<E>>>().ok())
      .unwrap_or_default();
    Snapshot::new(records, slot.freshness, slot.last_error.clone())
  }

  // ── Mutations ─────────────────────────────────────────────────────────

  /// Create a record, then invalidate every key of its collection.
  ///
  /// No optimistic write is applied: on failure the snapshots are exactly
  /// as they were, and the error is returned without retry.
  pub async fn create<E: Entity>(
    self: &Arc<Self>,
    fields: E,
  ) -> Result<Stored<E>> {
    let record =
      self.store.create::<E>(fields).await.map_err(Error::store)?;
    debug!(collection = %E::COLLECTION, id = %record.id, "record created");
    self.invalidate::<E>();
    Ok(record)
  }

  /// Partially update a record, then invalidate its collection.
  pub async fn update<E: Entity>(
    self: &Arc<Self>,
    id: Uuid,
    patch: E::Patch,
  ) -> Result<Stored<E>> {
    let record =
      self.store.update::<E>(id, patch).await.map_err(Error::store)?;
    debug!(collection = %E::COLLECTION, %id, "record updated");
    self.invalidate::<E>();
    Ok(record)
  }

  /// Delete a record, then invalidate its collection.
  pub async fn delete<E: Entity>(self: &Arc<Self>, id: Uuid) -> Result<()> {
    self.store.delete::<E>(id).await.map_err(Error::store)?;
    debug!(collection = %E::COLLECTION, %id, "record deleted");
    self.invalidate::<E>();
    Ok(())
  }

  /// Mark every key of `E`'s collection stale and refetch each in the
  /// background.
  ///
  /// The stale marking happens before this returns, so a read issued after
  /// a successful mutation can never observe the pre-mutation snapshot as
  /// fresh; the background refetches only shorten how long views display
  /// stale data.
  pub fn invalidate<E: Entity>(self: &Arc<Self>) {
    let keys: Vec<CollectionKey> = {
      let mut slots = self.slots.lock().expect("slot table lock");
      slots
        .iter_mut()
        .filter(|(key, _)| key.collection == E::COLLECTION)
        .map(|(key, slot)| {
          if slot.freshness == Freshness::Loading {
            slot.dirty = true;
          } else {
            slot.freshness = Freshness::Stale;
          }
          key.clone()
        })
        .collect()
    };

    for key in keys {
      debug!(%key, "invalidated");
      let cache = Arc::clone(self);
      tokio::spawn(async move {
        cache.read::<E>(key).await;
      });
    }
  }
}
