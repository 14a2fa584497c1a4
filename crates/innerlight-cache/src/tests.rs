//! Integration tests for the coordinator against an in-memory store.

use std::{
  collections::HashMap,
  sync::{
    Mutex,
    atomic::{AtomicBool, AtomicI64, Ordering},
  },
  time::Duration,
};

use chrono::DateTime;
use innerlight_core::{
  entity::{Collection, Entity, Stored},
  record::{
    Favorite, HighlightColor, JournalEntry, JournalPatch, Mood,
  },
  store::{EntityStore, ListQuery, Sort},
};
use serde_json::Value;
use uuid::Uuid;

use crate::{CollectionKey, Freshness, HighlightChange, Library};

// ─── In-memory store double ──────────────────────────────────────────────────

#[derive(Debug, thiserror::Error)]
#[error("synthetic store failure")]
struct StoreDown;

struct Row {
  id:         Uuid,
  created_at: chrono::DateTime<chrono::Utc>,
  fields:     Value,
}

/// Generic in-memory entity store with call counting and failure injection.
#[derive(Default)]
struct MemoryStore {
  rows:       Mutex<HashMap<Collection, Vec<Row>>>,
  list_calls: Mutex<HashMap<Collection, usize>>,
  fail_lists: AtomicBool,
  /// Artificial latency on list calls, for concurrency tests.
  list_delay: Option<Duration>,
  clock:      AtomicI64,
}

impl MemoryStore {
  fn with_list_delay(delay: Duration) -> Self {
    Self { list_delay: Some(delay), ..Self::default() }
  }

  fn list_calls(&self, collection: Collection) -> usize {
    self
      .list_calls
      .lock()
      .unwrap()
      .get(&collection)
      .copied()
      .unwrap_or(0)
  }

  fn row_count(&self, collection: Collection) -> usize {
    self
      .rows
      .lock()
      .unwrap()
      .get(&collection)
      .map(Vec::len)
      .unwrap_or(0)
  }

  fn fail_lists(&self, fail: bool) {
    self.fail_lists.store(fail, Ordering::SeqCst);
  }

  fn next_timestamp(&self) -> chrono::DateTime<chrono::Utc> {
    let tick = self.clock.fetch_add(1, Ordering::SeqCst);
    DateTime::from_timestamp(1_700_000_000 + tick, 0).expect("in range")
  }
}

impl EntityStore for MemoryStore {
  type Error = StoreDown;

  async fn list<E: Entity>(
    &self,
    query: &ListQuery,
  ) -> Result<Vec<Stored<E>>, StoreDown> {
    if let Some(delay) = self.list_delay {
      tokio::time::sleep(delay).await;
    }
    *self
      .list_calls
      .lock()
      .unwrap()
      .entry(E::COLLECTION)
      .or_default() += 1;
    if self.fail_lists.load(Ordering::SeqCst) {
      return Err(StoreDown);
    }

    let rows = self.rows.lock().unwrap();
    let mut selected: Vec<Stored<E>> = rows
      .get(&E::COLLECTION)
      .map(Vec::as_slice)
      .unwrap_or(&[])
      .iter()
      .map(|row| Stored {
        id:         row.id,
        created_at: row.created_at,
        fields:     serde_json::from_value(row.fields.clone())
          .expect("row shape"),
      })
      .collect();

    match query.sort {
      Some(Sort::CreatedAsc) => {
        selected.sort_by_key(|r| r.created_at);
      }
      Some(Sort::CreatedDesc) => {
        selected.sort_by_key(|r| std::cmp::Reverse(r.created_at));
      }
      None => {}
    }
    if let Some(limit) = query.limit {
      selected.truncate(limit);
    }
    Ok(selected)
  }

  async fn create<E: Entity>(
    &self,
    fields: E,
  ) -> Result<Stored<E>, StoreDown> {
    let id = Uuid::new_v4();
    let created_at = self.next_timestamp();
    self.rows.lock().unwrap().entry(E::COLLECTION).or_default().push(Row {
      id,
      created_at,
      fields: serde_json::to_value(&fields).expect("serialisable fields"),
    });
    Ok(Stored { id, created_at, fields })
  }

  async fn update<E: Entity>(
    &self,
    id: Uuid,
    patch: E::Patch,
  ) -> Result<Stored<E>, StoreDown> {
    let mut rows = self.rows.lock().unwrap();
    let row = rows
      .entry(E::COLLECTION)
      .or_default()
      .iter_mut()
      .find(|row| row.id == id)
      .ok_or(StoreDown)?;

    let patch = serde_json::to_value(&patch).expect("serialisable patch");
    if let (Value::Object(target), Value::Object(changes)) =
      (&mut row.fields, patch)
    {
      for (field, value) in changes {
        target.insert(field, value);
      }
    }

    Ok(Stored {
      id:         row.id,
      created_at: row.created_at,
      fields:     serde_json::from_value(row.fields.clone())
        .expect("row shape"),
    })
  }

  async fn delete<E: Entity>(&self, id: Uuid) -> Result<(), StoreDown> {
    self
      .rows
      .lock()
      .unwrap()
      .entry(E::COLLECTION)
      .or_default()
      .retain(|row| row.id != id);
    Ok(())
  }
}

// ─── Fixtures ────────────────────────────────────────────────────────────────

fn library() -> Library<MemoryStore> {
  Library::new(MemoryStore::default())
}

fn favorite(reference: &str) -> Favorite {
  Favorite {
    verse_reference: reference.to_string(),
    verse_text:      "For God so loved the world...".to_string(),
    bible_version:   "NIV".to_string(),
    personal_note:   None,
    category:        None,
  }
}

fn journal_entry(title: &str) -> JournalEntry {
  JournalEntry {
    title:          title.to_string(),
    content:        "Grateful for today.".to_string(),
    mood:           Some(Mood::Grateful),
    prayer_request: None,
    related_verses: Vec::new(),
  }
}

// ─── Cache coherence ─────────────────────────────────────────────────────────

#[tokio::test]
async fn repeated_reads_hit_the_cache() {
  let lib = library();
  // Seed the store directly so no invalidation is in play yet.
  lib
    .cache()
    .store()
    .create::<Favorite>(favorite("John 3:16"))
    .await
    .unwrap();

  let first = lib.favorites().await;
  let second = lib.favorites().await;

  assert_eq!(first.len(), 1);
  assert_eq!(second.len(), 1);
  assert_eq!(first.freshness(), Freshness::Fresh);
  assert_eq!(second.freshness(), Freshness::Fresh);
  // The cold read fetched once; the second read was a pure cache hit.
  assert_eq!(lib.cache().store().list_calls(Collection::Favorites), 1);
}

#[tokio::test]
async fn concurrent_cold_reads_share_one_fetch() {
  let lib = Library::new(MemoryStore::with_list_delay(
    Duration::from_millis(20),
  ));
  let cache = lib.cache();

  let mut tasks = Vec::new();
  for _ in 0..8 {
    let cache = std::sync::Arc::clone(cache);
    tasks.push(tokio::spawn(async move {
      cache.read::<Favorite>(CollectionKey::favorites()).await
    }));
  }

  for task in tasks {
    let snapshot = task.await.unwrap();
    assert_eq!(snapshot.freshness(), Freshness::Fresh);
    assert!(snapshot.is_empty());
  }
  assert_eq!(lib.cache().store().list_calls(Collection::Favorites), 1);
}

// ─── Invalidation propagation ────────────────────────────────────────────────

#[tokio::test]
async fn create_invalidates_dependent_reads() {
  let lib = library();

  let before = lib.favorites().await;
  assert!(before.is_empty());

  lib.add_favorite(favorite("Psalm 23:1")).await.unwrap();

  let after = lib.favorites().await;
  assert!(after.contains_reference("Psalm 23:1"));
  assert_eq!(after.freshness(), Freshness::Fresh);
}

#[tokio::test]
async fn bookmark_toggle_roundtrip() {
  let lib = library();

  lib.toggle_bookmark("Genesis", 1, "NIV").await.unwrap();
  let marked = lib.bookmarks().await;
  assert!(marked.chapter_bookmark("Genesis", 1, "NIV").is_some());
  assert_eq!(
    marked.chapter_bookmark("Genesis", 1, "NIV").unwrap().label,
    "Genesis 1"
  );

  lib.toggle_bookmark("Genesis", 1, "NIV").await.unwrap();
  let cleared = lib.bookmarks().await;
  assert!(cleared.chapter_bookmark("Genesis", 1, "NIV").is_none());
}

#[tokio::test]
async fn journal_update_is_visible_on_next_read() {
  let lib = library();

  let entry =
    lib.create_journal_entry(journal_entry("Morning")).await.unwrap();
  lib
    .update_journal_entry(entry.id, JournalPatch {
      title: Some("Evening".to_string()),
      ..JournalPatch::default()
    })
    .await
    .unwrap();

  let entries = lib.journal().await;
  assert_eq!(entries.len(), 1);
  assert_eq!(entries.records()[0].title, "Evening");
  // Untouched fields survive the patch.
  assert_eq!(entries.records()[0].mood, Some(Mood::Grateful));
}

#[tokio::test]
async fn mutation_during_inflight_fetch_is_not_served_as_fresh() {
  let lib = std::sync::Arc::new(Library::new(MemoryStore::with_list_delay(
    Duration::from_millis(40),
  )));
  let cache = std::sync::Arc::clone(lib.cache());

  // Kick off a slow fetch, then mutate while it is in flight.
  let reader = tokio::spawn(async move {
    cache.read::<Favorite>(CollectionKey::favorites()).await
  });
  tokio::time::sleep(Duration::from_millis(10)).await;
  lib.cache().create(favorite("Romans 8:28")).await.unwrap();

  // The overlapped fetch result must not be installed as fresh.
  let overlapped = reader.await.unwrap();
  assert_ne!(overlapped.freshness(), Freshness::Fresh);

  // And the next read reflects the mutation.
  let current = lib.favorites().await;
  assert!(current.contains_reference("Romans 8:28"));
  assert_eq!(current.freshness(), Freshness::Fresh);
}

// ─── Business rules ──────────────────────────────────────────────────────────

#[tokio::test]
async fn duplicate_favorite_is_skipped() {
  let lib = library();

  let first = lib.add_favorite(favorite("John 3:16")).await.unwrap();
  let second = lib.add_favorite(favorite("John 3:16")).await.unwrap();

  assert!(first.is_some());
  assert!(second.is_none());
  assert_eq!(lib.cache().store().row_count(Collection::Favorites), 1);
  assert_eq!(lib.favorites().await.len(), 1);
}

#[tokio::test]
async fn highlight_recolor_leaves_one_record() {
  let lib = library();

  let applied = lib
    .set_highlight("John 3:16", "For God so loved...", "NIV",
      HighlightColor::Yellow)
    .await
    .unwrap();
  assert_eq!(applied, HighlightChange::Applied);

  let recolored = lib
    .set_highlight("John 3:16", "For God so loved...", "NIV",
      HighlightColor::Blue)
    .await
    .unwrap();
  assert_eq!(recolored, HighlightChange::Recolored);

  let highlights = lib.highlights().await;
  assert_eq!(highlights.len(), 1);
  assert_eq!(
    highlights.for_verse("John 3:16", "NIV").unwrap().color,
    HighlightColor::Blue
  );
}

#[tokio::test]
async fn highlight_same_color_toggles_off() {
  let lib = library();

  lib
    .set_highlight("John 3:16", "For God so loved...", "NIV",
      HighlightColor::Pink)
    .await
    .unwrap();
  let cleared = lib
    .set_highlight("John 3:16", "For God so loved...", "NIV",
      HighlightColor::Pink)
    .await
    .unwrap();

  assert_eq!(cleared, HighlightChange::Cleared);
  assert!(lib.highlights().await.is_empty());
}

#[tokio::test]
async fn highlights_are_per_version() {
  let lib = library();

  lib
    .set_highlight("John 3:16", "For God so loved...", "NIV",
      HighlightColor::Yellow)
    .await
    .unwrap();
  lib
    .set_highlight("John 3:16", "For God so loved...", "KJV",
      HighlightColor::Green)
    .await
    .unwrap();

  let highlights = lib.highlights().await;
  assert_eq!(highlights.len(), 2);
  assert_eq!(
    highlights.for_verse("John 3:16", "NIV").unwrap().color,
    HighlightColor::Yellow
  );
}

#[tokio::test]
async fn journal_entry_requires_title_and_content() {
  let lib = library();

  let mut blank = journal_entry("");
  blank.title = String::new();
  let err = lib.create_journal_entry(blank).await.unwrap_err();
  assert!(matches!(
    err,
    crate::Error::Domain(innerlight_core::Error::EmptyJournalEntry)
  ));
  assert_eq!(lib.cache().store().row_count(Collection::Journal), 0);

  // A patch cannot blank out the content either.
  let entry =
    lib.create_journal_entry(journal_entry("Kept")).await.unwrap();
  let err = lib
    .update_journal_entry(entry.id, JournalPatch {
      content: Some("   ".to_string()),
      ..JournalPatch::default()
    })
    .await
    .unwrap_err();
  assert!(matches!(
    err,
    crate::Error::Domain(innerlight_core::Error::EmptyJournalEntry)
  ));
}

#[tokio::test]
async fn saving_a_sermon_twice_is_skipped() {
  let lib = library();
  let sermon = innerlight_core::record::SavedSermon {
    title:           "Hope in the Storm".to_string(),
    preacher:        Some("R. Example".to_string()),
    church:          None,
    location:        None,
    verse_reference: Some("Matthew 8:26".to_string()),
    sermon_url:      None,
    date:            None,
  };

  assert!(lib.save_sermon(sermon.clone()).await.unwrap().is_some());
  assert!(lib.save_sermon(sermon).await.unwrap().is_none());
  assert_eq!(lib.saved_sermons().await.len(), 1);
}

// ─── Reading history ─────────────────────────────────────────────────────────

#[tokio::test]
async fn reading_history_is_newest_first_and_capped() {
  let lib = library();

  for chapter in 1..=25 {
    lib.record_reading("Psalms", chapter, "NIV").await.unwrap();
  }

  let history = lib.reading_history().await;
  assert_eq!(history.len(), 20);
  assert_eq!(history.records()[0].chapter, 25);
  assert_eq!(history.records()[19].chapter, 6);
}

// ─── Failure semantics ───────────────────────────────────────────────────────

#[tokio::test]
async fn failed_refetch_keeps_previous_records_visible() {
  let lib = library();
  lib.add_favorite(favorite("John 3:16")).await.unwrap();

  let fresh = lib.favorites().await;
  assert_eq!(fresh.len(), 1);
  assert_eq!(fresh.freshness(), Freshness::Fresh);

  lib.cache().store().fail_lists(true);
  lib.cache().invalidate::<Favorite>();

  let degraded = lib.favorites().await;
  assert_eq!(degraded.freshness(), Freshness::Error);
  assert!(degraded.error().is_some());
  // Stale-while-error: the old records are still there.
  assert_eq!(degraded.len(), 1);
  assert!(degraded.contains_reference("John 3:16"));

  // Once the store recovers, the next read heals the snapshot.
  lib.cache().store().fail_lists(false);
  let healed = lib.favorites().await;
  assert_eq!(healed.freshness(), Freshness::Fresh);
  assert!(healed.error().is_none());
}

#[tokio::test]
async fn cold_read_against_dead_store_yields_empty_error_snapshot() {
  let lib = library();
  lib.cache().store().fail_lists(true);

  let snapshot = lib.favorites().await;
  assert_eq!(snapshot.freshness(), Freshness::Error);
  assert!(snapshot.is_empty());
  assert!(snapshot.error().is_some());
}
