//! [`Snapshot`] — a cached, wholesale-replaced copy of one collection's
//! records, plus the linear-scan view helpers built over it.
//!
//! The record sets here are small (well under a thousand rows), so every
//! derived check is an O(n) scan recomputed at call time; no incremental
//! index is maintained.

use std::sync::Arc;

use innerlight_core::{
  entity::Stored,
  record::{
    Bookmark, Favorite, Highlight, JournalEntry, Mood, ReadingEntry,
    SavedSermon,
  },
};

// ─── Freshness ───────────────────────────────────────────────────────────────

/// Lifecycle state of a cached snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Freshness {
  /// Up to date; reads return it without touching the store.
  Fresh,
  /// Superseded by a mutation (or never fetched); the next read refetches.
  Stale,
  /// A fetch is in flight; concurrent readers join it.
  Loading,
  /// The last fetch failed; any previous records are still served.
  Error,
}

// ─── Snapshot ────────────────────────────────────────────────────────────────

/// An ordered view of one collection as of its last successful fetch.
///
/// Cloning is cheap — the record list is shared, never copied. Snapshots
/// are replaced wholesale by the cache; nothing ever patches one in place.
#[derive(Debug)]
pub struct Snapshot<E> {
  records:   Arc<Vec<Stored<E>>>,
  freshness: Freshness,
  error:     Option<String>,
}

impl<E> Clone for Snapshot<E> {
  fn clone(&self) -> Self {
    Self {
      records:   Arc::clone(&self.records),
      freshness: self.freshness,
      error:     self.error.clone(),
    }
  }
}

impl<E> Snapshot<E> {
  pub(crate) fn new(
    records: Arc<Vec<Stored<E>>>,
    freshness: Freshness,
    error: Option<String>,
  ) -> Self {
    Self { records, freshness, error }
  }

  /// A snapshot that has never been fetched; what views hold before their
  /// first read resolves.
  pub fn empty() -> Self {
    Self {
      records:   Arc::new(Vec::new()),
      freshness: Freshness::Loading,
      error:     None,
    }
  }

  pub fn records(&self) -> &[Stored<E>] {
    &self.records
  }

  pub fn freshness(&self) -> Freshness {
    self.freshness
  }

  /// Message from the most recent failed fetch, if the snapshot is in the
  /// error state.
  pub fn error(&self) -> Option<&str> {
    self.error.as_deref()
  }

  pub fn len(&self) -> usize {
    self.records.len()
  }

  pub fn is_empty(&self) -> bool {
    self.records.is_empty()
  }

  pub fn iter(&self) -> std::slice::Iter<'_, Stored<E>> {
    self.records.iter()
  }
}

// ─── View helpers ────────────────────────────────────────────────────────────

impl Snapshot<Favorite> {
  /// Is this verse reference already favorited?
  pub fn contains_reference(&self, reference: &str) -> bool {
    self.iter().any(|f| f.verse_reference == reference)
  }

  /// Distinct categories present, in first-seen order.
  pub fn categories(&self) -> Vec<&str> {
    let mut seen = Vec::new();
    for favorite in self.iter() {
      if let Some(category) = favorite.category.as_deref()
        && !seen.contains(&category)
      {
        seen.push(category);
      }
    }
    seen
  }

  /// Favorites whose reference or text contains `query`, optionally
  /// restricted to one category.
  pub fn matching(
    &self,
    query: &str,
    category: Option<&str>,
  ) -> Vec<&Stored<Favorite>> {
    let needle = query.to_lowercase();
    self
      .iter()
      .filter(|f| {
        let text_match = needle.is_empty()
          || f.verse_reference.to_lowercase().contains(&needle)
          || f.verse_text.to_lowercase().contains(&needle);
        let category_match =
          category.is_none_or(|c| f.category.as_deref() == Some(c));
        text_match && category_match
      })
      .collect()
  }
}

impl Snapshot<Highlight> {
  /// The highlight on a verse in a given version, if any.
  pub fn for_verse(
    &self,
    reference: &str,
    version: &str,
  ) -> Option<&Stored<Highlight>> {
    self
      .iter()
      .find(|h| h.verse_reference == reference && h.version == version)
  }
}

impl Snapshot<Bookmark> {
  /// The bookmark on a chapter in a given version, if any.
  pub fn chapter_bookmark(
    &self,
    book: &str,
    chapter: u16,
    version: &str,
  ) -> Option<&Stored<Bookmark>> {
    self.iter().find(|b| {
      b.book == book && b.chapter == chapter && b.version == version
    })
  }

  /// Bookmarks saved under one Bible version.
  pub fn for_version(&self, version: &str) -> Vec<&Stored<Bookmark>> {
    self.iter().filter(|b| b.version == version).collect()
  }
}

impl Snapshot<ReadingEntry> {
  /// History entries recorded under one Bible version.
  pub fn for_version(&self, version: &str) -> Vec<&Stored<ReadingEntry>> {
    self.iter().filter(|h| h.version == version).collect()
  }
}

impl Snapshot<JournalEntry> {
  /// Entries whose title or content contains `query`, optionally filtered
  /// by mood.
  pub fn matching(
    &self,
    query: &str,
    mood: Option<Mood>,
  ) -> Vec<&Stored<JournalEntry>> {
    let needle = query.to_lowercase();
    self
      .iter()
      .filter(|entry| {
        let text_match = needle.is_empty()
          || entry.title.to_lowercase().contains(&needle)
          || entry.content.to_lowercase().contains(&needle);
        let mood_match = mood.is_none_or(|m| entry.mood == Some(m));
        text_match && mood_match
      })
      .collect()
  }
}

impl Snapshot<SavedSermon> {
  /// Is a sermon with this title already saved?
  pub fn contains_title(&self, title: &str) -> bool {
    self.iter().any(|s| s.title == title)
  }

  /// Sermons whose title or preacher contains `query`.
  pub fn matching(&self, query: &str) -> Vec<&Stored<SavedSermon>> {
    let needle = query.to_lowercase();
    self
      .iter()
      .filter(|s| {
        needle.is_empty()
          || s.title.to_lowercase().contains(&needle)
          || s
            .preacher
            .as_deref()
            .is_some_and(|p| p.to_lowercase().contains(&needle))
      })
      .collect()
  }
}
