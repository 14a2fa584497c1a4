//! [`Library`] — the devotional operations layer over [`QueryCache`].
//!
//! Encodes the read-before-write business rules the store itself does not
//! enforce: favorite idempotence, one highlight per verse and version, one
//! bookmark per chapter and version, journal field validation. Each rule is
//! a membership scan over the current snapshot followed by the mutation,
//! so two writers racing from different sessions can still produce
//! duplicates — the store offers no uniqueness constraint to lean on.

use std::sync::Arc;

use innerlight_core::{
  entity::Stored,
  record::{
    Bookmark, Favorite, Highlight, HighlightColor, JournalEntry,
    JournalPatch, ReadingEntry, SavedSermon,
  },
  reference::chapter_label,
  store::EntityStore,
};
use tracing::debug;
use uuid::Uuid;

use crate::{
  cache::QueryCache,
  error::Result,
  key::CollectionKey,
  snapshot::Snapshot,
};

/// What a highlight action did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HighlightChange {
  /// A new highlight was created on an unmarked verse.
  Applied,
  /// An existing highlight was replaced with a different color.
  Recolored,
  /// Re-applying the current color removed the highlight.
  Cleared,
}

/// What a bookmark toggle did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookmarkChange {
  Added,
  Removed,
}

/// High-level reads and writes for every devotional collection.
pub struct Library<S: EntityStore + 'static> {
  cache: Arc<QueryCache<S>>,
}

impl<S: EntityStore + 'static> Library<S> {
  pub fn new(store: S) -> Self {
    Self { cache: QueryCache::new(store) }
  }

  pub fn cache(&self) -> &Arc<QueryCache<S>> {
    &self.cache
  }

  // ── Reads ─────────────────────────────────────────────────────────────

  pub async fn favorites(&self) -> Snapshot<Favorite> {
    self.cache.read(CollectionKey::favorites()).await
  }

  pub async fn highlights(&self) -> Snapshot<Highlight> {
    self.cache.read(CollectionKey::highlights()).await
  }

  pub async fn bookmarks(&self) -> Snapshot<Bookmark> {
    self.cache.read(CollectionKey::bookmarks()).await
  }

  pub async fn reading_history(&self) -> Snapshot<ReadingEntry> {
    self.cache.read(CollectionKey::reading_history()).await
  }

  pub async fn journal(&self) -> Snapshot<JournalEntry> {
    self.cache.read(CollectionKey::journal()).await
  }

  pub async fn saved_sermons(&self) -> Snapshot<SavedSermon> {
    self.cache.read(CollectionKey::saved_sermons()).await
  }

  // ── Favorites ─────────────────────────────────────────────────────────

  /// Save a verse unless its reference is already favorited. Returns
  /// `None` when the favorite already existed.
  pub async fn add_favorite(
    &self,
    favorite: Favorite,
  ) -> Result<Option<Stored<Favorite>>> {
    let existing = self.favorites().await;
    if existing.contains_reference(&favorite.verse_reference) {
      debug!(
        reference = %favorite.verse_reference,
        "verse already favorited; skipping create"
      );
      return Ok(None);
    }
    self.cache.create(favorite).await.map(Some)
  }

  pub async fn remove_favorite(&self, id: Uuid) -> Result<()> {
    self.cache.delete::<Favorite>(id).await
  }

  // ── Highlights ────────────────────────────────────────────────────────

  /// Apply `color` to a verse, replacing any existing highlight on the
  /// same (reference, version) pair. Re-applying the current color clears
  /// the highlight instead.
  pub async fn set_highlight(
    &self,
    reference: &str,
    verse_text: &str,
    version: &str,
    color: HighlightColor,
  ) -> Result<HighlightChange> {
    let existing = self
      .highlights()
      .await
      .for_verse(reference, version)
      .map(|h| (h.id, h.color));

    match existing {
      Some((id, current)) if current == color => {
        self.cache.delete::<Highlight>(id).await?;
        Ok(HighlightChange::Cleared)
      }
      Some((id, _)) => {
        self.cache.delete::<Highlight>(id).await?;
        self
          .cache
          .create(Highlight {
            verse_reference: reference.to_string(),
            verse_text:      verse_text.to_string(),
            version:         version.to_string(),
            color,
          })
          .await?;
        Ok(HighlightChange::Recolored)
      }
      None => {
        self
          .cache
          .create(Highlight {
            verse_reference: reference.to_string(),
            verse_text:      verse_text.to_string(),
            version:         version.to_string(),
            color,
          })
          .await?;
        Ok(HighlightChange::Applied)
      }
    }
  }

  // ── Bookmarks ─────────────────────────────────────────────────────────

  /// Bookmark a chapter, or remove the bookmark if one already covers it.
  pub async fn toggle_bookmark(
    &self,
    book: &str,
    chapter: u16,
    version: &str,
  ) -> Result<BookmarkChange> {
    let existing = self
      .bookmarks()
      .await
      .chapter_bookmark(book, chapter, version)
      .map(|b| b.id);

    match existing {
      Some(id) => {
        self.cache.delete::<Bookmark>(id).await?;
        Ok(BookmarkChange::Removed)
      }
      None => {
        self
          .cache
          .create(Bookmark {
            book:    book.to_string(),
            chapter,
            version: version.to_string(),
            label:   chapter_label(book, chapter),
          })
          .await?;
        Ok(BookmarkChange::Added)
      }
    }
  }

  pub async fn remove_bookmark(&self, id: Uuid) -> Result<()> {
    self.cache.delete::<Bookmark>(id).await
  }

  // ── Reading history ───────────────────────────────────────────────────

  /// Append a history entry; called on every chapter open.
  pub async fn record_reading(
    &self,
    book: &str,
    chapter: u16,
    version: &str,
  ) -> Result<Stored<ReadingEntry>> {
    self
      .cache
      .create(ReadingEntry {
        book:    book.to_string(),
        chapter,
        version: version.to_string(),
      })
      .await
  }

  // ── Journal ───────────────────────────────────────────────────────────

  pub async fn create_journal_entry(
    &self,
    entry: JournalEntry,
  ) -> Result<Stored<JournalEntry>> {
    if entry.title.trim().is_empty() || entry.content.trim().is_empty() {
      return Err(innerlight_core::Error::EmptyJournalEntry.into());
    }
    self.cache.create(entry).await
  }

  pub async fn update_journal_entry(
    &self,
    id: Uuid,
    patch: JournalPatch,
  ) -> Result<Stored<JournalEntry>> {
    let blanks_title =
      patch.title.as_deref().is_some_and(|t| t.trim().is_empty());
    let blanks_content =
      patch.content.as_deref().is_some_and(|c| c.trim().is_empty());
    if blanks_title || blanks_content {
      return Err(innerlight_core::Error::EmptyJournalEntry.into());
    }
    self.cache.update::<JournalEntry>(id, patch).await
  }

  pub async fn delete_journal_entry(&self, id: Uuid) -> Result<()> {
    self.cache.delete::<JournalEntry>(id).await
  }

  // ── Sermons ───────────────────────────────────────────────────────────

  /// Save a sermon unless one with the same title is already saved.
  /// Returns `None` when it already existed.
  pub async fn save_sermon(
    &self,
    sermon: SavedSermon,
  ) -> Result<Option<Stored<SavedSermon>>> {
    let existing = self.saved_sermons().await;
    if existing.contains_title(&sermon.title) {
      debug!(title = %sermon.title, "sermon already saved; skipping create");
      return Ok(None);
    }
    self.cache.create(sermon).await.map(Some)
  }

  pub async fn remove_sermon(&self, id: Uuid) -> Result<()> {
    self.cache.delete::<SavedSermon>(id).await
  }
}
