//! Domain records — everything a user can persist against the entity store.
//!
//! Field sets follow the hosted backend's collections one to one. All
//! records are created whole and deleted whole; only [`JournalEntry`]
//! supports partial updates, expressed through [`JournalPatch`].

use serde::{Deserialize, Serialize};

use crate::entity::{Collection, Entity, NoPatch};

// ─── Favorite ────────────────────────────────────────────────────────────────

/// A saved verse, optionally annotated with a personal note.
///
/// `verse_reference` ("{Book} {Chapter}:{Verse}") is the business key: the
/// store enforces no uniqueness, so callers must check membership before
/// creating to avoid duplicates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Favorite {
  pub verse_reference: String,
  pub verse_text:      String,
  pub bible_version:   String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub personal_note:   Option<String>,
  /// Guidance topic the verse was saved from, when applicable.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub category:        Option<String>,
}

impl Entity for Favorite {
  const COLLECTION: Collection = Collection::Favorites;
  type Patch = NoPatch;
}

// ─── Highlight ───────────────────────────────────────────────────────────────

/// The fixed marker palette for verse highlights.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HighlightColor {
  Yellow,
  Green,
  Blue,
  Pink,
}

impl HighlightColor {
  pub const ALL: [HighlightColor; 4] =
    [Self::Yellow, Self::Green, Self::Blue, Self::Pink];
}

/// A colored marker on one verse in one Bible version.
///
/// At most one highlight per (verse_reference, version) pair is intended;
/// like favorites, this is a caller-enforced rule, not a store constraint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Highlight {
  pub verse_reference: String,
  pub verse_text:      String,
  pub version:         String,
  pub color:           HighlightColor,
}

impl Entity for Highlight {
  const COLLECTION: Collection = Collection::Highlights;
  type Patch = NoPatch;
}

// ─── Bookmark ────────────────────────────────────────────────────────────────

/// A saved reading position, one per (book, chapter, version) by intent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bookmark {
  pub book:    String,
  pub chapter: u16,
  pub version: String,
  pub label:   String,
}

impl Entity for Bookmark {
  const COLLECTION: Collection = Collection::Bookmarks;
  type Patch = NoPatch;
}

// ─── Reading history ─────────────────────────────────────────────────────────

/// One chapter-open event. Appended on every navigation, never deduplicated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadingEntry {
  pub book:    String,
  pub chapter: u16,
  pub version: String,
}

impl Entity for ReadingEntry {
  const COLLECTION: Collection = Collection::ReadingHistory;
  type Patch = NoPatch;
}

// ─── Journal ─────────────────────────────────────────────────────────────────

/// How the author felt while writing an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
  Grateful,
  Seeking,
  Peaceful,
  Struggling,
  Hopeful,
  Reflective,
}

impl Mood {
  pub const ALL: [Mood; 6] = [
    Self::Grateful,
    Self::Seeking,
    Self::Peaceful,
    Self::Struggling,
    Self::Hopeful,
    Self::Reflective,
  ];

  pub fn label(&self) -> &'static str {
    match self {
      Self::Grateful => "Grateful",
      Self::Seeking => "Seeking",
      Self::Peaceful => "Peaceful",
      Self::Struggling => "Struggling",
      Self::Hopeful => "Hopeful",
      Self::Reflective => "Reflective",
    }
  }
}

/// A journal entry. The only record type that is editable after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JournalEntry {
  pub title:          String,
  pub content:        String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub mood:           Option<Mood>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub prayer_request: Option<String>,
  /// References of verses attached to the entry (e.g. a suggested verse).
  #[serde(default)]
  pub related_verses: Vec<String>,
}

/// Partial update for a journal entry. Absent fields are left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JournalPatch {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub title:          Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub content:        Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub mood:           Option<Mood>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub prayer_request: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub related_verses: Option<Vec<String>>,
}

impl Entity for JournalEntry {
  const COLLECTION: Collection = Collection::Journal;
  type Patch = JournalPatch;
}

// ─── Saved sermon ────────────────────────────────────────────────────────────

/// A sermon saved from a generated listing. Everything but the title comes
/// from the generation service and may be missing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedSermon {
  pub title:           String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub preacher:        Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub church:          Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub location:        Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub verse_reference: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub sermon_url:      Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub date:            Option<String>,
}

impl Entity for SavedSermon {
  const COLLECTION: Collection = Collection::Sermons;
  type Patch = NoPatch;
}
