//! Entity plumbing — the envelope and trait shared by every stored record.
//!
//! The hosted entity store is a generic document service: it knows nothing
//! about favorites or journal entries beyond a collection name. This module
//! binds each Rust record type to its collection so the rest of the
//! workspace can stay fully typed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use uuid::Uuid;

// ─── Collection ──────────────────────────────────────────────────────────────

/// The named collections exposed by the entity store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
  Favorites,
  Highlights,
  Bookmarks,
  ReadingHistory,
  Journal,
  Sermons,
}

impl Collection {
  /// The collection name as the hosted backend spells it.
  pub fn wire_name(&self) -> &'static str {
    match self {
      Self::Favorites => "Favorite",
      Self::Highlights => "Highlight",
      Self::Bookmarks => "BibleBookmark",
      Self::ReadingHistory => "ReadingHistory",
      Self::Journal => "JournalEntry",
      Self::Sermons => "SavedSermon",
    }
  }
}

impl std::fmt::Display for Collection {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(self.wire_name())
  }
}

// ─── Entity ──────────────────────────────────────────────────────────────────

/// A record type that lives in one collection of the entity store.
///
/// `Patch` is the shape accepted by partial updates. Collections that are
/// never partially updated use [`NoPatch`], which has no values, so calling
/// update on them does not compile past construction.
pub trait Entity:
  Serialize + DeserializeOwned + Clone + Send + Sync + 'static
{
  const COLLECTION: Collection;
  type Patch: Serialize + Send + Sync + 'static;
}

/// Uninhabited patch type for append/delete-only collections.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum NoPatch {}

// ─── Stored ──────────────────────────────────────────────────────────────────

/// A record as the entity store returns it: the caller-provided fields plus
/// the id and creation timestamp the store assigned on create.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Stored<E> {
  pub id:         Uuid,
  /// Server-assigned timestamp; never changes after creation.
  #[serde(rename = "created_date")]
  pub created_at: DateTime<Utc>,
  #[serde(flatten)]
  pub fields:     E,
}

impl<E> std::ops::Deref for Stored<E> {
  type Target = E;

  fn deref(&self) -> &E {
    &self.fields
  }
}
