//! [`CollectionKey`] — the cache lookup key: a collection plus its query
//! parameters. Two reads with the same key observe the same snapshot
//! unless an invalidation lands between them.

use innerlight_core::{
  entity::Collection,
  store::{ListQuery, Sort},
};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CollectionKey {
  pub collection: Collection,
  pub query:      ListQuery,
}

impl CollectionKey {
  pub fn of(collection: Collection, query: ListQuery) -> Self {
    Self { collection, query }
  }

  /// All favorites, unordered.
  pub fn favorites() -> Self {
    Self::of(Collection::Favorites, ListQuery::default())
  }

  /// All highlights, unordered.
  pub fn highlights() -> Self {
    Self::of(Collection::Highlights, ListQuery::default())
  }

  /// Bookmarks, newest first.
  pub fn bookmarks() -> Self {
    Self::of(Collection::Bookmarks, ListQuery::sorted(Sort::CreatedDesc))
  }

  /// The twenty most recent chapter opens.
  pub fn reading_history() -> Self {
    Self::of(
      Collection::ReadingHistory,
      ListQuery::sorted(Sort::CreatedDesc).with_limit(20),
    )
  }

  /// Journal entries, newest first.
  pub fn journal() -> Self {
    Self::of(Collection::Journal, ListQuery::sorted(Sort::CreatedDesc))
  }

  /// All saved sermons, unordered.
  pub fn saved_sermons() -> Self {
    Self::of(Collection::Sermons, ListQuery::default())
  }
}

impl std::fmt::Display for CollectionKey {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}", self.collection)?;
    if let Some(sort) = self.query.sort {
      write!(f, " sort={}", sort.wire())?;
    }
    if let Some(limit) = self.query.limit {
      write!(f, " limit={limit}")?;
    }
    Ok(())
  }
}
