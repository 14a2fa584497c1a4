//! The `EntityStore` trait and supporting query types.
//!
//! The trait is implemented by transport backends (e.g. the reqwest client
//! in `innerlight-client`). Higher layers (`innerlight-cache`, the TUI)
//! depend on this abstraction, not on any concrete backend.

use std::future::Future;

use uuid::Uuid;

use crate::entity::{Entity, Stored};

// ─── Query type ──────────────────────────────────────────────────────────────

/// Sort order for [`EntityStore::list`], keyed on the creation timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sort {
  CreatedAsc,
  CreatedDesc,
}

impl Sort {
  /// The sort expression as the hosted backend spells it.
  pub fn wire(&self) -> &'static str {
    match self {
      Self::CreatedAsc => "created_date",
      Self::CreatedDesc => "-created_date",
    }
  }
}

/// Parameters for [`EntityStore::list`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ListQuery {
  pub sort:  Option<Sort>,
  pub limit: Option<usize>,
}

impl ListQuery {
  pub fn sorted(sort: Sort) -> Self {
    Self { sort: Some(sort), ..Self::default() }
  }

  pub fn with_limit(mut self, limit: usize) -> Self {
    self.limit = Some(limit);
    self
  }
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over the hosted entity store.
///
/// The store is the sole source of truth for every record; ids and creation
/// timestamps are assigned server-side on create. It performs no validation
/// and enforces no uniqueness — those are caller responsibilities.
///
/// All methods return `Send` futures so the trait can be used from
/// multi-threaded async runtimes.
pub trait EntityStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// List the records of `E`'s collection, ordered and truncated per
  /// `query`.
  fn list<E: Entity>(
    &self,
    query: &ListQuery,
  ) -> impl Future<Output = Result<Vec<Stored<E>>, Self::Error>> + Send;

  /// Persist a new record and return it with its assigned id and timestamp.
  fn create<E: Entity>(
    &self,
    fields: E,
  ) -> impl Future<Output = Result<Stored<E>, Self::Error>> + Send;

  /// Partially update an existing record. Only collections with an
  /// inhabited patch type can reach this call.
  fn update<E: Entity>(
    &self,
    id: Uuid,
    patch: E::Patch,
  ) -> impl Future<Output = Result<Stored<E>, Self::Error>> + Send;

  /// Delete a record by id.
  fn delete<E: Entity>(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send;
}
