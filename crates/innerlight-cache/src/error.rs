//! Error type for cache and library operations.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// The entity store rejected or failed a call. The concrete type depends
  /// on the store backend, so it is carried boxed.
  #[error("entity store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),

  #[error(transparent)]
  Domain(#[from] innerlight_core::Error),
}

impl Error {
  pub(crate) fn store(
    source: impl std::error::Error + Send + Sync + 'static,
  ) -> Self {
    Self::Store(Box::new(source))
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
