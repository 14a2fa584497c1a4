//! Error types for `innerlight-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("journal entries need a title and content")]
  EmptyJournalEntry,

  #[error("unparseable verse reference: {0:?}")]
  BadReference(String),

  #[error("generation response does not match the requested schema: {0}")]
  MalformedResponse(#[source] serde_json::Error),

  #[error("serialization error: {0}")]
  Serialization(#[from] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
