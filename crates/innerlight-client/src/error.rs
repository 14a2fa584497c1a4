//! Error types for the HTTP backends.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// Connection, timeout, or body-decoding failure inside reqwest.
  #[error("transport error: {0}")]
  Transport(#[from] reqwest::Error),

  /// The backend answered with a non-success status.
  #[error("{method} {path} returned {status}")]
  Status {
    method: &'static str,
    path:   String,
    status: reqwest::StatusCode,
  },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
