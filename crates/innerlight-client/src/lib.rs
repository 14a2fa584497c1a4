//! HTTP backends for the Inner Light trait seams.
//!
//! [`HttpStore`] speaks to the hosted entity API and [`HttpGenerator`] to
//! its LLM invocation endpoint. Both are thin reqwest wrappers: no caching,
//! no retries — coordination lives in `innerlight-cache`, policy in the
//! application.

pub mod error;
pub mod generate;
pub mod store;

pub use error::{Error, Result};
pub use generate::HttpGenerator;
pub use store::HttpStore;

/// Connection settings shared by both backends.
#[derive(Debug, Clone)]
pub struct ClientConfig {
  /// Base URL of the hosted backend, without a trailing `/api`.
  pub base_url: String,
  /// Per-app key sent on every request.
  pub api_key:  String,
}

impl ClientConfig {
  pub(crate) fn endpoint(&self, path: &str) -> String {
    format!("{}/api{path}", self.base_url.trim_end_matches('/'))
  }
}
