//! [`HttpStore`] — the reqwest implementation of
//! [`EntityStore`](innerlight_core::store::EntityStore) against the hosted
//! entity API.

use std::time::Duration;

use innerlight_core::{
  entity::{Entity, Stored},
  store::{EntityStore, ListQuery},
};
use reqwest::Client;
use tracing::trace;
use uuid::Uuid;

use crate::{ClientConfig, Error, Result};

/// Async HTTP client for the entity CRUD endpoints.
///
/// Cheap to clone — the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct HttpStore {
  client: Client,
  config: ClientConfig,
}

impl HttpStore {
  pub fn new(config: ClientConfig) -> Result<Self> {
    let client = Client::builder()
      .timeout(Duration::from_secs(30))
      .build()?;
    Ok(Self { client, config })
  }

  fn collection_url<E: Entity>(&self) -> String {
    self
      .config
      .endpoint(&format!("/entities/{}", E::COLLECTION.wire_name()))
  }

  fn record_url<E: Entity>(&self, id: Uuid) -> String {
    format!("{}/{id}", self.collection_url::<E>())
  }

  fn authed(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
    req.header("api_key", &self.config.api_key)
  }

  fn check(
    method: &'static str,
    path: String,
    resp: &reqwest::Response,
  ) -> Result<()> {
    if resp.status().is_success() {
      Ok(())
    } else {
      Err(Error::Status { method, path, status: resp.status() })
    }
  }
}

impl EntityStore for HttpStore {
  type Error = Error;

  /// `GET /api/entities/{Collection}[?sort=..][&limit=..]`
  async fn list<E: Entity>(
    &self,
    query: &ListQuery,
  ) -> Result<Vec<Stored<E>>> {
    let url = self.collection_url::<E>();
    let mut req = self.authed(self.client.get(&url));
    if let Some(sort) = query.sort {
      req = req.query(&[("sort", sort.wire())]);
    }
    if let Some(limit) = query.limit {
      req = req.query(&[("limit", limit.to_string())]);
    }

    let resp = req.send().await?;
    Self::check("GET", url, &resp)?;
    let records: Vec<Stored<E>> = resp.json().await?;
    trace!(collection = %E::COLLECTION, count = records.len(), "listed");
    Ok(records)
  }

  /// `POST /api/entities/{Collection}`
  async fn create<E: Entity>(&self, fields: E) -> Result<Stored<E>> {
    let url = self.collection_url::<E>();
    let resp = self
      .authed(self.client.post(&url))
      .json(&fields)
      .send()
      .await?;
    Self::check("POST", url, &resp)?;
    Ok(resp.json().await?)
  }

  /// `PATCH /api/entities/{Collection}/{id}`
  async fn update<E: Entity>(
    &self,
    id: Uuid,
    patch: E::Patch,
  ) -> Result<Stored<E>> {
    let url = self.record_url::<E>(id);
    let resp = self
      .authed(self.client.patch(&url))
      .json(&patch)
      .send()
      .await?;
    Self::check("PATCH", url, &resp)?;
    Ok(resp.json().await?)
  }

  /// `DELETE /api/entities/{Collection}/{id}`
  async fn delete<E: Entity>(&self, id: Uuid) -> Result<()> {
    let url = self.record_url::<E>(id);
    let resp = self.authed(self.client.delete(&url)).send().await?;
    Self::check("DELETE", url, &resp)
  }
}

#[cfg(test)]
mod tests {
  use innerlight_core::record::{Bookmark, Favorite};

  use super::*;

  fn store() -> HttpStore {
    HttpStore::new(ClientConfig {
      base_url: "https://app.example.com/".to_string(),
      api_key:  "k".to_string(),
    })
    .unwrap()
  }

  #[test]
  fn urls_use_wire_collection_names() {
    let s = store();
    assert_eq!(
      s.collection_url::<Favorite>(),
      "https://app.example.com/api/entities/Favorite"
    );
    assert_eq!(
      s.collection_url::<Bookmark>(),
      "https://app.example.com/api/entities/BibleBookmark"
    );
  }

  #[test]
  fn stored_decodes_wire_shape() {
    let raw = serde_json::json!({
      "id": "8f3c62f4-4c1f-4a89-9d25-5a17f2b6f40a",
      "created_date": "2024-05-04T12:00:00Z",
      "book": "Genesis",
      "chapter": 1,
      "version": "NIV",
      "label": "Genesis 1"
    });

    let stored: Stored<Bookmark> = serde_json::from_value(raw).unwrap();
    assert_eq!(stored.book, "Genesis");
    assert_eq!(stored.chapter, 1);
    assert_eq!(stored.label, "Genesis 1");
  }

  #[test]
  fn optional_favorite_fields_are_omitted_on_create() {
    let favorite = Favorite {
      verse_reference: "John 3:16".to_string(),
      verse_text:      "For God so loved the world...".to_string(),
      bible_version:   "NIV".to_string(),
      personal_note:   None,
      category:        None,
    };

    let body = serde_json::to_value(&favorite).unwrap();
    let object = body.as_object().unwrap();
    assert!(!object.contains_key("personal_note"));
    assert!(!object.contains_key("category"));
  }
}
