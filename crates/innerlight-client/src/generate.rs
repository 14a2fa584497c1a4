//! [`HttpGenerator`] — the reqwest implementation of
//! [`ContentGenerator`](innerlight_core::content::ContentGenerator).

use std::time::Duration;

use innerlight_core::content::{ContentGenerator, GenRequest};
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use tracing::trace;

use crate::{ClientConfig, Error, Result};

/// Wire body of the invocation endpoint.
#[derive(Serialize)]
struct InvokePayload<'a> {
  prompt:                    &'a str,
  response_json_schema:      &'a Value,
  add_context_from_internet: bool,
}

/// Async HTTP client for the LLM invocation endpoint.
///
/// Generation runs take far longer than CRUD calls, hence the generous
/// timeout. Cheap to clone.
#[derive(Clone)]
pub struct HttpGenerator {
  client: Client,
  config: ClientConfig,
}

impl HttpGenerator {
  pub fn new(config: ClientConfig) -> Result<Self> {
    let client = Client::builder()
      .timeout(Duration::from_secs(120))
      .build()?;
    Ok(Self { client, config })
  }
}

impl ContentGenerator for HttpGenerator {
  type Error = Error;

  /// `POST /api/integrations/invoke-llm`
  async fn invoke(&self, request: GenRequest) -> Result<Value> {
    let url = self.config.endpoint("/integrations/invoke-llm");
    trace!(
      prompt_len = request.prompt.len(),
      web_context = request.web_context,
      "invoking generation"
    );

    let resp = self
      .client
      .post(&url)
      .header("api_key", &self.config.api_key)
      .json(&InvokePayload {
        prompt:                    &request.prompt,
        response_json_schema:      &request.response_schema,
        add_context_from_internet: request.web_context,
      })
      .send()
      .await?;

    if !resp.status().is_success() {
      return Err(Error::Status {
        method: "POST",
        path:   url,
        status: resp.status(),
      });
    }
    Ok(resp.json().await?)
  }
}

#[cfg(test)]
mod tests {
  use innerlight_core::content::DailyVerse;

  use super::*;

  #[test]
  fn payload_matches_wire_contract() {
    let request = DailyVerse::request();
    let payload = InvokePayload {
      prompt:                    &request.prompt,
      response_json_schema:      &request.response_schema,
      add_context_from_internet: request.web_context,
    };

    let body = serde_json::to_value(&payload).unwrap();
    assert!(body["prompt"].is_string());
    assert_eq!(body["add_context_from_internet"], false);
    assert_eq!(body["response_json_schema"]["type"], "object");
  }
}
