//! Generated content — the request/response contract with the LLM
//! integration and the typed payloads it produces.
//!
//! The service accepts a natural-language prompt plus a JSON schema and
//! returns JSON meant to conform to it. Nothing about that is guaranteed,
//! so every payload type decodes at this boundary and malformed responses
//! fall into the error path instead of propagating loose fields. Calls are
//! never cached, de-duplicated, or retried.

use std::future::Future;

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::{Error, Result};

// ─── Request ─────────────────────────────────────────────────────────────────

/// One generation call: an instruction plus the shape the answer must take.
#[derive(Debug, Clone)]
pub struct GenRequest {
  pub prompt:          String,
  pub response_schema: Value,
  /// Ask the service to ground the answer in live web results.
  pub web_context:     bool,
}

impl GenRequest {
  pub fn new(prompt: impl Into<String>, response_schema: Value) -> Self {
    Self { prompt: prompt.into(), response_schema, web_context: false }
  }

  pub fn with_web_context(mut self) -> Self {
    self.web_context = true;
    self
  }
}

/// Abstraction over the LLM invocation endpoint.
pub trait ContentGenerator: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  fn invoke(
    &self,
    request: GenRequest,
  ) -> impl Future<Output = Result<Value, Self::Error>> + Send;
}

/// A response payload that knows the schema it was requested with.
pub trait Generated: Sized + for<'de> Deserialize<'de> {
  /// JSON schema sent alongside the prompt.
  fn response_schema() -> Value;

  /// Decode a raw service response, rejecting shape mismatches.
  fn decode(value: Value) -> Result<Self> {
    serde_json::from_value(value).map_err(Error::MalformedResponse)
  }
}

// ─── Chapter text ────────────────────────────────────────────────────────────

/// One verse of a generated chapter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChapterVerse {
  pub number:         u32,
  pub text:           String,
  /// Scholarly notes (historical context, original-language meanings,
  /// cross-references) for key verses only.
  #[serde(default)]
  pub academic_notes: Option<String>,
}

/// The full text of one chapter in one Bible version.
#[derive(Debug, Clone, Deserialize)]
pub struct ChapterText {
  pub book:           String,
  pub chapter:        u32,
  #[serde(default)]
  pub total_chapters: Option<u32>,
  #[serde(default)]
  pub verses:         Vec<ChapterVerse>,
}

impl ChapterText {
  pub fn request(book: &str, chapter: u16, version: &str) -> GenRequest {
    GenRequest::new(
      format!(
        "Provide the complete text of {book} chapter {chapter} from the \
         {version} Bible. Include verse numbers and the full text of each \
         verse, plus brief scholarly annotations for key verses covering \
         historical context, original Hebrew/Greek word meanings, \
         cross-references, and theological significance."
      ),
      Self::response_schema(),
    )
  }
}

impl Generated for ChapterText {
  fn response_schema() -> Value {
    json!({
      "type": "object",
      "properties": {
        "book": { "type": "string" },
        "chapter": { "type": "number" },
        "total_chapters": { "type": "number" },
        "verses": {
          "type": "array",
          "items": {
            "type": "object",
            "properties": {
              "number": { "type": "number" },
              "text": { "type": "string" },
              "academic_notes": { "type": "string" }
            }
          }
        }
      }
    })
  }
}

// ─── Verse search ────────────────────────────────────────────────────────────

/// One hit from a free-text scripture search.
#[derive(Debug, Clone, Deserialize)]
pub struct VerseHit {
  pub reference: String,
  pub text:      String,
  #[serde(default)]
  pub relevance: Option<String>,
}

/// Results of searching scripture by topic or phrase.
#[derive(Debug, Clone, Deserialize)]
pub struct VerseSearchResults {
  #[serde(default)]
  pub results: Vec<VerseHit>,
}

impl VerseSearchResults {
  pub fn request(query: &str) -> GenRequest {
    GenRequest::new(
      format!(
        "Search the Bible for verses related to: {query:?}. Find relevant \
         verses from both Old and New Testament. Include the verse text, \
         the reference, and a brief explanation of relevance."
      ),
      Self::response_schema(),
    )
  }
}

impl Generated for VerseSearchResults {
  fn response_schema() -> Value {
    json!({
      "type": "object",
      "properties": {
        "results": {
          "type": "array",
          "items": {
            "type": "object",
            "properties": {
              "reference": { "type": "string" },
              "text": { "type": "string" },
              "relevance": { "type": "string" }
            }
          }
        }
      }
    })
  }
}

// ─── Life guidance ───────────────────────────────────────────────────────────

/// One verse of a guidance plan, with application notes.
#[derive(Debug, Clone, Deserialize)]
pub struct GuidanceVerse {
  pub reference:           String,
  pub text:                String,
  #[serde(default)]
  pub application:         Option<String>,
  #[serde(default)]
  pub reflection_question: Option<String>,
}

/// A set of verses addressing one life situation.
#[derive(Debug, Clone, Deserialize)]
pub struct GuidancePlan {
  #[serde(default)]
  pub topic_summary: String,
  #[serde(default)]
  pub encouragement: String,
  #[serde(default)]
  pub verses:        Vec<GuidanceVerse>,
}

impl GuidancePlan {
  pub fn request(situation: &str) -> GenRequest {
    GenRequest::new(
      format!(
        "You are a compassionate spiritual guide. Someone is seeking help \
         with: {situation:?}. Provide 5-7 relevant Bible verses that \
         directly address this situation. For each verse include the full \
         text, the reference, a brief warm explanation of how it applies, \
         and a practical reflection question. Be encouraging and focus on \
         God's love and provision."
      ),
      Self::response_schema(),
    )
  }
}

impl Generated for GuidancePlan {
  fn response_schema() -> Value {
    json!({
      "type": "object",
      "properties": {
        "topic_summary": { "type": "string" },
        "encouragement": { "type": "string" },
        "verses": {
          "type": "array",
          "items": {
            "type": "object",
            "properties": {
              "reference": { "type": "string" },
              "text": { "type": "string" },
              "application": { "type": "string" },
              "reflection_question": { "type": "string" }
            }
          }
        }
      }
    })
  }
}

// ─── Sermon listings ─────────────────────────────────────────────────────────

/// One discovered sermon. Only the title is reliable enough to require.
#[derive(Debug, Clone, Deserialize)]
pub struct SermonListing {
  pub title:           String,
  #[serde(default)]
  pub preacher:        Option<String>,
  #[serde(default)]
  pub church:          Option<String>,
  #[serde(default)]
  pub location:        Option<String>,
  #[serde(default)]
  pub verse_reference: Option<String>,
  #[serde(default)]
  pub date:            Option<String>,
  #[serde(default)]
  pub duration:        Option<String>,
  #[serde(default)]
  pub description:     Option<String>,
  #[serde(default)]
  pub url:             Option<String>,
  #[serde(default)]
  pub is_live:         bool,
  #[serde(default)]
  pub is_local:        bool,
  #[serde(default)]
  pub denomination:    Option<String>,
}

/// Sermons discovered for a search, mixing live, local, and online results.
#[derive(Debug, Clone, Deserialize)]
pub struct SermonListings {
  #[serde(default)]
  pub sermons: Vec<SermonListing>,
}

impl SermonListings {
  pub fn request(topic: &str, verse: &str, location: &str) -> GenRequest {
    let mut prompt = String::from(
      "Find relevant Christian sermons across denominations. Provide a mix \
       of live streaming services (is_live true), local church services \
       (is_local true), and popular online sermons, with realistic church \
       names, preacher names, and Bible references.",
    );
    if !topic.is_empty() {
      prompt.push_str(&format!(" Topic: {topic:?}."));
    }
    if !verse.is_empty() {
      prompt.push_str(&format!(" Bible verse: {verse:?}."));
    }
    if !location.is_empty() {
      prompt.push_str(&format!(" Location preference: {location:?}."));
    }
    GenRequest::new(prompt, Self::response_schema()).with_web_context()
  }
}

impl Generated for SermonListings {
  fn response_schema() -> Value {
    json!({
      "type": "object",
      "properties": {
        "sermons": {
          "type": "array",
          "items": {
            "type": "object",
            "properties": {
              "title": { "type": "string" },
              "preacher": { "type": "string" },
              "church": { "type": "string" },
              "location": { "type": "string" },
              "verse_reference": { "type": "string" },
              "date": { "type": "string" },
              "duration": { "type": "string" },
              "description": { "type": "string" },
              "url": { "type": "string" },
              "is_live": { "type": "boolean" },
              "is_local": { "type": "boolean" },
              "denomination": { "type": "string" }
            }
          }
        }
      }
    })
  }
}

// ─── Verse suggestion ────────────────────────────────────────────────────────

/// A single verse suggested for a journal entry in progress.
#[derive(Debug, Clone, Deserialize)]
pub struct VerseSuggestion {
  pub verse:       String,
  pub reference:   String,
  #[serde(default)]
  pub explanation: Option<String>,
}

impl VerseSuggestion {
  pub fn request(content: &str, mood: &str) -> GenRequest {
    GenRequest::new(
      format!(
        "Based on this journal entry content and mood, suggest one \
         comforting, relevant Bible verse that speaks to the writer's \
         current state. Content: {content}. Mood: {mood}."
      ),
      Self::response_schema(),
    )
  }
}

impl Generated for VerseSuggestion {
  fn response_schema() -> Value {
    json!({
      "type": "object",
      "properties": {
        "verse": { "type": "string" },
        "reference": { "type": "string" },
        "explanation": { "type": "string" }
      }
    })
  }
}

// ─── Daily verse ─────────────────────────────────────────────────────────────

/// The verse shown on the home screen.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DailyVerse {
  pub verse:     String,
  pub reference: String,
}

impl DailyVerse {
  pub fn request() -> GenRequest {
    GenRequest::new(
      "Choose one encouraging Bible verse suitable for daily reflection. \
       Provide the full verse text and its reference.",
      Self::response_schema(),
    )
  }

  /// Shown whenever the generation service fails or returns garbage, so
  /// the home screen never hangs or blanks.
  pub fn fallback() -> Self {
    Self {
      verse:     "Trust in the Lord with all your heart and lean not on \
                  your own understanding; in all your ways submit to him, \
                  and he will make your paths straight."
        .to_string(),
      reference: "Proverbs 3:5-6".to_string(),
    }
  }
}

impl Generated for DailyVerse {
  fn response_schema() -> Value {
    json!({
      "type": "object",
      "properties": {
        "verse": { "type": "string" },
        "reference": { "type": "string" }
      }
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn decode_chapter_text() {
    let raw = json!({
      "book": "Psalms",
      "chapter": 23,
      "total_chapters": 150,
      "verses": [
        { "number": 1, "text": "The Lord is my shepherd...",
          "academic_notes": "Davidic psalm." },
        { "number": 2, "text": "He makes me lie down..." }
      ]
    });

    let chapter = ChapterText::decode(raw).unwrap();
    assert_eq!(chapter.book, "Psalms");
    assert_eq!(chapter.verses.len(), 2);
    assert!(chapter.verses[1].academic_notes.is_none());
  }

  #[test]
  fn decode_rejects_shape_mismatch() {
    let raw = json!({ "verses": "not an array", "book": 7 });
    let err = ChapterText::decode(raw).unwrap_err();
    assert!(matches!(err, crate::Error::MalformedResponse(_)));
  }

  #[test]
  fn sermon_flags_default_off() {
    let raw = json!({
      "sermons": [{ "title": "Hope in the Storm" }]
    });
    let listings = SermonListings::decode(raw).unwrap();
    assert_eq!(listings.sermons.len(), 1);
    assert!(!listings.sermons[0].is_live);
    assert!(!listings.sermons[0].is_local);
  }

  #[test]
  fn fallback_is_proverbs() {
    let v = DailyVerse::fallback();
    assert_eq!(v.reference, "Proverbs 3:5-6");
    assert!(v.verse.starts_with("Trust in the Lord"));
  }

  #[test]
  fn sermon_request_carries_web_context() {
    let req = SermonListings::request("grace", "", "Austin");
    assert!(req.web_context);
    assert!(req.prompt.contains("grace"));
    assert!(req.prompt.contains("Austin"));
  }
}
