//! Application state machine and event dispatcher.
//!
//! All entity-store traffic flows through the [`Library`] coordinator; the
//! app keeps the latest snapshot of each collection for rendering and
//! refreshes it after every action. Generation calls run in spawned tasks
//! and complete through an event channel, each tagged with a sequence
//! number — a completion whose number is no longer current is discarded,
//! so rapid navigation can never flicker back to a superseded result.

use std::path::PathBuf;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use innerlight_cache::{BookmarkChange, HighlightChange, Library, Snapshot};
use innerlight_client::{HttpGenerator, HttpStore};
use innerlight_core::{
  content::{
    ChapterText, ChapterVerse, ContentGenerator, DailyVerse, GenRequest,
    Generated, GuidancePlan, SermonListing, SermonListings, VerseHit,
    VerseSearchResults, VerseSuggestion,
  },
  record::{
    Bookmark, Favorite, Highlight, HighlightColor, JournalEntry,
    JournalPatch, Mood, ReadingEntry, SavedSermon,
  },
  reference::{VerseRef, parse_locus},
};
use tokio::sync::mpsc;
use tracing::{debug, trace};
use uuid::Uuid;

use crate::{
  books,
  prefs::Preferences,
  theme::Theme,
};

// ─── Screens ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
  Home,
  Reader,
  Guidance,
  Sermons,
  Favorites,
  Journal,
}

impl Screen {
  pub const ALL: [Screen; 6] = [
    Self::Home,
    Self::Reader,
    Self::Guidance,
    Self::Sermons,
    Self::Favorites,
    Self::Journal,
  ];

  pub fn title(&self) -> &'static str {
    match self {
      Self::Home => "Home",
      Self::Reader => "Scripture",
      Self::Guidance => "Guidance",
      Self::Sermons => "Sermons",
      Self::Favorites => "Favorites",
      Self::Journal => "Journal",
    }
  }

  fn next(self) -> Self {
    let i = Self::ALL.iter().position(|s| *s == self).unwrap_or(0);
    Self::ALL[(i + 1) % Self::ALL.len()]
  }

  fn prev(self) -> Self {
    let i = Self::ALL.iter().position(|s| *s == self).unwrap_or(0);
    Self::ALL[(i + Self::ALL.len() - 1) % Self::ALL.len()]
  }
}

// ─── Completion events ────────────────────────────────────────────────────────

/// Results of spawned generation tasks, delivered to the event loop.
pub enum AppEvent {
  ChapterLoaded { seq: u64, result: Result<ChapterText, String> },
  SearchLoaded { seq: u64, result: Result<VerseSearchResults, String> },
  GuidanceLoaded { seq: u64, result: Result<GuidancePlan, String> },
  SermonsLoaded { seq: u64, result: Result<SermonListings, String> },
  DailyVerseLoaded { seq: u64, result: Result<DailyVerse, String> },
  VerseSuggested { seq: u64, result: Result<VerseSuggestion, String> },
}

/// Per-surface generation sequence numbers. Bumping one supersedes every
/// in-flight request for that surface.
#[derive(Default)]
struct SeqCounters {
  chapter:  u64,
  search:   u64,
  guidance: u64,
  sermons:  u64,
  daily:    u64,
  suggest:  u64,
}

// ─── Per-screen state ─────────────────────────────────────────────────────────

/// One guidance topic shortcut.
pub struct LifeSituation {
  pub id:     &'static str,
  pub label:  &'static str,
  pub prompt: &'static str,
}

pub static LIFE_SITUATIONS: [LifeSituation; 12] = [
  LifeSituation {
    id:     "anxious",
    label:  "Feeling Anxious",
    prompt: "Bible verses for anxiety and worry",
  },
  LifeSituation {
    id:     "grief",
    label:  "Going Through Grief",
    prompt: "Bible verses for comfort during grief and loss",
  },
  LifeSituation {
    id:     "lonely",
    label:  "Feeling Lonely",
    prompt: "Bible verses about God's presence and never being alone",
  },
  LifeSituation {
    id:     "decisions",
    label:  "Making Decisions",
    prompt: "Bible verses for wisdom and guidance in decision making",
  },
  LifeSituation {
    id:     "relationship",
    label:  "Relationship Struggles",
    prompt: "Bible verses about love, forgiveness, and healthy relationships",
  },
  LifeSituation {
    id:     "financial",
    label:  "Financial Stress",
    prompt: "Bible verses about trusting God with finances and provision",
  },
  LifeSituation {
    id:     "health",
    label:  "Health Concerns",
    prompt: "Bible verses for healing, strength, and peace during illness",
  },
  LifeSituation {
    id:     "purpose",
    label:  "Finding Purpose",
    prompt: "Bible verses about God's plan and purpose for your life",
  },
  LifeSituation {
    id:     "forgiveness",
    label:  "Need Forgiveness",
    prompt: "Bible verses about God's forgiveness and mercy",
  },
  LifeSituation {
    id:     "anger",
    label:  "Dealing with Anger",
    prompt: "Bible verses about controlling anger and finding peace",
  },
  LifeSituation {
    id:     "fear",
    label:  "Overcoming Fear",
    prompt: "Bible verses about courage and overcoming fear",
  },
  LifeSituation {
    id:     "gratitude",
    label:  "Cultivating Gratitude",
    prompt: "Bible verses about thankfulness and gratitude",
  },
];

/// Scripture reader state.
pub struct ReaderState {
  pub book:           String,
  pub chapter:        u16,
  pub version:        String,
  pub verses:         Vec<ChapterVerse>,
  pub total_chapters: Option<u32>,
  pub loading:        bool,
  pub cursor:         usize,
  pub search:         String,
  pub search_active:  bool,
  pub searching:      bool,
  pub search_results: Option<Vec<VerseHit>>,
  /// Book selector pane.
  pub book_select:    bool,
  pub book_filter:    String,
  pub book_cursor:    usize,
  /// Personal-note entry for the cursor verse.
  pub note_active:    bool,
  pub note:           String,
}

impl Default for ReaderState {
  fn default() -> Self {
    Self {
      book:           "Psalms".to_string(),
      chapter:        1,
      version:        "NIV".to_string(),
      verses:         Vec::new(),
      total_chapters: None,
      loading:        false,
      cursor:         0,
      search:         String::new(),
      search_active:  false,
      searching:      false,
      search_results: None,
      book_select:    false,
      book_filter:    String::new(),
      book_cursor:    0,
      note_active:    false,
      note:           String::new(),
    }
  }
}

/// Guidance screen state.
#[derive(Default)]
pub struct GuidanceState {
  pub query:        String,
  pub input_active: bool,
  pub topic_cursor: usize,
  pub loading:      bool,
  pub plan:         Option<GuidancePlan>,
  pub verse_cursor: usize,
  /// Situation id behind the current results, used as favorite category.
  pub topic_id:     Option<&'static str>,
}

/// Which sermons are shown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SermonFilter {
  #[default]
  All,
  Live,
  Local,
}

/// Sermon discovery state.
#[derive(Default)]
pub struct SermonState {
  pub topic:        String,
  pub input_active: bool,
  pub loading:      bool,
  pub results:      Vec<SermonListing>,
  pub cursor:       usize,
  pub filter:       SermonFilter,
}

impl SermonState {
  /// Results surviving the live/local filter.
  pub fn visible(&self) -> Vec<&SermonListing> {
    self
      .results
      .iter()
      .filter(|s| match self.filter {
        SermonFilter::All => true,
        SermonFilter::Live => s.is_live,
        SermonFilter::Local => s.is_local,
      })
      .collect()
  }
}

/// Which favorites tab is active.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FavoritesTab {
  #[default]
  Verses,
  Sermons,
}

/// Favorites screen state.
#[derive(Default)]
pub struct FavoritesState {
  pub tab:           FavoritesTab,
  pub filter:        String,
  pub filter_active: bool,
  pub cursor:        usize,
}

/// Journal list vs write mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum JournalMode {
  #[default]
  List,
  Write,
}

/// Focused field of the journal write form.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum JournalField {
  #[default]
  Title,
  Content,
  Prayer,
}

/// Journal screen state, including the write form.
#[derive(Default)]
pub struct JournalState {
  pub mode:           JournalMode,
  pub cursor:         usize,
  pub filter:         String,
  pub filter_active:  bool,
  pub mood_filter:    Option<Mood>,
  // Write form.
  pub editing:        Option<Uuid>,
  pub title:          String,
  pub content:        String,
  pub prayer:         String,
  pub mood:           Option<Mood>,
  pub related_verses: Vec<String>,
  pub focus:          JournalField,
  pub suggesting:     bool,
  pub suggestion:     Option<VerseSuggestion>,
}

impl JournalState {
  fn clear_form(&mut self) {
    self.editing = None;
    self.title.clear();
    self.content.clear();
    self.prayer.clear();
    self.mood = None;
    self.related_verses.clear();
    self.focus = JournalField::Title;
    self.suggestion = None;
    self.suggesting = false;
  }
}

/// Home screen state.
pub struct HomeState {
  pub daily:   DailyVerse,
  pub loading: bool,
}

impl Default for HomeState {
  fn default() -> Self {
    Self { daily: DailyVerse::fallback(), loading: false }
  }
}

// ─── Collections ──────────────────────────────────────────────────────────────

/// The latest snapshot of every persisted collection, refreshed through the
/// coordinator after each action.
pub struct Collections {
  pub favorites:  Snapshot<Favorite>,
  pub highlights: Snapshot<Highlight>,
  pub bookmarks:  Snapshot<Bookmark>,
  pub history:    Snapshot<ReadingEntry>,
  pub journal:    Snapshot<JournalEntry>,
  pub sermons:    Snapshot<SavedSermon>,
}

impl Default for Collections {
  fn default() -> Self {
    Self {
      favorites:  Snapshot::empty(),
      highlights: Snapshot::empty(),
      bookmarks:  Snapshot::empty(),
      history:    Snapshot::empty(),
      journal:    Snapshot::empty(),
      sermons:    Snapshot::empty(),
    }
  }
}

// ─── App ──────────────────────────────────────────────────────────────────────

/// Initial location taken from the command line.
#[derive(Debug, Default)]
pub struct InitialLocation {
  pub book:    Option<String>,
  pub chapter: Option<u16>,
  pub topic:   Option<String>,
}

/// Top-level application state.
pub struct App {
  pub screen:      Screen,
  pub theme:       Theme,
  pub status_msg:  String,
  pub collections: Collections,

  pub reader:    ReaderState,
  pub guidance:  GuidanceState,
  pub sermons:   SermonState,
  pub favorites: FavoritesState,
  pub journal:   JournalState,
  pub home:      HomeState,

  library:    Library<HttpStore>,
  generator:  HttpGenerator,
  events_tx:  mpsc::UnboundedSender<AppEvent>,
  seqs:       SeqCounters,
  prefs_path: PathBuf,
}

impl App {
  /// Create the app plus the receiving end of its completion channel.
  pub fn new(
    library: Library<HttpStore>,
    generator: HttpGenerator,
    prefs: Preferences,
    prefs_path: PathBuf,
  ) -> (Self, mpsc::UnboundedReceiver<AppEvent>) {
    let (events_tx, events_rx) = mpsc::unbounded_channel();
    let app = Self {
      screen: Screen::Home,
      theme: prefs.theme,
      status_msg: String::new(),
      collections: Collections::default(),
      reader: ReaderState::default(),
      guidance: GuidanceState::default(),
      sermons: SermonState::default(),
      favorites: FavoritesState::default(),
      journal: JournalState::default(),
      home: HomeState::default(),
      library,
      generator,
      events_tx,
      seqs: SeqCounters::default(),
      prefs_path,
    };
    (app, events_rx)
  }

  /// Load every collection, fetch the daily verse, and honor the initial
  /// location from the command line.
  pub async fn bootstrap(&mut self, initial: InitialLocation) {
    self.refresh_all_collections().await;
    self.refresh_daily_verse();

    if let Some(book) = initial.book {
      self.reader.book = book;
      self.reader.chapter = initial.chapter.unwrap_or(1);
      self.screen = Screen::Reader;
    }
    self.open_chapter().await;

    if let Some(topic) = initial.topic {
      self.screen = Screen::Guidance;
      self.run_guidance_search(topic, None);
    }
  }

  // ── Generation plumbing ───────────────────────────────────────────────

  /// Run a generation request off the UI loop, decoding into `T` and
  /// wrapping the outcome into an [`AppEvent`].
  fn spawn_generation<T, F>(&self, request: GenRequest, wrap: F)
  where
    T: Generated + Send + 'static,
    F: FnOnce(Result<T, String>) -> AppEvent + Send + 'static,
  {
    let generator = self.generator.clone();
    let tx = self.events_tx.clone();
    tokio::spawn(async move {
      let result = match generator.invoke(request).await {
        Ok(value) => T::decode(value).map_err(|e| e.to_string()),
        Err(e) => Err(e.to_string()),
      };
      let _ = tx.send(wrap(result));
    });
  }

  // ── Snapshot refreshes ────────────────────────────────────────────────

  async fn refresh_all_collections(&mut self) {
    self.collections.favorites = self.library.favorites().await;
    self.collections.highlights = self.library.highlights().await;
    self.collections.bookmarks = self.library.bookmarks().await;
    self.collections.history = self.library.reading_history().await;
    self.collections.journal = self.library.journal().await;
    self.collections.sermons = self.library.saved_sermons().await;
  }

  // ── Actions: reader ───────────────────────────────────────────────────

  /// Record the reading event and request the chapter text.
  async fn open_chapter(&mut self) {
    let (book, chapter, version) = (
      self.reader.book.clone(),
      self.reader.chapter,
      self.reader.version.clone(),
    );

    if let Err(e) =
      self.library.record_reading(&book, chapter, &version).await
    {
      // History is best-effort; reading continues without it.
      debug!(error = %e, "failed to record reading history");
    }
    self.collections.history = self.library.reading_history().await;

    self.reader.loading = true;
    self.reader.cursor = 0;
    self.seqs.chapter += 1;
    let seq = self.seqs.chapter;
    self.spawn_generation(
      ChapterText::request(&book, chapter, &version),
      move |result| AppEvent::ChapterLoaded { seq, result },
    );
  }

  async fn change_chapter(&mut self, delta: i32) {
    let bound = books::chapters_of(&self.reader.book)
      .map(u32::from)
      .or(self.reader.total_chapters)
      .unwrap_or(u32::MAX);
    let next = (i64::from(self.reader.chapter) + i64::from(delta))
      .clamp(1, i64::from(bound)) as u16;
    if next != self.reader.chapter {
      self.reader.chapter = next;
      self.open_chapter().await;
    }
  }

  /// Jump the reader to a location (from bookmarks, history, guidance, or
  /// favorites) and load it.
  pub async fn open_location(
    &mut self,
    book: String,
    chapter: u16,
    version: Option<String>,
  ) {
    self.reader.book = book;
    self.reader.chapter = chapter.max(1);
    if let Some(version) = version {
      self.reader.version = version;
    }
    self.screen = Screen::Reader;
    self.open_chapter().await;
  }

  fn cursor_verse(&self) -> Option<&ChapterVerse> {
    self.reader.verses.get(self.reader.cursor)
  }

  fn cursor_verse_ref(&self) -> Option<VerseRef> {
    self.cursor_verse().map(|v| {
      VerseRef::new(
        self.reader.book.clone(),
        self.reader.chapter,
        v.number as u16,
      )
    })
  }

  async fn favorite_cursor_verse(&mut self, note: Option<String>) {
    let Some(reference) = self.cursor_verse_ref() else {
      return;
    };
    let text = self
      .cursor_verse()
      .map(|v| v.text.clone())
      .unwrap_or_default();

    let favorite = Favorite {
      verse_reference: reference.to_string(),
      verse_text:      text,
      bible_version:   self.reader.version.clone(),
      personal_note:   note,
      category:        None,
    };
    match self.library.add_favorite(favorite).await {
      Ok(Some(_)) => self.status_msg = format!("Saved {reference}"),
      Ok(None) => self.status_msg = format!("{reference} already saved"),
      Err(e) => self.status_msg = format!("Error: {e}"),
    }
    self.collections.favorites = self.library.favorites().await;
  }

  async fn highlight_cursor_verse(&mut self, color: HighlightColor) {
    let Some(reference) = self.cursor_verse_ref() else {
      return;
    };
    let text = self
      .cursor_verse()
      .map(|v| v.text.clone())
      .unwrap_or_default();
    let version = self.reader.version.clone();

    match self
      .library
      .set_highlight(&reference.to_string(), &text, &version, color)
      .await
    {
      Ok(HighlightChange::Applied) => {
        self.status_msg = format!("Highlighted {reference}");
      }
      Ok(HighlightChange::Recolored) => {
        self.status_msg = format!("Recolored {reference}");
      }
      Ok(HighlightChange::Cleared) => {
        self.status_msg = format!("Cleared highlight on {reference}");
      }
      Err(e) => self.status_msg = format!("Error: {e}"),
    }
    self.collections.highlights = self.library.highlights().await;
  }

  async fn toggle_current_bookmark(&mut self) {
    let (book, chapter, version) = (
      self.reader.book.clone(),
      self.reader.chapter,
      self.reader.version.clone(),
    );
    match self.library.toggle_bookmark(&book, chapter, &version).await {
      Ok(BookmarkChange::Added) => {
        self.status_msg = format!("Bookmarked {book} {chapter}");
      }
      Ok(BookmarkChange::Removed) => {
        self.status_msg = format!("Removed bookmark {book} {chapter}");
      }
      Err(e) => self.status_msg = format!("Error: {e}"),
    }
    self.collections.bookmarks = self.library.bookmarks().await;
  }

  fn run_verse_search(&mut self) {
    let query = self.reader.search.trim().to_string();
    if query.is_empty() {
      return;
    }
    self.reader.searching = true;
    self.seqs.search += 1;
    let seq = self.seqs.search;
    self.spawn_generation(
      VerseSearchResults::request(&query),
      move |result| AppEvent::SearchLoaded { seq, result },
    );
  }

  // ── Actions: guidance ─────────────────────────────────────────────────

  fn run_guidance_search(
    &mut self,
    query: String,
    topic_id: Option<&'static str>,
  ) {
    self.guidance.loading = true;
    self.guidance.topic_id = topic_id;
    self.guidance.query = query.clone();
    self.guidance.verse_cursor = 0;
    self.seqs.guidance += 1;
    let seq = self.seqs.guidance;
    self.spawn_generation(GuidancePlan::request(&query), move |result| {
      AppEvent::GuidanceLoaded { seq, result }
    });
  }

  async fn favorite_guidance_verse(&mut self) {
    let Some(plan) = &self.guidance.plan else {
      return;
    };
    let Some(verse) = plan.verses.get(self.guidance.verse_cursor) else {
      return;
    };

    let favorite = Favorite {
      verse_reference: verse.reference.clone(),
      verse_text:      verse.text.clone(),
      bible_version:   "NIV".to_string(),
      personal_note:   None,
      category:        Some(
        self.guidance.topic_id.unwrap_or("other").to_string(),
      ),
    };
    let reference = verse.reference.clone();
    match self.library.add_favorite(favorite).await {
      Ok(Some(_)) => self.status_msg = format!("Saved {reference}"),
      Ok(None) => self.status_msg = format!("{reference} already saved"),
      Err(e) => self.status_msg = format!("Error: {e}"),
    }
    self.collections.favorites = self.library.favorites().await;
  }

  // ── Actions: sermons ──────────────────────────────────────────────────

  fn run_sermon_search(&mut self) {
    self.sermons.loading = true;
    self.sermons.cursor = 0;
    self.seqs.sermons += 1;
    let seq = self.seqs.sermons;
    self.spawn_generation(
      SermonListings::request(&self.sermons.topic, "", ""),
      move |result| AppEvent::SermonsLoaded { seq, result },
    );
  }

  async fn save_cursor_sermon(&mut self) {
    let Some(listing) =
      self.sermons.visible().get(self.sermons.cursor).copied().cloned()
    else {
      return;
    };

    let sermon = SavedSermon {
      title:           listing.title.clone(),
      preacher:        listing.preacher.clone(),
      church:          listing.church.clone(),
      location:        listing.location.clone(),
      verse_reference: listing.verse_reference.clone(),
      sermon_url:      listing.url.clone(),
      date:            listing.date.clone(),
    };
    match self.library.save_sermon(sermon).await {
      Ok(Some(_)) => self.status_msg = format!("Saved \"{}\"", listing.title),
      Ok(None) => {
        self.status_msg = format!("\"{}\" already saved", listing.title);
      }
      Err(e) => self.status_msg = format!("Error: {e}"),
    }
    self.collections.sermons = self.library.saved_sermons().await;
  }

  // ── Actions: home ─────────────────────────────────────────────────────

  fn refresh_daily_verse(&mut self) {
    self.home.loading = true;
    self.seqs.daily += 1;
    let seq = self.seqs.daily;
    self.spawn_generation(DailyVerse::request(), move |result| {
      AppEvent::DailyVerseLoaded { seq, result }
    });
  }

  async fn favorite_daily_verse(&mut self) {
    let daily = self.home.daily.clone();
    let favorite = Favorite {
      verse_reference: daily.reference.clone(),
      verse_text:      daily.verse,
      bible_version:   "NIV".to_string(),
      personal_note:   None,
      category:        None,
    };
    match self.library.add_favorite(favorite).await {
      Ok(Some(_)) => self.status_msg = format!("Saved {}", daily.reference),
      Ok(None) => {
        self.status_msg = format!("{} already saved", daily.reference);
      }
      Err(e) => self.status_msg = format!("Error: {e}"),
    }
    self.collections.favorites = self.library.favorites().await;
  }

  // ── Actions: journal ──────────────────────────────────────────────────

  async fn submit_journal_form(&mut self) {
    let result = if let Some(id) = self.journal.editing {
      self
        .library
        .update_journal_entry(id, JournalPatch {
          title:          Some(self.journal.title.clone()),
          content:        Some(self.journal.content.clone()),
          mood:           self.journal.mood,
          prayer_request: Some(self.journal.prayer.clone()),
          related_verses: Some(self.journal.related_verses.clone()),
        })
        .await
        .map(|_| ())
    } else {
      self
        .library
        .create_journal_entry(JournalEntry {
          title:          self.journal.title.clone(),
          content:        self.journal.content.clone(),
          mood:           self.journal.mood,
          prayer_request: (!self.journal.prayer.trim().is_empty())
            .then(|| self.journal.prayer.clone()),
          related_verses: self.journal.related_verses.clone(),
        })
        .await
        .map(|_| ())
    };

    match result {
      Ok(()) => {
        self.status_msg = if self.journal.editing.is_some() {
          "Entry updated".to_string()
        } else {
          "Entry saved".to_string()
        };
        self.journal.clear_form();
        self.journal.mode = JournalMode::List;
        self.collections.journal = self.library.journal().await;
      }
      Err(e) => self.status_msg = format!("Error: {e}"),
    }
  }

  fn request_verse_suggestion(&mut self) {
    if self.journal.content.trim().is_empty() && self.journal.mood.is_none()
    {
      return;
    }
    self.journal.suggesting = true;
    self.seqs.suggest += 1;
    let seq = self.seqs.suggest;
    let mood = self
      .journal
      .mood
      .map(|m| m.label().to_string())
      .unwrap_or_default();
    self.spawn_generation(
      VerseSuggestion::request(&self.journal.content, &mood),
      move |result| AppEvent::VerseSuggested { seq, result },
    );
  }

  // ── Completion handling ───────────────────────────────────────────────

  /// Apply a finished generation task. Results tagged with a superseded
  /// sequence number are dropped.
  pub fn apply(&mut self, event: AppEvent) {
    match event {
      AppEvent::ChapterLoaded { seq, result } => {
        if seq != self.seqs.chapter {
          trace!(seq, "discarding superseded chapter result");
          return;
        }
        self.reader.loading = false;
        match result {
          Ok(chapter) => {
            self.reader.total_chapters = chapter.total_chapters;
            self.reader.verses = chapter.verses;
            self.reader.cursor = 0;
          }
          Err(e) => {
            self.reader.verses.clear();
            self.status_msg = format!("Could not load chapter: {e}");
          }
        }
      }

      AppEvent::SearchLoaded { seq, result } => {
        if seq != self.seqs.search {
          trace!(seq, "discarding superseded search result");
          return;
        }
        self.reader.searching = false;
        match result {
          Ok(results) => self.reader.search_results = Some(results.results),
          Err(e) => self.status_msg = format!("Search failed: {e}"),
        }
      }

      AppEvent::GuidanceLoaded { seq, result } => {
        if seq != self.seqs.guidance {
          trace!(seq, "discarding superseded guidance result");
          return;
        }
        self.guidance.loading = false;
        match result {
          Ok(plan) => self.guidance.plan = Some(plan),
          Err(e) => self.status_msg = format!("Guidance failed: {e}"),
        }
      }

      AppEvent::SermonsLoaded { seq, result } => {
        if seq != self.seqs.sermons {
          trace!(seq, "discarding superseded sermon results");
          return;
        }
        self.sermons.loading = false;
        match result {
          Ok(listings) => self.sermons.results = listings.sermons,
          Err(e) => self.status_msg = format!("Sermon search failed: {e}"),
        }
      }

      AppEvent::DailyVerseLoaded { seq, result } => {
        if seq != self.seqs.daily {
          trace!(seq, "discarding superseded daily verse");
          return;
        }
        self.home.loading = false;
        // Never leave the home screen blank: any failure falls back to
        // the built-in verse.
        self.home.daily = result.unwrap_or_else(|e| {
          debug!(error = %e, "daily verse generation failed");
          DailyVerse::fallback()
        });
      }

      AppEvent::VerseSuggested { seq, result } => {
        if seq != self.seqs.suggest {
          trace!(seq, "discarding superseded verse suggestion");
          return;
        }
        self.journal.suggesting = false;
        match result {
          Ok(suggestion) => self.journal.suggestion = Some(suggestion),
          Err(e) => self.status_msg = format!("Suggestion failed: {e}"),
        }
      }
    }
  }

  // ── Key handling ──────────────────────────────────────────────────────

  /// Process a key event. Returns `true` to continue, `false` to quit.
  pub async fn handle_key(&mut self, key: KeyEvent) -> anyhow::Result<bool> {
    // Global: Ctrl-C quits from anywhere.
    if key.modifiers.contains(KeyModifiers::CONTROL)
      && key.code == KeyCode::Char('c')
    {
      return Ok(false);
    }

    self.status_msg.clear();

    // Text-entry modes capture all printable keys.
    if self.in_text_entry() {
      self.handle_text_entry(key).await?;
      return Ok(true);
    }

    // Global navigation.
    match key.code {
      KeyCode::Char('q') => return Ok(false),
      KeyCode::Tab => {
        self.screen = self.screen.next();
        return Ok(true);
      }
      KeyCode::BackTab => {
        self.screen = self.screen.prev();
        return Ok(true);
      }
      KeyCode::Char('T') => {
        self.toggle_theme();
        return Ok(true);
      }
      _ => {}
    }

    match self.screen {
      Screen::Home => self.handle_home_key(key).await,
      Screen::Reader => self.handle_reader_key(key).await,
      Screen::Guidance => self.handle_guidance_key(key).await,
      Screen::Sermons => self.handle_sermon_key(key).await,
      Screen::Favorites => self.handle_favorites_key(key).await,
      Screen::Journal => self.handle_journal_key(key).await,
    }
    Ok(true)
  }

  fn toggle_theme(&mut self) {
    self.theme = self.theme.toggle();
    let prefs = Preferences { theme: self.theme };
    match prefs.save(&self.prefs_path) {
      Ok(()) => self.status_msg = format!("Theme: {}", self.theme.label()),
      Err(e) => self.status_msg = format!("Could not save theme: {e}"),
    }
  }

  fn in_text_entry(&self) -> bool {
    self.reader.search_active
      || self.reader.note_active
      || self.reader.book_select
      || self.guidance.input_active
      || self.sermons.input_active
      || self.favorites.filter_active
      || self.journal.filter_active
      || self.journal.mode == JournalMode::Write
  }

  async fn handle_text_entry(&mut self, key: KeyEvent) -> anyhow::Result<()> {
    if self.reader.search_active {
      match key.code {
        KeyCode::Esc => {
          self.reader.search_active = false;
          self.reader.search.clear();
        }
        KeyCode::Enter => {
          self.reader.search_active = false;
          self.run_verse_search();
        }
        KeyCode::Backspace => {
          self.reader.search.pop();
        }
        KeyCode::Char(c) => self.reader.search.push(c),
        _ => {}
      }
    } else if self.reader.note_active {
      match key.code {
        KeyCode::Esc => {
          self.reader.note_active = false;
          self.reader.note.clear();
        }
        KeyCode::Enter => {
          self.reader.note_active = false;
          let note = std::mem::take(&mut self.reader.note);
          self
            .favorite_cursor_verse(
              (!note.trim().is_empty()).then_some(note),
            )
            .await;
        }
        KeyCode::Backspace => {
          self.reader.note.pop();
        }
        KeyCode::Char(c) => self.reader.note.push(c),
        _ => {}
      }
    } else if self.reader.book_select {
      self.handle_book_select_key(key).await;
    } else if self.guidance.input_active {
      match key.code {
        KeyCode::Esc => {
          self.guidance.input_active = false;
          self.guidance.query.clear();
        }
        KeyCode::Enter => {
          self.guidance.input_active = false;
          let query = self.guidance.query.trim().to_string();
          if !query.is_empty() {
            self.run_guidance_search(query, None);
          }
        }
        KeyCode::Backspace => {
          self.guidance.query.pop();
        }
        KeyCode::Char(c) => self.guidance.query.push(c),
        _ => {}
      }
    } else if self.sermons.input_active {
      match key.code {
        KeyCode::Esc => {
          self.sermons.input_active = false;
        }
        KeyCode::Enter => {
          self.sermons.input_active = false;
          self.run_sermon_search();
        }
        KeyCode::Backspace => {
          self.sermons.topic.pop();
        }
        KeyCode::Char(c) => self.sermons.topic.push(c),
        _ => {}
      }
    } else if self.favorites.filter_active {
      match key.code {
        KeyCode::Esc => {
          self.favorites.filter_active = false;
          self.favorites.filter.clear();
          self.favorites.cursor = 0;
        }
        KeyCode::Enter => self.favorites.filter_active = false,
        KeyCode::Backspace => {
          self.favorites.filter.pop();
          self.favorites.cursor = 0;
        }
        KeyCode::Char(c) => {
          self.favorites.filter.push(c);
          self.favorites.cursor = 0;
        }
        _ => {}
      }
    } else if self.journal.filter_active {
      match key.code {
        KeyCode::Esc => {
          self.journal.filter_active = false;
          self.journal.filter.clear();
          self.journal.cursor = 0;
        }
        KeyCode::Enter => self.journal.filter_active = false,
        KeyCode::Backspace => {
          self.journal.filter.pop();
          self.journal.cursor = 0;
        }
        KeyCode::Char(c) => {
          self.journal.filter.push(c);
          self.journal.cursor = 0;
        }
        _ => {}
      }
    } else if self.journal.mode == JournalMode::Write {
      self.handle_journal_write_key(key).await;
    }
    Ok(())
  }

  async fn handle_book_select_key(&mut self, key: KeyEvent) {
    match key.code {
      KeyCode::Esc => {
        self.reader.book_select = false;
        self.reader.book_filter.clear();
      }
      KeyCode::Down => {
        let len = books::filtered(&self.reader.book_filter).len();
        if len > 0 && self.reader.book_cursor + 1 < len {
          self.reader.book_cursor += 1;
        }
      }
      KeyCode::Up => {
        self.reader.book_cursor = self.reader.book_cursor.saturating_sub(1);
      }
      KeyCode::Enter => {
        let selection = books::filtered(&self.reader.book_filter)
          .get(self.reader.book_cursor)
          .map(|b| b.name.to_string());
        if let Some(book) = selection {
          self.reader.book_select = false;
          self.reader.book_filter.clear();
          self.reader.book_cursor = 0;
          self.open_location(book, 1, None).await;
        }
      }
      KeyCode::Backspace => {
        self.reader.book_filter.pop();
        self.reader.book_cursor = 0;
      }
      KeyCode::Char(c) => {
        self.reader.book_filter.push(c);
        self.reader.book_cursor = 0;
      }
      _ => {}
    }
  }

  async fn handle_journal_write_key(&mut self, key: KeyEvent) {
    // Form-level chords first.
    if key.modifiers.contains(KeyModifiers::CONTROL) {
      match key.code {
        KeyCode::Char('s') => {
          self.submit_journal_form().await;
          return;
        }
        KeyCode::Char('g') => {
          self.request_verse_suggestion();
          return;
        }
        KeyCode::Char('a') => {
          if let Some(suggestion) = self.journal.suggestion.take() {
            self.journal.related_verses.push(suggestion.reference);
            self.status_msg = "Verse attached".to_string();
          }
          return;
        }
        KeyCode::Char('n') => {
          self.journal.mood = next_mood(self.journal.mood);
          return;
        }
        _ => return,
      }
    }

    match key.code {
      KeyCode::Esc => {
        self.journal.clear_form();
        self.journal.mode = JournalMode::List;
      }
      KeyCode::Tab => {
        self.journal.focus = match self.journal.focus {
          JournalField::Title => JournalField::Content,
          JournalField::Content => JournalField::Prayer,
          JournalField::Prayer => JournalField::Title,
        };
      }
      KeyCode::Enter => match self.journal.focus {
        JournalField::Title => self.journal.focus = JournalField::Content,
        JournalField::Content => self.journal.content.push('\n'),
        JournalField::Prayer => self.journal.prayer.push('\n'),
      },
      KeyCode::Backspace => {
        match self.journal.focus {
          JournalField::Title => self.journal.title.pop(),
          JournalField::Content => self.journal.content.pop(),
          JournalField::Prayer => self.journal.prayer.pop(),
        };
      }
      KeyCode::Char(c) => match self.journal.focus {
        JournalField::Title => self.journal.title.push(c),
        JournalField::Content => self.journal.content.push(c),
        JournalField::Prayer => self.journal.prayer.push(c),
      },
      _ => {}
    }
  }

  // ── Per-screen keys ───────────────────────────────────────────────────

  async fn handle_home_key(&mut self, key: KeyEvent) {
    match key.code {
      KeyCode::Char('r') => self.refresh_daily_verse(),
      KeyCode::Char('f') => self.favorite_daily_verse().await,
      _ => {}
    }
  }

  async fn handle_reader_key(&mut self, key: KeyEvent) {
    match key.code {
      // Chapter navigation.
      KeyCode::Char('n') | KeyCode::Right => self.change_chapter(1).await,
      KeyCode::Char('p') | KeyCode::Left => self.change_chapter(-1).await,

      // Verse cursor.
      KeyCode::Down | KeyCode::Char('j') => {
        if self.reader.cursor + 1 < self.reader.verses.len() {
          self.reader.cursor += 1;
        }
      }
      KeyCode::Up | KeyCode::Char('k') => {
        self.reader.cursor = self.reader.cursor.saturating_sub(1);
      }

      // Verse actions.
      KeyCode::Char('f') => self.favorite_cursor_verse(None).await,
      KeyCode::Char('a') => {
        if self.cursor_verse().is_some() {
          self.reader.note_active = true;
          self.reader.note.clear();
        }
      }
      KeyCode::Char('m') => self.toggle_current_bookmark().await,
      KeyCode::Char('1') => {
        self.highlight_cursor_verse(HighlightColor::Yellow).await;
      }
      KeyCode::Char('2') => {
        self.highlight_cursor_verse(HighlightColor::Green).await;
      }
      KeyCode::Char('3') => {
        self.highlight_cursor_verse(HighlightColor::Blue).await;
      }
      KeyCode::Char('4') => {
        self.highlight_cursor_verse(HighlightColor::Pink).await;
      }

      // Pickers and search.
      KeyCode::Char('o') => {
        self.reader.book_select = true;
        self.reader.book_filter.clear();
        self.reader.book_cursor = 0;
      }
      KeyCode::Char('v') => {
        let i = books::VERSIONS
          .iter()
          .position(|v| *v == self.reader.version)
          .unwrap_or(0);
        self.reader.version =
          books::VERSIONS[(i + 1) % books::VERSIONS.len()].to_string();
        self.open_chapter().await;
      }
      KeyCode::Char('/') => {
        self.reader.search_active = true;
        self.reader.search.clear();
      }
      KeyCode::Esc => self.reader.search_results = None,
      _ => {}
    }
  }

  async fn handle_guidance_key(&mut self, key: KeyEvent) {
    let has_plan = self.guidance.plan.is_some();
    match key.code {
      KeyCode::Char('/') => {
        self.guidance.input_active = true;
        self.guidance.query.clear();
      }
      KeyCode::Esc => {
        self.guidance.plan = None;
        self.guidance.topic_id = None;
      }
      KeyCode::Char('r') if has_plan => {
        let query = self.guidance.query.clone();
        if !query.is_empty() {
          self.run_guidance_search(query, self.guidance.topic_id);
        }
      }
      KeyCode::Down | KeyCode::Char('j') => {
        if let Some(plan) = &self.guidance.plan {
          if self.guidance.verse_cursor + 1 < plan.verses.len() {
            self.guidance.verse_cursor += 1;
          }
        } else if self.guidance.topic_cursor + 1 < LIFE_SITUATIONS.len() {
          self.guidance.topic_cursor += 1;
        }
      }
      KeyCode::Up | KeyCode::Char('k') => {
        if self.guidance.plan.is_some() {
          self.guidance.verse_cursor =
            self.guidance.verse_cursor.saturating_sub(1);
        } else {
          self.guidance.topic_cursor =
            self.guidance.topic_cursor.saturating_sub(1);
        }
      }
      KeyCode::Enter if !has_plan => {
        let situation = &LIFE_SITUATIONS[self.guidance.topic_cursor];
        self.run_guidance_search(
          situation.prompt.to_string(),
          Some(situation.id),
        );
      }
      KeyCode::Char('f') if has_plan => self.favorite_guidance_verse().await,
      KeyCode::Char('o') if has_plan => {
        let locus = self
          .guidance
          .plan
          .as_ref()
          .and_then(|p| p.verses.get(self.guidance.verse_cursor))
          .and_then(|v| parse_locus(&v.reference).ok());
        if let Some((book, chapter)) = locus {
          self.open_location(book, chapter, None).await;
        } else {
          self.status_msg = "Could not parse that reference".to_string();
        }
      }
      _ => {}
    }
  }

  async fn handle_sermon_key(&mut self, key: KeyEvent) {
    match key.code {
      KeyCode::Char('/') => self.sermons.input_active = true,
      KeyCode::Down | KeyCode::Char('j') => {
        let len = self.sermons.visible().len();
        if len > 0 && self.sermons.cursor + 1 < len {
          self.sermons.cursor += 1;
        }
      }
      KeyCode::Up | KeyCode::Char('k') => {
        self.sermons.cursor = self.sermons.cursor.saturating_sub(1);
      }
      KeyCode::Char('s') => self.save_cursor_sermon().await,
      KeyCode::Char('L') => {
        self.sermons.filter = SermonFilter::Live;
        self.sermons.cursor = 0;
      }
      KeyCode::Char('O') => {
        self.sermons.filter = SermonFilter::Local;
        self.sermons.cursor = 0;
      }
      KeyCode::Char('a') => {
        self.sermons.filter = SermonFilter::All;
        self.sermons.cursor = 0;
      }
      _ => {}
    }
  }

  async fn handle_favorites_key(&mut self, key: KeyEvent) {
    match key.code {
      KeyCode::Char('t') => {
        self.favorites.tab = match self.favorites.tab {
          FavoritesTab::Verses => FavoritesTab::Sermons,
          FavoritesTab::Sermons => FavoritesTab::Verses,
        };
        self.favorites.cursor = 0;
      }
      KeyCode::Char('/') => {
        self.favorites.filter_active = true;
        self.favorites.filter.clear();
        self.favorites.cursor = 0;
      }
      KeyCode::Down | KeyCode::Char('j') => {
        let len = self.favorites_visible_len();
        if len > 0 && self.favorites.cursor + 1 < len {
          self.favorites.cursor += 1;
        }
      }
      KeyCode::Up | KeyCode::Char('k') => {
        self.favorites.cursor = self.favorites.cursor.saturating_sub(1);
      }
      KeyCode::Char('d') => self.delete_cursor_favorite().await,
      KeyCode::Char('o') => {
        if self.favorites.tab == FavoritesTab::Verses {
          let locus = self
            .collections
            .favorites
            .matching(&self.favorites.filter, None)
            .get(self.favorites.cursor)
            .and_then(|f| parse_locus(&f.verse_reference).ok());
          if let Some((book, chapter)) = locus {
            let version = self.reader.version.clone();
            self.open_location(book, chapter, Some(version)).await;
          }
        }
      }
      _ => {}
    }
  }

  fn favorites_visible_len(&self) -> usize {
    match self.favorites.tab {
      FavoritesTab::Verses => self
        .collections
        .favorites
        .matching(&self.favorites.filter, None)
        .len(),
      FavoritesTab::Sermons => {
        self.collections.sermons.matching(&self.favorites.filter).len()
      }
    }
  }

  async fn delete_cursor_favorite(&mut self) {
    match self.favorites.tab {
      FavoritesTab::Verses => {
        let id = self
          .collections
          .favorites
          .matching(&self.favorites.filter, None)
          .get(self.favorites.cursor)
          .map(|f| f.id);
        if let Some(id) = id {
          if let Err(e) = self.library.remove_favorite(id).await {
            self.status_msg = format!("Error: {e}");
          }
          self.collections.favorites = self.library.favorites().await;
          self.favorites.cursor = self.favorites.cursor.saturating_sub(1);
        }
      }
      FavoritesTab::Sermons => {
        let id = self
          .collections
          .sermons
          .matching(&self.favorites.filter)
          .get(self.favorites.cursor)
          .map(|s| s.id);
        if let Some(id) = id {
          if let Err(e) = self.library.remove_sermon(id).await {
            self.status_msg = format!("Error: {e}");
          }
          self.collections.sermons = self.library.saved_sermons().await;
          self.favorites.cursor = self.favorites.cursor.saturating_sub(1);
        }
      }
    }
  }

  async fn handle_journal_key(&mut self, key: KeyEvent) {
    match key.code {
      KeyCode::Char('n') => {
        self.journal.clear_form();
        self.journal.mode = JournalMode::Write;
      }
      KeyCode::Char('e') => {
        let entry = self
          .collections
          .journal
          .matching(&self.journal.filter, self.journal.mood_filter)
          .get(self.journal.cursor)
          .map(|e| (e.id, e.fields.clone()));
        if let Some((id, fields)) = entry {
          self.journal.clear_form();
          self.journal.editing = Some(id);
          self.journal.title = fields.title;
          self.journal.content = fields.content;
          self.journal.prayer = fields.prayer_request.unwrap_or_default();
          self.journal.mood = fields.mood;
          self.journal.related_verses = fields.related_verses;
          self.journal.mode = JournalMode::Write;
        }
      }
      KeyCode::Char('d') => {
        let id = self
          .collections
          .journal
          .matching(&self.journal.filter, self.journal.mood_filter)
          .get(self.journal.cursor)
          .map(|e| e.id);
        if let Some(id) = id {
          if let Err(e) = self.library.delete_journal_entry(id).await {
            self.status_msg = format!("Error: {e}");
          }
          self.collections.journal = self.library.journal().await;
          self.journal.cursor = self.journal.cursor.saturating_sub(1);
        }
      }
      KeyCode::Char('/') => {
        self.journal.filter_active = true;
        self.journal.filter.clear();
        self.journal.cursor = 0;
      }
      KeyCode::Char('m') => {
        self.journal.mood_filter = next_mood(self.journal.mood_filter);
        self.journal.cursor = 0;
      }
      KeyCode::Down | KeyCode::Char('j') => {
        let len = self
          .collections
          .journal
          .matching(&self.journal.filter, self.journal.mood_filter)
          .len();
        if len > 0 && self.journal.cursor + 1 < len {
          self.journal.cursor += 1;
        }
      }
      KeyCode::Up | KeyCode::Char('k') => {
        self.journal.cursor = self.journal.cursor.saturating_sub(1);
      }
      _ => {}
    }
  }
}

/// Cycle `None → Grateful → … → Reflective → None`.
fn next_mood(current: Option<Mood>) -> Option<Mood> {
  match current {
    None => Some(Mood::ALL[0]),
    Some(mood) => {
      let i = Mood::ALL.iter().position(|m| *m == mood).unwrap_or(0);
      if i + 1 < Mood::ALL.len() {
        Some(Mood::ALL[i + 1])
      } else {
        None
      }
    }
  }
}
