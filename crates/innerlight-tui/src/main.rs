//! `innerlight` — terminal client for the Inner Light devotional store.
//!
//! # Usage
//!
//! ```
//! innerlight --url https://backend.example.com --api-key secret
//! innerlight --config ~/.config/innerlight/config.toml --book Psalms
//! ```

mod app;
mod books;
mod prefs;
mod theme;
mod ui;

use std::{
  io,
  path::{Path, PathBuf},
  sync::Arc,
  time::Duration,
};

use anyhow::{Context, Result};
use app::{App, AppEvent, InitialLocation};
use clap::Parser;
use crossterm::{
  event::{self, Event},
  execute,
  terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode,
    enable_raw_mode,
  },
};
use innerlight_cache::Library;
use innerlight_client::{ClientConfig, HttpGenerator, HttpStore};
use ratatui::{Terminal, backend::CrosstermBackend};
use serde::Deserialize;
use tokio::sync::mpsc;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use crate::prefs::{Preferences, expand_tilde};

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(
  name = "innerlight",
  about = "Terminal client for the Inner Light devotional store"
)]
struct Args {
  /// Path to a TOML config file (url, api_key).
  #[arg(short, long, value_name = "FILE")]
  config: Option<PathBuf>,

  /// Base URL of the hosted backend.
  #[arg(long, env = "INNERLIGHT_URL")]
  url: Option<String>,

  /// API key sent on every request.
  #[arg(long, env = "INNERLIGHT_API_KEY")]
  api_key: Option<String>,

  /// Open the reader at this book.
  #[arg(long)]
  book: Option<String>,

  /// Open the reader at this chapter (used with --book).
  #[arg(long)]
  chapter: Option<u16>,

  /// Open the guidance screen with this topic.
  #[arg(long)]
  topic: Option<String>,
}

// ─── Settings ─────────────────────────────────────────────────────────────────

/// Shape of the config file; also fed by `INNERLIGHT_*` env variables.
#[derive(Debug, Default, Deserialize)]
struct Settings {
  #[serde(default)]
  url:     String,
  #[serde(default)]
  api_key: String,
}

fn load_settings(explicit: Option<&Path>) -> Result<Settings> {
  let path = explicit.map(Path::to_path_buf).unwrap_or_else(|| {
    expand_tilde(Path::new("~/.config/innerlight/config.toml"))
  });

  let settings = config::Config::builder()
    .add_source(config::File::from(path).required(false))
    .add_source(config::Environment::with_prefix("INNERLIGHT"))
    .build()
    .context("failed to read configuration")?;

  settings.try_deserialize().context("failed to deserialise settings")
}

// ─── Tracing ──────────────────────────────────────────────────────────────────

/// Log to a file — stdout belongs to the TUI.
fn init_tracing() -> Result<()> {
  let log_path =
    expand_tilde(Path::new("~/.local/state/innerlight/innerlight.log"));
  if let Some(parent) = log_path.parent() {
    std::fs::create_dir_all(parent)
      .with_context(|| format!("creating {}", parent.display()))?;
  }
  let file = std::fs::OpenOptions::new()
    .create(true)
    .append(true)
    .open(&log_path)
    .with_context(|| format!("opening {}", log_path.display()))?;

  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .with_writer(Arc::new(file))
    .with_ansi(false)
    .init();
  Ok(())
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
  let args = Args::parse();
  init_tracing()?;

  let settings = load_settings(args.config.as_deref())?;

  // CLI flags override the config file, which overrides defaults.
  let base_url = args
    .url
    .clone()
    .or_else(|| (!settings.url.is_empty()).then(|| settings.url.clone()))
    .unwrap_or_else(|| "http://localhost:3000".to_string());
  let api_key = args
    .api_key
    .clone()
    .or_else(|| {
      (!settings.api_key.is_empty()).then(|| settings.api_key.clone())
    })
    .unwrap_or_default();

  let client_config = ClientConfig { base_url, api_key };
  let store = HttpStore::new(client_config.clone())
    .context("building entity store client")?;
  let generator = HttpGenerator::new(client_config)
    .context("building generation client")?;
  let library = Library::new(store);

  let prefs_path = Preferences::default_path();
  let preferences = Preferences::load(&prefs_path);

  let (mut app, mut events) =
    App::new(library, generator, preferences, prefs_path);

  // Set up the terminal.
  enable_raw_mode().context("enabling raw mode")?;
  let mut stdout = io::stdout();
  execute!(stdout, EnterAlternateScreen)
    .context("entering alternate screen")?;
  let backend = CrosstermBackend::new(stdout);
  let mut terminal = Terminal::new(backend).context("creating terminal")?;

  app
    .bootstrap(InitialLocation {
      book:    args.book,
      chapter: args.chapter,
      topic:   args.topic,
    })
    .await;

  // Run the event loop; restore the terminal even on error.
  let run_result = run_event_loop(&mut terminal, &mut app, &mut events).await;

  disable_raw_mode().ok();
  execute!(terminal.backend_mut(), LeaveAlternateScreen).ok();
  terminal.show_cursor().ok();

  run_result
}

// ─── Event loop ───────────────────────────────────────────────────────────────

async fn run_event_loop(
  terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
  app: &mut App,
  events: &mut mpsc::UnboundedReceiver<AppEvent>,
) -> Result<()> {
  loop {
    // Drain finished generation tasks before drawing.
    while let Ok(event) = events.try_recv() {
      app.apply(event);
    }

    terminal.draw(|f| ui::draw(f, app)).context("drawing frame")?;

    // Poll for an input event, yielding control to tokio while waiting.
    let maybe_event = tokio::task::block_in_place(|| {
      if event::poll(Duration::from_millis(50))? {
        Ok::<_, io::Error>(Some(event::read()?))
      } else {
        Ok(None)
      }
    })?;

    if let Some(evt) = maybe_event {
      match evt {
        Event::Key(key) => {
          let cont = app.handle_key(key).await?;
          if !cont {
            break;
          }
        }
        Event::Resize(_, _) => {
          // Terminal will redraw on next iteration.
        }
        _ => {}
      }
    }
  }

  Ok(())
}
