//! TUI rendering — orchestrates all screens.

pub mod discover;
pub mod journal;
pub mod library;
pub mod reader;

use ratatui::{
  Frame,
  layout::{Constraint, Direction, Layout, Rect},
  style::{Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Paragraph},
};

use crate::app::{App, JournalMode, Screen};

// ─── Root draw ────────────────────────────────────────────────────────────────

/// Main draw function called each frame.
pub fn draw(f: &mut Frame, app: &App) {
  let area = f.area();

  // Vertical stack: tab bar, body, status bar.
  let rows = Layout::default()
    .direction(Direction::Vertical)
    .constraints([
      Constraint::Length(1), // tab bar
      Constraint::Min(0),    // body
      Constraint::Length(1), // status bar
    ])
    .split(area);

  draw_tabs(f, rows[0], app);
  draw_body(f, rows[1], app);
  draw_status(f, rows[2], app);
}

// ─── Tab bar ──────────────────────────────────────────────────────────────────

fn draw_tabs(f: &mut Frame, area: Rect, app: &App) {
  let mut spans = vec![Span::styled(
    " Inner Light ",
    Style::default()
      .fg(app.theme.accent())
      .add_modifier(Modifier::BOLD),
  )];

  for screen in Screen::ALL {
    let style = if screen == app.screen {
      Style::default()
        .fg(app.theme.accent())
        .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
    } else {
      Style::default().fg(app.theme.dim())
    };
    spans.push(Span::styled(format!(" {} ", screen.title()), style));
  }

  let block = Block::default().style(Style::default().bg(app.theme.bar_bg()));
  let inner = block.inner(area);
  f.render_widget(block, area);
  f.render_widget(Paragraph::new(Line::from(spans)), inner);
}

// ─── Body ─────────────────────────────────────────────────────────────────────

fn draw_body(f: &mut Frame, area: Rect, app: &App) {
  match app.screen {
    Screen::Home => discover::draw_home(f, area, app),
    Screen::Reader => reader::draw(f, area, app),
    Screen::Guidance => discover::draw_guidance(f, area, app),
    Screen::Sermons => discover::draw_sermons(f, area, app),
    Screen::Favorites => library::draw(f, area, app),
    Screen::Journal => journal::draw(f, area, app),
  }
}

// ─── Status bar ───────────────────────────────────────────────────────────────

fn draw_status(f: &mut Frame, area: Rect, app: &App) {
  let hints = match app.screen {
    Screen::Home => "r new verse  f save  Tab screens  T theme  q quit",
    Screen::Reader => {
      "n/p chapter  j/k verse  f fav  a note  m bookmark  1-4 highlight  \
       o book  v version  / search  q quit"
    }
    Screen::Guidance => {
      "j/k move  Enter topic  / ask  f fav  o open  r more  Esc back  q quit"
    }
    Screen::Sermons => {
      "/ search  j/k move  s save  L live  O local  a all  q quit"
    }
    Screen::Favorites => "t tab  / filter  j/k move  d delete  o open  q quit",
    Screen::Journal => match app.journal.mode {
      JournalMode::List => {
        "n new  e edit  d delete  / filter  m mood  j/k move  q quit"
      }
      JournalMode::Write => {
        "Tab field  ^S save  ^N mood  ^G suggest verse  ^A attach  Esc back"
      }
    },
  };

  let status = if app.status_msg.is_empty() {
    hints.to_string()
  } else {
    app.status_msg.clone()
  };

  let mode_span = Span::styled(
    format!(" {} ", app.screen.title().to_uppercase()),
    Style::default()
      .fg(app.theme.bar_bg())
      .bg(app.theme.accent())
      .add_modifier(Modifier::BOLD),
  );
  let hint_span =
    Span::styled(format!("  {status}"), Style::default().fg(app.theme.dim()));

  let line = Line::from(vec![mode_span, hint_span]);
  f.render_widget(
    Paragraph::new(line).style(Style::default().bg(app.theme.bar_bg())),
    area,
  );
}

// ─── Shared helpers ───────────────────────────────────────────────────────────

/// Standard bordered block with a dim border and a title.
pub(crate) fn pane(title: &str, app: &App) -> Block<'static> {
  Block::bordered()
    .title(format!(" {title} "))
    .border_style(Style::default().fg(app.theme.dim()))
}

/// A one-line text input with a cursor marker when active.
pub(crate) fn input_line(
  f: &mut Frame,
  area: Rect,
  app: &App,
  label: &str,
  value: &str,
  active: bool,
) {
  let text = if active {
    format!("{label}{value}_")
  } else {
    format!("{label}{value}")
  };
  let style = if active {
    Style::default().fg(app.theme.accent())
  } else {
    Style::default().fg(app.theme.dim())
  };
  f.render_widget(Paragraph::new(text).style(style), area);
}
