//! Scripture reader screen: verse list, bookmarks/history sidebar, book
//! selector, and verse search results.

use innerlight_core::{record::HighlightColor, reference::VerseRef};
use ratatui::{
  Frame,
  layout::{Constraint, Direction, Layout, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{List, ListItem, ListState, Paragraph, Wrap},
};

use crate::{
  app::App,
  books,
  ui::{input_line, pane},
};

fn marker_color(color: HighlightColor) -> Color {
  match color {
    HighlightColor::Yellow => Color::Yellow,
    HighlightColor::Green => Color::Green,
    HighlightColor::Blue => Color::Blue,
    HighlightColor::Pink => Color::Magenta,
  }
}

/// Render the reader into `area`.
pub fn draw(f: &mut Frame, area: Rect, app: &App) {
  let cols = Layout::default()
    .direction(Direction::Horizontal)
    .constraints(if app.reader.book_select {
      [Constraint::Percentage(30), Constraint::Percentage(70)]
    } else {
      [Constraint::Percentage(25), Constraint::Percentage(75)]
    })
    .split(area);

  if app.reader.book_select {
    draw_book_selector(f, cols[0], app);
  } else {
    draw_sidebar(f, cols[0], app);
  }

  if let Some(results) = &app.reader.search_results {
    draw_search_results(f, cols[1], app, results);
  } else {
    draw_verses(f, cols[1], app);
  }
}

// ─── Verses ───────────────────────────────────────────────────────────────────

fn draw_verses(f: &mut Frame, area: Rect, app: &App) {
  let rows = Layout::default()
    .direction(Direction::Vertical)
    .constraints([Constraint::Length(1), Constraint::Min(0)])
    .split(area);

  // Search / note entry line above the text.
  if app.reader.note_active {
    input_line(f, rows[0], app, "note: ", &app.reader.note, true);
  } else {
    input_line(
      f,
      rows[0],
      app,
      "/",
      &app.reader.search,
      app.reader.search_active,
    );
  }

  let title = format!(
    "{} {} ({})",
    app.reader.book, app.reader.chapter, app.reader.version
  );
  let block = pane(&title, app);

  if app.reader.loading {
    let inner = block.inner(rows[1]);
    f.render_widget(block, rows[1]);
    f.render_widget(
      Paragraph::new("Loading chapter…")
        .style(Style::default().fg(app.theme.dim())),
      inner,
    );
    return;
  }

  let items: Vec<ListItem> = app
    .reader
    .verses
    .iter()
    .map(|verse| {
      let reference = VerseRef::new(
        app.reader.book.clone(),
        app.reader.chapter,
        verse.number as u16,
      )
      .to_string();

      let highlight = app
        .collections
        .highlights
        .for_verse(&reference, &app.reader.version);
      let favorited =
        app.collections.favorites.contains_reference(&reference);

      let mut spans = vec![Span::styled(
        format!("{:>3} ", verse.number),
        Style::default().fg(app.theme.dim()),
      )];
      if favorited {
        spans.push(Span::styled("♥ ", Style::default().fg(Color::Red)));
      }

      let text_style = match highlight {
        Some(h) => Style::default()
          .fg(Color::Black)
          .bg(marker_color(h.color)),
        None => Style::default(),
      };
      spans.push(Span::styled(verse.text.clone(), text_style));

      ListItem::new(Line::from(spans))
    })
    .collect();

  let empty = items.is_empty();
  let inner = block.inner(rows[1]);
  f.render_widget(block, rows[1]);

  if empty {
    f.render_widget(
      Paragraph::new("No verses loaded. Press n/p to navigate chapters.")
        .style(Style::default().fg(app.theme.dim()))
        .wrap(Wrap { trim: true }),
      inner,
    );
    return;
  }

  let mut state = ListState::default();
  state.select(Some(app.reader.cursor));
  f.render_stateful_widget(
    List::new(items).highlight_style(
      Style::default().add_modifier(Modifier::BOLD | Modifier::REVERSED),
    ),
    inner,
    &mut state,
  );
}

// ─── Sidebar ──────────────────────────────────────────────────────────────────

fn draw_sidebar(f: &mut Frame, area: Rect, app: &App) {
  let rows = Layout::default()
    .direction(Direction::Vertical)
    .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
    .split(area);

  // Bookmarks for the current version.
  let bookmarks = app.collections.bookmarks.for_version(&app.reader.version);
  let items: Vec<ListItem> = bookmarks
    .iter()
    .map(|b| ListItem::new(b.label.clone()))
    .collect();
  let block = pane(&format!("Bookmarks ({})", bookmarks.len()), app);
  let inner = block.inner(rows[0]);
  f.render_widget(block, rows[0]);
  if items.is_empty() {
    f.render_widget(
      Paragraph::new("No bookmarks saved")
        .style(Style::default().fg(app.theme.dim())),
      inner,
    );
  } else {
    f.render_widget(List::new(items), inner);
  }

  // Recent reading, current version only.
  let history = app.collections.history.for_version(&app.reader.version);
  let items: Vec<ListItem> = history
    .iter()
    .take(10)
    .map(|h| ListItem::new(format!("{} {}", h.book, h.chapter)))
    .collect();
  let block = pane("Recent", app);
  let inner = block.inner(rows[1]);
  f.render_widget(block, rows[1]);
  if items.is_empty() {
    f.render_widget(
      Paragraph::new("No reading history yet")
        .style(Style::default().fg(app.theme.dim())),
      inner,
    );
  } else {
    f.render_widget(List::new(items), inner);
  }
}

// ─── Book selector ────────────────────────────────────────────────────────────

fn draw_book_selector(f: &mut Frame, area: Rect, app: &App) {
  let rows = Layout::default()
    .direction(Direction::Vertical)
    .constraints([Constraint::Length(1), Constraint::Min(0)])
    .split(area);

  input_line(f, rows[0], app, "book: ", &app.reader.book_filter, true);

  let filtered = books::filtered(&app.reader.book_filter);
  let items: Vec<ListItem> = filtered
    .iter()
    .map(|b| {
      let style = if b.name == app.reader.book {
        Style::default().fg(app.theme.accent())
      } else {
        Style::default()
      };
      ListItem::new(Span::styled(
        format!("{} ({})", b.name, b.chapters),
        style,
      ))
    })
    .collect();

  let block = pane("Books", app);
  let inner = block.inner(rows[1]);
  f.render_widget(block, rows[1]);

  let mut state = ListState::default();
  state.select(if filtered.is_empty() {
    None
  } else {
    Some(app.reader.book_cursor.min(filtered.len() - 1))
  });
  f.render_stateful_widget(
    List::new(items).highlight_style(
      Style::default().add_modifier(Modifier::BOLD | Modifier::REVERSED),
    ),
    inner,
    &mut state,
  );
}

// ─── Search results ───────────────────────────────────────────────────────────

fn draw_search_results(
  f: &mut Frame,
  area: Rect,
  app: &App,
  results: &[innerlight_core::content::VerseHit],
) {
  let block = pane(&format!("Search results ({})", results.len()), app);
  let inner = block.inner(area);
  f.render_widget(block, area);

  let mut lines = Vec::new();
  for hit in results {
    lines.push(Line::from(Span::styled(
      format!("— {}", hit.reference),
      Style::default()
        .fg(app.theme.accent())
        .add_modifier(Modifier::BOLD),
    )));
    lines.push(Line::from(format!("\"{}\"", hit.text)));
    if let Some(relevance) = &hit.relevance {
      lines.push(Line::from(Span::styled(
        relevance.clone(),
        Style::default().fg(app.theme.dim()),
      )));
    }
    lines.push(Line::from(""));
  }
  if lines.is_empty() {
    lines.push(Line::from(Span::styled(
      "No results. Esc to go back.",
      Style::default().fg(app.theme.dim()),
    )));
  }

  f.render_widget(
    Paragraph::new(lines).wrap(Wrap { trim: false }),
    inner,
  );
}
