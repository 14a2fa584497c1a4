//! Journal screen: entry list with mood filter, and the write form.

use chrono::Local;
use ratatui::{
  Frame,
  layout::{Constraint, Direction, Layout, Rect},
  style::{Modifier, Style},
  text::{Line, Span},
  widgets::{List, ListItem, ListState, Paragraph, Wrap},
};

use crate::{
  app::{App, JournalField, JournalMode},
  ui::{input_line, pane},
};

pub fn draw(f: &mut Frame, area: Rect, app: &App) {
  match app.journal.mode {
    JournalMode::List => draw_list(f, area, app),
    JournalMode::Write => draw_form(f, area, app),
  }
}

// ─── List ─────────────────────────────────────────────────────────────────────

fn draw_list(f: &mut Frame, area: Rect, app: &App) {
  let rows = Layout::default()
    .direction(Direction::Vertical)
    .constraints([Constraint::Length(1), Constraint::Min(0)])
    .split(area);

  let mood_label = app
    .journal
    .mood_filter
    .map(|m| m.label())
    .unwrap_or("all moods");
  input_line(
    f,
    rows[0],
    app,
    &format!("[{mood_label}] /"),
    &app.journal.filter,
    app.journal.filter_active,
  );

  let entries = app
    .collections
    .journal
    .matching(&app.journal.filter, app.journal.mood_filter);

  let items: Vec<ListItem> = entries
    .iter()
    .map(|entry| {
      let date = entry
        .created_at
        .with_timezone(&Local)
        .format("%Y-%m-%d")
        .to_string();
      let mood = entry
        .mood
        .map(|m| format!(" · {}", m.label()))
        .unwrap_or_default();
      ListItem::new(Line::from(vec![
        Span::styled(
          format!("{date} "),
          Style::default().fg(app.theme.dim()),
        ),
        Span::raw(entry.title.clone()),
        Span::styled(mood, Style::default().fg(app.theme.accent())),
      ]))
    })
    .collect();

  let block = pane(&format!("Journal ({})", entries.len()), app);
  let inner = block.inner(rows[1]);
  f.render_widget(block, rows[1]);

  if items.is_empty() {
    f.render_widget(
      Paragraph::new("No entries. Press n to write one.")
        .style(Style::default().fg(app.theme.dim())),
      inner,
    );
    return;
  }

  let mut state = ListState::default();
  state.select(Some(app.journal.cursor.min(entries.len() - 1)));
  f.render_stateful_widget(
    List::new(items).highlight_style(
      Style::default().add_modifier(Modifier::BOLD | Modifier::REVERSED),
    ),
    inner,
    &mut state,
  );
}

// ─── Write form ───────────────────────────────────────────────────────────────

fn field_style(app: &App, field: JournalField) -> Style {
  if app.journal.focus == field {
    Style::default().fg(app.theme.accent())
  } else {
    Style::default().fg(app.theme.dim())
  }
}

fn draw_form(f: &mut Frame, area: Rect, app: &App) {
  let rows = Layout::default()
    .direction(Direction::Vertical)
    .constraints([
      Constraint::Length(3), // title
      Constraint::Min(6),    // content
      Constraint::Length(3), // prayer request
      Constraint::Length(4), // mood + attachments + suggestion
    ])
    .split(area);

  let title_pane =
    pane("Title", app).border_style(field_style(app, JournalField::Title));
  let inner = title_pane.inner(rows[0]);
  f.render_widget(title_pane, rows[0]);
  f.render_widget(Paragraph::new(app.journal.title.as_str()), inner);

  let content_pane =
    pane("Entry", app).border_style(field_style(app, JournalField::Content));
  let inner = content_pane.inner(rows[1]);
  f.render_widget(content_pane, rows[1]);
  f.render_widget(
    Paragraph::new(app.journal.content.as_str()).wrap(Wrap { trim: false }),
    inner,
  );

  let prayer_pane = pane("Prayer request", app)
    .border_style(field_style(app, JournalField::Prayer));
  let inner = prayer_pane.inner(rows[2]);
  f.render_widget(prayer_pane, rows[2]);
  f.render_widget(Paragraph::new(app.journal.prayer.as_str()), inner);

  let mood = app
    .journal
    .mood
    .map(|m| m.label())
    .unwrap_or("none (^N to cycle)");
  let mut lines = vec![Line::from(vec![
    Span::styled("Mood: ", Style::default().fg(app.theme.dim())),
    Span::styled(mood, Style::default().fg(app.theme.accent())),
    Span::styled(
      format!("   Verses: {}", app.journal.related_verses.join(", ")),
      Style::default().fg(app.theme.dim()),
    ),
  ])];

  if app.journal.suggesting {
    lines.push(Line::from(Span::styled(
      "Finding a verse for you…",
      Style::default().fg(app.theme.dim()),
    )));
  } else if let Some(suggestion) = &app.journal.suggestion {
    lines.push(Line::from(vec![
      Span::styled(
        format!("{} — ", suggestion.reference),
        Style::default()
          .fg(app.theme.accent())
          .add_modifier(Modifier::BOLD),
      ),
      Span::raw(format!("\"{}\" (^A to attach)", suggestion.verse)),
    ]));
  }

  f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), rows[3]);
}
