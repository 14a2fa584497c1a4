//! Favorites screen: saved verses and saved sermons, filterable.

use ratatui::{
  Frame,
  layout::{Constraint, Direction, Layout, Rect},
  style::{Modifier, Style},
  text::{Line, Span},
  widgets::{List, ListItem, ListState, Paragraph},
};

use crate::{
  app::{App, FavoritesTab},
  ui::{input_line, pane},
};

pub fn draw(f: &mut Frame, area: Rect, app: &App) {
  let rows = Layout::default()
    .direction(Direction::Vertical)
    .constraints([Constraint::Length(1), Constraint::Min(0)])
    .split(area);

  let tab = match app.favorites.tab {
    FavoritesTab::Verses => format!(
      "[Verses {}] Sermons {}",
      app.collections.favorites.len(),
      app.collections.sermons.len()
    ),
    FavoritesTab::Sermons => format!(
      "Verses {} [Sermons {}]",
      app.collections.favorites.len(),
      app.collections.sermons.len()
    ),
  };
  input_line(
    f,
    rows[0],
    app,
    &format!("{tab} /"),
    &app.favorites.filter,
    app.favorites.filter_active,
  );

  match app.favorites.tab {
    FavoritesTab::Verses => draw_verses(f, rows[1], app),
    FavoritesTab::Sermons => draw_sermons(f, rows[1], app),
  }
}

fn draw_verses(f: &mut Frame, area: Rect, app: &App) {
  let favorites =
    app.collections.favorites.matching(&app.favorites.filter, None);

  let items: Vec<ListItem> = favorites
    .iter()
    .map(|fav| {
      let mut spans = vec![
        Span::styled(
          format!("{} ", fav.verse_reference),
          Style::default()
            .fg(app.theme.accent())
            .add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!("\"{}\"", fav.verse_text)),
      ];
      if let Some(category) = &fav.category {
        spans.push(Span::styled(
          format!("  #{category}"),
          Style::default().fg(app.theme.dim()),
        ));
      }
      if fav.personal_note.is_some() {
        spans.push(Span::styled(
          "  ✎",
          Style::default().fg(app.theme.dim()),
        ));
      }
      ListItem::new(Line::from(spans))
    })
    .collect();

  render_list(f, area, app, "Saved verses", items, favorites.len());
}

fn draw_sermons(f: &mut Frame, area: Rect, app: &App) {
  let sermons = app.collections.sermons.matching(&app.favorites.filter);

  let items: Vec<ListItem> = sermons
    .iter()
    .map(|s| {
      let byline = s
        .preacher
        .as_deref()
        .map(|p| format!(" — {p}"))
        .unwrap_or_default();
      ListItem::new(Line::from(vec![
        Span::styled(
          s.title.clone(),
          Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::styled(byline, Style::default().fg(app.theme.dim())),
      ]))
    })
    .collect();

  render_list(f, area, app, "Saved sermons", items, sermons.len());
}

fn render_list(
  f: &mut Frame,
  area: Rect,
  app: &App,
  title: &str,
  items: Vec<ListItem>,
  len: usize,
) {
  let block = pane(title, app);
  let inner = block.inner(area);
  f.render_widget(block, area);

  if items.is_empty() {
    f.render_widget(
      Paragraph::new("Nothing saved yet")
        .style(Style::default().fg(app.theme.dim())),
      inner,
    );
    return;
  }

  let mut state = ListState::default();
  state.select(Some(app.favorites.cursor.min(len - 1)));
  f.render_stateful_widget(
    List::new(items).highlight_style(
      Style::default().add_modifier(Modifier::BOLD | Modifier::REVERSED),
    ),
    inner,
    &mut state,
  );
}
