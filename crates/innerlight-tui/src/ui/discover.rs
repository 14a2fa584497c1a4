//! Home, guidance, and sermon screens — the generated-content surfaces.

use ratatui::{
  Frame,
  layout::{Constraint, Direction, Layout, Rect},
  style::{Modifier, Style},
  text::{Line, Span},
  widgets::{List, ListItem, ListState, Paragraph, Wrap},
};

use crate::{
  app::{App, LIFE_SITUATIONS, SermonFilter},
  ui::{input_line, pane},
};

// ─── Home ─────────────────────────────────────────────────────────────────────

pub fn draw_home(f: &mut Frame, area: Rect, app: &App) {
  let block = pane("Daily Reflection Verse", app);
  let inner = block.inner(area);
  f.render_widget(block, area);

  let mut lines = vec![Line::from("")];
  if app.home.loading {
    lines.push(Line::from(Span::styled(
      "Choosing a verse…",
      Style::default().fg(app.theme.dim()),
    )));
  } else {
    lines.push(Line::from(Span::styled(
      format!("\"{}\"", app.home.daily.verse),
      Style::default().add_modifier(Modifier::ITALIC),
    )));
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
      format!("— {}", app.home.daily.reference),
      Style::default()
        .fg(app.theme.accent())
        .add_modifier(Modifier::BOLD),
    )));
  }
  lines.push(Line::from(""));
  lines.push(Line::from(Span::styled(
    "r for a new verse, f to save it to favorites",
    Style::default().fg(app.theme.dim()),
  )));

  f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
}

// ─── Guidance ─────────────────────────────────────────────────────────────────

pub fn draw_guidance(f: &mut Frame, area: Rect, app: &App) {
  let rows = Layout::default()
    .direction(Direction::Vertical)
    .constraints([Constraint::Length(1), Constraint::Min(0)])
    .split(area);

  input_line(
    f,
    rows[0],
    app,
    "ask: ",
    &app.guidance.query,
    app.guidance.input_active,
  );

  if app.guidance.loading {
    let block = pane("Guidance", app);
    let inner = block.inner(rows[1]);
    f.render_widget(block, rows[1]);
    f.render_widget(
      Paragraph::new("Searching for verses that speak to your heart…")
        .style(Style::default().fg(app.theme.dim())),
      inner,
    );
    return;
  }

  match &app.guidance.plan {
    Some(plan) => draw_guidance_plan(f, rows[1], app, plan),
    None => draw_topics(f, rows[1], app),
  }
}

fn draw_topics(f: &mut Frame, area: Rect, app: &App) {
  let items: Vec<ListItem> = LIFE_SITUATIONS
    .iter()
    .map(|s| ListItem::new(s.label))
    .collect();

  let block = pane("Whatever you're facing", app);
  let inner = block.inner(area);
  f.render_widget(block, area);

  let mut state = ListState::default();
  state.select(Some(app.guidance.topic_cursor));
  f.render_stateful_widget(
    List::new(items).highlight_style(
      Style::default().add_modifier(Modifier::BOLD | Modifier::REVERSED),
    ),
    inner,
    &mut state,
  );
}

fn draw_guidance_plan(
  f: &mut Frame,
  area: Rect,
  app: &App,
  plan: &innerlight_core::content::GuidancePlan,
) {
  let rows = Layout::default()
    .direction(Direction::Vertical)
    .constraints([Constraint::Length(4), Constraint::Min(0)])
    .split(area);

  let header = pane(&plan.topic_summary, app);
  let inner = header.inner(rows[0]);
  f.render_widget(header, rows[0]);
  f.render_widget(
    Paragraph::new(plan.encouragement.as_str()).wrap(Wrap { trim: true }),
    inner,
  );

  let items: Vec<ListItem> = plan
    .verses
    .iter()
    .enumerate()
    .map(|(i, verse)| {
      let mut lines = vec![Line::from(vec![
        Span::styled(
          format!("{} ", verse.reference),
          Style::default()
            .fg(app.theme.accent())
            .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
          if app.collections.favorites.contains_reference(&verse.reference)
          {
            "♥"
          } else {
            ""
          },
          Style::default(),
        ),
      ])];
      lines.push(Line::from(format!("\"{}\"", verse.text)));
      // Insights only for the selected verse, to keep the list scannable.
      if i == app.guidance.verse_cursor {
        if let Some(application) = &verse.application {
          lines.push(Line::from(Span::styled(
            application.clone(),
            Style::default().fg(app.theme.dim()),
          )));
        }
        if let Some(question) = &verse.reflection_question {
          lines.push(Line::from(Span::styled(
            format!("Reflect: {question}"),
            Style::default().fg(app.theme.accent()),
          )));
        }
      }
      lines.push(Line::from(""));
      ListItem::new(lines)
    })
    .collect();

  let block = pane(&format!("Verses ({})", plan.verses.len()), app);
  let inner = block.inner(rows[1]);
  f.render_widget(block, rows[1]);

  let mut state = ListState::default();
  state.select(if plan.verses.is_empty() {
    None
  } else {
    Some(app.guidance.verse_cursor)
  });
  f.render_stateful_widget(List::new(items), inner, &mut state);
}

// ─── Sermons ──────────────────────────────────────────────────────────────────

pub fn draw_sermons(f: &mut Frame, area: Rect, app: &App) {
  let rows = Layout::default()
    .direction(Direction::Vertical)
    .constraints([Constraint::Length(1), Constraint::Min(0)])
    .split(area);

  let filter = match app.sermons.filter {
    SermonFilter::All => "all",
    SermonFilter::Live => "live",
    SermonFilter::Local => "local",
  };
  input_line(
    f,
    rows[0],
    app,
    &format!("[{filter}] search: "),
    &app.sermons.topic,
    app.sermons.input_active,
  );

  let block = pane("Sermons", app);
  let inner = block.inner(rows[1]);
  f.render_widget(block, rows[1]);

  if app.sermons.loading {
    f.render_widget(
      Paragraph::new("Finding sermons…")
        .style(Style::default().fg(app.theme.dim())),
      inner,
    );
    return;
  }

  let visible = app.sermons.visible();
  if visible.is_empty() {
    f.render_widget(
      Paragraph::new("No sermons found. Press / to search.")
        .style(Style::default().fg(app.theme.dim())),
      inner,
    );
    return;
  }

  let items: Vec<ListItem> = visible
    .iter()
    .map(|s| {
      let mut tags = String::new();
      if s.is_live {
        tags.push_str(" [LIVE]");
      }
      if s.is_local {
        tags.push_str(" [local]");
      }
      let saved = app.collections.sermons.contains_title(&s.title);

      let mut lines = vec![Line::from(vec![
        Span::styled(
          s.title.clone(),
          Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::styled(tags, Style::default().fg(app.theme.accent())),
        Span::styled(
          if saved { "  (saved)" } else { "" },
          Style::default().fg(app.theme.dim()),
        ),
      ])];

      let mut detail = Vec::new();
      if let Some(preacher) = &s.preacher {
        detail.push(preacher.clone());
      }
      if let Some(church) = &s.church {
        detail.push(church.clone());
      }
      if let Some(reference) = &s.verse_reference {
        detail.push(reference.clone());
      }
      if !detail.is_empty() {
        lines.push(Line::from(Span::styled(
          detail.join(" · "),
          Style::default().fg(app.theme.dim()),
        )));
      }
      lines.push(Line::from(""));
      ListItem::new(lines)
    })
    .collect();

  let mut state = ListState::default();
  state.select(Some(app.sermons.cursor.min(visible.len() - 1)));
  f.render_stateful_widget(List::new(items), inner, &mut state);
}
