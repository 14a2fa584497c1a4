//! Visual themes. The palette is intentionally tiny: a warm parchment look
//! and a muted dark one.

use ratatui::style::Color;
use serde::{Deserialize, Serialize};

#[derive(
  Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
  #[default]
  Warm,
  Midnight,
}

impl Theme {
  pub fn toggle(self) -> Self {
    match self {
      Self::Warm => Self::Midnight,
      Self::Midnight => Self::Warm,
    }
  }

  pub fn label(&self) -> &'static str {
    match self {
      Self::Warm => "warm",
      Self::Midnight => "midnight",
    }
  }

  /// Accent for titles, selections, and the active tab.
  pub fn accent(&self) -> Color {
    match self {
      Self::Warm => Color::Yellow,
      Self::Midnight => Color::Blue,
    }
  }

  /// Background for the header and status bars.
  pub fn bar_bg(&self) -> Color {
    match self {
      Self::Warm => Color::DarkGray,
      Self::Midnight => Color::Black,
    }
  }

  /// Dimmed foreground for secondary text.
  pub fn dim(&self) -> Color {
    Color::DarkGray
  }
}
