//! Local preferences — the one piece of state that lives on this machine
//! instead of in the entity store.

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::theme::Theme;

/// Shape of `prefs.toml`. Everything defaults so a missing or partial file
/// never blocks startup.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Preferences {
  #[serde(default)]
  pub theme: Theme,
}

impl Preferences {
  /// Default on-disk location.
  pub fn default_path() -> PathBuf {
    expand_tilde(Path::new("~/.config/innerlight/prefs.toml"))
  }

  /// Read preferences, falling back to defaults on any problem. A corrupt
  /// prefs file should never keep the app from starting.
  pub fn load(path: &Path) -> Self {
    match std::fs::read_to_string(path) {
      Ok(raw) => toml::from_str(&raw).unwrap_or_else(|e| {
        warn!(path = %path.display(), error = %e, "ignoring corrupt prefs");
        Self::default()
      }),
      Err(_) => Self::default(),
    }
  }

  /// Persist preferences, creating the parent directory if needed.
  pub fn save(&self, path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
      std::fs::create_dir_all(parent)
        .with_context(|| format!("creating {}", parent.display()))?;
    }
    let raw = toml::to_string_pretty(self).context("encoding prefs")?;
    std::fs::write(path, raw)
      .with_context(|| format!("writing {}", path.display()))
  }
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn missing_file_yields_defaults() {
    let prefs =
      Preferences::load(Path::new("/nonexistent/innerlight/prefs.toml"));
    assert_eq!(prefs.theme, Theme::Warm);
  }

  #[test]
  fn save_and_reload() {
    let dir = std::env::temp_dir()
      .join(format!("innerlight-prefs-{}", std::process::id()));
    let path = dir.join("prefs.toml");

    let prefs = Preferences { theme: Theme::Midnight };
    prefs.save(&path).unwrap();
    assert_eq!(Preferences::load(&path).theme, Theme::Midnight);

    std::fs::remove_dir_all(&dir).unwrap();
  }
}
