//! Runtime settings: an optional TOML file under `FLICK_*` variables.

use std::{
  path::{Path, PathBuf},
  time::Duration,
};

use anyhow::Context as _;
use flick_tmdb::TmdbConfig;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
  /// SQLite database file. A leading `~/` is expanded.
  #[serde(default = "default_store_path")]
  pub store_path:     PathBuf,
  /// TMDB v3 API key. Without one, flick runs offline.
  #[serde(default)]
  pub api_key:        String,
  #[serde(default = "default_api_base_url")]
  pub api_base_url:   String,
  #[serde(default = "default_image_base_url")]
  pub image_base_url: String,
  #[serde(default = "default_timeout_secs")]
  pub timeout_secs:   u64,
  #[serde(default)]
  pub offline:        bool,
}

fn default_store_path() -> PathBuf { PathBuf::from("~/.local/share/flick/flick.db") }

fn default_api_base_url() -> String { "https://api.themoviedb.org/3".to_owned() }

fn default_image_base_url() -> String { "https://image.tmdb.org/t/p".to_owned() }

fn default_timeout_secs() -> u64 { 30 }

impl AppConfig {
  pub fn load(path: &Path) -> anyhow::Result<Self> {
    config::Config::builder()
      .add_source(config::File::from(path).required(false))
      .add_source(config::Environment::with_prefix("FLICK"))
      .build()
      .with_context(|| format!("failed to read config file {}", path.display()))?
      .try_deserialize()
      .context("failed to deserialise AppConfig")
  }

  pub fn tmdb(&self) -> TmdbConfig {
    TmdbConfig {
      api_key:        self.api_key.clone(),
      api_base_url:   self.api_base_url.clone(),
      image_base_url: self.image_base_url.clone(),
      timeout:        Duration::from_secs(self.timeout_secs),
    }
  }
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if s == "~"
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home);
  }
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
