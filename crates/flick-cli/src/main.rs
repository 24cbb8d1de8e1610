//! `flick`: browse TMDB listings and keep favorites for offline use.
//!
//! # Usage
//!
//! ```text
//! flick popular --page 2
//! flick show 1891
//! flick favorite 1891
//! flick --offline favorites
//! flick --config ~/.config/flick/config.toml query favorites/1891/reviews
//! ```

mod commands;
mod settings;

use std::path::PathBuf;

use anyhow::Context as _;
use clap::Parser;
use commands::Command;
use flick_data::{DataAccess, NetworkStatus};
use flick_store_sqlite::SqliteStore;
use flick_tmdb::TmdbClient;
use settings::{AppConfig, expand_tilde};
use tokio::sync::broadcast::error::TryRecvError;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Movie listings with offline favorites")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,

  /// Never touch the network.
  #[arg(long)]
  offline: bool,

  /// Log at debug level, including every change a command made.
  #[arg(short, long)]
  verbose: bool,

  #[command(subcommand)]
  command: Command,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  let cli = Cli::parse();

  let level = if cli.verbose { LevelFilter::DEBUG } else { LevelFilter::INFO };
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy(),
    )
    .init();

  let cfg = AppConfig::load(&cli.config)?;

  let store_path = expand_tilde(&cfg.store_path);
  if let Some(parent) = store_path.parent()
    && !parent.as_os_str().is_empty()
  {
    std::fs::create_dir_all(parent)
      .with_context(|| format!("failed to create {}", parent.display()))?;
  }
  let store = SqliteStore::open(&store_path)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;

  let tmdb = TmdbClient::new(cfg.tmdb()).context("failed to build TMDB client")?;

  let network = if cli.offline || cfg.offline {
    NetworkStatus::offline()
  } else if cfg.api_key.trim().is_empty() {
    tracing::warn!("no TMDB api_key configured; running offline");
    NetworkStatus::offline()
  } else {
    NetworkStatus::online()
  };

  let data = DataAccess::new(store, tmdb, network);
  let mut changes = data.subscribe();

  commands::run(&data, cli.command).await?;

  loop {
    match changes.try_recv() {
      Ok(resource) => tracing::debug!(%resource, "changed"),
      Err(TryRecvError::Lagged(skipped)) => tracing::debug!(skipped, "changes dropped"),
      Err(TryRecvError::Empty | TryRecvError::Closed) => break,
    }
  }

  Ok(())
}
