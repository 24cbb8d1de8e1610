//! Error type for `flick-tmdb`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("request failed: {0}")]
  Transport(#[from] reqwest::Error),

  #[error("server responded with status {0}")]
  Status(u16),

  #[error("unexpected response body: {0}")]
  Parse(#[from] serde_json::Error),

  #[error("invalid endpoint url {url:?}: {reason}")]
  Url { url: String, reason: String },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
