//! Error types for `flick-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("unknown resource: {0:?}")]
  UnknownResource(String),

  #[error("invalid movie id: {0:?}")]
  InvalidMovieId(String),

  #[error("invalid page number: {0:?}")]
  InvalidPage(String),

  #[error("unknown sort order: {0:?}")]
  UnknownSortOrder(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
