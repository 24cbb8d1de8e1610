//! Error type for `flick-data`.
//!
//! Catalogue failures never appear here: they are logged and turned into
//! "no data" by the façade.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("invalid resource: {0}")]
  Core(#[from] flick_core::Error),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  pub(crate) fn store<E>(err: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Error::Store(Box::new(err))
  }

  /// The underlying store error, if it is an `E`.
  pub fn store_error<E: std::error::Error + 'static>(&self) -> Option<&E> {
    match self {
      Error::Store(e) => e.downcast_ref(),
      Error::Core(_) => None,
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
