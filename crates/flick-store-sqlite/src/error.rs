//! Error type for `flick-store-sqlite`.

use flick_core::{resource::Resource, store::Op};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database connection error: {0}")]
  Connection(#[from] tokio_rusqlite::Error),

  #[error("database error: {0}")]
  Sqlite(#[from] rusqlite::Error),

  /// A uniqueness, not-null or foreign-key constraint rejected a write.
  #[error("constraint violated writing {resource}: {source}")]
  Constraint {
    resource: Resource,
    source:   rusqlite::Error,
  },

  /// The insert reported no affected row.
  #[error("failed to insert a row into {0}")]
  InsertFailed(Resource),

  /// The resource does not support the operation. This is a caller bug.
  #[error("{op} is not supported on {resource}")]
  Unsupported { op: Op, resource: Resource },

  /// The values do not belong in the table behind the resource.
  #[error("cannot insert a {values} into {resource}")]
  WrongValues {
    resource: Resource,
    values:   &'static str,
  },

  #[error("schema migration from version {from} to {to} failed: {source}")]
  Migration {
    from:   i64,
    to:     i64,
    source: rusqlite::Error,
  },
}

impl Error {
  /// Classify a failed write against `resource`.
  pub(crate) fn on_write(resource: Resource) -> impl FnOnce(rusqlite::Error) -> Error {
    move |err| {
      let violated = matches!(
        &err,
        rusqlite::Error::SqliteFailure(e, _) if e.code == rusqlite::ErrorCode::ConstraintViolation
      );
      if violated {
        Error::Constraint { resource, source: err }
      } else {
        Error::Sqlite(err)
      }
    }
  }

  pub fn is_constraint(&self) -> bool { matches!(self, Error::Constraint { .. }) }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
