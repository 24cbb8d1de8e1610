//! [`SqliteStore`]: the SQLite implementation of [`MovieStore`].

use std::path::Path;

use flick_core::{
  movie::MovieChanges,
  resource::{Operation, Outcome, Resource, Rows, Selection, Values},
  store::MovieStore,
};
use rusqlite::{Connection, OpenFlags, Transaction};

use crate::{Result, dispatch, schema};

// ─── Store ───────────────────────────────────────────────────────────────────

/// What a connection will be used for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Purpose {
  /// Reads only. The schema is not touched and writes fail.
  Read,
  /// Reads and writes. Foreign keys are enforced and the schema is brought
  /// up to date before the handle is returned.
  Write,
}

/// A movie store backed by a single SQLite file.
///
/// Cloning is cheap. The inner connection is reference-counted and every
/// clone funnels through the same connection thread, which serialises
/// writers.
#[derive(Clone)]
pub struct SqliteStore {
  conn:    tokio_rusqlite::Connection,
  purpose: Purpose,
}

impl SqliteStore {
  /// Open (or create) a writable store at `path`.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    Self::open_with(path, Purpose::Write).await
  }

  /// Open a store at `path` for the given purpose.
  pub async fn open_with(path: impl AsRef<Path>, purpose: Purpose) -> Result<Self> {
    let conn = match purpose {
      Purpose::Read => {
        let flags = OpenFlags::SQLITE_OPEN_READ_ONLY
          | OpenFlags::SQLITE_OPEN_URI
          | OpenFlags::SQLITE_OPEN_NO_MUTEX;
        tokio_rusqlite::Connection::open_with_flags(path, flags).await?
      }
      Purpose::Write => tokio_rusqlite::Connection::open(path).await?,
    };
    let store = Self { conn, purpose };
    store.prepare().await?;
    Ok(store)
  }

  /// Open a writable in-memory store, for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn, purpose: Purpose::Write };
    store.prepare().await?;
    Ok(store)
  }

  pub fn purpose(&self) -> Purpose { self.purpose }

  /// Close the connection, flushing the WAL. Other clones become unusable.
  pub async fn close(self) -> Result<()> {
    self.conn.close().await?;
    Ok(())
  }

  async fn prepare(&self) -> Result<()> {
    if self.purpose == Purpose::Read {
      return Ok(());
    }

    self
      .conn
      .call(|conn| {
        conn.pragma_update(None, "foreign_keys", true)?;
        let _mode: String =
          conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))?;
        Ok(schema::initialise(conn))
      })
      .await?
  }

  /// The schema version recorded in the database.
  pub async fn schema_version(&self) -> Result<i64> {
    self.read(|conn| schema::user_version(conn)).await
  }

  /// Destructively migrate from `from` to `to`: all tables are dropped,
  /// recreated empty, and `to` is recorded as the schema version.
  pub async fn migrate(&self, from: i64, to: i64) -> Result<()> {
    self
      .conn
      .call(move |conn| Ok(schema::migrate(conn, from, to)))
      .await?
  }

  /// Run `f` against the connection outside any explicit transaction.
  async fn read<T, F>(&self, f: F) -> Result<T>
  where
    F: FnOnce(&Connection) -> Result<T> + Send + 'static,
    T: Send + 'static,
  {
    self.conn.call(move |conn| Ok(f(conn))).await?
  }

  /// Run `f` inside a transaction that commits only if `f` succeeds.
  async fn write<T, F>(&self, f: F) -> Result<T>
  where
    F: FnOnce(&Transaction<'_>) -> Result<T> + Send + 'static,
    T: Send + 'static,
  {
    self
      .conn
      .call(move |conn| Ok(in_transaction(conn, f)))
      .await?
  }
}

fn in_transaction<T>(
  conn: &mut Connection,
  f: impl FnOnce(&Transaction<'_>) -> Result<T>,
) -> Result<T> {
  let tx = conn.transaction()?;
  // Dropping `tx` on the error path rolls it back.
  let out = f(&tx)?;
  tx.commit()?;
  Ok(out)
}

// ─── MovieStore impl ─────────────────────────────────────────────────────────

impl MovieStore for SqliteStore {
  type Error = crate::Error;

  async fn query(&self, resource: Resource, selection: Selection) -> Result<Rows> {
    self
      .read(move |conn| dispatch::query(conn, resource, selection))
      .await
  }

  async fn insert(&self, resource: Resource, values: Values) -> Result<Resource> {
    self
      .write(move |tx| dispatch::insert(tx, resource, values))
      .await
  }

  async fn bulk_insert(&self, resource: Resource, rows: Vec<Values>) -> Result<usize> {
    let count = rows.len();
    let inserted = self
      .write(move |tx| dispatch::bulk_insert(tx, resource, rows))
      .await?;
    tracing::debug!(%resource, inserted, of = count, "bulk insert");
    Ok(inserted)
  }

  async fn update(&self, resource: Resource, changes: MovieChanges) -> Result<usize> {
    self
      .write(move |tx| dispatch::update(tx, resource, changes))
      .await
  }

  async fn delete(&self, resource: Resource) -> Result<usize> {
    self.write(move |tx| dispatch::delete(tx, resource)).await
  }

  async fn apply_batch(&self, operations: Vec<Operation>) -> Result<Vec<Outcome>> {
    let count = operations.len();
    let outcomes = self
      .write(move |tx| {
        operations
          .into_iter()
          .map(|op| dispatch::apply(tx, op))
          .collect::<Result<Vec<_>>>()
      })
      .await?;
    tracing::debug!(operations = count, "batch committed");
    Ok(outcomes)
  }
}
