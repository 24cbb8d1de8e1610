//! SQL schema for the flick SQLite store.
//!
//! The schema version lives in `PRAGMA user_version`. A database written under
//! any other version is migrated destructively: every table is dropped and
//! recreated. Favorites and the listing cache can both be fetched again from
//! the remote catalogue.

use rusqlite::Connection;

use crate::{Error, Result};

/// Version of [`CREATE_TABLES`]. Bump on any DDL change.
pub const SCHEMA_VERSION: i64 = 1;

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const CREATE_TABLES: &str = "
-- Favorites. One row per catalogue movie id; a second insert replaces the
-- first.
CREATE TABLE IF NOT EXISTS favorite_movies (
    _id          INTEGER PRIMARY KEY AUTOINCREMENT,
    movie_id     INTEGER NOT NULL,
    title        TEXT    NOT NULL,
    overview     TEXT    NOT NULL,
    poster_url   TEXT    NOT NULL,
    backdrop_url TEXT    NOT NULL,
    user_rating  REAL    NOT NULL,
    release_date TEXT    NOT NULL,
    runtime      INTEGER NOT NULL,
    UNIQUE (movie_id) ON CONFLICT REPLACE
);

CREATE TABLE IF NOT EXISTS cast_members (
    _id            INTEGER PRIMARY KEY AUTOINCREMENT,
    movie_id       INTEGER NOT NULL,
    name           TEXT    NOT NULL,
    character_name TEXT    NOT NULL,
    avatar_url     TEXT    NOT NULL,
    FOREIGN KEY (movie_id) REFERENCES favorite_movies (movie_id) ON DELETE CASCADE
);

CREATE TABLE IF NOT EXISTS reviews (
    _id      INTEGER PRIMARY KEY AUTOINCREMENT,
    movie_id INTEGER NOT NULL,
    author   TEXT    NOT NULL,
    content  TEXT    NOT NULL,
    FOREIGN KEY (movie_id) REFERENCES favorite_movies (movie_id) ON DELETE CASCADE
);

CREATE TABLE IF NOT EXISTS trailers (
    _id      INTEGER PRIMARY KEY AUTOINCREMENT,
    movie_id INTEGER NOT NULL,
    title    TEXT    NOT NULL,
    video_id TEXT    NOT NULL,
    FOREIGN KEY (movie_id) REFERENCES favorite_movies (movie_id) ON DELETE CASCADE
);

-- Listing cache. Not part of the cascade graph.
CREATE TABLE IF NOT EXISTS api_cache (
    _id         INTEGER PRIMARY KEY AUTOINCREMENT,
    movie_id    INTEGER NOT NULL,
    title       TEXT    NOT NULL,
    poster_url  TEXT    NOT NULL,
    user_rating REAL    NOT NULL,
    UNIQUE (movie_id) ON CONFLICT REPLACE
);

CREATE INDEX IF NOT EXISTS cast_members_movie_idx ON cast_members (movie_id);
CREATE INDEX IF NOT EXISTS reviews_movie_idx      ON reviews (movie_id);
CREATE INDEX IF NOT EXISTS trailers_movie_idx     ON trailers (movie_id);
";

/// Children before parents.
pub const DROP_TABLES: &str = "
DROP TABLE IF EXISTS api_cache;
DROP TABLE IF EXISTS trailers;
DROP TABLE IF EXISTS reviews;
DROP TABLE IF EXISTS cast_members;
DROP TABLE IF EXISTS favorite_movies;
";

pub fn user_version(conn: &Connection) -> Result<i64> {
  Ok(conn.pragma_query_value(None, "user_version", |row| row.get(0))?)
}

/// Bring a writable connection up to [`SCHEMA_VERSION`].
///
/// A fresh database (version 0) is created in place; any other mismatch is
/// migrated destructively.
pub fn initialise(conn: &mut Connection) -> Result<()> {
  let version = user_version(conn)?;

  if version == SCHEMA_VERSION {
    conn.execute_batch(CREATE_TABLES)?;
  } else if version == 0 {
    let tx = conn.transaction()?;
    tx.execute_batch(CREATE_TABLES)?;
    tx.pragma_update(None, "user_version", SCHEMA_VERSION)?;
    tx.commit()?;
    tracing::debug!(version = SCHEMA_VERSION, "created schema");
  } else {
    migrate(conn, version, SCHEMA_VERSION)?;
  }
  Ok(())
}

/// Drop all five tables and recreate them, recording `to` as the new version.
pub fn migrate(conn: &mut Connection, from: i64, to: i64) -> Result<()> {
  tracing::info!(from, to, "migrating schema; cached and favorite data is discarded");

  let tx = conn.transaction()?;
  tx.execute_batch(DROP_TABLES)?;
  tx.execute_batch(CREATE_TABLES)
    .map_err(|source| Error::Migration { from, to, source })?;
  tx.pragma_update(None, "user_version", to)?;
  tx.commit()?;
  Ok(())
}
