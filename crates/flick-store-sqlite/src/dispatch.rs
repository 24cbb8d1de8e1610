//! Resource dispatch: maps each [`Resource`] onto its table.
//!
//! Every function here is synchronous and runs on a connection (or open
//! transaction) inside a `tokio_rusqlite` call. Atomicity is the caller's
//! concern; see `store.rs`.

use flick_core::{
  movie::{MovieChanges, MovieId},
  resource::{Operation, Outcome, Resource, Rows, Selection, Values},
  store::Op,
};
use rusqlite::{Connection, params, params_from_iter, types::Value};

use crate::{
  Error, Result,
  encode::{
    CACHE_COLUMNS, CAST_COLUMNS, MOVIE_COLUMNS, REVIEW_COLUMNS, TRAILER_COLUMNS,
    cast_from_row, movie_from_row, order_sql, review_from_row, summary_from_row,
    trailer_from_row,
  },
};

fn unsupported(op: Op, resource: Resource) -> Error { Error::Unsupported { op, resource } }

// ─── Reads ───────────────────────────────────────────────────────────────────

pub fn query(conn: &Connection, resource: Resource, selection: Selection) -> Result<Rows> {
  let order = order_sql(selection.order);

  let rows = match resource {
    Resource::Favorites => Rows::Movies(select(
      conn,
      &format!("SELECT {MOVIE_COLUMNS} FROM favorite_movies"),
      selection.movie_id,
      order,
      movie_from_row,
    )?),
    Resource::FavoriteCast(id) => Rows::Cast(select(
      conn,
      &format!("SELECT {CAST_COLUMNS} FROM cast_members"),
      Some(id),
      order,
      cast_from_row,
    )?),
    Resource::FavoriteReviews(id) => Rows::Reviews(select(
      conn,
      &format!("SELECT {REVIEW_COLUMNS} FROM reviews"),
      Some(id),
      order,
      review_from_row,
    )?),
    Resource::FavoriteTrailers(id) => Rows::Trailers(select(
      conn,
      &format!("SELECT {TRAILER_COLUMNS} FROM trailers"),
      Some(id),
      order,
      trailer_from_row,
    )?),
    Resource::Listing { .. } => Rows::Listing(select(
      conn,
      &format!("SELECT {CACHE_COLUMNS} FROM api_cache"),
      selection.movie_id,
      order,
      summary_from_row,
    )?),
    Resource::Favorite(_)
    | Resource::CastEntry(..)
    | Resource::ReviewEntry(..)
    | Resource::TrailerEntry(..) => return Err(unsupported(Op::Query, resource)),
  };

  Ok(rows)
}

/// Run `base` with an optional `movie_id` filter and the given ordering.
fn select<T>(
  conn: &Connection,
  base: &str,
  movie_id: Option<MovieId>,
  order: &str,
  map: fn(&rusqlite::Row<'_>) -> rusqlite::Result<T>,
) -> Result<Vec<T>> {
  let rows = if let Some(id) = movie_id {
    let mut stmt = conn.prepare(&format!("{base} WHERE movie_id = ?1 {order}"))?;
    stmt
      .query_map(params![id.0], map)?
      .collect::<rusqlite::Result<Vec<_>>>()?
  } else {
    let mut stmt = conn.prepare(&format!("{base} {order}"))?;
    stmt.query_map([], map)?.collect::<rusqlite::Result<Vec<_>>>()?
  };
  Ok(rows)
}

// ─── Inserts ─────────────────────────────────────────────────────────────────

pub fn insert(conn: &Connection, resource: Resource, values: Values) -> Result<Resource> {
  let on_write = || Error::on_write(resource);

  let (changed, created) = match (resource, values) {
    (Resource::Favorites, Values::Movie(m)) => {
      // Replace: drop any previous row first so its children cascade away
      // before the new row's children arrive.
      conn
        .execute("DELETE FROM favorite_movies WHERE movie_id = ?1", params![m.id.0])
        .map_err(on_write())?;
      let changed = conn
        .execute(
          "INSERT INTO favorite_movies (
             movie_id, title, overview, poster_url, backdrop_url,
             user_rating, release_date, runtime
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
          params![
            m.id.0,
            m.title,
            m.overview,
            m.poster_url,
            m.backdrop_url,
            m.rating,
            m.release_date,
            m.runtime,
          ],
        )
        .map_err(on_write())?;
      (changed, Resource::Favorite(m.id))
    }
    (Resource::FavoriteCast(id), Values::Cast(c)) => {
      let changed = conn
        .execute(
          "INSERT INTO cast_members (movie_id, name, character_name, avatar_url)
           VALUES (?1, ?2, ?3, ?4)",
          params![id.0, c.name, c.character, c.avatar_url],
        )
        .map_err(on_write())?;
      (changed, Resource::CastEntry(id, conn.last_insert_rowid()))
    }
    (Resource::FavoriteReviews(id), Values::Review(r)) => {
      let changed = conn
        .execute(
          "INSERT INTO reviews (movie_id, author, content) VALUES (?1, ?2, ?3)",
          params![id.0, r.author, r.content],
        )
        .map_err(on_write())?;
      (changed, Resource::ReviewEntry(id, conn.last_insert_rowid()))
    }
    (Resource::FavoriteTrailers(id), Values::Trailer(t)) => {
      let changed = conn
        .execute(
          "INSERT INTO trailers (movie_id, title, video_id) VALUES (?1, ?2, ?3)",
          params![id.0, t.title, t.video_id],
        )
        .map_err(on_write())?;
      (changed, Resource::TrailerEntry(id, conn.last_insert_rowid()))
    }
    (
      Resource::Favorites
      | Resource::FavoriteCast(_)
      | Resource::FavoriteReviews(_)
      | Resource::FavoriteTrailers(_),
      other,
    ) => {
      return Err(Error::WrongValues { resource, values: other.kind() });
    }
    (Resource::Listing { .. }, _) => return Err(unsupported(Op::Insert, resource)),
    (
      Resource::Favorite(_)
      | Resource::CastEntry(..)
      | Resource::ReviewEntry(..)
      | Resource::TrailerEntry(..),
      _,
    ) => return Err(unsupported(Op::Insert, resource)),
  };

  if changed == 0 || conn.last_insert_rowid() <= 0 {
    return Err(Error::InsertFailed(resource));
  }
  tracing::debug!(%created, "inserted");
  Ok(created)
}

/// Insert listing-cache rows. Existing rows with the same movie id are
/// replaced by the table's conflict clause.
pub fn bulk_insert(conn: &Connection, resource: Resource, rows: Vec<Values>) -> Result<usize> {
  if !matches!(resource, Resource::Listing { .. }) {
    return Err(unsupported(Op::BulkInsert, resource));
  }

  let mut stmt = conn.prepare(
    "INSERT INTO api_cache (movie_id, title, poster_url, user_rating)
     VALUES (?1, ?2, ?3, ?4)",
  )?;

  let mut inserted = 0;
  for values in rows {
    let kind = values.kind();
    let Values::Summary(s) = values else {
      return Err(Error::WrongValues { resource, values: kind });
    };
    inserted += stmt
      .execute(params![s.id.0, s.title, s.poster_url, s.rating])
      .map_err(Error::on_write(resource))?;
  }
  Ok(inserted)
}

// ─── Updates ─────────────────────────────────────────────────────────────────

pub fn update(conn: &Connection, resource: Resource, changes: MovieChanges) -> Result<usize> {
  let Resource::Favorite(id) = resource else {
    return Err(unsupported(Op::Update, resource));
  };

  let MovieChanges {
    title,
    overview,
    poster_url,
    backdrop_url,
    rating,
    release_date,
    runtime,
  } = changes;

  let mut columns: Vec<&'static str> = Vec::new();
  let mut values: Vec<Value> = Vec::new();
  let mut set = |column: &'static str, value: Option<Value>| {
    if let Some(value) = value {
      columns.push(column);
      values.push(value);
    }
  };

  set("title", title.map(Value::Text));
  set("overview", overview.map(Value::Text));
  set("poster_url", poster_url.map(Value::Text));
  set("backdrop_url", backdrop_url.map(Value::Text));
  set("user_rating", rating.map(Value::Real));
  set("release_date", release_date.map(Value::Text));
  set("runtime", runtime.map(|r| Value::Integer(r.into())));

  if columns.is_empty() {
    return Ok(0);
  }

  let assignments = columns
    .iter()
    .enumerate()
    .map(|(i, column)| format!("{column} = ?{}", i + 1))
    .collect::<Vec<_>>()
    .join(", ");
  values.push(Value::Integer(id.0));
  let sql = format!(
    "UPDATE favorite_movies SET {assignments} WHERE movie_id = ?{}",
    values.len()
  );

  Ok(
    conn
      .execute(&sql, params_from_iter(values.iter()))
      .map_err(Error::on_write(resource))?,
  )
}

// ─── Deletes ─────────────────────────────────────────────────────────────────

pub fn delete(conn: &Connection, resource: Resource) -> Result<usize> {
  let deleted = match resource {
    // Children go with the movie through ON DELETE CASCADE.
    Resource::Favorite(id) => {
      conn.execute("DELETE FROM favorite_movies WHERE movie_id = ?1", params![id.0])
    }
    Resource::FavoriteCast(id) => {
      conn.execute("DELETE FROM cast_members WHERE movie_id = ?1", params![id.0])
    }
    Resource::FavoriteReviews(id) => {
      conn.execute("DELETE FROM reviews WHERE movie_id = ?1", params![id.0])
    }
    Resource::FavoriteTrailers(id) => {
      conn.execute("DELETE FROM trailers WHERE movie_id = ?1", params![id.0])
    }
    Resource::Listing { .. } => conn.execute("DELETE FROM api_cache", []),
    Resource::Favorites
    | Resource::CastEntry(..)
    | Resource::ReviewEntry(..)
    | Resource::TrailerEntry(..) => return Err(unsupported(Op::Delete, resource)),
  }
  .map_err(Error::on_write(resource))?;

  Ok(deleted)
}

// ─── Batches ─────────────────────────────────────────────────────────────────

pub fn apply(conn: &Connection, operation: Operation) -> Result<Outcome> {
  match operation {
    Operation::Insert { resource, values } => {
      insert(conn, resource, values).map(Outcome::Inserted)
    }
    Operation::Update { resource, changes } => {
      update(conn, resource, changes).map(Outcome::Affected)
    }
    Operation::Delete { resource } => delete(conn, resource).map(Outcome::Affected),
  }
}
