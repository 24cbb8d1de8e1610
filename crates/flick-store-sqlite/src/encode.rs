//! Mapping between SQLite rows and `flick-core` domain types.
//!
//! Each table has a fixed column list; the `*_COLUMNS` constants and the
//! matching `*_from_row` functions must stay in step.

use flick_core::{
  movie::{CastMember, Movie, MovieId, MovieSummary, Review, Trailer},
  resource::{Row, RowOrder},
};

pub const MOVIE_COLUMNS: &str =
  "_id, movie_id, title, overview, poster_url, backdrop_url, user_rating, release_date, runtime";

pub const CAST_COLUMNS: &str = "_id, name, character_name, avatar_url";

pub const REVIEW_COLUMNS: &str = "_id, author, content";

pub const TRAILER_COLUMNS: &str = "_id, title, video_id";

pub const CACHE_COLUMNS: &str = "_id, movie_id, title, poster_url, user_rating";

pub fn order_sql(order: RowOrder) -> &'static str {
  match order {
    RowOrder::Inserted => "ORDER BY _id ASC",
    RowOrder::NewestFirst => "ORDER BY _id DESC",
  }
}

pub fn movie_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Row<Movie>> {
  Ok(Row {
    row_id: row.get(0)?,
    value:  Movie {
      id:           MovieId(row.get(1)?),
      title:        row.get(2)?,
      overview:     row.get(3)?,
      poster_url:   row.get(4)?,
      backdrop_url: row.get(5)?,
      rating:       row.get(6)?,
      release_date: row.get(7)?,
      runtime:      row.get(8)?,
    },
  })
}

pub fn cast_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Row<CastMember>> {
  Ok(Row {
    row_id: row.get(0)?,
    value:  CastMember {
      name:       row.get(1)?,
      character:  row.get(2)?,
      avatar_url: row.get(3)?,
    },
  })
}

pub fn review_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Row<Review>> {
  Ok(Row {
    row_id: row.get(0)?,
    value:  Review { author: row.get(1)?, content: row.get(2)? },
  })
}

pub fn trailer_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Row<Trailer>> {
  Ok(Row {
    row_id: row.get(0)?,
    value:  Trailer { title: row.get(1)?, video_id: row.get(2)? },
  })
}

pub fn summary_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Row<MovieSummary>> {
  Ok(Row {
    row_id: row.get(0)?,
    value:  MovieSummary {
      id:         MovieId(row.get(1)?),
      title:      row.get(2)?,
      poster_url: row.get(3)?,
      rating:     row.get(4)?,
    },
  })
}
