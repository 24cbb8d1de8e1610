//! Hierarchical resource identifiers and the values, selections and batch
//! operations addressed to them.
//!
//! A [`Resource`] is parsed from a path exactly once, at the boundary; every
//! handler downstream receives the typed movie id or page number.
//!
//! | Path                          | Resource                        |
//! |-------------------------------|---------------------------------|
//! | `favorites`                   | [`Resource::Favorites`]         |
//! | `favorites/{id}`              | [`Resource::Favorite`]          |
//! | `favorites/{id}/cast`         | [`Resource::FavoriteCast`]      |
//! | `favorites/{id}/reviews`      | [`Resource::FavoriteReviews`]   |
//! | `favorites/{id}/trailers`     | [`Resource::FavoriteTrailers`]  |
//! | `favorites/{id}/cast/{row}`   | [`Resource::CastEntry`]         |
//! | `favorites/{id}/reviews/{row}`| [`Resource::ReviewEntry`]       |
//! | `favorites/{id}/trailers/{row}`| [`Resource::TrailerEntry`]     |
//! | `popular/{page}`              | [`Resource::Listing`]           |
//! | `top_rated/{page}`            | [`Resource::Listing`]           |

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{
  Error,
  movie::{CastMember, Movie, MovieChanges, MovieId, MovieSummary, Review, RowId, Trailer},
};

const FAVORITES: &str = "favorites";
const CAST: &str = "cast";
const REVIEWS: &str = "reviews";
const TRAILERS: &str = "trailers";

// ─── Sort order ──────────────────────────────────────────────────────────────

/// A remote listing order. Each maps to a catalogue endpoint of the same name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
  Popular,
  TopRated,
}

impl SortOrder {
  pub fn as_path(self) -> &'static str {
    match self {
      SortOrder::Popular => "popular",
      SortOrder::TopRated => "top_rated",
    }
  }
}

impl fmt::Display for SortOrder {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_path()) }
}

impl FromStr for SortOrder {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "popular" => Ok(SortOrder::Popular),
      "top_rated" => Ok(SortOrder::TopRated),
      other => Err(Error::UnknownSortOrder(other.to_owned())),
    }
  }
}

// ─── Resource ────────────────────────────────────────────────────────────────

/// An addressable table, row or collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
  Favorites,
  Favorite(MovieId),
  FavoriteCast(MovieId),
  FavoriteReviews(MovieId),
  FavoriteTrailers(MovieId),
  /// A single cast row, as returned from an insert.
  CastEntry(MovieId, RowId),
  ReviewEntry(MovieId, RowId),
  TrailerEntry(MovieId, RowId),
  /// A remote-backed listing page. Pages start at 1.
  Listing { order: SortOrder, page: u32 },
}

impl Resource {
  pub fn favorite(id: MovieId) -> Self { Resource::Favorite(id) }

  pub fn favorite_cast(id: MovieId) -> Self { Resource::FavoriteCast(id) }

  pub fn favorite_reviews(id: MovieId) -> Self { Resource::FavoriteReviews(id) }

  pub fn favorite_trailers(id: MovieId) -> Self { Resource::FavoriteTrailers(id) }

  pub fn listing(order: SortOrder, page: u32) -> Self { Resource::Listing { order, page } }
}

impl fmt::Display for Resource {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Resource::Favorites => write!(f, "{FAVORITES}"),
      Resource::Favorite(id) => write!(f, "{FAVORITES}/{id}"),
      Resource::FavoriteCast(id) => write!(f, "{FAVORITES}/{id}/{CAST}"),
      Resource::FavoriteReviews(id) => write!(f, "{FAVORITES}/{id}/{REVIEWS}"),
      Resource::FavoriteTrailers(id) => write!(f, "{FAVORITES}/{id}/{TRAILERS}"),
      Resource::CastEntry(id, row) => write!(f, "{FAVORITES}/{id}/{CAST}/{row}"),
      Resource::ReviewEntry(id, row) => write!(f, "{FAVORITES}/{id}/{REVIEWS}/{row}"),
      Resource::TrailerEntry(id, row) => write!(f, "{FAVORITES}/{id}/{TRAILERS}/{row}"),
      Resource::Listing { order, page } => write!(f, "{order}/{page}"),
    }
  }
}

impl FromStr for Resource {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let unknown = || Error::UnknownResource(s.to_owned());
    let segments: Vec<&str> = s.trim_matches('/').split('/').collect();

    match segments.as_slice() {
      [FAVORITES] => Ok(Resource::Favorites),
      [FAVORITES, id] => Ok(Resource::Favorite(id.parse()?)),
      [FAVORITES, id, child] => {
        let id: MovieId = id.parse()?;
        match *child {
          CAST => Ok(Resource::FavoriteCast(id)),
          REVIEWS => Ok(Resource::FavoriteReviews(id)),
          TRAILERS => Ok(Resource::FavoriteTrailers(id)),
          _ => Err(unknown()),
        }
      }
      [FAVORITES, id, child, row] => {
        let id: MovieId = id.parse()?;
        let row = parse_row_id(row).ok_or_else(unknown)?;
        match *child {
          CAST => Ok(Resource::CastEntry(id, row)),
          REVIEWS => Ok(Resource::ReviewEntry(id, row)),
          TRAILERS => Ok(Resource::TrailerEntry(id, row)),
          _ => Err(unknown()),
        }
      }
      [order, page] => {
        let order: SortOrder = order.parse().map_err(|_| unknown())?;
        Ok(Resource::Listing { order, page: parse_page(page)? })
      }
      _ => Err(unknown()),
    }
  }
}

fn parse_page(s: &str) -> Result<u32, Error> {
  if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
    return Err(Error::InvalidPage(s.to_owned()));
  }
  match s.parse::<u32>() {
    Ok(page) if page >= 1 => Ok(page),
    _ => Err(Error::InvalidPage(s.to_owned())),
  }
}

fn parse_row_id(s: &str) -> Option<RowId> {
  if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
    return None;
  }
  s.parse().ok()
}

// ─── Values ──────────────────────────────────────────────────────────────────

/// One row's worth of column values for an insert.
///
/// Child rows carry no movie id of their own: the owning movie is the one
/// named by the resource they are inserted into.
#[derive(Debug, Clone, PartialEq)]
pub enum Values {
  Movie(Movie),
  Cast(CastMember),
  Review(Review),
  Trailer(Trailer),
  Summary(MovieSummary),
}

impl Values {
  pub fn kind(&self) -> &'static str {
    match self {
      Values::Movie(_) => "movie",
      Values::Cast(_) => "cast member",
      Values::Review(_) => "review",
      Values::Trailer(_) => "trailer",
      Values::Summary(_) => "movie summary",
    }
  }
}

// ─── Selection ───────────────────────────────────────────────────────────────

/// Row ordering for reads. Rows are ordered by their store-assigned row id.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RowOrder {
  #[default]
  Inserted,
  NewestFirst,
}

/// Filter and sort for a query.
///
/// `movie_id` only narrows collection resources (`favorites`, listing
/// pages). Child collections are always filtered by the id in their path.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Selection {
  pub movie_id: Option<MovieId>,
  pub order:    RowOrder,
}

impl Selection {
  pub fn all() -> Self { Self::default() }

  pub fn movie(id: MovieId) -> Self { Self { movie_id: Some(id), ..Self::default() } }

  pub fn newest_first(mut self) -> Self {
    self.order = RowOrder::NewestFirst;
    self
  }
}

// ─── Query results ───────────────────────────────────────────────────────────

/// A stored value together with its row id.
#[derive(Debug, Clone, PartialEq)]
pub struct Row<T> {
  pub row_id: RowId,
  pub value:  T,
}

/// Rows read back from one table.
#[derive(Debug, Clone, PartialEq)]
pub enum Rows {
  Movies(Vec<Row<Movie>>),
  Cast(Vec<Row<CastMember>>),
  Reviews(Vec<Row<Review>>),
  Trailers(Vec<Row<Trailer>>),
  Listing(Vec<Row<MovieSummary>>),
}

fn values<T>(rows: Vec<Row<T>>) -> Vec<T> { rows.into_iter().map(|r| r.value).collect() }

impl Rows {
  pub fn len(&self) -> usize {
    match self {
      Rows::Movies(r) => r.len(),
      Rows::Cast(r) => r.len(),
      Rows::Reviews(r) => r.len(),
      Rows::Trailers(r) => r.len(),
      Rows::Listing(r) => r.len(),
    }
  }

  pub fn is_empty(&self) -> bool { self.len() == 0 }

  pub fn into_movies(self) -> Option<Vec<Movie>> {
    match self {
      Rows::Movies(r) => Some(values(r)),
      _ => None,
    }
  }

  pub fn into_cast(self) -> Option<Vec<CastMember>> {
    match self {
      Rows::Cast(r) => Some(values(r)),
      _ => None,
    }
  }

  pub fn into_reviews(self) -> Option<Vec<Review>> {
    match self {
      Rows::Reviews(r) => Some(values(r)),
      _ => None,
    }
  }

  pub fn into_trailers(self) -> Option<Vec<Trailer>> {
    match self {
      Rows::Trailers(r) => Some(values(r)),
      _ => None,
    }
  }

  pub fn into_summaries(self) -> Option<Vec<MovieSummary>> {
    match self {
      Rows::Listing(r) => Some(values(r)),
      _ => None,
    }
  }
}

// ─── Batch operations ────────────────────────────────────────────────────────

/// One step of an atomic batch.
#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
  Insert { resource: Resource, values: Values },
  Update { resource: Resource, changes: MovieChanges },
  Delete { resource: Resource },
}

impl Operation {
  pub fn insert(resource: Resource, values: Values) -> Self {
    Operation::Insert { resource, values }
  }

  pub fn update(resource: Resource, changes: MovieChanges) -> Self {
    Operation::Update { resource, changes }
  }

  pub fn delete(resource: Resource) -> Self { Operation::Delete { resource } }

  pub fn resource(&self) -> Resource {
    match self {
      Operation::Insert { resource, .. }
      | Operation::Update { resource, .. }
      | Operation::Delete { resource } => *resource,
    }
  }
}

/// The result of one batch step, in the same position as its operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
  /// The identifier of the inserted row.
  Inserted(Resource),
  /// Rows changed by an update or removed by a delete.
  Affected(usize),
}
