//! Movie entities as they travel between the remote catalogue, the store and
//! callers.
//!
//! Image fields hold fully composed URLs; composition from the catalogue's
//! relative paths happens once, in the response parser.

use std::{fmt, str::FromStr};

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::Error;

const YOUTUBE_WATCH_URL: &str = "https://www.youtube.com/watch?v=";
const YOUTUBE_THUMBNAIL_URL: &str = "https://i.ytimg.com/vi";

// ─── Identifiers ─────────────────────────────────────────────────────────────

/// The catalogue's own identifier for a movie (its business id).
///
/// Distinct from the store's auto-incremented [`RowId`].
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct MovieId(pub i64);

impl fmt::Display for MovieId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { fmt::Display::fmt(&self.0, f) }
}

impl FromStr for MovieId {
  type Err = Error;

  /// Accepts only a non-empty run of ASCII digits, like a path segment.
  fn from_str(s: &str) -> Result<Self, Self::Err> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
      return Err(Error::InvalidMovieId(s.to_owned()));
    }
    s.parse()
      .map(MovieId)
      .map_err(|_| Error::InvalidMovieId(s.to_owned()))
  }
}

/// Internal auto-incremented row identifier assigned by the store.
pub type RowId = i64;

// ─── Listing ─────────────────────────────────────────────────────────────────

/// The fields of a movie needed to draw it in a grid.
///
/// This is also the shape of a listing-cache row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieSummary {
  pub id:         MovieId,
  pub title:      String,
  pub poster_url: String,
  pub rating:     f64,
}

// ─── Detail ──────────────────────────────────────────────────────────────────

/// Full movie detail; the shape of a favorites row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
  pub id:           MovieId,
  pub title:        String,
  pub overview:     String,
  pub poster_url:   String,
  pub backdrop_url: String,
  pub rating:       f64,
  /// `YYYY-MM-DD` as issued by the catalogue; may be empty.
  pub release_date: String,
  /// Runtime in minutes; zero when unknown.
  pub runtime:      u32,
}

impl Movie {
  pub fn summary(&self) -> MovieSummary {
    MovieSummary {
      id:         self.id,
      title:      self.title.clone(),
      poster_url: self.poster_url.clone(),
      rating:     self.rating,
    }
  }

  /// The year component of `release_date`, if it parses.
  pub fn release_year(&self) -> Option<i32> {
    NaiveDate::parse_from_str(&self.release_date, "%Y-%m-%d")
      .ok()
      .map(|d| d.year())
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CastMember {
  pub name:       String,
  pub character:  String,
  pub avatar_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Review {
  pub author:  String,
  pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trailer {
  pub title:    String,
  /// External (YouTube) video identifier.
  pub video_id: String,
}

impl Trailer {
  pub fn watch_url(&self) -> String { format!("{YOUTUBE_WATCH_URL}{}", self.video_id) }

  pub fn thumbnail_url(&self) -> String {
    format!("{YOUTUBE_THUMBNAIL_URL}/{}/hqdefault.jpg", self.video_id)
  }
}

/// A movie together with its related lists, as shown on a detail screen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieDetail {
  pub movie:       Movie,
  pub cast:        Vec<CastMember>,
  pub reviews:     Vec<Review>,
  pub trailers:    Vec<Trailer>,
  pub is_favorite: bool,
}

// ─── Updates ─────────────────────────────────────────────────────────────────

/// Column changes for an existing favorites row. `None` leaves a column as is.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MovieChanges {
  pub title:        Option<String>,
  pub overview:     Option<String>,
  pub poster_url:   Option<String>,
  pub backdrop_url: Option<String>,
  pub rating:       Option<f64>,
  pub release_date: Option<String>,
  pub runtime:      Option<u32>,
}

impl MovieChanges {
  /// The fields a favorite picks up from a fresh fetch: artwork and rating.
  ///
  /// Title, overview, release date and runtime are kept as first saved.
  pub fn refresh_from(movie: &Movie) -> Self {
    Self {
      poster_url: Some(movie.poster_url.clone()),
      backdrop_url: Some(movie.backdrop_url.clone()),
      rating: Some(movie.rating),
      ..Self::default()
    }
  }

  pub fn is_empty(&self) -> bool { *self == Self::default() }
}
