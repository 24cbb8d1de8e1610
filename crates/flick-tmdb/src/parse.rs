//! TMDB response bodies and their conversion into `flick-core` types.
//!
//! TMDB returns image paths relative to its image host (`/abc.jpg`). They are
//! composed here with a size segment, so nothing downstream ever sees a
//! relative path. A missing path becomes an empty string.

use flick_core::movie::{CastMember, Movie, MovieId, MovieSummary, Review, Trailer};
use serde::Deserialize;

use crate::Result;

const POSTER_SIZE: &str = "w185";
const BACKDROP_SIZE: &str = "w500";
const AVATAR_SIZE: &str = "w185";

// ─── Image URLs ──────────────────────────────────────────────────────────────

/// Composes image URLs against an image host such as
/// `https://image.tmdb.org/t/p`.
#[derive(Debug, Clone)]
pub struct Images {
  base: String,
}

impl Images {
  pub fn new(base: impl Into<String>) -> Self {
    let base = base.into().trim_end_matches('/').to_owned();
    Self { base }
  }

  pub fn poster(&self, path: Option<&str>) -> String { self.compose(POSTER_SIZE, path) }

  pub fn backdrop(&self, path: Option<&str>) -> String { self.compose(BACKDROP_SIZE, path) }

  pub fn avatar(&self, path: Option<&str>) -> String { self.compose(AVATAR_SIZE, path) }

  fn compose(&self, size: &str, path: Option<&str>) -> String {
    match path.map(|p| p.trim_start_matches('/')) {
      Some(p) if !p.is_empty() => format!("{}/{size}/{p}", self.base),
      _ => String::new(),
    }
  }
}

// ─── Wire shapes ─────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct ListingBody {
  results: Vec<ListingEntry>,
}

#[derive(Debug, Deserialize)]
struct ListingEntry {
  id:           i64,
  title:        String,
  poster_path:  Option<String>,
  #[serde(default)]
  vote_average: f64,
}

#[derive(Debug, Deserialize)]
struct MovieBody {
  id:            i64,
  title:         String,
  #[serde(default)]
  overview:      Option<String>,
  poster_path:   Option<String>,
  backdrop_path: Option<String>,
  #[serde(default)]
  vote_average:  f64,
  #[serde(default)]
  release_date:  Option<String>,
  #[serde(default)]
  runtime:       Option<u32>,
}

#[derive(Debug, Deserialize)]
struct CastsBody {
  #[serde(default)]
  cast: Vec<CastEntry>,
}

#[derive(Debug, Deserialize)]
struct CastEntry {
  name:         String,
  #[serde(default)]
  character:    Option<String>,
  profile_path: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ReviewsBody {
  results: Vec<ReviewEntry>,
}

#[derive(Debug, Deserialize)]
struct ReviewEntry {
  author:  String,
  content: String,
}

/// The legacy `trailers` endpoint groups videos by host; only YouTube is used.
#[derive(Debug, Deserialize)]
struct TrailersBody {
  #[serde(default)]
  youtube: Vec<TrailerEntry>,
}

#[derive(Debug, Deserialize)]
struct TrailerEntry {
  name:   String,
  source: String,
}

// ─── Parsers ─────────────────────────────────────────────────────────────────

/// A `movie/popular` or `movie/top_rated` page.
pub fn listing(body: &str, images: &Images) -> Result<Vec<MovieSummary>> {
  let body: ListingBody = serde_json::from_str(body)?;
  Ok(
    body
      .results
      .into_iter()
      .map(|m| MovieSummary {
        id:         MovieId(m.id),
        poster_url: images.poster(m.poster_path.as_deref()),
        title:      m.title,
        rating:     m.vote_average,
      })
      .collect(),
  )
}

/// A `movie/{id}` detail object. A null runtime becomes zero.
pub fn movie(body: &str, images: &Images) -> Result<Movie> {
  let m: MovieBody = serde_json::from_str(body)?;
  Ok(Movie {
    id:           MovieId(m.id),
    title:        m.title,
    overview:     m.overview.unwrap_or_default(),
    poster_url:   images.poster(m.poster_path.as_deref()),
    backdrop_url: images.backdrop(m.backdrop_path.as_deref()),
    rating:       m.vote_average,
    release_date: m.release_date.unwrap_or_default(),
    runtime:      m.runtime.unwrap_or(0),
  })
}

pub fn cast(body: &str, images: &Images) -> Result<Vec<CastMember>> {
  let body: CastsBody = serde_json::from_str(body)?;
  Ok(
    body
      .cast
      .into_iter()
      .map(|c| CastMember {
        avatar_url: images.avatar(c.profile_path.as_deref()),
        name:       c.name,
        character:  c.character.unwrap_or_default(),
      })
      .collect(),
  )
}

pub fn reviews(body: &str) -> Result<Vec<Review>> {
  let body: ReviewsBody = serde_json::from_str(body)?;
  Ok(
    body
      .results
      .into_iter()
      .map(|r| Review { author: r.author, content: r.content })
      .collect(),
  )
}

pub fn trailers(body: &str) -> Result<Vec<Trailer>> {
  let body: TrailersBody = serde_json::from_str(body)?;
  Ok(
    body
      .youtube
      .into_iter()
      .map(|t| Trailer { title: t.name, video_id: t.source })
      .collect(),
  )
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::Error;

  fn images() -> Images { Images::new("https://image.tmdb.org/t/p/") }

  #[test]
  fn image_sizes_per_kind() {
    let i = images();
    assert_eq!(i.poster(Some("/a.jpg")), "https://image.tmdb.org/t/p/w185/a.jpg");
    assert_eq!(i.backdrop(Some("/b.jpg")), "https://image.tmdb.org/t/p/w500/b.jpg");
    assert_eq!(i.avatar(Some("c.jpg")), "https://image.tmdb.org/t/p/w185/c.jpg");
  }

  #[test]
  fn missing_image_path_is_empty() {
    assert_eq!(images().poster(None), "");
    assert_eq!(images().backdrop(Some("")), "");
  }

  #[test]
  fn parses_a_listing_page() {
    let body = r#"{
      "page": 1,
      "results": [
        {"id": 1891, "title": "The Empire Strikes Back", "poster_path": "/7BuH8.jpg",
         "vote_average": 8.1, "adult": false},
        {"id": 11, "title": "Star Wars", "poster_path": null, "vote_average": 8.0}
      ],
      "total_pages": 500
    }"#;

    let page = listing(body, &images()).unwrap();
    assert_eq!(page.len(), 2);
    assert_eq!(page[0].id, MovieId(1891));
    assert_eq!(page[0].title, "The Empire Strikes Back");
    assert_eq!(page[0].poster_url, "https://image.tmdb.org/t/p/w185/7BuH8.jpg");
    assert_eq!(page[0].rating, 8.1);
    assert_eq!(page[1].poster_url, "");
  }

  #[test]
  fn parses_movie_detail() {
    let body = r#"{
      "id": 1891,
      "title": "The Empire Strikes Back",
      "overview": "The epic saga continues.",
      "poster_path": "/poster.jpg",
      "backdrop_path": "/backdrop.jpg",
      "vote_average": 8.4,
      "release_date": "1980-05-20",
      "runtime": 124
    }"#;

    let m = movie(body, &images()).unwrap();
    assert_eq!(m.id, MovieId(1891));
    assert_eq!(m.runtime, 124);
    assert_eq!(m.release_date, "1980-05-20");
    assert_eq!(m.backdrop_url, "https://image.tmdb.org/t/p/w500/backdrop.jpg");
    assert_eq!(m.release_year(), Some(1980));
  }

  #[test]
  fn null_runtime_is_zero() {
    let body = r#"{"id": 5, "title": "Untitled", "poster_path": null,
                   "backdrop_path": null, "runtime": null}"#;
    let m = movie(body, &images()).unwrap();
    assert_eq!(m.runtime, 0);
    assert_eq!(m.overview, "");
    assert_eq!(m.poster_url, "");
  }

  #[test]
  fn parses_cast_reviews_and_trailers() {
    let cast_body = r#"{"id": 1891, "cast": [
      {"name": "Mark Hamill", "character": "Luke Skywalker", "profile_path": "/mh.jpg"},
      {"name": "Frank Oz", "character": null, "profile_path": null}
    ], "crew": []}"#;
    let c = cast(cast_body, &images()).unwrap();
    assert_eq!(c[0].avatar_url, "https://image.tmdb.org/t/p/w185/mh.jpg");
    assert_eq!(c[1].character, "");
    assert_eq!(c[1].avatar_url, "");

    let review_body =
      r#"{"id": 1891, "page": 1, "results": [{"id": "x", "author": "roger", "content": "Great."}]}"#;
    assert_eq!(
      reviews(review_body).unwrap(),
      vec![Review { author: "roger".into(), content: "Great.".into() }]
    );

    let trailer_body = r#"{"id": 1891, "quicktime": [], "youtube": [
      {"name": "Official Trailer", "size": "HD", "source": "JNwNXF9Y6kY", "type": "Trailer"}
    ]}"#;
    let t = trailers(trailer_body).unwrap();
    assert_eq!(t[0].title, "Official Trailer");
    assert_eq!(t[0].video_id, "JNwNXF9Y6kY");
  }

  #[test]
  fn unexpected_shape_is_a_parse_error() {
    let err = listing(r#"{"status_code": 7}"#, &images()).unwrap_err();
    assert!(matches!(err, Error::Parse(_)));
  }
}
