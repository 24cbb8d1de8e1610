//! Async HTTP client for the TMDB movie endpoints.

use std::time::Duration;

use flick_core::{
  catalogue::Catalogue,
  movie::{CastMember, Movie, MovieId, MovieSummary, Review, Trailer},
  resource::SortOrder,
};
use reqwest::{Client, Url};

use crate::{Error, Result, parse, parse::Images};

const API_KEY_PARAM: &str = "api_key";
const PAGE_PARAM: &str = "page";

/// Connection settings for the TMDB API.
#[derive(Debug, Clone)]
pub struct TmdbConfig {
  pub api_key:        String,
  /// e.g. `https://api.themoviedb.org/3`
  pub api_base_url:   String,
  /// e.g. `https://image.tmdb.org/t/p`
  pub image_base_url: String,
  /// Transport timeout for a whole request.
  pub timeout:        Duration,
}

/// Async client for the TMDB movie API.
///
/// Cheap to clone; the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct TmdbClient {
  client:   Client,
  api_key:  String,
  base_url: String,
  images:   Images,
}

impl TmdbClient {
  pub fn new(config: TmdbConfig) -> Result<Self> {
    let client = Client::builder().timeout(config.timeout).build()?;
    Ok(Self {
      client,
      api_key: config.api_key,
      base_url: config.api_base_url.trim_end_matches('/').to_owned(),
      images: Images::new(config.image_base_url),
    })
  }

  // ── URLs ──────────────────────────────────────────────────────────────────

  /// `GET /movie/{popular|top_rated}?page=<n>`
  pub fn listing_url(&self, order: SortOrder, page: u32) -> Result<Url> {
    self.endpoint(order.as_path(), &[(PAGE_PARAM, page.to_string())])
  }

  /// `GET /movie/{id}`
  pub fn movie_url(&self, id: MovieId) -> Result<Url> { self.endpoint(&id.to_string(), &[]) }

  /// `GET /movie/{id}/casts`
  pub fn cast_url(&self, id: MovieId) -> Result<Url> { self.endpoint(&format!("{id}/casts"), &[]) }

  /// `GET /movie/{id}/reviews`
  pub fn reviews_url(&self, id: MovieId) -> Result<Url> {
    self.endpoint(&format!("{id}/reviews"), &[])
  }

  /// `GET /movie/{id}/trailers`
  pub fn trailers_url(&self, id: MovieId) -> Result<Url> {
    self.endpoint(&format!("{id}/trailers"), &[])
  }

  fn endpoint(&self, path: &str, params: &[(&str, String)]) -> Result<Url> {
    let raw = format!("{}/movie/{path}", self.base_url);
    let params = params
      .iter()
      .map(|(k, v)| (*k, v.as_str()))
      .chain([(API_KEY_PARAM, self.api_key.as_str())]);
    Url::parse_with_params(&raw, params).map_err(|e| Error::Url {
      url:    raw.clone(),
      reason: e.to_string(),
    })
  }

  // ── Transport ─────────────────────────────────────────────────────────────

  /// One GET; the body is returned only for a success status.
  async fn fetch(&self, url: Url) -> Result<String> {
    // The query string carries the API key; only the path is logged.
    tracing::debug!(path = url.path(), "fetching");

    let resp = self.client.get(url).send().await?;
    let status = resp.status();
    if !status.is_success() {
      return Err(Error::Status(status.as_u16()));
    }
    Ok(resp.text().await?)
  }
}

impl Catalogue for TmdbClient {
  type Error = Error;

  async fn listing(&self, order: SortOrder, page: u32) -> Result<Vec<MovieSummary>> {
    let body = self.fetch(self.listing_url(order, page)?).await?;
    parse::listing(&body, &self.images)
  }

  async fn movie(&self, id: MovieId) -> Result<Movie> {
    let body = self.fetch(self.movie_url(id)?).await?;
    parse::movie(&body, &self.images)
  }

  async fn cast(&self, id: MovieId) -> Result<Vec<CastMember>> {
    let body = self.fetch(self.cast_url(id)?).await?;
    parse::cast(&body, &self.images)
  }

  async fn reviews(&self, id: MovieId) -> Result<Vec<Review>> {
    let body = self.fetch(self.reviews_url(id)?).await?;
    parse::reviews(&body)
  }

  async fn trailers(&self, id: MovieId) -> Result<Vec<Trailer>> {
    let body = self.fetch(self.trailers_url(id)?).await?;
    parse::trailers(&body)
  }
}
