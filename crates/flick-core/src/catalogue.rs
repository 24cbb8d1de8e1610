//! The remote catalogue and connectivity seams.

use std::future::Future;

use crate::{
  movie::{CastMember, Movie, MovieId, MovieSummary, Review, Trailer},
  resource::SortOrder,
};

/// A source of movie data on the network.
///
/// Every call is a single request: no retries, and no timeout beyond the
/// transport's own.
pub trait Catalogue: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// One page of a listing. Pages start at 1.
  fn listing(
    &self,
    order: SortOrder,
    page: u32,
  ) -> impl Future<Output = Result<Vec<MovieSummary>, Self::Error>> + Send + '_;

  fn movie(
    &self,
    id: MovieId,
  ) -> impl Future<Output = Result<Movie, Self::Error>> + Send + '_;

  fn cast(
    &self,
    id: MovieId,
  ) -> impl Future<Output = Result<Vec<CastMember>, Self::Error>> + Send + '_;

  fn reviews(
    &self,
    id: MovieId,
  ) -> impl Future<Output = Result<Vec<Review>, Self::Error>> + Send + '_;

  fn trailers(
    &self,
    id: MovieId,
  ) -> impl Future<Output = Result<Vec<Trailer>, Self::Error>> + Send + '_;
}

/// Reports whether the network is currently reachable.
pub trait Connectivity: Send + Sync {
  fn is_online(&self) -> bool;
}
