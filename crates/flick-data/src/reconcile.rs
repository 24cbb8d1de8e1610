//! Movie detail loading and favorite reconciliation.
//!
//! When online, detail is always fetched fresh. If the movie is a favorite
//! the stored copy picks up the new artwork and rating and has its reviews
//! and trailers replaced; its cast, title, overview, release date and runtime
//! stay as first saved. When offline, or when the fetch fails, a favorite is
//! assembled from the store alone.

use flick_core::{
  catalogue::{Catalogue, Connectivity},
  movie::{Movie, MovieChanges, MovieDetail, MovieId},
  resource::{Operation, Resource, Selection, Values},
  store::MovieStore,
};

use crate::{DataAccess, Error, Result};

impl<S, C, N> DataAccess<S, C, N>
where
  S: MovieStore,
  C: Catalogue,
  N: Connectivity,
{
  /// Everything known about `id`, or `None` when it is neither reachable
  /// nor a favorite.
  #[tracing::instrument(skip(self))]
  pub async fn load_movie(&self, id: MovieId) -> Result<Option<MovieDetail>> {
    let stored = self.stored_favorite(id).await?;

    if self.network.is_online() {
      match self.fetch_detail(id).await {
        Ok(mut fresh) => {
          if stored.is_some() {
            self.reconcile(&fresh).await;
            fresh.is_favorite = true;
          }
          return Ok(Some(fresh));
        }
        Err(e) => tracing::warn!(%id, error = %e, "detail fetch failed"),
      }
    }

    match stored {
      Some(movie) => self.assemble(movie).await.map(Some),
      None => Ok(None),
    }
  }

  async fn stored_favorite(&self, id: MovieId) -> Result<Option<Movie>> {
    let rows = self
      .store
      .query(Resource::Favorites, Selection::movie(id))
      .await
      .map_err(Error::store)?;
    Ok(rows.into_movies().and_then(|m| m.into_iter().next()))
  }

  async fn fetch_detail(&self, id: MovieId) -> Result<MovieDetail, C::Error> {
    let (movie, cast, reviews, trailers) = tokio::try_join!(
      self.catalogue.movie(id),
      self.catalogue.cast(id),
      self.catalogue.reviews(id),
      self.catalogue.trailers(id),
    )?;
    Ok(MovieDetail { movie, cast, reviews, trailers, is_favorite: false })
  }

  /// Bring a stored favorite in line with `fresh`, in one batch.
  ///
  /// A failure is logged and dropped: the stored copy is still consistent,
  /// only stale.
  #[tracing::instrument(skip(self, fresh), fields(id = %fresh.movie.id))]
  async fn reconcile(&self, fresh: &MovieDetail) {
    let id = fresh.movie.id;

    let mut ops = vec![
      Operation::update(Resource::favorite(id), MovieChanges::refresh_from(&fresh.movie)),
      Operation::delete(Resource::favorite_reviews(id)),
    ];
    ops.extend(
      fresh
        .reviews
        .iter()
        .map(|r| Operation::insert(Resource::favorite_reviews(id), Values::Review(r.clone()))),
    );
    ops.push(Operation::delete(Resource::favorite_trailers(id)));
    ops.extend(
      fresh
        .trailers
        .iter()
        .map(|t| Operation::insert(Resource::favorite_trailers(id), Values::Trailer(t.clone()))),
    );

    match self.apply_batch(ops).await {
      Ok(_) => tracing::debug!(
        reviews = fresh.reviews.len(),
        trailers = fresh.trailers.len(),
        "favorite refreshed"
      ),
      Err(e) => tracing::warn!(error = %e, "favorite refresh failed; keeping stored copy"),
    }
  }

  /// A favorite's full record from the store alone.
  async fn assemble(&self, movie: Movie) -> Result<MovieDetail> {
    let id = movie.id;
    let cast = self
      .store
      .query(Resource::favorite_cast(id), Selection::all())
      .await
      .map_err(Error::store)?;
    let reviews = self
      .store
      .query(Resource::favorite_reviews(id), Selection::all())
      .await
      .map_err(Error::store)?;
    let trailers = self
      .store
      .query(Resource::favorite_trailers(id), Selection::all())
      .await
      .map_err(Error::store)?;

    Ok(MovieDetail {
      movie,
      cast: cast.into_cast().unwrap_or_default(),
      reviews: reviews.into_reviews().unwrap_or_default(),
      trailers: trailers.into_trailers().unwrap_or_default(),
      is_favorite: true,
    })
  }
}
