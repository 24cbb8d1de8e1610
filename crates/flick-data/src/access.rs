//! [`DataAccess`]: resource-addressed reads and writes, listing refresh and
//! change notifications.

use flick_core::{
  catalogue::{Catalogue, Connectivity},
  movie::{MovieChanges, MovieDetail, MovieId, MovieSummary},
  resource::{Operation, Outcome, Resource, Rows, Selection, SortOrder, Values},
  store::MovieStore,
};
use tokio::sync::broadcast;

use crate::{Error, Result};

const CHANGE_CAPACITY: usize = 64;

/// What the refresh phase of a listing query did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Refresh {
  /// No connectivity; nothing was fetched.
  Offline,
  /// The fetch failed; the cache was left as it was.
  Failed,
  /// The page was fetched and this many rows were cached.
  Stored(usize),
}

/// The data-access façade over a store, a remote catalogue and a
/// connectivity probe.
pub struct DataAccess<S, C, N> {
  pub(crate) store:     S,
  pub(crate) catalogue: C,
  pub(crate) network:   N,
  changes:              broadcast::Sender<Resource>,
}

impl<S, C, N> DataAccess<S, C, N>
where
  S: MovieStore,
  C: Catalogue,
  N: Connectivity,
{
  pub fn new(store: S, catalogue: C, network: N) -> Self {
    let (changes, _) = broadcast::channel(CHANGE_CAPACITY);
    Self { store, catalogue, network, changes }
  }

  pub(crate) fn store(&self) -> &S { &self.store }

  pub fn network(&self) -> &N { &self.network }

  /// Receive the resource of every write that changed rows.
  ///
  /// A receiver that falls more than a few dozen messages behind skips the
  /// oldest ones.
  pub fn subscribe(&self) -> broadcast::Receiver<Resource> { self.changes.subscribe() }

  fn notify(&self, resource: Resource) {
    tracing::trace!(%resource, "change");
    // No receivers is fine.
    let _ = self.changes.send(resource);
  }

  // ── Reads ─────────────────────────────────────────────────────────────────

  /// Read the rows behind `resource`.
  ///
  /// A listing page is first refreshed from the catalogue, then the whole
  /// listing cache is read back. When offline, or when the fetch fails, the
  /// result is `None`.
  #[tracing::instrument(skip(self))]
  pub async fn query(&self, resource: Resource, selection: Selection) -> Result<Option<Rows>> {
    if let Resource::Listing { order, page } = resource {
      match self.refresh_listing(order, page).await? {
        Refresh::Offline | Refresh::Failed => return Ok(None),
        Refresh::Stored(_) => {}
      }
    }

    let rows = self
      .store
      .query(resource, selection)
      .await
      .map_err(Error::store)?;
    Ok(Some(rows))
  }

  /// [`DataAccess::query`] addressed by a path such as `favorites/1891/cast`.
  pub async fn query_path(&self, path: &str, selection: Selection) -> Result<Option<Rows>> {
    let resource: Resource = path.parse()?;
    self.query(resource, selection).await
  }

  /// Fetch one listing page and cache it.
  ///
  /// Page 1 starts a new listing, so the cache is cleared before the fresh
  /// rows go in. The clear and the insert are separate writes; a reader in
  /// between sees an empty cache.
  #[tracing::instrument(skip(self))]
  pub async fn refresh_listing(&self, order: SortOrder, page: u32) -> Result<Refresh> {
    if !self.network.is_online() {
      tracing::debug!(%order, page, "offline; listing not refreshed");
      return Ok(Refresh::Offline);
    }

    let movies = match self.catalogue.listing(order, page).await {
      Ok(movies) => movies,
      Err(e) => {
        tracing::warn!(%order, page, error = %e, "listing fetch failed");
        return Ok(Refresh::Failed);
      }
    };

    let resource = Resource::listing(order, page);
    if page == 1 {
      self.delete(resource).await?;
    }
    let stored = self
      .bulk_insert(resource, movies.into_iter().map(Values::Summary).collect())
      .await?;
    tracing::info!(%order, page, stored, "listing cached");
    Ok(Refresh::Stored(stored))
  }

  /// A listing page followed by everything cached before it.
  #[tracing::instrument(skip(self))]
  pub async fn listing(&self, order: SortOrder, page: u32) -> Result<Option<Vec<MovieSummary>>> {
    let rows = self
      .query(Resource::listing(order, page), Selection::all())
      .await?;
    Ok(rows.and_then(Rows::into_summaries))
  }

  /// Favorited movies, most recently favorited first.
  pub async fn favorites(&self) -> Result<Vec<MovieSummary>> {
    let rows = self
      .store
      .query(Resource::Favorites, Selection::all().newest_first())
      .await
      .map_err(Error::store)?;
    Ok(
      rows
        .into_movies()
        .unwrap_or_default()
        .iter()
        .map(|m| m.summary())
        .collect(),
    )
  }

  pub async fn is_favorite(&self, id: MovieId) -> Result<bool> {
    let rows = self
      .store
      .query(Resource::Favorites, Selection::movie(id))
      .await
      .map_err(Error::store)?;
    Ok(!rows.is_empty())
  }

  // ── Writes ────────────────────────────────────────────────────────────────

  pub async fn insert(&self, resource: Resource, values: Values) -> Result<Resource> {
    let created = self
      .store
      .insert(resource, values)
      .await
      .map_err(Error::store)?;
    self.notify(resource);
    Ok(created)
  }

  pub async fn bulk_insert(&self, resource: Resource, rows: Vec<Values>) -> Result<usize> {
    let inserted = self
      .store
      .bulk_insert(resource, rows)
      .await
      .map_err(Error::store)?;
    if inserted > 0 {
      self.notify(resource);
    }
    Ok(inserted)
  }

  pub async fn update(&self, resource: Resource, changes: MovieChanges) -> Result<usize> {
    let changed = self
      .store
      .update(resource, changes)
      .await
      .map_err(Error::store)?;
    if changed > 0 {
      self.notify(resource);
    }
    Ok(changed)
  }

  pub async fn delete(&self, resource: Resource) -> Result<usize> {
    let deleted = self.store.delete(resource).await.map_err(Error::store)?;
    if deleted > 0 {
      self.notify(resource);
    }
    Ok(deleted)
  }

  /// Apply `operations` atomically, then announce each resource the batch
  /// changed, once, in first-touched order.
  pub async fn apply_batch(&self, operations: Vec<Operation>) -> Result<Vec<Outcome>> {
    let resources: Vec<Resource> = operations.iter().map(Operation::resource).collect();
    let outcomes = self
      .store
      .apply_batch(operations)
      .await
      .map_err(Error::store)?;

    let mut announced: Vec<Resource> = Vec::new();
    for (resource, outcome) in resources.into_iter().zip(&outcomes) {
      let changed = match outcome {
        Outcome::Inserted(_) => true,
        Outcome::Affected(n) => *n > 0,
      };
      if changed && !announced.contains(&resource) {
        self.notify(resource);
        announced.push(resource);
      }
    }
    Ok(outcomes)
  }

  // ── Favorites ─────────────────────────────────────────────────────────────

  /// Save `detail` and all of its children in one batch.
  ///
  /// A movie that is already a favorite is replaced wholesale.
  pub async fn add_favorite(&self, detail: &MovieDetail) -> Result<Resource> {
    let id = detail.movie.id;
    let mut ops = vec![Operation::insert(
      Resource::Favorites,
      Values::Movie(detail.movie.clone()),
    )];
    ops.extend(
      detail
        .cast
        .iter()
        .map(|c| Operation::insert(Resource::favorite_cast(id), Values::Cast(c.clone()))),
    );
    ops.extend(
      detail
        .reviews
        .iter()
        .map(|r| Operation::insert(Resource::favorite_reviews(id), Values::Review(r.clone()))),
    );
    ops.extend(
      detail
        .trailers
        .iter()
        .map(|t| Operation::insert(Resource::favorite_trailers(id), Values::Trailer(t.clone()))),
    );

    self.apply_batch(ops).await?;
    tracing::info!(%id, title = %detail.movie.title, "favorited");
    Ok(Resource::favorite(id))
  }

  /// Un-favorite `id`. Returns whether it was a favorite.
  pub async fn remove_favorite(&self, id: MovieId) -> Result<bool> {
    let removed = self.delete(Resource::favorite(id)).await? > 0;
    if removed {
      tracing::info!(%id, "unfavorited");
    }
    Ok(removed)
  }
}
