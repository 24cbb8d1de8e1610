//! Integration tests for `SqliteStore` against an in-memory database.

use flick_core::{
  movie::{CastMember, Movie, MovieChanges, MovieId, MovieSummary, Review, Trailer},
  resource::{Operation, Outcome, Resource, Rows, Selection, SortOrder, Values},
  store::{MovieStore, Op},
};

use crate::{Error, Purpose, SCHEMA_VERSION, SqliteStore};

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

const EMPIRE: MovieId = MovieId(1891);

fn empire() -> Movie {
  Movie {
    id:           EMPIRE,
    title:        "The Empire Strikes Back".into(),
    overview:     "The Rebels scatter after the Empire attacks Hoth.".into(),
    poster_url:   "https://image.tmdb.org/t/p/w185/empire.jpg".into(),
    backdrop_url: "https://image.tmdb.org/t/p/w500/hoth.jpg".into(),
    rating:       8.1,
    release_date: "1980-05-20".into(),
    runtime:      124,
  }
}

fn cast(name: &str, character: &str) -> Values {
  Values::Cast(CastMember {
    name:       name.into(),
    character:  character.into(),
    avatar_url: String::new(),
  })
}

fn review(author: &str) -> Values {
  Values::Review(Review { author: author.into(), content: "Better than the first.".into() })
}

fn trailer(video_id: &str) -> Values {
  Values::Trailer(Trailer { title: "Trailer".into(), video_id: video_id.into() })
}

fn summary(id: i64, title: &str) -> Values {
  Values::Summary(MovieSummary {
    id:         MovieId(id),
    title:      title.into(),
    poster_url: format!("https://image.tmdb.org/t/p/w185/{id}.jpg"),
    rating:     6.5,
  })
}

async fn favorites(s: &SqliteStore) -> Vec<Movie> {
  s.query(Resource::Favorites, Selection::all())
    .await
    .unwrap()
    .into_movies()
    .unwrap()
}

async fn count(s: &SqliteStore, resource: Resource) -> usize {
  s.query(resource, Selection::all()).await.unwrap().len()
}

/// Favorite `movie` with one child of each kind.
async fn seed(s: &SqliteStore, movie: Movie) {
  let id = movie.id;
  s.apply_batch(vec![
    Operation::insert(Resource::Favorites, Values::Movie(movie)),
    Operation::insert(Resource::favorite_cast(id), cast("Mark Hamill", "Luke Skywalker")),
    Operation::insert(Resource::favorite_reviews(id), review("roger")),
    Operation::insert(Resource::favorite_trailers(id), trailer("JNwNXF9Y6kY")),
  ])
  .await
  .unwrap();
}

// ─── Schema ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn fresh_store_is_at_current_version() {
  let s = store().await;
  assert_eq!(s.schema_version().await.unwrap(), SCHEMA_VERSION);
  assert_eq!(s.purpose(), Purpose::Write);
  assert!(favorites(&s).await.is_empty());
  assert_eq!(count(&s, Resource::listing(SortOrder::Popular, 1)).await, 0);
}

#[tokio::test]
async fn migrate_discards_everything() {
  let s = store().await;
  seed(&s, empire()).await;
  s.bulk_insert(Resource::listing(SortOrder::Popular, 1), vec![summary(1, "A")])
    .await
    .unwrap();

  s.migrate(SCHEMA_VERSION, SCHEMA_VERSION + 1).await.unwrap();

  assert_eq!(s.schema_version().await.unwrap(), SCHEMA_VERSION + 1);
  assert!(favorites(&s).await.is_empty());
  assert_eq!(count(&s, Resource::favorite_cast(EMPIRE)).await, 0);
  assert_eq!(count(&s, Resource::listing(SortOrder::Popular, 1)).await, 0);
}

#[tokio::test]
async fn reopening_an_older_file_migrates_it() {
  let dir = tempfile::tempdir().unwrap();
  let path = dir.path().join("flick.db");

  let s = SqliteStore::open(&path).await.unwrap();
  seed(&s, empire()).await;
  s.close().await.unwrap();

  {
    let raw = rusqlite::Connection::open(&path).unwrap();
    raw.pragma_update(None, "user_version", 7).unwrap();
  }

  let s = SqliteStore::open(&path).await.unwrap();
  assert_eq!(s.schema_version().await.unwrap(), SCHEMA_VERSION);
  assert!(favorites(&s).await.is_empty());
}

#[tokio::test]
async fn reopening_a_current_file_keeps_data() {
  let dir = tempfile::tempdir().unwrap();
  let path = dir.path().join("flick.db");

  let s = SqliteStore::open(&path).await.unwrap();
  seed(&s, empire()).await;
  s.close().await.unwrap();

  let s = SqliteStore::open(&path).await.unwrap();
  assert_eq!(favorites(&s).await, vec![empire()]);
}

#[tokio::test]
async fn read_handles_cannot_write() {
  let dir = tempfile::tempdir().unwrap();
  let path = dir.path().join("flick.db");

  let writer = SqliteStore::open(&path).await.unwrap();
  seed(&writer, empire()).await;

  let reader = SqliteStore::open_with(&path, Purpose::Read).await.unwrap();
  assert_eq!(favorites(&reader).await.len(), 1);
  assert!(reader.delete(Resource::favorite(EMPIRE)).await.is_err());
  assert_eq!(favorites(&writer).await.len(), 1);
}

// ─── Favorites ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn insert_returns_row_identifiers() {
  let s = store().await;

  let created = s
    .insert(Resource::Favorites, Values::Movie(empire()))
    .await
    .unwrap();
  assert_eq!(created, Resource::Favorite(EMPIRE));

  let created = s
    .insert(Resource::favorite_cast(EMPIRE), cast("Harrison Ford", "Han Solo"))
    .await
    .unwrap();
  let Resource::CastEntry(id, row) = created else {
    panic!("expected a cast entry, got {created}");
  };
  assert_eq!(id, EMPIRE);
  assert!(row > 0);
  assert_eq!(created.to_string(), format!("favorites/1891/cast/{row}"));
}

#[tokio::test]
async fn stored_fields_round_trip() {
  let s = store().await;
  seed(&s, empire()).await;

  assert_eq!(favorites(&s).await, vec![empire()]);

  let cast = s
    .query(Resource::favorite_cast(EMPIRE), Selection::all())
    .await
    .unwrap()
    .into_cast()
    .unwrap();
  assert_eq!(cast[0].name, "Mark Hamill");
  assert_eq!(cast[0].character, "Luke Skywalker");

  let trailers = s
    .query(Resource::favorite_trailers(EMPIRE), Selection::all())
    .await
    .unwrap()
    .into_trailers()
    .unwrap();
  assert_eq!(trailers[0].video_id, "JNwNXF9Y6kY");
}

#[tokio::test]
async fn deleting_a_favorite_cascades() {
  let s = store().await;
  s.insert(Resource::Favorites, Values::Movie(empire())).await.unwrap();
  s.insert(Resource::favorite_cast(EMPIRE), cast("Mark Hamill", "Luke Skywalker"))
    .await
    .unwrap();

  let deleted = s.delete(Resource::favorite(EMPIRE)).await.unwrap();
  assert_eq!(deleted, 1);
  assert_eq!(count(&s, Resource::favorite_cast(EMPIRE)).await, 0);
}

#[tokio::test]
async fn cascade_leaves_no_orphans() {
  let s = store().await;
  seed(&s, empire()).await;
  s.insert(Resource::favorite_cast(EMPIRE), cast("Carrie Fisher", "Leia"))
    .await
    .unwrap();
  s.insert(Resource::favorite_reviews(EMPIRE), review("pauline"))
    .await
    .unwrap();

  let mut other = empire();
  other.id = MovieId(11);
  seed(&s, other).await;

  s.delete(Resource::favorite(EMPIRE)).await.unwrap();

  assert_eq!(count(&s, Resource::favorite_cast(EMPIRE)).await, 0);
  assert_eq!(count(&s, Resource::favorite_reviews(EMPIRE)).await, 0);
  assert_eq!(count(&s, Resource::favorite_trailers(EMPIRE)).await, 0);
  assert_eq!(count(&s, Resource::favorite_cast(MovieId(11))).await, 1);
}

#[tokio::test]
async fn reinserting_a_favorite_replaces_it_and_its_children() {
  let s = store().await;
  seed(&s, empire()).await;

  let mut again = empire();
  again.rating = 8.4;
  s.apply_batch(vec![
    Operation::insert(Resource::Favorites, Values::Movie(again.clone())),
    Operation::insert(Resource::favorite_cast(EMPIRE), cast("Billy Dee Williams", "Lando")),
  ])
  .await
  .unwrap();

  assert_eq!(favorites(&s).await, vec![again]);
  let cast = s
    .query(Resource::favorite_cast(EMPIRE), Selection::all())
    .await
    .unwrap()
    .into_cast()
    .unwrap();
  assert_eq!(cast.len(), 1);
  assert_eq!(cast[0].name, "Billy Dee Williams");
  assert_eq!(count(&s, Resource::favorite_reviews(EMPIRE)).await, 0);
  assert_eq!(count(&s, Resource::favorite_trailers(EMPIRE)).await, 0);
}

#[tokio::test]
async fn favorites_can_be_read_newest_first_or_by_id() {
  let s = store().await;
  for id in [3, 1, 2] {
    let mut m = empire();
    m.id = MovieId(id);
    s.insert(Resource::Favorites, Values::Movie(m)).await.unwrap();
  }

  let newest = s
    .query(Resource::Favorites, Selection::all().newest_first())
    .await
    .unwrap()
    .into_movies()
    .unwrap();
  let ids: Vec<i64> = newest.iter().map(|m| m.id.0).collect();
  assert_eq!(ids, vec![2, 1, 3]);

  let one = s
    .query(Resource::Favorites, Selection::movie(MovieId(1)))
    .await
    .unwrap();
  assert_eq!(one.len(), 1);
}

#[tokio::test]
async fn child_without_parent_is_a_constraint_failure() {
  let s = store().await;

  let err = s
    .insert(Resource::favorite_cast(MovieId(42)), cast("Nobody", "Nobody"))
    .await
    .unwrap_err();
  assert!(err.is_constraint(), "{err}");
  match err {
    Error::Constraint { resource, .. } => {
      assert_eq!(resource, Resource::favorite_cast(MovieId(42)));
    }
    other => panic!("unexpected error: {other}"),
  }
}

// ─── Updates ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn update_changes_only_given_columns() {
  let s = store().await;
  seed(&s, empire()).await;

  let changes = MovieChanges {
    rating: Some(9.0),
    poster_url: Some("https://image.tmdb.org/t/p/w185/new.jpg".into()),
    ..MovieChanges::default()
  };
  let changed = s.update(Resource::favorite(EMPIRE), changes).await.unwrap();
  assert_eq!(changed, 1);

  let stored = favorites(&s).await.remove(0);
  assert_eq!(stored.rating, 9.0);
  assert_eq!(stored.poster_url, "https://image.tmdb.org/t/p/w185/new.jpg");
  assert_eq!(stored.title, empire().title);
  assert_eq!(stored.backdrop_url, empire().backdrop_url);
}

#[tokio::test]
async fn update_of_missing_or_nothing_changes_no_rows() {
  let s = store().await;
  seed(&s, empire()).await;

  let missing = s
    .update(
      Resource::favorite(MovieId(5)),
      MovieChanges { rating: Some(1.0), ..MovieChanges::default() },
    )
    .await
    .unwrap();
  assert_eq!(missing, 0);

  let empty = s
    .update(Resource::favorite(EMPIRE), MovieChanges::default())
    .await
    .unwrap();
  assert_eq!(empty, 0);
}

// ─── Child deletes ───────────────────────────────────────────────────────────

#[tokio::test]
async fn deleting_reviews_leaves_trailers() {
  let s = store().await;
  seed(&s, empire()).await;

  let deleted = s.delete(Resource::favorite_reviews(EMPIRE)).await.unwrap();
  assert_eq!(deleted, 1);
  assert_eq!(count(&s, Resource::favorite_reviews(EMPIRE)).await, 0);
  assert_eq!(count(&s, Resource::favorite_trailers(EMPIRE)).await, 1);

  let deleted = s.delete(Resource::favorite_trailers(EMPIRE)).await.unwrap();
  assert_eq!(deleted, 1);
  assert_eq!(count(&s, Resource::favorite_trailers(EMPIRE)).await, 0);
  assert_eq!(count(&s, Resource::favorite_cast(EMPIRE)).await, 1);
}

// ─── Batches ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn batch_outcomes_follow_operation_order() {
  let s = store().await;
  seed(&s, empire()).await;

  let outcomes = s
    .apply_batch(vec![
      Operation::update(
        Resource::favorite(EMPIRE),
        MovieChanges { rating: Some(7.0), ..MovieChanges::default() },
      ),
      Operation::delete(Resource::favorite_reviews(EMPIRE)),
      Operation::insert(Resource::favorite_reviews(EMPIRE), review("new")),
    ])
    .await
    .unwrap();

  assert_eq!(outcomes.len(), 3);
  assert_eq!(outcomes[0], Outcome::Affected(1));
  assert_eq!(outcomes[1], Outcome::Affected(1));
  assert!(matches!(outcomes[2], Outcome::Inserted(Resource::ReviewEntry(EMPIRE, _))));
}

#[tokio::test]
async fn failed_batch_leaves_nothing_behind() {
  let s = store().await;

  let result = s
    .apply_batch(vec![
      Operation::insert(Resource::Favorites, Values::Movie(empire())),
      Operation::insert(Resource::favorite_cast(EMPIRE), cast("Mark Hamill", "Luke")),
      // No such parent.
      Operation::insert(Resource::favorite_reviews(MovieId(2)), review("ghost")),
    ])
    .await;

  assert!(result.is_err());
  assert!(favorites(&s).await.is_empty());
  assert_eq!(count(&s, Resource::favorite_cast(EMPIRE)).await, 0);
}

#[tokio::test]
async fn failed_batch_keeps_prior_state() {
  let s = store().await;
  seed(&s, empire()).await;

  let result = s
    .apply_batch(vec![
      Operation::delete(Resource::favorite_reviews(EMPIRE)),
      Operation::insert(Resource::favorite_reviews(EMPIRE), trailer("wrong kind")),
    ])
    .await;

  assert!(matches!(result, Err(Error::WrongValues { .. })));
  assert_eq!(count(&s, Resource::favorite_reviews(EMPIRE)).await, 1);
}

// ─── Listing cache ───────────────────────────────────────────────────────────

fn page(offset: i64) -> Vec<Values> {
  (offset..offset + 20).map(|id| summary(id, &format!("Movie {id}"))).collect()
}

#[tokio::test]
async fn cache_holds_a_bulk_inserted_page() {
  let s = store().await;
  let popular = Resource::listing(SortOrder::Popular, 1);

  let inserted = s.bulk_insert(popular, page(100)).await.unwrap();
  assert_eq!(inserted, 20);

  let rows = s
    .query(popular, Selection::all())
    .await
    .unwrap()
    .into_summaries()
    .unwrap();
  assert_eq!(rows.len(), 20);
  assert_eq!(rows[0].id, MovieId(100));
  assert_eq!(rows[0].title, "Movie 100");
  assert_eq!(rows[19].id, MovieId(119));
}

#[tokio::test]
async fn clearing_then_refilling_replaces_the_page() {
  let s = store().await;
  let popular = Resource::listing(SortOrder::Popular, 1);
  s.bulk_insert(popular, page(100)).await.unwrap();

  let cleared = s.delete(popular).await.unwrap();
  assert_eq!(cleared, 20);
  s.bulk_insert(popular, page(500)).await.unwrap();

  let ids: Vec<i64> = s
    .query(popular, Selection::all())
    .await
    .unwrap()
    .into_summaries()
    .unwrap()
    .iter()
    .map(|m| m.id.0)
    .collect();
  assert_eq!(ids, (500..520).collect::<Vec<_>>());
}

#[tokio::test]
async fn cache_insert_replaces_duplicates() {
  let s = store().await;
  let popular = Resource::listing(SortOrder::Popular, 1);

  s.bulk_insert(popular, page(100)).await.unwrap();
  s.bulk_insert(popular, page(100)).await.unwrap();

  assert_eq!(count(&s, popular).await, 20);
}

#[tokio::test]
async fn bulk_insert_is_all_or_nothing() {
  let s = store().await;
  let popular = Resource::listing(SortOrder::Popular, 1);

  let mut rows = page(100);
  rows.push(review("not a summary"));
  assert!(s.bulk_insert(popular, rows).await.is_err());
  assert_eq!(count(&s, popular).await, 0);
}

// ─── Unsupported operations ──────────────────────────────────────────────────

#[tokio::test]
async fn unsupported_operations_are_rejected() {
  let s = store().await;

  let err = s
    .insert(Resource::listing(SortOrder::TopRated, 1), summary(1, "A"))
    .await
    .unwrap_err();
  assert!(matches!(err, Error::Unsupported { op: Op::Insert, .. }));

  let err = s.query(Resource::favorite(EMPIRE), Selection::all()).await.unwrap_err();
  assert!(matches!(err, Error::Unsupported { op: Op::Query, .. }));

  let err = s.delete(Resource::Favorites).await.unwrap_err();
  assert!(matches!(err, Error::Unsupported { op: Op::Delete, .. }));

  let err = s
    .update(Resource::Favorites, MovieChanges::default())
    .await
    .unwrap_err();
  assert!(matches!(err, Error::Unsupported { op: Op::Update, .. }));

  let err = s
    .bulk_insert(Resource::Favorites, vec![Values::Movie(empire())])
    .await
    .unwrap_err();
  assert!(matches!(err, Error::Unsupported { op: Op::BulkInsert, .. }));
}

#[tokio::test]
async fn rows_match_the_resource_read() {
  let s = store().await;
  seed(&s, empire()).await;

  let rows = s.query(Resource::favorite_reviews(EMPIRE), Selection::all()).await.unwrap();
  assert!(matches!(rows, Rows::Reviews(ref r) if r.len() == 1));
  assert!(rows.into_cast().is_none());
}
