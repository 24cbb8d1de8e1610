//! Command handlers. Each one addresses the façade the way a screen would.

use anyhow::{Context as _, bail};
use clap::Subcommand;
use flick_core::{
  catalogue::{Catalogue, Connectivity},
  movie::{MovieDetail, MovieId, MovieSummary},
  resource::{Rows, Selection, SortOrder},
  store::MovieStore,
};
use flick_data::DataAccess;

#[derive(Subcommand, Debug)]
pub enum Command {
  /// Most popular movies.
  Popular {
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    page: u32,
  },
  /// Highest rated movies.
  TopRated {
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    page: u32,
  },
  /// Saved favorites, newest first.
  Favorites,
  /// Full detail for a movie.
  Show { id: MovieId },
  /// Save a movie, with its cast, reviews and trailers, for offline use.
  Favorite { id: MovieId },
  /// Forget a saved movie.
  Unfavorite { id: MovieId },
  /// Read any resource path, e.g. `favorites/1891/reviews`.
  Query { path: String },
}

pub async fn run<S, C, N>(data: &DataAccess<S, C, N>, command: Command) -> anyhow::Result<()>
where
  S: MovieStore,
  C: Catalogue,
  N: Connectivity,
{
  match command {
    Command::Popular { page } => listing(data, SortOrder::Popular, page).await,
    Command::TopRated { page } => listing(data, SortOrder::TopRated, page).await,
    Command::Favorites => {
      let favorites = data.favorites().await.context("failed to read favorites")?;
      if favorites.is_empty() {
        println!("No favorites yet.");
      }
      print_summaries(&favorites);
      Ok(())
    }
    Command::Show { id } => {
      let Some(detail) = data.load_movie(id).await.context("failed to load movie")? else {
        bail!("movie {id} is not available offline");
      };
      print_detail(&detail);
      Ok(())
    }
    Command::Favorite { id } => {
      let Some(detail) = data.load_movie(id).await.context("failed to load movie")? else {
        bail!("movie {id} could not be fetched");
      };
      data
        .add_favorite(&detail)
        .await
        .with_context(|| format!("failed to favorite {id}"))?;
      println!("Saved {} ({id}).", detail.movie.title);
      Ok(())
    }
    Command::Unfavorite { id } => {
      if data.remove_favorite(id).await.context("failed to unfavorite")? {
        println!("Removed {id}.");
      } else {
        println!("{id} was not a favorite.");
      }
      Ok(())
    }
    Command::Query { path } => {
      match data.query_path(&path, Selection::all()).await? {
        Some(rows) => print_rows(rows),
        None => println!("No data (offline or unreachable)."),
      }
      Ok(())
    }
  }
}

async fn listing<S, C, N>(
  data: &DataAccess<S, C, N>,
  order: SortOrder,
  page: u32,
) -> anyhow::Result<()>
where
  S: MovieStore,
  C: Catalogue,
  N: Connectivity,
{
  match data
    .listing(order, page)
    .await
    .with_context(|| format!("failed to list {order} page {page}"))?
  {
    Some(movies) => print_summaries(&movies),
    None => println!("No data (offline or unreachable)."),
  }
  Ok(())
}

// ─── Output ──────────────────────────────────────────────────────────────────

fn print_summaries(movies: &[MovieSummary]) {
  for m in movies {
    println!("{:>8}  {:>4.1}  {}", m.id, m.rating, m.title);
  }
}

fn print_detail(d: &MovieDetail) {
  let m = &d.movie;
  let year = m.release_year().map(|y| format!(" ({y})")).unwrap_or_default();
  let star = if d.is_favorite { " ★" } else { "" };
  println!("{}{year}{star}", m.title);
  println!("  rating {:.1}, {} min", m.rating, m.runtime);
  if !m.overview.is_empty() {
    println!("\n{}", m.overview);
  }

  if !d.cast.is_empty() {
    println!("\nCast");
    for c in &d.cast {
      println!("  {} as {}", c.name, c.character);
    }
  }
  if !d.reviews.is_empty() {
    println!("\nReviews");
    for r in &d.reviews {
      println!("  {}: {}", r.author, first_line(&r.content));
    }
  }
  if !d.trailers.is_empty() {
    println!("\nTrailers");
    for t in &d.trailers {
      println!("  {}  {}", t.title, t.watch_url());
    }
  }
}

fn print_rows(rows: Rows) {
  match rows {
    Rows::Movies(rows) => {
      for r in rows {
        println!("{:>6}  {:>8}  {}", r.row_id, r.value.id, r.value.title);
      }
    }
    Rows::Cast(rows) => {
      for r in rows {
        println!("{:>6}  {} as {}", r.row_id, r.value.name, r.value.character);
      }
    }
    Rows::Reviews(rows) => {
      for r in rows {
        println!("{:>6}  {}: {}", r.row_id, r.value.author, first_line(&r.value.content));
      }
    }
    Rows::Trailers(rows) => {
      for r in rows {
        println!("{:>6}  {}  {}", r.row_id, r.value.title, r.value.watch_url());
      }
    }
    Rows::Listing(rows) => {
      for r in rows {
        println!("{:>6}  {:>8}  {}", r.row_id, r.value.id, r.value.title);
      }
    }
  }
}

fn first_line(s: &str) -> &str { s.lines().next().unwrap_or_default() }
