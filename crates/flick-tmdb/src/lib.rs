//! Client for The Movie Database (TMDB) v3 API.
//!
//! [`TmdbClient`] implements [`flick_core::catalogue::Catalogue`]: it builds
//! the endpoint URLs, performs one GET per call and hands the body to the
//! parsers in [`parse`], which compose every relative image path into a full
//! URL.

mod client;
pub mod error;
pub mod parse;

pub use client::{TmdbClient, TmdbConfig};
pub use error::{Error, Result};
pub use parse::Images;
