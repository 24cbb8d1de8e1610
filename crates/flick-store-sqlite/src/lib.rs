//! SQLite backend for the flick movie store.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated thread
//! without blocking the async runtime. One [`SqliteStore`] owns the single
//! writable connection; clones share it.

mod dispatch;
mod encode;
mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use schema::SCHEMA_VERSION;
pub use store::{Purpose, SqliteStore};

#[cfg(test)]
mod tests;
