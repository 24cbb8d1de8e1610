//! The `MovieStore` trait: the relational store behind the data-access layer.
//!
//! Implemented by storage backends (e.g. `flick-store-sqlite`). Every method
//! is addressed by a [`Resource`]; the backend maps each resource onto its
//! table and rejects operations a resource does not support.

use std::{fmt, future::Future};

use crate::{
  movie::MovieChanges,
  resource::{Operation, Outcome, Resource, Rows, Selection, Values},
};

/// The operation kinds a resource may or may not support.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
  Query,
  Insert,
  BulkInsert,
  Update,
  Delete,
}

impl fmt::Display for Op {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(match self {
      Op::Query => "query",
      Op::Insert => "insert",
      Op::BulkInsert => "bulk insert",
      Op::Update => "update",
      Op::Delete => "delete",
    })
  }
}

/// Abstraction over a persistent movie store.
///
/// Each write runs in its own transaction; [`MovieStore::apply_batch`] runs a
/// whole list of writes in one. A failed write leaves nothing visible.
pub trait MovieStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Read rows of the table behind `resource`.
  ///
  /// Listing resources read the listing cache as it stands; fetching is the
  /// caller's concern.
  fn query(
    &self,
    resource: Resource,
    selection: Selection,
  ) -> impl Future<Output = Result<Rows, Self::Error>> + Send + '_;

  /// Insert one row and return the identifier of the created row.
  ///
  /// Inserting a movie whose business id is already stored replaces the old
  /// row together with all of its children.
  fn insert(
    &self,
    resource: Resource,
    values: Values,
  ) -> impl Future<Output = Result<Resource, Self::Error>> + Send + '_;

  /// Insert listing-cache rows atomically. Returns the number inserted.
  fn bulk_insert(
    &self,
    resource: Resource,
    rows: Vec<Values>,
  ) -> impl Future<Output = Result<usize, Self::Error>> + Send + '_;

  /// Change columns of a single favorite. Returns the number of rows changed.
  fn update(
    &self,
    resource: Resource,
    changes: MovieChanges,
  ) -> impl Future<Output = Result<usize, Self::Error>> + Send + '_;

  /// Delete the rows behind `resource`. Returns the number of rows deleted.
  fn delete(
    &self,
    resource: Resource,
  ) -> impl Future<Output = Result<usize, Self::Error>> + Send + '_;

  /// Execute `operations` in order inside one transaction.
  ///
  /// Either every operation is applied or none is.
  fn apply_batch(
    &self,
    operations: Vec<Operation>,
  ) -> impl Future<Output = Result<Vec<Outcome>, Self::Error>> + Send + '_;
}
