//! The `Storage` trait.
//!
//! Implemented by storage backends (e.g. `anthology-store-sqlite`). The HTTP
//! layer depends on this abstraction, not on any concrete backend. Every call
//! takes a fully-bound [`Statement`]; there is no way to hand a backend raw
//! text with caller data spliced in.

use std::future::Future;

use crate::{row::Row, statement::Statement};

/// Outcome of [`Storage::execute`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Executed {
  /// Id generated for the inserted row, if the statement was an insert.
  pub insert_id:     i64,
  pub rows_affected: u64,
}

/// Abstraction over a relational storage backend.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait Storage: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Run a statement that returns rows.
  fn query<'a>(
    &'a self,
    statement: &'a Statement,
  ) -> impl Future<Output = Result<Vec<Row>, Self::Error>> + Send + 'a;

  /// Run a statement that modifies data.
  fn execute<'a>(
    &'a self,
    statement: &'a Statement,
  ) -> impl Future<Output = Result<Executed, Self::Error>> + Send + 'a;
}

/// The liveness probe issued before a backend is put into service.
pub fn probe_statement() -> Statement { Statement::new("SELECT 1") }
