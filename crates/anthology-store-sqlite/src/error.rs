//! Error type for `anthology-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("connection pool is closed")]
  PoolClosed,

  #[error("pool size must be at least 1")]
  InvalidPoolSize,
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
