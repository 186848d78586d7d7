//! SQLite backend for the Anthology API.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on dedicated
//! connection threads without blocking the async runtime. Connections are
//! handed out by a bounded [`SqlitePool`].

mod encode;
mod pool;
mod schema;

pub mod error;

pub use error::{Error, Result};
pub use pool::{DEFAULT_POOL_SIZE, SqlitePool};
