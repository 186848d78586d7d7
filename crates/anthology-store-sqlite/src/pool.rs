//! [`SqlitePool`], the SQLite implementation of [`Storage`].

use std::{
  ops::Deref,
  path::Path,
  sync::{Arc, Mutex, PoisonError},
};

use anthology_core::{
  row::Row,
  statement::Statement,
  store::{Executed, Storage},
};
use tokio::sync::{Semaphore, SemaphorePermit};
use tokio_rusqlite::Connection;

use crate::{
  Error, Result,
  encode::{decode_value, encode_args},
  schema::{CONNECTION_PRAGMAS, SCHEMA},
};

/// Connections opened when no size is configured.
pub const DEFAULT_POOL_SIZE: usize = 10;

// ─── Pool ────────────────────────────────────────────────────────────────────

/// A fixed-size pool of SQLite connections.
///
/// At most `size` statements run at once. Further callers wait, in arrival
/// order, for a connection to come back; nobody is turned away.
///
/// Cloning is cheap; the pool is reference-counted.
#[derive(Clone)]
pub struct SqlitePool {
  inner: Arc<Inner>,
}

struct Inner {
  idle:    Mutex<Vec<Connection>>,
  permits: Semaphore,
  size:    usize,
}

impl SqlitePool {
  /// Open `size` connections to the database at `path`, creating it and its
  /// schema if needed. `":memory:"` opens an in-memory pool.
  pub async fn open(path: impl AsRef<Path>, size: usize) -> Result<Self> {
    let path = path.as_ref();
    if path == Path::new(":memory:") {
      return Self::open_in_memory().await;
    }
    if size == 0 {
      return Err(Error::InvalidPoolSize);
    }

    let mut conns = Vec::with_capacity(size);
    for i in 0..size {
      let conn = Connection::open(path).await?;
      configure(&conn).await?;
      if i == 0 {
        init_schema(&conn).await?;
      }
      conns.push(conn);
    }

    tracing::debug!(path = %path.display(), size, "opened sqlite pool");
    Ok(Self::from_connections(conns))
  }

  /// Open an in-memory pool, mostly for tests.
  ///
  /// Every in-memory SQLite connection is a separate database, so this pool
  /// always holds exactly one connection.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = Connection::open_in_memory().await?;
    configure(&conn).await?;
    init_schema(&conn).await?;
    Ok(Self::from_connections(vec![conn]))
  }

  fn from_connections(conns: Vec<Connection>) -> Self {
    let size = conns.len();
    Self {
      inner: Arc::new(Inner {
        idle: Mutex::new(conns),
        permits: Semaphore::new(size),
        size,
      }),
    }
  }

  /// Maximum number of concurrent connections.
  pub fn size(&self) -> usize { self.inner.size }

  /// Connections not currently checked out.
  pub fn idle(&self) -> usize {
    self
      .inner
      .idle
      .lock()
      .unwrap_or_else(PoisonError::into_inner)
      .len()
  }

  /// Wait for a free connection.
  async fn checkout(&self) -> Result<Checkout<'_>> {
    let permit = self
      .inner
      .permits
      .acquire()
      .await
      .map_err(|_| Error::PoolClosed)?;
    let conn = self
      .inner
      .idle
      .lock()
      .unwrap_or_else(PoisonError::into_inner)
      .pop()
      .ok_or(Error::PoolClosed)?;
    Ok(Checkout {
      conn,
      inner:   &self.inner,
      _permit: permit,
    })
  }
}

async fn configure(conn: &Connection) -> Result<()> {
  conn
    .call(|conn| {
      conn.execute_batch(CONNECTION_PRAGMAS)?;
      Ok(())
    })
    .await?;
  Ok(())
}

async fn init_schema(conn: &Connection) -> Result<()> {
  conn
    .call(|conn| {
      conn.execute_batch(SCHEMA)?;
      Ok(())
    })
    .await?;
  Ok(())
}

// ─── Checkout ────────────────────────────────────────────────────────────────

/// A connection on loan from the pool; returned on drop.
struct Checkout<'a> {
  conn:    Connection,
  inner:   &'a Inner,
  // Released after `drop` below has put the connection back.
  _permit: SemaphorePermit<'a>,
}

impl Deref for Checkout<'_> {
  type Target = Connection;

  fn deref(&self) -> &Connection { &self.conn }
}

impl Drop for Checkout<'_> {
  fn drop(&mut self) {
    // `Connection` is a handle to its worker thread; the clone is the same
    // connection.
    self
      .inner
      .idle
      .lock()
      .unwrap_or_else(PoisonError::into_inner)
      .push(self.conn.clone());
  }
}

// ─── Storage impl ────────────────────────────────────────────────────────────

impl Storage for SqlitePool {
  type Error = Error;

  async fn query(&self, statement: &Statement) -> Result<Vec<Row>> {
    let sql  = statement.sql().to_owned();
    let args = encode_args(statement.args());

    let conn = self.checkout().await?;
    let rows = conn
      .call(move |conn| {
        let mut stmt = conn.prepare_cached(&sql)?;
        let names: Vec<String> = stmt
          .column_names()
          .into_iter()
          .map(str::to_owned)
          .collect();

        let mut rows = stmt.query(rusqlite::params_from_iter(args.iter()))?;
        let mut out = Vec::new();
        while let Some(row) = rows.next()? {
          let mut mapped = Row::new();
          for (i, name) in names.iter().enumerate() {
            mapped.push(name.as_str(), decode_value(row.get_ref(i)?));
          }
          out.push(mapped);
        }
        Ok(out)
      })
      .await?;

    Ok(rows)
  }

  async fn execute(&self, statement: &Statement) -> Result<Executed> {
    let sql  = statement.sql().to_owned();
    let args = encode_args(statement.args());

    let conn = self.checkout().await?;
    let executed = conn
      .call(move |conn| {
        let changed = conn.execute(&sql, rusqlite::params_from_iter(args.iter()))?;
        Ok(Executed {
          insert_id:     conn.last_insert_rowid(),
          rows_affected: changed as u64,
        })
      })
      .await?;

    Ok(executed)
  }
}
