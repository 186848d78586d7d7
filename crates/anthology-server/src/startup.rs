//! Two-phase startup: acquire the storage pool and probe it, then bind the
//! listener.
//!
//! ```text
//! Unstarted ──acquire──▶ PoolReady ──listen──▶ Serving
//!     │                      │
//!     └──────── any failure ─┴──────▶ Failed
//! ```
//!
//! `Failed` is terminal.

use std::{future::Future, sync::Arc};

use anthology_core::store::{Storage, probe_statement};
use thiserror::Error;
use tokio::net::TcpListener;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
  Unstarted,
  PoolReady,
  Serving,
  Failed,
}

#[derive(Debug, Error)]
pub enum StartupError {
  #[error("failed to open storage: {0}")]
  Open(#[source] Box<dyn std::error::Error + Send + Sync>),

  #[error("storage liveness probe failed: {0}")]
  Probe(#[source] Box<dyn std::error::Error + Send + Sync>),

  #[error("failed to bind {address}: {source}")]
  Bind {
    address: String,
    #[source]
    source:  std::io::Error,
  },

  #[error("cannot move from {from:?} to {to:?}")]
  InvalidTransition { from: Phase, to: Phase },
}

/// Tracks the startup sequence for a backend `S`.
pub struct Startup<S> {
  phase: Phase,
  store: Option<Arc<S>>,
}

impl<S> Default for Startup<S> {
  fn default() -> Self {
    Self {
      phase: Phase::Unstarted,
      store: None,
    }
  }
}

impl<S: Storage> Startup<S> {
  pub fn new() -> Self { Self::default() }

  pub fn phase(&self) -> Phase { self.phase }

  /// `Unstarted → PoolReady`: open the backend with `open`, then run the
  /// liveness probe against it.
  pub async fn acquire<F, Fut, E>(&mut self, open: F) -> Result<Arc<S>, StartupError>
  where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<S, E>>,
    E: std::error::Error + Send + Sync + 'static,
  {
    self.require(Phase::Unstarted, Phase::PoolReady)?;

    let store = match open().await {
      Ok(store) => store,
      Err(e) => return Err(self.fail(StartupError::Open(Box::new(e)))),
    };
    if let Err(e) = store.query(&probe_statement()).await {
      return Err(self.fail(StartupError::Probe(Box::new(e))));
    }

    let store = Arc::new(store);
    self.store = Some(store.clone());
    self.phase = Phase::PoolReady;
    tracing::info!("storage pool ready");
    Ok(store)
  }

  /// `PoolReady → Serving`: bind the listener. The caller then hands it to
  /// `axum::serve`.
  pub async fn listen(&mut self, address: &str) -> Result<(TcpListener, Arc<S>), StartupError> {
    self.require(Phase::PoolReady, Phase::Serving)?;
    let Some(store) = self.store.clone() else {
      return Err(self.fail(StartupError::InvalidTransition {
        from: self.phase,
        to:   Phase::Serving,
      }));
    };

    match TcpListener::bind(address).await {
      Ok(listener) => {
        self.phase = Phase::Serving;
        Ok((listener, store))
      }
      Err(source) => Err(self.fail(StartupError::Bind {
        address: address.to_owned(),
        source,
      })),
    }
  }

  /// Enter the terminal `Failed` phase, releasing the pool.
  fn fail(&mut self, err: StartupError) -> StartupError {
    tracing::error!(error = %err, from = ?self.phase, "startup failed");
    self.phase = Phase::Failed;
    self.store = None;
    err
  }

  fn require(&self, from: Phase, to: Phase) -> Result<(), StartupError> {
    if self.phase == from {
      Ok(())
    } else {
      Err(StartupError::InvalidTransition {
        from: self.phase,
        to,
      })
    }
  }
}
